//! Evaluation systems.

pub mod dependencies;
pub mod eligibility;
pub mod usage;

pub use dependencies::{count_global, count_in_country, count_in_province, CountMode, DependencyIndex};
pub use eligibility::{evaluate, EntryVerdict, EvaluationContext, LookupError};
pub use usage::{consumes, count_usage, exhausted_limit, Exhausted};
