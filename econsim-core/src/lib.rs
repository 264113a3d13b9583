//! # Economy Simulation Core
//!
//! Deterministic building eligibility rules for a turn-based strategy game.
//!
//! Given a province, a building and a prospective owner (a state or a
//! private company), the engine decides whether the building may exist or
//! operate there and lists every reason it may not. Nothing is mutated:
//! snapshots go in, a [`Verdict`] comes out.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌───────────────────┐     ┌─────────────┐
//! │ World       │────▶│ EvaluationContext │────▶│ Verdict     │
//! │ (snapshot)  │     │ (per batch)       │     │ (reasons)   │
//! └─────────────┘     └─────────┬─────────┘     └─────────────┘
//!                               │
//!          ┌──────────────┬─────┴────────┬──────────────┐
//!          ▼              ▼              ▼              ▼
//!     traits/logic   dependencies    diplomacy     usage limits
//! ```
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`World`] | Read-only snapshot (provinces, catalogs, agreements) |
//! | [`Owner`] | State- or company-owned, resolved to a country |
//! | [`Requirements`] | Placement constraints on a [`BuildingDef`] |
//! | [`EvaluationContext`] | Resolved agreements + dependency index for one batch |
//! | [`Verdict`] | Ordered [`BlockReason`]s; active when empty |
//!
//! ## Checks
//!
//! Evaluation runs trait criteria (or the [`RequirementNode`] tree),
//! resources, radiation/pollution, dependencies, access lists and finally
//! cross-border diplomacy. Every failing check adds one reason; evaluation
//! never stops early.

pub mod buildings;
pub mod config;
pub mod diplomacy;
pub mod logic;
pub mod snapshot;
pub mod state;
pub mod systems;
pub mod testing;
pub mod traits;
pub mod verdict;

pub use buildings::{AccessList, AccessMode, BuildingDef, CountBounds, Range, Requirements, ScopedBounds};
pub use config::EngineConfig;
pub use diplomacy::{AgreementTerms, DiplomacyAgreement, LimitScope, UsageLimits};
pub use logic::{LogicOp, RequirementNode};
pub use snapshot::{load_world, SnapshotError};
pub use state::{Entry, EntryRef, EntrySlot, Owner, OwnerKind, Province, World};
pub use systems::{evaluate, EntryVerdict, EvaluationContext, LookupError};
pub use traits::{TraitCategory, TraitCriteria};
pub use verdict::{BlockReason, CountScope, Verdict};
