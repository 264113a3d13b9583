//! Command-line front end for the eligibility engine.

pub mod report;

use clap::Args;
use econsim_core::{EngineConfig, Owner};

/// Exactly one prospective owner.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct OwnerArgs {
    /// Evaluate as the state of this country
    #[arg(long)]
    pub state: Option<String>,

    /// Evaluate as this company
    #[arg(long)]
    pub company: Option<String>,
}

impl OwnerArgs {
    pub fn owner(&self) -> Option<Owner> {
        match (&self.state, &self.company) {
            (Some(country), _) => Some(Owner::state(country.clone())),
            (None, Some(company)) => Some(Owner::company(company.clone())),
            (None, None) => None,
        }
    }
}

/// Engine switches that override the snapshot's embedded config.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Count buildings under construction towards dependencies
    #[arg(long)]
    pub count_construction: bool,

    /// Require diplomatic permission in unowned provinces
    #[arg(long)]
    pub strict_unowned: bool,
}

impl ConfigArgs {
    /// Flags only ever switch options on.
    pub fn apply(&self, mut config: EngineConfig) -> EngineConfig {
        config.dependencies_include_construction |= self.count_construction;
        config.check_diplomacy_for_unowned |= self.strict_unowned;
        config
    }
}
