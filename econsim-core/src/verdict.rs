//! Evaluation results.
//!
//! A [`Verdict`] is the ordered list of everything that blocks a building.
//! Blocking is never an error: each failed check contributes one
//! [`BlockReason`] and the building is active exactly when none were found.

use crate::diplomacy::LimitScope;
use crate::state::{BuildingId, CompanyId, CountryId, OwnerKind};
use crate::traits::TraitCategory;
use serde::{Deserialize, Serialize};

/// Scope of a building dependency count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountScope {
    Province,
    Country,
    Global,
}

impl std::fmt::Display for CountScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Province => write!(f, "province"),
            Self::Country => write!(f, "country"),
            Self::Global => write!(f, "world"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Radiation,
    Pollution,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Radiation => write!(f, "radiation"),
            Self::Pollution => write!(f, "pollution"),
        }
    }
}

/// Why a building may not exist or operate where it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BlockReason {
    /// Flat trait criteria for a category failed.
    TraitMismatch { category: TraitCategory },
    /// The requirement logic tree evaluated to false.
    LogicUnsatisfied,
    /// None of the acceptable resources is present.
    MissingResource { any_of: Vec<String> },
    /// A forbidden resource is present.
    ForbiddenResource { present: Vec<String> },
    EnvironmentOutOfRange {
        metric: Environment,
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    },
    TooFewBuildings {
        building_id: BuildingId,
        scope: CountScope,
        required: u32,
        found: u32,
    },
    TooManyBuildings {
        building_id: BuildingId,
        scope: CountScope,
        allowed: u32,
        found: u32,
    },
    CountryNotAllowed { country_id: Option<CountryId> },
    CompanyNotAllowed { company_id: CompanyId },
    /// No agreement lets the guest build in the host's provinces.
    NoDiplomaticPermission {
        host: Option<CountryId>,
        guest: Option<CountryId>,
    },
    /// Agreements exist but none admits this owner type or company.
    OwnerNotCovered {
        host: CountryId,
        guest: CountryId,
        owner: OwnerKind,
    },
    /// Agreements admit the owner but exclude this province, building or industry.
    TermsExclude { host: CountryId, guest: CountryId },
    UsageLimitReached {
        host: CountryId,
        guest: CountryId,
        scope: LimitScope,
        limit: u32,
        used: u32,
    },
}

impl std::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TraitMismatch { category } => write!(f, "{} mismatch", category),
            Self::LogicUnsatisfied => write!(f, "Province does not meet building requirements"),
            Self::MissingResource { any_of } => {
                write!(f, "Requires one of resources: {}", any_of.join(", "))
            }
            Self::ForbiddenResource { present } => {
                write!(f, "Forbidden resources present: {}", present.join(", "))
            }
            Self::EnvironmentOutOfRange {
                metric,
                value,
                min,
                max,
            } => {
                write!(f, "{} {} outside allowed range", metric, value)?;
                match (min, max) {
                    (Some(lo), Some(hi)) => write!(f, " [{}, {}]", lo, hi),
                    (Some(lo), None) => write!(f, " (min {})", lo),
                    (None, Some(hi)) => write!(f, " (max {})", hi),
                    (None, None) => Ok(()),
                }
            }
            Self::TooFewBuildings {
                building_id,
                scope,
                required,
                found,
            } => write!(
                f,
                "Requires at least {} {} in {} (have {})",
                required, building_id, scope, found
            ),
            Self::TooManyBuildings {
                building_id,
                scope,
                allowed,
                found,
            } => write!(
                f,
                "Allows at most {} {} in {} (have {})",
                allowed, building_id, scope, found
            ),
            Self::CountryNotAllowed { country_id } => match country_id {
                Some(c) => write!(f, "Country {} not allowed", c),
                None => write!(f, "Owner country unknown"),
            },
            Self::CompanyNotAllowed { company_id } => {
                write!(f, "Company {} not allowed", company_id)
            }
            Self::NoDiplomaticPermission { host, guest } => write!(
                f,
                "No diplomatic permission for {} in {}",
                guest.as_deref().unwrap_or("unknown country"),
                host.as_deref().unwrap_or("unowned territory")
            ),
            Self::OwnerNotCovered { host, guest, owner } => write!(
                f,
                "Agreements from {} to {} do not cover {} owners",
                host, guest, owner
            ),
            Self::TermsExclude { host, guest } => write!(
                f,
                "Agreements from {} to {} exclude this province, building or industry",
                host, guest
            ),
            Self::UsageLimitReached {
                host,
                guest,
                scope,
                limit,
                used,
            } => write!(
                f,
                "Agreement {} -> {} {} limit reached ({}/{})",
                host, guest, scope, used, limit
            ),
        }
    }
}

/// Outcome of evaluating one building placement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub reasons: Vec<BlockReason>,
}

impl Verdict {
    pub fn active() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.reasons.is_empty()
    }

    pub fn push(&mut self, reason: BlockReason) {
        self.reasons.push(reason);
    }

    /// Reasons rendered for display.
    pub fn messages(&self) -> Vec<String> {
        self.reasons.iter().map(ToString::to_string).collect()
    }
}
