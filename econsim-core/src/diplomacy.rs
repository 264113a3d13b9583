//! Cross-border building agreements.
//!
//! An agreement lets a guest country (its state and/or its companies) place
//! buildings in provinces owned by a host country. Agreements may carry
//! counter terms describing what the guest grants back; [`expand`] turns those
//! into ordinary directional agreements so every lookup is a plain
//! `(host, guest)` match.

use crate::state::{
    BuildingId, CompanyId, CountryId, IndustryId, OwnerKind, ProvinceId, Turn,
};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Suffix appended to the id of a synthetic reciprocal agreement.
pub const COUNTER_SUFFIX: &str = ":counter";

/// Legacy single-kind marker used before the allow flags existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgreementKind {
    State,
    Company,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LimitScope {
    PerProvince,
    PerCountry,
    Global,
}

impl std::fmt::Display for LimitScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PerProvince => write!(f, "per-province"),
            Self::PerCountry => write!(f, "per-country"),
            Self::Global => write!(f, "global"),
        }
    }
}

/// Usage caps. `None` or `0` means unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsageLimits {
    pub per_province: Option<u32>,
    pub per_country: Option<u32>,
    pub global: Option<u32>,
}

impl UsageLimits {
    /// The cap for a scope, if bounded.
    pub fn get(&self, scope: LimitScope) -> Option<u32> {
        let raw = match scope {
            LimitScope::PerProvince => self.per_province,
            LimitScope::PerCountry => self.per_country,
            LimitScope::Global => self.global,
        };
        raw.filter(|&limit| limit > 0)
    }

    /// Bounded scopes in checking order.
    pub fn bounded(&self) -> impl Iterator<Item = (LimitScope, u32)> + '_ {
        [LimitScope::PerProvince, LimitScope::PerCountry, LimitScope::Global]
            .into_iter()
            .filter_map(|scope| self.get(scope).map(|limit| (scope, limit)))
    }
}

/// What a host grants a guest. Empty allow-lists admit everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgreementTerms {
    pub allow_state: Option<bool>,
    pub allow_companies: Option<bool>,
    pub kind: Option<AgreementKind>,
    pub company_ids: Vec<CompanyId>,
    pub building_ids: Vec<BuildingId>,
    pub province_ids: Vec<ProvinceId>,
    pub industry_ids: Vec<IndustryId>,
    pub limits: UsageLimits,
}

impl AgreementTerms {
    /// Explicit flag first, then the legacy `kind`; with neither, open to both.
    pub fn allows_state(&self) -> bool {
        self.allow_state
            .unwrap_or_else(|| self.kind.map_or(true, |k| k == AgreementKind::State))
    }

    pub fn allows_companies(&self) -> bool {
        self.allow_companies
            .unwrap_or_else(|| self.kind.map_or(true, |k| k == AgreementKind::Company))
    }

    /// Owner type and company allow-list check.
    pub fn covers_owner(&self, kind: OwnerKind, company_id: Option<&str>) -> bool {
        match kind {
            OwnerKind::State => self.allows_state(),
            OwnerKind::Company => {
                self.allows_companies()
                    && (self.company_ids.is_empty()
                        || company_id.is_some_and(|c| self.company_ids.iter().any(|x| x == c)))
            }
        }
    }

    pub fn permits_province(&self, province_id: &str) -> bool {
        self.province_ids.is_empty() || self.province_ids.iter().any(|p| p == province_id)
    }

    pub fn permits_building(&self, building_id: &str) -> bool {
        self.building_ids.is_empty() || self.building_ids.iter().any(|b| b == building_id)
    }

    /// A building without an industry fails a non-empty industry list.
    pub fn permits_industry(&self, industry_id: Option<&str>) -> bool {
        self.industry_ids.is_empty()
            || industry_id.is_some_and(|i| self.industry_ids.iter().any(|x| x == i))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiplomacyAgreement {
    pub id: Option<String>,
    pub host_country_id: CountryId,
    pub guest_country_id: CountryId,
    #[serde(flatten)]
    pub terms: AgreementTerms,
    pub duration_turns: Option<Turn>,
    pub start_turn: Option<Turn>,
    pub counter_terms: Option<AgreementTerms>,
}

impl DiplomacyAgreement {
    pub fn new(host: impl Into<CountryId>, guest: impl Into<CountryId>) -> Self {
        Self {
            host_country_id: host.into(),
            guest_country_id: guest.into(),
            ..Default::default()
        }
    }

    pub fn with_terms(mut self, terms: AgreementTerms) -> Self {
        self.terms = terms;
        self
    }

    /// The synthetic guest -> host agreement described by the counter terms.
    pub fn reciprocal(&self) -> Option<DiplomacyAgreement> {
        let counter = self.counter_terms.as_ref()?;
        Some(DiplomacyAgreement {
            id: self.id.as_ref().map(|id| format!("{id}{COUNTER_SUFFIX}")),
            host_country_id: self.guest_country_id.clone(),
            guest_country_id: self.host_country_id.clone(),
            terms: counter.clone(),
            duration_turns: self.duration_turns,
            start_turn: self.start_turn,
            counter_terms: None,
        })
    }

    /// Expired once `turn - start >= duration`. Without a positive duration or
    /// a recorded start the agreement is permanent.
    pub fn is_expired(&self, turn: Turn) -> bool {
        match (self.duration_turns, self.start_turn) {
            (Some(duration), Some(start)) if duration > 0 => {
                turn.saturating_sub(start) >= duration
            }
            _ => false,
        }
    }

    pub fn connects(&self, host: &str, guest: &str) -> bool {
        self.host_country_id == host && self.guest_country_id == guest
    }
}

/// Append a reciprocal agreement for every agreement carrying counter terms.
///
/// Reciprocals already present in the input are not added again, so
/// expanding an expanded list is a no-op. Duplicate agreements each get
/// their own reciprocal.
pub fn expand(agreements: &[DiplomacyAgreement]) -> Vec<DiplomacyAgreement> {
    let present: FxHashSet<&DiplomacyAgreement> = agreements.iter().collect();
    let reciprocals: Vec<_> = agreements
        .iter()
        .filter_map(DiplomacyAgreement::reciprocal)
        .filter(|r| !present.contains(r))
        .collect();
    let mut out = agreements.to_vec();
    out.extend(reciprocals);
    out
}

/// Drop agreements whose duration has run out at `turn`.
pub fn filter_active(agreements: Vec<DiplomacyAgreement>, turn: Turn) -> Vec<DiplomacyAgreement> {
    agreements
        .into_iter()
        .filter(|a| {
            let expired = a.is_expired(turn);
            if expired {
                log::trace!(
                    "agreement {} -> {} expired at turn {}",
                    a.host_country_id,
                    a.guest_country_id,
                    turn
                );
            }
            !expired
        })
        .collect()
}

/// Expand, then filter: the directional view every lookup runs against.
pub fn resolve(agreements: &[DiplomacyAgreement], turn: Turn) -> Vec<DiplomacyAgreement> {
    filter_active(expand(agreements), turn)
}

/// Agreements in which `host` grants terms to `guest`.
pub fn between<'a>(
    agreements: &'a [DiplomacyAgreement],
    host: &'a str,
    guest: &'a str,
) -> impl Iterator<Item = &'a DiplomacyAgreement> + 'a {
    agreements.iter().filter(move |a| a.connects(host, guest))
}
