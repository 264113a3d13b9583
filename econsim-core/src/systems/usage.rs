//! Usage limits on diplomacy agreements.
//!
//! An agreement's allowance is consumed by every built or in-progress entry
//! the agreement would cover: guest-owned, of an admitted owner type, in an
//! admitted province, of an admitted building and industry.

use crate::diplomacy::{DiplomacyAgreement, LimitScope};
use crate::state::{Entry, EntryRef, Province, World};

/// A bounded scope whose allowance is used up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exhausted {
    pub scope: LimitScope,
    pub limit: u32,
    pub used: u32,
}

/// Whether `entry` counts against `agreement`.
pub fn consumes(world: &World, agreement: &DiplomacyAgreement, entry: &Entry<'_>) -> bool {
    let terms = &agreement.terms;
    terms.covers_owner(entry.owner.kind(), entry.owner.company_id())
        && world.owner_country(entry.owner) == Some(agreement.guest_country_id.as_str())
        && terms.permits_province(&entry.province.id)
        && terms.permits_building(entry.building_id)
        && terms.permits_industry(world.industry_of(entry.building_id))
}

fn is_excluded(entry: &Entry<'_>, exclude: Option<&EntryRef>) -> bool {
    exclude.is_some_and(|ex| ex.province_id == entry.province.id && ex.slot == entry.slot)
}

/// Entries consuming `agreement` within `scope` around `province`.
///
/// `PerProvince` looks at `province` alone, `PerCountry` at every province
/// the host owns, `Global` at the whole world. `exclude` names an entry that
/// is being re-evaluated and must not count against itself.
pub fn count_usage(
    world: &World,
    agreement: &DiplomacyAgreement,
    scope: LimitScope,
    province: &Province,
    exclude: Option<&EntryRef>,
) -> u32 {
    let tally = |p: &Province| {
        p.entries()
            .filter(|e| !is_excluded(e, exclude) && consumes(world, agreement, e))
            .count() as u32
    };
    match scope {
        LimitScope::PerProvince => tally(province),
        LimitScope::PerCountry => world
            .provinces
            .iter()
            .filter(|p| p.is_owned_by(&agreement.host_country_id))
            .map(tally)
            .sum(),
        LimitScope::Global => world.provinces.iter().map(tally).sum(),
    }
}

/// First bounded scope with no room left for one more entry.
///
/// The candidate is not counted, so a limit of `n` admits a candidate while
/// fewer than `n` entries already consume the allowance.
pub fn exhausted_limit(
    world: &World,
    agreement: &DiplomacyAgreement,
    province: &Province,
    exclude: Option<&EntryRef>,
) -> Option<Exhausted> {
    agreement.terms.limits.bounded().find_map(|(scope, limit)| {
        let used = count_usage(world, agreement, scope, province, exclude);
        log::trace!(
            "agreement {} -> {} {} usage {}/{}",
            agreement.host_country_id,
            agreement.guest_country_id,
            scope,
            used,
            limit
        );
        (used >= limit).then_some(Exhausted { scope, limit, used })
    })
}
