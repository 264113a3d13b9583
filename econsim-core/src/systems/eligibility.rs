//! Building eligibility: can this building stand here under this owner?
//!
//! One evaluator runs every check in a fixed order and collects a
//! [`BlockReason`] for each failure:
//!
//! 1. trait criteria, or the requirement logic tree when present
//! 2. resources
//! 3. radiation and pollution ranges
//! 4. building dependencies
//! 5. country and company access lists
//! 6. diplomacy, when the owner is foreign to the province
//!
//! An [`EvaluationContext`] resolves agreements and indexes dependency counts
//! once, then answers any number of queries against the same snapshot.

use crate::buildings::{BuildingDef, Range, Requirements};
use crate::config::EngineConfig;
use crate::diplomacy::{self, DiplomacyAgreement};
use crate::state::{Entry, EntryRef, Owner, Province, World};
use crate::systems::dependencies::{check_dependency, CountMode, DependencyIndex};
use crate::systems::usage::{exhausted_limit, Exhausted};
use crate::traits::TraitCategory;
use crate::verdict::{BlockReason, Environment, Verdict};
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

/// A caller asked about an id the snapshot does not contain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Unknown province: {0}")]
    UnknownProvince(String),
    #[error("Unknown building: {0}")]
    UnknownBuilding(String),
}

/// Verdict for an entry already placed in the world.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryVerdict {
    pub entry: EntryRef,
    pub building_id: String,
    pub owner: Owner,
    pub built: bool,
    pub verdict: Verdict,
}

/// Evaluate a single placement against `world`.
///
/// Builds a fresh [`EvaluationContext`]; prefer one context per batch when
/// evaluating many placements.
pub fn evaluate(building: &BuildingDef, province: &Province, owner: &Owner, world: &World) -> Verdict {
    EvaluationContext::new(world).evaluate(building, province, owner)
}

/// Per-batch view over a world snapshot.
pub struct EvaluationContext<'a> {
    world: &'a World,
    config: EngineConfig,
    agreements: Vec<DiplomacyAgreement>,
    index: DependencyIndex<'a>,
}

/// How far the best agreement got before failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum AgreementStage {
    OwnerNotCovered,
    TermsExclude,
    LimitReached,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(world: &'a World) -> Self {
        Self::with_config(world, world.config.clone())
    }

    #[instrument(skip_all, name = "evaluation_context")]
    pub fn with_config(world: &'a World, config: EngineConfig) -> Self {
        let agreements = diplomacy::resolve(&world.agreements, world.turn);
        log::debug!(
            "turn {}: {} raw agreements resolved to {} directional",
            world.turn,
            world.agreements.len(),
            agreements.len()
        );
        let mode = CountMode::from_config(config.dependencies_include_construction);
        let index = DependencyIndex::build(world, mode);
        Self {
            world,
            config,
            agreements,
            index,
        }
    }

    pub fn world(&self) -> &'a World {
        self.world
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Expanded, unexpired agreements.
    pub fn agreements(&self) -> &[DiplomacyAgreement] {
        &self.agreements
    }

    /// Would `building` be active in `province` under `owner`?
    pub fn evaluate(&self, building: &BuildingDef, province: &Province, owner: &Owner) -> Verdict {
        self.evaluate_excluding(building, province, owner, None)
    }

    /// Evaluate by id, for callers holding only identifiers.
    pub fn evaluate_ids(
        &self,
        province_id: &str,
        building_id: &str,
        owner: &Owner,
    ) -> Result<Verdict, LookupError> {
        let province = self
            .world
            .province(province_id)
            .ok_or_else(|| LookupError::UnknownProvince(province_id.to_string()))?;
        let building = self
            .world
            .building(building_id)
            .ok_or_else(|| LookupError::UnknownBuilding(building_id.to_string()))?;
        Ok(self.evaluate(building, province, owner))
    }

    /// Re-check an entry that already exists; it does not count against its
    /// own agreement's usage.
    pub fn evaluate_entry(&self, entry: &Entry<'_>) -> Verdict {
        match self.world.building(entry.building_id) {
            Some(building) => self.evaluate_excluding(
                building,
                entry.province,
                entry.owner,
                Some(&entry.entry_ref()),
            ),
            None => {
                log::warn!(
                    "building {} in province {} missing from catalog",
                    entry.building_id,
                    entry.province.id
                );
                Verdict::active()
            }
        }
    }

    /// Verdicts for every built and in-progress entry in the world.
    #[instrument(skip_all, name = "audit")]
    pub fn audit(&self) -> Vec<EntryVerdict> {
        let verdicts: Vec<_> = self
            .world
            .entries()
            .map(|entry| EntryVerdict {
                verdict: self.evaluate_entry(&entry),
                entry: entry.entry_ref(),
                building_id: entry.building_id.clone(),
                owner: entry.owner.clone(),
                built: entry.is_built(),
            })
            .collect();
        log::debug!(
            "audited {} entries, {} inactive",
            verdicts.len(),
            verdicts.iter().filter(|v| !v.verdict.is_active()).count()
        );
        verdicts
    }

    /// Provinces where `building` would be active under `owner`.
    pub fn eligible_provinces(&self, building: &BuildingDef, owner: &Owner) -> Vec<&'a Province> {
        self.world
            .provinces
            .iter()
            .filter(|p| self.evaluate(building, p, owner).is_active())
            .collect()
    }

    fn evaluate_excluding(
        &self,
        building: &BuildingDef,
        province: &Province,
        owner: &Owner,
        exclude: Option<&EntryRef>,
    ) -> Verdict {
        let mut verdict = Verdict::default();
        let Some(reqs) = &building.requirements else {
            return verdict;
        };

        check_traits(&mut verdict, reqs, province);
        check_resources(&mut verdict, reqs, province);
        check_environment(&mut verdict, Environment::Radiation, reqs.radiation, province.radiation);
        check_environment(&mut verdict, Environment::Pollution, reqs.pollution, province.pollution);

        let country = self.world.owner_country(owner);
        for (dependency, bounds) in reqs.dependency_bounds() {
            check_dependency(&mut verdict, &self.index, &dependency, &bounds, province, country);
        }

        check_access(&mut verdict, reqs, owner, country);
        self.check_diplomacy(&mut verdict, building, province, owner, exclude);

        if !verdict.is_active() {
            log::debug!(
                "{} in {} for {}: {} blocking reason(s)",
                building.id,
                province.id,
                owner,
                verdict.reasons.len()
            );
        }
        verdict
    }

    fn check_diplomacy(
        &self,
        verdict: &mut Verdict,
        building: &BuildingDef,
        province: &Province,
        owner: &Owner,
        exclude: Option<&EntryRef>,
    ) {
        let guest = self.world.owner_country(owner);
        let Some(host) = province.owner_country_id.as_deref() else {
            if self.config.check_diplomacy_for_unowned {
                verdict.push(BlockReason::NoDiplomaticPermission {
                    host: None,
                    guest: guest.map(str::to_string),
                });
            }
            return;
        };
        if guest == Some(host) {
            return;
        }

        let candidates: Vec<_> = match guest {
            Some(guest) => diplomacy::between(&self.agreements, host, guest).collect(),
            None => Vec::new(),
        };
        let (Some(guest), false) = (guest, candidates.is_empty()) else {
            verdict.push(BlockReason::NoDiplomaticPermission {
                host: Some(host.to_string()),
                guest: guest.map(str::to_string),
            });
            return;
        };

        let industry = building.industry_id.as_deref();
        let mut stage = AgreementStage::OwnerNotCovered;
        let mut first_exhausted: Option<Exhausted> = None;

        for agreement in candidates {
            let terms = &agreement.terms;
            if !terms.covers_owner(owner.kind(), owner.company_id()) {
                continue;
            }
            stage = stage.max(AgreementStage::TermsExclude);
            if !(terms.permits_province(&province.id)
                && terms.permits_building(&building.id)
                && terms.permits_industry(industry))
            {
                continue;
            }
            match exhausted_limit(self.world, agreement, province, exclude) {
                None => return,
                Some(exhausted) => {
                    stage = AgreementStage::LimitReached;
                    first_exhausted.get_or_insert(exhausted);
                }
            }
        }

        let (host, guest) = (host.to_string(), guest.to_string());
        let reason = match (stage, first_exhausted) {
            (AgreementStage::LimitReached, Some(Exhausted { scope, limit, used })) => {
                BlockReason::UsageLimitReached {
                    host,
                    guest,
                    scope,
                    limit,
                    used,
                }
            }
            (AgreementStage::OwnerNotCovered, _) => BlockReason::OwnerNotCovered {
                host,
                guest,
                owner: owner.kind(),
            },
            _ => BlockReason::TermsExclude { host, guest },
        };
        verdict.push(reason);
    }
}

fn check_traits(verdict: &mut Verdict, reqs: &Requirements, province: &Province) {
    if let Some(logic) = &reqs.logic {
        if !logic.evaluate(province) {
            verdict.push(BlockReason::LogicUnsatisfied);
        }
        return;
    }
    for category in TraitCategory::ALL {
        if !reqs
            .trait_criteria(category)
            .matches(province.trait_value(category))
        {
            verdict.push(BlockReason::TraitMismatch { category });
        }
    }
}

fn check_resources(verdict: &mut Verdict, reqs: &Requirements, province: &Province) {
    let Some(resources) = &reqs.resources else {
        return;
    };
    let has = |r: &String| province.resource_amount(r) > 0.0;
    if !resources.any_of.is_empty() && !resources.any_of.iter().any(has) {
        verdict.push(BlockReason::MissingResource {
            any_of: resources.any_of.clone(),
        });
    }
    let present: Vec<String> = resources.none_of.iter().filter(|r| has(*r)).cloned().collect();
    if !present.is_empty() {
        verdict.push(BlockReason::ForbiddenResource { present });
    }
}

/// Absent measurements read as zero.
fn check_environment(
    verdict: &mut Verdict,
    metric: Environment,
    range: Option<Range>,
    value: Option<f64>,
) {
    let Some(range) = range else {
        return;
    };
    let value = value.unwrap_or(0.0);
    if !range.contains(value) {
        verdict.push(BlockReason::EnvironmentOutOfRange {
            metric,
            value,
            min: range.min,
            max: range.max,
        });
    }
}

fn check_access(verdict: &mut Verdict, reqs: &Requirements, owner: &Owner, country: Option<&str>) {
    if let Some(countries) = &reqs.countries {
        if !countries.permits(country) {
            verdict.push(BlockReason::CountryNotAllowed {
                country_id: country.map(str::to_string),
            });
        }
    }
    if let Some(companies) = &reqs.companies {
        match owner {
            Owner::State { .. } => {}
            Owner::Company { company_id } => {
                if !companies.permits(Some(company_id)) {
                    verdict.push(BlockReason::CompanyNotAllowed {
                        company_id: company_id.clone(),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buildings::{AccessList, AccessMode, CountBounds, ResourceCriteria, ScopedBounds};
    use crate::diplomacy::{AgreementTerms, LimitScope, UsageLimits};
    use crate::logic::{LogicOp, RequirementNode};
    use crate::state::OwnerKind;
    use crate::testing::WorldBuilder;
    use crate::traits::TraitCriteria;
    use crate::verdict::CountScope;

    fn desert_only() -> BuildingDef {
        BuildingDef {
            requirements: Some(Requirements {
                climate: Some(TraitCriteria::any_of(["desert"])),
                ..Default::default()
            }),
            ..BuildingDef::new("solar_farm")
        }
    }

    fn company_agreement(limits: UsageLimits) -> DiplomacyAgreement {
        DiplomacyAgreement::new("A", "G").with_terms(AgreementTerms {
            allow_companies: Some(true),
            allow_state: Some(false),
            limits,
            ..Default::default()
        })
    }

    #[test]
    fn test_no_requirements_always_active() {
        let world = WorldBuilder::new()
            .with_province("p1", Some("A"))
            .with_company("gco", "G")
            .build();
        let building = BuildingDef::new("hut");
        let province = world.province("p1").unwrap();

        for owner in [Owner::state("A"), Owner::company("gco"), Owner::company("ghost")] {
            let verdict = evaluate(&building, province, &owner, &world);
            assert!(verdict.is_active());
            assert!(verdict.reasons.is_empty());
        }
    }

    #[test]
    fn test_climate_scenario() {
        let mut world = WorldBuilder::new()
            .with_country("A")
            .with_province_traits("p1", Some("A"), TraitCategory::Climate, "desert")
            .build();
        let building = desert_only();

        let province = world.province("p1").unwrap().clone();
        let verdict = evaluate(&building, &province, &Owner::state("A"), &world);
        assert!(verdict.is_active());

        world.provinces[0].climate_id = Some("tundra".into());
        let province = world.province("p1").unwrap();
        let verdict = evaluate(&building, province, &Owner::state("A"), &world);
        assert!(!verdict.is_active());
        assert_eq!(
            verdict.reasons,
            vec![BlockReason::TraitMismatch {
                category: TraitCategory::Climate
            }]
        );
        assert_eq!(verdict.messages(), vec!["climate mismatch".to_string()]);
    }

    #[test]
    fn test_foreign_company_without_agreement() {
        let world = WorldBuilder::new()
            .with_company("gco", "G")
            .with_province_traits("p1", Some("A"), TraitCategory::Climate, "desert")
            .build();
        let province = world.province("p1").unwrap();
        let verdict = evaluate(&desert_only(), province, &Owner::company("gco"), &world);
        assert_eq!(
            verdict.reasons,
            vec![BlockReason::NoDiplomaticPermission {
                host: Some("A".into()),
                guest: Some("G".into()),
            }]
        );
    }

    #[test]
    fn test_domestic_company_skips_diplomacy() {
        let world = WorldBuilder::new()
            .with_company("aco", "A")
            .with_province_traits("p1", Some("A"), TraitCategory::Climate, "desert")
            .build();
        let province = world.province("p1").unwrap();
        assert!(evaluate(&desert_only(), province, &Owner::company("aco"), &world).is_active());
    }

    #[test]
    fn test_unknown_company_fails_closed() {
        let world = WorldBuilder::new()
            .with_province("p1", Some("A"))
            .with_agreement(company_agreement(UsageLimits::default()))
            .build();
        let building = BuildingDef {
            requirements: Some(Requirements::default()),
            ..BuildingDef::new("mine")
        };
        let province = world.province("p1").unwrap();
        let verdict = evaluate(&building, province, &Owner::company("ghost"), &world);
        assert_eq!(
            verdict.reasons,
            vec![BlockReason::NoDiplomaticPermission {
                host: Some("A".into()),
                guest: None,
            }]
        );
    }

    #[test]
    fn test_global_limit_scenario() {
        let building = BuildingDef {
            requirements: Some(Requirements::default()),
            ..BuildingDef::new("mine")
        };
        let limited = company_agreement(UsageLimits {
            global: Some(1),
            ..Default::default()
        });
        let world = WorldBuilder::new()
            .with_company("gco", "G")
            .with_building(building.clone())
            .with_province("p1", Some("A"))
            .with_province("p2", Some("A"))
            .with_built("p1", "mine", Owner::company("gco"))
            .with_agreement(limited)
            .build();
        let ctx = EvaluationContext::new(&world);

        let p2 = world.province("p2").unwrap();
        let verdict = ctx.evaluate(&building, p2, &Owner::company("gco"));
        assert_eq!(
            verdict.reasons,
            vec![BlockReason::UsageLimitReached {
                host: "A".into(),
                guest: "G".into(),
                scope: LimitScope::Global,
                limit: 1,
                used: 1,
            }]
        );

        // The existing entry itself stays active
        let audit = ctx.audit();
        assert_eq!(audit.len(), 1);
        assert!(audit[0].verdict.is_active());

        // No global cap: never rejects on that basis
        let world = WorldBuilder::new()
            .with_company("gco", "G")
            .with_province("p1", Some("A"))
            .with_province("p2", Some("A"))
            .with_built("p1", "mine", Owner::company("gco"))
            .with_agreement(company_agreement(UsageLimits::default()))
            .build();
        let p2 = world.province("p2").unwrap();
        assert!(evaluate(&building, p2, &Owner::company("gco"), &world).is_active());
    }

    #[test]
    fn test_distinct_diplomacy_reasons() {
        let building = BuildingDef {
            requirements: Some(Requirements::default()),
            industry_id: Some("mining".into()),
            ..BuildingDef::new("mine")
        };
        let base = WorldBuilder::new()
            .with_company("gco", "G")
            .with_province("p1", Some("A"));

        // State-only agreement, company candidate
        let state_only = DiplomacyAgreement::new("A", "G").with_terms(AgreementTerms {
            allow_state: Some(true),
            allow_companies: Some(false),
            ..Default::default()
        });
        let world = base.clone().with_agreement(state_only).build();
        let p1 = world.province("p1").unwrap();
        assert_eq!(
            evaluate(&building, p1, &Owner::company("gco"), &world).reasons,
            vec![BlockReason::OwnerNotCovered {
                host: "A".into(),
                guest: "G".into(),
                owner: OwnerKind::Company,
            }]
        );
        // The same agreement admits G's state
        assert!(evaluate(&building, p1, &Owner::state("G"), &world).is_active());

        // Covered owner, wrong industry
        let farming = DiplomacyAgreement::new("A", "G").with_terms(AgreementTerms {
            industry_ids: vec!["farming".into()],
            ..Default::default()
        });
        let world = base.clone().with_agreement(farming).build();
        let p1 = world.province("p1").unwrap();
        assert_eq!(
            evaluate(&building, p1, &Owner::company("gco"), &world).reasons,
            vec![BlockReason::TermsExclude {
                host: "A".into(),
                guest: "G".into(),
            }]
        );
    }

    #[test]
    fn test_any_usable_agreement_admits() {
        let building = BuildingDef {
            requirements: Some(Requirements::default()),
            ..BuildingDef::new("mine")
        };
        let world = WorldBuilder::new()
            .with_company("gco", "G")
            .with_province("p1", Some("A"))
            .with_built("p1", "mine", Owner::company("gco"))
            .with_agreement(company_agreement(UsageLimits {
                per_province: Some(1),
                ..Default::default()
            }))
            .with_agreement(company_agreement(UsageLimits::default()))
            .build();
        let p1 = world.province("p1").unwrap();
        assert!(evaluate(&building, p1, &Owner::company("gco"), &world).is_active());
    }

    #[test]
    fn test_counter_terms_grant_reverse_access() {
        let building = BuildingDef {
            requirements: Some(Requirements::default()),
            ..BuildingDef::new("mine")
        };
        let pact = DiplomacyAgreement {
            counter_terms: Some(AgreementTerms {
                allow_state: Some(true),
                ..Default::default()
            }),
            ..DiplomacyAgreement::new("A", "G")
        };
        let world = WorldBuilder::new()
            .with_province("pg", Some("G"))
            .with_agreement(pact)
            .build();
        let pg = world.province("pg").unwrap();
        assert!(evaluate(&building, pg, &Owner::state("A"), &world).is_active());
    }

    #[test]
    fn test_expired_agreement_ignored() {
        let building = BuildingDef {
            requirements: Some(Requirements::default()),
            ..BuildingDef::new("mine")
        };
        let temporary = DiplomacyAgreement {
            duration_turns: Some(5),
            start_turn: Some(0),
            ..DiplomacyAgreement::new("A", "G")
        };
        let world = WorldBuilder::new()
            .turn(5)
            .with_province("p1", Some("A"))
            .with_agreement(temporary)
            .build();
        let p1 = world.province("p1").unwrap();
        let verdict = evaluate(&building, p1, &Owner::state("G"), &world);
        assert!(matches!(
            verdict.reasons.as_slice(),
            [BlockReason::NoDiplomaticPermission { .. }]
        ));
    }

    #[test]
    fn test_all_failures_reported_in_order() {
        let mut deps = std::collections::BTreeMap::new();
        deps.insert(
            "power_plant".to_string(),
            ScopedBounds {
                province: Some(CountBounds {
                    min: Some(1),
                    max: None,
                }),
                ..Default::default()
            },
        );
        let building = BuildingDef {
            requirements: Some(Requirements {
                climate: Some(TraitCriteria::any_of(["desert"])),
                resources: Some(ResourceCriteria {
                    any_of: vec!["oil".into()],
                    none_of: vec!["water".into()],
                }),
                radiation: Some(Range {
                    min: None,
                    max: Some(1.0),
                }),
                buildings: deps,
                countries: Some(AccessList {
                    mode: AccessMode::Deny,
                    ids: vec!["G".into()],
                }),
                ..Default::default()
            }),
            ..BuildingDef::new("refinery")
        };
        let world = WorldBuilder::new()
            .with_province_traits("p1", Some("A"), TraitCategory::Climate, "tundra")
            .with_resource("p1", "water", 3.0)
            .with_radiation("p1", 4.0)
            .build();
        let p1 = world.province("p1").unwrap();
        let verdict = evaluate(&building, p1, &Owner::state("G"), &world);

        assert_eq!(
            verdict.reasons,
            vec![
                BlockReason::TraitMismatch {
                    category: TraitCategory::Climate
                },
                BlockReason::MissingResource {
                    any_of: vec!["oil".into()]
                },
                BlockReason::ForbiddenResource {
                    present: vec!["water".into()]
                },
                BlockReason::EnvironmentOutOfRange {
                    metric: Environment::Radiation,
                    value: 4.0,
                    min: None,
                    max: Some(1.0),
                },
                BlockReason::TooFewBuildings {
                    building_id: "power_plant".into(),
                    scope: CountScope::Province,
                    required: 1,
                    found: 0,
                },
                BlockReason::CountryNotAllowed {
                    country_id: Some("G".into())
                },
                BlockReason::NoDiplomaticPermission {
                    host: Some("A".into()),
                    guest: Some("G".into()),
                },
            ]
        );
    }

    #[test]
    fn test_logic_tree_replaces_flat_criteria() {
        let building = BuildingDef {
            requirements: Some(Requirements {
                climate: Some(TraitCriteria::any_of(["desert"])),
                logic: Some(RequirementNode::group(
                    LogicOp::Or,
                    vec![
                        RequirementNode::leaf(TraitCategory::Climate, "tundra"),
                        RequirementNode::leaf(TraitCategory::Climate, "taiga"),
                    ],
                )),
                ..Default::default()
            }),
            ..BuildingDef::new("sawmill")
        };
        let world = WorldBuilder::new()
            .with_province_traits("p1", Some("A"), TraitCategory::Climate, "tundra")
            .with_province_traits("p2", Some("A"), TraitCategory::Climate, "desert")
            .build();
        let owner = Owner::state("A");

        assert!(evaluate(&building, world.province("p1").unwrap(), &owner, &world).is_active());
        assert_eq!(
            evaluate(&building, world.province("p2").unwrap(), &owner, &world).reasons,
            vec![BlockReason::LogicUnsatisfied]
        );
    }

    #[test]
    fn test_company_access_list_ignores_states() {
        let building = BuildingDef {
            requirements: Some(Requirements {
                companies: Some(AccessList {
                    mode: AccessMode::Allow,
                    ids: vec!["aco".into()],
                }),
                ..Default::default()
            }),
            ..BuildingDef::new("bank")
        };
        let world = WorldBuilder::new()
            .with_company("aco", "A")
            .with_company("bco", "A")
            .with_province("p1", Some("A"))
            .build();
        let p1 = world.province("p1").unwrap();

        assert!(evaluate(&building, p1, &Owner::state("A"), &world).is_active());
        assert!(evaluate(&building, p1, &Owner::company("aco"), &world).is_active());
        assert_eq!(
            evaluate(&building, p1, &Owner::company("bco"), &world).reasons,
            vec![BlockReason::CompanyNotAllowed {
                company_id: "bco".into()
            }]
        );
    }

    #[test]
    fn test_unowned_province_config() {
        let building = BuildingDef {
            requirements: Some(Requirements::default()),
            ..BuildingDef::new("outpost")
        };
        let world = WorldBuilder::new().with_province("wild", None).build();
        let wild = world.province("wild").unwrap();
        let owner = Owner::state("A");

        assert!(EvaluationContext::new(&world)
            .evaluate(&building, wild, &owner)
            .is_active());

        let strict = EngineConfig {
            check_diplomacy_for_unowned: true,
            ..Default::default()
        };
        let verdict = EvaluationContext::with_config(&world, strict).evaluate(&building, wild, &owner);
        assert_eq!(
            verdict.reasons,
            vec![BlockReason::NoDiplomaticPermission {
                host: None,
                guest: Some("A".into()),
            }]
        );
    }

    #[test]
    fn test_dependencies_config_counts_construction() {
        let building = BuildingDef {
            requirements: Some(Requirements {
                dependencies: vec!["power_plant".into()],
                ..Default::default()
            }),
            ..BuildingDef::new("factory")
        };
        let world = WorldBuilder::new()
            .with_province("p1", Some("A"))
            .with_construction("p1", "power_plant", Owner::state("A"))
            .build();
        let p1 = world.province("p1").unwrap();
        let owner = Owner::state("A");

        assert!(!EvaluationContext::new(&world)
            .evaluate(&building, p1, &owner)
            .is_active());

        let config = EngineConfig {
            dependencies_include_construction: true,
            ..Default::default()
        };
        assert!(EvaluationContext::with_config(&world, config)
            .evaluate(&building, p1, &owner)
            .is_active());
    }

    #[test]
    fn test_dependencies_counted_on_supplied_province() {
        let building = BuildingDef {
            requirements: Some(Requirements {
                dependencies: vec!["power_plant".into()],
                ..Default::default()
            }),
            ..BuildingDef::new("factory")
        };
        let world = WorldBuilder::new()
            .with_province_state(Province {
                id: "p1".into(),
                owner_country_id: Some("A".into()),
                ..Default::default()
            })
            .build();
        let owner = Owner::state("A");

        let p1 = world.province("p1").unwrap();
        assert_eq!(
            evaluate(&building, p1, &owner, &world).reasons,
            vec![BlockReason::TooFewBuildings {
                building_id: "power_plant".into(),
                scope: CountScope::Province,
                required: 1,
                found: 0,
            }]
        );

        // A planned copy of p1 carries the plant the world lacks
        let mut planned = p1.clone();
        planned.buildings.push(crate::state::BuildingInstance {
            building_id: "power_plant".into(),
            owner: owner.clone(),
        });
        assert!(evaluate(&building, &planned, &owner, &world).is_active());
    }

    #[test]
    fn test_missing_environment_reads_as_zero() {
        let building = BuildingDef {
            requirements: Some(Requirements {
                radiation: Some(Range {
                    min: Some(1.0),
                    max: None,
                }),
                pollution: Some(Range {
                    min: Some(1.0),
                    max: None,
                }),
                ..Default::default()
            }),
            ..BuildingDef::new("reprocessor")
        };
        let world = WorldBuilder::new().with_province("p1", Some("A")).build();
        let p1 = world.province("p1").unwrap();

        assert_eq!(
            evaluate(&building, p1, &Owner::state("A"), &world).reasons,
            vec![
                BlockReason::EnvironmentOutOfRange {
                    metric: Environment::Radiation,
                    value: 0.0,
                    min: Some(1.0),
                    max: None,
                },
                BlockReason::EnvironmentOutOfRange {
                    metric: Environment::Pollution,
                    value: 0.0,
                    min: Some(1.0),
                    max: None,
                },
            ]
        );
    }

    #[test]
    fn test_environment_ranges() {
        let building = BuildingDef {
            requirements: Some(Requirements {
                radiation: Some(Range {
                    min: Some(1.0),
                    max: Some(3.0),
                }),
                pollution: Some(Range {
                    min: None,
                    max: Some(5.0),
                }),
                ..Default::default()
            }),
            ..BuildingDef::new("scrubber")
        };
        let world = WorldBuilder::new()
            .with_province("low", Some("A"))
            .with_radiation("low", 0.5)
            .with_pollution("low", 2.0)
            .with_province("dirty", Some("A"))
            .with_radiation("dirty", 2.0)
            .with_pollution("dirty", 7.5)
            .with_province("edge", Some("A"))
            .with_radiation("edge", 1.0)
            .with_pollution("edge", 5.0)
            .build();
        let owner = Owner::state("A");

        assert_eq!(
            evaluate(&building, world.province("low").unwrap(), &owner, &world).reasons,
            vec![BlockReason::EnvironmentOutOfRange {
                metric: Environment::Radiation,
                value: 0.5,
                min: Some(1.0),
                max: Some(3.0),
            }]
        );
        assert_eq!(
            evaluate(&building, world.province("dirty").unwrap(), &owner, &world).reasons,
            vec![BlockReason::EnvironmentOutOfRange {
                metric: Environment::Pollution,
                value: 7.5,
                min: None,
                max: Some(5.0),
            }]
        );
        // Bounds are inclusive
        assert!(evaluate(&building, world.province("edge").unwrap(), &owner, &world).is_active());
    }

    #[test]
    fn test_zero_quantity_resource_is_absent() {
        let building = BuildingDef {
            requirements: Some(Requirements {
                resources: Some(ResourceCriteria {
                    any_of: vec!["oil".into()],
                    none_of: vec!["water".into()],
                }),
                ..Default::default()
            }),
            ..BuildingDef::new("well")
        };
        let world = WorldBuilder::new()
            .with_province("dry", Some("A"))
            .with_resource("dry", "oil", 0.0)
            .with_resource("dry", "water", 0.0)
            .with_province("rich", Some("A"))
            .with_resource("rich", "oil", 2.0)
            .with_resource("rich", "water", 0.0)
            .build();
        let owner = Owner::state("A");

        assert_eq!(
            evaluate(&building, world.province("dry").unwrap(), &owner, &world).reasons,
            vec![BlockReason::MissingResource {
                any_of: vec!["oil".into()]
            }]
        );
        assert!(evaluate(&building, world.province("rich").unwrap(), &owner, &world).is_active());
    }

    #[test]
    fn test_eligible_provinces_and_lookup() {
        let world = WorldBuilder::new()
            .with_building(desert_only())
            .with_province_traits("p1", Some("A"), TraitCategory::Climate, "desert")
            .with_province_traits("p2", Some("A"), TraitCategory::Climate, "tundra")
            .with_province_traits("p3", Some("B"), TraitCategory::Climate, "desert")
            .build();
        let ctx = EvaluationContext::new(&world);
        let building = world.building("solar_farm").unwrap();

        let ids: Vec<_> = ctx
            .eligible_provinces(building, &Owner::state("A"))
            .into_iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["p1"]);

        assert!(ctx
            .evaluate_ids("p1", "solar_farm", &Owner::state("A"))
            .unwrap()
            .is_active());
        assert_eq!(
            ctx.evaluate_ids("nowhere", "solar_farm", &Owner::state("A")),
            Err(LookupError::UnknownProvince("nowhere".into()))
        );
        assert_eq!(
            ctx.evaluate_ids("p1", "castle", &Owner::state("A")),
            Err(LookupError::UnknownBuilding("castle".into()))
        );
    }
}
