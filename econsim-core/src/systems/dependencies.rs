//! Building dependency counting at province, country and world scope.
//!
//! The free functions scan the world directly. [`DependencyIndex`] computes
//! the country and world counts once per evaluation batch; province counts
//! always come from the province record being evaluated.

use crate::buildings::{CountBounds, ScopedBounds};
use crate::state::{Entry, Province, World};
use crate::verdict::{BlockReason, CountScope, Verdict};
use rustc_hash::FxHashMap;
use tracing::instrument;

/// Which entries a dependency count includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountMode {
    #[default]
    Built,
    BuiltAndConstruction,
}

impl CountMode {
    pub fn from_config(include_construction: bool) -> Self {
        if include_construction {
            Self::BuiltAndConstruction
        } else {
            Self::Built
        }
    }

    fn includes(self, entry: &Entry<'_>) -> bool {
        match self {
            Self::Built => entry.is_built(),
            Self::BuiltAndConstruction => true,
        }
    }
}

fn counted<'a>(
    province: &'a Province,
    building_id: &'a str,
    mode: CountMode,
) -> impl Iterator<Item = Entry<'a>> + 'a {
    province
        .entries()
        .filter(move |e| e.building_id == building_id && mode.includes(e))
}

/// Instances of `building_id` in one province.
pub fn count_in_province(province: &Province, building_id: &str, mode: CountMode) -> u32 {
    counted(province, building_id, mode).count() as u32
}

/// Instances of `building_id` anywhere whose owner resolves to `country_id`.
///
/// State- and company-owned instances both count. Instances owned by an
/// unknown company belong to no country.
pub fn count_in_country(world: &World, building_id: &str, country_id: &str, mode: CountMode) -> u32 {
    world
        .provinces
        .iter()
        .flat_map(|p| counted(p, building_id, mode))
        .filter(|e| world.owner_country(e.owner) == Some(country_id))
        .count() as u32
}

/// Instances of `building_id` in the whole world.
pub fn count_global(provinces: &[Province], building_id: &str, mode: CountMode) -> u32 {
    provinces
        .iter()
        .map(|p| count_in_province(p, building_id, mode))
        .sum()
}

/// Precomputed country and world counts for every building.
#[derive(Debug, Default)]
pub struct DependencyIndex<'a> {
    mode: CountMode,
    country: FxHashMap<(&'a str, &'a str), u32>,
    global: FxHashMap<&'a str, u32>,
}

impl<'a> DependencyIndex<'a> {
    #[instrument(skip_all, name = "dependency_index")]
    pub fn build(world: &'a World, mode: CountMode) -> Self {
        let mut index = Self {
            mode,
            ..Self::default()
        };
        for province in &world.provinces {
            for entry in province.entries().filter(|e| mode.includes(e)) {
                let building = entry.building_id.as_str();
                if let Some(country) = world.owner_country(entry.owner) {
                    *index.country.entry((country, building)).or_default() += 1;
                }
                *index.global.entry(building).or_default() += 1;
            }
        }
        log::trace!(
            "dependency index: {} country keys, {} buildings",
            index.country.len(),
            index.global.len()
        );
        index
    }

    pub fn mode(&self) -> CountMode {
        self.mode
    }

    /// Count for a country; an unresolved country has none.
    pub fn in_country(&self, country_id: Option<&str>, building_id: &str) -> u32 {
        country_id
            .and_then(|c| self.country.get(&(c, building_id)).copied())
            .unwrap_or(0)
    }

    pub fn global(&self, building_id: &str) -> u32 {
        self.global.get(building_id).copied().unwrap_or(0)
    }
}

fn check_bounds(
    verdict: &mut Verdict,
    building_id: &str,
    scope: CountScope,
    bounds: Option<&CountBounds>,
    found: u32,
) {
    let Some(bounds) = bounds else {
        return;
    };
    if let Some(required) = bounds.min {
        if found < required {
            verdict.push(BlockReason::TooFewBuildings {
                building_id: building_id.to_string(),
                scope,
                required,
                found,
            });
        }
    }
    if let Some(allowed) = bounds.max {
        if found > allowed {
            verdict.push(BlockReason::TooManyBuildings {
                building_id: building_id.to_string(),
                scope,
                allowed,
                found,
            });
        }
    }
}

/// Check one dependency's bounds at every scope it constrains.
///
/// The province scope is counted on `province` itself, which need not be
/// the world's copy of that province.
pub fn check_dependency(
    verdict: &mut Verdict,
    index: &DependencyIndex<'_>,
    building_id: &str,
    bounds: &ScopedBounds,
    province: &Province,
    country_id: Option<&str>,
) {
    if bounds.province.is_some() {
        let found = count_in_province(province, building_id, index.mode());
        check_bounds(verdict, building_id, CountScope::Province, bounds.province.as_ref(), found);
    }
    if bounds.country.is_some() {
        let found = index.in_country(country_id, building_id);
        check_bounds(verdict, building_id, CountScope::Country, bounds.country.as_ref(), found);
    }
    if bounds.global.is_some() {
        let found = index.global(building_id);
        check_bounds(verdict, building_id, CountScope::Global, bounds.global.as_ref(), found);
    }
}
