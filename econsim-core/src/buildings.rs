//! Building definitions and their placement requirements.
//!
//! Definitions are immutable catalog entries shared across all provinces.
//! Every field of [`Requirements`] is optional; an absent field places no
//! constraint on where the building may stand.

use crate::logic::RequirementNode;
use crate::state::{BuildingId, CompanyId, CountryId, IndustryId, ResourceId};
use crate::traits::{TraitCategory, TraitCriteria};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Static building definition from the content catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildingDef {
    pub id: BuildingId,
    pub name: String,
    /// Construction points needed to finish.
    pub base_cost: f64,
    pub requirements: Option<Requirements>,
    /// Resource id -> units produced per turn.
    pub production: BTreeMap<ResourceId, f64>,
    /// Resource id -> units consumed per turn.
    pub consumption: BTreeMap<ResourceId, f64>,
    /// Resource id -> units extracted from the province per turn.
    pub extraction: BTreeMap<ResourceId, f64>,
    pub industry_id: Option<IndustryId>,
}

impl BuildingDef {
    pub fn new(id: impl Into<BuildingId>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            ..Default::default()
        }
    }
}

/// Placement constraints attached to a building.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Requirements {
    /// Replaces every flat trait criterion when present.
    pub logic: Option<RequirementNode>,

    pub climate: Option<TraitCriteria>,
    pub landscape: Option<TraitCriteria>,
    pub culture: Option<TraitCriteria>,
    pub religion: Option<TraitCriteria>,
    pub continent: Option<TraitCriteria>,
    pub region: Option<TraitCriteria>,

    // Deprecated single-value forms
    pub climate_id: Option<String>,
    pub landscape_id: Option<String>,
    pub culture_id: Option<String>,
    pub religion_id: Option<String>,
    pub continent_id: Option<String>,
    pub region_id: Option<String>,

    pub resources: Option<ResourceCriteria>,
    pub radiation: Option<Range>,
    pub pollution: Option<Range>,

    /// Building id -> required counts per scope.
    pub buildings: BTreeMap<BuildingId, ScopedBounds>,
    /// Legacy form: each id must exist at least once in the province.
    pub dependencies: Vec<BuildingId>,

    pub countries: Option<AccessList<CountryId>>,
    pub companies: Option<AccessList<CompanyId>>,
}

impl Requirements {
    /// Effective flat criteria for one category.
    pub fn trait_criteria(&self, category: TraitCategory) -> TraitCriteria {
        let (criteria, legacy) = match category {
            TraitCategory::Climate => (&self.climate, &self.climate_id),
            TraitCategory::Landscape => (&self.landscape, &self.landscape_id),
            TraitCategory::Culture => (&self.culture, &self.culture_id),
            TraitCategory::Religion => (&self.religion, &self.religion_id),
            TraitCategory::Continent => (&self.continent, &self.continent_id),
            TraitCategory::Region => (&self.region, &self.region_id),
        };
        TraitCriteria::resolve(criteria.as_ref(), legacy.as_deref())
    }

    /// Dependency bounds to enforce, with the legacy list degraded to
    /// "at least one in the province" when no map is given.
    pub fn dependency_bounds(&self) -> BTreeMap<BuildingId, ScopedBounds> {
        if !self.buildings.is_empty() {
            return self.buildings.clone();
        }
        self.dependencies
            .iter()
            .map(|id| (id.clone(), ScopedBounds::province_min(1)))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceCriteria {
    pub any_of: Vec<ResourceId>,
    pub none_of: Vec<ResourceId>,
}

/// Inclusive numeric range; a missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Range {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Range {
    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountBounds {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopedBounds {
    pub province: Option<CountBounds>,
    pub country: Option<CountBounds>,
    pub global: Option<CountBounds>,
}

impl ScopedBounds {
    pub fn province_min(min: u32) -> Self {
        Self {
            province: Some(CountBounds {
                min: Some(min),
                max: None,
            }),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    #[default]
    Allow,
    Deny,
}

/// Allow- or deny-list of ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessList<T> {
    pub mode: AccessMode,
    pub ids: Vec<T>,
}

impl<T: AsRef<str>> AccessList<T> {
    /// Whether `id` passes the list. An empty list admits everything; an
    /// unknown id (`None`) fails an allow-list and passes a deny-list.
    pub fn permits(&self, id: Option<&str>) -> bool {
        if self.ids.is_empty() {
            return true;
        }
        let listed = id.is_some_and(|id| self.ids.iter().any(|x| x.as_ref() == id));
        match self.mode {
            AccessMode::Allow => listed,
            AccessMode::Deny => !listed,
        }
    }
}
