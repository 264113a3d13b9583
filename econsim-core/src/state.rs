use crate::buildings::BuildingDef;
use crate::config::EngineConfig;
use crate::diplomacy::DiplomacyAgreement;
use crate::traits::TraitCategory;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub type CountryId = String;
pub type CompanyId = String;
pub type ProvinceId = String;
pub type BuildingId = String;
pub type IndustryId = String;
pub type ResourceId = String;
pub type Turn = u32;

/// Who owns a building entry.
///
/// Every owner resolves to a country: directly for state-owned entries,
/// through the company catalog for company-owned ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Owner {
    #[serde(rename_all = "camelCase")]
    State { country_id: CountryId },
    #[serde(rename_all = "camelCase")]
    Company { company_id: CompanyId },
}

impl Owner {
    pub fn state(country_id: impl Into<CountryId>) -> Self {
        Self::State {
            country_id: country_id.into(),
        }
    }

    pub fn company(company_id: impl Into<CompanyId>) -> Self {
        Self::Company {
            company_id: company_id.into(),
        }
    }

    pub fn kind(&self) -> OwnerKind {
        match self {
            Self::State { .. } => OwnerKind::State,
            Self::Company { .. } => OwnerKind::Company,
        }
    }

    /// Company id for company-owned entries.
    pub fn company_id(&self) -> Option<&str> {
        match self {
            Self::State { .. } => None,
            Self::Company { company_id } => Some(company_id),
        }
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::State { country_id } => write!(f, "state {}", country_id),
            Self::Company { company_id } => write!(f, "company {}", company_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerKind {
    State,
    Company,
}

impl std::fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::State => write!(f, "state"),
            Self::Company => write!(f, "company"),
        }
    }
}

/// A building standing in a province.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingInstance {
    pub building_id: BuildingId,
    pub owner: Owner,
}

/// A building under construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructionEntry {
    pub owner: Owner,
    /// Accumulated construction points.
    #[serde(default)]
    pub progress: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Province {
    pub id: ProvinceId,
    pub owner_country_id: Option<CountryId>,
    pub climate_id: Option<String>,
    pub landscape_id: Option<String>,
    pub culture_id: Option<String>,
    pub religion_id: Option<String>,
    pub continent_id: Option<String>,
    pub region_id: Option<String>,
    /// Resource id -> available quantity.
    pub resources: BTreeMap<ResourceId, f64>,
    pub radiation: Option<f64>,
    pub pollution: Option<f64>,
    pub buildings: Vec<BuildingInstance>,
    /// Building id -> entries under construction.
    pub construction: BTreeMap<BuildingId, Vec<ConstructionEntry>>,
}

impl Province {
    /// The province's value for a trait category, if recorded.
    pub fn trait_value(&self, category: TraitCategory) -> Option<&str> {
        match category {
            TraitCategory::Climate => self.climate_id.as_deref(),
            TraitCategory::Landscape => self.landscape_id.as_deref(),
            TraitCategory::Culture => self.culture_id.as_deref(),
            TraitCategory::Religion => self.religion_id.as_deref(),
            TraitCategory::Continent => self.continent_id.as_deref(),
            TraitCategory::Region => self.region_id.as_deref(),
        }
    }

    pub fn resource_amount(&self, resource: &str) -> f64 {
        self.resources.get(resource).copied().unwrap_or(0.0)
    }

    pub fn is_owned_by(&self, country: &str) -> bool {
        self.owner_country_id.as_deref() == Some(country)
    }

    /// Every built and in-progress entry in this province.
    pub fn entries(&self) -> impl Iterator<Item = Entry<'_>> + '_ {
        let built = self
            .buildings
            .iter()
            .enumerate()
            .map(move |(index, b)| Entry {
                province: self,
                building_id: &b.building_id,
                owner: &b.owner,
                slot: EntrySlot::Built { index },
            });
        let queued = self.construction.iter().flat_map(move |(building_id, list)| {
            list.iter().enumerate().map(move |(index, c)| Entry {
                province: self,
                building_id,
                owner: &c.owner,
                slot: EntrySlot::Construction {
                    building_id: building_id.clone(),
                    index,
                },
            })
        });
        built.chain(queued)
    }
}

/// Position of an entry inside its province.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EntrySlot {
    Built {
        index: usize,
    },
    #[serde(rename_all = "camelCase")]
    Construction {
        building_id: BuildingId,
        index: usize,
    },
}

/// Stable reference to a placed entry (province + slot).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRef {
    pub province_id: ProvinceId,
    pub slot: EntrySlot,
}

/// Borrowed view of one built or in-progress entry.
#[derive(Debug, Clone)]
pub struct Entry<'a> {
    pub province: &'a Province,
    pub building_id: &'a BuildingId,
    pub owner: &'a Owner,
    pub slot: EntrySlot,
}

impl Entry<'_> {
    pub fn is_built(&self) -> bool {
        matches!(self.slot, EntrySlot::Built { .. })
    }

    pub fn entry_ref(&self) -> EntryRef {
        EntryRef {
            province_id: self.province.id.clone(),
            slot: self.slot.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub country_id: CountryId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Industry {
    pub id: IndustryId,
    pub name: String,
}

/// Read-only snapshot of everything the engine looks at.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct World {
    pub turn: Turn,
    pub provinces: Vec<Province>,
    pub buildings: HashMap<BuildingId, BuildingDef>,
    pub industries: HashMap<IndustryId, Industry>,
    pub companies: HashMap<CompanyId, Company>,
    pub countries: HashMap<CountryId, Country>,
    /// Raw agreements as stored by diplomacy (before expansion).
    pub agreements: Vec<DiplomacyAgreement>,
    pub config: EngineConfig,
}

impl World {
    pub fn province(&self, id: &str) -> Option<&Province> {
        self.provinces.iter().find(|p| p.id == id)
    }

    pub fn building(&self, id: &str) -> Option<&BuildingDef> {
        self.buildings.get(id)
    }

    /// Resolve an owner to its country.
    ///
    /// A company missing from the catalog resolves to `None`, which never
    /// equals any country id.
    pub fn owner_country<'a>(&'a self, owner: &'a Owner) -> Option<&'a str> {
        match owner {
            Owner::State { country_id } => Some(country_id.as_str()),
            Owner::Company { company_id } => self
                .companies
                .get(company_id)
                .map(|c| c.country_id.as_str()),
        }
    }

    /// Industry of a building, if the building is catalogued and has one.
    pub fn industry_of(&self, building_id: &str) -> Option<&str> {
        self.buildings
            .get(building_id)
            .and_then(|b| b.industry_id.as_deref())
    }

    /// Every built and in-progress entry in the world.
    pub fn entries(&self) -> impl Iterator<Item = Entry<'_>> + '_ {
        self.provinces.iter().flat_map(|p| p.entries())
    }
}
