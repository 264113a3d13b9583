use crate::buildings::BuildingDef;
use crate::diplomacy::DiplomacyAgreement;
use crate::state::{
    BuildingInstance, Company, ConstructionEntry, Country, Industry, Owner, Province, Turn, World,
};
use crate::traits::TraitCategory;

/// Fluent builder for world snapshots in tests and demos.
#[derive(Debug, Clone, Default)]
pub struct WorldBuilder {
    world: World,
}

impl WorldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turn(mut self, turn: Turn) -> Self {
        self.world.turn = turn;
        self
    }

    pub fn with_country(mut self, id: &str) -> Self {
        self.world.countries.insert(
            id.to_string(),
            Country {
                id: id.to_string(),
                name: id.to_string(),
            },
        );
        self
    }

    pub fn with_company(mut self, id: &str, country_id: &str) -> Self {
        self.world.companies.insert(
            id.to_string(),
            Company {
                id: id.to_string(),
                name: id.to_string(),
                country_id: country_id.to_string(),
            },
        );
        self
    }

    pub fn with_building(mut self, building: BuildingDef) -> Self {
        self.world.buildings.insert(building.id.clone(), building);
        self
    }

    /// Catalog a requirement-free building belonging to `industry_id`.
    pub fn with_building_in_industry(mut self, id: &str, industry_id: &str) -> Self {
        self.world.industries.insert(
            industry_id.to_string(),
            Industry {
                id: industry_id.to_string(),
                name: industry_id.to_string(),
            },
        );
        self.with_building(BuildingDef {
            industry_id: Some(industry_id.to_string()),
            ..BuildingDef::new(id)
        })
    }

    pub fn with_province(mut self, id: &str, owner: Option<&str>) -> Self {
        self.province_mut(id).owner_country_id = owner.map(|s| s.to_string());
        self
    }

    pub fn with_province_state(mut self, province: Province) -> Self {
        self.world.provinces.retain(|p| p.id != province.id);
        self.world.provinces.push(province);
        self
    }

    pub fn with_province_traits(
        mut self,
        id: &str,
        owner: Option<&str>,
        category: TraitCategory,
        value: &str,
    ) -> Self {
        let province = self.province_mut(id);
        province.owner_country_id = owner.map(|s| s.to_string());
        let value = Some(value.to_string());
        match category {
            TraitCategory::Climate => province.climate_id = value,
            TraitCategory::Landscape => province.landscape_id = value,
            TraitCategory::Culture => province.culture_id = value,
            TraitCategory::Religion => province.religion_id = value,
            TraitCategory::Continent => province.continent_id = value,
            TraitCategory::Region => province.region_id = value,
        }
        self
    }

    pub fn with_resource(mut self, province_id: &str, resource: &str, amount: f64) -> Self {
        self.province_mut(province_id)
            .resources
            .insert(resource.to_string(), amount);
        self
    }

    pub fn with_radiation(mut self, province_id: &str, radiation: f64) -> Self {
        self.province_mut(province_id).radiation = Some(radiation);
        self
    }

    pub fn with_pollution(mut self, province_id: &str, pollution: f64) -> Self {
        self.province_mut(province_id).pollution = Some(pollution);
        self
    }

    pub fn with_built(mut self, province_id: &str, building_id: &str, owner: Owner) -> Self {
        self.province_mut(province_id).buildings.push(BuildingInstance {
            building_id: building_id.to_string(),
            owner,
        });
        self
    }

    pub fn with_construction(mut self, province_id: &str, building_id: &str, owner: Owner) -> Self {
        self.province_mut(province_id)
            .construction
            .entry(building_id.to_string())
            .or_default()
            .push(ConstructionEntry {
                owner,
                progress: 0.0,
            });
        self
    }

    pub fn with_agreement(mut self, agreement: DiplomacyAgreement) -> Self {
        self.world.agreements.push(agreement);
        self
    }

    pub fn build(self) -> World {
        self.world
    }

    fn province_mut(&mut self, id: &str) -> &mut Province {
        let index = match self.world.provinces.iter().position(|p| p.id == id) {
            Some(index) => index,
            None => {
                self.world.provinces.push(Province {
                    id: id.to_string(),
                    ..Default::default()
                });
                self.world.provinces.len() - 1
            }
        };
        &mut self.world.provinces[index]
    }
}
