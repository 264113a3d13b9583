//! Loading world snapshots handed over by the save/load layer.
//!
//! Snapshots are JSON documents shaped like [`World`]. Catalog maps may omit
//! the `id` inside each value; the map key fills it in.

use crate::state::World;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate province id: {0}")]
    DuplicateProvince(String),
}

/// Parse a snapshot from a JSON string.
pub fn from_json_str(json: &str) -> Result<World, SnapshotError> {
    let mut world: World = serde_json::from_str(json)?;
    normalize(&mut world)?;
    Ok(world)
}

/// Read and parse a snapshot file.
pub fn load_world(path: &Path) -> Result<World, SnapshotError> {
    let json = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let world = from_json_str(&json)?;
    log::info!(
        "Loaded snapshot {:?}: turn {}, {} provinces, {} buildings, {} agreements",
        path,
        world.turn,
        world.provinces.len(),
        world.buildings.len(),
        world.agreements.len()
    );
    for problem in dangling_references(&world) {
        log::warn!("{}", problem);
    }
    Ok(world)
}

fn normalize(world: &mut World) -> Result<(), SnapshotError> {
    for (key, def) in world.buildings.iter_mut() {
        if def.id.is_empty() {
            def.id = key.clone();
        }
    }
    for (key, company) in world.companies.iter_mut() {
        if company.id.is_empty() {
            company.id = key.clone();
        }
    }
    for (key, country) in world.countries.iter_mut() {
        if country.id.is_empty() {
            country.id = key.clone();
        }
    }
    for (key, industry) in world.industries.iter_mut() {
        if industry.id.is_empty() {
            industry.id = key.clone();
        }
    }

    let mut seen = HashSet::new();
    for province in &world.provinces {
        if !seen.insert(province.id.as_str()) {
            return Err(SnapshotError::DuplicateProvince(province.id.clone()));
        }
    }
    Ok(())
}

/// References to entities the snapshot does not contain.
///
/// These are not errors: unknown companies resolve to no country and
/// uncatalogued buildings carry no requirements.
pub fn dangling_references(world: &World) -> Vec<String> {
    let mut problems = Vec::new();
    for entry in world.entries() {
        if world.building(entry.building_id).is_none() {
            problems.push(format!(
                "province {}: building {} not in catalog",
                entry.province.id, entry.building_id
            ));
        }
        if let Some(company) = entry.owner.company_id() {
            if !world.companies.contains_key(company) {
                problems.push(format!(
                    "province {}: owner company {} not in catalog",
                    entry.province.id, company
                ));
            }
        }
    }
    for (id, building) in &world.buildings {
        if let Some(industry) = &building.industry_id {
            if !world.industries.is_empty() && !world.industries.contains_key(industry) {
                problems.push(format!("building {}: industry {} not in catalog", id, industry));
            }
        }
    }
    problems
}
