//! Categorical province traits and flat membership criteria.

use serde::{Deserialize, Serialize};

/// A categorical attribute of a province.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitCategory {
    Climate,
    Landscape,
    Culture,
    Religion,
    Continent,
    Region,
}

impl TraitCategory {
    pub const ALL: [TraitCategory; 6] = [
        TraitCategory::Climate,
        TraitCategory::Landscape,
        TraitCategory::Culture,
        TraitCategory::Religion,
        TraitCategory::Continent,
        TraitCategory::Region,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Climate => "climate",
            Self::Landscape => "landscape",
            Self::Culture => "culture",
            Self::Religion => "religion",
            Self::Continent => "continent",
            Self::Region => "region",
        }
    }
}

impl std::fmt::Display for TraitCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `anyOf` / `noneOf` membership test for one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TraitCriteria {
    pub any_of: Vec<String>,
    pub none_of: Vec<String>,
}

impl TraitCriteria {
    pub fn any_of<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            any_of: ids.into_iter().map(Into::into).collect(),
            none_of: Vec::new(),
        }
    }

    pub fn none_of<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            any_of: Vec::new(),
            none_of: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Effective criteria once the deprecated single-id field is folded in.
    ///
    /// The legacy id only fills `any_of` when no explicit list was given.
    pub fn resolve(criteria: Option<&TraitCriteria>, legacy_id: Option<&str>) -> TraitCriteria {
        let mut resolved = criteria.cloned().unwrap_or_default();
        if resolved.any_of.is_empty() {
            if let Some(id) = legacy_id.filter(|id| !id.is_empty()) {
                resolved.any_of.push(id.to_string());
            }
        }
        resolved
    }

    pub fn is_unconstrained(&self) -> bool {
        self.any_of.is_empty() && self.none_of.is_empty()
    }

    /// Test a province value against the criteria.
    ///
    /// An absent value fails a non-empty `any_of` and passes any `none_of`.
    pub fn matches(&self, value: Option<&str>) -> bool {
        if !self.any_of.is_empty() {
            match value {
                Some(v) if self.any_of.iter().any(|id| id == v) => {}
                _ => return false,
            }
        }
        if let Some(v) = value {
            if self.none_of.iter().any(|id| id == v) {
                return false;
            }
        }
        true
    }
}
