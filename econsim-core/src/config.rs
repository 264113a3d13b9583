use serde::{Deserialize, Serialize};

/// Engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Count in-progress construction towards building dependencies.
    ///
    /// Usage limits always count construction; dependencies default to
    /// finished buildings only.
    pub dependencies_include_construction: bool,

    /// Run the diplomacy check in provinces without an owner.
    ///
    /// When set, unowned provinces reject every builder with no
    /// diplomatic permission. Off by default: unowned land is open.
    pub check_diplomacy_for_unowned: bool,
}
