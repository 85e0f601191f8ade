use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `xpiguard.toml` schema v1.
///
/// Every field is optional; anything left out comes from the selected profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct XpiguardConfigV1 {
    /// Optional schema string for tooling (`xpiguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Preset profile: `strict` (default), `warn` or `compat`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// When to fail the package: `error` or `warning`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    /// How many findings to emit before truncating the list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_findings: Option<u32>,

    /// Upper bound on artifacts validated at once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suppression: Option<SuppressionSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagsSection>,

    /// Map of check_id -> config.
    #[serde(default)]
    pub checks: BTreeMap<String, CheckConfig>,
}

/// Inline suppression directives in scripts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SuppressionSection {
    /// Comment marker, `xpiguard-disable` by default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directive: Option<String>,

    /// `rest_of_file` (default), `next_line` or `off`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TagsSection {
    /// Tag name -> tags whose presence makes it disallowed. Replaces the built-in triggers
    /// for the named tags; an empty list removes the conditional rule.
    #[serde(default)]
    pub cooccurrence: BTreeMap<String, Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckConfig {
    /// Override preset enable/disable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Glob patterns over package paths whose findings for this check are dropped.
    #[serde(default)]
    pub allow: Vec<String>,
}
