use crate::rules::TagRuleSet;
use std::collections::BTreeMap;
use xpiguard_types::ids;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailOn {
    Error,
    Warning,
}

/// How far an inline suppression directive reaches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SuppressionScope {
    /// Every restricted-API finding at or after the directive's line.
    #[default]
    RestOfFile,
    /// Only findings on the line right after the directive.
    NextLine,
    /// Directives are ignored.
    Off,
}

pub const DEFAULT_SUPPRESSION_DIRECTIVE: &str = "xpiguard-disable";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuppressionConfig {
    /// Comment prefix (after trimming) that marks a directive.
    pub directive: String,
    pub scope: SuppressionScope,
}

impl Default for SuppressionConfig {
    fn default() -> Self {
        Self {
            directive: DEFAULT_SUPPRESSION_DIRECTIVE.to_string(),
            scope: SuppressionScope::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckPolicy {
    pub enabled: bool,
    /// Glob patterns over artifact paths whose findings are dropped.
    pub allow: Vec<String>,
}

impl CheckPolicy {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            allow: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            allow: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    pub profile: String,
    pub fail_on: FailOn,
    pub max_findings: usize,
    pub max_concurrency: usize,
    pub suppression: SuppressionConfig,
    pub tag_rules: TagRuleSet,
    pub checks: BTreeMap<String, CheckPolicy>,
}

impl EffectiveConfig {
    pub fn check_policy(&self, check_id: &str) -> Option<&CheckPolicy> {
        self.checks.get(check_id)
    }

    /// Checks absent from `checks` run. `js.syntax` always runs.
    pub fn is_enabled(&self, check_id: &str) -> bool {
        check_id == ids::CHECK_JS_SYNTAX || self.check_policy(check_id).is_none_or(|p| p.enabled)
    }
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            profile: "strict".to_string(),
            fail_on: FailOn::Error,
            max_findings: 200,
            max_concurrency: 8,
            suppression: SuppressionConfig::default(),
            tag_rules: TagRuleSet::golden().clone(),
            checks: BTreeMap::new(),
        }
    }
}
