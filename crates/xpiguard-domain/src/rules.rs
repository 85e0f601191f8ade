//! Static rule tables.
//!
//! Everything here is process-wide constant data, read concurrently by every scan without
//! synchronization. Configuration can only derive new owned rule sets from these tables;
//! it never mutates them.

use crate::error::ContractError;
use crate::severity::{SCRIPT_RULES_ERROR, SCRIPT_RULES_WARNING};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;
use xpiguard_types::ids;

pub const UNALLOWED_TAGS: &[&str] = &["hidden"];
pub const UNALLOWED_IF_LISTED_TAGS: &[(&str, &[&str])] = &[("updateKey", &["updateURL"])];
pub const OBSOLETE_TAGS: &[&str] = &["file", "requires", "skin"];

/// Deny/obsolete rule for one manifest tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagRule {
    pub tag_name: String,
    /// Rejected whenever present.
    pub disallowed: bool,
    /// Rejected when any of these tags is present in the same manifest.
    pub disallowed_if_cooccurring_with: BTreeSet<String>,
    /// Still accepted but no longer honored.
    pub obsolete: bool,
}

impl TagRule {
    fn empty(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            disallowed: false,
            disallowed_if_cooccurring_with: BTreeSet::new(),
            obsolete: false,
        }
    }
}

/// An owned set of tag rules, keyed by tag name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagRuleSet {
    rules: BTreeMap<String, TagRule>,
}

static GOLDEN_TAG_RULES: LazyLock<TagRuleSet> = LazyLock::new(|| {
    let mut rules: BTreeMap<String, TagRule> = BTreeMap::new();
    for tag in UNALLOWED_TAGS {
        rules
            .entry(tag.to_string())
            .or_insert_with(|| TagRule::empty(tag))
            .disallowed = true;
    }
    for (tag, triggers) in UNALLOWED_IF_LISTED_TAGS {
        rules
            .entry(tag.to_string())
            .or_insert_with(|| TagRule::empty(tag))
            .disallowed_if_cooccurring_with
            .extend(triggers.iter().map(|t| t.to_string()));
    }
    for tag in OBSOLETE_TAGS {
        rules
            .entry(tag.to_string())
            .or_insert_with(|| TagRule::empty(tag))
            .obsolete = true;
    }
    TagRuleSet { rules }
});

impl TagRuleSet {
    /// The built-in table.
    pub fn golden() -> &'static TagRuleSet {
        &GOLDEN_TAG_RULES
    }

    pub fn get(&self, tag_name: &str) -> Option<&TagRule> {
        self.rules.get(tag_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagRule> {
        self.rules.values()
    }

    /// Derive a rule set whose co-occurrence triggers are replaced for the given tags.
    ///
    /// An empty trigger set removes the conditional rule for that tag.
    pub fn with_cooccurrence(&self, overrides: &BTreeMap<String, BTreeSet<String>>) -> Self {
        let mut rules = self.rules.clone();
        for (tag, triggers) in overrides {
            let rule = rules
                .entry(tag.clone())
                .or_insert_with(|| TagRule::empty(tag));
            rule.disallowed_if_cooccurring_with = triggers.clone();
        }
        rules.retain(|_, r| {
            r.disallowed || r.obsolete || !r.disallowed_if_cooccurring_with.is_empty()
        });
        Self { rules }
    }

    /// Reject tables that cannot be evaluated meaningfully.
    pub fn validate(&self) -> Result<(), ContractError> {
        for (name, rule) in &self.rules {
            if name.trim().is_empty() || *name != rule.tag_name {
                return Err(ContractError::MalformedTagRule {
                    tag: name.clone(),
                    reason: "rule key must be the non-empty tag name".to_string(),
                });
            }
            if rule.disallowed_if_cooccurring_with.contains(name) {
                return Err(ContractError::MalformedTagRule {
                    tag: name.clone(),
                    reason: "a tag cannot be its own co-occurrence trigger".to_string(),
                });
            }
            if rule
                .disallowed_if_cooccurring_with
                .iter()
                .any(|t| t.trim().is_empty())
            {
                return Err(ContractError::MalformedTagRule {
                    tag: name.clone(),
                    reason: "empty co-occurrence trigger".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Attributes that must be present on an element wherever it occurs in markup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequiredAttributeRule {
    pub element: &'static str,
    pub attributes: &'static [&'static str],
}

pub static REQUIRED_ATTRIBUTE_RULES: &[RequiredAttributeRule] = &[RequiredAttributeRule {
    element: "prefwindow",
    attributes: &["id"],
}];

pub fn required_attributes(element: &str) -> Option<&'static [&'static str]> {
    REQUIRED_ATTRIBUTE_RULES
        .iter()
        .find(|r| r.element == element)
        .map(|r| r.attributes)
}

/// A script API name treated as security/privacy-sensitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RestrictedApi {
    pub name: &'static str,
    /// Code for a direct global reference.
    pub global_code: &'static str,
    /// Native script-rules severity for a direct global reference.
    pub global_severity: i64,
    /// Code for a property access reaching the same name.
    pub property_code: &'static str,
    /// Native script-rules severity for a property access.
    pub property_severity: i64,
    pub description: &'static str,
}

pub static RESTRICTED_APIS: &[RestrictedApi] = &[RestrictedApi {
    name: "mozIndexedDB",
    global_code: ids::CODE_MOZINDEXEDDB,
    global_severity: SCRIPT_RULES_ERROR,
    property_code: ids::CODE_MOZINDEXEDDB_PROPERTY,
    property_severity: SCRIPT_RULES_WARNING,
    description: "The prefixed mozIndexedDB API is restricted; use indexedDB instead.",
}];

pub fn restricted_api(name: &str) -> Option<&'static RestrictedApi> {
    RESTRICTED_APIS.iter().find(|api| api.name == name)
}
