//! Manifest tag and markup attribute validation.

use crate::message::Message;
use crate::model::{ManifestTag, MarkupElement};
use crate::rules::{TagRuleSet, required_attributes};
use crate::severity::{VALIDATION_ERROR, VALIDATION_WARNING};
use serde_json::json;
use std::collections::BTreeSet;
use xpiguard_types::{Location, PackagePath, ids};

const TAG_NOT_ALLOWED_DESCRIPTION: &str =
    "This manifest tag is not allowed in packages submitted for distribution.";
const TAG_NOT_ALLOWED_IF_LISTED_DESCRIPTION: &str =
    "This manifest tag is not allowed when the package also declares one of its conflicting tags.";
const TAG_OBSOLETE_DESCRIPTION: &str =
    "This manifest tag is obsolete and is ignored by current applications.";
const MISSING_ATTRIBUTE_DESCRIPTION: &str =
    "This markup element must carry the named attribute wherever it occurs.";

/// Validate the tags of one manifest.
///
/// Rules are evaluated once per distinct tag name; the first occurrence gives the location.
/// Every applicable rule emits its message.
pub fn validate_tags(
    tags: &[ManifestTag],
    path: &PackagePath,
    rules: &TagRuleSet,
) -> Vec<Message> {
    let present: BTreeSet<&str> = tags.iter().map(|t| t.name.as_str()).collect();
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut out = Vec::new();

    for tag in tags {
        if !seen.insert(tag.name.as_str()) {
            continue;
        }
        let Some(rule) = rules.get(&tag.name) else {
            continue;
        };
        let location = Location::at(path.clone(), tag.line, None);

        if rule.disallowed {
            out.push(
                Message::validator(
                    VALIDATION_ERROR,
                    ids::CHECK_MANIFEST_TAGS,
                    ids::CODE_TAG_NOT_ALLOWED,
                    TAG_NOT_ALLOWED_DESCRIPTION,
                    format!("tag '{}' is not allowed", tag.name),
                    location.clone(),
                )
                .with_data(json!({ "tag": tag.name })),
            );
        }

        let triggers: Vec<&str> = rule
            .disallowed_if_cooccurring_with
            .iter()
            .map(String::as_str)
            .filter(|t| present.contains(t))
            .collect();
        if !triggers.is_empty() {
            out.push(
                Message::validator(
                    VALIDATION_ERROR,
                    ids::CHECK_MANIFEST_TAGS,
                    ids::CODE_TAG_NOT_ALLOWED_IF_LISTED,
                    TAG_NOT_ALLOWED_IF_LISTED_DESCRIPTION,
                    format!(
                        "tag '{}' is not allowed together with {}",
                        tag.name,
                        triggers
                            .iter()
                            .map(|t| format!("'{t}'"))
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                    location.clone(),
                )
                .with_data(json!({ "tag": tag.name, "conflicts_with": triggers })),
            );
        }

        if rule.obsolete && !rule.disallowed {
            out.push(
                Message::validator(
                    VALIDATION_WARNING,
                    ids::CHECK_MANIFEST_OBSOLETE_TAGS,
                    ids::CODE_TAG_OBSOLETE,
                    TAG_OBSOLETE_DESCRIPTION,
                    format!("tag '{}' is obsolete", tag.name),
                    location,
                )
                .with_data(json!({ "tag": tag.name })),
            );
        }
    }

    out
}

/// Check one element occurrence against the required-attribute table.
pub fn validate_required_attributes(
    element_tag: &str,
    present_attributes: &BTreeSet<String>,
    path: &PackagePath,
    line: Option<u32>,
) -> Vec<Message> {
    let Some(required) = required_attributes(element_tag) else {
        return Vec::new();
    };
    required
        .iter()
        .filter(|attr| !present_attributes.contains(**attr))
        .map(|attr| {
            Message::validator(
                VALIDATION_ERROR,
                ids::CHECK_MARKUP_REQUIRED_ATTRIBUTES,
                ids::CODE_MISSING_REQUIRED_ATTRIBUTE,
                MISSING_ATTRIBUTE_DESCRIPTION,
                format!("<{element_tag}> is missing required attribute '{attr}'"),
                Location::at(path.clone(), line, None),
            )
            .with_data(json!({ "element": element_tag, "attribute": attr }))
        })
        .collect()
}

/// Validate every element of one markup document, in document order.
pub fn validate_markup(elements: &[MarkupElement], path: &PackagePath) -> Vec<Message> {
    elements
        .iter()
        .flat_map(|e| validate_required_attributes(&e.tag, &e.attributes, path, e.line))
        .collect()
}
