//! Explain registry for checks and codes.
//!
//! Maps check IDs and codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a check or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the check/code.
    pub title: &'static str,
    /// What the check does and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after examples.
    pub examples: ExamplePair,
}

/// Before and after examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Source that would trigger a finding.
    pub before: &'static str,
    /// Source that passes the check.
    pub after: &'static str,
}

/// Look up an explanation by check_id or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        // Check IDs
        ids::CHECK_JS_RESTRICTED_API => Some(explain_restricted_api()),
        ids::CHECK_JS_SYNTAX => Some(explain_js_syntax()),
        ids::CHECK_MANIFEST_TAGS => Some(explain_manifest_tags()),
        ids::CHECK_MANIFEST_OBSOLETE_TAGS => Some(explain_obsolete_tags()),
        ids::CHECK_MARKUP_REQUIRED_ATTRIBUTES => Some(explain_required_attributes()),
        ids::CHECK_PACKAGE_TYPE => Some(explain_package_type()),

        // Codes
        ids::CODE_MOZINDEXEDDB => Some(explain_mozindexeddb()),
        ids::CODE_MOZINDEXEDDB_PROPERTY => Some(explain_mozindexeddb_property()),
        ids::CODE_JS_SYNTAX_ERROR => Some(explain_js_syntax_error()),
        ids::CODE_TAG_NOT_ALLOWED => Some(explain_tag_not_allowed()),
        ids::CODE_TAG_NOT_ALLOWED_IF_LISTED => Some(explain_tag_not_allowed_if_listed()),
        ids::CODE_TAG_OBSOLETE => Some(explain_tag_obsolete()),
        ids::CODE_MISSING_REQUIRED_ATTRIBUTE => Some(explain_missing_required_attribute()),
        ids::CODE_UNRECOGNIZED_PACKAGE_TYPE => Some(explain_unrecognized_package_type()),

        _ => None,
    }
}

/// List all known check IDs.
pub fn all_check_ids() -> &'static [&'static str] {
    &[
        ids::CHECK_JS_RESTRICTED_API,
        ids::CHECK_JS_SYNTAX,
        ids::CHECK_MANIFEST_TAGS,
        ids::CHECK_MANIFEST_OBSOLETE_TAGS,
        ids::CHECK_MARKUP_REQUIRED_ATTRIBUTES,
        ids::CHECK_PACKAGE_TYPE,
    ]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_MOZINDEXEDDB,
        ids::CODE_MOZINDEXEDDB_PROPERTY,
        ids::CODE_JS_SYNTAX_ERROR,
        ids::CODE_TAG_NOT_ALLOWED,
        ids::CODE_TAG_NOT_ALLOWED_IF_LISTED,
        ids::CODE_TAG_OBSOLETE,
        ids::CODE_MISSING_REQUIRED_ATTRIBUTE,
        ids::CODE_UNRECOGNIZED_PACKAGE_TYPE,
    ]
}

// --- Check-level explanations ---

fn explain_restricted_api() -> Explanation {
    Explanation {
        title: "Restricted APIs",
        description: "\
Detects references to privacy- or security-sensitive APIs in extension scripts.

A bare reference to a restricted global is reported as an error. Reaching the same
name as a property of some object (`obj.name` or `obj[\"name\"]`) is reported as a
warning, because the receiver cannot be proven to be the sensitive global without
deeper analysis.

Names assembled at runtime (variables, concatenation, `+=` chains) are not tracked.
Those cases are left to a human reviewer.",
        remediation: "\
Use the standard, unprefixed API instead of the restricted one. If a property of the
same name on an unrelated object triggers the warning, note it for the reviewer.",
        examples: ExamplePair {
            before: r#"var db = mozIndexedDB.open("cache");"#,
            after: r#"var db = indexedDB.open("cache");"#,
        },
    }
}

fn explain_js_syntax() -> Explanation {
    Explanation {
        title: "Script Syntax",
        description: "\
Every script in the package must parse. A script that does not parse is reported once
and no further rules run on it. The rest of the package is still validated.",
        remediation: "\
Fix the syntax error at the reported line. Minified or generated sources should be
rebuilt from their original source.",
        examples: ExamplePair {
            before: r#"var m = "d;"#,
            after: r#"var m = "d";"#,
        },
    }
}

fn explain_manifest_tags() -> Explanation {
    Explanation {
        title: "Manifest Tags",
        description: "\
Enforces deny rules on install manifest tags.

Some tags are never allowed in a distributed package (`hidden`). Others are only
disallowed in combination: `updateKey` is rejected when `updateURL` is also present,
since listed packages are updated by the distribution channel.",
        remediation: "\
Remove the disallowed tag from the install manifest. For the update pair, drop the
self-hosted update information from packages submitted for listing.",
        examples: ExamplePair {
            before: r#"<em:hidden>true</em:hidden>
<em:updateKey>MIGfMA0G...</em:updateKey>
<em:updateURL>https://example.com/update.rdf</em:updateURL>"#,
            after: r#"<!-- no hidden flag, no self-hosted update information -->"#,
        },
    }
}

fn explain_obsolete_tags() -> Explanation {
    Explanation {
        title: "Obsolete Manifest Tags",
        description: "\
Flags install manifest tags that are no longer honored (`file`, `requires`, `skin`).
They do not block distribution but indicate stale packaging.",
        remediation: "Remove the obsolete tags from the install manifest.",
        examples: ExamplePair {
            before: r#"<em:file>
  <Description about="urn:mozilla:extension:file:example.jar" />
</em:file>"#,
            after: r#"<!-- register chrome in chrome.manifest instead -->"#,
        },
    }
}

fn explain_required_attributes() -> Explanation {
    Explanation {
        title: "Required Markup Attributes",
        description: "\
Certain markup elements must always carry specific attributes. A `prefwindow` without
an `id` cannot persist its state and breaks the preferences dialog.",
        remediation: "Add the missing attribute to the element.",
        examples: ExamplePair {
            before: r#"<prefwindow title="Options">"#,
            after: r#"<prefwindow id="example-prefs" title="Options">"#,
        },
    }
}

fn explain_package_type() -> Explanation {
    Explanation {
        title: "Package Type",
        description: "\
Maps the legacy numeric `em:type` code to a canonical package type. Known codes:
2 (extension), 4 (theme), 8 (language pack), 32 (multi-package), 64 (dictionary).
Any other code is reported instead of guessed.",
        remediation: "Declare one of the supported type codes in the install manifest.",
        examples: ExamplePair {
            before: r#"<em:type>16</em:type>"#,
            after: r#"<em:type>2</em:type>"#,
        },
    }
}

// --- Code-level explanations ---

fn explain_mozindexeddb() -> Explanation {
    let mut exp = explain_restricted_api();
    exp.title = "Restricted API: mozIndexedDB";
    exp
}

fn explain_mozindexeddb_property() -> Explanation {
    Explanation {
        title: "Possible Restricted API: mozIndexedDB Property",
        description: "\
`mozIndexedDB` is reached as a property (`window.mozIndexedDB` or
`window[\"mozIndexedDB\"]`). It may be the prefixed IndexedDB global or an unrelated
property with the same name; a reviewer should confirm.",
        remediation: "Use `indexedDB` when the prefixed global is meant.",
        examples: ExamplePair {
            before: r#"var db = window.mozIndexedDB;"#,
            after: r#"var db = window.indexedDB;"#,
        },
    }
}

fn explain_js_syntax_error() -> Explanation {
    let mut exp = explain_js_syntax();
    exp.title = "JavaScript Syntax Error";
    exp
}

fn explain_tag_not_allowed() -> Explanation {
    let mut exp = explain_manifest_tags();
    exp.title = "Tag Not Allowed";
    exp
}

fn explain_tag_not_allowed_if_listed() -> Explanation {
    let mut exp = explain_manifest_tags();
    exp.title = "Tag Not Allowed In Combination";
    exp
}

fn explain_tag_obsolete() -> Explanation {
    let mut exp = explain_obsolete_tags();
    exp.title = "Obsolete Tag";
    exp
}

fn explain_missing_required_attribute() -> Explanation {
    let mut exp = explain_required_attributes();
    exp.title = "Missing Required Attribute";
    exp
}

fn explain_unrecognized_package_type() -> Explanation {
    let mut exp = explain_package_type();
    exp.title = "Unrecognized Package Type";
    exp
}
