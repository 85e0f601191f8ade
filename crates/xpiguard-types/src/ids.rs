//! Stable identifiers for checks and finding codes.
//!
//! `check_id` is a dotted namespace. `code` is an upper snake case discriminator; codes are
//! part of the external contract and are never renumbered or renamed without a migration note.

// Checks
pub const CHECK_JS_RESTRICTED_API: &str = "js.restricted_api";
pub const CHECK_JS_SYNTAX: &str = "js.syntax";
pub const CHECK_MANIFEST_TAGS: &str = "manifest.tags";
pub const CHECK_MANIFEST_OBSOLETE_TAGS: &str = "manifest.obsolete_tags";
pub const CHECK_MARKUP_REQUIRED_ATTRIBUTES: &str = "markup.required_attributes";
pub const CHECK_PACKAGE_TYPE: &str = "package.type";

// Codes: js.restricted_api
pub const CODE_MOZINDEXEDDB: &str = "MOZINDEXEDDB";
pub const CODE_MOZINDEXEDDB_PROPERTY: &str = "MOZINDEXEDDB_PROPERTY";

// Codes: js.syntax
pub const CODE_JS_SYNTAX_ERROR: &str = "JS_SYNTAX_ERROR";

// Codes: manifest.tags
pub const CODE_TAG_NOT_ALLOWED: &str = "TAG_NOT_ALLOWED";
pub const CODE_TAG_NOT_ALLOWED_IF_LISTED: &str = "TAG_NOT_ALLOWED_IF_LISTED";

// Codes: manifest.obsolete_tags
pub const CODE_TAG_OBSOLETE: &str = "TAG_OBSOLETE";

// Codes: markup.required_attributes
pub const CODE_MISSING_REQUIRED_ATTRIBUTE: &str = "MISSING_REQUIRED_ATTRIBUTE";

// Codes: package.type
pub const CODE_UNRECOGNIZED_PACKAGE_TYPE: &str = "UNRECOGNIZED_PACKAGE_TYPE";
