use crate::PackagePath;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use time::OffsetDateTime;

/// Stable schema identifier for xpiguard reports.
pub const SCHEMA_REPORT_V1: &str = "xpiguard.report.v1";

/// Canonical severity. These three identifiers are the only severity vocabulary other
/// subsystems see, whatever scale the originating rule source uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Notice,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Notice => "notice",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    pub path: PackagePath,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col: Option<u32>,
}

impl Location {
    pub fn file(path: PackagePath) -> Self {
        Self {
            path,
            line: None,
            col: None,
        }
    }

    pub fn at(path: PackagePath, line: Option<u32>, col: Option<u32>) -> Self {
        Self { path, line, col }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Finding {
    pub severity: Severity,
    pub check_id: String,
    pub code: String,
    /// Human text for this occurrence.
    pub message: String,
    /// Longer rule description shared by every occurrence of `code`.
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    /// Stable identifier intended for dedup and trending. A hash of:
    /// `check_id + code + path + line + col + message`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    /// Check-specific structured payload (kept open-ended for forward compatibility).
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: JsonValue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Xpiguard-specific summary payload for the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct XpiguardData {
    pub profile: String,

    pub scripts_scanned: u32,
    pub manifests_scanned: u32,
    pub markup_scanned: u32,

    /// Canonical package type, when legacy metadata was present and recognized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_type: Option<String>,

    pub findings_total: u32,
    pub findings_emitted: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated_reason: Option<String>,
}

/// A generic report envelope.
///
/// Keeping this generic allows tool-specific data while still enforcing a stable outer shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope<TData = XpiguardData> {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    pub findings: Vec<Finding>,
    pub data: TData,
}

pub type XpiguardReport = ReportEnvelope<XpiguardData>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn severity_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Severity::Error).unwrap(), json!("error"));
        assert_eq!(serde_json::to_value(Severity::Warning).unwrap(), json!("warning"));
        assert_eq!(serde_json::to_value(Severity::Notice).unwrap(), json!("notice"));
    }

    #[test]
    fn finding_omits_empty_optional_fields() {
        let finding = Finding {
            severity: Severity::Warning,
            check_id: "manifest.obsolete_tags".to_string(),
            code: "TAG_OBSOLETE".to_string(),
            message: "tag 'skin' is obsolete".to_string(),
            description: "Obsolete manifest tag".to_string(),
            location: None,
            fingerprint: None,
            data: JsonValue::Null,
        };
        let value = serde_json::to_value(&finding).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("location"));
        assert!(!obj.contains_key("fingerprint"));
        assert!(!obj.contains_key("data"));
        assert_eq!(obj["severity"], "warning");
    }

    #[test]
    fn location_skips_missing_line_and_col() {
        let loc = Location::file(PackagePath::new("install.rdf"));
        assert_eq!(serde_json::to_value(&loc).unwrap(), json!({ "path": "install.rdf" }));
    }
}
