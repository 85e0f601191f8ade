//! Messages as validators emit them, before severity normalization.

use crate::severity::{NativeSeverity, SeveritySource};
use serde_json::Value as JsonValue;
use xpiguard_types::Location;

/// One diagnostic from one validator, still carrying its source's native severity.
///
/// The aggregator turns messages into canonical [`xpiguard_types::Finding`]s.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub source: SeveritySource,
    pub severity: NativeSeverity,
    pub check_id: &'static str,
    pub code: &'static str,
    pub message: String,
    pub description: &'static str,
    pub location: Location,
    pub data: JsonValue,
}

impl Message {
    /// A message on the script rule engine's numeric scale.
    pub fn script(
        severity: i64,
        check_id: &'static str,
        code: &'static str,
        description: &'static str,
        message: String,
        location: Location,
    ) -> Self {
        Self {
            source: SeveritySource::ScriptRules,
            severity: NativeSeverity::Numeric(severity),
            check_id,
            code,
            message,
            description,
            location,
            data: JsonValue::Null,
        }
    }

    /// A message on the validators' string scale.
    pub fn validator(
        severity: &str,
        check_id: &'static str,
        code: &'static str,
        description: &'static str,
        message: String,
        location: Location,
    ) -> Self {
        Self {
            source: SeveritySource::Validator,
            severity: NativeSeverity::Label(severity.to_string()),
            check_id,
            code,
            message,
            description,
            location,
            data: JsonValue::Null,
        }
    }

    pub fn with_data(mut self, data: JsonValue) -> Self {
        self.data = data;
        self
    }

    pub fn line(&self) -> Option<u32> {
        self.location.line
    }
}
