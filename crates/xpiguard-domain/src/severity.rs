//! Severity model: every rule source's native scale mapped onto the canonical one.
//!
//! The mapping tables are fixed. A value outside a source's declared domain is a defect
//! in whatever produced it and surfaces as [`ContractError::UnknownSeverity`].

use crate::error::ContractError;
use std::fmt;
use xpiguard_types::Severity;

// Script rule engine scale.
pub const SCRIPT_RULES_NOTICE: i64 = 0;
pub const SCRIPT_RULES_WARNING: i64 = 1;
pub const SCRIPT_RULES_ERROR: i64 = 2;

// Validator scale.
pub const VALIDATION_ERROR: &str = "error";
pub const VALIDATION_NOTICE: &str = "notice";
pub const VALIDATION_WARNING: &str = "warning";

/// Which rule source produced a native severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SeveritySource {
    /// Numeric `0/1/2` scale of the script rule engine.
    ScriptRules,
    /// String scale used by the manifest, markup and package validators.
    Validator,
}

impl fmt::Display for SeveritySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeveritySource::ScriptRules => f.write_str("script-rules"),
            SeveritySource::Validator => f.write_str("validator"),
        }
    }
}

/// A severity as the rule source expressed it, before normalization.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NativeSeverity {
    Numeric(i64),
    Label(String),
}

impl fmt::Display for NativeSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeSeverity::Numeric(n) => write!(f, "{n}"),
            NativeSeverity::Label(s) => write!(f, "{s:?}"),
        }
    }
}

/// Translate a native severity into the canonical scale.
pub fn severity_of(
    source: SeveritySource,
    native: &NativeSeverity,
) -> Result<Severity, ContractError> {
    let mapped = match (source, native) {
        (SeveritySource::ScriptRules, NativeSeverity::Numeric(n)) => match *n {
            SCRIPT_RULES_NOTICE => Some(Severity::Notice),
            SCRIPT_RULES_WARNING => Some(Severity::Warning),
            SCRIPT_RULES_ERROR => Some(Severity::Error),
            _ => None,
        },
        (SeveritySource::Validator, NativeSeverity::Label(label)) => match label.as_str() {
            VALIDATION_NOTICE => Some(Severity::Notice),
            VALIDATION_WARNING => Some(Severity::Warning),
            VALIDATION_ERROR => Some(Severity::Error),
            _ => None,
        },
        // A representation of the wrong kind is outside the source's domain too.
        _ => None,
    };

    mapped.ok_or_else(|| ContractError::UnknownSeverity {
        scale: source,
        value: native.to_string(),
    })
}
