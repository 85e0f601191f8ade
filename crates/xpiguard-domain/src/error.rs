use crate::severity::SeveritySource;

/// Defects in the engine, its static tables, or the configuration handed to it.
///
/// These never describe the scanned package; problems with the package are findings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    #[error("unknown {scale} severity: {value}")]
    UnknownSeverity { scale: SeveritySource, value: String },

    #[error("malformed tag rule for '{tag}': {reason}")]
    MalformedTagRule { tag: String, reason: String },

    #[error("invalid allow pattern for {check_id}: {pattern}")]
    InvalidAllowPattern { check_id: String, pattern: String },
}
