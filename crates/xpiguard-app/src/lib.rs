//! Use case orchestration for xpiguard.
//!
//! This crate provides the application layer: it resolves configuration, turns host-supplied
//! artifacts into domain artifacts (parsing scripts lazily), runs the domain engine and wraps
//! the result in the versioned report envelope. It is intentionally thin.

#![forbid(unsafe_code)]

mod explain;
mod report;
mod validate;

pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use report::{parse_report_json, serialize_report, write_report};
pub use validate::{
    HostArtifact, ValidationInput, ValidationOutput, read_config_text, run_validation,
};
