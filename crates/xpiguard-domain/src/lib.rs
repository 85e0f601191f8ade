//! Pure package validation (no IO).
//!
//! Input: artifacts extracted and parsed elsewhere.
//! Output: canonical findings + verdict + summary data.

#![forbid(unsafe_code)]

pub mod aggregate;
pub mod classify;
pub mod error;
pub mod message;
pub mod model;
pub mod policy;
pub mod report;
pub mod rules;
pub mod script;
pub mod severity;
pub mod tags;

mod engine;
mod fingerprint;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use aggregate::aggregate;
pub use classify::{PackageType, UnrecognizedType, classify};
pub use engine::evaluate_package;
pub use error::ContractError;
pub use severity::{NativeSeverity, SeveritySource, severity_of};
