//! Config parsing and profile/preset resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

use anyhow::Context;

pub use model::{CheckConfig, SuppressionSection, TagsSection, XpiguardConfigV1};
pub use presets::PROFILES;
pub use resolve::{Overrides, ResolvedConfig};

/// Stable schema identifier for `xpiguard.toml`.
pub const SCHEMA_CONFIG_V1: &str = "xpiguard.config.v1";

/// Parse `xpiguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<XpiguardConfigV1> {
    let cfg: XpiguardConfigV1 = toml::from_str(input).context("parse xpiguard.toml")?;
    Ok(cfg)
}

/// Resolve the effective config used by the engine (profiles + overrides + per-check config).
pub fn resolve_config(
    cfg: XpiguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
