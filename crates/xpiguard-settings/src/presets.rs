use xpiguard_domain::policy::{CheckPolicy, EffectiveConfig, FailOn};
use xpiguard_types::ids;

pub const PROFILES: &[&str] = &["strict", "warn", "compat"];

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into package config.
pub fn preset(profile: &str) -> anyhow::Result<EffectiveConfig> {
    match profile {
        "strict" => Ok(strict_profile()),
        "warn" => Ok(warn_profile()),
        "compat" => Ok(compat_profile()),
        other => anyhow::bail!("unknown profile: {other} (expected strict|warn|compat)"),
    }
}

fn strict_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "strict".to_string(),
        fail_on: FailOn::Error,
        max_findings: 200,
        ..EffectiveConfig::default()
    }
}

fn warn_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "warn".to_string(),
        fail_on: FailOn::Warning,
        max_findings: 200,
        ..EffectiveConfig::default()
    }
}

fn compat_profile() -> EffectiveConfig {
    // Older packages still ship obsolete tags; compat stops reporting them.
    let mut cfg = EffectiveConfig {
        profile: "compat".to_string(),
        fail_on: FailOn::Error,
        max_findings: 1000,
        ..EffectiveConfig::default()
    };
    cfg.checks.insert(
        ids::CHECK_MANIFEST_OBSOLETE_TAGS.to_string(),
        CheckPolicy::disabled(),
    );
    cfg
}
