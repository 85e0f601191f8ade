use crate::{model::XpiguardConfigV1, presets};
use anyhow::Context;
use globset::Glob;
use std::collections::{BTreeMap, BTreeSet};
use xpiguard_domain::policy::{CheckPolicy, EffectiveConfig, FailOn, SuppressionScope};
use xpiguard_types::explain::all_check_ids;
use xpiguard_types::ids;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub max_findings: Option<u32>,
    pub max_concurrency: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
}

pub fn resolve_config(
    cfg: XpiguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "strict".to_string());

    let mut effective = presets::preset(&profile)?;

    // max findings
    if let Some(mf) = overrides.max_findings.or(cfg.max_findings) {
        if mf == 0 {
            anyhow::bail!("max_findings must be at least 1");
        }
        effective.max_findings = mf as usize;
    }

    if let Some(mc) = overrides.max_concurrency.or(cfg.max_concurrency) {
        if mc == 0 {
            anyhow::bail!("max_concurrency must be at least 1");
        }
        effective.max_concurrency = mc as usize;
    }

    if let Some(section) = &cfg.suppression {
        if let Some(directive) = &section.directive {
            if directive.trim().is_empty() {
                anyhow::bail!("suppression.directive must not be empty");
            }
            effective.suppression.directive = directive.trim().to_string();
        }
        if let Some(scope) = section.scope.as_deref() {
            effective.suppression.scope = parse_suppression_scope(scope)?;
        }
    }

    if let Some(tags) = &cfg.tags
        && !tags.cooccurrence.is_empty()
    {
        let overrides: BTreeMap<String, BTreeSet<String>> = tags
            .cooccurrence
            .iter()
            .map(|(tag, triggers)| (tag.clone(), triggers.iter().cloned().collect()))
            .collect();
        let rules = effective.tag_rules.with_cooccurrence(&overrides);
        rules.validate().context("invalid [tags.cooccurrence]")?;
        effective.tag_rules = rules;
    }

    // per-check overrides
    for (check_id, cc) in cfg.checks.iter() {
        if !all_check_ids().contains(&check_id.as_str()) {
            anyhow::bail!("unknown check id in config: {check_id}");
        }
        if check_id == ids::CHECK_JS_SYNTAX
            && (cc.enabled == Some(false) || !cc.allow.is_empty())
        {
            anyhow::bail!("{check_id} cannot be disabled or allowlisted");
        }

        let entry = effective
            .checks
            .entry(check_id.clone())
            .or_insert_with(CheckPolicy::enabled);

        if let Some(enabled) = cc.enabled {
            entry.enabled = enabled;
        }
        if !cc.allow.is_empty() {
            validate_allowlist(check_id, &cc.allow)?;
            entry.allow = cc.allow.clone();
        }
    }

    // fail_on override from config
    if let Some(fail_on_s) = cfg.fail_on.as_deref() {
        effective.fail_on = parse_fail_on(fail_on_s)?;
    }

    Ok(ResolvedConfig { effective })
}

fn validate_allowlist(check_id: &str, patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern)
            .with_context(|| format!("invalid allow glob for {check_id}: {pattern}"))?;
    }
    Ok(())
}

fn parse_suppression_scope(v: &str) -> anyhow::Result<SuppressionScope> {
    match v {
        "rest_of_file" => Ok(SuppressionScope::RestOfFile),
        "next_line" => Ok(SuppressionScope::NextLine),
        "off" => Ok(SuppressionScope::Off),
        other => anyhow::bail!(
            "unknown suppression scope: {other} (expected rest_of_file|next_line|off)"
        ),
    }
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "error" => Ok(FailOn::Error),
        "warning" | "warn" => Ok(FailOn::Warning),
        other => anyhow::bail!("unknown fail_on: {other} (expected error|warning)"),
    }
}
