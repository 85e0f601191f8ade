use crate::aggregate::aggregate;
use crate::classify::classify;
use crate::error::ContractError;
use crate::message::Message;
use crate::model::{Artifact, ArtifactKind, ScriptInput};
use crate::policy::{EffectiveConfig, FailOn};
use crate::report::{DomainReport, SeverityCounts};
use crate::script::scan;
use crate::tags::{validate_markup, validate_tags};
use futures::future::ready;
use futures::stream::{self, StreamExt};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::BTreeMap;
use xpiguard_types::{Finding, Location, Severity, Verdict, XpiguardData, ids};

/// Validate every artifact of one package and build the report.
///
/// At most `cfg.max_concurrency` artifacts are in flight at once. Findings are ordered
/// deterministically regardless of completion order.
pub async fn evaluate_package(
    artifacts: Vec<Artifact>,
    cfg: &EffectiveConfig,
) -> Result<DomainReport, ContractError> {
    cfg.tag_rules.validate()?;
    let allowlists = compile_allowlists(cfg)?;

    let count = |kind: ArtifactKind| artifacts.iter().filter(|a| a.kind() == kind).count() as u32;
    let scripts_scanned = count(ArtifactKind::Script);
    let manifests_scanned = count(ArtifactKind::Manifest);
    let markup_scanned = count(ArtifactKind::Markup);
    let package_type = artifacts.iter().find_map(|a| match a {
        Artifact::LegacyMetadata { type_code, .. } => classify(*type_code).ok(),
        _ => None,
    });

    tracing::debug!(
        artifacts = artifacts.len(),
        max_concurrency = cfg.max_concurrency,
        "evaluating package"
    );

    let mut outcomes: Vec<(usize, Vec<Message>)> = stream::iter(artifacts.into_iter().enumerate())
        .map(|(index, artifact)| async move { (index, validate_artifact(artifact, cfg).await) })
        .buffer_unordered(cfg.max_concurrency.max(1))
        .collect()
        .await;
    outcomes.sort_by_key(|(index, _)| *index);

    let sequences: Vec<Vec<Message>> = outcomes
        .into_iter()
        .map(|(_, messages)| {
            messages
                .into_iter()
                .filter(|m| is_reported(m, cfg, &allowlists))
                .collect()
        })
        .collect();

    let findings = aggregate(sequences)?;
    let total = findings.len() as u32;
    let verdict = compute_verdict(&findings, cfg.fail_on);
    let counts = SeverityCounts::from_findings(&findings);

    let mut emitted = findings;
    let mut truncated_reason: Option<String> = None;
    if emitted.len() > cfg.max_findings {
        emitted.truncate(cfg.max_findings);
        truncated_reason = Some(format!(
            "findings truncated to max_findings={}",
            cfg.max_findings
        ));
    }

    let data = XpiguardData {
        profile: cfg.profile.clone(),
        scripts_scanned,
        manifests_scanned,
        markup_scanned,
        package_type: package_type.map(|t| t.as_str().to_string()),
        findings_total: total,
        findings_emitted: emitted.len() as u32,
        truncated_reason,
    };

    Ok(DomainReport {
        verdict,
        findings: emitted,
        data,
        counts,
    })
}

async fn validate_artifact(artifact: Artifact, cfg: &EffectiveConfig) -> Vec<Message> {
    match artifact {
        Artifact::Script { path, input } => match input {
            ScriptInput::Parsed(outcome) => scan(ready(outcome), path, &cfg.suppression).await,
            ScriptInput::Deferred(outcome) => scan(outcome, path, &cfg.suppression).await,
        },
        Artifact::Manifest { path, tags } => validate_tags(&tags, &path, &cfg.tag_rules),
        Artifact::Markup { path, elements } => validate_markup(&elements, &path),
        Artifact::LegacyMetadata {
            path,
            type_code,
            line,
        } => match classify(type_code) {
            Ok(_) => Vec::new(),
            Err(unrecognized) => vec![unrecognized.to_message(Location::at(path, line, None))],
        },
    }
}

fn compile_allowlists(cfg: &EffectiveConfig) -> Result<BTreeMap<&str, GlobSet>, ContractError> {
    let mut out = BTreeMap::new();
    for (check_id, policy) in &cfg.checks {
        if policy.allow.is_empty() || check_id == ids::CHECK_JS_SYNTAX {
            continue;
        }
        let invalid = |pattern: &str| ContractError::InvalidAllowPattern {
            check_id: check_id.clone(),
            pattern: pattern.to_string(),
        };
        let mut builder = GlobSetBuilder::new();
        for pattern in &policy.allow {
            builder.add(Glob::new(pattern).map_err(|_| invalid(pattern))?);
        }
        let set = builder.build().map_err(|_| invalid(&policy.allow.join(", ")))?;
        out.insert(check_id.as_str(), set);
    }
    Ok(out)
}

fn is_reported(
    msg: &Message,
    cfg: &EffectiveConfig,
    allowlists: &BTreeMap<&str, GlobSet>,
) -> bool {
    if !cfg.is_enabled(msg.check_id) {
        return false;
    }
    !allowlists
        .get(msg.check_id)
        .is_some_and(|set| set.is_match(msg.location.path.as_str()))
}

fn compute_verdict(findings: &[Finding], fail_on: FailOn) -> Verdict {
    let has_error = findings.iter().any(|f| f.severity == Severity::Error);
    if has_error {
        return Verdict::Fail;
    }

    let has_warn = findings.iter().any(|f| f.severity == Severity::Warning);
    if has_warn {
        return match fail_on {
            FailOn::Warning => Verdict::Fail,
            FailOn::Error => Verdict::Warn,
        };
    }

    Verdict::Pass
}
