//! The `validate` use case: resolve config, scan every artifact, produce a report.

use anyhow::Context;
use camino::Utf8Path;
use futures::FutureExt;
use time::OffsetDateTime;
use xpiguard_domain::model::Artifact;
use xpiguard_settings::{Overrides, ResolvedConfig};
use xpiguard_types::{PackagePath, ReportEnvelope, SCHEMA_REPORT_V1, ToolMeta, XpiguardReport};

/// An artifact as the host hands it over.
///
/// Scripts may arrive as raw text. They are parsed by the bundled parser inside the scan's
/// future, so parsing runs under the same concurrency bound as scanning.
#[derive(Debug)]
pub enum HostArtifact {
    Script { path: PackagePath, source: String },
    Extracted(Artifact),
}

impl HostArtifact {
    pub fn script(path: impl Into<PackagePath>, source: impl Into<String>) -> Self {
        HostArtifact::Script {
            path: path.into(),
            source: source.into(),
        }
    }

    fn into_artifact(self) -> Artifact {
        match self {
            HostArtifact::Script { path, source } => Artifact::deferred_script(
                path,
                async move { xpiguard_script_parser::parse(&source) }.boxed(),
            ),
            HostArtifact::Extracted(artifact) => artifact,
        }
    }
}

impl From<Artifact> for HostArtifact {
    fn from(artifact: Artifact) -> Self {
        HostArtifact::Extracted(artifact)
    }
}

/// Input for the validate use case.
#[derive(Debug)]
pub struct ValidationInput<'a> {
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// Host overrides (profile, limits).
    pub overrides: Overrides,
    /// Package artifacts in extraction order.
    pub artifacts: Vec<HostArtifact>,
}

/// Output from the validate use case.
#[derive(Clone, Debug)]
pub struct ValidationOutput {
    pub report: XpiguardReport,
    pub resolved_config: ResolvedConfig,
}

/// Run the validate use case: parse config, evaluate the package, produce the report envelope.
#[tracing::instrument(skip_all)]
pub async fn run_validation(input: ValidationInput<'_>) -> anyhow::Result<ValidationOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        xpiguard_settings::XpiguardConfigV1::default()
    } else {
        xpiguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved =
        xpiguard_settings::resolve_config(cfg, input.overrides).context("resolve config")?;

    let artifacts: Vec<Artifact> = input
        .artifacts
        .into_iter()
        .map(HostArtifact::into_artifact)
        .collect();
    tracing::info!(
        artifacts = artifacts.len(),
        profile = %resolved.effective.profile,
        "validating package"
    );

    let domain_report = xpiguard_domain::evaluate_package(artifacts, &resolved.effective)
        .await
        .context("evaluate package")?;

    let finished_at = OffsetDateTime::now_utc();
    tracing::info!(
        verdict = ?domain_report.verdict,
        errors = domain_report.counts.error,
        warnings = domain_report.counts.warning,
        "validation finished"
    );

    let report = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "xpiguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at,
        verdict: domain_report.verdict,
        findings: domain_report.findings,
        data: domain_report.data,
    };

    Ok(ValidationOutput {
        report,
        resolved_config: resolved,
    })
}

/// Read `xpiguard.toml` from disk. A missing file yields an empty string so defaults apply.
pub fn read_config_text(path: &Utf8Path) -> anyhow::Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(%path, "config file not found, using defaults");
            Ok(String::new())
        }
        Err(err) => Err(err).with_context(|| format!("read config: {path}")),
    }
}
