//! Report envelope serialization.

use anyhow::Context;
use camino::Utf8Path;
use xpiguard_types::{SCHEMA_REPORT_V1, XpiguardReport};

pub fn serialize_report(report: &XpiguardReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

/// Parse a previously written report. Only `xpiguard.report.v1` is accepted.
pub fn parse_report_json(text: &str) -> anyhow::Result<XpiguardReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema}");
    }

    serde_json::from_value(value).context("parse xpiguard v1 report")
}

pub fn write_report(path: &Utf8Path, report: &XpiguardReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    let data = serialize_report(report)?;
    std::fs::write(path, data).with_context(|| format!("write report: {path}"))?;
    Ok(())
}
