//! Developer tasks (schema generation, explain coverage, report conformance).
//!
//! Keeping this separate keeps the library crates free of tooling dependencies.

use anyhow::{Context, bail};
use camino::Utf8Path;
use futures::executor::block_on;
use schemars::schema_for;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use xpiguard_app::{HostArtifact, ValidationInput, parse_report_json, run_validation, write_report};
use xpiguard_domain::model::{Artifact, ManifestTag, MarkupElement};
use xpiguard_settings::Overrides;
use xpiguard_types::PackagePath;

/// Project root (parent of the xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .unwrap_or(manifest_dir)
        .to_path_buf()
}

fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_report_schema() -> schemars::Schema {
    schema_for!(xpiguard_types::XpiguardReport)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(xpiguard_settings::XpiguardConfigV1)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "xpiguard.report.v1.json",
            generate: generate_report_schema,
        },
        SchemaSpec {
            filename: "xpiguard.config.v1.json",
            generate: generate_config_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Check that the committed schemas match what the types generate.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }

    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {name}");
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {name}");
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

/// No absolute paths, no `..` segments, forward slashes only.
fn is_clean_path(path: &str) -> bool {
    !(path.starts_with('/')
        || path.contains('\\')
        || path.split('/').any(|seg| seg == "..")
        || (path.len() >= 2 && path.as_bytes()[1] == b':'))
}

/// A package that triggers every check at least once.
fn sample_package() -> Vec<HostArtifact> {
    vec![
        HostArtifact::script(
            "chrome/content/db.js",
            "var myDatabase = indexeddb || mozIndexedDB;\nvar alt = window[\"mozIndexedDB\"];",
        ),
        HostArtifact::script("chrome/content/broken.js", "var m = \"d;"),
        Artifact::Manifest {
            path: PackagePath::new("install.rdf"),
            tags: ["hidden", "updateKey", "updateURL", "skin"]
                .iter()
                .zip(1u32..)
                .map(|(name, line)| ManifestTag::new(*name, Some(line)))
                .collect(),
        }
        .into(),
        Artifact::Markup {
            path: PackagePath::new("chrome/content/options.xul"),
            elements: vec![MarkupElement {
                tag: "prefwindow".to_string(),
                attributes: BTreeSet::new(),
                line: Some(1),
            }],
        }
        .into(),
        Artifact::LegacyMetadata {
            path: PackagePath::new("install.rdf"),
            type_code: 16,
            line: Some(12),
        }
        .into(),
    ]
}

fn sample_report_json(max_concurrency: u32) -> anyhow::Result<serde_json::Value> {
    let output = block_on(run_validation(ValidationInput {
        config_text: "",
        overrides: Overrides {
            max_concurrency: Some(max_concurrency),
            ..Overrides::default()
        },
        artifacts: sample_package(),
    }))
    .context("validate sample package")?;

    // Round-trip through disk so the writer and reader are exercised too.
    let temp_dir = tempfile::tempdir().context("Failed to create temp dir")?;
    let out = temp_dir.path().join("report.json");
    let out = Utf8Path::from_path(&out).context("temp dir path is not UTF-8")?;
    write_report(out, &output.report)?;
    let text = fs::read_to_string(out).with_context(|| format!("Failed to read {out}"))?;
    let report = parse_report_json(&text)?;
    serde_json::to_value(&report).context("Failed to convert report to JSON")
}

/// Validate generated reports against the report schema.
///
/// Checks schema validity, path hygiene, and that the normalized report does not depend on
/// scan concurrency.
fn conform() -> anyhow::Result<()> {
    let schema = serde_json::to_value(generate_report_schema()).context("schema to JSON")?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| anyhow::anyhow!("Failed to compile report schema: {e}"))?;
    println!("✓ xpiguard.report.v1 schema compiles");

    let serial = sample_report_json(1)?;
    let wide = sample_report_json(8)?;
    let mut errors = Vec::new();

    for err in validator.iter_errors(&serial) {
        errors.push(format!("schema validation: {err}"));
    }

    let findings = serial
        .get("findings")
        .and_then(|v| v.as_array())
        .map(Vec::as_slice)
        .unwrap_or_default();
    let finding_count = findings.len();
    if findings.is_empty() {
        errors.push("sample package produced no findings".to_string());
    }
    for (i, finding) in findings.iter().enumerate() {
        if let Some(path) = finding.pointer("/location/path").and_then(|v| v.as_str())
            && !is_clean_path(path)
        {
            errors.push(format!("finding[{i}].location.path '{path}' is not clean"));
        }
    }

    if xpiguard_test_util::normalize_nondeterministic(serial)
        != xpiguard_test_util::normalize_nondeterministic(wide)
    {
        errors.push("report differs between max_concurrency=1 and max_concurrency=8".to_string());
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("✓ {finding_count} findings validate");
    println!("\n✓ Conformance checks passed!");
    Ok(())
}

/// Every check id and code must have a complete explanation.
fn explain_coverage() -> anyhow::Result<()> {
    use xpiguard_types::explain::{all_check_ids, all_codes, lookup_explanation};

    let mut errors = Vec::new();
    let entries = all_check_ids()
        .iter()
        .map(|id| ("Check ID", *id))
        .chain(all_codes().iter().map(|code| ("Code", *code)));

    for (kind, identifier) in entries {
        let Some(exp) = lookup_explanation(identifier) else {
            errors.push(format!("{kind} '{identifier}' has no explanation"));
            continue;
        };
        for (field, text) in [
            ("title", exp.title),
            ("description", exp.description),
            ("remediation", exp.remediation),
            ("before example", exp.examples.before),
            ("after example", exp.examples.after),
        ] {
            if text.trim().is_empty() {
                errors.push(format!("{kind} '{identifier}' has empty {field}"));
            }
        }
    }

    if errors.is_empty() {
        println!("✓ {} check IDs have explanations", all_check_ids().len());
        println!("✓ {} codes have explanations", all_codes().len());
        println!("\n✓ All explain coverage checks passed!");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {error}");
        }
        bail!(
            "Explain coverage validation failed with {} errors",
            errors.len()
        )
    }
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check that schemas/ matches the generated schemas");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Validate a sample report against the report schema");
    eprintln!("  explain-coverage  Validate all check IDs and codes have explanations");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
