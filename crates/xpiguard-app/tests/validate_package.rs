//! End-to-end validation of whole packages through the app layer.

use camino::Utf8Path;
use futures::executor::block_on;
use std::collections::BTreeSet;
use xpiguard_app::{
    HostArtifact, ValidationInput, ValidationOutput, parse_report_json, read_config_text,
    run_validation, serialize_report,
};
use xpiguard_domain::model::{Artifact, ManifestTag, MarkupElement};
use xpiguard_settings::Overrides;
use xpiguard_test_util::normalize_nondeterministic;
use xpiguard_types::{PackagePath, Severity, Verdict, ids};

fn run(config_text: &str, overrides: Overrides, artifacts: Vec<HostArtifact>) -> ValidationOutput {
    block_on(run_validation(ValidationInput {
        config_text,
        overrides,
        artifacts,
    }))
    .expect("run_validation")
}

fn manifest(names: &[&str]) -> HostArtifact {
    Artifact::Manifest {
        path: PackagePath::new("install.rdf"),
        tags: names
            .iter()
            .enumerate()
            .map(|(i, name)| ManifestTag::new(*name, Some(i as u32 + 1)))
            .collect(),
    }
    .into()
}

fn codes(output: &ValidationOutput) -> Vec<&str> {
    output.report.findings.iter().map(|f| f.code.as_str()).collect()
}

fn sample_package() -> Vec<HostArtifact> {
    vec![
        HostArtifact::script("content/a.js", "var db = window.mozIndexedDB;"),
        HostArtifact::script("content/b.js", "var m = \"d;"),
        HostArtifact::script(
            "content/c.js",
            "var x = 1;\nvar myDatabase = indexeddb || mozIndexedDB;",
        ),
        manifest(&["hidden", "skin", "updateKey", "updateURL"]),
        Artifact::Markup {
            path: PackagePath::new("content/options.xul"),
            elements: vec![MarkupElement {
                tag: "prefwindow".to_string(),
                attributes: BTreeSet::from(["title".to_string()]),
                line: Some(2),
            }],
        }
        .into(),
        Artifact::LegacyMetadata {
            path: PackagePath::new("install.rdf"),
            type_code: 2,
            line: Some(9),
        }
        .into(),
    ]
}

#[test]
fn scenario_d_tag_rules() {
    let hidden = run("", Overrides::default(), vec![manifest(&["hidden"])]);
    assert_eq!(codes(&hidden), vec![ids::CODE_TAG_NOT_ALLOWED]);
    assert_eq!(hidden.report.findings[0].severity, Severity::Error);

    let lone_key = run("", Overrides::default(), vec![manifest(&["updateKey"])]);
    assert!(lone_key.report.findings.is_empty());
    assert_eq!(lone_key.report.verdict, Verdict::Pass);

    let pair = run(
        "",
        Overrides::default(),
        vec![manifest(&["updateKey", "updateURL"])],
    );
    assert_eq!(codes(&pair), vec![ids::CODE_TAG_NOT_ALLOWED_IF_LISTED]);
    assert_eq!(pair.report.verdict, Verdict::Fail);
}

#[test]
fn mixed_package_reports_every_artifact() {
    let output = run("", Overrides::default(), sample_package());
    let report = &output.report;

    assert_eq!(report.verdict, Verdict::Fail);
    assert_eq!(
        codes(&output),
        vec![
            ids::CODE_MOZINDEXEDDB_PROPERTY,
            ids::CODE_JS_SYNTAX_ERROR,
            ids::CODE_MOZINDEXEDDB,
            ids::CODE_MISSING_REQUIRED_ATTRIBUTE,
            ids::CODE_TAG_NOT_ALLOWED,
            ids::CODE_TAG_OBSOLETE,
            ids::CODE_TAG_NOT_ALLOWED_IF_LISTED,
        ]
    );
    assert_eq!(report.data.scripts_scanned, 3);
    assert_eq!(report.data.manifests_scanned, 1);
    assert_eq!(report.data.markup_scanned, 1);
    assert_eq!(report.data.package_type.as_deref(), Some("extension"));
    assert_eq!(report.data.findings_total, 7);
    assert!(report.findings.iter().all(|f| f.fingerprint.is_some()));
}

#[test]
fn broken_script_does_not_hide_its_siblings() {
    let output = run(
        "",
        Overrides::default(),
        vec![
            HostArtifact::script("a.js", "var aVarThatDoesnt != exist;"),
            HostArtifact::script("b.js", "var myDatabase = window[\"mozIndexedDB\"];"),
        ],
    );
    assert_eq!(
        codes(&output),
        vec![ids::CODE_JS_SYNTAX_ERROR, ids::CODE_MOZINDEXEDDB_PROPERTY]
    );
    let syntax = &output.report.findings[0];
    assert_eq!(syntax.check_id, ids::CHECK_JS_SYNTAX);
    assert_eq!(syntax.severity, Severity::Error);
    assert_eq!(
        syntax.location.as_ref().map(|l| l.path.as_str()),
        Some("a.js")
    );
}

#[test]
fn report_is_independent_of_concurrency() {
    let serial = Overrides {
        max_concurrency: Some(1),
        ..Overrides::default()
    };
    let wide = Overrides {
        max_concurrency: Some(16),
        ..Overrides::default()
    };

    let normalized = |overrides| {
        let output = run("", overrides, sample_package());
        let bytes = serialize_report(&output.report).expect("serialize");
        normalize_nondeterministic(serde_json::from_slice(&bytes).expect("json"))
    };

    assert_eq!(normalized(serial), normalized(wide));
}

#[test]
fn serialized_report_parses_back() {
    let output = run("", Overrides::default(), sample_package());
    let bytes = serialize_report(&output.report).expect("serialize");
    let text = String::from_utf8(bytes).expect("utf8");
    assert!(text.contains("\"schema\": \"xpiguard.report.v1\""));
    assert_eq!(parse_report_json(&text).expect("parse"), output.report);
}

#[test]
fn config_file_on_disk_is_honored() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let root = Utf8Path::from_path(tmp.path()).expect("utf8 path");
    let path = root.join("xpiguard.toml");
    std::fs::write(
        &path,
        r#"
profile = "warn"

[suppression]
directive = "xpiguard-disable"
scope = "next_line"

[checks."js.restricted_api"]
allow = ["vendor/**"]
"#,
    )
    .expect("write config");

    let config_text = read_config_text(&path).expect("read config");
    let output = run(
        &config_text,
        Overrides::default(),
        vec![
            HostArtifact::script("vendor/lib/db.js", "var a = mozIndexedDB;"),
            HostArtifact::script(
                "content/main.js",
                "// xpiguard-disable\nvar a = mozIndexedDB;\nvar b = window.mozIndexedDB;",
            ),
            manifest(&["skin"]),
        ],
    );

    assert_eq!(output.resolved_config.effective.profile, "warn");
    // next_line covers line 2 only; the vendor script is allowlisted.
    assert_eq!(
        codes(&output),
        vec![ids::CODE_MOZINDEXEDDB_PROPERTY, ids::CODE_TAG_OBSOLETE]
    );
    assert_eq!(output.report.findings[0].location.as_ref().and_then(|l| l.line), Some(3));
    // warn profile fails on warnings.
    assert_eq!(output.report.verdict, Verdict::Fail);
}

#[test]
fn truncation_is_recorded() {
    let output = run(
        "",
        Overrides {
            max_findings: Some(2),
            ..Overrides::default()
        },
        sample_package(),
    );
    assert_eq!(output.report.findings.len(), 2);
    assert_eq!(output.report.data.findings_total, 7);
    assert_eq!(output.report.data.findings_emitted, 2);
    assert_eq!(
        output.report.data.truncated_reason.as_deref(),
        Some("findings truncated to max_findings=2")
    );
}

#[test]
fn verdict_is_computed_before_truncation() {
    let artifacts = || {
        let mut artifacts: Vec<HostArtifact> = (0..3)
            .map(|i| {
                let path = PackagePath::new(format!("a{i}.js"));
                HostArtifact::script(path, "var d = window.mozIndexedDB;")
            })
            .collect();
        artifacts.push(
            Artifact::Manifest {
                path: PackagePath::new("z/install.rdf"),
                tags: vec![ManifestTag::new("hidden", Some(1))],
            }
            .into(),
        );
        artifacts
    };
    let limited = |max_findings| Overrides {
        max_findings: Some(max_findings),
        ..Overrides::default()
    };

    let output = run("", limited(2), artifacts());
    assert_eq!(
        codes(&output),
        vec![ids::CODE_MOZINDEXEDDB_PROPERTY, ids::CODE_MOZINDEXEDDB_PROPERTY]
    );
    assert_eq!(output.report.verdict, Verdict::Fail);

    let err = block_on(run_validation(ValidationInput {
        config_text: "",
        overrides: limited(0),
        artifacts: artifacts(),
    }))
    .unwrap_err();
    assert!(format!("{err:#}").contains("max_findings must be at least 1"));
}
