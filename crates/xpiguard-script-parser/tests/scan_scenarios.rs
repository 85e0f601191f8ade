//! Script text through the reference parser and the engine's scanner.

use futures::executor::block_on;
use xpiguard_domain::message::Message;
use xpiguard_domain::policy::{SuppressionConfig, SuppressionScope};
use xpiguard_domain::script::scan;
use xpiguard_domain::{NativeSeverity, SeveritySource, severity_of};
use xpiguard_script_parser::parse;
use xpiguard_types::{PackagePath, Severity, ids};

fn scan_text(src: &str) -> Vec<Message> {
    scan_text_with(src, &SuppressionConfig::default())
}

fn scan_text_with(src: &str, suppression: &SuppressionConfig) -> Vec<Message> {
    let text = src.to_string();
    block_on(scan(
        async move { parse(&text) },
        PackagePath::new("content/main.js"),
        suppression,
    ))
}

fn canonical(messages: &[Message]) -> Vec<(&'static str, Severity)> {
    messages
        .iter()
        .map(|m| (m.code, severity_of(m.source, &m.severity).unwrap()))
        .collect()
}

#[test]
fn direct_global_reference_is_an_error() {
    let out = scan_text("var myDatabase = indexeddb || mozIndexedDB;");
    assert_eq!(canonical(&out), vec![(ids::CODE_MOZINDEXEDDB, Severity::Error)]);
    assert_eq!(out[0].source, SeveritySource::ScriptRules);
    assert_eq!(out[0].severity, NativeSeverity::Numeric(2));
    assert_eq!((out[0].location.line, out[0].location.col), (Some(1), Some(31)));
}

#[test]
fn dot_access_is_a_warning() {
    let out = scan_text("var myDatabase = window.mozIndexedDB;");
    assert_eq!(
        canonical(&out),
        vec![(ids::CODE_MOZINDEXEDDB_PROPERTY, Severity::Warning)]
    );
}

#[test]
fn literal_bracket_access_is_a_warning() {
    let out = scan_text(r#"var myDatabase = window["mozIndexedDB"];"#);
    assert_eq!(
        canonical(&out),
        vec![(ids::CODE_MOZINDEXEDDB_PROPERTY, Severity::Warning)]
    );
}

#[test]
fn escaped_literal_key_is_still_a_literal() {
    let out = scan_text(r#"var db = window["moz\u0049ndexedDB"];"#);
    assert_eq!(
        canonical(&out),
        vec![(ids::CODE_MOZINDEXEDDB_PROPERTY, Severity::Warning)]
    );
}

#[test]
fn assembled_names_are_not_detected() {
    for src in [
        r#"var a = "moz"; var b = "IndexedDB"; var db = window[a + b];"#,
        r#"var name = "mozIndexedDB"; var db = window[name];"#,
        r#"var db = window["moz" + "IndexedDB"];"#,
    ] {
        assert!(scan_text(src).is_empty(), "{src}");
    }
}

#[test]
fn declarations_keys_and_parameters_are_not_references() {
    let src = r#"
        var mozIndexedDB = null;
        function open(mozIndexedDB) { return 1; }
        var config = { mozIndexedDB: true };
    "#;
    assert!(scan_text(src).is_empty());
}

#[test]
fn unterminated_string_is_one_syntax_error() {
    let out = scan_text("var m = \"d;");
    assert_eq!(canonical(&out), vec![(ids::CODE_JS_SYNTAX_ERROR, Severity::Error)]);
}

#[test]
fn stray_inequality_is_one_syntax_error() {
    let out = scan_text("var aVarThatDoesnt != exist;");
    assert_eq!(canonical(&out), vec![(ids::CODE_JS_SYNTAX_ERROR, Severity::Error)]);
    assert_eq!(out[0].location.line, Some(1));
}

#[test]
fn syntax_error_suppresses_rule_matching() {
    let out = scan_text("mozIndexedDB;\nvar broken = ;");
    assert_eq!(canonical(&out), vec![(ids::CODE_JS_SYNTAX_ERROR, Severity::Error)]);
}

#[test]
fn eslint_disable_is_not_honored() {
    let out = scan_text("/*eslint-disable*/\nvar myDatabase = indexeddb || mozIndexedDB;");
    assert_eq!(canonical(&out), vec![(ids::CODE_MOZINDEXEDDB, Severity::Error)]);
}

#[test]
fn own_directive_suppresses_rest_of_file() {
    let src = "window.mozIndexedDB;\n/* xpiguard-disable */\nmozIndexedDB;\nwindow.mozIndexedDB;";
    let out = scan_text(src);
    assert_eq!(
        canonical(&out),
        vec![(ids::CODE_MOZINDEXEDDB_PROPERTY, Severity::Warning)]
    );
    assert_eq!(out[0].location.line, Some(1));
}

#[test]
fn next_line_scope() {
    let cfg = SuppressionConfig {
        scope: SuppressionScope::NextLine,
        ..SuppressionConfig::default()
    };
    let src = "// xpiguard-disable\nmozIndexedDB;\nmozIndexedDB;";
    let out = scan_text_with(src, &cfg);
    let lines: Vec<_> = out.iter().map(|m| m.location.line).collect();
    assert_eq!(lines, vec![Some(3)]);
}

#[test]
fn findings_keep_traversal_order() {
    let src = concat!(
        "function f() {\n",
        "  return window.mozIndexedDB || mozIndexedDB;\n",
        "}\n",
        "self['mozIndexedDB'];",
    );
    let out = scan_text(src);
    assert_eq!(
        canonical(&out),
        vec![
            (ids::CODE_MOZINDEXEDDB_PROPERTY, Severity::Warning),
            (ids::CODE_MOZINDEXEDDB, Severity::Error),
            (ids::CODE_MOZINDEXEDDB_PROPERTY, Severity::Warning),
        ]
    );
}

#[test]
fn modern_syntax_is_scanned_instead_of_rejected() {
    for (src, expected) in [
        (
            "const open = () => mozIndexedDB;",
            (ids::CODE_MOZINDEXEDDB, Severity::Error),
        ),
        (
            "var s = `db`; var d = mozIndexedDB;",
            (ids::CODE_MOZINDEXEDDB, Severity::Error),
        ),
        (
            "class Store { get db() { return window.mozIndexedDB; } }",
            (ids::CODE_MOZINDEXEDDB_PROPERTY, Severity::Warning),
        ),
        (
            "var o = { mozIndexedDB };",
            (ids::CODE_MOZINDEXEDDB, Severity::Error),
        ),
        (
            "for (const k of list) { mozIndexedDB; }",
            (ids::CODE_MOZINDEXEDDB, Severity::Error),
        ),
        (
            "const db = `${window.mozIndexedDB}`;",
            (ids::CODE_MOZINDEXEDDB_PROPERTY, Severity::Warning),
        ),
    ] {
        assert_eq!(canonical(&scan_text(src)), vec![expected], "{src}");
    }
}

#[test]
fn regex_after_a_parenthesized_condition_is_not_a_division() {
    let out = scan_text("if (ok) /moz/.test(s); var d = mozIndexedDB;");
    assert_eq!(canonical(&out), vec![(ids::CODE_MOZINDEXEDDB, Severity::Error)]);
    assert_eq!((out[0].location.line, out[0].location.col), (Some(1), Some(32)));
}

#[test]
fn destructuring_declarations_are_not_references() {
    let src = "const { mozIndexedDB } = window; let [mozIndexedDB2] = list;";
    assert!(scan_text(src).is_empty());

    let out = scan_text("({ mozIndexedDB } = window);");
    assert_eq!(canonical(&out), vec![(ids::CODE_MOZINDEXEDDB, Severity::Error)]);
}

#[test]
fn code_before_a_directive_on_the_same_line_is_reported() {
    let out = scan_text("mozIndexedDB; // xpiguard-disable\nmozIndexedDB;\nwindow.mozIndexedDB;");
    assert_eq!(canonical(&out), vec![(ids::CODE_MOZINDEXEDDB, Severity::Error)]);
    assert_eq!(out[0].location.line, Some(1));
}
