//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Severity normalization totality
//! - Package type classification
//! - Aggregation order independence

use crate::aggregate::aggregate;
use crate::classify::{LEGACY_TYPE_MAP, UnrecognizedType, classify};
use crate::message::Message;
use crate::severity::{NativeSeverity, SeveritySource, severity_of};
use proptest::prelude::*;
use xpiguard_types::{Location, PackagePath, ids};

fn arb_path() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-c]{1,2}/[a-c]{1,3}\\.js").unwrap()
}

fn arb_message() -> impl Strategy<Value = Message> {
    (
        arb_path(),
        prop::option::of(1u32..20),
        prop::option::of(1u32..5),
        0i64..=2,
        prop::sample::select(vec![
            ids::CODE_MOZINDEXEDDB,
            ids::CODE_MOZINDEXEDDB_PROPERTY,
            ids::CODE_JS_SYNTAX_ERROR,
        ]),
    )
        .prop_map(|(path, line, col, severity, code)| {
            Message::script(
                severity,
                ids::CHECK_JS_RESTRICTED_API,
                code,
                "d",
                format!("{code} in {path}"),
                Location::at(PackagePath::new(path), line, col),
            )
        })
}

fn arb_sequences() -> impl Strategy<Value = Vec<Vec<Message>>> {
    prop::collection::vec(prop::collection::vec(arb_message(), 0..6), 0..6)
}

proptest! {
    #[test]
    fn script_rules_scale_is_total_on_its_domain(n in any::<i64>()) {
        let result = severity_of(SeveritySource::ScriptRules, &NativeSeverity::Numeric(n));
        prop_assert_eq!(result.is_ok(), (0..=2).contains(&n));
    }

    #[test]
    fn validator_scale_rejects_other_labels(label in "[a-zA-Z]{0,10}") {
        let result = severity_of(SeveritySource::Validator, &NativeSeverity::Label(label.clone()));
        let known = matches!(label.as_str(), "error" | "warning" | "notice");
        prop_assert_eq!(result.is_ok(), known);
    }

    #[test]
    fn classify_only_accepts_table_codes(code in any::<i64>()) {
        let known = LEGACY_TYPE_MAP.iter().any(|(c, _)| *c == code);
        match classify(code) {
            Ok(_) => prop_assert!(known),
            Err(UnrecognizedType { code: c }) => {
                prop_assert!(!known);
                prop_assert_eq!(c, code);
            }
        }
    }

    #[test]
    fn aggregation_ignores_sequence_order(
        (sequences, shuffled) in arb_sequences()
            .prop_flat_map(|s| (Just(s.clone()), Just(s).prop_shuffle())),
    ) {
        let forward = aggregate(sequences).unwrap();
        let reordered = aggregate(shuffled).unwrap();
        prop_assert_eq!(forward, reordered);
    }

    #[test]
    fn aggregation_output_is_sorted_and_unique_per_artifact(
        sequence in prop::collection::vec(arb_message(), 0..12)
    ) {
        let findings = aggregate(vec![sequence]).unwrap();
        for pair in findings.windows(2) {
            prop_assert_ne!(
                crate::aggregate::compare_findings(&pair[0], &pair[1]),
                std::cmp::Ordering::Greater
            );
            prop_assert_ne!(&pair[0].fingerprint, &pair[1].fingerprint);
        }
    }
}
