//! Fuzz target for scanning parsed scripts end to end.
//!
//! Goal: a scan always resolves, with at most one syntax finding and no panics.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_script_scanner
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use xpiguard_domain::policy::{SuppressionConfig, SuppressionScope};
use xpiguard_types::{PackagePath, ids};

#[derive(Arbitrary, Debug)]
struct ScanInput {
    source: String,
    scope: u8,
}

fuzz_target!(|input: ScanInput| {
    let suppression = SuppressionConfig {
        scope: match input.scope % 3 {
            0 => SuppressionScope::RestOfFile,
            1 => SuppressionScope::NextLine,
            _ => SuppressionScope::Off,
        },
        ..SuppressionConfig::default()
    };
    let outcome = xpiguard_script_parser::parse(&input.source);
    let failed = outcome.is_err();

    let messages = futures::executor::block_on(xpiguard_domain::script::scan(
        async move { outcome },
        PackagePath::new("fuzz.js"),
        &suppression,
    ));

    let syntax = messages
        .iter()
        .filter(|m| m.code == ids::CODE_JS_SYNTAX_ERROR)
        .count();
    if failed {
        assert_eq!(messages.len(), 1);
        assert_eq!(syntax, 1);
    } else {
        assert_eq!(syntax, 0);
    }
});
