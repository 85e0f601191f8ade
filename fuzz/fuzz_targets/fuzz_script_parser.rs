//! Fuzz target for the swc-backed script parser.
//!
//! Goal: the parser should **never panic** on any input.
//! It may return a parse failure, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_script_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(tree) = xpiguard_script_parser::parse(text) {
            assert!(tree.check_structure().is_ok(), "parser built a malformed tree");
        }
    }
});
