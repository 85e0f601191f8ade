use proptest::prelude::*;
use xpiguard_script_parser::parse;

fn arb_script_like() -> impl Strategy<Value = String> {
    let pieces = prop::sample::select(vec![
        "var ", "x", " = ", "mozIndexedDB", "window", ".", "[", "]", "(", ")", "{", "}", ";",
        "\n", "'s'", "\"", "/", "*", "//c\n", "/*c*/", "function ", "return ", "if ", "else ",
        "+", "++", "?", ":", ",", "1.5", "new ", "in ", "for ", "`",
    ]);
    prop::collection::vec(pieces, 0..40).prop_map(|v| v.concat())
}

proptest! {
    #[test]
    fn arbitrary_text_never_panics(src in "\\PC{0,200}") {
        if let Ok(tree) = parse(&src) {
            prop_assert!(tree.check_structure().is_ok());
        }
    }

    #[test]
    fn script_like_text_yields_wellformed_trees_or_failures(src in arb_script_like()) {
        match parse(&src) {
            Ok(tree) => prop_assert!(tree.check_structure().is_ok()),
            Err(failure) => prop_assert!(!failure.message.is_empty()),
        }
    }
}
