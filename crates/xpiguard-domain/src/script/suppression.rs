use crate::message::Message;
use crate::policy::{SuppressionConfig, SuppressionScope};
use crate::script::Comment;
use xpiguard_types::ids;

/// True when the comment text, trimmed, starts with `marker` as a whole word.
///
/// `xpiguard-disable` and `xpiguard-disable vendored code` match; `xpiguard-disabled` does not.
pub fn is_directive(text: &str, marker: &str) -> bool {
    if marker.is_empty() {
        return false;
    }
    match text.trim().strip_prefix(marker) {
        Some(rest) => rest.is_empty() || rest.starts_with(char::is_whitespace),
        None => false,
    }
}

/// Drop restricted-API messages covered by an inline directive. Other checks pass through.
pub(crate) fn apply(
    messages: Vec<Message>,
    comments: &[Comment],
    config: &SuppressionConfig,
) -> Vec<Message> {
    if config.scope == SuppressionScope::Off {
        return messages;
    }
    let directives: Vec<&Comment> = comments
        .iter()
        .filter(|c| is_directive(&c.text, &config.directive))
        .collect();
    if directives.is_empty() {
        return messages;
    }

    messages
        .into_iter()
        .filter(|m| {
            if m.check_id != ids::CHECK_JS_RESTRICTED_API {
                return true;
            }
            let Some(line) = m.line() else {
                return true;
            };
            // An unknown column on the directive's own line counts as before the comment.
            let at = (line, m.location.col.unwrap_or(0));
            !directives.iter().any(|d| match config.scope {
                SuppressionScope::RestOfFile => at >= (d.start.line, d.start.column),
                SuppressionScope::NextLine => line == d.end_line + 1,
                SuppressionScope::Off => false,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_must_be_a_whole_word() {
        assert!(is_directive("xpiguard-disable", "xpiguard-disable"));
        assert!(is_directive("  xpiguard-disable legacy shim ", "xpiguard-disable"));
        assert!(!is_directive("xpiguard-disabled", "xpiguard-disable"));
        assert!(!is_directive("eslint-disable", "xpiguard-disable"));
        assert!(!is_directive("see xpiguard-disable", "xpiguard-disable"));
        assert!(!is_directive("anything", ""));
    }
}
