use super::suppression;
use super::tree::{NodeKind, ParseOutcome, ScriptTree, Span};
use crate::message::Message;
use crate::policy::SuppressionConfig;
use crate::rules::{RestrictedApi, restricted_api};
use crate::severity::SCRIPT_RULES_ERROR;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use xpiguard_types::{Location, PackagePath, ids};

const SYNTAX_ERROR_DESCRIPTION: &str =
    "The script could not be parsed, so no other script rule was evaluated for it.";

/// Scan one script once its parse outcome is available.
///
/// Always resolves to messages: a parse failure, a malformed tree or a panic while parsing
/// or walking becomes a single `JS_SYNTAX_ERROR` message for this script.
pub async fn scan<F>(parsed: F, path: PackagePath, suppression: &SuppressionConfig) -> Vec<Message>
where
    F: Future<Output = ParseOutcome>,
{
    let tree = match AssertUnwindSafe(parsed).catch_unwind().await {
        Ok(Ok(tree)) => tree,
        Ok(Err(failure)) => {
            tracing::debug!(path = %path.as_str(), error = %failure, "script failed to parse");
            return vec![syntax_error(
                Location::at(path, failure.line, failure.column),
                format!("syntax error: {}", failure.message),
            )];
        }
        Err(_) => {
            tracing::debug!(path = %path.as_str(), "parser panicked");
            return vec![syntax_error(
                Location::file(path),
                "syntax error: the parser aborted".to_string(),
            )];
        }
    };

    match std::panic::catch_unwind(AssertUnwindSafe(|| scan_tree(&tree, &path, suppression))) {
        Ok(messages) => messages,
        Err(_) => {
            tracing::debug!(path = %path.as_str(), "script walk panicked");
            vec![syntax_error(
                Location::file(path),
                "syntax error: the syntax tree could not be walked".to_string(),
            )]
        }
    }
}

/// Walk an already-parsed tree.
pub fn scan_tree(
    tree: &ScriptTree,
    path: &PackagePath,
    suppression: &SuppressionConfig,
) -> Vec<Message> {
    if let Err(err) = tree.check_structure() {
        tracing::debug!(path = %path.as_str(), error = %err, "degraded script tree");
        return vec![syntax_error(
            Location::file(path.clone()),
            format!("syntax error: {err}"),
        )];
    }

    let mut out = Vec::new();
    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        let Some(node) = tree.node(id) else {
            continue;
        };
        match &node.kind {
            NodeKind::Identifier(name) => {
                if let Some(api) = restricted_api(name) {
                    out.push(global_reference(api, path, node.span));
                }
            }
            NodeKind::Member { computed } => {
                let key = node.children.get(1).and_then(|&p| tree.node(p));
                let name = match key.map(|k| (&k.kind, *computed)) {
                    Some((NodeKind::PropertyName(n), false)) => Some(n),
                    Some((NodeKind::StringLiteral(n), true)) => Some(n),
                    _ => None,
                };
                if let (Some(name), Some(key)) = (name, key)
                    && let Some(api) = restricted_api(name)
                {
                    out.push(property_access(api, path, key.span));
                }
            }
            _ => {}
        }
        stack.extend(node.children.iter().rev().copied());
    }

    suppression::apply(out, tree.comments(), suppression)
}

fn global_reference(api: &RestrictedApi, path: &PackagePath, span: Span) -> Message {
    Message::script(
        api.global_severity,
        ids::CHECK_JS_RESTRICTED_API,
        api.global_code,
        api.description,
        format!("reference to restricted API '{}'", api.name),
        span_location(path, span),
    )
}

fn property_access(api: &RestrictedApi, path: &PackagePath, span: Span) -> Message {
    Message::script(
        api.property_severity,
        ids::CHECK_JS_RESTRICTED_API,
        api.property_code,
        api.description,
        format!("property access to restricted API '{}'", api.name),
        span_location(path, span),
    )
}

fn span_location(path: &PackagePath, span: Span) -> Location {
    Location::at(path.clone(), Some(span.line), Some(span.column))
}

fn syntax_error(location: Location, message: String) -> Message {
    Message::script(
        SCRIPT_RULES_ERROR,
        ids::CHECK_JS_SYNTAX,
        ids::CODE_JS_SYNTAX_ERROR,
        SYNTAX_ERROR_DESCRIPTION,
        message,
        location,
    )
}
