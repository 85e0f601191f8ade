//! Script syntax trees and the restricted-API scanner.

mod scanner;
mod suppression;
mod tree;

pub use scanner::{scan, scan_tree};
pub use suppression::is_directive;
pub use tree::{
    Comment, MalformedTree, Node, NodeId, NodeKind, ParseFailure, ParseOutcome, ScriptTree, Span,
    TreeBuilder,
};
