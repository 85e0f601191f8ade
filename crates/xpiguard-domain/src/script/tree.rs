//! Arena syntax tree handed over by the parser collaborator.
//!
//! Nodes are addressed by [`NodeId`] and pushed children-first, so every child index is
//! smaller than its parent's. [`ScriptTree::check_structure`] verifies that shape before a
//! walk; a tree that fails it is treated like a parse failure.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// 1-based line and column of a node's first character.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Node kinds the parser produces.
///
/// Only a few carry names the scanner looks at: [`NodeKind::Identifier`] (a reference),
/// [`NodeKind::Binding`] (a declared name), [`NodeKind::PropertyName`] (a dot-access name
/// or an object-literal key) and [`NodeKind::StringLiteral`]. The rest are structural.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Program,

    // Statements
    VariableDeclaration { kind: String },
    VariableDeclarator,
    FunctionDeclaration,
    Block,
    ExpressionStatement,
    If,
    For,
    ForIn,
    ForOf,
    While,
    DoWhile,
    Return,
    Throw,
    Try,
    Catch,
    Break,
    Continue,
    Switch,
    SwitchCase,
    Labeled,
    With,
    Empty,
    Debugger,
    /// Class declaration or expression.
    Class,

    // Expressions
    Identifier(String),
    Binding(String),
    PropertyName(String),
    This,
    Super,
    StringLiteral(String),
    NumberLiteral(String),
    BooleanLiteral(bool),
    NullLiteral,
    RegExpLiteral(String),
    ArrayExpression,
    ObjectExpression,
    /// children: `[key, value]`
    Property,
    FunctionExpression,
    ArrowFunction,
    TemplateLiteral,
    /// children: `[object, property]`
    Member { computed: bool },
    Call,
    New,
    Unary { operator: String },
    Update { operator: String, prefix: bool },
    Binary { operator: String },
    Logical { operator: String },
    Assignment { operator: String },
    Conditional,
    Sequence,
    /// Placeholder for an elided array element (`[a, , b]`).
    Hole,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub children: Vec<NodeId>,
}

/// A source comment, kept for inline directives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    /// Comment body without the `//` or `/* */` delimiters.
    pub text: String,
    pub start: Span,
    pub end_line: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScriptTree {
    nodes: Vec<Node>,
    root: NodeId,
    comments: Vec<Comment>,
}

/// Structural defect in a tree received from the parser collaborator.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("malformed syntax tree: {0}")]
pub struct MalformedTree(pub String);

impl ScriptTree {
    pub fn builder() -> TreeBuilder {
        TreeBuilder::default()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Verify the arena shape: root in range, children pushed before parents, no node
    /// shared between two parents. Together these rule out cycles.
    pub fn check_structure(&self) -> Result<(), MalformedTree> {
        if self.root.index() >= self.nodes.len() {
            return Err(MalformedTree(format!(
                "root {} out of range for {} nodes",
                self.root.index(),
                self.nodes.len()
            )));
        }
        let mut has_parent = vec![false; self.nodes.len()];
        for (index, node) in self.nodes.iter().enumerate() {
            for child in &node.children {
                if child.index() >= index {
                    return Err(MalformedTree(format!(
                        "node {index} references child {} that was not pushed before it",
                        child.index()
                    )));
                }
                if std::mem::replace(&mut has_parent[child.index()], true) {
                    return Err(MalformedTree(format!(
                        "node {} has more than one parent",
                        child.index()
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Incremental tree construction, children first.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
    comments: Vec<Comment>,
}

impl TreeBuilder {
    pub fn push(&mut self, kind: NodeKind, span: Span, children: Vec<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            span,
            children,
        });
        id
    }

    pub fn leaf(&mut self, kind: NodeKind, span: Span) -> NodeId {
        self.push(kind, span, Vec::new())
    }

    pub fn comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn finish(self, root: NodeId) -> ScriptTree {
        ScriptTree {
            nodes: self.nodes,
            root,
            comments: self.comments,
        }
    }
}

/// Explicit parse-failure signal from the parser collaborator.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub struct ParseFailure {
    pub message: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl ParseFailure {
    pub fn new(message: impl Into<String>, line: Option<u32>, column: Option<u32>) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(col)) => write!(f, "{} ({line}:{col})", self.message),
            (Some(line), None) => write!(f, "{} (line {line})", self.message),
            _ => f.write_str(&self.message),
        }
    }
}

/// What the parser collaborator hands over: a whole tree or an explicit failure.
pub type ParseOutcome = Result<ScriptTree, ParseFailure>;
