use crate::model::{Artifact, ManifestTag, MarkupElement};
use crate::policy::{CheckPolicy, EffectiveConfig, FailOn};
use crate::script::{Comment, NodeId, NodeKind, ScriptTree, Span, TreeBuilder};
use std::collections::BTreeSet;
use xpiguard_types::PackagePath;

/// Hand-built trees for scanner tests. Each statement sits on its own line.
#[derive(Default)]
pub struct Script {
    builder: TreeBuilder,
    statements: Vec<NodeId>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    fn line(&self) -> u32 {
        self.statements.len() as u32 + 1
    }

    fn statement(&mut self, expr: NodeId) -> &mut Self {
        let span = Span::new(self.line(), 1);
        let stmt = self
            .builder
            .push(NodeKind::ExpressionStatement, span, vec![expr]);
        self.statements.push(stmt);
        self
    }

    /// `name;`
    pub fn reference(&mut self, name: &str) -> &mut Self {
        let span = Span::new(self.line(), 1);
        let id = self.builder.leaf(NodeKind::Identifier(name.into()), span);
        self.statement(id)
    }

    /// `object.property;`
    pub fn dot(&mut self, object: &str, property: &str) -> &mut Self {
        let line = self.line();
        let obj = self
            .builder
            .leaf(NodeKind::Identifier(object.into()), Span::new(line, 1));
        let prop = self.builder.leaf(
            NodeKind::PropertyName(property.into()),
            Span::new(line, object.len() as u32 + 2),
        );
        let member = self.builder.push(
            NodeKind::Member { computed: false },
            Span::new(line, 1),
            vec![obj, prop],
        );
        self.statement(member)
    }

    /// `object["key"];`
    pub fn bracket_literal(&mut self, object: &str, key: &str) -> &mut Self {
        let line = self.line();
        let obj = self
            .builder
            .leaf(NodeKind::Identifier(object.into()), Span::new(line, 1));
        let prop = self.builder.leaf(
            NodeKind::StringLiteral(key.into()),
            Span::new(line, object.len() as u32 + 2),
        );
        let member = self.builder.push(
            NodeKind::Member { computed: true },
            Span::new(line, 1),
            vec![obj, prop],
        );
        self.statement(member)
    }

    /// `object[variable];`
    pub fn bracket_variable(&mut self, object: &str, variable: &str) -> &mut Self {
        let line = self.line();
        let obj = self
            .builder
            .leaf(NodeKind::Identifier(object.into()), Span::new(line, 1));
        let prop = self.builder.leaf(
            NodeKind::Identifier(variable.into()),
            Span::new(line, object.len() as u32 + 2),
        );
        let member = self.builder.push(
            NodeKind::Member { computed: true },
            Span::new(line, 1),
            vec![obj, prop],
        );
        self.statement(member)
    }

    /// `var name = "value";`
    pub fn declare_string(&mut self, name: &str, value: &str) -> &mut Self {
        let line = self.line();
        let binding = self
            .builder
            .leaf(NodeKind::Binding(name.into()), Span::new(line, 5));
        let init = self
            .builder
            .leaf(NodeKind::StringLiteral(value.into()), Span::new(line, 8));
        let decl = self.builder.push(
            NodeKind::VariableDeclarator,
            Span::new(line, 5),
            vec![binding, init],
        );
        let stmt = self.builder.push(
            NodeKind::VariableDeclaration { kind: "var".into() },
            Span::new(line, 1),
            vec![decl],
        );
        self.statements.push(stmt);
        self
    }

    /// `({ key: 1 });`
    pub fn object_key(&mut self, key: &str) -> &mut Self {
        let line = self.line();
        let k = self
            .builder
            .leaf(NodeKind::PropertyName(key.into()), Span::new(line, 4));
        let v = self
            .builder
            .leaf(NodeKind::NumberLiteral("1".into()), Span::new(line, 6));
        let prop = self
            .builder
            .push(NodeKind::Property, Span::new(line, 4), vec![k, v]);
        let obj = self
            .builder
            .push(NodeKind::ObjectExpression, Span::new(line, 2), vec![prop]);
        self.statement(obj)
    }

    /// A line comment on its own line.
    pub fn comment(&mut self, text: &str) -> &mut Self {
        let line = self.line();
        self.builder.comment(Comment {
            text: text.into(),
            start: Span::new(line, 1),
            end_line: line,
        });
        let empty = self.builder.leaf(NodeKind::Empty, Span::new(line, 1));
        self.statements.push(empty);
        self
    }

    pub fn build(self) -> ScriptTree {
        let Script {
            mut builder,
            statements,
        } = self;
        let root = builder.push(NodeKind::Program, Span::new(1, 1), statements);
        builder.finish(root)
    }
}

pub fn manifest(path: &str, names: &[&str]) -> Artifact {
    Artifact::Manifest {
        path: PackagePath::new(path),
        tags: names
            .iter()
            .enumerate()
            .map(|(i, n)| ManifestTag::new(*n, Some(i as u32 + 1)))
            .collect(),
    }
}

pub fn markup(path: &str, elements: &[(&str, &[&str])]) -> Artifact {
    Artifact::Markup {
        path: PackagePath::new(path),
        elements: elements
            .iter()
            .enumerate()
            .map(|(i, (tag, attrs))| MarkupElement {
                tag: tag.to_string(),
                attributes: attrs.iter().map(|a| a.to_string()).collect::<BTreeSet<_>>(),
                line: Some(i as u32 + 1),
            })
            .collect(),
    }
}

pub fn legacy(path: &str, type_code: i64) -> Artifact {
    Artifact::LegacyMetadata {
        path: PackagePath::new(path),
        type_code,
        line: Some(1),
    }
}

pub fn config(fail_on: FailOn, max_findings: usize) -> EffectiveConfig {
    EffectiveConfig {
        fail_on,
        max_findings,
        ..EffectiveConfig::default()
    }
}

pub fn with_check(
    mut cfg: EffectiveConfig,
    check_id: &str,
    policy: CheckPolicy,
) -> EffectiveConfig {
    cfg.checks.insert(check_id.to_string(), policy);
    cfg
}
