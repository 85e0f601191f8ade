//! Lowers an swc AST into the engine's arena tree.
//!
//! Names the scanner cares about are classified here: expression identifiers become
//! [`NodeKind::Identifier`], declared names become [`NodeKind::Binding`], and dot-access
//! names and literal object keys become [`NodeKind::PropertyName`].

use crate::position::LineIndex;
use swc_core::common::{BytePos, Span as SourceSpan, Spanned};
use swc_core::ecma::ast::*;
use swc_core::ecma::visit::{Visit, VisitWith};
use xpiguard_domain::script::{NodeId, NodeKind, ParseFailure, TreeBuilder};

pub(crate) struct Lowering<'a> {
    lines: &'a LineIndex<'a>,
    builder: TreeBuilder,
    /// Children collected for each node still open.
    frames: Vec<Vec<NodeId>>,
    root: Option<NodeId>,
    /// Set while visiting an assignment target outside any nested expression. Pattern
    /// names there refer to existing variables.
    assign_target: bool,
}

impl<'a> Lowering<'a> {
    pub(crate) fn new(lines: &'a LineIndex<'a>) -> Self {
        Self {
            lines,
            builder: TreeBuilder::default(),
            frames: Vec::new(),
            root: None,
            assign_target: false,
        }
    }

    pub(crate) fn finish(self) -> Result<(TreeBuilder, NodeId), ParseFailure> {
        match self.root {
            Some(root) => Ok((self.builder, root)),
            None => Err(ParseFailure::new("parser produced no program", None, None)),
        }
    }

    fn attach(&mut self, id: NodeId) {
        match self.frames.last_mut() {
            Some(frame) => frame.push(id),
            None => self.root = Some(id),
        }
    }

    fn open(&mut self, kind: NodeKind, at: BytePos, visit: impl FnOnce(&mut Self)) {
        self.frames.push(Vec::new());
        visit(self);
        let children = self.frames.pop().unwrap_or_default();
        let id = self.builder.push(kind, self.lines.position(at), children);
        self.attach(id);
    }

    fn leaf(&mut self, kind: NodeKind, at: BytePos) {
        let id = self.builder.leaf(kind, self.lines.position(at));
        self.attach(id);
    }

    fn binding(&mut self, name: &Ident) {
        self.leaf(NodeKind::Binding(name.sym.to_string()), name.span.lo);
    }

    fn structural<N>(&mut self, kind: NodeKind, span: SourceSpan, n: &N)
    where
        N: VisitWith<Self> + ?Sized,
    {
        self.frames.push(Vec::new());
        n.visit_children_with(self);
        let children = self.frames.pop().unwrap_or_default();
        let id = self.builder.push(kind, self.lines.position(span.lo), children);
        self.attach(id);
    }
}

impl Visit for Lowering<'_> {
    fn visit_module(&mut self, n: &Module) {
        self.structural(NodeKind::Program, n.span, n);
    }

    fn visit_script(&mut self, n: &Script) {
        self.structural(NodeKind::Program, n.span, n);
    }

    // Statements

    fn visit_var_decl(&mut self, n: &VarDecl) {
        let kind = NodeKind::VariableDeclaration {
            kind: n.kind.to_string(),
        };
        self.structural(kind, n.span, n);
    }

    fn visit_var_declarator(&mut self, n: &VarDeclarator) {
        self.structural(NodeKind::VariableDeclarator, n.span, n);
    }

    fn visit_fn_decl(&mut self, n: &FnDecl) {
        self.open(NodeKind::FunctionDeclaration, n.function.span.lo, |v| {
            v.binding(&n.ident);
            n.function.visit_with(v);
        });
    }

    fn visit_class_decl(&mut self, n: &ClassDecl) {
        self.open(NodeKind::Class, n.class.span.lo, |v| {
            v.binding(&n.ident);
            n.class.visit_with(v);
        });
    }

    fn visit_block_stmt(&mut self, n: &BlockStmt) {
        self.structural(NodeKind::Block, n.span, n);
    }

    fn visit_expr_stmt(&mut self, n: &ExprStmt) {
        self.structural(NodeKind::ExpressionStatement, n.span, n);
    }

    fn visit_if_stmt(&mut self, n: &IfStmt) {
        self.structural(NodeKind::If, n.span, n);
    }

    fn visit_for_stmt(&mut self, n: &ForStmt) {
        self.structural(NodeKind::For, n.span, n);
    }

    fn visit_for_in_stmt(&mut self, n: &ForInStmt) {
        self.structural(NodeKind::ForIn, n.span, n);
    }

    fn visit_for_of_stmt(&mut self, n: &ForOfStmt) {
        self.structural(NodeKind::ForOf, n.span, n);
    }

    fn visit_while_stmt(&mut self, n: &WhileStmt) {
        self.structural(NodeKind::While, n.span, n);
    }

    fn visit_do_while_stmt(&mut self, n: &DoWhileStmt) {
        self.structural(NodeKind::DoWhile, n.span, n);
    }

    fn visit_return_stmt(&mut self, n: &ReturnStmt) {
        self.structural(NodeKind::Return, n.span, n);
    }

    fn visit_throw_stmt(&mut self, n: &ThrowStmt) {
        self.structural(NodeKind::Throw, n.span, n);
    }

    fn visit_try_stmt(&mut self, n: &TryStmt) {
        self.structural(NodeKind::Try, n.span, n);
    }

    fn visit_catch_clause(&mut self, n: &CatchClause) {
        self.structural(NodeKind::Catch, n.span, n);
    }

    fn visit_switch_stmt(&mut self, n: &SwitchStmt) {
        self.structural(NodeKind::Switch, n.span, n);
    }

    fn visit_switch_case(&mut self, n: &SwitchCase) {
        self.structural(NodeKind::SwitchCase, n.span, n);
    }

    fn visit_labeled_stmt(&mut self, n: &LabeledStmt) {
        self.open(NodeKind::Labeled, n.span.lo, |v| {
            v.binding(&n.label);
            n.body.visit_with(v);
        });
    }

    fn visit_break_stmt(&mut self, n: &BreakStmt) {
        self.open(NodeKind::Break, n.span.lo, |v| {
            if let Some(label) = &n.label {
                v.binding(label);
            }
        });
    }

    fn visit_continue_stmt(&mut self, n: &ContinueStmt) {
        self.open(NodeKind::Continue, n.span.lo, |v| {
            if let Some(label) = &n.label {
                v.binding(label);
            }
        });
    }

    fn visit_with_stmt(&mut self, n: &WithStmt) {
        self.structural(NodeKind::With, n.span, n);
    }

    fn visit_empty_stmt(&mut self, n: &EmptyStmt) {
        self.leaf(NodeKind::Empty, n.span.lo);
    }

    fn visit_debugger_stmt(&mut self, n: &DebuggerStmt) {
        self.leaf(NodeKind::Debugger, n.span.lo);
    }

    // Names

    fn visit_ident(&mut self, n: &Ident) {
        self.leaf(NodeKind::Identifier(n.sym.to_string()), n.span.lo);
    }

    fn visit_binding_ident(&mut self, n: &BindingIdent) {
        if self.assign_target {
            self.visit_ident(&n.id);
        } else {
            self.binding(&n.id);
        }
    }

    fn visit_assign_pat_prop(&mut self, n: &AssignPatProp) {
        let kind = if self.assign_target {
            NodeKind::Identifier(n.key.sym.to_string())
        } else {
            NodeKind::Binding(n.key.sym.to_string())
        };
        self.leaf(kind, n.key.span.lo);
        n.value.visit_with(self);
    }

    fn visit_private_name(&mut self, _: &PrivateName) {}

    fn visit_prop_name(&mut self, n: &PropName) {
        match n {
            PropName::Ident(name) => {
                self.leaf(NodeKind::PropertyName(name.sym.to_string()), name.span.lo)
            }
            PropName::Str(s) => self.leaf(NodeKind::PropertyName(s.value.to_string()), s.span.lo),
            PropName::Num(num) => {
                self.leaf(NodeKind::PropertyName(num.value.to_string()), num.span.lo)
            }
            PropName::BigInt(big) => {
                self.leaf(NodeKind::PropertyName(big.value.to_string()), big.span.lo)
            }
            PropName::Computed(computed) => computed.expr.visit_with(self),
        }
    }

    fn visit_import_decl(&mut self, n: &ImportDecl) {
        for specifier in &n.specifiers {
            match specifier {
                ImportSpecifier::Named(s) => self.binding(&s.local),
                ImportSpecifier::Default(s) => self.binding(&s.local),
                ImportSpecifier::Namespace(s) => self.binding(&s.local),
            }
        }
    }

    fn visit_export_all(&mut self, _: &ExportAll) {}

    fn visit_named_export(&mut self, n: &NamedExport) {
        // Re-exports from another module reference nothing local.
        if n.src.is_some() {
            return;
        }
        for specifier in &n.specifiers {
            if let ExportSpecifier::Named(named) = specifier
                && let ModuleExportName::Ident(orig) = &named.orig
            {
                self.visit_ident(orig);
            }
        }
    }

    // Expressions

    fn visit_expr(&mut self, n: &Expr) {
        let outer = std::mem::replace(&mut self.assign_target, false);
        n.visit_children_with(self);
        self.assign_target = outer;
    }

    fn visit_this_expr(&mut self, n: &ThisExpr) {
        self.leaf(NodeKind::This, n.span.lo);
    }

    fn visit_str(&mut self, n: &Str) {
        self.leaf(NodeKind::StringLiteral(n.value.to_string()), n.span.lo);
    }

    fn visit_number(&mut self, n: &Number) {
        let text = match &n.raw {
            Some(raw) => raw.to_string(),
            None => n.value.to_string(),
        };
        self.leaf(NodeKind::NumberLiteral(text), n.span.lo);
    }

    fn visit_big_int(&mut self, n: &BigInt) {
        self.leaf(NodeKind::NumberLiteral(format!("{}n", n.value)), n.span.lo);
    }

    fn visit_bool(&mut self, n: &Bool) {
        self.leaf(NodeKind::BooleanLiteral(n.value), n.span.lo);
    }

    fn visit_null(&mut self, n: &Null) {
        self.leaf(NodeKind::NullLiteral, n.span.lo);
    }

    fn visit_regex(&mut self, n: &Regex) {
        let text = format!("/{}/{}", n.exp, n.flags);
        self.leaf(NodeKind::RegExpLiteral(text), n.span.lo);
    }

    fn visit_tpl(&mut self, n: &Tpl) {
        self.structural(NodeKind::TemplateLiteral, n.span, n);
    }

    fn visit_array_lit(&mut self, n: &ArrayLit) {
        self.open(NodeKind::ArrayExpression, n.span.lo, |v| {
            for element in &n.elems {
                match element {
                    Some(element) => element.visit_with(v),
                    None => v.leaf(NodeKind::Hole, n.span.lo),
                }
            }
        });
    }

    fn visit_object_lit(&mut self, n: &ObjectLit) {
        self.structural(NodeKind::ObjectExpression, n.span, n);
    }

    fn visit_key_value_prop(&mut self, n: &KeyValueProp) {
        self.structural(NodeKind::Property, n.key.span(), n);
    }

    fn visit_fn_expr(&mut self, n: &FnExpr) {
        self.open(NodeKind::FunctionExpression, n.function.span.lo, |v| {
            if let Some(name) = &n.ident {
                v.binding(name);
            }
            n.function.visit_with(v);
        });
    }

    fn visit_arrow_expr(&mut self, n: &ArrowExpr) {
        self.structural(NodeKind::ArrowFunction, n.span, n);
    }

    fn visit_class_expr(&mut self, n: &ClassExpr) {
        self.open(NodeKind::Class, n.class.span.lo, |v| {
            if let Some(name) = &n.ident {
                v.binding(name);
            }
            n.class.visit_with(v);
        });
    }

    fn visit_member_expr(&mut self, n: &MemberExpr) {
        let computed = matches!(n.prop, MemberProp::Computed(_));
        let outer = std::mem::replace(&mut self.assign_target, false);
        self.open(NodeKind::Member { computed }, n.span.lo, |v| {
            n.obj.visit_with(v);
            match &n.prop {
                MemberProp::Ident(name) => {
                    v.leaf(NodeKind::PropertyName(name.sym.to_string()), name.span.lo)
                }
                MemberProp::Computed(key) => key.expr.visit_with(v),
                MemberProp::PrivateName(_) => {}
            }
        });
        self.assign_target = outer;
    }

    fn visit_super_prop_expr(&mut self, n: &SuperPropExpr) {
        let computed = matches!(n.prop, SuperProp::Computed(_));
        self.open(NodeKind::Member { computed }, n.span.lo, |v| {
            v.leaf(NodeKind::Super, n.obj.span.lo);
            match &n.prop {
                SuperProp::Ident(name) => {
                    v.leaf(NodeKind::PropertyName(name.sym.to_string()), name.span.lo)
                }
                SuperProp::Computed(key) => key.expr.visit_with(v),
            }
        });
    }

    fn visit_call_expr(&mut self, n: &CallExpr) {
        self.structural(NodeKind::Call, n.span, n);
    }

    fn visit_new_expr(&mut self, n: &NewExpr) {
        self.structural(NodeKind::New, n.span, n);
    }

    fn visit_unary_expr(&mut self, n: &UnaryExpr) {
        let kind = NodeKind::Unary {
            operator: n.op.to_string(),
        };
        self.structural(kind, n.span, n);
    }

    fn visit_update_expr(&mut self, n: &UpdateExpr) {
        let kind = NodeKind::Update {
            operator: n.op.to_string(),
            prefix: n.prefix,
        };
        self.structural(kind, n.span, n);
    }

    fn visit_bin_expr(&mut self, n: &BinExpr) {
        let operator = n.op.to_string();
        let kind = match n.op {
            BinaryOp::LogicalOr | BinaryOp::LogicalAnd | BinaryOp::NullishCoalescing => {
                NodeKind::Logical { operator }
            }
            _ => NodeKind::Binary { operator },
        };
        self.structural(kind, n.span, n);
    }

    fn visit_assign_expr(&mut self, n: &AssignExpr) {
        let kind = NodeKind::Assignment {
            operator: n.op.to_string(),
        };
        self.open(kind, n.span.lo, |v| {
            let outer = std::mem::replace(&mut v.assign_target, true);
            n.left.visit_with(v);
            v.assign_target = outer;
            n.right.visit_with(v);
        });
    }

    fn visit_cond_expr(&mut self, n: &CondExpr) {
        self.structural(NodeKind::Conditional, n.span, n);
    }

    fn visit_seq_expr(&mut self, n: &SeqExpr) {
        self.structural(NodeKind::Sequence, n.span, n);
    }
}
