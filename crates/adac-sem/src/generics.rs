//! Generic templates and instantiation (spec.md §4.4).
//!
//! A generic unit is stored once, as parsed. Each instantiation clones
//! the template's AST, substitutes formals for actuals, and stamps a
//! fresh [`NodeId`] on every expression in the clone so the resolver
//! can re-resolve and re-typecheck the instance independently of the
//! template and of every other instance - two instantiations of the
//! same generic must not collide in [`crate::checks::TypeckResults`].
//!
//! Restrictions carried over from spec.md §4.4: formal packages are
//! not required, and instantiating a generic that itself contains a
//! nested generic instantiation is best-effort (the inner instantiation
//! is cloned and substituted like any other declaration, but its own
//! formals are only resolved, not re-checked against the outer
//! instantiation's actuals).

use adac_par::ast::{
    AcceptStmt, Aggregate, Argument, BlockStmt, CallStmt, CaseAlt, CaseStmt, Choice, ComponentDecl,
    Constraint, Decl, DiscreteRange, DiscriminantSpec, EntrySpec, Expr, ExprKind, ExceptionHandler,
    GenericDecl, GenericFormal, IfStmt, IterationScheme, Literal, LoopStmt, MembershipRange, NodeId,
    NodeIdGenerator, ObjectDecl, PackageBody, PackageDecl, PackageSpec, ParamSpec, Path, RenamingDecl,
    RepresentationClause, SelectArm, SelectStmt, Stmt, SubprogramBody, SubprogramDecl, SubprogramSpec,
    TypeDecl, TypeDef, TypeMark, VariantPart,
};
use adac_util::{DefId, Span, Symbol};
use std::collections::HashMap;

/// A stored generic unit, keyed by its declared name in
/// [`GenericTable`]. The body (if the template is a subprogram) is
/// attached separately once the matching non-generic-looking body
/// declaration is seen, the same way a forward-declared subprogram
/// spec is matched to its body in a later pass.
#[derive(Debug, Clone)]
pub struct GenericTemplate {
    pub def_id: DefId,
    pub formals: Vec<GenericFormal>,
    pub spec: Decl,
    pub body: Option<SubprogramBody>,
}

#[derive(Debug, Default)]
pub struct GenericTable {
    templates: HashMap<Symbol, GenericTemplate>,
}

impl GenericTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: Symbol, template: GenericTemplate) {
        self.templates.insert(name, template);
    }

    pub fn get(&self, name: Symbol) -> Option<&GenericTemplate> {
        self.templates.get(&name)
    }

    pub fn attach_body(&mut self, name: Symbol, body: SubprogramBody) {
        if let Some(t) = self.templates.get_mut(&name) {
            t.body = Some(body);
        }
    }

    pub fn from_generic_decl(def_id: DefId, decl: &GenericDecl) -> GenericTemplate {
        GenericTemplate { def_id, formals: decl.formals.clone(), spec: (*decl.spec).clone(), body: None }
    }
}

/// What a generic formal name is bound to for one instantiation.
#[derive(Debug, Clone)]
pub enum Subst {
    /// A formal type (`type Item is private;`), bound to the actual's
    /// type mark.
    Type(TypeMark),
    /// A formal in/out object parameter, bound to the actual expression
    /// wherever the formal's name is referenced in the template body.
    Value(Expr),
    /// A formal subprogram parameter, bound to the path naming the
    /// chosen actual subprogram.
    Subprogram(Path),
}

/// Clones a generic template's spec/body, substituting formals for
/// actuals and assigning every expression a fresh [`NodeId`] via
/// `gen`. One `Instantiator` is built per instantiation.
pub struct Instantiator<'a> {
    gen: &'a NodeIdGenerator,
    substs: &'a HashMap<Symbol, Subst>,
}

impl<'a> Instantiator<'a> {
    pub fn new(gen: &'a NodeIdGenerator, substs: &'a HashMap<Symbol, Subst>) -> Self {
        Self { gen, substs }
    }

    /// Clones `spec`, renaming its top-level declared name to
    /// `instance_name` (the name given in the `is new` clause) and
    /// substituting formals throughout.
    pub fn instantiate_spec(&self, spec: &Decl, instance_name: Symbol) -> Decl {
        let mut cloned = self.clone_decl(spec);
        rename_decl(&mut cloned, instance_name);
        cloned
    }

    pub fn instantiate_body(&self, body: &SubprogramBody, instance_name: Symbol) -> SubprogramBody {
        let mut cloned = self.clone_subprogram_body(body);
        cloned.spec.name = instance_name;
        cloned
    }

    fn fresh(&self) -> NodeId {
        self.gen.next()
    }

    fn clone_path(&self, path: &Path) -> Path {
        Path { segments: path.segments.clone(), span: path.span }
    }

    fn clone_type_mark(&self, tm: &TypeMark) -> TypeMark {
        if tm.name.segments.len() == 1 {
            if let Some(Subst::Type(actual)) = self.substs.get(&tm.name.segments[0]) {
                let mut actual = actual.clone();
                // A constraint written at the use site (`Item range 1 .. 10`)
                // overrides whatever the actual type mark itself carried.
                if tm.constraint.is_some() {
                    actual.constraint = tm.constraint.as_ref().map(|c| self.clone_constraint(c));
                }
                actual.span = tm.span;
                return actual;
            }
        }
        TypeMark {
            name: self.clone_path(&tm.name),
            constraint: tm.constraint.as_ref().map(|c| self.clone_constraint(c)),
            span: tm.span,
        }
    }

    fn clone_constraint(&self, c: &Constraint) -> Constraint {
        match c {
            Constraint::Range(lo, hi) => Constraint::Range(self.clone_expr(lo), self.clone_expr(hi)),
            Constraint::Index(ranges) => {
                Constraint::Index(ranges.iter().map(|r| self.clone_discrete_range(r)).collect())
            }
            Constraint::Digits(d, range) => Constraint::Digits(
                self.clone_expr(d),
                range.as_ref().map(|(lo, hi)| (self.clone_expr(lo), self.clone_expr(hi))),
            ),
            Constraint::Delta(d, range) => Constraint::Delta(
                self.clone_expr(d),
                range.as_ref().map(|(lo, hi)| (self.clone_expr(lo), self.clone_expr(hi))),
            ),
        }
    }

    fn clone_discrete_range(&self, r: &DiscreteRange) -> DiscreteRange {
        match r {
            DiscreteRange::Range(lo, hi) => DiscreteRange::Range(self.clone_expr(lo), self.clone_expr(hi)),
            DiscreteRange::Subtype(tm) => DiscreteRange::Subtype(self.clone_type_mark(tm)),
        }
    }

    fn clone_expr(&self, e: &Expr) -> Expr {
        let kind = match &e.kind {
            ExprKind::Literal(lit) => ExprKind::Literal(lit.clone()),
            ExprKind::Name(path) => {
                if path.segments.len() == 1 {
                    match self.substs.get(&path.segments[0]) {
                        Some(Subst::Value(actual)) => return self.clone_expr(actual),
                        Some(Subst::Subprogram(actual_path)) => {
                            ExprKind::Name(self.clone_path(actual_path))
                        }
                        _ => ExprKind::Name(self.clone_path(path)),
                    }
                } else {
                    ExprKind::Name(self.clone_path(path))
                }
            }
            ExprKind::Binary { op, left, right } => {
                ExprKind::Binary { op: *op, left: Box::new(self.clone_expr(left)), right: Box::new(self.clone_expr(right)) }
            }
            ExprKind::Unary { op, operand } => {
                ExprKind::Unary { op: *op, operand: Box::new(self.clone_expr(operand)) }
            }
            ExprKind::Call { callee, args } => ExprKind::Call {
                callee: Box::new(self.clone_expr(callee)),
                args: args.iter().map(|a| self.clone_argument(a)).collect(),
            },
            ExprKind::Selector { prefix, selector } => {
                ExprKind::Selector { prefix: Box::new(self.clone_expr(prefix)), selector: *selector }
            }
            ExprKind::Attribute { prefix, attr, args } => ExprKind::Attribute {
                prefix: Box::new(self.clone_expr(prefix)),
                attr: *attr,
                args: args.iter().map(|a| self.clone_expr(a)).collect(),
            },
            ExprKind::Qualified { type_mark, expr } => ExprKind::Qualified {
                type_mark: self.clone_type_mark(type_mark),
                expr: Box::new(self.clone_expr(expr)),
            },
            ExprKind::Allocator { type_mark, init } => ExprKind::Allocator {
                type_mark: self.clone_type_mark(type_mark),
                init: init.as_ref().map(|i| Box::new(self.clone_expr(i))),
            },
            ExprKind::Aggregate(agg) => ExprKind::Aggregate(self.clone_aggregate(agg)),
            ExprKind::Range(lo, hi) => {
                ExprKind::Range(Box::new(self.clone_expr(lo)), Box::new(self.clone_expr(hi)))
            }
            ExprKind::Membership { expr, not, range } => ExprKind::Membership {
                expr: Box::new(self.clone_expr(expr)),
                not: *not,
                range: self.clone_membership_range(range),
            },
        };
        Expr { kind, span: e.span, id: self.fresh() }
    }

    fn clone_membership_range(&self, r: &MembershipRange) -> MembershipRange {
        match r {
            MembershipRange::Range(lo, hi) => {
                MembershipRange::Range(Box::new(self.clone_expr(lo)), Box::new(self.clone_expr(hi)))
            }
            MembershipRange::TypeMark(tm) => MembershipRange::TypeMark(self.clone_type_mark(tm)),
        }
    }

    fn clone_aggregate(&self, agg: &Aggregate) -> Aggregate {
        match agg {
            Aggregate::Positional(items) => {
                Aggregate::Positional(items.iter().map(|e| self.clone_expr(e)).collect())
            }
            Aggregate::Named(items) => Aggregate::Named(
                items.iter().map(|(c, e)| (self.clone_choice(c), self.clone_expr(e))).collect(),
            ),
            Aggregate::Mixed { positional, named } => Aggregate::Mixed {
                positional: positional.iter().map(|e| self.clone_expr(e)).collect(),
                named: named.iter().map(|(c, e)| (self.clone_choice(c), self.clone_expr(e))).collect(),
            },
        }
    }

    fn clone_choice(&self, c: &Choice) -> Choice {
        match c {
            Choice::Expr(e) => Choice::Expr(self.clone_expr(e)),
            Choice::Range(lo, hi) => Choice::Range(self.clone_expr(lo), self.clone_expr(hi)),
            Choice::Others => Choice::Others,
        }
    }

    fn clone_argument(&self, a: &Argument) -> Argument {
        Argument { name: a.name, value: self.clone_expr(&a.value) }
    }

    fn clone_param_spec(&self, p: &ParamSpec) -> ParamSpec {
        ParamSpec {
            names: p.names.clone(),
            mode: p.mode,
            ty: self.clone_type_mark(&p.ty),
            default: p.default.as_ref().map(|e| self.clone_expr(e)),
            span: p.span,
        }
    }

    fn clone_subprogram_spec(&self, s: &SubprogramSpec) -> SubprogramSpec {
        SubprogramSpec {
            kind: s.kind,
            name: s.name,
            params: s.params.iter().map(|p| self.clone_param_spec(p)).collect(),
            return_type: s.return_type.as_ref().map(|t| self.clone_type_mark(t)),
            span: s.span,
        }
    }

    fn clone_subprogram_body(&self, b: &SubprogramBody) -> SubprogramBody {
        SubprogramBody {
            spec: self.clone_subprogram_spec(&b.spec),
            decls: b.decls.iter().map(|d| self.clone_decl(d)).collect(),
            stmts: b.stmts.iter().map(|s| self.clone_stmt(s)).collect(),
            handlers: b.handlers.iter().map(|h| self.clone_handler(h)).collect(),
            span: b.span,
        }
    }

    fn clone_component(&self, c: &ComponentDecl) -> ComponentDecl {
        ComponentDecl {
            names: c.names.clone(),
            ty: self.clone_type_mark(&c.ty),
            default: c.default.as_ref().map(|e| self.clone_expr(e)),
            variant: c.variant.as_ref().map(|v| self.clone_variant_part(v)),
        }
    }

    fn clone_variant_part(&self, v: &VariantPart) -> VariantPart {
        VariantPart {
            discriminant: v.discriminant,
            variants: v
                .variants
                .iter()
                .map(|(choices, comps)| {
                    (
                        choices.iter().map(|c| self.clone_choice(c)).collect(),
                        comps.iter().map(|c| self.clone_component(c)).collect(),
                    )
                })
                .collect(),
            span: v.span,
        }
    }

    fn clone_discriminant(&self, d: &DiscriminantSpec) -> DiscriminantSpec {
        DiscriminantSpec {
            names: d.names.clone(),
            ty: self.clone_type_mark(&d.ty),
            default: d.default.as_ref().map(|e| self.clone_expr(e)),
        }
    }

    fn clone_entry_spec(&self, e: &EntrySpec) -> EntrySpec {
        EntrySpec {
            name: e.name,
            index: e.index.as_ref().map(|r| self.clone_discrete_range(r)),
            params: e.params.iter().map(|p| self.clone_param_spec(p)).collect(),
            span: e.span,
        }
    }

    fn clone_type_def(&self, td: &TypeDef) -> TypeDef {
        match td {
            TypeDef::Enumeration(lits) => TypeDef::Enumeration(lits.clone()),
            TypeDef::Integer { low, high } => {
                TypeDef::Integer { low: self.clone_expr(low), high: self.clone_expr(high) }
            }
            TypeDef::Float { digits, range } => TypeDef::Float {
                digits: self.clone_expr(digits),
                range: range.as_ref().map(|(lo, hi)| (self.clone_expr(lo), self.clone_expr(hi))),
            },
            TypeDef::Fixed { delta, digits, range } => TypeDef::Fixed {
                delta: self.clone_expr(delta),
                digits: digits.as_ref().map(|d| self.clone_expr(d)),
                range: range.as_ref().map(|(lo, hi)| (self.clone_expr(lo), self.clone_expr(hi))),
            },
            TypeDef::Array { indices, component } => TypeDef::Array {
                indices: indices.iter().map(|r| self.clone_discrete_range(r)).collect(),
                component: self.clone_type_mark(component),
            },
            TypeDef::UnconstrainedArray { index_types, component } => TypeDef::UnconstrainedArray {
                index_types: index_types.iter().map(|t| self.clone_type_mark(t)).collect(),
                component: self.clone_type_mark(component),
            },
            TypeDef::Record(comps) => TypeDef::Record(comps.iter().map(|c| self.clone_component(c)).collect()),
            TypeDef::Access { designated } => TypeDef::Access { designated: self.clone_type_mark(designated) },
            TypeDef::Derived { parent } => TypeDef::Derived { parent: self.clone_type_mark(parent) },
            TypeDef::Private => TypeDef::Private,
            TypeDef::Task(entries) => TypeDef::Task(entries.iter().map(|e| self.clone_entry_spec(e)).collect()),
        }
    }

    fn clone_decl(&self, d: &Decl) -> Decl {
        match d {
            Decl::Object(o) => Decl::Object(ObjectDecl {
                names: o.names.clone(),
                constant: o.constant,
                ty: self.clone_type_mark(&o.ty),
                init: o.init.as_ref().map(|e| self.clone_expr(e)),
                span: o.span,
            }),
            Decl::Type(t) => Decl::Type(TypeDecl {
                name: t.name,
                discriminants: t.discriminants.iter().map(|d| self.clone_discriminant(d)).collect(),
                def: self.clone_type_def(&t.def),
                span: t.span,
            }),
            Decl::Subtype(s) => Decl::Subtype(adac_par::ast::SubtypeDecl {
                name: s.name,
                base: self.clone_type_mark(&s.base),
                span: s.span,
            }),
            Decl::Subprogram(SubprogramDecl::Spec(s)) => {
                Decl::Subprogram(SubprogramDecl::Spec(self.clone_subprogram_spec(s)))
            }
            Decl::Subprogram(SubprogramDecl::Body(b)) => {
                Decl::Subprogram(SubprogramDecl::Body(self.clone_subprogram_body(b)))
            }
            Decl::Package(PackageDecl::Spec(p)) => Decl::Package(PackageDecl::Spec(PackageSpec {
                name: p.name,
                visible_decls: p.visible_decls.iter().map(|d| self.clone_decl(d)).collect(),
                private_decls: p.private_decls.iter().map(|d| self.clone_decl(d)).collect(),
                span: p.span,
            })),
            Decl::Package(PackageDecl::Body(p)) => Decl::Package(PackageDecl::Body(PackageBody {
                name: p.name,
                decls: p.decls.iter().map(|d| self.clone_decl(d)).collect(),
                stmts: p.stmts.iter().map(|s| self.clone_stmt(s)).collect(),
                handlers: p.handlers.iter().map(|h| self.clone_handler(h)).collect(),
                span: p.span,
            })),
            // Nested generics are cloned structurally (best-effort, per
            // spec.md §4.4); their own formals aren't re-substituted here.
            Decl::Generic(g) => Decl::Generic(GenericDecl {
                formals: g.formals.clone(),
                spec: Box::new(self.clone_decl(&g.spec)),
                span: g.span,
            }),
            Decl::Instantiation(i) => Decl::Instantiation(adac_par::ast::InstantiationDecl {
                kind: i.kind,
                name: i.name,
                generic_name: self.clone_path(&i.generic_name),
                actuals: i.actuals.iter().map(|e| self.clone_expr(e)).collect(),
                span: i.span,
            }),
            Decl::Renaming(r) => Decl::Renaming(RenamingDecl {
                name: r.name,
                ty: r.ty.as_ref().map(|t| self.clone_type_mark(t)),
                renamed: self.clone_expr(&r.renamed),
                span: r.span,
            }),
            Decl::Exception(e) => Decl::Exception(adac_par::ast::ExceptionDecl { names: e.names.clone(), span: e.span }),
            Decl::Representation(r) => Decl::Representation(self.clone_repr_clause(r)),
            Decl::Pragma(p) => Decl::Pragma(adac_par::ast::Pragma {
                name: p.name,
                args: p.args.iter().map(|e| self.clone_expr(e)).collect(),
                span: p.span,
            }),
            Decl::Use(item) => Decl::Use(self.clone_context_item(item)),
        }
    }

    fn clone_context_item(&self, item: &adac_par::ast::ContextItem) -> adac_par::ast::ContextItem {
        match item {
            adac_par::ast::ContextItem::With { names, span } => {
                adac_par::ast::ContextItem::With { names: names.iter().map(|p| self.clone_path(p)).collect(), span: *span }
            }
            adac_par::ast::ContextItem::Use { names, span } => {
                adac_par::ast::ContextItem::Use { names: names.iter().map(|p| self.clone_path(p)).collect(), span: *span }
            }
        }
    }

    fn clone_repr_clause(&self, r: &RepresentationClause) -> RepresentationClause {
        match r {
            RepresentationClause::Attribute { entity, attribute, value, span } => {
                RepresentationClause::Attribute {
                    entity: self.clone_path(entity),
                    attribute: *attribute,
                    value: self.clone_expr(value),
                    span: *span,
                }
            }
            RepresentationClause::Record { entity, components, span } => RepresentationClause::Record {
                entity: self.clone_path(entity),
                components: components
                    .iter()
                    .map(|(name, first, last)| (*name, self.clone_expr(first), self.clone_expr(last)))
                    .collect(),
                span: *span,
            },
        }
    }

    fn clone_handler(&self, h: &ExceptionHandler) -> ExceptionHandler {
        ExceptionHandler {
            choices: h.choices.iter().map(|c| self.clone_choice(c)).collect(),
            stmts: h.stmts.iter().map(|s| self.clone_stmt(s)).collect(),
            span: h.span,
        }
    }

    fn clone_stmt(&self, s: &Stmt) -> Stmt {
        match s {
            Stmt::Null(span) => Stmt::Null(*span),
            Stmt::Label(name, span) => Stmt::Label(*name, *span),
            Stmt::Assign { target, value, span } => {
                Stmt::Assign { target: self.clone_expr(target), value: self.clone_expr(value), span: *span }
            }
            Stmt::Call(c) => Stmt::Call(CallStmt {
                name: self.clone_path(&c.name),
                args: c.args.iter().map(|a| self.clone_argument(a)).collect(),
                span: c.span,
            }),
            Stmt::If(i) => Stmt::If(IfStmt {
                cond: self.clone_expr(&i.cond),
                then_stmts: i.then_stmts.iter().map(|s| self.clone_stmt(s)).collect(),
                elsifs: i
                    .elsifs
                    .iter()
                    .map(|(c, body)| (self.clone_expr(c), body.iter().map(|s| self.clone_stmt(s)).collect()))
                    .collect(),
                else_stmts: i.else_stmts.as_ref().map(|body| body.iter().map(|s| self.clone_stmt(s)).collect()),
                span: i.span,
            }),
            Stmt::Case(c) => Stmt::Case(CaseStmt {
                selector: self.clone_expr(&c.selector),
                alternatives: c
                    .alternatives
                    .iter()
                    .map(|alt| CaseAlt {
                        choices: alt.choices.iter().map(|c| self.clone_choice(c)).collect(),
                        stmts: alt.stmts.iter().map(|s| self.clone_stmt(s)).collect(),
                    })
                    .collect(),
                span: c.span,
            }),
            Stmt::Loop(l) => Stmt::Loop(LoopStmt {
                label: l.label,
                scheme: l.scheme.as_ref().map(|sc| self.clone_iteration_scheme(sc)),
                stmts: l.stmts.iter().map(|s| self.clone_stmt(s)).collect(),
                span: l.span,
            }),
            Stmt::Exit { label, condition, span } => {
                Stmt::Exit { label: *label, condition: condition.as_ref().map(|e| self.clone_expr(e)), span: *span }
            }
            Stmt::Return { value, span } => {
                Stmt::Return { value: value.as_ref().map(|e| self.clone_expr(e)), span: *span }
            }
            Stmt::Goto { label, span } => Stmt::Goto { label: *label, span: *span },
            Stmt::Block(b) => Stmt::Block(BlockStmt {
                label: b.label,
                decls: b.decls.iter().map(|d| self.clone_decl(d)).collect(),
                stmts: b.stmts.iter().map(|s| self.clone_stmt(s)).collect(),
                handlers: b.handlers.iter().map(|h| self.clone_handler(h)).collect(),
                span: b.span,
            }),
            Stmt::Raise { exception, span } => {
                Stmt::Raise { exception: exception.as_ref().map(|p| self.clone_path(p)), span: *span }
            }
            Stmt::Delay { expr, span } => Stmt::Delay { expr: self.clone_expr(expr), span: *span },
            Stmt::Abort { names, span } => {
                Stmt::Abort { names: names.iter().map(|p| self.clone_path(p)).collect(), span: *span }
            }
            Stmt::Accept(a) => Stmt::Accept(self.clone_accept(a)),
            Stmt::Select(sel) => Stmt::Select(SelectStmt {
                arms: sel
                    .arms
                    .iter()
                    .map(|arm| SelectArm {
                        guard: arm.guard.as_ref().map(|e| self.clone_expr(e)),
                        accept: self.clone_accept(&arm.accept),
                        stmts: arm.stmts.iter().map(|s| self.clone_stmt(s)).collect(),
                    })
                    .collect(),
                else_stmts: sel.else_stmts.as_ref().map(|body| body.iter().map(|s| self.clone_stmt(s)).collect()),
                span: sel.span,
            }),
        }
    }

    fn clone_iteration_scheme(&self, scheme: &IterationScheme) -> IterationScheme {
        match scheme {
            IterationScheme::While(e) => IterationScheme::While(self.clone_expr(e)),
            IterationScheme::For { var, reverse, range } => {
                IterationScheme::For { var: *var, reverse: *reverse, range: self.clone_discrete_range(range) }
            }
        }
    }

    fn clone_accept(&self, a: &AcceptStmt) -> AcceptStmt {
        AcceptStmt {
            entry: a.entry,
            index: a.index.as_ref().map(|e| self.clone_expr(e)),
            params: a.params.iter().map(|p| self.clone_param_spec(p)).collect(),
            stmts: a.stmts.as_ref().map(|body| body.iter().map(|s| self.clone_stmt(s)).collect()),
            span: a.span,
        }
    }
}

/// Forces the top-level declared name of a cloned spec to the
/// instantiation's given name (`procedure SI is new Swap(Integer);`
/// declares `SI`, not `Swap`).
fn rename_decl(decl: &mut Decl, name: Symbol) {
    match decl {
        Decl::Subprogram(SubprogramDecl::Spec(s)) => s.name = name,
        Decl::Subprogram(SubprogramDecl::Body(b)) => b.spec.name = name,
        Decl::Package(PackageDecl::Spec(p)) => p.name = name,
        Decl::Package(PackageDecl::Body(p)) => p.name = name,
        _ => {}
    }
}
