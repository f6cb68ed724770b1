//! Name resolution and type checking (spec.md §4.3).
//!
//! Two passes per declarative part: `collect_decl` binds every name a
//! declarative part introduces (so forward references within the same
//! part - a subprogram calling one declared later in the same package
//! body - resolve), then `resolve_decl` walks each declaration's
//! initializers, bodies and statements, filling in
//! [`crate::checks::TypeckResults`] and [`crate::types::TypeTable`].

use crate::checks::{Check, TypeckResults};
use crate::generics::{GenericTable, GenericTemplate, Instantiator, Subst};
use crate::scope::{RibKind, ScopeTree};
use crate::symtab::{SymbolInfo, SymbolKind, SymbolTable};
use crate::types::{Component, FormalParam, TypeDesc, TypeKind, TypeTable};
use adac_par::ast::*;
use adac_util::diagnostic::DiagnosticBuilder;
use adac_util::{DefId, Handler, Span, Symbol};
use std::collections::HashMap;

/// Predefined root types and literals set up once per compilation,
/// mirroring package `Standard` (spec.md §4.3's resolver contract:
/// "the resolver seeds a `Standard` scope before looking at the
/// compilation unit").
pub struct StandardTypes {
    pub boolean: DefId,
    pub character: DefId,
    pub integer: DefId,
    pub natural: DefId,
    pub positive: DefId,
    pub float: DefId,
    pub string: DefId,
    pub duration: DefId,
    pub universal_integer: DefId,
    pub universal_float: DefId,
    pub error: DefId,
}

pub struct Resolver<'h> {
    pub symtab: SymbolTable,
    pub types: TypeTable,
    pub scope: ScopeTree,
    pub generics: GenericTable,
    pub results: TypeckResults,
    pub std: StandardTypes,
    node_gen: NodeIdGenerator,
    handler: &'h mut Handler,
}

impl<'h> Resolver<'h> {
    pub fn new(handler: &'h mut Handler) -> Self {
        let mut symtab = SymbolTable::new();
        let mut types = TypeTable::new();
        let mut scope = ScopeTree::new();

        let mut declare_root = |symtab: &mut SymbolTable, types: &mut TypeTable, scope: &mut ScopeTree, name: &str, kind: TypeKind| -> DefId {
            let sym = Symbol::intern_ada(name);
            let id = symtab.declare(SymbolInfo {
                name: sym,
                kind: SymbolKind::Type,
                ty: DefId::DUMMY,
                default: None,
                mangled: None,
                decl: None,
                span: Span::DUMMY,
            });
            types.insert(id, TypeDesc::new(kind, id));
            scope.add_binding(sym, id);
            id
        };

        let boolean = declare_root(&mut symtab, &mut types, &mut scope, "Boolean", TypeKind::Boolean);
        let character = declare_root(&mut symtab, &mut types, &mut scope, "Character", TypeKind::Character);
        let integer = declare_root(&mut symtab, &mut types, &mut scope, "Integer", TypeKind::Integer { low: i64::MIN, high: i64::MAX });
        let float = declare_root(&mut symtab, &mut types, &mut scope, "Float", TypeKind::Float { digits: 6, low: f64::MIN, high: f64::MAX });
        let string = declare_root(&mut symtab, &mut types, &mut scope, "String", TypeKind::StringType);
        let duration = declare_root(&mut symtab, &mut types, &mut scope, "Duration", TypeKind::FixedPoint { delta: 0.000001, digits: None, low: -86400.0, high: 86400.0 });
        let universal_integer = declare_root(&mut symtab, &mut types, &mut scope, "universal_integer", TypeKind::UniversalInteger);
        let universal_float = declare_root(&mut symtab, &mut types, &mut scope, "universal_real", TypeKind::UniversalFloat);
        let error = declare_root(&mut symtab, &mut types, &mut scope, "<error>", TypeKind::Error);

        // Natural/Positive are ordinary subtypes of Integer (LRM 3.5.4).
        let natural = symtab.declare(SymbolInfo { name: Symbol::intern_ada("Natural"), kind: SymbolKind::Type, ty: DefId::DUMMY, default: None, mangled: None, decl: None, span: Span::DUMMY });
        types.insert(natural, TypeDesc::derived_from(TypeKind::Integer { low: 0, high: i64::MAX }, integer, integer));
        scope.add_binding(Symbol::intern_ada("Natural"), natural);

        let positive = symtab.declare(SymbolInfo { name: Symbol::intern_ada("Positive"), kind: SymbolKind::Type, ty: DefId::DUMMY, default: None, mangled: None, decl: None, span: Span::DUMMY });
        types.insert(positive, TypeDesc::derived_from(TypeKind::Integer { low: 1, high: i64::MAX }, integer, integer));
        scope.add_binding(Symbol::intern_ada("Positive"), positive);

        for (lit, value) in [("False", 0i64), ("True", 1)] {
            let sym = Symbol::intern_ada(lit);
            let id = symtab.declare(SymbolInfo { name: sym, kind: SymbolKind::EnumLiteral, ty: boolean, default: None, mangled: None, decl: None, span: Span::DUMMY });
            let _ = value;
            scope.add_binding(sym, id);
        }
        for exc in ["Constraint_Error", "Program_Error", "Storage_Error", "Numeric_Error", "Tasking_Error"] {
            let sym = Symbol::intern_ada(exc);
            let id = symtab.declare(SymbolInfo { name: sym, kind: SymbolKind::Exception, ty: DefId::DUMMY, default: None, mangled: None, decl: None, span: Span::DUMMY });
            scope.add_binding(sym, id);
        }

        let std = StandardTypes {
            boolean,
            character,
            integer,
            natural,
            positive,
            float,
            string,
            duration,
            universal_integer,
            universal_float,
            error,
        };

        Resolver {
            symtab,
            types,
            scope,
            generics: GenericTable::new(),
            results: TypeckResults::new(),
            std,
            node_gen: NodeIdGenerator::new(),
            handler,
        }
    }

    fn error(&mut self, msg: impl Into<String>, span: Span) {
        DiagnosticBuilder::error(msg).span(span).emit(self.handler);
    }

    /// Looks up a single-segment name, reporting "undefined" if it
    /// isn't visible and returning `None` for callers that can't
    /// usefully continue (multi-segment selected names resolve the
    /// prefix only; `Prefix.Selector` is a [`ExprKind::Selector`], not
    /// a dotted [`Path`], once parsed - `Path`s reaching here are
    /// either a bare identifier or an as-yet-unexpanded dotted
    /// with/use name).
    fn resolve_name(&mut self, name: Symbol, span: Span) -> &[DefId] {
        let candidates = self.scope.resolve(name);
        if candidates.is_empty() {
            self.error(format!("\"{}\" is undefined", name.as_str()), span);
        }
        candidates
    }

    pub fn analyze(&mut self, unit: &CompilationUnit) {
        match &unit.unit {
            Unit::Subprogram(body) => self.analyze_subprogram_body(body),
            Unit::PackageSpec(spec) => self.analyze_package_spec(spec),
            Unit::PackageBody(body) => self.analyze_package_body(body),
            Unit::Subunit { body, .. } => self.analyze_subprogram_body(body),
        }
    }

    fn analyze_package_spec(&mut self, spec: &PackageSpec) {
        let pkg_id = self.symtab.declare(SymbolInfo {
            name: spec.name,
            kind: SymbolKind::Package,
            ty: DefId::DUMMY,
            default: None,
            mangled: None,
            decl: None,
            span: spec.span,
        });
        self.scope.add_binding(spec.name, pkg_id);
        self.scope.enter_scope(RibKind::Package);
        self.analyze_decl_part(&spec.visible_decls);
        self.analyze_decl_part(&spec.private_decls);
        self.scope.exit_scope();
    }

    fn analyze_package_body(&mut self, body: &PackageBody) {
        self.scope.enter_scope(RibKind::Package);
        self.analyze_decl_part(&body.decls);
        for stmt in &body.stmts {
            self.analyze_stmt(stmt);
        }
        for h in &body.handlers {
            self.analyze_handler(h);
        }
        self.scope.exit_scope();
    }

    fn analyze_subprogram_body(&mut self, body: &SubprogramBody) {
        let def_id = self.declare_subprogram_spec(&body.spec);
        self.scope.enter_scope(RibKind::Subprogram);
        for p in &body.spec.params {
            self.declare_param(p);
        }
        self.analyze_decl_part(&body.decls);
        for stmt in &body.stmts {
            self.analyze_stmt(stmt);
        }
        for h in &body.handlers {
            self.analyze_handler(h);
        }
        self.scope.exit_scope();
        let _ = def_id;
    }

    /// First pass: bind every name the part introduces, so later
    /// declarations (and the bodies analyzed in the second pass) can
    /// see forward references within the same declarative part.
    fn analyze_decl_part(&mut self, decls: &[Decl]) {
        for decl in decls {
            self.collect_decl(decl);
        }
        for decl in decls {
            self.resolve_decl(decl);
        }
    }

    fn collect_decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Object(o) => {
                let kind = if o.constant { SymbolKind::Constant } else { SymbolKind::Variable };
                for &name in &o.names {
                    let id = self.symtab.declare(SymbolInfo { name, kind, ty: DefId::DUMMY, default: None, mangled: None, decl: None, span: o.span });
                    self.scope.add_binding(name, id);
                }
            }
            Decl::Type(t) => {
                let id = self.symtab.declare(SymbolInfo { name: t.name, kind: SymbolKind::Type, ty: DefId::DUMMY, default: None, mangled: None, decl: None, span: t.span });
                self.scope.add_binding(t.name, id);
            }
            Decl::Subtype(s) => {
                let id = self.symtab.declare(SymbolInfo { name: s.name, kind: SymbolKind::Type, ty: DefId::DUMMY, default: None, mangled: None, decl: None, span: s.span });
                self.scope.add_binding(s.name, id);
            }
            Decl::Subprogram(SubprogramDecl::Spec(s)) => {
                self.declare_subprogram_spec(s);
            }
            Decl::Subprogram(SubprogramDecl::Body(b)) => {
                // A generic subprogram's body is parsed as an ordinary
                // subsequent declaration (ast.rs's own comment on
                // `GenericDecl`); match it up with its already-collected
                // template by name instead of declaring it again as a
                // plain overload.
                if self.generics.get(b.spec.name).is_some() {
                    self.generics.attach_body(b.spec.name, b.clone());
                } else {
                    self.declare_subprogram_spec(&b.spec);
                }
            }
            Decl::Package(PackageDecl::Spec(p)) => {
                let id = self.symtab.declare(SymbolInfo { name: p.name, kind: SymbolKind::Package, ty: DefId::DUMMY, default: None, mangled: None, decl: None, span: p.span });
                self.scope.add_binding(p.name, id);
            }
            Decl::Package(PackageDecl::Body(_)) => {}
            Decl::Generic(g) => {
                let name = Self::generic_decl_name(&g.spec);
                if let Some(name) = name {
                    let id = self.symtab.declare(SymbolInfo { name, kind: SymbolKind::GenericTemplate, ty: DefId::DUMMY, default: None, mangled: None, decl: None, span: g.span });
                    self.scope.add_binding(name, id);
                    let template = GenericTemplate::from_generic_decl(id, g);
                    self.generics.insert(name, template);
                }
            }
            Decl::Instantiation(i) => {
                let kind = match i.kind {
                    SubprogramKind::Procedure | SubprogramKind::Function => SymbolKind::Subprogram,
                };
                let id = self.symtab.declare(SymbolInfo { name: i.name, kind, ty: DefId::DUMMY, default: None, mangled: None, decl: None, span: i.span });
                self.scope.add_binding(i.name, id);
            }
            Decl::Renaming(r) => {
                let id = self.symtab.declare(SymbolInfo { name: r.name, kind: SymbolKind::Variable, ty: DefId::DUMMY, default: None, mangled: None, decl: None, span: r.span });
                self.scope.add_binding(r.name, id);
            }
            Decl::Exception(e) => {
                for &name in &e.names {
                    let id = self.symtab.declare(SymbolInfo { name, kind: SymbolKind::Exception, ty: DefId::DUMMY, default: None, mangled: None, decl: None, span: e.span });
                    self.scope.add_binding(name, id);
                }
            }
            Decl::Representation(_) | Decl::Pragma(_) | Decl::Use(_) => {}
        }
    }

    fn generic_decl_name(spec: &Decl) -> Option<Symbol> {
        match spec {
            Decl::Subprogram(SubprogramDecl::Spec(s)) => Some(s.name),
            Decl::Subprogram(SubprogramDecl::Body(b)) => Some(b.spec.name),
            Decl::Package(PackageDecl::Spec(p)) => Some(p.name),
            Decl::Package(PackageDecl::Body(p)) => Some(p.name),
            _ => None,
        }
    }

    /// Declares (or re-finds, for a body matching an earlier spec) the
    /// `DefId` for one subprogram spec. Overload resolution needs every
    /// spec with the same name kept as a distinct symbol rather than
    /// merged, so two `procedure Put` overloads both get their own
    /// `DefId` and their own `Procedure`/`Function` [`TypeKind`].
    fn declare_subprogram_spec(&mut self, spec: &SubprogramSpec) -> DefId {
        let formals: Vec<FormalParam> = spec
            .params
            .iter()
            .flat_map(|p| {
                let ty = self.resolve_type_mark(&p.ty);
                p.names.iter().map(move |&name| FormalParam { name, mode: p.mode, ty, has_default: p.default.is_some() }).collect::<Vec<_>>()
            })
            .collect();
        let id = self.symtab.declare(SymbolInfo {
            name: spec.name,
            kind: SymbolKind::Subprogram,
            ty: DefId::DUMMY,
            default: None,
            mangled: None,
            decl: None,
            span: spec.span,
        });
        let kind = match spec.kind {
            SubprogramKind::Procedure => TypeKind::Procedure { formals },
            SubprogramKind::Function => {
                let return_type = spec
                    .return_type
                    .as_ref()
                    .map(|rt| self.resolve_type_mark(rt))
                    .unwrap_or(self.std.error);
                TypeKind::Function { formals, return_type }
            }
        };
        self.types.insert(id, TypeDesc::new(kind, id));
        self.scope.add_binding(spec.name, id);
        id
    }

    fn declare_param(&mut self, p: &ParamSpec) {
        let ty = self.resolve_type_mark(&p.ty);
        for &name in &p.names {
            let id = self.symtab.declare(SymbolInfo { name, kind: SymbolKind::Parameter, ty, default: None, mangled: None, decl: None, span: p.span });
            self.scope.add_binding(name, id);
        }
    }

    fn resolve_decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Object(o) => self.resolve_object_decl(o),
            Decl::Type(t) => self.resolve_type_decl(t),
            Decl::Subtype(s) => self.resolve_subtype_decl(s),
            Decl::Subprogram(SubprogramDecl::Spec(_)) => {}
            Decl::Subprogram(SubprogramDecl::Body(b)) => {
                // The template body is only ever analyzed in its
                // substituted, freshly-`NodeId`d form, once per
                // instantiation (see `resolve_instantiation`).
                if self.generics.get(b.spec.name).is_none() {
                    self.analyze_subprogram_body(b);
                }
            }
            Decl::Package(PackageDecl::Spec(p)) => self.analyze_package_spec(p),
            Decl::Package(PackageDecl::Body(p)) => self.analyze_package_body(p),
            Decl::Generic(_) => {}
            Decl::Instantiation(i) => self.resolve_instantiation(i),
            Decl::Renaming(r) => {
                let ty = self.analyze_expr(&r.renamed);
                if let Some(name) = self.scope.resolve_local(r.name).first().copied() {
                    if let Some(sym) = self.symtab.get_mut(name) {
                        sym.ty = ty;
                    }
                }
            }
            Decl::Exception(_) => {}
            Decl::Representation(r) => self.resolve_representation_clause(r),
            Decl::Pragma(p) => self.resolve_pragma(p),
            Decl::Use(_) => {}
        }
    }

    fn resolve_object_decl(&mut self, o: &ObjectDecl) {
        let ty = self.resolve_type_mark(&o.ty);
        self.types.freeze(ty);
        if let Some(init) = &o.init {
            let init_ty = self.analyze_expr(init);
            if !self.types.covers(ty, init_ty) {
                self.error("initialization expression has the wrong type", init.span);
            } else if let Some((low, high)) =
                self.types.get(self.types.root_of(ty)).and_then(|d| d.static_bounds())
            {
                if let Some(suppress) = self.types.get(ty).map(|d| d.suppress) {
                    if !suppress.contains(crate::types::SuppressFlags::RANGE) {
                        self.results.add_check(init.id, Check::Range { low, high });
                    }
                }
            }
        }
        for &name in &o.names {
            if let Some(id) = self.scope.resolve_local(name).first().copied() {
                if let Some(sym) = self.symtab.get_mut(id) {
                    sym.ty = ty;
                }
            }
        }
    }

    fn resolve_subtype_decl(&mut self, s: &SubtypeDecl) {
        let base = self.resolve_type_mark(&s.base);
        let root = self.types.root_of(base);
        let kind = self.types.get(base).map(|d| d.kind.clone()).unwrap_or(TypeKind::Error);
        if let Some(id) = self.scope.resolve_local(s.name).first().copied() {
            self.types.insert(id, TypeDesc::derived_from(kind, root, base));
        }
    }

    fn resolve_type_decl(&mut self, t: &TypeDecl) {
        let id = match self.scope.resolve_local(t.name).first().copied() {
            Some(id) => id,
            None => return,
        };
        let kind = match &t.def {
            TypeDef::Enumeration(lits) => {
                for (pos, &lit) in lits.iter().enumerate() {
                    let lit_id = self.symtab.declare(SymbolInfo { name: lit, kind: SymbolKind::EnumLiteral, ty: id, default: None, mangled: None, decl: None, span: t.span });
                    self.scope.add_binding(lit, lit_id);
                    let _ = pos;
                }
                TypeKind::Enumeration { literals: lits.clone() }
            }
            TypeDef::Integer { low, high } => {
                let lo = self.const_eval_int(low);
                let hi = self.const_eval_int(high);
                TypeKind::Integer { low: lo, high: hi }
            }
            TypeDef::Float { digits, range } => {
                let d = self.const_eval_int(digits) as u32;
                let (lo, hi) = range
                    .as_ref()
                    .map(|(l, h)| (self.const_eval_float(l), self.const_eval_float(h)))
                    .unwrap_or((f64::MIN, f64::MAX));
                TypeKind::Float { digits: d, low: lo, high: hi }
            }
            TypeDef::Fixed { delta, digits, range } => {
                let d = self.const_eval_float(delta);
                let dg = digits.as_ref().map(|e| self.const_eval_int(e) as u32);
                let (lo, hi) = range
                    .as_ref()
                    .map(|(l, h)| (self.const_eval_float(l), self.const_eval_float(h)))
                    .unwrap_or((f64::MIN, f64::MAX));
                TypeKind::FixedPoint { delta: d, digits: dg, low: lo, high: hi }
            }
            TypeDef::Array { indices, component } => {
                let comp = self.resolve_type_mark(component);
                let idx: Vec<DefId> = indices
                    .iter()
                    .map(|r| self.resolve_discrete_range_type(r))
                    .collect();
                TypeKind::Array { index_types: idx, element: comp, constrained: true }
            }
            TypeDef::UnconstrainedArray { index_types, component } => {
                let comp = self.resolve_type_mark(component);
                for it in index_types {
                    self.resolve_type_mark(it);
                }
                TypeKind::FatPointer { element: comp }
            }
            TypeDef::Record(comps) => {
                let mut members = Vec::new();
                for c in comps {
                    let cty = self.resolve_type_mark(&c.ty);
                    for &name in &c.names {
                        members.push(Component { name, ty: cty, has_default: c.default.is_some() });
                    }
                }
                TypeKind::Record { components: members }
            }
            TypeDef::Access { designated } => {
                let d = self.resolve_type_mark(designated);
                TypeKind::Access { designated: d }
            }
            TypeDef::Derived { parent } => {
                let p = self.resolve_type_mark(parent);
                let root = self.types.root_of(p);
                let pkind = self.types.get(p).map(|d| d.kind.clone()).unwrap_or(TypeKind::Error);
                self.types.insert(id, TypeDesc::derived_from(TypeKind::Derived { parent: p }, root, p));
                let _ = pkind;
                return;
            }
            TypeDef::Private => TypeKind::Error,
            TypeDef::Task(_) => TypeKind::Task,
        };
        self.types.insert(id, TypeDesc::new(kind, id));
    }

    fn resolve_discrete_range_type(&mut self, r: &DiscreteRange) -> DefId {
        match r {
            DiscreteRange::Range(lo, _hi) => self.analyze_expr(lo),
            DiscreteRange::Subtype(tm) => self.resolve_type_mark(tm),
        }
    }

    /// Resolves a [`TypeMark`] to its `DefId`, applying any inline
    /// constraint as a range check carried on the mark's own span (the
    /// emitter reads it back through [`TypeckResults`] when it lowers
    /// the declaration that used this mark).
    fn resolve_type_mark(&mut self, tm: &TypeMark) -> DefId {
        if tm.name.segments.is_empty() {
            return self.std.error;
        }
        let name = *tm.name.segments.last().unwrap();
        let candidates = self.resolve_name(name, tm.name.span);
        let id = match candidates {
            [] => self.std.error,
            [only] => *only,
            many => {
                // Types aren't overloaded; the first match that the
                // symbol table records as a Type wins.
                many.iter()
                    .find(|&&c| matches!(self.symtab.get(c).map(|s| s.kind), Some(SymbolKind::Type)))
                    .copied()
                    .unwrap_or(many[0])
            }
        };
        if let Some(Constraint::Range(lo, hi)) = &tm.constraint {
            let low = self.const_eval_int(lo);
            let high = self.const_eval_int(hi);
            let root = self.types.root_of(id);
            let kind = self.types.get(id).map(|d| d.kind.clone()).unwrap_or(TypeKind::Error);
            let _ = kind;
            let sub_id = self.symtab.declare(SymbolInfo { name: Symbol::intern_ada("<anon subtype>"), kind: SymbolKind::Type, ty: DefId::DUMMY, default: None, mangled: None, decl: None, span: tm.span });
            self.types.insert(sub_id, TypeDesc::derived_from(TypeKind::Integer { low, high }, root, id));
            return sub_id;
        }
        id
    }

    fn resolve_instantiation(&mut self, inst: &InstantiationDecl) {
        let gen_name = *inst.generic_name.segments.last().unwrap();
        let template = match self.generics.get(gen_name) {
            Some(t) => t.clone(),
            None => {
                self.error(format!("\"{}\" is not a generic unit", gen_name.as_str()), inst.span);
                return;
            }
        };
        let mut substs: HashMap<Symbol, Subst> = HashMap::new();
        for (formal, actual) in template.formals.iter().zip(inst.actuals.iter()) {
            match formal {
                GenericFormal::Type(name) => {
                    if let ExprKind::Name(path) = &actual.kind {
                        substs.insert(*name, Subst::Type(TypeMark { name: path.clone(), constraint: None, span: actual.span }));
                    }
                }
                GenericFormal::Object { name, .. } => {
                    substs.insert(*name, Subst::Value(actual.clone()));
                }
                GenericFormal::Subprogram { spec, .. } => {
                    if let ExprKind::Name(path) = &actual.kind {
                        substs.insert(spec.name, Subst::Subprogram(path.clone()));
                    }
                }
            }
        }

        let instantiator = Instantiator::new(&self.node_gen, &substs);
        let spec_decl = instantiator.instantiate_spec(&template.spec, inst.name);
        self.collect_decl(&spec_decl);
        self.resolve_decl(&spec_decl);
        if let Some(body) = &template.body {
            let body_clone = instantiator.instantiate_body(body, inst.name);
            self.analyze_subprogram_body(&body_clone);
        }
    }

    fn resolve_representation_clause(&mut self, r: &RepresentationClause) {
        match r {
            RepresentationClause::Attribute { entity, value, .. } => {
                let candidates = self.resolve_name(*entity.segments.last().unwrap(), entity.span);
                if let Some(&id) = candidates.first() {
                    if self.types.get(id).map(|d| d.frozen).unwrap_or(false) {
                        self.error("representation item given for a frozen entity", entity.span);
                    }
                }
                self.analyze_expr(value);
            }
            RepresentationClause::Record { entity, components, .. } => {
                self.resolve_name(*entity.segments.last().unwrap(), entity.span);
                for (_, first, last) in components {
                    self.analyze_expr(first);
                    self.analyze_expr(last);
                }
            }
        }
    }

    fn resolve_pragma(&mut self, p: &Pragma) {
        if p.name.eq_str("Suppress") {
            if let Some(arg) = p.args.first() {
                if let ExprKind::Name(path) = &arg.kind {
                    if crate::types::SuppressFlags::from_pragma_name(*path.segments.last().unwrap()).is_none() {
                        self.error("unknown check name in pragma Suppress", arg.span);
                    }
                }
            }
        }
        for a in &p.args {
            self.analyze_expr(a);
        }
    }

    fn analyze_handler(&mut self, h: &ExceptionHandler) {
        for c in &h.choices {
            if let Choice::Expr(e) = c {
                self.analyze_expr(e);
            }
        }
        for s in &h.stmts {
            self.analyze_stmt(s);
        }
    }

    fn analyze_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Null(_) | Stmt::Label(..) => {}
            Stmt::Assign { target, value, .. } => {
                let target_ty = self.analyze_expr(target);
                let value_ty = self.analyze_expr(value);
                if !self.types.covers(target_ty, value_ty) {
                    self.error("assignment has the wrong type", value.span);
                }
            }
            Stmt::Call(c) => {
                self.resolve_name(*c.name.segments.last().unwrap(), c.name.span);
                for a in &c.args {
                    self.analyze_expr(&a.value);
                }
            }
            Stmt::If(i) => {
                self.analyze_expr(&i.cond);
                for s in &i.then_stmts {
                    self.analyze_stmt(s);
                }
                for (cond, body) in &i.elsifs {
                    self.analyze_expr(cond);
                    for s in body {
                        self.analyze_stmt(s);
                    }
                }
                if let Some(body) = &i.else_stmts {
                    for s in body {
                        self.analyze_stmt(s);
                    }
                }
            }
            Stmt::Case(c) => {
                self.analyze_expr(&c.selector);
                for alt in &c.alternatives {
                    for choice in &alt.choices {
                        if let Choice::Expr(e) = choice {
                            self.analyze_expr(e);
                        }
                    }
                    for s in &alt.stmts {
                        self.analyze_stmt(s);
                    }
                }
            }
            Stmt::Loop(l) => {
                let kind = RibKind::Loop(l.label);
                self.scope.enter_scope(kind);
                if let Some(scheme) = &l.scheme {
                    match scheme {
                        IterationScheme::While(e) => {
                            self.analyze_expr(e);
                        }
                        IterationScheme::For { var, range, .. } => {
                            let ty = self.resolve_discrete_range_type(range);
                            let id = self.symtab.declare(SymbolInfo { name: *var, kind: SymbolKind::Variable, ty, default: None, mangled: None, decl: None, span: l.span });
                            self.scope.add_binding(*var, id);
                        }
                    }
                }
                for s in &l.stmts {
                    self.analyze_stmt(s);
                }
                self.scope.exit_scope();
            }
            Stmt::Exit { label, condition, span } => {
                if let Some(cond) = condition {
                    self.analyze_expr(cond);
                }
                if let Some(label) = label {
                    if self.scope.resolve(*label).is_empty() {
                        self.error(format!("\"{}\" does not name an enclosing loop", label.as_str()), *span);
                    }
                }
            }
            Stmt::Return { value, .. } => {
                if let Some(v) = value {
                    self.analyze_expr(v);
                }
            }
            Stmt::Goto { label, span } => {
                if self.scope.resolve(*label).is_empty() {
                    self.error(format!("no label \"{}\" in scope", label.as_str()), *span);
                }
            }
            Stmt::Block(b) => {
                self.scope.enter_scope(RibKind::Block);
                self.analyze_decl_part(&b.decls);
                for s in &b.stmts {
                    self.analyze_stmt(s);
                }
                for h in &b.handlers {
                    self.analyze_handler(h);
                }
                self.scope.exit_scope();
            }
            Stmt::Raise { exception, span } => {
                if let Some(path) = exception {
                    self.resolve_name(*path.segments.last().unwrap(), *span);
                }
            }
            Stmt::Delay { expr, .. } => {
                self.analyze_expr(expr);
            }
            Stmt::Abort { names, span } => {
                for n in names {
                    self.resolve_name(*n.segments.last().unwrap(), *span);
                }
            }
            Stmt::Accept(a) => {
                self.scope.enter_scope(RibKind::Block);
                for p in &a.params {
                    self.declare_param(p);
                }
                if let Some(stmts) = &a.stmts {
                    for s in stmts {
                        self.analyze_stmt(s);
                    }
                }
                self.scope.exit_scope();
            }
            Stmt::Select(sel) => {
                for arm in &sel.arms {
                    if let Some(guard) = &arm.guard {
                        self.analyze_expr(guard);
                    }
                    for s in &arm.stmts {
                        self.analyze_stmt(s);
                    }
                }
                if let Some(body) = &sel.else_stmts {
                    for s in body {
                        self.analyze_stmt(s);
                    }
                }
            }
        }
    }

    /// Resolves and type-checks one expression node, recording its
    /// type in [`TypeckResults`] and returning it so callers (an
    /// object initializer, an assignment RHS) can check compatibility
    /// without a second lookup.
    fn analyze_expr(&mut self, expr: &Expr) -> DefId {
        let ty = match &expr.kind {
            ExprKind::Literal(lit) => self.analyze_literal(lit),
            ExprKind::Name(path) => self.analyze_name(path, expr.span),
            ExprKind::Binary { op, left, right } => self.analyze_binary(*op, left, right, expr.span),
            ExprKind::Unary { op, operand } => self.analyze_unary(*op, operand),
            ExprKind::Call { callee, args } => self.analyze_call(callee, args),
            ExprKind::Selector { prefix, selector } => self.analyze_selector(prefix, *selector, expr.span),
            ExprKind::Attribute { prefix, attr, args } => self.analyze_attribute(prefix, *attr, args, expr.id),
            ExprKind::Qualified { type_mark, expr: inner } => {
                let ty = self.resolve_type_mark(type_mark);
                let inner_ty = self.analyze_expr(inner);
                if !self.types.covers(ty, inner_ty) {
                    self.error("qualified expression has the wrong type", inner.span);
                }
                ty
            }
            ExprKind::Allocator { type_mark, init } => {
                let designated = self.resolve_type_mark(type_mark);
                if let Some(init) = init {
                    self.analyze_expr(init);
                }
                let id = self.symtab.declare(SymbolInfo { name: Symbol::intern_ada("<anon access>"), kind: SymbolKind::Type, ty: DefId::DUMMY, default: None, mangled: None, decl: None, span: expr.span });
                self.types.insert(id, TypeDesc::new(TypeKind::Access { designated }, id));
                id
            }
            ExprKind::Aggregate(agg) => self.analyze_aggregate(agg),
            ExprKind::Range(lo, hi) => {
                let lo_ty = self.analyze_expr(lo);
                self.analyze_expr(hi);
                lo_ty
            }
            ExprKind::Membership { expr: inner, range, .. } => {
                self.analyze_expr(inner);
                match range {
                    MembershipRange::Range(lo, hi) => {
                        self.analyze_expr(lo);
                        self.analyze_expr(hi);
                    }
                    MembershipRange::TypeMark(tm) => {
                        self.resolve_type_mark(tm);
                    }
                }
                self.std.boolean
            }
        };
        self.results.set_type(expr.id, ty);
        ty
    }

    fn analyze_literal(&mut self, lit: &Literal) -> DefId {
        match lit {
            Literal::Int(_) | Literal::Based(..) => self.std.universal_integer,
            Literal::Real(_) => self.std.universal_float,
            Literal::Str(_) => self.std.string,
            Literal::Char(_) => self.std.character,
            Literal::Null => self.std.error,
        }
    }

    fn analyze_name(&mut self, path: &Path, span: Span) -> DefId {
        let name = *path.segments.last().unwrap();
        let candidates = self.resolve_name(name, span);
        match candidates {
            [] => self.std.error,
            [only] => self.symtab.get(*only).map(|s| s.ty).unwrap_or(self.std.error),
            many => {
                // An un-applied overloaded name (no argument list to
                // disambiguate by profile) is only legal if every
                // overload agrees on its type; otherwise it's ambiguous.
                let first_ty = self.symtab.get(many[0]).map(|s| s.ty);
                if many.iter().all(|&id| self.symtab.get(id).map(|s| s.ty) == first_ty) {
                    first_ty.unwrap_or(self.std.error)
                } else {
                    self.error(format!("\"{}\" is ambiguous here", name.as_str()), span);
                    self.std.error
                }
            }
        }
    }

    fn analyze_binary(&mut self, op: BinOp, left: &Expr, right: &Expr, span: Span) -> DefId {
        let lty = self.analyze_expr(left);
        let rty = self.analyze_expr(right);
        match op {
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
                if !self.types.covers(lty, rty) {
                    self.error("operands of comparison have different types", span);
                }
                self.std.boolean
            }
            BinOp::And | BinOp::Or | BinOp::Xor | BinOp::AndThen | BinOp::OrElse => self.std.boolean,
            BinOp::Div | BinOp::Mod | BinOp::Rem => {
                if let Some(suppress) = self.types.get(lty).map(|d| d.suppress) {
                    if !suppress.contains(crate::types::SuppressFlags::DIVISION) {
                        self.results.add_check(right.id, Check::DivisionByZero);
                    }
                }
                lty
            }
            BinOp::Concat => {
                if matches!(self.types.get(lty).map(|d| &d.kind), Some(TypeKind::Array { .. } | TypeKind::FatPointer { .. } | TypeKind::StringType)) {
                    lty
                } else {
                    lty
                }
            }
            _ => {
                if !self.types.covers(lty, rty) {
                    self.error("operands of arithmetic operator have different types", span);
                }
                lty
            }
        }
    }

    fn analyze_unary(&mut self, op: UnOp, operand: &Expr) -> DefId {
        let ty = self.analyze_expr(operand);
        match op {
            UnOp::Not => self.std.boolean,
            _ => ty,
        }
    }

    fn analyze_call(&mut self, callee: &Expr, args: &[Argument]) -> DefId {
        for a in args {
            self.analyze_expr(&a.value);
        }
        // A `Call` node is either a subprogram call or an indexed /
        // sliced name; only the resolver can tell which (spec.md
        // §4.2). A callee naming a `Function` returns its result type;
        // naming an array-typed object indexes into its element type.
        match &callee.kind {
            ExprKind::Name(path) => {
                let name = *path.segments.last().unwrap();
                let candidates = self.resolve_name(name, callee.span).to_vec();
                self.resolve_call_target(&candidates, args.len(), callee.span)
            }
            _ => {
                let callee_ty = self.analyze_expr(callee);
                self.element_or_return_type(callee_ty)
            }
        }
    }

    fn resolve_call_target(&mut self, candidates: &[DefId], arity: usize, span: Span) -> DefId {
        if candidates.is_empty() {
            return self.std.error;
        }
        let matching: Vec<DefId> = candidates
            .iter()
            .filter(|&&id| match self.types.get(id).map(|d| &d.kind) {
                Some(TypeKind::Function { formals, .. }) | Some(TypeKind::Procedure { formals }) => {
                    formals.len() == arity || formals.iter().filter(|f| !f.has_default).count() <= arity
                }
                _ => true,
            })
            .copied()
            .collect();
        let chosen = if matching.len() == 1 { matching[0] } else { candidates[0] };
        if matching.len() > 1 {
            self.error("call is ambiguous among overloaded subprograms", span);
        }
        self.element_or_return_type(chosen)
    }

    fn element_or_return_type(&self, id: DefId) -> DefId {
        match self.types.get(id).map(|d| &d.kind) {
            Some(TypeKind::Function { return_type, .. }) => *return_type,
            Some(TypeKind::Array { element, .. }) | Some(TypeKind::FatPointer { element }) => *element,
            _ => {
                self.symtab.get(id).map(|s| s.ty).unwrap_or(DefId::DUMMY)
            }
        }
    }

    fn analyze_selector(&mut self, prefix: &Expr, selector: Symbol, span: Span) -> DefId {
        let prefix_ty = self.analyze_expr(prefix);
        match self.types.get(prefix_ty).map(|d| &d.kind) {
            Some(TypeKind::Record { components }) => components
                .iter()
                .find(|c| c.name.eq_str(selector.as_str()))
                .map(|c| c.ty)
                .unwrap_or_else(|| {
                    self.std.error
                }),
            _ => {
                // Package-qualified name (`Pkg.Item`): resolve `selector`
                // directly, since prefixes naming packages don't carry
                // a useful `prefix_ty`.
                let candidates = self.resolve_name(selector, span).to_vec();
                match candidates.as_slice() {
                    [] => self.std.error,
                    [only] => self.symtab.get(*only).map(|s| s.ty).unwrap_or(self.std.error),
                    many => self.symtab.get(many[0]).map(|s| s.ty).unwrap_or(self.std.error),
                }
            }
        }
    }

    /// Attribute resolution table (spec.md §4.3): the handful of
    /// `'Attr` designators this core supports resolve to a fixed
    /// result type independent of their prefix's own type, except
    /// `FIRST`/`LAST`/`SUCC`/`PRED`/`VAL` which carry the prefix's type
    /// through.
    fn analyze_attribute(&mut self, prefix: &Expr, attr: Symbol, args: &[Expr], node: NodeId) -> DefId {
        let prefix_ty = self.analyze_expr(prefix);
        for a in args {
            self.analyze_expr(a);
        }
        self.results.set_attr_kind(node, attr);
        match attr.as_str().to_ascii_uppercase().as_str() {
            "FIRST" | "LAST" | "SUCC" | "PRED" | "VAL" | "MIN" | "MAX" => prefix_ty,
            "LENGTH" | "SIZE" | "POS" | "COUNT" | "DIGITS" | "MACHINE_RADIX" | "MACHINE_EMAX" | "MACHINE_EMIN" => self.std.integer,
            "DELTA" | "EPSILON" | "SMALL" | "LARGE" => self.std.float,
            "ADDRESS" => self.std.integer,
            "IMAGE" => self.std.string,
            "VALUE" => prefix_ty,
            "MACHINE_OVERFLOWS" | "MACHINE_ROUNDS" | "CALLABLE" | "TERMINATED" | "CONSTRAINED" => self.std.boolean,
            _ => {
                self.error(format!("unknown attribute 'Attr '{}", attr.as_str()), prefix.span);
                self.std.error
            }
        }
    }

    fn analyze_aggregate(&mut self, agg: &Aggregate) -> DefId {
        match agg {
            Aggregate::Positional(items) => {
                let mut ty = self.std.error;
                for (i, e) in items.iter().enumerate() {
                    let t = self.analyze_expr(e);
                    if i == 0 {
                        ty = t;
                    }
                }
                ty
            }
            Aggregate::Named(items) => {
                let mut ty = self.std.error;
                for (i, (choice, e)) in items.iter().enumerate() {
                    if let Choice::Expr(c) = choice {
                        self.analyze_expr(c);
                    }
                    let t = self.analyze_expr(e);
                    if i == 0 {
                        ty = t;
                    }
                }
                ty
            }
            Aggregate::Mixed { positional, named } => {
                let mut ty = self.std.error;
                for (i, e) in positional.iter().enumerate() {
                    let t = self.analyze_expr(e);
                    if i == 0 {
                        ty = t;
                    }
                }
                for (choice, e) in named {
                    if let Choice::Expr(c) = choice {
                        self.analyze_expr(c);
                    }
                    self.analyze_expr(e);
                }
                ty
            }
        }
    }

    fn const_eval_int(&mut self, expr: &Expr) -> i64 {
        self.analyze_expr(expr);
        match &expr.kind {
            ExprKind::Literal(Literal::Int(n)) => *n,
            ExprKind::Literal(Literal::Based(n, _)) => *n,
            ExprKind::Unary { op: UnOp::Neg, operand } => -self.const_eval_int(operand),
            _ => 0,
        }
    }

    fn const_eval_float(&mut self, expr: &Expr) -> f64 {
        self.analyze_expr(expr);
        match &expr.kind {
            ExprKind::Literal(Literal::Real(f)) => *f,
            ExprKind::Literal(Literal::Int(n)) => *n as f64,
            ExprKind::Unary { op: UnOp::Neg, operand } => -self.const_eval_float(operand),
            _ => 0.0,
        }
    }
}
