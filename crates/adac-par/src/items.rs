//! Context clauses, declarations, and compilation-unit-level items
//! (spec.md §4.2: "declarations in any order: type, subtype, object
//! ..., subprogram spec/body, package spec/body, exception, generic,
//! instantiation, renaming, pragma, representation clause").

use adac_lex::TokenKind;

use crate::ast::*;
use crate::{ParseError, Parser};

impl<'src, 'h> Parser<'src, 'h> {
    pub(crate) fn parse_context_clauses(&mut self) -> Result<Vec<ContextItem>, ParseError> {
        let mut items = Vec::new();
        loop {
            match self.kind() {
                TokenKind::KwWith => {
                    let start = self.current_span();
                    self.advance();
                    let names = self.parse_name_list()?;
                    let semi = self.expect(TokenKind::Semicolon)?;
                    items.push(ContextItem::With { names, span: start.merge(semi.span) });
                }
                TokenKind::KwUse => {
                    let start = self.current_span();
                    self.advance();
                    let names = self.parse_name_list()?;
                    let semi = self.expect(TokenKind::Semicolon)?;
                    items.push(ContextItem::Use { names, span: start.merge(semi.span) });
                }
                _ => break,
            }
        }
        Ok(items)
    }

    fn parse_name_list(&mut self) -> Result<Vec<Path>, ParseError> {
        let mut names = vec![self.parse_path()?];
        while self.eat(TokenKind::Comma) {
            names.push(self.parse_path()?);
        }
        Ok(names)
    }

    pub(crate) fn parse_path(&mut self) -> Result<Path, ParseError> {
        let start = self.current_span();
        let mut segments = vec![self.expect_identifier()?];
        let mut end = self.prev_span();
        while self.check(TokenKind::Dot) && self.peek_kind(1) == TokenKind::Identifier {
            self.advance();
            segments.push(self.expect_identifier()?);
            end = self.prev_span();
        }
        Ok(Path { segments, span: start.merge(end) })
    }

    pub(crate) fn parse_unit(&mut self) -> Result<Unit, ParseError> {
        if self.check(TokenKind::KwSeparate) {
            let start = self.current_span();
            self.advance();
            self.expect(TokenKind::LParen)?;
            let parent = self.parse_path()?;
            self.expect(TokenKind::RParen)?;
            let body = self.parse_subprogram_body()?;
            let span = start.merge(body.span);
            return Ok(Unit::Subunit { parent, body: Box::new(body), span });
        }
        if self.check(TokenKind::KwPackage) {
            return self.parse_package();
        }
        let body = self.parse_subprogram_body()?;
        Ok(Unit::Subprogram(body))
    }

    fn parse_package(&mut self) -> Result<Unit, ParseError> {
        let start = self.current_span();
        self.expect(TokenKind::KwPackage)?;
        let is_body = self.eat(TokenKind::KwBody);
        let name = self.expect_identifier()?;
        self.expect(TokenKind::KwIs)?;

        if is_body {
            let decls = self.parse_decl_list(&[TokenKind::KwBegin, TokenKind::KwEnd])?;
            let stmts = if self.eat(TokenKind::KwBegin) {
                self.parse_stmt_list(&[TokenKind::KwException, TokenKind::KwEnd])?
            } else {
                Vec::new()
            };
            let handlers = self.parse_exception_handlers()?;
            self.expect(TokenKind::KwEnd)?;
            self.parse_optional_end_designator()?;
            let semi = self.expect(TokenKind::Semicolon)?;
            let span = start.merge(semi.span);
            return Ok(Unit::PackageBody(PackageBody { name, decls, stmts, handlers, span }));
        }

        let visible_decls = self.parse_decl_list(&[TokenKind::KwPrivate, TokenKind::KwEnd])?;
        let private_decls = if self.eat(TokenKind::KwPrivate) {
            self.parse_decl_list(&[TokenKind::KwEnd])?
        } else {
            Vec::new()
        };
        self.expect(TokenKind::KwEnd)?;
        self.parse_optional_end_designator()?;
        let semi = self.expect(TokenKind::Semicolon)?;
        Ok(Unit::PackageSpec(PackageSpec { name, visible_decls, private_decls, span: start.merge(semi.span) }))
    }

    /// Parses declarations until one of `stop` is seen (without
    /// consuming it); used for package visible/private parts, block
    /// declarative parts, and subprogram declarative parts alike.
    pub(crate) fn parse_decl_list(&mut self, stop: &[TokenKind]) -> Result<Vec<Decl>, ParseError> {
        let mut decls = Vec::new();
        while !stop.contains(&self.kind()) && !self.at_end() {
            decls.push(self.parse_decl()?);
        }
        Ok(decls)
    }

    fn parse_decl(&mut self) -> Result<Decl, ParseError> {
        match self.kind() {
            TokenKind::KwType => self.parse_type_decl(),
            TokenKind::KwSubtype => self.parse_subtype_decl(),
            TokenKind::KwProcedure | TokenKind::KwFunction => self.parse_subprogram_decl(),
            TokenKind::KwPackage => match self.parse_package()? {
                Unit::PackageSpec(spec) => Ok(Decl::Package(PackageDecl::Spec(spec))),
                Unit::PackageBody(body) => Ok(Decl::Package(PackageDecl::Body(body))),
                _ => unreachable!("parse_package only returns package units"),
            },
            TokenKind::KwGeneric => self.parse_generic_decl(),
            TokenKind::KwPragma => self.parse_pragma().map(Decl::Pragma),
            TokenKind::KwUse => {
                let start = self.current_span();
                self.advance();
                let names = self.parse_name_list()?;
                let semi = self.expect(TokenKind::Semicolon)?;
                Ok(Decl::Use(ContextItem::Use { names, span: start.merge(semi.span) }))
            }
            TokenKind::KwFor => self.parse_representation_clause(),
            TokenKind::Identifier => self.parse_object_or_renaming_decl(),
            _ => Err(self.error_here("expected a declaration")),
        }
    }

    fn error_here(&mut self, message: impl Into<String>) -> ParseError {
        ParseError::Other(message.into(), self.current_span())
    }

    // -- type and subtype declarations ---------------------------------

    fn parse_type_decl(&mut self) -> Result<Decl, ParseError> {
        let start = self.current_span();
        self.expect(TokenKind::KwType)?;
        let name = self.expect_identifier()?;
        let discriminants = self.parse_optional_discriminant_part()?;

        // `type Foo;` - incomplete type declaration.
        if self.check(TokenKind::Semicolon) {
            let semi = self.advance();
            return Ok(Decl::Type(TypeDecl {
                name,
                discriminants,
                def: TypeDef::Private,
                span: start.merge(semi.span),
            }));
        }

        self.expect(TokenKind::KwIs)?;
        let def = self.parse_type_def()?;
        let semi = self.expect(TokenKind::Semicolon)?;
        Ok(Decl::Type(TypeDecl { name, discriminants, def, span: start.merge(semi.span) }))
    }

    fn parse_optional_discriminant_part(&mut self) -> Result<Vec<DiscriminantSpec>, ParseError> {
        if !self.eat(TokenKind::LParen) {
            return Ok(Vec::new());
        }
        let mut discriminants = Vec::new();
        loop {
            let names = self.parse_identifier_list()?;
            self.expect(TokenKind::Colon)?;
            let ty = self.parse_type_mark()?;
            let default = if self.eat(TokenKind::Assign) { Some(self.parse_expr()?) } else { None };
            discriminants.push(DiscriminantSpec { names, ty, default });
            if !self.eat(TokenKind::Semicolon) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(discriminants)
    }

    fn parse_type_def(&mut self) -> Result<TypeDef, ParseError> {
        match self.kind() {
            TokenKind::KwPrivate => {
                self.advance();
                Ok(TypeDef::Private)
            }
            TokenKind::LParen => {
                self.advance();
                let variants = self.parse_identifier_list()?;
                self.expect(TokenKind::RParen)?;
                Ok(TypeDef::Enumeration(variants))
            }
            TokenKind::KwRange => {
                self.advance();
                let low = self.parse_expr()?;
                self.expect(TokenKind::DotDot)?;
                let high = self.parse_expr()?;
                Ok(TypeDef::Integer { low, high })
            }
            TokenKind::KwDigits => {
                self.advance();
                let digits = self.parse_expr()?;
                let range = self.parse_optional_range_clause()?;
                Ok(TypeDef::Float { digits, range })
            }
            TokenKind::KwDelta => {
                self.advance();
                let delta = self.parse_expr()?;
                let digits =
                    if self.eat(TokenKind::KwDigits) { Some(self.parse_expr()?) } else { None };
                let range = self.parse_optional_range_clause()?;
                Ok(TypeDef::Fixed { delta, digits, range })
            }
            TokenKind::KwArray => self.parse_array_type_def(),
            TokenKind::KwRecord => self.parse_record_type_def(),
            TokenKind::KwAccess => {
                self.advance();
                let designated = self.parse_type_mark()?;
                Ok(TypeDef::Access { designated })
            }
            TokenKind::KwNew => {
                self.advance();
                let parent = self.parse_type_mark()?;
                Ok(TypeDef::Derived { parent })
            }
            TokenKind::KwTask => {
                self.advance();
                if self.eat(TokenKind::KwIs) {
                    let mut entries = Vec::new();
                    while self.check(TokenKind::KwEntry) {
                        entries.push(self.parse_entry_spec()?);
                    }
                    self.expect(TokenKind::KwEnd)?;
                    self.parse_optional_end_designator()?;
                    Ok(TypeDef::Task(entries))
                } else {
                    Ok(TypeDef::Task(Vec::new()))
                }
            }
            _ => Err(self.error_here("expected a type definition")),
        }
    }

    fn parse_optional_range_clause(&mut self) -> Result<Option<(Expr, Expr)>, ParseError> {
        if !self.eat(TokenKind::KwRange) {
            return Ok(None);
        }
        let low = self.parse_expr()?;
        self.expect(TokenKind::DotDot)?;
        let high = self.parse_expr()?;
        Ok(Some((low, high)))
    }

    fn parse_array_type_def(&mut self) -> Result<TypeDef, ParseError> {
        self.expect(TokenKind::KwArray)?;
        self.expect(TokenKind::LParen)?;

        // Unconstrained: `array (Index range <>) of Component`.
        if self.peek_is_unconstrained_index() {
            let mut index_types = Vec::new();
            loop {
                let name = self.parse_path()?;
                self.expect(TokenKind::KwRange)?;
                self.expect(TokenKind::Box)?;
                index_types.push(TypeMark { span: name.span, name, constraint: None });
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RParen)?;
            self.expect(TokenKind::KwOf)?;
            let component = self.parse_type_mark()?;
            return Ok(TypeDef::UnconstrainedArray { index_types, component });
        }

        let mut indices = Vec::new();
        loop {
            indices.push(self.parse_discrete_range()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::KwOf)?;
        let component = self.parse_type_mark()?;
        Ok(TypeDef::Array { indices, component })
    }

    /// One token of extra lookahead to tell `array (Positive range <>)`
    /// from `array (1 .. 10)`: scan forward for `range` immediately
    /// followed by `<>` before the next `)`/`,`.
    fn peek_is_unconstrained_index(&self) -> bool {
        let mut i = 0;
        loop {
            match self.peek_kind(i) {
                TokenKind::KwRange => return self.peek_kind(i + 1) == TokenKind::Box,
                TokenKind::Comma | TokenKind::RParen | TokenKind::Eof => return false,
                _ => i += 1,
            }
        }
    }

    fn parse_record_type_def(&mut self) -> Result<TypeDef, ParseError> {
        self.expect(TokenKind::KwRecord)?;
        let mut components = Vec::new();
        while !self.check(TokenKind::KwEnd) {
            components.push(self.parse_component_decl()?);
        }
        self.expect(TokenKind::KwEnd)?;
        self.expect(TokenKind::KwRecord)?;
        Ok(TypeDef::Record(components))
    }

    fn parse_component_decl(&mut self) -> Result<ComponentDecl, ParseError> {
        if self.check(TokenKind::KwCase) {
            return self.parse_variant_part_as_component();
        }
        let names = self.parse_identifier_list()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type_mark()?;
        let default = if self.eat(TokenKind::Assign) { Some(self.parse_expr()?) } else { None };
        self.expect(TokenKind::Semicolon)?;
        Ok(ComponentDecl { names, ty, default, variant: None })
    }

    /// `case Discriminant is when Choice => components... end case;`
    fn parse_variant_part_as_component(&mut self) -> Result<ComponentDecl, ParseError> {
        let start = self.current_span();
        self.expect(TokenKind::KwCase)?;
        let discriminant = self.expect_identifier()?;
        self.expect(TokenKind::KwIs)?;
        let mut variants = Vec::new();
        while self.eat(TokenKind::KwWhen) {
            let choices = self.parse_choice_list()?;
            self.expect(TokenKind::Arrow)?;
            let mut comps = Vec::new();
            while !self.check(TokenKind::KwWhen) && !self.check(TokenKind::KwEnd) {
                comps.push(self.parse_component_decl()?);
            }
            variants.push((choices, comps));
        }
        self.expect(TokenKind::KwEnd)?;
        self.expect(TokenKind::KwCase)?;
        let semi = self.expect(TokenKind::Semicolon)?;
        let span = start.merge(semi.span);
        Ok(ComponentDecl {
            names: Vec::new(),
            ty: TypeMark { name: Path::single(discriminant, span), constraint: None, span },
            default: None,
            variant: Some(VariantPart { discriminant, variants, span }),
        })
    }

    fn parse_entry_spec(&mut self) -> Result<EntrySpec, ParseError> {
        let start = self.current_span();
        self.expect(TokenKind::KwEntry)?;
        let name = self.expect_identifier()?;
        let index = if self.eat(TokenKind::LParen) {
            let range = self.parse_discrete_range()?;
            self.expect(TokenKind::RParen)?;
            Some(range)
        } else {
            None
        };
        let params = self.parse_optional_param_list()?;
        let semi = self.expect(TokenKind::Semicolon)?;
        Ok(EntrySpec { name, index, params, span: start.merge(semi.span) })
    }

    fn parse_subtype_decl(&mut self) -> Result<Decl, ParseError> {
        let start = self.current_span();
        self.expect(TokenKind::KwSubtype)?;
        let name = self.expect_identifier()?;
        self.expect(TokenKind::KwIs)?;
        let base = self.parse_type_mark()?;
        let semi = self.expect(TokenKind::Semicolon)?;
        Ok(Decl::Subtype(SubtypeDecl { name, base, span: start.merge(semi.span) }))
    }

    pub(crate) fn parse_type_mark(&mut self) -> Result<TypeMark, ParseError> {
        let start = self.current_span();
        let name = self.parse_path()?;
        let constraint = self.parse_optional_constraint()?;
        let span = start.merge(self.prev_span());
        Ok(TypeMark { name, constraint, span })
    }

    fn parse_optional_constraint(&mut self) -> Result<Option<Constraint>, ParseError> {
        match self.kind() {
            TokenKind::KwRange => {
                self.advance();
                let low = self.parse_expr()?;
                self.expect(TokenKind::DotDot)?;
                let high = self.parse_expr()?;
                Ok(Some(Constraint::Range(low, high)))
            }
            TokenKind::KwDigits => {
                self.advance();
                let digits = self.parse_expr()?;
                let range = self.parse_optional_range_clause()?;
                Ok(Some(Constraint::Digits(digits, range)))
            }
            TokenKind::KwDelta => {
                self.advance();
                let delta = self.parse_expr()?;
                let range = self.parse_optional_range_clause()?;
                Ok(Some(Constraint::Delta(delta, range)))
            }
            TokenKind::LParen => {
                self.advance();
                let mut ranges = vec![self.parse_discrete_range()?];
                while self.eat(TokenKind::Comma) {
                    ranges.push(self.parse_discrete_range()?);
                }
                self.expect(TokenKind::RParen)?;
                Ok(Some(Constraint::Index(ranges)))
            }
            _ => Ok(None),
        }
    }

    pub(crate) fn parse_discrete_range(&mut self) -> Result<DiscreteRange, ParseError> {
        let checkpoint = self.pos_for_backtrack();
        if let Ok(mark) = self.try_parse_discrete_subtype_mark() {
            return Ok(DiscreteRange::Subtype(mark));
        }
        self.reset_pos(checkpoint);
        let low = self.parse_expr()?;
        self.expect(TokenKind::DotDot)?;
        let high = self.parse_expr()?;
        Ok(DiscreteRange::Range(low, high))
    }

    /// A discrete range that is just a (possibly constrained) subtype
    /// name, e.g. `Positive` or `Color`, as opposed to `1 .. N`. Tried
    /// first and rolled back on failure since both start with a name.
    fn try_parse_discrete_subtype_mark(&mut self) -> Result<TypeMark, ParseError> {
        if !self.check(TokenKind::Identifier) {
            return Err(self.error_here("not a subtype mark"));
        }
        let mark = self.parse_type_mark()?;
        if matches!(self.kind(), TokenKind::Comma | TokenKind::RParen) {
            Ok(mark)
        } else {
            Err(self.error_here("not a subtype mark"))
        }
    }

    fn parse_identifier_list(&mut self) -> Result<Vec<adac_util::Symbol>, ParseError> {
        let mut names = vec![self.expect_identifier()?];
        while self.eat(TokenKind::Comma) {
            names.push(self.expect_identifier()?);
        }
        Ok(names)
    }

    // -- object declarations and renaming --------------------------------

    fn parse_object_or_renaming_decl(&mut self) -> Result<Decl, ParseError> {
        let start = self.current_span();
        let names = self.parse_identifier_list()?;
        self.expect(TokenKind::Colon)?;

        // `Name_List : exception;` - shares its leading
        // `name_list :` with an object declaration, so it's only told
        // apart here rather than by `parse_decl`'s first-token dispatch.
        if self.eat(TokenKind::KwException) {
            let semi = self.expect(TokenKind::Semicolon)?;
            return Ok(Decl::Exception(ExceptionDecl { names, span: start.merge(semi.span) }));
        }

        let constant = self.eat(TokenKind::KwConstant);
        let ty = self.parse_type_mark()?;

        if self.eat(TokenKind::KwRenames) {
            let renamed = self.parse_expr()?;
            let semi = self.expect(TokenKind::Semicolon)?;
            // Ada allows only a single name on an object-renaming
            // declaration; the resolver rejects more than one.
            let name = names[0];
            return Ok(Decl::Renaming(RenamingDecl {
                name,
                ty: Some(ty),
                renamed,
                span: start.merge(semi.span),
            }));
        }

        let init = if self.eat(TokenKind::Assign) { Some(self.parse_expr()?) } else { None };
        let semi = self.expect(TokenKind::Semicolon)?;
        Ok(Decl::Object(ObjectDecl { names, constant, ty, init, span: start.merge(semi.span) }))
    }

    // -- subprogram declarations ------------------------------------------

    pub(crate) fn parse_subprogram_spec(&mut self) -> Result<SubprogramSpec, ParseError> {
        let start = self.current_span();
        let kind = if self.eat(TokenKind::KwProcedure) {
            SubprogramKind::Procedure
        } else {
            self.expect(TokenKind::KwFunction)?;
            SubprogramKind::Function
        };
        let name = self.expect_identifier()?;
        let params = self.parse_optional_param_list()?;
        let return_type = if kind == SubprogramKind::Function {
            self.expect(TokenKind::KwReturn)?;
            Some(self.parse_type_mark()?)
        } else {
            None
        };
        let span = start.merge(self.prev_span());
        Ok(SubprogramSpec { kind, name, params, return_type, span })
    }

    fn parse_optional_param_list(&mut self) -> Result<Vec<ParamSpec>, ParseError> {
        if !self.eat(TokenKind::LParen) {
            return Ok(Vec::new());
        }
        let mut params = Vec::new();
        loop {
            params.push(self.parse_param_spec()?);
            if !self.eat(TokenKind::Semicolon) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(params)
    }

    fn parse_param_spec(&mut self) -> Result<ParamSpec, ParseError> {
        let start = self.current_span();
        let names = self.parse_identifier_list()?;
        self.expect(TokenKind::Colon)?;
        let mode = self.parse_param_mode();
        let ty = self.parse_type_mark()?;
        let default = if self.eat(TokenKind::Assign) { Some(self.parse_expr()?) } else { None };
        let span = start.merge(self.prev_span());
        Ok(ParamSpec { names, mode, ty, default, span })
    }

    fn parse_param_mode(&mut self) -> ParamMode {
        if self.eat(TokenKind::KwIn) {
            if self.eat(TokenKind::KwOut) {
                ParamMode::InOut
            } else {
                ParamMode::In
            }
        } else if self.eat(TokenKind::KwOut) {
            ParamMode::Out
        } else {
            ParamMode::In
        }
    }

    /// Dispatches on what follows a subprogram spec: `;` for a bare
    /// spec, `is new ...` for a generic instantiation, `renames` for a
    /// renaming declaration, or a declarative part + `begin` for a
    /// full body.
    fn parse_subprogram_decl(&mut self) -> Result<Decl, ParseError> {
        let start = self.current_span();
        let spec = self.parse_subprogram_spec()?;

        if self.check(TokenKind::Semicolon) {
            self.advance();
            return Ok(Decl::Subprogram(SubprogramDecl::Spec(spec)));
        }

        if self.eat(TokenKind::KwRenames) {
            let renamed = self.parse_expr()?;
            let semi = self.expect(TokenKind::Semicolon)?;
            return Ok(Decl::Renaming(RenamingDecl {
                name: spec.name,
                ty: None,
                renamed,
                span: start.merge(semi.span),
            }));
        }

        self.expect(TokenKind::KwIs)?;

        if self.eat(TokenKind::KwNew) {
            let generic_name = self.parse_path()?;
            let actuals = self.parse_optional_actual_list()?;
            let semi = self.expect(TokenKind::Semicolon)?;
            return Ok(Decl::Instantiation(InstantiationDecl {
                kind: spec.kind,
                name: spec.name,
                generic_name,
                actuals,
                span: start.merge(semi.span),
            }));
        }

        let body = self.parse_subprogram_body_from_spec(spec, start)?;
        Ok(Decl::Subprogram(SubprogramDecl::Body(body)))
    }

    fn parse_optional_actual_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        if !self.eat(TokenKind::LParen) {
            return Ok(Vec::new());
        }
        let mut actuals = vec![self.parse_expr()?];
        while self.eat(TokenKind::Comma) {
            actuals.push(self.parse_expr()?);
        }
        self.expect(TokenKind::RParen)?;
        Ok(actuals)
    }

    /// Parses a whole `procedure ... is ... begin ... end ...;` body
    /// starting fresh (used for the top-level compilation unit).
    pub(crate) fn parse_subprogram_body(&mut self) -> Result<SubprogramBody, ParseError> {
        let start = self.current_span();
        let spec = self.parse_subprogram_spec()?;
        self.expect(TokenKind::KwIs)?;
        self.parse_subprogram_body_from_spec(spec, start)
    }

    fn parse_subprogram_body_from_spec(
        &mut self,
        spec: SubprogramSpec,
        start: adac_util::Span,
    ) -> Result<SubprogramBody, ParseError> {
        let decls = self.parse_decl_list(&[TokenKind::KwBegin])?;
        self.expect(TokenKind::KwBegin)?;
        let stmts = self.parse_stmt_list(&[TokenKind::KwException, TokenKind::KwEnd])?;
        let handlers = self.parse_exception_handlers()?;
        self.expect(TokenKind::KwEnd)?;
        self.parse_optional_end_designator()?;
        let semi = self.expect(TokenKind::Semicolon)?;
        Ok(SubprogramBody { spec, decls, stmts, handlers, span: start.merge(semi.span) })
    }

    pub(crate) fn parse_exception_handlers(&mut self) -> Result<Vec<ExceptionHandler>, ParseError> {
        if !self.eat(TokenKind::KwException) {
            return Ok(Vec::new());
        }
        let mut handlers = Vec::new();
        while self.eat(TokenKind::KwWhen) {
            let start = self.prev_span();
            let choices = self.parse_choice_list()?;
            self.expect(TokenKind::Arrow)?;
            let stmts = self.parse_stmt_list(&[TokenKind::KwWhen, TokenKind::KwEnd])?;
            let span = start.merge(self.prev_span());
            handlers.push(ExceptionHandler { choices, stmts, span });
        }
        Ok(handlers)
    }

    // -- generics -----------------------------------------------------

    fn parse_generic_decl(&mut self) -> Result<Decl, ParseError> {
        let start = self.current_span();
        self.expect(TokenKind::KwGeneric)?;
        let mut formals = Vec::new();
        while !matches!(
            self.kind(),
            TokenKind::KwProcedure | TokenKind::KwFunction | TokenKind::KwPackage
        ) {
            formals.push(self.parse_generic_formal()?);
        }
        let spec = Box::new(self.parse_decl()?);
        let span = start.merge(self.prev_span());
        Ok(Decl::Generic(GenericDecl { formals, spec, span }))
    }

    fn parse_generic_formal(&mut self) -> Result<GenericFormal, ParseError> {
        match self.kind() {
            TokenKind::KwType => {
                self.advance();
                let name = self.expect_identifier()?;
                // `(<>)` indiscriminate formal - accepted and ignored
                // beyond recognizing the formal is unconstrained.
                if self.eat(TokenKind::LParen) {
                    self.expect(TokenKind::Box)?;
                    self.expect(TokenKind::RParen)?;
                }
                self.expect(TokenKind::KwIs)?;
                self.expect(TokenKind::KwPrivate)?;
                self.expect(TokenKind::Semicolon)?;
                Ok(GenericFormal::Type(name))
            }
            TokenKind::KwProcedure | TokenKind::KwFunction => {
                let spec = self.parse_subprogram_spec()?;
                let default = if self.eat(TokenKind::KwIs) { Some(self.parse_path()?) } else { None };
                self.expect(TokenKind::Semicolon)?;
                Ok(GenericFormal::Subprogram { spec, default })
            }
            TokenKind::Identifier => {
                let names = self.parse_identifier_list()?;
                self.expect(TokenKind::Colon)?;
                let mode = self.parse_param_mode();
                let ty = self.parse_type_mark()?;
                let default = if self.eat(TokenKind::Assign) { Some(self.parse_expr()?) } else { None };
                self.expect(TokenKind::Semicolon)?;
                // Only the first name becomes a distinct formal; Ada's
                // `generic_formal_parameter_declaration` takes one
                // defining identifier, the parser is lenient about the
                // list form for symmetry with object decls.
                Ok(GenericFormal::Object { name: names[0], ty, mode, default })
            }
            _ => Err(self.error_here("expected a generic formal parameter")),
        }
    }

    // -- pragmas, representation clauses --------------------------------

    pub(crate) fn parse_pragma(&mut self) -> Result<Pragma, ParseError> {
        let start = self.current_span();
        self.expect(TokenKind::KwPragma)?;
        let name = self.expect_identifier()?;
        let mut args = Vec::new();
        if self.eat(TokenKind::LParen) {
            args.push(self.parse_expr()?);
            while self.eat(TokenKind::Comma) {
                args.push(self.parse_expr()?);
            }
            self.expect(TokenKind::RParen)?;
        }
        let semi = self.expect(TokenKind::Semicolon)?;
        Ok(Pragma { name, args, span: start.merge(semi.span) })
    }

    /// `for Entity'Attribute use Expr;` or `for Entity use record ... end record;`
    fn parse_representation_clause(&mut self) -> Result<Decl, ParseError> {
        let start = self.current_span();
        self.expect(TokenKind::KwFor)?;
        let entity = self.parse_path()?;

        // Record representation clauses name no attribute (`for R use
        // record ... end record;`); attribute definition clauses do
        // (`for R'Size use 32;`).
        let attribute = if self.eat(TokenKind::Tick) { Some(self.expect_identifier()?) } else { None };
        self.expect(TokenKind::KwUse)?;

        if self.eat(TokenKind::KwRecord) {
            let mut components = Vec::new();
            while !self.check(TokenKind::KwEnd) {
                let name = self.expect_identifier()?;
                self.expect(TokenKind::KwAt)?;
                let offset = self.parse_expr()?;
                self.expect(TokenKind::KwRange)?;
                let size = self.parse_expr()?;
                self.expect(TokenKind::Semicolon)?;
                components.push((name, offset, size));
            }
            self.expect(TokenKind::KwEnd)?;
            self.expect(TokenKind::KwRecord)?;
            let semi = self.expect(TokenKind::Semicolon)?;
            return Ok(Decl::Representation(RepresentationClause::Record {
                entity,
                components,
                span: start.merge(semi.span),
            }));
        }

        let attribute = attribute.ok_or_else(|| {
            ParseError::Other("representation clause needs an attribute (e.g. 'Size)".into(), self.current_span())
        })?;
        let value = self.parse_expr()?;
        let semi = self.expect(TokenKind::Semicolon)?;
        Ok(Decl::Representation(RepresentationClause::Attribute {
            entity,
            attribute,
            value,
            span: start.merge(semi.span),
        }))
    }
}
