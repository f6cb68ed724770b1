//! Statement parsing (spec.md §4.2): assignment, procedure call, if,
//! case, loop (simple/while/for), exit, return, goto, block, raise,
//! null, delay, abort, accept, select.

use adac_lex::TokenKind;
use adac_util::Symbol;

use crate::ast::*;
use crate::{ParseError, Parser};

impl<'src, 'h> Parser<'src, 'h> {
    pub(crate) fn parse_stmt_list(&mut self, stop: &[TokenKind]) -> Result<Vec<Stmt>, ParseError> {
        let mut stmts = Vec::new();
        while !stop.contains(&self.kind()) && !self.at_end() {
            stmts.push(self.parse_stmt()?);
        }
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        // A label declaration, `<<Name>>`, may prefix any statement;
        // the parser records it and keeps parsing the statement that
        // follows rather than producing a separate empty statement.
        if self.check(TokenKind::LabelOpen) {
            return self.parse_label_then_stmt();
        }

        match self.kind() {
            TokenKind::KwNull => {
                let span = self.current_span();
                self.advance();
                let semi = self.expect(TokenKind::Semicolon)?;
                Ok(Stmt::Null(span.merge(semi.span)))
            }
            TokenKind::KwIf => self.parse_if_stmt(),
            TokenKind::KwCase => self.parse_case_stmt(),
            TokenKind::KwLoop | TokenKind::KwWhile | TokenKind::KwFor => self.parse_loop_stmt(None),
            TokenKind::KwExit => self.parse_exit_stmt(),
            TokenKind::KwReturn => self.parse_return_stmt(),
            TokenKind::KwGoto => self.parse_goto_stmt(),
            TokenKind::KwDeclare | TokenKind::KwBegin => self.parse_block_stmt(None),
            TokenKind::KwRaise => self.parse_raise_stmt(),
            TokenKind::KwDelay => self.parse_delay_stmt(),
            TokenKind::KwAbort => self.parse_abort_stmt(),
            TokenKind::KwAccept => self.parse_accept_stmt(),
            TokenKind::KwSelect => self.parse_select_stmt(),
            TokenKind::KwPragma => self.parse_pragma().map(|p| {
                // Statement-position pragmas carry no dedicated `Stmt`
                // variant; the resolver treats them as no-ops it can
                // still validate the name/arity of.
                Stmt::Null(p.span)
            }),
            _ => self.parse_call_or_assign_stmt(),
        }
    }

    fn error_here(&mut self, message: impl Into<String>) -> ParseError {
        ParseError::Other(message.into(), self.current_span())
    }

    /// `Label: <statement>` where `<statement>` is a loop or a block -
    /// the only statement forms a label legally precedes in Ada.
    fn parse_label_then_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        self.expect(TokenKind::LabelOpen)?;
        let name = self.expect_identifier()?;
        self.expect(TokenKind::LabelClose)?;

        match self.kind() {
            TokenKind::KwLoop | TokenKind::KwWhile | TokenKind::KwFor => {
                let stmt = self.parse_loop_stmt(Some(name))?;
                Ok(stmt)
            }
            TokenKind::KwDeclare | TokenKind::KwBegin => self.parse_block_stmt(Some(name)),
            _ => {
                let _ = start;
                Ok(Stmt::Label(name, self.prev_span()))
            }
        }
    }

    fn parse_if_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        self.expect(TokenKind::KwIf)?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::KwThen)?;
        let then_stmts = self.parse_stmt_list(&[TokenKind::KwElsif, TokenKind::KwElse, TokenKind::KwEnd])?;

        let mut elsifs = Vec::new();
        while self.eat(TokenKind::KwElsif) {
            let elsif_cond = self.parse_expr()?;
            self.expect(TokenKind::KwThen)?;
            let elsif_stmts =
                self.parse_stmt_list(&[TokenKind::KwElsif, TokenKind::KwElse, TokenKind::KwEnd])?;
            elsifs.push((elsif_cond, elsif_stmts));
        }

        let else_stmts = if self.eat(TokenKind::KwElse) {
            Some(self.parse_stmt_list(&[TokenKind::KwEnd])?)
        } else {
            None
        };

        self.expect(TokenKind::KwEnd)?;
        self.expect(TokenKind::KwIf)?;
        let semi = self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::If(IfStmt { cond, then_stmts, elsifs, else_stmts, span: start.merge(semi.span) }))
    }

    fn parse_case_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        self.expect(TokenKind::KwCase)?;
        let selector = self.parse_expr()?;
        self.expect(TokenKind::KwIs)?;

        let mut alternatives = Vec::new();
        while self.eat(TokenKind::KwWhen) {
            let choices = self.parse_choice_list()?;
            self.expect(TokenKind::Arrow)?;
            let stmts = self.parse_stmt_list(&[TokenKind::KwWhen, TokenKind::KwEnd])?;
            alternatives.push(CaseAlt { choices, stmts });
        }

        self.expect(TokenKind::KwEnd)?;
        self.expect(TokenKind::KwCase)?;
        let semi = self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Case(CaseStmt { selector, alternatives, span: start.merge(semi.span) }))
    }

    pub(crate) fn parse_choice_list(&mut self) -> Result<Vec<Choice>, ParseError> {
        let mut choices = vec![self.parse_choice()?];
        while self.eat(TokenKind::Bar) {
            choices.push(self.parse_choice()?);
        }
        Ok(choices)
    }

    fn parse_choice(&mut self) -> Result<Choice, ParseError> {
        if self.eat(TokenKind::KwOthers) {
            return Ok(Choice::Others);
        }
        let expr = self.parse_expr()?;
        if self.eat(TokenKind::DotDot) {
            let high = self.parse_expr()?;
            return Ok(Choice::Range(expr, high));
        }
        Ok(Choice::Expr(expr))
    }

    fn parse_loop_stmt(&mut self, label: Option<Symbol>) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        let scheme = match self.kind() {
            TokenKind::KwWhile => {
                self.advance();
                Some(IterationScheme::While(self.parse_expr()?))
            }
            TokenKind::KwFor => {
                self.advance();
                let var = self.expect_identifier()?;
                self.expect(TokenKind::KwIn)?;
                let reverse = self.eat(TokenKind::KwReverse);
                let range = self.parse_discrete_range()?;
                Some(IterationScheme::For { var, reverse, range })
            }
            _ => None,
        };
        self.expect(TokenKind::KwLoop)?;
        let stmts = self.parse_stmt_list(&[TokenKind::KwEnd])?;
        self.expect(TokenKind::KwEnd)?;
        self.expect(TokenKind::KwLoop)?;
        self.parse_optional_end_designator()?;
        let semi = self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Loop(LoopStmt { label, scheme, stmts, span: start.merge(semi.span) }))
    }

    fn parse_exit_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        self.expect(TokenKind::KwExit)?;
        let label = if self.check(TokenKind::Identifier) { Some(self.expect_identifier()?) } else { None };
        let condition = if self.eat(TokenKind::KwWhen) { Some(self.parse_expr()?) } else { None };
        let semi = self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Exit { label, condition, span: start.merge(semi.span) })
    }

    fn parse_return_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        self.expect(TokenKind::KwReturn)?;
        let value = if self.check(TokenKind::Semicolon) { None } else { Some(self.parse_expr()?) };
        let semi = self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Return { value, span: start.merge(semi.span) })
    }

    fn parse_goto_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        self.expect(TokenKind::KwGoto)?;
        let label = self.expect_identifier()?;
        let semi = self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Goto { label, span: start.merge(semi.span) })
    }

    fn parse_block_stmt(&mut self, label: Option<Symbol>) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        let decls = if self.eat(TokenKind::KwDeclare) {
            self.parse_decl_list(&[TokenKind::KwBegin])?
        } else {
            Vec::new()
        };
        self.expect(TokenKind::KwBegin)?;
        let stmts = self.parse_stmt_list(&[TokenKind::KwException, TokenKind::KwEnd])?;
        let handlers = self.parse_exception_handlers()?;
        self.expect(TokenKind::KwEnd)?;
        self.parse_optional_end_designator()?;
        let semi = self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Block(BlockStmt { label, decls, stmts, handlers, span: start.merge(semi.span) }))
    }

    fn parse_raise_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        self.expect(TokenKind::KwRaise)?;
        let exception = if self.check(TokenKind::Semicolon) { None } else { Some(self.parse_path()?) };
        let semi = self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Raise { exception, span: start.merge(semi.span) })
    }

    fn parse_delay_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        self.expect(TokenKind::KwDelay)?;
        let expr = self.parse_expr()?;
        let semi = self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Delay { expr, span: start.merge(semi.span) })
    }

    fn parse_abort_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        self.expect(TokenKind::KwAbort)?;
        let mut names = vec![self.parse_path()?];
        while self.eat(TokenKind::Comma) {
            names.push(self.parse_path()?);
        }
        let semi = self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Abort { names, span: start.merge(semi.span) })
    }

    pub(crate) fn parse_accept_stmt(&mut self) -> Result<AcceptStmt, ParseError> {
        let start = self.current_span();
        self.expect(TokenKind::KwAccept)?;
        let entry = self.expect_identifier()?;
        let index = if self.eat(TokenKind::LParen) {
            let e = self.parse_expr()?;
            self.expect(TokenKind::RParen)?;
            Some(e)
        } else {
            None
        };
        let params = self.parse_optional_accept_params()?;
        let stmts = if self.eat(TokenKind::KwDo) {
            let body = self.parse_stmt_list(&[TokenKind::KwEnd])?;
            self.expect(TokenKind::KwEnd)?;
            self.parse_optional_end_designator()?;
            Some(body)
        } else {
            None
        };
        let semi = self.expect(TokenKind::Semicolon)?;
        Ok(AcceptStmt { entry, index, params, stmts, span: start.merge(semi.span) })
    }

    fn parse_optional_accept_params(&mut self) -> Result<Vec<ParamSpec>, ParseError> {
        if !self.eat(TokenKind::LParen) {
            return Ok(Vec::new());
        }
        let mut params = Vec::new();
        loop {
            params.push(self.parse_accept_param_spec()?);
            if !self.eat(TokenKind::Semicolon) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(params)
    }

    fn parse_accept_param_spec(&mut self) -> Result<ParamSpec, ParseError> {
        let start = self.current_span();
        let mut names = vec![self.expect_identifier()?];
        while self.eat(TokenKind::Comma) {
            names.push(self.expect_identifier()?);
        }
        self.expect(TokenKind::Colon)?;
        let mode = if self.eat(TokenKind::KwIn) {
            if self.eat(TokenKind::KwOut) { ParamMode::InOut } else { ParamMode::In }
        } else if self.eat(TokenKind::KwOut) {
            ParamMode::Out
        } else {
            ParamMode::In
        };
        let ty = self.parse_type_mark()?;
        let span = start.merge(self.prev_span());
        Ok(ParamSpec { names, mode, ty, default: None, span })
    }

    fn parse_select_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        self.expect(TokenKind::KwSelect)?;

        let mut arms = vec![self.parse_select_arm()?];
        while self.eat(TokenKind::KwOr) {
            arms.push(self.parse_select_arm()?);
        }

        let else_stmts = if self.eat(TokenKind::KwElse) {
            Some(self.parse_stmt_list(&[TokenKind::KwEnd])?)
        } else {
            None
        };

        self.expect(TokenKind::KwEnd)?;
        self.expect(TokenKind::KwSelect)?;
        let semi = self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Select(SelectStmt { arms, else_stmts, span: start.merge(semi.span) }))
    }

    fn parse_select_arm(&mut self) -> Result<SelectArm, ParseError> {
        let guard = if self.eat(TokenKind::KwWhen) {
            let cond = self.parse_expr()?;
            self.expect(TokenKind::Arrow)?;
            Some(cond)
        } else {
            None
        };
        let accept = self.parse_accept_stmt()?;
        let stmts = self.parse_stmt_list(&[TokenKind::KwOr, TokenKind::KwElse, TokenKind::KwEnd])?;
        Ok(SelectArm { guard, accept, stmts })
    }

    /// Everything that isn't one of the reserved-word-led statement
    /// forms starts with a name: either a procedure call (`P(args);`,
    /// `P;`) or the target of an assignment (`X := Expr;`).
    fn parse_call_or_assign_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        let target = self.parse_expr()?;

        if self.eat(TokenKind::Assign) {
            let value = self.parse_expr()?;
            let semi = self.expect(TokenKind::Semicolon)?;
            return Ok(Stmt::Assign { target, value, span: start.merge(semi.span) });
        }

        let semi = self.expect(TokenKind::Semicolon)?;
        let span = start.merge(semi.span);
        match target.kind {
            ExprKind::Name(name) => Ok(Stmt::Call(CallStmt { name, args: Vec::new(), span })),
            ExprKind::Call { callee, args } => match callee.kind {
                ExprKind::Name(name) => Ok(Stmt::Call(CallStmt { name, args, span })),
                _ => Err(self.error_here("procedure call must name a procedure")),
            },
            _ => Err(self.error_here("expected a procedure call or assignment")),
        }
    }
}
