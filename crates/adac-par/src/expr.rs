//! Expression parsing (LRM 4.4-4.6): precedence climbing over a fixed
//! ladder of non-terminals rather than a binding-power table, since
//! Ada 83 groups operators into named precedence levels (logical,
//! relational, adding, multiplying, unary, exponentiation) instead of
//! a uniform operator set a Pratt table would suit better.
//!
//! ```text
//! expression  -> relation   {("and" ["then"] | "or" ["else"] | "xor") relation}
//! relation    -> simple     [relational_op simple | ["not"] "in" range_or_mark | ".." simple]
//! simple      -> ["+" | "-"] term {("+" | "-" | "&") term}
//! term        -> factor {("*" | "/" | "mod" | "rem") factor}
//! factor      -> "abs" postfix | "not" postfix | postfix ["**" postfix]
//! postfix     -> primary {"." ident | "'" (attribute | "(" expr ")") | "(" args ")"}
//! primary     -> literal | "null" | name | "(" expr_or_aggregate ")" | "new" ...
//! ```
//!
//! Ranges (`Low .. High`) are folded into `relation` rather than given
//! their own non-terminal: the grammar only needs them after a `..`
//! that can appear in a discrete range, a case choice, or a membership
//! test, and `ExprKind::Range` already lets every other caller treat a
//! range as an ordinary (if context-restricted) expression.

use adac_lex::{TokenKind, TokenPayload};

use crate::ast::*;
use crate::{ParseError, Parser};

impl<'src, 'h> Parser<'src, 'h> {
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_relation()?;
        loop {
            let op = match self.kind() {
                TokenKind::KwAnd => {
                    self.advance();
                    if self.eat(TokenKind::KwThen) { BinOp::AndThen } else { BinOp::And }
                }
                TokenKind::KwOr => {
                    self.advance();
                    if self.eat(TokenKind::KwElse) { BinOp::OrElse } else { BinOp::Or }
                }
                TokenKind::KwXor => {
                    self.advance();
                    BinOp::Xor
                }
                _ => break,
            };
            let right = self.parse_relation()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) },
                span,
                self.next_node_id(),
            );
        }
        Ok(left)
    }

    fn error_here(&mut self, message: impl Into<String>) -> ParseError {
        ParseError::Other(message.into(), self.current_span())
    }

    fn parse_relation(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_simple_expression()?;

        if let Some(op) = self.try_relational_op() {
            let right = self.parse_simple_expression()?;
            let span = expr.span.merge(right.span);
            return Ok(Expr::new(
                ExprKind::Binary { op, left: Box::new(expr), right: Box::new(right) },
                span,
                self.next_node_id(),
            ));
        }

        if self.check(TokenKind::KwIn) || (self.check(TokenKind::KwNot) && self.peek_kind(1) == TokenKind::KwIn) {
            let not = self.eat(TokenKind::KwNot);
            self.expect(TokenKind::KwIn)?;
            let range = self.parse_membership_range()?;
            let span = expr.span.merge(self.prev_span());
            return Ok(Expr::new(
                ExprKind::Membership { expr: Box::new(expr), not, range },
                span,
                self.next_node_id(),
            ));
        }

        if self.eat(TokenKind::DotDot) {
            let high = self.parse_simple_expression()?;
            let span = expr.span.merge(high.span);
            return Ok(Expr::new(ExprKind::Range(Box::new(expr), Box::new(high)), span, self.next_node_id()));
        }

        Ok(expr)
    }

    fn try_relational_op(&mut self) -> Option<BinOp> {
        let op = match self.kind() {
            TokenKind::Equal => BinOp::Eq,
            TokenKind::NotEqual => BinOp::Ne,
            TokenKind::Less => BinOp::Lt,
            TokenKind::LessEqual => BinOp::Le,
            TokenKind::Greater => BinOp::Gt,
            TokenKind::GreaterEqual => BinOp::Ge,
            _ => return None,
        };
        self.advance();
        Some(op)
    }

    /// `range` or `subtype_mark` on the right of `in`/`not in`. Both
    /// alternatives start with a name when the range's low bound
    /// happens to be one (`X in A .. B`), so a bare subtype mark is
    /// tried first and rolled back if a `..` turns up after all - the
    /// same checkpoint idiom `parse_discrete_range` uses.
    fn parse_membership_range(&mut self) -> Result<MembershipRange, ParseError> {
        if self.check(TokenKind::Identifier) {
            let checkpoint = self.pos_for_backtrack();
            if let Ok(mark) = self.try_parse_membership_type_mark() {
                return Ok(MembershipRange::TypeMark(mark));
            }
            self.reset_pos(checkpoint);
        }
        let low = self.parse_simple_expression()?;
        self.expect(TokenKind::DotDot)?;
        let high = self.parse_simple_expression()?;
        Ok(MembershipRange::Range(Box::new(low), Box::new(high)))
    }

    fn try_parse_membership_type_mark(&mut self) -> Result<TypeMark, ParseError> {
        let mark = self.parse_type_mark()?;
        if self.check(TokenKind::DotDot) {
            Err(self.error_here("not a subtype mark"))
        } else {
            Ok(mark)
        }
    }

    fn parse_simple_expression(&mut self) -> Result<Expr, ParseError> {
        let mut expr = match self.kind() {
            TokenKind::Minus => {
                let tok = self.advance();
                let operand = self.parse_term()?;
                let span = tok.span.merge(operand.span);
                Expr::new(ExprKind::Unary { op: UnOp::Neg, operand: Box::new(operand) }, span, self.next_node_id())
            }
            TokenKind::Plus => {
                let tok = self.advance();
                let operand = self.parse_term()?;
                let span = tok.span.merge(operand.span);
                Expr::new(ExprKind::Unary { op: UnOp::Plus, operand: Box::new(operand) }, span, self.next_node_id())
            }
            _ => self.parse_term()?,
        };

        loop {
            let op = match self.kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                TokenKind::Ampersand => BinOp::Concat,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            let span = expr.span.merge(right.span);
            expr = Expr::new(
                ExprKind::Binary { op, left: Box::new(expr), right: Box::new(right) },
                span,
                self.next_node_id(),
            );
        }
        Ok(expr)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_factor()?;
        loop {
            let op = match self.kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::KwMod => BinOp::Mod,
                TokenKind::KwRem => BinOp::Rem,
                _ => break,
            };
            self.advance();
            let right = self.parse_factor()?;
            let span = expr.span.merge(right.span);
            expr = Expr::new(
                ExprKind::Binary { op, left: Box::new(expr), right: Box::new(right) },
                span,
                self.next_node_id(),
            );
        }
        Ok(expr)
    }

    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        match self.kind() {
            TokenKind::KwAbs => {
                let tok = self.advance();
                let operand = self.parse_postfix()?;
                let span = tok.span.merge(operand.span);
                Ok(Expr::new(ExprKind::Unary { op: UnOp::Abs, operand: Box::new(operand) }, span, self.next_node_id()))
            }
            TokenKind::KwNot => {
                let tok = self.advance();
                let operand = self.parse_postfix()?;
                let span = tok.span.merge(operand.span);
                Ok(Expr::new(ExprKind::Unary { op: UnOp::Not, operand: Box::new(operand) }, span, self.next_node_id()))
            }
            _ => {
                let base = self.parse_postfix()?;
                if self.eat(TokenKind::StarStar) {
                    let exp = self.parse_postfix()?;
                    let span = base.span.merge(exp.span);
                    Ok(Expr::new(
                        ExprKind::Binary { op: BinOp::Pow, left: Box::new(base), right: Box::new(exp) },
                        span,
                        self.next_node_id(),
                    ))
                } else {
                    Ok(base)
                }
            }
        }
    }

    /// Selectors, attributes, qualified expressions, and calls/indexing
    /// all chain onto a primary the same way, so they share one loop
    /// rather than one parse function per form.
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.kind() {
                TokenKind::Dot => {
                    self.advance();
                    let selector = self.expect_identifier()?;
                    let span = expr.span.merge(self.prev_span());
                    expr = Expr::new(
                        ExprKind::Selector { prefix: Box::new(expr), selector },
                        span,
                        self.next_node_id(),
                    );
                }
                TokenKind::Tick => {
                    self.advance();
                    if self.check(TokenKind::LParen) {
                        // `Type_Mark'(Expr)` - qualified expression.
                        self.advance();
                        let inner = self.parse_expr()?;
                        let close = self.expect(TokenKind::RParen)?;
                        let type_mark = self.expr_to_type_mark(&expr)?;
                        let span = expr.span.merge(close.span);
                        expr = Expr::new(
                            ExprKind::Qualified { type_mark, expr: Box::new(inner) },
                            span,
                            self.next_node_id(),
                        );
                    } else {
                        let attr = self.expect_identifier()?;
                        let args =
                            if self.check(TokenKind::LParen) { self.parse_expr_list_in_parens()? } else { Vec::new() };
                        let span = expr.span.merge(self.prev_span());
                        expr = Expr::new(
                            ExprKind::Attribute { prefix: Box::new(expr), attr, args },
                            span,
                            self.next_node_id(),
                        );
                    }
                }
                TokenKind::LParen => {
                    let args = self.parse_call_args()?;
                    let span = expr.span.merge(self.prev_span());
                    expr =
                        Expr::new(ExprKind::Call { callee: Box::new(expr), args }, span, self.next_node_id());
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// A call's prefix having already been parsed as an ordinary name,
    /// a qualified expression's prefix is recovered from it here -
    /// legal in practice since `T'(Expr)` only ever qualifies a plain
    /// type name, never a selected component or another call.
    fn expr_to_type_mark(&mut self, expr: &Expr) -> Result<TypeMark, ParseError> {
        match &expr.kind {
            ExprKind::Name(path) => Ok(TypeMark { name: path.clone(), constraint: None, span: expr.span }),
            _ => Err(ParseError::Other("qualified expression needs a type mark prefix".into(), expr.span)),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.kind() {
            TokenKind::IntLiteral => {
                let tok = self.advance();
                let lit = match tok.payload {
                    TokenPayload::Int(v) => Literal::Int(v),
                    TokenPayload::Based(v, base) => Literal::Based(v, base),
                    other => unreachable!("integer literal token with payload {other:?}"),
                };
                Ok(Expr::new(ExprKind::Literal(lit), tok.span, self.next_node_id()))
            }
            TokenKind::RealLiteral => {
                let tok = self.advance();
                let v = match tok.payload {
                    TokenPayload::Float(v) => v,
                    other => unreachable!("real literal token with payload {other:?}"),
                };
                Ok(Expr::new(ExprKind::Literal(Literal::Real(v)), tok.span, self.next_node_id()))
            }
            TokenKind::CharLiteral => {
                let tok = self.advance();
                let sym = match tok.payload {
                    TokenPayload::Str(s) => s,
                    other => unreachable!("char literal token with payload {other:?}"),
                };
                Ok(Expr::new(ExprKind::Literal(Literal::Char(sym)), tok.span, self.next_node_id()))
            }
            TokenKind::StringLiteral => {
                let tok = self.advance();
                let sym = match tok.payload {
                    TokenPayload::Str(s) => s,
                    other => unreachable!("string literal token with payload {other:?}"),
                };
                Ok(Expr::new(ExprKind::Literal(Literal::Str(sym)), tok.span, self.next_node_id()))
            }
            TokenKind::KwNull => {
                let tok = self.advance();
                Ok(Expr::new(ExprKind::Literal(Literal::Null), tok.span, self.next_node_id()))
            }
            TokenKind::LParen => self.parse_paren_expr_or_aggregate(),
            TokenKind::KwNew => self.parse_allocator(),
            TokenKind::Identifier => {
                let path = self.parse_path()?;
                let span = path.span;
                Ok(Expr::new(ExprKind::Name(path), span, self.next_node_id()))
            }
            _ => Err(self.error_here("expected an expression")),
        }
    }

    fn parse_allocator(&mut self) -> Result<Expr, ParseError> {
        let start = self.current_span();
        self.expect(TokenKind::KwNew)?;
        let type_mark = self.parse_type_mark()?;
        let init = if self.eat(TokenKind::Tick) {
            self.expect(TokenKind::LParen)?;
            let inner = self.parse_expr()?;
            self.expect(TokenKind::RParen)?;
            Some(Box::new(inner))
        } else {
            None
        };
        let span = start.merge(self.prev_span());
        Ok(Expr::new(ExprKind::Allocator { type_mark, init }, span, self.next_node_id()))
    }

    /// `(Expr)`, `(E1, E2, ...)`, `(Choices => E, ...)`, or a mix of
    /// the last two - parenthesized expression and aggregate share an
    /// opening paren, so both are parsed here and told apart by what's
    /// inside: a single bare element with no comma or `=>` collapses
    /// back to a plain parenthesized expression.
    fn parse_paren_expr_or_aggregate(&mut self) -> Result<Expr, ParseError> {
        let start = self.current_span();
        self.expect(TokenKind::LParen)?;

        let mut positional = Vec::new();
        let mut named = Vec::new();

        while !self.check(TokenKind::RParen) {
            let checkpoint = self.pos_for_backtrack();
            match self.try_parse_named_association()? {
                Some(entries) => named.extend(entries),
                None => {
                    self.reset_pos(checkpoint);
                    positional.push(self.parse_expr()?);
                }
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        let close = self.expect(TokenKind::RParen)?;
        let span = start.merge(close.span);

        if named.is_empty() && positional.len() == 1 {
            let mut inner = positional.remove(0);
            inner.span = span;
            return Ok(inner);
        }

        let kind = if named.is_empty() {
            ExprKind::Aggregate(Aggregate::Positional(positional))
        } else if positional.is_empty() {
            ExprKind::Aggregate(Aggregate::Named(named))
        } else {
            ExprKind::Aggregate(Aggregate::Mixed { positional, named })
        };
        Ok(Expr::new(kind, span, self.next_node_id()))
    }

    /// `Choice {| Choice} => Expr`, or `None` (with the cursor left
    /// wherever the failed attempt stopped - the caller always resets
    /// to its own checkpoint, not this function's).
    fn try_parse_named_association(&mut self) -> Result<Option<Vec<(Choice, Expr)>>, ParseError> {
        let choices = match self.parse_choice_list() {
            Ok(choices) => choices,
            Err(_) => return Ok(None),
        };
        if !self.eat(TokenKind::Arrow) {
            return Ok(None);
        }
        let value = if self.check(TokenKind::Box) {
            let tok = self.advance();
            Expr::new(ExprKind::Literal(Literal::Null), tok.span, self.next_node_id())
        } else {
            self.parse_expr()?
        };
        Ok(Some(choices.into_iter().map(|c| (c, value.clone())).collect()))
    }

    fn parse_call_args(&mut self) -> Result<Vec<Argument>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut args = vec![self.parse_argument()?];
        while self.eat(TokenKind::Comma) {
            args.push(self.parse_argument()?);
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }

    fn parse_argument(&mut self) -> Result<Argument, ParseError> {
        if self.check(TokenKind::Identifier) && self.peek_kind(1) == TokenKind::Arrow {
            let name = self.expect_identifier()?;
            self.advance();
            let value = self.parse_expr()?;
            return Ok(Argument { name: Some(name), value });
        }
        Ok(Argument { name: None, value: self.parse_expr()? })
    }

    fn parse_expr_list_in_parens(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut exprs = vec![self.parse_expr()?];
        while self.eat(TokenKind::Comma) {
            exprs.push(self.parse_expr()?);
        }
        self.expect(TokenKind::RParen)?;
        Ok(exprs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adac_util::Handler;

    fn parse_expr_src(src: &str) -> Expr {
        let mut handler = Handler::new();
        let mut parser = Parser::new(src, &mut handler);
        let expr = parser.parse_expr().expect("expression should parse");
        assert!(!handler.has_errors());
        expr
    }

    #[test]
    fn precedence_multiply_binds_tighter_than_add() {
        let expr = parse_expr_src("A + B * C");
        match expr.kind {
            ExprKind::Binary { op: BinOp::Add, right, .. } => {
                assert!(matches!(right.kind, ExprKind::Binary { op: BinOp::Mul, .. }));
            }
            other => panic!("expected Add at the top, got {other:?}"),
        }
    }

    #[test]
    fn additive_operators_are_left_associative() {
        let expr = parse_expr_src("A - B - C");
        match expr.kind {
            ExprKind::Binary { op: BinOp::Sub, left, .. } => {
                assert!(matches!(left.kind, ExprKind::Binary { op: BinOp::Sub, .. }));
            }
            other => panic!("expected Sub at the top, got {other:?}"),
        }
    }

    #[test]
    fn exponentiation_binds_tighter_than_unary_minus() {
        // LRM 4.5.6: `-A**B` is `-(A**B)`.
        let expr = parse_expr_src("-A ** B");
        match expr.kind {
            ExprKind::Unary { op: UnOp::Neg, operand } => {
                assert!(matches!(operand.kind, ExprKind::Binary { op: BinOp::Pow, .. }));
            }
            other => panic!("expected Neg at the top, got {other:?}"),
        }
    }

    #[test]
    fn and_then_short_circuit_is_its_own_operator() {
        let expr = parse_expr_src("A and then B");
        assert!(matches!(expr.kind, ExprKind::Binary { op: BinOp::AndThen, .. }));
    }

    #[test]
    fn membership_test_with_subtype_mark() {
        let expr = parse_expr_src("X in Positive");
        match expr.kind {
            ExprKind::Membership { not, range: MembershipRange::TypeMark(_), .. } => assert!(!not),
            other => panic!("expected a TypeMark membership, got {other:?}"),
        }
    }

    #[test]
    fn not_in_membership_test_with_range() {
        let expr = parse_expr_src("X not in 1 .. 10");
        match expr.kind {
            ExprKind::Membership { not, range: MembershipRange::Range(..), .. } => assert!(not),
            other => panic!("expected a Range membership, got {other:?}"),
        }
    }

    #[test]
    fn call_and_selector_chain() {
        let expr = parse_expr_src("Rec.Field(I)");
        match expr.kind {
            ExprKind::Call { callee, args } => {
                assert_eq!(args.len(), 1);
                assert!(matches!(callee.kind, ExprKind::Selector { .. }));
            }
            other => panic!("expected a Call over a Selector, got {other:?}"),
        }
    }

    #[test]
    fn attribute_reference_with_argument() {
        let expr = parse_expr_src("Arr'Val(3)");
        match expr.kind {
            ExprKind::Attribute { args, .. } => assert_eq!(args.len(), 1),
            other => panic!("expected an Attribute, got {other:?}"),
        }
    }

    #[test]
    fn qualified_expression() {
        let expr = parse_expr_src("Integer'(5)");
        assert!(matches!(expr.kind, ExprKind::Qualified { .. }));
    }

    #[test]
    fn allocator_with_qualified_init() {
        let expr = parse_expr_src("new Cell'(0)");
        match expr.kind {
            ExprKind::Allocator { init: Some(_), .. } => {}
            other => panic!("expected an Allocator with init, got {other:?}"),
        }
    }

    #[test]
    fn parenthesized_expression_collapses_to_its_inner_node() {
        let expr = parse_expr_src("(A + B)");
        assert!(matches!(expr.kind, ExprKind::Binary { op: BinOp::Add, .. }));
    }

    #[test]
    fn positional_aggregate() {
        let expr = parse_expr_src("(1, 2, 3)");
        match expr.kind {
            ExprKind::Aggregate(Aggregate::Positional(elems)) => assert_eq!(elems.len(), 3),
            other => panic!("expected a positional Aggregate, got {other:?}"),
        }
    }

    #[test]
    fn named_aggregate_with_others() {
        let expr = parse_expr_src("(1 => X, others => 0)");
        match expr.kind {
            ExprKind::Aggregate(Aggregate::Named(assocs)) => assert_eq!(assocs.len(), 2),
            other => panic!("expected a named Aggregate, got {other:?}"),
        }
    }

    #[test]
    fn range_expression_between_names() {
        let expr = parse_expr_src("A .. B");
        assert!(matches!(expr.kind, ExprKind::Range(..)));
    }

    #[test]
    fn based_integer_literal_keeps_its_base() {
        let expr = parse_expr_src("16#FF#");
        match expr.kind {
            ExprKind::Literal(Literal::Based(value, base)) => {
                assert_eq!(value, 255);
                assert_eq!(base, 16);
            }
            other => panic!("expected a Based literal, got {other:?}"),
        }
    }
}
