//! Compound delimiter lexing (LRM 2.3).
//!
//! The single-character delimiters that never combine with a following
//! character (`(` `)` `,` `;` `+` `&` `|`) are dispatched directly in
//! `core::next_token`. This module handles the six characters that
//! each start either a one- or two-character delimiter: `-` `*` `/`
//! `=` `<` `>` `:` `.`.

use super::core::Lexer;
use crate::token::{Token, TokenKind, TokenPayload};

pub fn lex_minus<'src, 'h>(lexer: &mut Lexer<'src, 'h>) -> Token<'src> {
    lexer.single(TokenKind::Minus)
}

pub fn lex_star<'src, 'h>(lexer: &mut Lexer<'src, 'h>) -> Token<'src> {
    lexer.cursor.advance();
    if lexer.cursor.match_char('*') {
        lexer.make_token(TokenKind::StarStar, TokenPayload::None)
    } else {
        lexer.make_token(TokenKind::Star, TokenPayload::None)
    }
}

pub fn lex_slash<'src, 'h>(lexer: &mut Lexer<'src, 'h>) -> Token<'src> {
    lexer.cursor.advance();
    if lexer.cursor.match_char('=') {
        lexer.make_token(TokenKind::NotEqual, TokenPayload::None)
    } else {
        lexer.make_token(TokenKind::Slash, TokenPayload::None)
    }
}

pub fn lex_equal<'src, 'h>(lexer: &mut Lexer<'src, 'h>) -> Token<'src> {
    lexer.cursor.advance();
    if lexer.cursor.match_char('>') {
        lexer.make_token(TokenKind::Arrow, TokenPayload::None)
    } else {
        lexer.make_token(TokenKind::Equal, TokenPayload::None)
    }
}

pub fn lex_less<'src, 'h>(lexer: &mut Lexer<'src, 'h>) -> Token<'src> {
    lexer.cursor.advance();
    match lexer.cursor.current_char() {
        '=' => {
            lexer.cursor.advance();
            lexer.make_token(TokenKind::LessEqual, TokenPayload::None)
        }
        '<' => {
            lexer.cursor.advance();
            lexer.make_token(TokenKind::LabelOpen, TokenPayload::None)
        }
        '>' => {
            lexer.cursor.advance();
            lexer.make_token(TokenKind::Box, TokenPayload::None)
        }
        _ => lexer.make_token(TokenKind::Less, TokenPayload::None),
    }
}

pub fn lex_greater<'src, 'h>(lexer: &mut Lexer<'src, 'h>) -> Token<'src> {
    lexer.cursor.advance();
    match lexer.cursor.current_char() {
        '=' => {
            lexer.cursor.advance();
            lexer.make_token(TokenKind::GreaterEqual, TokenPayload::None)
        }
        '>' => {
            lexer.cursor.advance();
            lexer.make_token(TokenKind::LabelClose, TokenPayload::None)
        }
        _ => lexer.make_token(TokenKind::Greater, TokenPayload::None),
    }
}

pub fn lex_colon<'src, 'h>(lexer: &mut Lexer<'src, 'h>) -> Token<'src> {
    lexer.cursor.advance();
    if lexer.cursor.match_char('=') {
        lexer.make_token(TokenKind::Assign, TokenPayload::None)
    } else {
        lexer.make_token(TokenKind::Colon, TokenPayload::None)
    }
}

pub fn lex_dot<'src, 'h>(lexer: &mut Lexer<'src, 'h>) -> Token<'src> {
    lexer.cursor.advance();
    if lexer.cursor.match_char('.') {
        lexer.make_token(TokenKind::DotDot, TokenPayload::None)
    } else {
        lexer.make_token(TokenKind::Dot, TokenPayload::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adac_util::Handler;

    fn lex_kinds(source: &str) -> Vec<TokenKind> {
        let mut handler = Handler::new();
        let lexer = Lexer::new(source, &mut handler);
        lexer.map(|t| t.kind).collect()
    }

    #[test]
    fn star_vs_star_star() {
        assert_eq!(lex_kinds("*"), vec![TokenKind::Star]);
        assert_eq!(lex_kinds("**"), vec![TokenKind::StarStar]);
    }

    #[test]
    fn slash_vs_not_equal() {
        assert_eq!(lex_kinds("/"), vec![TokenKind::Slash]);
        assert_eq!(lex_kinds("/="), vec![TokenKind::NotEqual]);
    }

    #[test]
    fn equal_vs_arrow() {
        assert_eq!(lex_kinds("="), vec![TokenKind::Equal]);
        assert_eq!(lex_kinds("=>"), vec![TokenKind::Arrow]);
    }

    #[test]
    fn less_family() {
        assert_eq!(lex_kinds("<"), vec![TokenKind::Less]);
        assert_eq!(lex_kinds("<="), vec![TokenKind::LessEqual]);
        assert_eq!(lex_kinds("<<"), vec![TokenKind::LabelOpen]);
        assert_eq!(lex_kinds("<>"), vec![TokenKind::Box]);
    }

    #[test]
    fn greater_family() {
        assert_eq!(lex_kinds(">"), vec![TokenKind::Greater]);
        assert_eq!(lex_kinds(">="), vec![TokenKind::GreaterEqual]);
        assert_eq!(lex_kinds(">>"), vec![TokenKind::LabelClose]);
    }

    #[test]
    fn colon_vs_assign() {
        assert_eq!(lex_kinds(":"), vec![TokenKind::Colon]);
        assert_eq!(lex_kinds(":="), vec![TokenKind::Assign]);
    }

    #[test]
    fn dot_vs_dot_dot() {
        assert_eq!(lex_kinds("."), vec![TokenKind::Dot]);
        assert_eq!(lex_kinds(".."), vec![TokenKind::DotDot]);
    }
}
