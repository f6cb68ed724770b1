//! Identifier and reserved-word lexing (LRM 2.3).
//!
//! An Ada identifier is a letter followed by letters, digits, and
//! single underscores; it may not end in an underscore or contain two
//! in a row. Matching against the reserved-word table happens after
//! case folding, so `BEGIN`, `Begin`, and `begin` all produce the same
//! keyword token.

use adac_util::Symbol;

use super::core::Lexer;
use crate::token::{keyword_kind, Token, TokenKind, TokenPayload};
use crate::unicode::is_ascii_ident_continue;

pub fn lex_identifier<'src, 'h>(lexer: &mut Lexer<'src, 'h>) -> Token<'src> {
    lexer.cursor.advance(); // the start character was already classified as ident-start

    let mut saw_underscore = false;
    let mut invalid = false;
    loop {
        match lexer.cursor.current_char() {
            '_' => {
                if saw_underscore {
                    invalid = true;
                }
                saw_underscore = true;
                lexer.cursor.advance();
            }
            c if is_ascii_ident_continue(c) => {
                saw_underscore = false;
                lexer.cursor.advance();
            }
            _ => break,
        }
    }

    let text = &lexer.cursor.source()[lexer.token_start..lexer.cursor.position()];
    if saw_underscore {
        invalid = true; // trailing underscore
    }
    if invalid {
        lexer.report_error(format!("identifier '{}' has a misplaced underscore", text));
    }

    let sym = Symbol::intern_ada(text);
    match keyword_kind(sym) {
        Some(kind) => lexer.make_token(kind, TokenPayload::None),
        None => lexer.make_token(TokenKind::Identifier, TokenPayload::Str(sym)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adac_util::Handler;

    fn lex_one(source: &str) -> (Token<'_>, bool) {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new(source, &mut handler);
        let tok = lexer.next_token();
        (tok, handler.has_errors())
    }

    #[test]
    fn plain_identifier() {
        let (tok, errs) = lex_one("Count_1");
        assert_eq!(tok.kind, TokenKind::Identifier);
        assert_eq!(tok.text, "Count_1");
        assert!(!errs);
    }

    #[test]
    fn keywords_are_case_insensitive() {
        for text in ["begin", "Begin", "BEGIN", "bEgIn"] {
            let (tok, _) = lex_one(text);
            assert_eq!(tok.kind, TokenKind::KwBegin, "failed for {}", text);
        }
    }

    #[test]
    fn identifiers_keep_original_case_in_text() {
        let (tok, _) = lex_one("My_Variable");
        assert_eq!(tok.text, "My_Variable");
        if let TokenPayload::Str(sym) = tok.payload {
            assert_eq!(sym, Symbol::intern_ada("my_variable"));
        } else {
            panic!("expected Str payload");
        }
    }

    #[test]
    fn double_underscore_is_an_error() {
        let (_, errs) = lex_one("Foo__Bar");
        assert!(errs);
    }

    #[test]
    fn trailing_underscore_is_an_error() {
        let (_, errs) = lex_one("Foo_ ");
        assert!(errs);
    }

    #[test]
    fn procedure_is_a_keyword_not_an_identifier() {
        let (tok, _) = lex_one("Procedure");
        assert_eq!(tok.kind, TokenKind::KwProcedure);
    }
}
