//! String and character literal lexing, and the tick/attribute
//! disambiguation (LRM 2.5, 2.6).
//!
//! Ada has no backslash escapes. A string literal doubles an embedded
//! quote (`"` becomes `""`) and may not span a line. A character
//! literal is exactly one character between apostrophes, including the
//! apostrophe itself (written `'''`). The opening apostrophe is also
//! the `Tick` delimiter used for attribute references (`X'First`), so
//! the lexer disambiguates with a two-character lookahead: `'` is a
//! character literal only when it is immediately followed by some
//! character and then a closing `'`; otherwise it is a lone `Tick`.

use adac_util::Symbol;

use super::core::Lexer;
use crate::token::{Token, TokenKind, TokenPayload};

/// Dispatches on the apostrophe: a character literal or a bare `Tick`.
pub fn lex_tick_or_char<'src, 'h>(lexer: &mut Lexer<'src, 'h>) -> Token<'src> {
    let inner = lexer.cursor.peek_char(1);
    let closing = lexer.cursor.peek_char(2);
    if inner != '\0' && closing == '\'' {
        lex_char(lexer)
    } else {
        lexer.single(TokenKind::Tick)
    }
}

fn lex_char<'src, 'h>(lexer: &mut Lexer<'src, 'h>) -> Token<'src> {
    lexer.cursor.advance(); // opening '
    let c = lexer.cursor.current_char();
    lexer.cursor.advance();
    lexer.cursor.advance(); // closing '

    let mut buf = [0u8; 4];
    let sym = Symbol::intern(c.encode_utf8(&mut buf));
    lexer.make_token(TokenKind::CharLiteral, TokenPayload::Str(sym))
}

pub fn lex_string<'src, 'h>(lexer: &mut Lexer<'src, 'h>) -> Token<'src> {
    lexer.cursor.advance(); // opening "
    let mut content = String::new();
    let mut terminated = false;

    loop {
        match lexer.cursor.current_char() {
            '\0' if lexer.cursor.is_at_end() => break,
            '\n' => break,
            '"' => {
                if lexer.cursor.peek_char(1) == '"' {
                    content.push('"');
                    lexer.cursor.advance();
                    lexer.cursor.advance();
                } else {
                    lexer.cursor.advance();
                    terminated = true;
                    break;
                }
            }
            c => {
                content.push(c);
                lexer.cursor.advance();
            }
        }
    }

    if !terminated {
        lexer.report_error("unterminated string literal".to_string());
    }

    let sym = Symbol::intern(&content);
    lexer.make_token(TokenKind::StringLiteral, TokenPayload::Str(sym))
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
    fn simple_string_literal() {
        let (tok, errs) = lex_one("\"hello\"");
        assert_eq!(tok.kind, TokenKind::StringLiteral);
        assert_eq!(tok.payload, TokenPayload::Str(Symbol::intern("hello")));
        assert!(!errs);
    }

    #[test]
    fn embedded_quote_is_doubled() {
        let (tok, errs) = lex_one("\"say \"\"hi\"\"\"");
        assert_eq!(tok.payload, TokenPayload::Str(Symbol::intern("say \"hi\"")));
        assert!(!errs);
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let (_, errs) = lex_one("\"unterminated");
        assert!(errs);
    }

    #[test]
    fn string_cannot_span_a_line() {
        let (_, errs) = lex_one("\"oops\nstill going\"");
        assert!(errs);
    }

    #[test]
    fn plain_char_literal() {
        let (tok, errs) = lex_one("'A'");
        assert_eq!(tok.kind, TokenKind::CharLiteral);
        assert_eq!(tok.payload, TokenPayload::Str(Symbol::intern("A")));
        assert!(!errs);
    }

    #[test]
    fn apostrophe_char_literal() {
        let (tok, errs) = lex_one("'''");
        assert_eq!(tok.payload, TokenPayload::Str(Symbol::intern("'")));
        assert!(!errs);
    }

    #[test]
    fn tick_attribute_is_not_a_char_literal() {
        let (tok, _) = lex_one("'First");
        assert_eq!(tok.kind, TokenKind::Tick);
        assert_eq!(tok.text, "'");
    }
}
