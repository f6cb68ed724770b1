//! Whitespace and comment skipping (LRM 2.7).
//!
//! Ada has exactly one comment form: `--` through the end of the
//! line. There is no block comment, so unlike a C-family lexer this
//! module has nothing to nest or balance.

use super::core::Lexer;

pub fn skip_whitespace_and_comments(lexer: &mut Lexer) {
    loop {
        match lexer.cursor.current_char() {
            c if c.is_whitespace() => lexer.cursor.advance(),
            '-' if lexer.cursor.peek_char(1) == '-' => {
                while !lexer.cursor.is_at_end() && lexer.cursor.current_char() != '\n' {
                    lexer.cursor.advance();
                }
            }
            _ => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;
    use adac_util::Handler;

    fn lex_kinds(source: &str) -> Vec<TokenKind> {
        let mut handler = Handler::new();
        let lexer = Lexer::new(source, &mut handler);
        lexer.map(|t| t.kind).collect()
    }

    #[test]
    fn line_comment_is_skipped() {
        assert_eq!(lex_kinds("-- a comment\nbegin"), vec![TokenKind::KwBegin]);
    }

    #[test]
    fn trailing_comment_after_code() {
        assert_eq!(lex_kinds("end; -- done"), vec![TokenKind::KwEnd, TokenKind::Semicolon]);
    }

    #[test]
    fn minus_is_not_a_comment() {
        assert_eq!(lex_kinds("A - B"), vec![
            TokenKind::Identifier,
            TokenKind::Minus,
            TokenKind::Identifier,
        ]);
    }
}
