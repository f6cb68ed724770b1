//! Core lexer implementation.
//!
//! Holds the main `Lexer` struct and the character-dispatch entry point;
//! the lexing of each token family lives in the sibling `identifier`,
//! `number`, `string`, `operator`, and `comment` modules.

use adac_util::{DiagnosticBuilder, Handler, Span};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind, TokenPayload};

/// Lexer for Ada 83 source text.
///
/// Transforms source text into a stream of [`Token`]s. Whitespace and
/// comments are skipped between tokens; lexical errors are reported to
/// the [`Handler`] and recovered from by emitting a `TokenKind::Error`
/// token so the caller can keep scanning.
pub struct Lexer<'src, 'h> {
    pub cursor: Cursor<'src>,
    pub handler: &'h mut Handler,
    pub token_start: usize,
    token_start_line: u32,
    token_start_column: u32,
    pub bom_checked: bool,
}

impl<'src, 'h> Lexer<'src, 'h> {
    pub fn new(source: &'src str, handler: &'h mut Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
            bom_checked: false,
        }
    }

    /// Returns the next token from the source, or an `Eof` token at the
    /// end of input.
    pub fn next_token(&mut self) -> Token<'src> {
        crate::lexer::comment::skip_whitespace_and_comments(self);

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return self.make_token(TokenKind::Eof, TokenPayload::None);
        }

        match self.cursor.current_char() {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            ',' => self.single(TokenKind::Comma),
            ';' => self.single(TokenKind::Semicolon),
            '+' => self.single(TokenKind::Plus),
            '&' => self.single(TokenKind::Ampersand),
            '"' => crate::lexer::string::lex_string(self),
            '\'' => crate::lexer::string::lex_tick_or_char(self),
            '-' => crate::lexer::operator::lex_minus(self),
            '*' => crate::lexer::operator::lex_star(self),
            '/' => crate::lexer::operator::lex_slash(self),
            '=' => crate::lexer::operator::lex_equal(self),
            '<' => crate::lexer::operator::lex_less(self),
            '>' => crate::lexer::operator::lex_greater(self),
            ':' => crate::lexer::operator::lex_colon(self),
            '.' => crate::lexer::operator::lex_dot(self),
            '|' => self.single(TokenKind::Bar),
            c if c.is_ascii_digit() => crate::lexer::number::lex_number(self),
            c if crate::unicode::is_ascii_ident_start(c) => {
                crate::lexer::identifier::lex_identifier(self)
            }
            c => {
                self.report_error(format!("unexpected character '{}'", c));
                self.cursor.advance();
                self.make_token(TokenKind::Error, TokenPayload::None)
            }
        }
    }

    /// Consumes the current character and produces a single-character
    /// delimiter token.
    pub(crate) fn single(&mut self, kind: TokenKind) -> Token<'src> {
        self.cursor.advance();
        self.make_token(kind, TokenPayload::None)
    }

    /// Builds a token spanning from `token_start` to the cursor's
    /// current position, with the matching source slice.
    pub(crate) fn make_token(&self, kind: TokenKind, payload: TokenPayload) -> Token<'src> {
        let span = Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        );
        let text = &self.cursor.source()[self.token_start..self.cursor.position()];
        Token::new(kind, span, text, payload)
    }

    /// Reports a lexical error at the current token's span.
    pub fn report_error(&mut self, message: String) {
        let span = Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        );
        DiagnosticBuilder::error(message).span(span).emit(self.handler);
    }

    pub fn line(&self) -> u32 {
        self.cursor.line()
    }

    pub fn column(&self) -> u32 {
        self.cursor.column()
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    pub fn token_start(&mut self) -> usize {
        self.token_start
    }
}

impl<'src, 'h> Iterator for Lexer<'src, 'h> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}
