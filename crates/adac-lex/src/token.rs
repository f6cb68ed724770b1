//! Token kinds and payloads for Ada 83 source text.
//!
//! A [`Token`] pairs a [`TokenKind`] tag with the original-case source
//! slice and, for literals and identifiers, a [`TokenPayload`]. Keywords
//! are matched against the fixed table in [`keyword_kind`] after the
//! identifier's case has been folded by [`Symbol::intern_ada`]; the
//! token itself still carries the untouched slice so diagnostics can
//! quote the source exactly as written (LRM 2.3: identifiers are
//! case-insensitive for matching but not normalized in the source).

use adac_util::{Span, Symbol};
use adac_util::symbol::{
    KW_ABORT, KW_ABS, KW_ACCEPT, KW_ACCESS, KW_ALL, KW_AND, KW_ARRAY, KW_AT, KW_BEGIN, KW_BODY,
    KW_CASE, KW_CONSTANT, KW_DECLARE, KW_DELAY, KW_DELTA, KW_DIGITS, KW_DO, KW_ELSE, KW_ELSIF,
    KW_END, KW_ENTRY, KW_EXCEPTION, KW_EXIT, KW_FOR, KW_FUNCTION, KW_GENERIC, KW_GOTO, KW_IF,
    KW_IN, KW_IS, KW_LIMITED, KW_LOOP, KW_MOD, KW_NEW, KW_NOT, KW_NULL, KW_OF, KW_OR, KW_OTHERS,
    KW_OUT, KW_PACKAGE, KW_PRAGMA, KW_PRIVATE, KW_PROCEDURE, KW_RAISE, KW_RANGE, KW_RECORD,
    KW_REM, KW_RENAMES, KW_RETURN, KW_REVERSE, KW_SELECT, KW_SEPARATE, KW_SUBTYPE, KW_TASK,
    KW_TERMINATE, KW_THEN, KW_TYPE, KW_USE, KW_WHEN, KW_WHILE, KW_WITH, KW_XOR,
};

/// Discriminant for a lexed token. Delimiters and compound operators
/// (LRM 2.3), the 63 reserved words (LRM 2.9), the four literal forms,
/// plain identifiers, and the two sentinel kinds `Eof`/`Error`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    IntLiteral,
    RealLiteral,
    CharLiteral,
    StringLiteral,

    // single-character delimiters
    Ampersand,
    Tick,
    LParen,
    RParen,
    Star,
    Plus,
    Comma,
    Minus,
    Dot,
    Slash,
    Colon,
    Semicolon,
    Less,
    Equal,
    Greater,
    Bar,

    // compound delimiters
    Arrow,        // =>
    DotDot,       // ..
    StarStar,     // **
    Assign,       // :=
    NotEqual,     // /=
    GreaterEqual, // >=
    LessEqual,    // <=
    LabelOpen,    // <<
    LabelClose,   // >>
    Box,          // <>

    KwAbort,
    KwAbs,
    KwAccept,
    KwAccess,
    KwAll,
    KwAnd,
    KwArray,
    KwAt,
    KwBegin,
    KwBody,
    KwCase,
    KwConstant,
    KwDeclare,
    KwDelay,
    KwDelta,
    KwDigits,
    KwDo,
    KwElse,
    KwElsif,
    KwEnd,
    KwEntry,
    KwException,
    KwExit,
    KwFor,
    KwFunction,
    KwGeneric,
    KwGoto,
    KwIf,
    KwIn,
    KwIs,
    KwLimited,
    KwLoop,
    KwMod,
    KwNew,
    KwNot,
    KwNull,
    KwOf,
    KwOr,
    KwOthers,
    KwOut,
    KwPackage,
    KwPragma,
    KwPrivate,
    KwProcedure,
    KwRaise,
    KwRange,
    KwRecord,
    KwRem,
    KwRenames,
    KwReturn,
    KwReverse,
    KwSelect,
    KwSeparate,
    KwSubtype,
    KwTask,
    KwTerminate,
    KwThen,
    KwType,
    KwUse,
    KwWhen,
    KwWhile,
    KwWith,
    KwXor,

    Eof,
    Error,
}

impl TokenKind {
    /// True for the four kinds that carry a meaningful [`TokenPayload`].
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::IntLiteral
                | TokenKind::RealLiteral
                | TokenKind::CharLiteral
                | TokenKind::StringLiteral
        )
    }

    pub fn is_keyword(self) -> bool {
        self as u8 >= TokenKind::KwAbort as u8 && self as u8 <= TokenKind::KwXor as u8
    }
}

/// The value a token carries beyond its kind and source slice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TokenPayload {
    None,
    /// Interned text: identifiers (case-folded) and string/character
    /// literal contents (verbatim, one entry per character for
    /// `CharLiteral`).
    Str(Symbol),
    Int(i64),
    Float(f64),
    /// Whole-valued based literal: `(value, base)`. Based literals with
    /// a fractional part are folded into `Float` instead; see
    /// `adac_lex::token` module docs.
    Based(i64, u32),
}

/// A single lexed token: its kind, source location, original-case
/// slice, and payload.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub span: Span,
    pub text: &'src str,
    pub payload: TokenPayload,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, span: Span, text: &'src str, payload: TokenPayload) -> Self {
        Self { kind, span, text, payload }
    }

    pub fn eof(span: Span) -> Self {
        Self { kind: TokenKind::Eof, span, text: "", payload: TokenPayload::None }
    }
}

/// Matches a case-folded symbol against the reserved-word table.
/// Returns `None` for ordinary identifiers.
pub fn keyword_kind(sym: Symbol) -> Option<TokenKind> {
    let kind = if sym == KW_ABORT {
        TokenKind::KwAbort
    } else if sym == KW_ABS {
        TokenKind::KwAbs
    } else if sym == KW_ACCEPT {
        TokenKind::KwAccept
    } else if sym == KW_ACCESS {
        TokenKind::KwAccess
    } else if sym == KW_ALL {
        TokenKind::KwAll
    } else if sym == KW_AND {
        TokenKind::KwAnd
    } else if sym == KW_ARRAY {
        TokenKind::KwArray
    } else if sym == KW_AT {
        TokenKind::KwAt
    } else if sym == KW_BEGIN {
        TokenKind::KwBegin
    } else if sym == KW_BODY {
        TokenKind::KwBody
    } else if sym == KW_CASE {
        TokenKind::KwCase
    } else if sym == KW_CONSTANT {
        TokenKind::KwConstant
    } else if sym == KW_DECLARE {
        TokenKind::KwDeclare
    } else if sym == KW_DELAY {
        TokenKind::KwDelay
    } else if sym == KW_DELTA {
        TokenKind::KwDelta
    } else if sym == KW_DIGITS {
        TokenKind::KwDigits
    } else if sym == KW_DO {
        TokenKind::KwDo
    } else if sym == KW_ELSE {
        TokenKind::KwElse
    } else if sym == KW_ELSIF {
        TokenKind::KwElsif
    } else if sym == KW_END {
        TokenKind::KwEnd
    } else if sym == KW_ENTRY {
        TokenKind::KwEntry
    } else if sym == KW_EXCEPTION {
        TokenKind::KwException
    } else if sym == KW_EXIT {
        TokenKind::KwExit
    } else if sym == KW_FOR {
        TokenKind::KwFor
    } else if sym == KW_FUNCTION {
        TokenKind::KwFunction
    } else if sym == KW_GENERIC {
        TokenKind::KwGeneric
    } else if sym == KW_GOTO {
        TokenKind::KwGoto
    } else if sym == KW_IF {
        TokenKind::KwIf
    } else if sym == KW_IN {
        TokenKind::KwIn
    } else if sym == KW_IS {
        TokenKind::KwIs
    } else if sym == KW_LIMITED {
        TokenKind::KwLimited
    } else if sym == KW_LOOP {
        TokenKind::KwLoop
    } else if sym == KW_MOD {
        TokenKind::KwMod
    } else if sym == KW_NEW {
        TokenKind::KwNew
    } else if sym == KW_NOT {
        TokenKind::KwNot
    } else if sym == KW_NULL {
        TokenKind::KwNull
    } else if sym == KW_OF {
        TokenKind::KwOf
    } else if sym == KW_OR {
        TokenKind::KwOr
    } else if sym == KW_OTHERS {
        TokenKind::KwOthers
    } else if sym == KW_OUT {
        TokenKind::KwOut
    } else if sym == KW_PACKAGE {
        TokenKind::KwPackage
    } else if sym == KW_PRAGMA {
        TokenKind::KwPragma
    } else if sym == KW_PRIVATE {
        TokenKind::KwPrivate
    } else if sym == KW_PROCEDURE {
        TokenKind::KwProcedure
    } else if sym == KW_RAISE {
        TokenKind::KwRaise
    } else if sym == KW_RANGE {
        TokenKind::KwRange
    } else if sym == KW_RECORD {
        TokenKind::KwRecord
    } else if sym == KW_REM {
        TokenKind::KwRem
    } else if sym == KW_RENAMES {
        TokenKind::KwRenames
    } else if sym == KW_RETURN {
        TokenKind::KwReturn
    } else if sym == KW_REVERSE {
        TokenKind::KwReverse
    } else if sym == KW_SELECT {
        TokenKind::KwSelect
    } else if sym == KW_SEPARATE {
        TokenKind::KwSeparate
    } else if sym == KW_SUBTYPE {
        TokenKind::KwSubtype
    } else if sym == KW_TASK {
        TokenKind::KwTask
    } else if sym == KW_TERMINATE {
        TokenKind::KwTerminate
    } else if sym == KW_THEN {
        TokenKind::KwThen
    } else if sym == KW_TYPE {
        TokenKind::KwType
    } else if sym == KW_USE {
        TokenKind::KwUse
    } else if sym == KW_WHEN {
        TokenKind::KwWhen
    } else if sym == KW_WHILE {
        TokenKind::KwWhile
    } else if sym == KW_WITH {
        TokenKind::KwWith
    } else if sym == KW_XOR {
        TokenKind::KwXor
    } else {
        return None;
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_kind_matches_reserved_words() {
        assert_eq!(keyword_kind(Symbol::intern_ada("begin")), Some(TokenKind::KwBegin));
        assert_eq!(keyword_kind(Symbol::intern_ada("BEGIN")), Some(TokenKind::KwBegin));
        assert_eq!(keyword_kind(Symbol::intern_ada("Exception")), Some(TokenKind::KwException));
    }

    #[test]
    fn keyword_kind_rejects_ordinary_identifiers() {
        assert_eq!(keyword_kind(Symbol::intern_ada("My_Variable")), None);
    }

    #[test]
    fn is_keyword_is_true_only_for_keyword_kinds() {
        assert!(TokenKind::KwEnd.is_keyword());
        assert!(!TokenKind::Identifier.is_keyword());
        assert!(!TokenKind::Arrow.is_keyword());
    }

    #[test]
    fn is_literal_covers_the_four_literal_kinds() {
        assert!(TokenKind::IntLiteral.is_literal());
        assert!(TokenKind::RealLiteral.is_literal());
        assert!(TokenKind::CharLiteral.is_literal());
        assert!(TokenKind::StringLiteral.is_literal());
        assert!(!TokenKind::Identifier.is_literal());
    }
}
