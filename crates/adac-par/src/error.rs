//! Parser error type.
//!
//! Per spec.md §7: the first syntax error is fatal and aborts
//! compilation with `file:line:col` context. `Parser` methods return
//! `Result<T, ParseError>` and propagate with `?`; there is no
//! statement- or token-skipping recovery.

use adac_util::{Diagnostic, DiagnosticBuilder, Span, ToDiagnostic};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String, span: Span },

    #[error("unexpected end of file, expected {expected}")]
    UnexpectedEof { expected: String, span: Span },

    #[error("{0}")]
    Other(String, Span),
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. } => *span,
            ParseError::UnexpectedEof { span, .. } => *span,
            ParseError::Other(_, span) => *span,
        }
    }
}

impl ToDiagnostic for ParseError {
    fn to_diagnostic(&self) -> Diagnostic {
        DiagnosticBuilder::error(self.to_string()).span(self.span()).build()
    }
}
