//! adac-lex - Ada 83 lexical analyzer
//!
//! Transforms Ada source text into a stream of [`Token`]s. Identifiers
//! and reserved words are case-insensitive (LRM 2.3); the token keeps
//! the original-case source slice for diagnostics while the payload
//! carries the case-folded [`adac_util::Symbol`]. The four literal
//! forms, the 63 reserved words, and the delimiter/compound-operator
//! set all live in [`TokenKind`].
//!
//! ```
//! use adac_lex::{Lexer, TokenKind};
//! use adac_util::Handler;
//!
//! let mut handler = Handler::new();
//! let kinds: Vec<_> = Lexer::new("X := X + 1;", &mut handler).map(|t| t.kind).collect();
//! assert_eq!(kinds, vec![
//!     TokenKind::Identifier,
//!     TokenKind::Assign,
//!     TokenKind::Identifier,
//!     TokenKind::Plus,
//!     TokenKind::IntLiteral,
//!     TokenKind::Semicolon,
//! ]);
//! ```

pub mod cursor;
mod lexer;
pub mod token;
pub mod unicode;

#[cfg(test)]
mod edge_cases;
#[cfg(test)]
mod proptests;

pub use lexer::Lexer;
pub use token::{keyword_kind, Token, TokenKind, TokenPayload};
