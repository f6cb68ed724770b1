//! Lexical edge cases beyond the per-module unit tests: boundary values,
//! error recovery, and the handful of spots in Ada's grammar where a
//! one-token lookahead matters (tick vs. character literal, `--` vs.
//! bare minus, a numeral immediately followed by `#`).

use adac_util::Handler;

use crate::{Lexer, Token, TokenKind, TokenPayload};

fn lex_all(source: &str) -> (Vec<Token<'_>>, bool) {
    let mut handler = Handler::new();
    let tokens: Vec<_> = Lexer::new(source, &mut handler).collect();
    (tokens, handler.has_errors())
}

fn kinds(source: &str) -> Vec<TokenKind> {
    lex_all(source).0.into_iter().map(|t| t.kind).collect()
}

#[test]
fn every_reserved_word_lexes_to_its_keyword_kind() {
    let pairs = [
        ("abort", TokenKind::KwAbort),
        ("digits", TokenKind::KwDigits),
        ("exception", TokenKind::KwException),
        ("generic", TokenKind::KwGeneric),
        ("others", TokenKind::KwOthers),
        ("pragma", TokenKind::KwPragma),
        ("renames", TokenKind::KwRenames),
        ("separate", TokenKind::KwSeparate),
        ("terminate", TokenKind::KwTerminate),
        ("xor", TokenKind::KwXor),
    ];
    for (text, expected) in pairs {
        assert_eq!(kinds(text), vec![expected], "failed for {}", text);
    }
}

#[test]
fn an_identifier_that_merely_starts_with_a_keyword_is_not_a_keyword() {
    assert_eq!(kinds("Beginning"), vec![TokenKind::Identifier]);
    assert_eq!(kinds("Endless"), vec![TokenKind::Identifier]);
}

#[test]
fn full_delimiter_sweep() {
    let source = "& ' ( ) * + , - . / : ; < = > | => .. ** := /= >= <= << >> <>";
    assert_eq!(
        kinds(source),
        vec![
            TokenKind::Ampersand,
            TokenKind::Tick,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::Star,
            TokenKind::Plus,
            TokenKind::Comma,
            TokenKind::Minus,
            TokenKind::Dot,
            TokenKind::Slash,
            TokenKind::Colon,
            TokenKind::Semicolon,
            TokenKind::Less,
            TokenKind::Equal,
            TokenKind::Greater,
            TokenKind::Bar,
            TokenKind::Arrow,
            TokenKind::DotDot,
            TokenKind::StarStar,
            TokenKind::Assign,
            TokenKind::NotEqual,
            TokenKind::GreaterEqual,
            TokenKind::LessEqual,
            TokenKind::LabelOpen,
            TokenKind::LabelClose,
            TokenKind::Box,
        ]
    );
}

#[test]
fn numeral_immediately_followed_by_hash_is_a_based_literal_not_two_tokens() {
    let (tokens, errs) = lex_all("16#FF#");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::IntLiteral);
    assert!(!errs);
}

#[test]
fn range_attribute_is_tick_then_identifier_not_a_char_literal() {
    assert_eq!(
        kinds("X'Range"),
        vec![TokenKind::Identifier, TokenKind::Tick, TokenKind::Identifier]
    );
}

#[test]
fn box_is_not_confused_with_less_then_greater_separately() {
    assert_eq!(kinds("<>"), vec![TokenKind::Box]);
    assert_eq!(kinds("< >"), vec![TokenKind::Less, TokenKind::Greater]);
}

#[test]
fn unterminated_char_literal_recovers_with_an_error_token() {
    let (tokens, errs) = lex_all("'A");
    assert!(errs || tokens.iter().any(|t| t.kind == TokenKind::Error));
}

#[test]
fn label_brackets_are_distinct_from_relational_chains() {
    assert_eq!(
        kinds("<<Loop_Start>>"),
        vec![TokenKind::LabelOpen, TokenKind::Identifier, TokenKind::LabelClose]
    );
}

#[test]
fn integer_literal_max_i64_does_not_panic() {
    let (tokens, _) = lex_all("9223372036854775807");
    assert_eq!(tokens[0].payload, TokenPayload::Int(9223372036854775807));
}

#[test]
fn comment_at_end_of_file_with_no_trailing_newline() {
    assert!(kinds("-- trailing comment, no newline").is_empty());
}

#[test]
fn mixed_case_based_literal_digits() {
    let (tokens, errs) = lex_all("16#dEaD#");
    assert_eq!(tokens[0].payload, TokenPayload::Based(0xDEAD, 16));
    assert!(!errs);
}
