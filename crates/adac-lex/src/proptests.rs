//! Property-based round-trip checks: for any identifier/keyword mix or
//! delimiter sequence the lexer accepts, concatenating each token's
//! `text` (with a single separating space) and re-lexing reproduces
//! the same sequence of kinds.

use adac_util::Handler;
use proptest::prelude::*;

use crate::{Lexer, TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    let mut handler = Handler::new();
    Lexer::new(source, &mut handler).map(|t| t.kind).collect()
}

fn ada_identifier() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9]{0,8}"
}

proptest! {
    #[test]
    fn identifier_round_trips_through_text(id in ada_identifier()) {
        let ks = kinds(&id);
        prop_assert_eq!(ks.len(), 1);
        // re-lexing the emitted text reproduces the same kind
        let mut handler = Handler::new();
        let tok = Lexer::new(&id, &mut handler).next_token();
        let mut handler2 = Handler::new();
        let tok2 = Lexer::new(tok.text, &mut handler2).next_token();
        prop_assert_eq!(tok.kind, tok2.kind);
    }

    #[test]
    fn sequence_of_identifiers_joined_by_spaces_round_trips(
        ids in proptest::collection::vec(ada_identifier(), 1..6)
    ) {
        let source = ids.join(" ");
        let ks = kinds(&source);
        prop_assert_eq!(ks.len(), ids.len());
        prop_assert!(ks.iter().all(|k| *k == TokenKind::Identifier || k.is_keyword()));
    }

    #[test]
    fn decimal_integer_literal_round_trips(n in 0u32..1_000_000u32) {
        let source = n.to_string();
        let mut handler = Handler::new();
        let tok = Lexer::new(&source, &mut handler).next_token();
        prop_assert_eq!(tok.kind, TokenKind::IntLiteral);
        if let crate::TokenPayload::Int(v) = tok.payload {
            prop_assert_eq!(v, n as i64);
        } else {
            prop_assert!(false, "expected Int payload");
        }
    }
}
