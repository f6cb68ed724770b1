//! Numeric literal lexing (LRM 2.4).
//!
//! Two forms share a grammar shape: a decimal literal
//! `numeral['.'numeral][exponent]`, and a based literal
//! `base '#' based_numeral['.'based_numeral] '#' [exponent]` with
//! `base` in `2..=16` (the `%` delimiter is accepted as an alternate
//! spelling of `#`, per LRM 2.4.2, for character sets lacking `#`). A
//! numeral is digits with optional single underscores between them (no
//! leading/trailing/double underscore). An integer literal's exponent,
//! if present, must not be negative; only real literals (those with a
//! decimal point) may have `E-`.

use super::core::Lexer;
use crate::token::{Token, TokenKind, TokenPayload};
use crate::unicode::{digit_value, is_digit_in_base};

/// Consumes a run of digits valid in `base`, allowing single
/// underscores between digits. Returns the digits with underscores
/// stripped, and whether the numeral was malformed (leading/trailing/
/// double underscore, or no digits at all).
fn read_numeral(lexer: &mut Lexer, base: u32) -> (String, bool) {
    let mut digits = String::new();
    let mut malformed = false;
    let mut last_was_underscore = false;
    let mut saw_digit = false;

    loop {
        let c = lexer.cursor.current_char();
        if c == '_' {
            if last_was_underscore || !saw_digit {
                malformed = true;
            }
            last_was_underscore = true;
            lexer.cursor.advance();
        } else if is_digit_in_base(c, base) {
            digits.push(c);
            saw_digit = true;
            last_was_underscore = false;
            lexer.cursor.advance();
        } else {
            break;
        }
    }

    if last_was_underscore || !saw_digit {
        malformed = true;
    }
    (digits, malformed)
}

/// Consumes an optional `E[+|-]numeral` exponent. Returns `(value,
/// negative, present)`.
fn read_exponent(lexer: &mut Lexer) -> (i32, bool, bool) {
    if !matches!(lexer.cursor.current_char(), 'e' | 'E') {
        return (0, false, false);
    }
    lexer.cursor.advance();

    let negative = match lexer.cursor.current_char() {
        '+' => {
            lexer.cursor.advance();
            false
        }
        '-' => {
            lexer.cursor.advance();
            true
        }
        _ => false,
    };

    let (digits, malformed) = read_numeral(lexer, 10);
    if malformed {
        lexer.report_error("malformed exponent".to_string());
    }
    let value = digits.parse::<i32>().unwrap_or(0);
    (value, negative, true)
}

fn is_based_delimiter(c: char) -> bool {
    c == '#' || c == '%'
}

pub fn lex_number<'src, 'h>(lexer: &mut Lexer<'src, 'h>) -> Token<'src> {
    let (int_digits, malformed) = read_numeral(lexer, 10);
    if malformed {
        lexer.report_error("malformed numeral".to_string());
    }

    if is_based_delimiter(lexer.cursor.current_char()) {
        return lex_based_literal(lexer, &int_digits);
    }

    let mut is_real = false;
    let mut frac_digits = String::new();
    if lexer.cursor.current_char() == '.' && lexer.cursor.peek_char(1).is_ascii_digit() {
        is_real = true;
        lexer.cursor.advance();
        let (digits, malformed) = read_numeral(lexer, 10);
        if malformed {
            lexer.report_error("malformed numeral after decimal point".to_string());
        }
        frac_digits = digits;
    }

    let (exp_value, exp_negative, exp_present) = read_exponent(lexer);

    if is_real {
        let text = format!("{}.{}", int_digits, frac_digits);
        let mut value: f64 = text.parse().unwrap_or(0.0);
        if exp_present {
            let exp = if exp_negative { -exp_value } else { exp_value };
            value *= 10f64.powi(exp);
        }
        lexer.make_token(TokenKind::RealLiteral, TokenPayload::Float(value))
    } else {
        if exp_present && exp_negative {
            lexer.report_error("integer literal cannot have a negative exponent".to_string());
        }
        let base_value: i64 = int_digits.parse().unwrap_or(0);
        let value = if exp_present && !exp_negative {
            base_value.saturating_mul(10i64.saturating_pow(exp_value as u32))
        } else {
            base_value
        };
        lexer.make_token(TokenKind::IntLiteral, TokenPayload::Int(value))
    }
}

/// Lexes the remainder of a based literal once the base and the
/// opening `#`/`%` have been recognised. `base_digits` is the
/// already-consumed numeral giving the base.
fn lex_based_literal<'src, 'h>(lexer: &mut Lexer<'src, 'h>, base_digits: &str) -> Token<'src> {
    let base: u32 = base_digits.parse().unwrap_or(0);
    if !(2..=16).contains(&base) {
        lexer.report_error(format!("base {} is out of range 2..16", base));
    }
    let delim = lexer.cursor.current_char(); // '#' or '%'
    lexer.cursor.advance();

    let (int_digits, malformed) = read_numeral(lexer, base.clamp(2, 16));
    if malformed {
        lexer.report_error("malformed based numeral".to_string());
    }

    let mut is_real = false;
    let mut frac_digits = String::new();
    if lexer.cursor.current_char() == '.' {
        is_real = true;
        lexer.cursor.advance();
        let (digits, malformed) = read_numeral(lexer, base.clamp(2, 16));
        if malformed {
            lexer.report_error("malformed based numeral after decimal point".to_string());
        }
        frac_digits = digits;
    }

    if lexer.cursor.current_char() == delim {
        lexer.cursor.advance();
    } else {
        lexer.report_error(format!("expected closing '{}' in based literal", delim));
    }

    let (exp_value, exp_negative, exp_present) = read_exponent(lexer);

    let int_value = digits_to_value(&int_digits, base);

    if is_real {
        let frac_value = digits_to_value(&frac_digits, base) as f64;
        let scale = (base as f64).powi(frac_digits.len() as i32);
        let mut value = int_value as f64 + frac_value / scale.max(1.0);
        if exp_present {
            let exp = if exp_negative { -exp_value } else { exp_value };
            value *= 10f64.powi(exp);
        }
        lexer.make_token(TokenKind::RealLiteral, TokenPayload::Float(value))
    } else {
        if exp_present && exp_negative {
            lexer.report_error("integer literal cannot have a negative exponent".to_string());
        }
        let value = if exp_present && !exp_negative {
            int_value.saturating_mul(10i64.saturating_pow(exp_value as u32))
        } else {
            int_value
        };
        lexer.make_token(TokenKind::IntLiteral, TokenPayload::Based(value, base))
    }
}

fn digits_to_value(digits: &str, base: u32) -> i64 {
    let mut value: i64 = 0;
    for c in digits.chars() {
        if let Some(d) = digit_value(c) {
            value = value.saturating_mul(base as i64).saturating_add(d as i64);
        }
    }
    value
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
    fn plain_decimal_integer() {
        let (tok, errs) = lex_one("12345");
        assert_eq!(tok.kind, TokenKind::IntLiteral);
        assert_eq!(tok.payload, TokenPayload::Int(12345));
        assert!(!errs);
    }

    #[test]
    fn integer_with_underscores() {
        let (tok, errs) = lex_one("1_000_000");
        assert_eq!(tok.payload, TokenPayload::Int(1_000_000));
        assert!(!errs);
    }

    #[test]
    fn decimal_real_requires_a_point() {
        let (tok, _) = lex_one("3.14159");
        assert_eq!(tok.kind, TokenKind::RealLiteral);
        match tok.payload {
            TokenPayload::Float(v) => assert!((v - 3.14159).abs() < 1e-9),
            other => panic!("expected Float, got {:?}", other),
        }
    }

    #[test]
    fn integer_with_positive_exponent() {
        let (tok, errs) = lex_one("2E3");
        assert_eq!(tok.payload, TokenPayload::Int(2000));
        assert!(!errs);
    }

    #[test]
    fn integer_with_negative_exponent_is_an_error() {
        let (_, errs) = lex_one("2E-3");
        assert!(errs);
    }

    #[test]
    fn real_with_negative_exponent_is_fine() {
        let (tok, errs) = lex_one("2.0E-3");
        match tok.payload {
            TokenPayload::Float(v) => assert!((v - 0.002).abs() < 1e-9),
            other => panic!("expected Float, got {:?}", other),
        }
        assert!(!errs);
    }

    #[test]
    fn based_integer_literal() {
        let (tok, errs) = lex_one("16#FF#");
        assert_eq!(tok.kind, TokenKind::IntLiteral);
        assert_eq!(tok.payload, TokenPayload::Based(255, 16));
        assert!(!errs);
    }

    #[test]
    fn based_real_literal_is_prescaled_into_float() {
        let (tok, errs) = lex_one("2#1.1#");
        match tok.payload {
            TokenPayload::Float(v) => assert!((v - 1.5).abs() < 1e-9),
            other => panic!("expected Float, got {:?}", other),
        }
        assert!(!errs);
    }

    #[test]
    fn based_literal_with_exponent() {
        let (tok, errs) = lex_one("16#FF#E1");
        assert_eq!(tok.payload, TokenPayload::Based(2550, 16));
        assert!(!errs);
    }

    #[test]
    fn out_of_range_base_is_an_error() {
        let (_, errs) = lex_one("20#11#");
        assert!(errs);
    }

    #[test]
    fn percent_delimiter_is_accepted_as_alternate() {
        let (tok, errs) = lex_one("16%FF%");
        assert_eq!(tok.payload, TokenPayload::Based(255, 16));
        assert!(!errs);
    }
}
