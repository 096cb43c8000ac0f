//! Value inference for update tokens.
//!
//! Tokens are never evaluated. Inference is bounded: base-10 integer, then
//! decimal number, then string with one pair of surrounding quotes removed.
//! A digits-only token outside the `i64` range stays text; it is never
//! widened to a float.
//! When the target kind declares the attribute, the declared type wins if the
//! token converts to it.

use super::syntax::unquote;
use hbnb_core::{FieldType, FieldValue, Kind};

/// Infer a value from a raw token without any schema.
pub fn infer(raw: &str) -> FieldValue {
    let token = raw.trim();
    if is_integer_literal(token) {
        return match token.parse::<i64>() {
            Ok(i) => FieldValue::Int(i),
            Err(_) => FieldValue::Str(token.to_string()),
        };
    }
    if let Some(x) = parse_decimal(token) {
        return FieldValue::Float(x);
    }
    FieldValue::Str(unquote(token).to_string())
}

/// Coerce a raw token for `attr` on an entity of `kind`.
pub fn coerce_for(kind: Kind, attr: &str, raw: &str) -> FieldValue {
    let token = raw.trim();
    match kind.declared_type(attr) {
        None => infer(token),
        Some(FieldType::Str) => FieldValue::Str(unquote(token).to_string()),
        Some(FieldType::Int) => unquote(token)
            .parse::<i64>()
            .map(FieldValue::Int)
            .unwrap_or_else(|_| infer(token)),
        Some(FieldType::Float) => parse_decimal(unquote(token))
            .map(FieldValue::Float)
            .unwrap_or_else(|| infer(token)),
    }
}

/// An optionally signed run of ASCII digits.
fn is_integer_literal(token: &str) -> bool {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a plain decimal number (`12`, `-3.5`, `1e3`, `.5`).
///
/// Words such as `inf` or `NaN`, which `f64::from_str` would accept, are
/// treated as text.
fn parse_decimal(token: &str) -> Option<f64> {
    let plain = token
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !plain || !token.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    token.parse::<f64>().ok().filter(|x| x.is_finite())
}
