//! # Core Type Definitions
//!
//! This module contains the small vocabulary shared by every layer of the store:
//! - The closed set of entity kinds (`Kind`) and their declared attributes
//! - Scalar field values (`FieldValue`, `FieldType`)
//! - Error types (`StoreError`)
//!
//! Kinds are resolved by name exactly once, at the edge (`Kind::from_str`).
//! Everything past that point works on the enum, so adding a kind is a
//! compile-time change that every `match` has to acknowledge.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// KIND
// =============================================================================

/// The category of an entity.
///
/// The wire name (`name()`) is what appears in store keys, in the `__class__`
/// field of encoded records, and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    BaseModel,
    User,
    State,
    City,
    Amenity,
    Place,
    Review,
}

impl Kind {
    /// Every kind, in declaration order.
    pub const ALL: [Kind; 7] = [
        Kind::BaseModel,
        Kind::User,
        Kind::State,
        Kind::City,
        Kind::Amenity,
        Kind::Place,
        Kind::Review,
    ];

    /// The wire name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Kind::BaseModel => "BaseModel",
            Kind::User => "User",
            Kind::State => "State",
            Kind::City => "City",
            Kind::Amenity => "Amenity",
            Kind::Place => "Place",
            Kind::Review => "Review",
        }
    }

    /// Attributes this kind declares, with the scalar type each one holds.
    ///
    /// Declared attributes are not materialized on new entities. They only
    /// steer how an update value is coerced.
    #[must_use]
    pub const fn declared_fields(self) -> &'static [(&'static str, FieldType)] {
        use FieldType::{Float, Int, Str};
        match self {
            Kind::BaseModel => &[],
            Kind::User => &[
                ("email", Str),
                ("password", Str),
                ("first_name", Str),
                ("last_name", Str),
            ],
            Kind::State | Kind::Amenity => &[("name", Str)],
            Kind::City => &[("state_id", Str), ("name", Str)],
            Kind::Place => &[
                ("city_id", Str),
                ("user_id", Str),
                ("name", Str),
                ("description", Str),
                ("number_rooms", Int),
                ("number_bathrooms", Int),
                ("max_guest", Int),
                ("price_by_night", Int),
                ("latitude", Float),
                ("longitude", Float),
            ],
            Kind::Review => &[("place_id", Str), ("user_id", Str), ("text", Str)],
        }
    }

    /// The declared type of `attr` for this kind, if any.
    #[must_use]
    pub fn declared_type(self, attr: &str) -> Option<FieldType> {
        self.declared_fields()
            .iter()
            .find(|(name, _)| *name == attr)
            .map(|(_, ty)| *ty)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| StoreError::InvalidKind(s.to_string()))
    }
}

// =============================================================================
// FIELD VALUES
// =============================================================================

/// Scalar type of a declared attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Str,
    Int,
    Float,
}

/// A scalar value stored in an entity's open field map.
///
/// Serialized untagged: JSON integers decode as `Int`, any other JSON number
/// as `Float`, strings as `Str`. Other JSON values are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl FieldValue {
    /// The scalar type of this value.
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Int(_) => FieldType::Int,
            FieldValue::Float(_) => FieldType::Float,
            FieldValue::Str(_) => FieldType::Str,
        }
    }

    /// Render as a map-literal item: strings quoted, floats always carry a
    /// fractional part (`98.0`), integers bare.
    #[must_use]
    pub fn to_literal(&self) -> String {
        match self {
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Float(x) => float_literal(*x),
            FieldValue::Str(s) => quote_literal(s),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(x) => f.write_str(&float_literal(*x)),
            FieldValue::Str(s) => f.write_str(s),
        }
    }
}

/// Shortest round-trip float text with a signed, two-digit-minimum exponent:
/// `98.0`, `1e+20`, `1.5e-07`.
///
/// `{:?}` already picks the same digits and switches to exponent form at the
/// same magnitudes (below 1e-4, from 1e16 up); only the exponent is rewritten.
fn float_literal(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    let text = format!("{:?}", x);
    let Some((mantissa, exponent)) = text.split_once('e') else {
        return text;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{}e{}{:0>2}", mantissa, sign, digits)
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Str(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        FieldValue::Float(x)
    }
}

/// Quote a string for a map literal.
///
/// Single quotes by default; double quotes when the text holds a single quote
/// and no double quote. Otherwise single quotes with backslash escapes.
#[must_use]
pub fn quote_literal(s: &str) -> String {
    if s.contains('\'') && !s.contains('"') {
        return format!("\"{}\"", s.replace('\\', "\\\\"));
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by the store.
///
/// - No silent failures: every fallible operation returns `Result<T, StoreError>`
/// - A wholly absent store file is NOT an error (it reads as an empty store)
#[derive(Debug, Error)]
pub enum StoreError {
    /// The kind name is not one of the fixed set.
    #[error("invalid kind: {0}")]
    InvalidKind(String),

    /// A stored timestamp string could not be parsed.
    #[error("malformed timestamp: {0}")]
    MalformedTimestamp(String),

    /// An entity with the same key is already registered.
    #[error("duplicate identity: {0}")]
    DuplicateIdentity(String),

    /// A stored record lacks a required key.
    #[error("missing field: {0}")]
    MissingField(String),

    /// A stored field holds something other than a string or number.
    #[error("unsupported value for field: {0}")]
    UnsupportedValue(String),

    /// The backing file exists but cannot be turned back into entities.
    #[error("corrupt store: {0}")]
    CorruptStore(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),

    /// Encoding the store failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_roundtrip_through_from_str() {
        for kind in Kind::ALL {
            let parsed: Kind = kind.name().parse().expect("known kind");
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn unknown_kind_rejected() {
        let result = "Ghost".parse::<Kind>();
        assert!(matches!(result, Err(StoreError::InvalidKind(name)) if name == "Ghost"));
    }

    #[test]
    fn kind_names_are_case_sensitive() {
        assert!("user".parse::<Kind>().is_err());
        assert!("Base".parse::<Kind>().is_err());
    }

    #[test]
    fn place_declares_typed_attributes() {
        assert_eq!(Kind::Place.declared_type("max_guest"), Some(FieldType::Int));
        assert_eq!(Kind::Place.declared_type("latitude"), Some(FieldType::Float));
        assert_eq!(Kind::Place.declared_type("name"), Some(FieldType::Str));
        assert_eq!(Kind::Place.declared_type("age"), None);
        assert!(Kind::BaseModel.declared_fields().is_empty());
    }

    #[test]
    fn float_literal_keeps_fraction() {
        assert_eq!(FieldValue::Float(98.0).to_literal(), "98.0");
        assert_eq!(FieldValue::Float(37.5).to_literal(), "37.5");
        assert_eq!(FieldValue::Int(98).to_literal(), "98");
        assert_eq!(FieldValue::Float(1e20).to_literal(), "1e+20");
        assert_eq!(FieldValue::Float(1e-7).to_literal(), "1e-07");
        assert_eq!(FieldValue::Float(-1.5e-7).to_literal(), "-1.5e-07");
        assert_eq!(FieldValue::Float(1.25e100).to_literal(), "1.25e+100");
        assert_eq!(FieldValue::Float(1e16).to_literal(), "1e+16");
        assert_eq!(FieldValue::Float(1e15).to_literal(), "1000000000000000.0");
        assert_eq!(FieldValue::Float(0.0001).to_literal(), "0.0001");
        assert_eq!(FieldValue::Float(1e20).to_string(), "1e+20");
    }

    #[test]
    fn string_literal_quoting() {
        assert_eq!(FieldValue::from("Betty").to_literal(), "'Betty'");
        assert_eq!(FieldValue::from("it's").to_literal(), "\"it's\"");
        assert_eq!(FieldValue::from("a\"b'c").to_literal(), "'a\"b\\'c'");
    }

    #[test]
    fn field_value_json_shape() {
        let int: FieldValue = serde_json::from_str("98").expect("int");
        let float: FieldValue = serde_json::from_str("98.5").expect("float");
        let text: FieldValue = serde_json::from_str("\"x\"").expect("str");
        assert_eq!(int, FieldValue::Int(98));
        assert_eq!(float, FieldValue::Float(98.5));
        assert_eq!(text, FieldValue::Str("x".to_string()));

        assert!(serde_json::from_str::<FieldValue>("[]").is_err());
        assert!(serde_json::from_str::<FieldValue>("null").is_err());
    }
}
