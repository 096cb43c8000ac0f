//! # Codec
//!
//! Entity <-> flat keyed-field map, the shape each record takes in the store
//! file:
//!
//! ```text
//! {
//!   "id": "…",
//!   "created_at": "2026-10-18T09:12:44.128031",
//!   "updated_at": "2026-10-18T09:12:44.128031",
//!   "<field>": <string | integer | float>,
//!   "__class__": "Place"
//! }
//! ```
//!
//! `decode(encode(e)) == e` for every entity.

use crate::entity::{Entity, Fields};
use crate::primitives::{
    CLASS_KEY, CREATED_AT_KEY, ID_KEY, TIMESTAMP_FORMAT, TIMESTAMP_PARSE_FORMAT, UPDATED_AT_KEY,
};
use crate::{FieldValue, Kind, StoreError};
use chrono::NaiveDateTime;
use serde_json::{Map, Value};

/// A flat encoded record.
pub type Record = Map<String, Value>;

/// Format a timestamp the way the store writes it.
#[must_use]
pub fn format_timestamp(stamp: NaiveDateTime) -> String {
    stamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored ISO-8601 timestamp (fractional seconds optional).
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, StoreError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_PARSE_FORMAT)
        .map_err(|_| StoreError::MalformedTimestamp(raw.to_string()))
}

/// Encode an entity into its flat record.
pub fn encode(entity: &Entity) -> Result<Record, StoreError> {
    let mut record = Record::new();
    record.insert(ID_KEY.to_string(), Value::String(entity.id().to_string()));
    record.insert(
        CREATED_AT_KEY.to_string(),
        Value::String(format_timestamp(entity.created_at())),
    );
    record.insert(
        UPDATED_AT_KEY.to_string(),
        Value::String(format_timestamp(entity.updated_at())),
    );
    for (name, value) in entity.fields() {
        let encoded =
            serde_json::to_value(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
        record.insert(name.clone(), encoded);
    }
    record.insert(
        CLASS_KEY.to_string(),
        Value::String(entity.kind().name().to_string()),
    );
    Ok(record)
}

/// Reconstruct an entity from a stored record.
///
/// Identity and timestamps are taken verbatim; the entity is not considered
/// new and gets no fresh identity.
pub fn decode(record: &Record) -> Result<Entity, StoreError> {
    let kind: Kind = required_str(record, CLASS_KEY)?.parse()?;
    let id = required_str(record, ID_KEY)?.to_string();
    let created_at = parse_timestamp(required_str(record, CREATED_AT_KEY)?)?;
    let updated_at = parse_timestamp(required_str(record, UPDATED_AT_KEY)?)?;

    let mut fields = Fields::new();
    for (name, raw) in record {
        if crate::primitives::is_reserved(name) {
            continue;
        }
        let value: FieldValue = serde_json::from_value(raw.clone())
            .map_err(|_| StoreError::UnsupportedValue(name.clone()))?;
        fields.insert(name.clone(), value);
    }

    Ok(Entity::from_parts(kind, id, created_at, updated_at, fields))
}

fn required_str<'a>(record: &'a Record, key: &str) -> Result<&'a str, StoreError> {
    record
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::MissingField(key.to_string()))
}

// =============================================================================
// TESTS
// =============================================================================
