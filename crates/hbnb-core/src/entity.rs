//! # Entity
//!
//! A record with an identity, two timestamps and an open map of scalar fields.
//!
//! The identity is a UUID v4 string assigned at creation and never reassigned.
//! Timestamps are naive local times truncated to microseconds, which is the
//! precision of the encoded form, so an entity survives encode/decode exactly.

use crate::primitives::{self, TIMESTAMP_FORMAT, TIMESTAMP_PRECISION};
use crate::{FieldValue, Kind};
use chrono::{Local, NaiveDateTime, SubsecRound};
use indexmap::IndexMap;
use std::fmt;

/// Insertion-ordered map of open fields.
pub type Fields = IndexMap<String, FieldValue>;

/// Current local time at store precision.
#[must_use]
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(TIMESTAMP_PRECISION)
}

/// Registry key for a kind and identity: `"{Kind}.{identity}"`.
#[must_use]
pub fn key_for(kind: Kind, id: &str) -> String {
    format!("{}.{}", kind.name(), id)
}

/// A live entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    kind: Kind,
    id: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    fields: Fields,
}

impl Entity {
    /// Create a fresh entity with a new identity and `created_at == updated_at == now()`.
    ///
    /// Reserved names (`id`, timestamps, `__class__`) in `fields` are dropped.
    #[must_use]
    pub fn new(kind: Kind, fields: Fields) -> Self {
        let stamp = now();
        let mut entity = Self {
            kind,
            id: uuid::Uuid::new_v4().to_string(),
            created_at: stamp,
            updated_at: stamp,
            fields: Fields::new(),
        };
        for (name, value) in fields {
            entity.set_field(name, value);
        }
        entity
    }

    /// Create a fresh entity from a kind name.
    ///
    /// Fails with `StoreError::InvalidKind` if the name is not a known kind.
    pub fn with_kind_name(kind: &str, fields: Fields) -> Result<Self, crate::StoreError> {
        Ok(Self::new(kind.parse()?, fields))
    }

    /// Assemble an entity from already-known parts (used by the codec).
    pub(crate) fn from_parts(
        kind: Kind,
        id: String,
        created_at: NaiveDateTime,
        updated_at: NaiveDateTime,
        fields: Fields,
    ) -> Self {
        Self {
            kind,
            id,
            created_at,
            updated_at,
            fields,
        }
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> NaiveDateTime {
        self.updated_at
    }

    #[must_use]
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// The registry key of this entity.
    #[must_use]
    pub fn key(&self) -> String {
        key_for(self.kind, &self.id)
    }

    /// Look up an open field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Overwrite or add an open field, keeping the original position of an
    /// existing key.
    ///
    /// Returns `false` (and changes nothing) for reserved names.
    pub fn set_field(&mut self, name: impl Into<String>, value: FieldValue) -> bool {
        let name = name.into();
        if primitives::is_reserved(&name) {
            return false;
        }
        self.fields.insert(name, value);
        true
    }

    /// Refresh `updated_at`.
    ///
    /// Never moves the timestamp backwards, even if the wall clock does.
    pub fn touch(&mut self) {
        self.updated_at = now().max(self.updated_at);
    }

    /// The canonical human-readable line:
    /// `[{Kind}] ({identity}) {'id': ..., 'created_at': ..., 'updated_at': ..., <fields>}`.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] ({}) {{'id': {}, 'created_at': {}, 'updated_at': {}",
            self.kind,
            self.id,
            crate::types::quote_literal(&self.id),
            crate::types::quote_literal(&self.created_at.format(TIMESTAMP_FORMAT).to_string()),
            crate::types::quote_literal(&self.updated_at.format(TIMESTAMP_FORMAT).to_string()),
        )?;
        for (name, value) in &self.fields {
            write!(f, ", {}: {}", crate::types::quote_literal(name), value.to_literal())?;
        }
        f.write_str("}")
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn new_entity_has_equal_timestamps() {
        let entity = Entity::new(Kind::User, Fields::new());
        assert_eq!(entity.created_at(), entity.updated_at());
        assert_eq!(entity.kind(), Kind::User);
        assert!(entity.fields().is_empty());
    }

    #[test]
    fn identities_are_unique() {
        let ids: HashSet<String> = (0..200)
            .map(|_| Entity::new(Kind::BaseModel, Fields::new()).id().to_string())
            .collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn with_kind_name_rejects_unknown() {
        assert!(Entity::with_kind_name("Place", Fields::new()).is_ok());
        assert!(matches!(
            Entity::with_kind_name("MyModel", Fields::new()),
            Err(crate::StoreError::InvalidKind(_))
        ));
    }

    #[test]
    fn touch_is_monotonic_and_keeps_created_at() {
        let mut entity = Entity::new(Kind::City, Fields::new());
        let created = entity.created_at();
        let before = entity.updated_at();

        entity.touch();

        assert!(entity.updated_at() >= before);
        assert_eq!(entity.created_at(), created);
    }

    #[test]
    fn reserved_fields_are_refused() {
        let mut entity = Entity::new(Kind::User, Fields::new());
        let id = entity.id().to_string();

        assert!(!entity.set_field("id", FieldValue::from("other")));
        assert!(!entity.set_field("updated_at", FieldValue::from("x")));
        assert_eq!(entity.id(), id);
        assert!(entity.fields().is_empty());
    }

    #[test]
    fn set_field_keeps_position_on_overwrite() {
        let mut entity = Entity::new(Kind::Place, Fields::new());
        entity.set_field("name", FieldValue::from("Loft"));
        entity.set_field("max_guest", FieldValue::Int(2));
        entity.set_field("name", FieldValue::from("Barn"));

        let names: Vec<&str> = entity.fields().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["name", "max_guest"]);
        assert_eq!(entity.field("name"), Some(&FieldValue::from("Barn")));
    }

    #[test]
    fn render_layout() {
        let mut entity = Entity::new(Kind::User, Fields::new());
        entity.set_field("age", FieldValue::Int(42));
        entity.set_field("first_name", FieldValue::from("Betty"));

        let line = entity.render();
        let prefix = format!("[User] ({}) {{'id': '{}', 'created_at': '", entity.id(), entity.id());
        assert!(line.starts_with(&prefix), "{}", line);
        assert!(line.ends_with(", 'age': 42, 'first_name': 'Betty'}"), "{}", line);
    }

    #[test]
    fn key_combines_kind_and_identity() {
        let entity = Entity::new(Kind::Review, Fields::new());
        assert_eq!(entity.key(), format!("Review.{}", entity.id()));
    }
}
