//! # Registry
//!
//! The in-memory keyed collection of live entities plus its file persistence.
//!
//! Keys are `"{Kind}.{identity}"`. The map is the single source of truth while
//! the process runs; the backing file mirrors it after each `save()`.
//!
//! ## Backing file states
//!
//! ```text
//! {absent}  --reload--> {empty in memory, absent on disk}
//! {any}     --save----> {memory mirrored on disk}
//! {present} --reload--> {memory mirrors disk}
//! ```
//!
//! `delete` never saves by itself: a destroy followed by a crash before the
//! next save resurrects the entity on reload.

use crate::entity::{Entity, Fields, key_for};
use crate::formats::{store_from_bytes, store_to_bytes};
use crate::primitives::MAX_STORE_FILE_SIZE;
use crate::{Kind, StoreError};
use indexmap::IndexMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Registry of live entities backed by a single JSON file.
///
/// Single-writer: the registry is owned by one caller and mutated through
/// `&mut self`. No file locking is performed.
#[derive(Debug)]
pub struct Registry {
    /// Live entities keyed by `"{Kind}.{identity}"`, in insertion order.
    objects: IndexMap<String, Entity>,
    /// Location of the backing file.
    path: PathBuf,
}

impl Registry {
    /// Create an empty registry bound to `path` without touching the disk.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            objects: IndexMap::new(),
            path: path.into(),
        }
    }

    /// Create a registry bound to `path` and load whatever the file holds.
    ///
    /// A missing file yields an empty registry.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let mut registry = Self::new(path);
        registry.reload()?;
        Ok(registry)
    }

    /// The backing file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The live mapping.
    #[must_use]
    pub fn all(&self) -> &IndexMap<String, Entity> {
        &self.objects
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }

    #[must_use]
    pub fn get(&self, kind: Kind, id: &str) -> Option<&Entity> {
        self.objects.get(&key_for(kind, id))
    }

    pub fn get_mut(&mut self, kind: Kind, id: &str) -> Option<&mut Entity> {
        self.objects.get_mut(&key_for(kind, id))
    }

    /// Insert an entity under its key.
    ///
    /// Fails with `DuplicateIdentity` if the key is already present.
    pub fn register(&mut self, entity: Entity) -> Result<String, StoreError> {
        let key = entity.key();
        if self.objects.contains_key(&key) {
            return Err(StoreError::DuplicateIdentity(key));
        }
        self.objects.insert(key.clone(), entity);
        Ok(key)
    }

    /// Create a new entity of `kind` and register it.
    pub fn create(&mut self, kind: Kind, fields: Fields) -> Result<&Entity, StoreError> {
        let entity = Entity::new(kind, fields);
        let key = entity.key();
        if self.objects.contains_key(&key) {
            return Err(StoreError::DuplicateIdentity(key));
        }
        Ok(self.objects.entry(key).or_insert(entity))
    }

    /// Remove the entry for `key`. Returns whether something was removed.
    ///
    /// Insertion order of the remaining entries is preserved.
    pub fn delete(&mut self, key: &str) -> bool {
        self.objects.shift_remove(key).is_some()
    }

    /// Number of live entities of `kind`.
    #[must_use]
    pub fn count(&self, kind: Kind) -> usize {
        self.of_kind(Some(kind)).count()
    }

    /// Entities in insertion order, optionally restricted to one kind.
    pub fn of_kind(&self, kind: Option<Kind>) -> impl Iterator<Item = &Entity> {
        self.objects
            .values()
            .filter(move |entity| kind.is_none_or(|k| entity.kind() == k))
    }

    /// Serialize every entity and atomically replace the backing file.
    ///
    /// The new content is written to a temporary file in the same directory
    /// and renamed over the target. Timestamps are not touched.
    pub fn save(&self) -> Result<(), StoreError> {
        let data = store_to_bytes(&self.objects)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| StoreError::Io(format!("create temp file in {}: {}", dir.display(), e)))?;
        tmp.write_all(&data)
            .and_then(|()| tmp.flush())
            .map_err(|e| StoreError::Io(format!("write temp file: {}", e)))?;
        tmp.persist(&self.path).map_err(|e| {
            StoreError::Io(format!("replace {}: {}", self.path.display(), e.error))
        })?;
        Ok(())
    }

    /// Replace the in-memory map with the content of the backing file.
    ///
    /// A missing file empties the registry and is not an error. A present but
    /// malformed file fails with `CorruptStore` and leaves the map untouched.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        let metadata = match std::fs::metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.objects = IndexMap::new();
                return Ok(());
            }
            Err(e) => {
                return Err(StoreError::Io(format!(
                    "read metadata of {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        if metadata.len() > MAX_STORE_FILE_SIZE {
            return Err(StoreError::CorruptStore(format!(
                "store size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_STORE_FILE_SIZE
            )));
        }

        let data = std::fs::read(&self.path)
            .map_err(|e| StoreError::Io(format!("read {}: {}", self.path.display(), e)))?;
        self.objects = store_from_bytes(&data)?;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldValue;

    #[test]
    fn register_rejects_duplicate_key() {
        let mut registry = Registry::new("unused.json");
        let entity = Entity::new(Kind::User, Fields::new());
        let copy = entity.clone();

        registry.register(entity).expect("first");
        let result = registry.register(copy);

        assert!(matches!(result, Err(StoreError::DuplicateIdentity(_))));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn create_registers_under_kind_key() {
        let mut registry = Registry::new("unused.json");
        let id = registry
            .create(Kind::Place, Fields::new())
            .expect("create")
            .id()
            .to_string();

        assert!(registry.contains(&format!("Place.{}", id)));
        assert!(registry.get(Kind::Place, &id).is_some());
        assert!(registry.get(Kind::User, &id).is_none());
    }

    #[test]
    fn delete_reports_removal() {
        let mut registry = Registry::new("unused.json");
        let key = registry
            .register(Entity::new(Kind::City, Fields::new()))
            .expect("register");

        assert!(registry.delete(&key));
        assert!(!registry.delete(&key));
        assert!(registry.is_empty());
    }

    #[test]
    fn count_and_filter_by_kind() {
        let mut registry = Registry::new("unused.json");
        for kind in [Kind::User, Kind::User, Kind::State, Kind::Place] {
            registry.create(kind, Fields::new()).expect("create");
        }

        assert_eq!(registry.count(Kind::User), 2);
        assert_eq!(registry.count(Kind::State), 1);
        assert_eq!(registry.count(Kind::Review), 0);
        assert_eq!(registry.of_kind(None).count(), 4);
    }

    #[test]
    fn get_mut_edits_in_place() {
        let mut registry = Registry::new("unused.json");
        let id = registry
            .create(Kind::Amenity, Fields::new())
            .expect("create")
            .id()
            .to_string();

        registry
            .get_mut(Kind::Amenity, &id)
            .expect("entity")
            .set_field("name", FieldValue::from("Wifi"));

        assert_eq!(
            registry.get(Kind::Amenity, &id).and_then(|e| e.field("name")),
            Some(&FieldValue::from("Wifi"))
        );
    }
}
