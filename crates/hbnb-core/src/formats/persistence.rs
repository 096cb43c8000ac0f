//! # Persistence Format
//!
//! JSON serialization of the whole store.
//!
//! Format: a single JSON object whose keys are `"{Kind}.{identity}"` and whose
//! values are codec records. Key order is the registry's insertion order.
//!
//! ## Validation
//!
//! `store_from_bytes` checks, before handing anything to the registry:
//! - Maximum payload size (`MAX_STORE_FILE_SIZE`)
//! - Root is a JSON object and every value is an object
//! - Every record decodes, and its key equals `"{Kind}.{identity}"`
//!
//! Any failure is reported as `StoreError::CorruptStore`.

use crate::codec::{self, Record};
use crate::entity::Entity;
use crate::primitives::MAX_STORE_FILE_SIZE;
use crate::StoreError;
use indexmap::IndexMap;
use serde_json::{Map, Value};

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize entities (keyed by registry key) to JSON bytes.
///
/// This is a pure transformation - no file I/O.
pub fn store_to_bytes(objects: &IndexMap<String, Entity>) -> Result<Vec<u8>, StoreError> {
    let mut root = Map::with_capacity(objects.len());
    for (key, entity) in objects {
        root.insert(key.clone(), Value::Object(codec::encode(entity)?));
    }
    serde_json::to_vec(&Value::Object(root)).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Deserialize JSON bytes into entities keyed by registry key.
///
/// This is a pure transformation - no file I/O.
pub fn store_from_bytes(bytes: &[u8]) -> Result<IndexMap<String, Entity>, StoreError> {
    if bytes.len() as u64 > MAX_STORE_FILE_SIZE {
        return Err(StoreError::CorruptStore(format!(
            "store size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_STORE_FILE_SIZE
        )));
    }

    let root: Value = serde_json::from_slice(bytes)
        .map_err(|e| StoreError::CorruptStore(format!("invalid JSON: {}", e)))?;
    let Value::Object(root) = root else {
        return Err(StoreError::CorruptStore(
            "root is not a JSON object".to_string(),
        ));
    };

    let mut objects = IndexMap::with_capacity(root.len());
    for (key, value) in root {
        let record: Record = match value {
            Value::Object(record) => record,
            _ => {
                return Err(StoreError::CorruptStore(format!(
                    "record {} is not a JSON object",
                    key
                )));
            }
        };
        let entity = codec::decode(&record)
            .map_err(|e| StoreError::CorruptStore(format!("record {}: {}", key, e)))?;
        if entity.key() != key {
            return Err(StoreError::CorruptStore(format!(
                "record {} holds {}",
                key,
                entity.key()
            )));
        }
        objects.insert(key, entity);
    }
    Ok(objects)
}

// =============================================================================
// TESTS
// =============================================================================
