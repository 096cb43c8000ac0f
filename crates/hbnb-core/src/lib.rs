//! # hbnb-core
//!
//! The object registry and persistence engine for hbnb - THE STORE.
//!
//! This crate holds live entity instances of a closed set of kinds
//! (`BaseModel`, `User`, `State`, `City`, `Amenity`, `Place`, `Review`) and
//! round-trips them to a single JSON-encoded file.
//!
//! ## Layers
//!
//! - `types`: kinds, scalar field values, `StoreError`
//! - `entity`: identity, timestamps, open fields, canonical rendering
//! - `codec`: entity <-> flat record
//! - `formats`: whole-store JSON document, with size and shape validation
//! - `registry`: keyed in-memory map with save/reload
//!
//! ## Architectural Constraints
//!
//! - No async, no network, no terminal I/O
//! - No logging: every failure is a `StoreError` returned to the caller
//! - Single writer: the registry is an owned value, mutated through `&mut`

// =============================================================================
// MODULES
// =============================================================================

pub mod codec;
pub mod entity;
pub mod formats;
pub mod primitives;
pub mod registry;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{FieldType, FieldValue, Kind, StoreError};

// =============================================================================
// RE-EXPORTS: Store
// =============================================================================

pub use codec::{Record, decode, encode};
pub use entity::{Entity, Fields, key_for};
pub use registry::Registry;

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{store_from_bytes, store_to_bytes};
