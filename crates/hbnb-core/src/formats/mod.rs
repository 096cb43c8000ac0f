//! # Formats
//!
//! On-disk representation of the store. Pure byte transformations only;
//! file I/O lives in the registry.

pub mod persistence;

pub use persistence::{store_from_bytes, store_to_bytes};
