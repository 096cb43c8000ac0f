//! # Store Primitives
//!
//! Hardcoded constants shared by the codec, the persistence format and the
//! registry. These are compiled into the binary and are immutable at runtime.

/// Default location of the backing file, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = "file.json";

/// Reserved key carrying the kind name inside an encoded record.
pub const CLASS_KEY: &str = "__class__";

/// Reserved key carrying the identity inside an encoded record.
pub const ID_KEY: &str = "id";

/// Reserved key carrying the creation timestamp.
pub const CREATED_AT_KEY: &str = "created_at";

/// Reserved key carrying the last-update timestamp.
pub const UPDATED_AT_KEY: &str = "updated_at";

/// Names that can never be stored as open fields of an entity.
pub const RESERVED_KEYS: [&str; 4] = [ID_KEY, CREATED_AT_KEY, UPDATED_AT_KEY, CLASS_KEY];

/// Timestamp layout used when encoding (ISO-8601, microsecond precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Timestamp layout accepted when decoding. The fractional part is optional.
pub const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Number of sub-second digits kept on generated timestamps.
///
/// Matches `TIMESTAMP_FORMAT` so that encode -> decode is exact.
pub const TIMESTAMP_PRECISION: u16 = 6;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum size of a store file accepted by `reload` (64 MB).
///
/// Larger files are reported as corrupt before any parsing happens.
pub const MAX_STORE_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Returns true when `name` is one of the reserved record keys.
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    RESERVED_KEYS.contains(&name)
}
