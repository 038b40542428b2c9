//! Error types for profile loading and validation.

use thiserror::Error;

/// Errors raised while loading or validating a CPU profile.
///
/// A failed load never touches engine state: the engine keeps whatever
/// profile it had before.
#[derive(Error, Debug)]
pub enum ProfileError {
    /// Profile schema major version is not supported.
    #[error("unsupported profile version {version:?} (expected major {expected_major})")]
    UnsupportedVersion {
        /// Version string found in the document.
        version: String,
        /// Major version this loader understands.
        expected_major: u32,
    },

    /// A required enumerated table has no entries.
    #[error("profile table {table:?} is empty")]
    EmptyTable {
        /// Table name.
        table: &'static str,
    },

    /// A required key is missing from an enumerated table.
    #[error("profile table {table:?} is missing key {key:?}")]
    MissingKey {
        /// Table name.
        table: &'static str,
        /// Missing key.
        key: String,
    },

    /// A numeric field is outside its declared range.
    #[error("profile field {field:?} = {value} outside [{min}, {max}]")]
    OutOfRange {
        /// Field path.
        field: &'static str,
        /// Offending value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },

    /// Filesystem error while reading a profile.
    #[error("profile I/O error: {source}")]
    Io {
        /// Source I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Malformed JSON or schema mismatch.
    #[error("profile JSON error: {source}")]
    Json {
        /// Source JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// Result type for profile operations.
pub type ProfileResult<T> = Result<T, ProfileError>;
