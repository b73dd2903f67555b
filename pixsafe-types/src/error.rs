//! Error types for pixsafe-types crate.

use thiserror::Error;

/// Errors that can occur when working with class labels and mappings.
#[derive(Debug, Error)]
pub enum LabelError {
    /// A class index has no label in the mapping.
    #[error("unknown class index: {0}")]
    UnknownIndex(usize),

    /// A class name has no index in the mapping.
    #[error("unknown class name: {0}")]
    UnknownName(String),

    /// The mapping itself is malformed.
    #[error("invalid class map: {0}")]
    InvalidMap(String),
}

impl LabelError {
    /// Creates an unknown-index error.
    #[must_use]
    pub fn unknown_index(index: usize) -> Self {
        Self::UnknownIndex(index)
    }

    /// Creates an unknown-name error.
    #[must_use]
    pub fn unknown_name(name: impl Into<String>) -> Self {
        Self::UnknownName(name.into())
    }

    /// Creates an invalid-map error.
    #[must_use]
    pub fn invalid_map(reason: impl Into<String>) -> Self {
        Self::InvalidMap(reason.into())
    }
}

/// Result type for label operations.
pub type Result<T> = std::result::Result<T, LabelError>;
