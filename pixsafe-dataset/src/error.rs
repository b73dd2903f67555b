//! Error types for pixsafe-dataset crate.

use thiserror::Error;

/// Errors that can occur while scanning datasets or assembling batches.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset root exists but holds zero usable samples.
    #[error("empty dataset: no image samples found")]
    EmptyDataset,

    /// The dataset root is missing or unreadable.
    #[error("dataset root not found: {0}")]
    MissingRoot(String),

    /// A class subdirectory has no entry in the class map.
    #[error("unknown class directory: {0}")]
    UnknownClass(String),

    /// A sample could not be read or decoded.
    #[error("bad sample {path}: {reason}")]
    Sample {
        /// Path of the offending file.
        path: String,
        /// What went wrong with it.
        reason: String,
    },

    /// A batch was requested over zero samples.
    #[error("empty batch: no samples to assemble")]
    EmptyBatch,

    /// A split ratio is out of range.
    #[error("invalid split: {0}")]
    InvalidSplit(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),
}

impl DatasetError {
    /// Creates a missing-root error.
    #[must_use]
    pub fn missing_root(path: impl Into<String>) -> Self {
        Self::MissingRoot(path.into())
    }

    /// Creates an unknown-class error.
    #[must_use]
    pub fn unknown_class(name: impl Into<String>) -> Self {
        Self::UnknownClass(name.into())
    }

    /// Creates a bad-sample error naming the file.
    #[must_use]
    pub fn sample(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Sample {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid-split error.
    #[must_use]
    pub fn invalid_split(reason: impl Into<String>) -> Self {
        Self::InvalidSplit(reason.into())
    }

    /// Creates an IO error.
    #[must_use]
    pub fn io(reason: impl Into<String>) -> Self {
        Self::Io(reason.into())
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;
