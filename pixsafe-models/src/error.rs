//! Error types for pixsafe-models crate.

use thiserror::Error;

/// Errors that can occur when building models or moving checkpoints.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Invalid model configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The checkpoint file does not exist.
    #[error("checkpoint not found: {0}")]
    CheckpointNotFound(String),

    /// The checkpoint exists but does not match the model.
    #[error("checkpoint mismatch at {path}: {reason}")]
    CheckpointMismatch {
        /// Path to the offending checkpoint.
        path: String,
        /// What failed to line up.
        reason: String,
    },

    /// Writing a checkpoint failed.
    #[error("failed to save checkpoint to {path}: {reason}")]
    SaveCheckpoint {
        /// Intended output path.
        path: String,
        /// The recorder's failure message.
        reason: String,
    },

    /// The path's extension names no known checkpoint format.
    #[error("unsupported checkpoint format: {0}")]
    UnsupportedFormat(String),

    /// The checkpoint is in the legacy encoding and legacy loads were not
    /// explicitly enabled.
    #[error("legacy checkpoint format disabled: {0} (enable legacy loads to read it)")]
    LegacyFormatDisabled(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),
}

impl ModelError {
    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Creates a checkpoint-not-found error.
    #[must_use]
    pub fn checkpoint_not_found(path: impl Into<String>) -> Self {
        Self::CheckpointNotFound(path.into())
    }

    /// Creates a checkpoint-mismatch error.
    #[must_use]
    pub fn checkpoint_mismatch(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CheckpointMismatch {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a save-checkpoint error.
    #[must_use]
    pub fn save_checkpoint(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SaveCheckpoint {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unsupported-format error.
    #[must_use]
    pub fn unsupported_format(path: impl Into<String>) -> Self {
        Self::UnsupportedFormat(path.into())
    }

    /// Creates a legacy-format-disabled error.
    #[must_use]
    pub fn legacy_format_disabled(path: impl Into<String>) -> Self {
        Self::LegacyFormatDisabled(path.into())
    }

    /// Creates an IO error.
    #[must_use]
    pub fn io(reason: impl Into<String>) -> Self {
        Self::Io(reason.into())
    }
}

impl From<std::io::Error> for ModelError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
