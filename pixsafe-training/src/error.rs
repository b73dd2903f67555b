//! Error types for pixsafe-training crate.

use thiserror::Error;

/// Errors that can occur during training.
#[derive(Debug, Error)]
pub enum TrainingError {
    /// Invalid training configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Dataset error.
    #[error("dataset error: {0}")]
    Dataset(String),

    /// Model error.
    #[error("model error: {0}")]
    Model(String),

    /// Loss computation or metric extraction error.
    #[error("loss error: {0}")]
    Loss(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),
}

impl TrainingError {
    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Creates a dataset error.
    #[must_use]
    pub fn dataset(reason: impl Into<String>) -> Self {
        Self::Dataset(reason.into())
    }

    /// Creates a model error.
    #[must_use]
    pub fn model(reason: impl Into<String>) -> Self {
        Self::Model(reason.into())
    }

    /// Creates a loss error.
    #[must_use]
    pub fn loss(reason: impl Into<String>) -> Self {
        Self::Loss(reason.into())
    }

    /// Creates an IO error.
    #[must_use]
    pub fn io(reason: impl Into<String>) -> Self {
        Self::Io(reason.into())
    }

    /// Returns `true` if the underlying cause was an empty dataset.
    #[must_use]
    pub fn is_empty_dataset(&self) -> bool {
        matches!(self, Self::Dataset(msg) if msg.contains("empty dataset"))
    }
}

impl From<std::io::Error> for TrainingError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TrainingError {
    fn from(err: serde_json::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<pixsafe_dataset::DatasetError> for TrainingError {
    fn from(err: pixsafe_dataset::DatasetError) -> Self {
        Self::Dataset(err.to_string())
    }
}

impl From<pixsafe_models::ModelError> for TrainingError {
    fn from(err: pixsafe_models::ModelError) -> Self {
        Self::Model(err.to_string())
    }
}

impl From<pixsafe_preprocess::PreprocessError> for TrainingError {
    fn from(err: pixsafe_preprocess::PreprocessError) -> Self {
        Self::Dataset(err.to_string())
    }
}

/// Result type for training operations.
pub type Result<T> = std::result::Result<T, TrainingError>;
