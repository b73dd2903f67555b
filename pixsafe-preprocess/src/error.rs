//! Error types for pixsafe-preprocess crate.

use thiserror::Error;

/// Errors that can occur during preprocessing.
#[derive(Debug, Error)]
pub enum PreprocessError {
    /// The input bytes could not be decoded as an image.
    #[error("failed to decode image {input}: {reason}")]
    ImageDecode {
        /// The path, URL, or other description of the offending input.
        input: String,
        /// The decoder's failure message.
        reason: String,
    },

    /// The requested output size is unusable.
    #[error("invalid target size: {0}")]
    InvalidSize(String),
}

impl PreprocessError {
    /// Creates an image-decode error naming the offending input.
    #[must_use]
    pub fn image_decode(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ImageDecode {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid-size error.
    #[must_use]
    pub fn invalid_size(reason: impl Into<String>) -> Self {
        Self::InvalidSize(reason.into())
    }
}

/// Result type for preprocessing operations.
pub type Result<T> = std::result::Result<T, PreprocessError>;
