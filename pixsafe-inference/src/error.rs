//! Error types for pixsafe-inference crate.

use thiserror::Error;

/// Errors that can occur while acquiring images or predicting.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// The local image path does not exist.
    #[error("image not found: {0}")]
    ImageNotFound(String),

    /// Fetching the image over HTTP failed.
    #[error("failed to fetch image from {url}: {reason}")]
    ImageFetch {
        /// The URL that failed.
        url: String,
        /// Transport or status failure.
        reason: String,
    },

    /// The bytes could not be decoded as an image.
    #[error("decode error: {0}")]
    Decode(String),

    /// Model construction or checkpoint loading failed.
    #[error("model error: {0}")]
    Model(String),

    /// Class-map lookup failed.
    #[error("label error: {0}")]
    Label(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),
}

impl InferenceError {
    /// Creates an image-not-found error.
    #[must_use]
    pub fn image_not_found(path: impl Into<String>) -> Self {
        Self::ImageNotFound(path.into())
    }

    /// Creates an image-fetch error naming the URL.
    #[must_use]
    pub fn image_fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ImageFetch {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode(reason.into())
    }

    /// Creates a model error.
    #[must_use]
    pub fn model(reason: impl Into<String>) -> Self {
        Self::Model(reason.into())
    }

    /// Creates an IO error.
    #[must_use]
    pub fn io(reason: impl Into<String>) -> Self {
        Self::Io(reason.into())
    }
}

impl From<pixsafe_preprocess::PreprocessError> for InferenceError {
    fn from(err: pixsafe_preprocess::PreprocessError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<pixsafe_models::ModelError> for InferenceError {
    fn from(err: pixsafe_models::ModelError) -> Self {
        Self::Model(err.to_string())
    }
}

impl From<pixsafe_types::LabelError> for InferenceError {
    fn from(err: pixsafe_types::LabelError) -> Self {
        Self::Label(err.to_string())
    }
}

impl From<std::io::Error> for InferenceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for inference operations.
pub type Result<T> = std::result::Result<T, InferenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_image_not_found() {
        let err = InferenceError::image_not_found("/tmp/missing.jpg");
        assert!(err.to_string().contains("image not found"));
        assert!(err.to_string().contains("/tmp/missing.jpg"));
    }

    #[test]
    fn error_image_fetch_names_url() {
        let err = InferenceError::image_fetch("http://example.com/a.png", "404 Not Found");
        let msg = err.to_string();
        assert!(msg.contains("http://example.com/a.png"));
        assert!(msg.contains("404"));
    }

    #[test]
    fn error_from_preprocess_error() {
        let err: InferenceError =
            pixsafe_preprocess::PreprocessError::image_decode("a.png", "bad header").into();
        assert!(matches!(err, InferenceError::Decode(_)));
    }

    #[test]
    fn error_from_model_error() {
        let err: InferenceError =
            pixsafe_models::ModelError::checkpoint_not_found("model.mpk").into();
        assert!(matches!(err, InferenceError::Model(_)));
    }
}
