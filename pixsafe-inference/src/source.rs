//! Image sources: local paths and HTTP URLs.

use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use crate::error::{InferenceError, Result};

/// Upper bound on an HTTP image fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Where an image to classify comes from.
///
/// Exactly one origin: either a file on the local filesystem or an HTTP
/// URL. Resolving a path never touches the network; resolving a URL
/// never touches the filesystem.
///
/// # Example
///
/// ```
/// use pixsafe_inference::ImageSource;
///
/// let local = ImageSource::path("photos/cat.jpg");
/// let remote = ImageSource::url("https://example.com/cat.jpg");
/// assert!(local.is_path());
/// assert!(remote.is_url());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A file on the local filesystem.
    Path(PathBuf),
    /// An HTTP or HTTPS URL.
    Url(String),
}

impl ImageSource {
    /// Creates a local-path source.
    #[must_use]
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Creates a URL source.
    #[must_use]
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// Returns `true` for a local-path source.
    #[must_use]
    pub const fn is_path(&self) -> bool {
        matches!(self, Self::Path(_))
    }

    /// Returns `true` for a URL source.
    #[must_use]
    pub const fn is_url(&self) -> bool {
        matches!(self, Self::Url(_))
    }

    /// A human-readable description of the origin, for error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Url(url) => url.clone(),
        }
    }

    /// Resolves the source to raw image bytes.
    ///
    /// URL fetches are bounded by `timeout`, covering connection and
    /// body; there are no retries.
    ///
    /// # Errors
    ///
    /// - [`InferenceError::ImageNotFound`] for a missing local path
    /// - [`InferenceError::ImageFetch`] for any HTTP transport failure or
    ///   non-success status
    /// - [`InferenceError::Io`] for non-missing filesystem failures
    pub fn resolve(&self, timeout: Duration) -> Result<Vec<u8>> {
        match self {
            Self::Path(path) => {
                debug!(path = %path.display(), "reading local image");
                std::fs::read(path).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        InferenceError::image_not_found(path.display().to_string())
                    } else {
                        InferenceError::io(e.to_string())
                    }
                })
            }
            Self::Url(url) => {
                debug!(url = %url, timeout_secs = timeout.as_secs(), "fetching image");
                let client = reqwest::blocking::Client::builder()
                    .timeout(timeout)
                    .build()
                    .map_err(|e| InferenceError::image_fetch(url, e.to_string()))?;
                let response = client
                    .get(url)
                    .send()
                    .and_then(reqwest::blocking::Response::error_for_status)
                    .map_err(|e| InferenceError::image_fetch(url, e.to_string()))?;
                let bytes = response
                    .bytes()
                    .map_err(|e| InferenceError::image_fetch(url, e.to_string()))?;
                Ok(bytes.to_vec())
            }
        }
    }
}
