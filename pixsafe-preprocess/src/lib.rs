//! Image decoding, normalization, and training-time augmentation.
//!
//! The [`Preprocessor`] turns raw image bytes into the fixed tensor layout
//! the classifier consumes: RGB, resized to a square side with Lanczos
//! filtering, scaled to `[0, 1]`, then normalized per channel to `[-1, 1]`.
//! Preprocessing is fully deterministic; the same bytes always yield the
//! same tensor.
//!
//! The [`Augmenter`] applies the randomized training-time transforms
//! (horizontal flip, small rotation, color jitter) to the decoded image
//! before resizing. All randomness comes from a caller-supplied RNG, so
//! tests can pin a seed and training owns its own stream.
//!
//! # Example
//!
//! ```
//! use pixsafe_preprocess::Preprocessor;
//!
//! let pre = Preprocessor::new(32);
//! let img = image::DynamicImage::new_rgb8(48, 20);
//! let chw = pre.image_to_chw(&img);
//! assert_eq!(chw.len(), 3 * 32 * 32);
//! // Black pixels normalize to -1.
//! assert!(chw.iter().all(|&v| (v + 1.0).abs() < 1e-6));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod augment;
mod error;
mod transform;

pub use augment::{AugmentConfig, Augmenter};
pub use error::{PreprocessError, Result};
pub use transform::{Preprocessor, DEFAULT_IMAGE_SIZE};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{AugmentConfig, Augmenter, PreprocessError, Preprocessor, DEFAULT_IMAGE_SIZE};
}
