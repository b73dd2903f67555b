//! Image acquisition and prediction for the pixsafe classifier.
//!
//! [`ImageSource`] names exactly one place an image comes from, a local
//! path or an HTTP URL, and resolves it to bytes with a bounded fetch
//! timeout. [`Predictor`] loads a safe-format checkpoint together with
//! the class map it was trained against and turns images into a
//! [`Prediction`]: the full probability vector, the winning index, and
//! the human-readable label.
//!
//! Inference never augments, never retries, and never updates weights;
//! the same image through the same checkpoint always scores the same.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod predictor;
mod source;

pub use error::{InferenceError, Result};
pub use predictor::{Prediction, Predictor};
pub use source::{ImageSource, DEFAULT_FETCH_TIMEOUT};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        ImageSource, InferenceError, Prediction, Predictor, DEFAULT_FETCH_TIMEOUT,
    };
}
