//! CNN architecture and checkpoint persistence for the pixsafe classifier.
//!
//! This crate provides the safety-classification network built with the
//! Burn framework, along with checkpoint save/load functionality.
//!
//! # Architecture
//!
//! [`SafetyClassifier`] is a five-block convolutional network (channels
//! 3 -> 32 -> 64 -> 128 -> 256 -> 512) with batch normalization, spatial
//! downsampling, adaptive average pooling, and a two-layer classification
//! head emitting one logit per class.
//!
//! # Checkpoint Persistence
//!
//! Models save and load their weights through Burn's recorder system:
//! - Named MessagePack (the default; a named, inspectable tensor map)
//! - Binary record stream (legacy checkpoints only, opt-in on load)
//!
//! # Backend Support
//!
//! Models are generic over Burn backends. The CPU `NdArray` backend is
//! always available; GPU support via `wgpu` is behind the `wgpu` feature.
//!
//! # Example
//!
//! ```
//! use pixsafe_models::{NdArrayBackend, SafetyClassifier, SafetyClassifierConfig};
//! use burn::tensor::Tensor;
//!
//! let config = SafetyClassifierConfig::default();
//! let device = Default::default();
//! let model = SafetyClassifier::<NdArrayBackend>::new(&config, &device);
//!
//! let input = Tensor::zeros([1, 3, 64, 64], &device);
//! let logits = model.forward(input);
//! assert_eq!(logits.dims(), [1, 3]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod backend;
mod checkpoint;
mod classifier;
mod error;

pub use classifier::{SafetyClassifier, SafetyClassifierConfig};

pub use checkpoint::{
    load_checkpoint, load_checkpoint_with, save_checkpoint, CheckpointFormat,
};

pub use backend::{BackendType, InferenceBackend, NdArrayBackend, TrainingBackend};

pub use error::{ModelError, Result};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        load_checkpoint, load_checkpoint_with, save_checkpoint, BackendType, CheckpointFormat,
        ModelError, NdArrayBackend, SafetyClassifier, SafetyClassifierConfig, TrainingBackend,
    };
}
