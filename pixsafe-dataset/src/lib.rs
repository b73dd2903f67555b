//! Folder-based image datasets and batch assembly for the pixsafe classifier.
//!
//! A dataset is a directory with one subdirectory per class; subdirectory
//! names are reconciled against an explicit [`ClassMap`](pixsafe_types::ClassMap),
//! so discovery order never decides which index a class gets and an
//! unexpected directory is an error rather than a silently shifted label.
//!
//! [`ImageBatcher`] turns slices of samples into training tensors. Batch
//! assembly is fallible on purpose: a sample that cannot be read or
//! decoded fails the batch with an error naming the file, because training
//! on a silently shrunken batch hides dataset corruption.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod batcher;
mod error;
mod folder;
mod splits;

pub use batcher::{ImageBatch, ImageBatcher};
pub use error::{DatasetError, Result};
pub use folder::{FolderDataset, ImageSample};
pub use splits::{split_samples, SplitRatio};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        split_samples, DatasetError, FolderDataset, ImageBatch, ImageBatcher, ImageSample,
        SplitRatio,
    };
}
