//! Shared class-label vocabulary for the pixsafe image-safety classifier.
//!
//! This crate defines the three safety classes and the explicit
//! name-to-index mapping that both training and inference consume. The
//! mapping is always supplied as a value, never inferred from filesystem
//! discovery order, so a checkpoint and the labels it is read back with
//! can never drift apart silently.
//!
//! # Example
//!
//! ```
//! use pixsafe_types::{ClassLabel, ClassMap};
//!
//! let map = ClassMap::canonical();
//! assert_eq!(map.label(0), Some("nude"));
//! assert_eq!(map.index_of("safe"), Some(2));
//! assert_eq!(ClassLabel::Suggestive.index(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod label;
mod map;

pub use error::{LabelError, Result};
pub use label::ClassLabel;
pub use map::ClassMap;

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{ClassLabel, ClassMap, LabelError};
}
