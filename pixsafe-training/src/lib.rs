//! Training loop, configuration, and metrics for the pixsafe classifier.
//!
//! [`Trainer`] owns the whole procedure: scan a folder dataset against an
//! explicit class map, optionally hold out a validation split, run the
//! epoch loop (shuffle, batch, forward, cross-entropy, Adam step), and
//! finish by writing a safe-format checkpoint. Failures are loud and
//! final: an empty dataset aborts before any parameter update, and a
//! single unreadable sample aborts the run.
//!
//! Progress is reported through `tracing`; per-epoch numbers also land in
//! the returned [`TrainingMetrics`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod config;
mod error;
mod metrics;
mod trainer;

pub use config::{OptimizerConfig, TrainingConfig};
pub use error::{Result, TrainingError};
pub use metrics::{EpochMetrics, TrainingMetrics};
pub use trainer::{Trainer, TrainingReport};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        EpochMetrics, OptimizerConfig, Trainer, TrainingConfig, TrainingError, TrainingMetrics,
        TrainingReport,
    };
}
