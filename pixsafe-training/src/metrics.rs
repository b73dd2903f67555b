//! Training metrics.

use serde::{Deserialize, Serialize};

/// Metrics for a single training epoch.
///
/// Loss is the sample-weighted mean: every batch contributes its loss
/// times its batch size, and the sum is divided by the number of samples,
/// so a short final batch doesn't skew the average.
///
/// # Example
///
/// ```
/// use pixsafe_training::EpochMetrics;
///
/// let metrics = EpochMetrics::new(0, 0.9, 0.55);
/// assert_eq!(metrics.epoch, 0);
/// assert!((metrics.train_accuracy - 0.55).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// Epoch number (0-indexed).
    pub epoch: usize,

    /// Sample-weighted training loss.
    pub train_loss: f32,

    /// Fraction of training samples classified correctly.
    pub train_accuracy: f32,

    /// Validation loss (if a hold-out set was configured).
    pub val_loss: Option<f32>,

    /// Validation accuracy (if a hold-out set was configured).
    pub val_accuracy: Option<f32>,

    /// Number of training samples processed.
    pub train_samples: usize,

    /// Epoch wall time in seconds.
    pub time_secs: f32,
}

impl EpochMetrics {
    /// Creates new epoch metrics.
    #[must_use]
    pub const fn new(epoch: usize, train_loss: f32, train_accuracy: f32) -> Self {
        Self {
            epoch,
            train_loss,
            train_accuracy,
            val_loss: None,
            val_accuracy: None,
            train_samples: 0,
            time_secs: 0.0,
        }
    }

    /// Attaches validation results.
    #[must_use]
    pub const fn with_validation(mut self, loss: f32, accuracy: f32) -> Self {
        self.val_loss = Some(loss);
        self.val_accuracy = Some(accuracy);
        self
    }

    /// Sets the sample count.
    #[must_use]
    pub const fn with_samples(mut self, train_samples: usize) -> Self {
        self.train_samples = train_samples;
        self
    }

    /// Sets the epoch wall time.
    #[must_use]
    pub const fn with_time(mut self, secs: f32) -> Self {
        self.time_secs = secs;
        self
    }
}

/// Aggregate metrics for a training run.
///
/// # Example
///
/// ```
/// use pixsafe_training::{EpochMetrics, TrainingMetrics};
///
/// let mut metrics = TrainingMetrics::new();
/// metrics.add_epoch(EpochMetrics::new(0, 1.1, 0.4));
/// metrics.add_epoch(EpochMetrics::new(1, 0.8, 0.6));
///
/// assert_eq!(metrics.epochs_completed(), 2);
/// assert!((metrics.final_loss() - 0.8).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Metrics for each epoch.
    pub epoch_metrics: Vec<EpochMetrics>,

    /// Best validation loss seen.
    pub best_val_loss: Option<f32>,

    /// Epoch with best validation loss.
    pub best_epoch: Option<usize>,

    /// Total training time in seconds.
    pub total_time_secs: f32,
}

impl TrainingMetrics {
    /// Creates new empty training metrics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds metrics for an epoch.
    pub fn add_epoch(&mut self, metrics: EpochMetrics) {
        if let Some(val_loss) = metrics.val_loss {
            if self.best_val_loss.is_none() || val_loss < self.best_val_loss.unwrap_or(f32::MAX) {
                self.best_val_loss = Some(val_loss);
                self.best_epoch = Some(metrics.epoch);
            }
        }

        self.total_time_secs += metrics.time_secs;
        self.epoch_metrics.push(metrics);
    }

    /// Returns the number of completed epochs.
    #[must_use]
    pub fn epochs_completed(&self) -> usize {
        self.epoch_metrics.len()
    }

    /// Returns the final training loss.
    #[must_use]
    pub fn final_loss(&self) -> f32 {
        self.epoch_metrics.last().map_or(f32::NAN, |m| m.train_loss)
    }

    /// Returns the final training accuracy.
    #[must_use]
    pub fn final_accuracy(&self) -> f32 {
        self.epoch_metrics
            .last()
            .map_or(f32::NAN, |m| m.train_accuracy)
    }

    /// Returns the initial training loss.
    #[must_use]
    pub fn initial_loss(&self) -> f32 {
        self.epoch_metrics
            .first()
            .map_or(f32::NAN, |m| m.train_loss)
    }

    /// Returns the loss improvement ratio over the run.
    #[must_use]
    pub fn loss_improvement(&self) -> f32 {
        let initial = self.initial_loss();
        let final_loss = self.final_loss();
        if initial > 0.0 && !initial.is_nan() && !final_loss.is_nan() {
            1.0 - (final_loss / initial)
        } else {
            0.0
        }
    }

    /// Returns training losses as a vector.
    #[must_use]
    pub fn train_losses(&self) -> Vec<f32> {
        self.epoch_metrics.iter().map(|m| m.train_loss).collect()
    }

    /// Returns a human-readable summary.
    #[must_use]
    #[allow(clippy::let_underscore_must_use)] // String::write_fmt is infallible
    pub fn summary(&self) -> String {
        use std::fmt::Write;

        let mut s = String::new();
        let _ = writeln!(s, "Training Summary");
        let _ = writeln!(s, "================");
        let _ = writeln!(s, "Epochs completed: {}", self.epochs_completed());
        let _ = writeln!(s, "Total time: {:.1}s", self.total_time_secs);
        let _ = writeln!(
            s,
            "Initial loss: {:.4} -> Final loss: {:.4}",
            self.initial_loss(),
            self.final_loss()
        );
        let _ = writeln!(s, "Final accuracy: {:.1}%", self.final_accuracy() * 100.0);

        if let Some(best) = self.best_val_loss {
            let _ = writeln!(
                s,
                "Best val loss: {:.4} (epoch {})",
                best,
                self.best_epoch.unwrap_or(0)
            );
        }

        s
    }
}
