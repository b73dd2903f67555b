//! Training configuration.

use std::path::PathBuf;

use burn::optim::AdamConfig;
use pixsafe_dataset::SplitRatio;
use pixsafe_preprocess::AugmentConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrainingError};

/// Configuration for a training run.
///
/// Defaults match the shipped recipe: 40 epochs, batches of 32, Adam at
/// `1e-3`, per-epoch shuffling, and full augmentation.
///
/// # Example
///
/// ```
/// use pixsafe_training::TrainingConfig;
///
/// let config = TrainingConfig::new("data/train", "weights/pixsafe");
/// assert_eq!(config.epochs, 40);
/// assert_eq!(config.batch_size, 32);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Root directory of the training dataset, one subdirectory per class.
    pub dataset_root: PathBuf,

    /// Checkpoint output path, without extension; the safe-format
    /// extension is appended on save.
    pub checkpoint_path: String,

    /// Number of training epochs.
    pub epochs: usize,

    /// Batch size.
    pub batch_size: usize,

    /// Square side length images are resized to.
    pub image_size: usize,

    /// Optimizer configuration.
    pub optimizer: OptimizerConfig,

    /// Augmentation recipe; `None` trains on unaugmented images.
    pub augment: Option<AugmentConfig>,

    /// Random seed for shuffling, splitting, and augmentation draws.
    /// `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Hold-out ratio for validation; `None` trains on everything.
    pub val_split: Option<SplitRatio>,
}

impl TrainingConfig {
    /// Creates a training config for a dataset root and checkpoint path.
    #[must_use]
    pub fn new(dataset_root: impl Into<PathBuf>, checkpoint_path: impl Into<String>) -> Self {
        Self {
            dataset_root: dataset_root.into(),
            checkpoint_path: checkpoint_path.into(),
            epochs: 40,
            batch_size: 32,
            image_size: pixsafe_preprocess::DEFAULT_IMAGE_SIZE,
            optimizer: OptimizerConfig::default(),
            augment: Some(AugmentConfig::default()),
            seed: None,
            val_split: None,
        }
    }

    /// Sets the epoch count.
    #[must_use]
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Sets the batch size.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the image side length.
    #[must_use]
    pub fn with_image_size(mut self, image_size: usize) -> Self {
        self.image_size = image_size;
        self
    }

    /// Sets the optimizer configuration.
    #[must_use]
    pub fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Sets the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the validation hold-out ratio.
    #[must_use]
    pub fn with_val_split(mut self, ratio: SplitRatio) -> Self {
        self.val_split = Some(ratio);
        self
    }

    /// Disables augmentation.
    #[must_use]
    pub fn without_augmentation(mut self) -> Self {
        self.augment = None;
        self
    }

    /// Validates the configuration, naming the first problem found.
    ///
    /// # Errors
    ///
    /// Returns [`TrainingError::InvalidConfig`] when a field is out of
    /// range.
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(TrainingError::invalid_config("epochs must be > 0"));
        }
        if self.batch_size == 0 {
            return Err(TrainingError::invalid_config("batch_size must be > 0"));
        }
        if self.image_size == 0 {
            return Err(TrainingError::invalid_config("image_size must be > 0"));
        }
        if self.checkpoint_path.is_empty() {
            return Err(TrainingError::invalid_config("checkpoint_path is empty"));
        }
        if !self.optimizer.is_valid() {
            return Err(TrainingError::invalid_config(
                "optimizer parameters out of range",
            ));
        }
        Ok(())
    }
}

/// Adam optimizer configuration.
///
/// # Example
///
/// ```
/// use pixsafe_training::OptimizerConfig;
///
/// let adam = OptimizerConfig::adam(1e-3);
/// assert!((adam.learning_rate - 1e-3).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Learning rate.
    pub learning_rate: f64,

    /// First-moment decay.
    pub beta1: f32,

    /// Second-moment decay.
    pub beta2: f32,

    /// Epsilon for numerical stability.
    pub epsilon: f32,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::adam(1e-3)
    }
}

impl OptimizerConfig {
    /// Creates an Adam optimizer config with standard moment decays.
    #[must_use]
    pub const fn adam(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
        }
    }

    /// Validates the configuration.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.learning_rate > 0.0
            && (0.0..1.0).contains(&self.beta1)
            && (0.0..1.0).contains(&self.beta2)
            && self.epsilon > 0.0
    }

    /// Builds the Burn optimizer configuration.
    #[must_use]
    pub fn init(&self) -> AdamConfig {
        AdamConfig::new()
            .with_beta_1(self.beta1)
            .with_beta_2(self.beta2)
            .with_epsilon(self.epsilon)
    }
}
