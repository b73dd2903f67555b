//! The training loop.

use std::time::Instant;

use burn::module::AutodiffModule;
use burn::nn::loss::{CrossEntropyLoss, CrossEntropyLossConfig};
use burn::optim::{GradientsParams, Optimizer};
use burn::tensor::backend::{AutodiffBackend, Backend};
use burn::tensor::{ElementConversion, Int, Tensor};
use pixsafe_dataset::{FolderDataset, ImageBatcher, ImageSample};
use pixsafe_models::{
    save_checkpoint, CheckpointFormat, SafetyClassifier, SafetyClassifierConfig,
};
use pixsafe_preprocess::{Augmenter, Preprocessor};
use pixsafe_types::ClassMap;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::config::TrainingConfig;
use crate::error::{Result, TrainingError};
use crate::metrics::{EpochMetrics, TrainingMetrics};

/// Outcome of a completed training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// Full path of the written checkpoint, extension included.
    pub checkpoint_path: String,
    /// Per-epoch and aggregate metrics.
    pub metrics: TrainingMetrics,
}

/// Runs the training procedure for the safety classifier.
///
/// The run is a straight line: scan the dataset (an empty dataset is
/// fatal before any parameter update), optionally hold out a validation
/// split, then for each epoch reshuffle, assemble batches, and take one
/// optimizer step per batch. Any unreadable sample aborts the whole run.
/// The final model is written as a safe-format checkpoint; there is no
/// early stopping and no mid-run persistence.
///
/// # Example
///
/// ```no_run
/// use pixsafe_models::TrainingBackend;
/// use pixsafe_training::{Trainer, TrainingConfig};
/// use pixsafe_types::ClassMap;
///
/// let config = TrainingConfig::new("data/train", "weights/pixsafe");
/// let trainer = Trainer::new(config, ClassMap::canonical());
/// let report = trainer.run::<TrainingBackend>(&Default::default())?;
/// println!("{}", report.metrics.summary());
/// # Ok::<(), pixsafe_training::TrainingError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainingConfig,
    class_map: ClassMap,
}

impl Trainer {
    /// Creates a trainer over a configuration and class map.
    #[must_use]
    pub fn new(config: TrainingConfig, class_map: ClassMap) -> Self {
        Self { config, class_map }
    }

    /// Returns the training configuration.
    #[must_use]
    pub const fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Returns the class map in use.
    #[must_use]
    pub const fn class_map(&self) -> &ClassMap {
        &self.class_map
    }

    /// Runs the full training procedure and writes the checkpoint.
    ///
    /// # Errors
    ///
    /// - [`TrainingError::InvalidConfig`] for an unusable configuration
    /// - [`TrainingError::Dataset`] for scan or batch-assembly failures,
    ///   including an empty dataset
    /// - [`TrainingError::Model`] if the checkpoint cannot be written
    #[allow(clippy::cast_precision_loss, clippy::too_many_lines)]
    pub fn run<B: AutodiffBackend>(&self, device: &B::Device) -> Result<TrainingReport> {
        self.config.validate()?;

        let dataset = FolderDataset::scan(&self.config.dataset_root, &self.class_map)?;
        info!(
            samples = dataset.len(),
            classes = self.class_map.len(),
            epochs = self.config.epochs,
            "starting training run"
        );

        let (mut train_samples, val_samples) = match self.config.val_split {
            Some(ratio) => dataset.split(ratio, self.config.seed),
            None => (dataset.samples().to_vec(), Vec::new()),
        };

        let preprocessor = Preprocessor::try_new(self.config.image_size)
            .map_err(|e| TrainingError::invalid_config(e.to_string()))?;
        let mut train_batcher = ImageBatcher::new(preprocessor);
        if let Some(augment) = self.config.augment {
            train_batcher = train_batcher.with_augmenter(Augmenter::new(augment));
        }
        let val_batcher = ImageBatcher::new(preprocessor);

        let model_config = SafetyClassifierConfig::new(self.class_map.len());
        model_config.validate()?;
        let mut model = SafetyClassifier::<B>::new(&model_config, device);
        let mut optimizer = self.config.optimizer.init().init();
        let loss_fn = CrossEntropyLossConfig::new().init(device);
        let valid_loss_fn: CrossEntropyLoss<B::InnerBackend> =
            CrossEntropyLossConfig::new().init(device);

        let mut rng = self
            .config
            .seed
            .map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);

        let mut metrics = TrainingMetrics::new();
        for epoch in 0..self.config.epochs {
            let start = Instant::now();
            train_samples.shuffle(&mut rng);

            let mut total_loss = 0.0_f32;
            let mut correct = 0_usize;
            for batch_idx in 0..num_batches(train_samples.len(), self.config.batch_size) {
                let (lo, hi) =
                    batch_indices(batch_idx, self.config.batch_size, train_samples.len());
                let batch =
                    train_batcher.batch::<B, _>(&train_samples[lo..hi], device, &mut rng)?;
                let batch_len = hi - lo;

                let logits = model.forward(batch.images);
                let loss = loss_fn.forward(logits.clone(), batch.targets.clone());

                total_loss += loss.clone().into_scalar().elem::<f32>() * batch_len as f32;
                correct += count_correct(&logits, &batch.targets)?;

                let grads = loss.backward();
                let grads = GradientsParams::from_grads(grads, &model);
                model = optimizer.step(self.config.optimizer.learning_rate, model, grads);

                debug!(epoch, batch = batch_idx, size = batch_len, "optimizer step");
            }

            let train_loss = total_loss / train_samples.len() as f32;
            let train_accuracy = correct as f32 / train_samples.len() as f32;
            let mut epoch_metrics = EpochMetrics::new(epoch, train_loss, train_accuracy)
                .with_samples(train_samples.len());

            if !val_samples.is_empty() {
                let (val_loss, val_accuracy) = evaluate(
                    &model.valid(),
                    &val_batcher,
                    &val_samples,
                    self.config.batch_size,
                    &valid_loss_fn,
                    device,
                    &mut rng,
                )?;
                epoch_metrics = epoch_metrics.with_validation(val_loss, val_accuracy);
            }

            let epoch_metrics = epoch_metrics.with_time(start.elapsed().as_secs_f32());
            info!(
                epoch,
                train_loss = epoch_metrics.train_loss,
                train_accuracy = epoch_metrics.train_accuracy,
                val_loss = epoch_metrics.val_loss,
                "epoch complete"
            );
            metrics.add_epoch(epoch_metrics);
        }

        let checkpoint_path = save_checkpoint::<B, _>(
            &model,
            &self.config.checkpoint_path,
            CheckpointFormat::NamedMpk,
        )?;
        info!(path = %checkpoint_path, "checkpoint written");

        Ok(TrainingReport {
            checkpoint_path,
            metrics,
        })
    }
}

/// Number of batches covering `len` samples.
const fn num_batches(len: usize, batch_size: usize) -> usize {
    len.div_ceil(batch_size)
}

/// Half-open sample range of a batch.
const fn batch_indices(batch: usize, batch_size: usize, len: usize) -> (usize, usize) {
    let lo = batch * batch_size;
    let hi = (batch + 1) * batch_size;
    (lo, if hi < len { hi } else { len })
}

/// Counts predictions whose arg-max matches the target.
fn count_correct<B: Backend>(
    logits: &Tensor<B, 2>,
    targets: &Tensor<B, 1, Int>,
) -> Result<usize> {
    let preds = logits
        .clone()
        .argmax(1)
        .into_data()
        .convert::<i64>()
        .to_vec::<i64>()
        .map_err(|e| TrainingError::loss(format!("prediction readback failed: {e:?}")))?;
    let targets = targets
        .clone()
        .into_data()
        .convert::<i64>()
        .to_vec::<i64>()
        .map_err(|e| TrainingError::loss(format!("target readback failed: {e:?}")))?;
    Ok(preds.iter().zip(&targets).filter(|(p, t)| p == t).count())
}

/// Computes loss and accuracy over a hold-out set without updating.
#[allow(clippy::cast_precision_loss)]
fn evaluate<B: Backend>(
    model: &SafetyClassifier<B>,
    batcher: &ImageBatcher,
    samples: &[ImageSample],
    batch_size: usize,
    loss_fn: &CrossEntropyLoss<B>,
    device: &B::Device,
    rng: &mut ChaCha8Rng,
) -> Result<(f32, f32)> {
    let mut total_loss = 0.0_f32;
    let mut correct = 0_usize;
    for batch_idx in 0..num_batches(samples.len(), batch_size) {
        let (lo, hi) = batch_indices(batch_idx, batch_size, samples.len());
        let batch = batcher.batch::<B, _>(&samples[lo..hi], device, rng)?;

        let logits = model.forward(batch.images);
        let loss = loss_fn.forward(logits.clone(), batch.targets.clone());
        total_loss += loss.into_scalar().elem::<f32>() * (hi - lo) as f32;
        correct += count_correct(&logits, &batch.targets)?;
    }
    Ok((
        total_loss / samples.len() as f32,
        correct as f32 / samples.len() as f32,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixsafe_models::TrainingBackend;

    #[test]
    fn batch_arithmetic() {
        assert_eq!(num_batches(10, 4), 3);
        assert_eq!(num_batches(8, 4), 2);
        assert_eq!(num_batches(1, 32), 1);

        assert_eq!(batch_indices(0, 4, 10), (0, 4));
        assert_eq!(batch_indices(2, 4, 10), (8, 10));
    }

    #[test]
    fn run_rejects_invalid_config() {
        let config = TrainingConfig::new("data", "weights/model").with_epochs(0);
        let trainer = Trainer::new(config, ClassMap::canonical());
        let result = trainer.run::<TrainingBackend>(&Default::default());
        assert!(matches!(result, Err(TrainingError::InvalidConfig(_))));
    }

    #[test]
    fn run_fails_fast_on_empty_dataset() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("failed to create temp dir");
        };
        // Class directories exist but contain no images.
        for name in ["nude", "suggestive", "safe"] {
            let created = std::fs::create_dir_all(dir.path().join(name));
            assert!(created.is_ok());
        }

        let checkpoint = dir.path().join("out").join("model");
        let config = TrainingConfig::new(dir.path(), checkpoint.to_string_lossy())
            .with_epochs(1)
            .with_image_size(16);
        let trainer = Trainer::new(config, ClassMap::canonical());

        let result = trainer.run::<TrainingBackend>(&Default::default());
        let Err(err) = result else {
            panic!("expected empty-dataset failure");
        };
        assert!(err.is_empty_dataset());
        // Nothing may be written when the scan fails.
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn run_rejects_unknown_class_directory() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("failed to create temp dir");
        };
        let created = std::fs::create_dir_all(dir.path().join("memes"));
        assert!(created.is_ok());

        let config = TrainingConfig::new(dir.path(), "weights/model")
            .with_epochs(1)
            .with_image_size(16);
        let trainer = Trainer::new(config, ClassMap::canonical());

        let result = trainer.run::<TrainingBackend>(&Default::default());
        assert!(matches!(result, Err(TrainingError::Dataset(_))));
    }
}
