//! Dataset splitting utilities.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::folder::ImageSample;

/// Ratio for splitting datasets into train/validation sets.
///
/// The ratio specifies the proportion of data to use for training.
/// The remainder goes to validation.
///
/// # Example
///
/// ```
/// use pixsafe_dataset::SplitRatio;
///
/// // 80% train, 20% validation
/// let ratio = SplitRatio::new(0.8);
/// assert!((ratio.train_ratio() - 0.8).abs() < 1e-6);
/// assert!((ratio.val_ratio() - 0.2).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitRatio {
    train: f32,
}

impl SplitRatio {
    /// Creates a new split ratio.
    ///
    /// # Arguments
    ///
    /// - `train`: Proportion for training (must be in `(0, 1)`)
    ///
    /// # Panics
    ///
    /// Panics if ratio is not in `(0, 1)`.
    #[must_use]
    pub fn new(train: f32) -> Self {
        assert!(
            train > 0.0 && train < 1.0,
            "Split ratio must be in (0, 1), got {train}"
        );
        Self { train }
    }

    /// Creates a split ratio, returning `None` if invalid.
    #[must_use]
    pub fn try_new(train: f32) -> Option<Self> {
        if train > 0.0 && train < 1.0 {
            Some(Self { train })
        } else {
            None
        }
    }

    /// Returns the training ratio.
    #[must_use]
    pub const fn train_ratio(&self) -> f32 {
        self.train
    }

    /// Returns the validation ratio.
    #[must_use]
    pub fn val_ratio(&self) -> f32 {
        1.0 - self.train
    }

    /// Computes the split point for a given dataset size.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn split_point(&self, total: usize) -> usize {
        (total as f32 * self.train).round() as usize
    }

    /// Common 80/20 split.
    pub const EIGHTY_TWENTY: Self = Self { train: 0.8 };

    /// Common 90/10 split.
    pub const NINETY_TEN: Self = Self { train: 0.9 };
}

impl Default for SplitRatio {
    fn default() -> Self {
        Self::EIGHTY_TWENTY
    }
}

/// Splits samples into shuffled training and validation sets.
///
/// Both sides keep at least one sample; a seed makes the split
/// reproducible.
///
/// # Arguments
///
/// - `samples`: The samples to split
/// - `ratio`: Train/val ratio
/// - `seed`: Optional random seed for reproducibility
///
/// # Returns
///
/// Tuple of `(train, val)` sample vectors.
#[must_use]
pub fn split_samples(
    samples: &[ImageSample],
    ratio: SplitRatio,
    seed: Option<u64>,
) -> (Vec<ImageSample>, Vec<ImageSample>) {
    if samples.len() < 2 {
        return (samples.to_vec(), Vec::new());
    }

    let mut indices: Vec<usize> = (0..samples.len()).collect();
    let mut rng = seed.map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
    indices.shuffle(&mut rng);

    let split = ratio
        .split_point(samples.len())
        .max(1)
        .min(samples.len() - 1);

    let train = indices[..split].iter().map(|&i| samples[i].clone()).collect();
    let val = indices[split..].iter().map(|&i| samples[i].clone()).collect();

    (train, val)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(n: usize) -> Vec<ImageSample> {
        (0..n)
            .map(|i| ImageSample::new(format!("img_{i}.png"), i % 3))
            .collect()
    }

    #[test]
    fn split_ratio_new() {
        let ratio = SplitRatio::new(0.8);
        assert!((ratio.train_ratio() - 0.8).abs() < 1e-6);
        assert!((ratio.val_ratio() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn split_ratio_try_new() {
        assert!(SplitRatio::try_new(0.5).is_some());
        assert!(SplitRatio::try_new(0.0).is_none());
        assert!(SplitRatio::try_new(1.0).is_none());
        assert!(SplitRatio::try_new(-0.5).is_none());
    }

    #[test]
    fn split_ratio_split_point() {
        let ratio = SplitRatio::new(0.8);
        assert_eq!(ratio.split_point(100), 80);
        assert_eq!(ratio.split_point(10), 8);
    }

    #[test]
    fn split_ratio_default() {
        assert!((SplitRatio::default().train_ratio() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn split_samples_basic() {
        let samples = samples(10);
        let (train, val) = split_samples(&samples, SplitRatio::EIGHTY_TWENTY, Some(42));

        assert_eq!(train.len(), 8);
        assert_eq!(val.len(), 2);

        // Verify no duplicates across the two sides
        let mut all: Vec<&ImageSample> = train.iter().chain(val.iter()).collect();
        all.sort_by(|a, b| a.path.cmp(&b.path));
        all.dedup();
        assert_eq!(all.len(), 10);
    }

    #[test]
    fn split_samples_reproducible() {
        let samples = samples(50);
        let (train1, val1) = split_samples(&samples, SplitRatio::EIGHTY_TWENTY, Some(7));
        let (train2, val2) = split_samples(&samples, SplitRatio::EIGHTY_TWENTY, Some(7));

        assert_eq!(train1, train2);
        assert_eq!(val1, val2);
    }

    #[test]
    fn split_samples_tiny_inputs() {
        let one = samples(1);
        let (train, val) = split_samples(&one, SplitRatio::EIGHTY_TWENTY, Some(1));
        assert_eq!(train.len(), 1);
        assert!(val.is_empty());

        let two = samples(2);
        let (train, val) = split_samples(&two, SplitRatio::NINETY_TEN, Some(1));
        assert_eq!(train.len(), 1);
        assert_eq!(val.len(), 1);
    }
}
