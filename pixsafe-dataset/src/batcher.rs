//! Fallible assembly of image batches.

use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor};
use pixsafe_preprocess::{Augmenter, Preprocessor};
use rand::Rng;

use crate::error::{DatasetError, Result};
use crate::folder::ImageSample;

/// A batch of preprocessed images and their targets.
#[derive(Debug, Clone)]
pub struct ImageBatch<B: Backend> {
    /// Normalized images, shape `[batch_size, 3, size, size]`.
    pub images: Tensor<B, 4>,
    /// Class indices, shape `[batch_size]`.
    pub targets: Tensor<B, 1, Int>,
}

/// Assembles labeled image files into training tensors.
///
/// Assembly fails on the first unreadable or undecodable sample, naming
/// the file; bad data aborts the run instead of silently shrinking a
/// batch. When an augmenter is attached, every image gets independent
/// draws from the supplied RNG before resizing.
#[derive(Debug, Clone)]
pub struct ImageBatcher {
    preprocessor: Preprocessor,
    augmenter: Option<Augmenter>,
}

impl ImageBatcher {
    /// Creates a batcher without augmentation.
    #[must_use]
    pub fn new(preprocessor: Preprocessor) -> Self {
        Self {
            preprocessor,
            augmenter: None,
        }
    }

    /// Attaches training-time augmentation.
    #[must_use]
    pub fn with_augmenter(mut self, augmenter: Augmenter) -> Self {
        self.augmenter = Some(augmenter);
        self
    }

    /// Returns the preprocessor in use.
    #[must_use]
    pub const fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    /// Returns `true` if augmentation is attached.
    #[must_use]
    pub const fn augments(&self) -> bool {
        self.augmenter.is_some()
    }

    /// Assembles a batch from labeled files.
    ///
    /// # Errors
    ///
    /// - [`DatasetError::EmptyBatch`] for an empty slice
    /// - [`DatasetError::Sample`] naming the first file that cannot be
    ///   read or decoded
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn batch<B: Backend, R: Rng>(
        &self,
        samples: &[ImageSample],
        device: &B::Device,
        rng: &mut R,
    ) -> Result<ImageBatch<B>> {
        if samples.is_empty() {
            return Err(DatasetError::EmptyBatch);
        }

        let size = self.preprocessor.size();
        let mut data = Vec::with_capacity(samples.len() * 3 * size * size);
        let mut targets = Vec::with_capacity(samples.len());

        for sample in samples {
            let path = sample.path.display().to_string();
            let bytes = std::fs::read(&sample.path)
                .map_err(|e| DatasetError::sample(&path, e.to_string()))?;
            let img = self
                .preprocessor
                .decode(&bytes, &path)
                .map_err(|e| DatasetError::sample(&path, e.to_string()))?;
            let img = match &self.augmenter {
                Some(augmenter) => augmenter.apply(&img, rng),
                None => img,
            };
            data.extend(self.preprocessor.image_to_chw(&img));
            targets.push(sample.label as i32);
        }

        let images = Tensor::<B, 1>::from_floats(data.as_slice(), device).reshape([
            samples.len(),
            3,
            size,
            size,
        ]);
        let targets = Tensor::<B, 1, Int>::from_ints(targets.as_slice(), device);

        Ok(ImageBatch { images, targets })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use pixsafe_preprocess::AugmentConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::path::Path;

    type TestBackend = burn::backend::NdArray<f32>;

    fn write_image(path: &Path, shade: u8) {
        let img = RgbImage::from_pixel(12, 12, Rgb([shade, shade / 2, shade / 3]));
        let saved = img.save(path);
        assert!(saved.is_ok(), "failed to write {}", path.display());
    }

    #[test]
    fn batch_shapes_and_targets() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("failed to create temp dir");
        };
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        write_image(&a, 200);
        write_image(&b, 60);

        let samples = vec![ImageSample::new(a, 0), ImageSample::new(b, 2)];
        let batcher = ImageBatcher::new(Preprocessor::new(16));
        let device = Default::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let batch = batcher.batch::<TestBackend, _>(&samples, &device, &mut rng);
        let Ok(batch) = batch else {
            panic!("batch failed: {batch:?}");
        };

        assert_eq!(batch.images.dims(), [2, 3, 16, 16]);
        assert_eq!(batch.targets.dims(), [2]);
        let targets = batch
            .targets
            .into_data()
            .convert::<i64>()
            .to_vec::<i64>()
            .unwrap_or_default();
        assert_eq!(targets, vec![0, 2]);
    }

    #[test]
    fn batch_rejects_empty_slice() {
        let batcher = ImageBatcher::new(Preprocessor::new(16));
        let device = Default::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let result = batcher.batch::<TestBackend, _>(&[], &device, &mut rng);
        assert!(matches!(result, Err(DatasetError::EmptyBatch)));
    }

    #[test]
    fn missing_file_fails_batch_with_path() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("failed to create temp dir");
        };
        let good = dir.path().join("good.png");
        write_image(&good, 100);
        let samples = vec![
            ImageSample::new(good, 0),
            ImageSample::new(dir.path().join("gone.png"), 1),
        ];

        let batcher = ImageBatcher::new(Preprocessor::new(16));
        let device = Default::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let result = batcher.batch::<TestBackend, _>(&samples, &device, &mut rng);
        assert!(matches!(
            result,
            Err(DatasetError::Sample { ref path, .. }) if path.contains("gone.png")
        ));
    }

    #[test]
    fn corrupt_file_fails_batch() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("failed to create temp dir");
        };
        let bad = dir.path().join("bad.png");
        let written = std::fs::write(&bad, b"not a png");
        assert!(written.is_ok());

        let samples = vec![ImageSample::new(bad, 0)];
        let batcher = ImageBatcher::new(Preprocessor::new(16));
        let device = Default::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let result = batcher.batch::<TestBackend, _>(&samples, &device, &mut rng);
        assert!(matches!(result, Err(DatasetError::Sample { .. })));
    }

    #[test]
    fn unaugmented_batches_are_deterministic() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("failed to create temp dir");
        };
        let a = dir.path().join("a.png");
        write_image(&a, 180);
        let samples = vec![ImageSample::new(a, 1)];

        let batcher = ImageBatcher::new(Preprocessor::new(8));
        let device = Default::default();

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let first = batcher.batch::<TestBackend, _>(&samples, &device, &mut rng);
        let second = batcher.batch::<TestBackend, _>(&samples, &device, &mut rng);
        let (Ok(first), Ok(second)) = (first, second) else {
            panic!("batching failed");
        };

        let a = first.images.into_data().convert::<f32>().to_vec::<f32>();
        let b = second.images.into_data().convert::<f32>().to_vec::<f32>();
        assert_eq!(a.unwrap_or_default(), b.unwrap_or_default());
    }

    #[test]
    fn augmented_batcher_reports_augments() {
        let batcher = ImageBatcher::new(Preprocessor::new(8))
            .with_augmenter(Augmenter::new(AugmentConfig::default()));
        assert!(batcher.augments());
    }
}
