//! Checkpoint loading and prediction.

use std::time::Duration;

use burn::tensor::backend::Backend;
use image::DynamicImage;
use pixsafe_models::{load_checkpoint, SafetyClassifier, SafetyClassifierConfig};
use pixsafe_preprocess::Preprocessor;
use pixsafe_types::ClassMap;
use tracing::debug;

use crate::error::{InferenceError, Result};
use crate::source::{ImageSource, DEFAULT_FETCH_TIMEOUT};

/// A classification result.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Per-class probabilities, class-map order, summing to one.
    pub probabilities: Vec<f32>,
    /// Index of the winning class.
    pub index: usize,
    /// Human-readable name of the winning class.
    pub label: String,
}

impl Prediction {
    /// Probability of the winning class.
    #[must_use]
    pub fn confidence(&self) -> f32 {
        self.probabilities.get(self.index).copied().unwrap_or(0.0)
    }
}

/// Classifies images with a loaded checkpoint.
///
/// A predictor pairs model weights with the [`ClassMap`] they were
/// trained against; output indices are only rendered to names through
/// that map, so a caller can never read index 2 as anything but the
/// label the map says it is.
///
/// # Example
///
/// ```no_run
/// use pixsafe_inference::{ImageSource, Predictor};
/// use pixsafe_models::InferenceBackend;
/// use pixsafe_types::ClassMap;
///
/// let predictor = Predictor::<InferenceBackend>::load(
///     "weights/pixsafe.mpk",
///     ClassMap::canonical(),
///     &Default::default(),
/// )?;
/// let prediction = predictor.predict(&ImageSource::path("photo.jpg"))?;
/// println!("{} ({:.1}%)", prediction.label, prediction.confidence() * 100.0);
/// # Ok::<(), pixsafe_inference::InferenceError>(())
/// ```
#[derive(Debug)]
pub struct Predictor<B: Backend> {
    model: SafetyClassifier<B>,
    preprocessor: Preprocessor,
    class_map: ClassMap,
    device: B::Device,
    fetch_timeout: Duration,
}

impl<B: Backend> Predictor<B> {
    /// Loads a predictor from a safe-format checkpoint.
    ///
    /// The model is sized from the class map, so a checkpoint trained
    /// against a different number of classes fails to load.
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::Model`] if the checkpoint is missing, in
    /// a refused format, or does not match the architecture.
    pub fn load(checkpoint_path: &str, class_map: ClassMap, device: &B::Device) -> Result<Self> {
        let config = SafetyClassifierConfig::new(class_map.len());
        config.validate()?;
        let model = SafetyClassifier::<B>::new(&config, device);
        let model = load_checkpoint(model, checkpoint_path, device)?;
        debug!(path = %checkpoint_path, classes = class_map.len(), "checkpoint loaded");

        Ok(Self::from_model(model, class_map, device))
    }

    /// Wraps an already constructed model.
    #[must_use]
    pub fn from_model(model: SafetyClassifier<B>, class_map: ClassMap, device: &B::Device) -> Self {
        Self {
            model,
            preprocessor: Preprocessor::default(),
            class_map,
            device: device.clone(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Sets the preprocessing target size.
    #[must_use]
    pub fn with_preprocessor(mut self, preprocessor: Preprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    /// Sets the URL fetch timeout.
    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Returns the class map in use.
    #[must_use]
    pub const fn class_map(&self) -> &ClassMap {
        &self.class_map
    }

    /// Classifies an image from a path or URL.
    ///
    /// # Errors
    ///
    /// Propagates acquisition failures ([`InferenceError::ImageNotFound`],
    /// [`InferenceError::ImageFetch`]) and [`InferenceError::Decode`] for
    /// undecodable bytes.
    pub fn predict(&self, source: &ImageSource) -> Result<Prediction> {
        let bytes = source.resolve(self.fetch_timeout)?;
        let img = self.preprocessor.decode(&bytes, &source.describe())?;
        self.predict_image(&img)
    }

    /// Classifies an already decoded image.
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::Label`] if the model emits an index the
    /// class map cannot name.
    pub fn predict_image(&self, img: &DynamicImage) -> Result<Prediction> {
        let input = self.preprocessor.to_tensor::<B>(img, &self.device);
        let probs = self.model.forward_softmax(input);
        let probabilities = probs
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| InferenceError::model(format!("probability readback failed: {e:?}")))?;

        // Lowest index wins ties.
        let mut index = 0;
        for (i, &p) in probabilities.iter().enumerate() {
            if p > probabilities[index] {
                index = i;
            }
        }
        let label = self.class_map.require_label(index)?.to_owned();

        debug!(label = %label, confidence = probabilities[index], "prediction");
        Ok(Prediction {
            probabilities,
            index,
            label,
        })
    }
}
