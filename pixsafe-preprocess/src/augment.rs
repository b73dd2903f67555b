//! Randomized training-time augmentation.

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Configuration for training-time augmentation.
///
/// Defaults match the shipped training recipe: flip half the time, rotate
/// up to ten degrees either way, and jitter brightness, contrast, and
/// saturation by up to twenty percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AugmentConfig {
    /// Probability of a horizontal flip.
    pub flip_prob: f64,
    /// Maximum rotation magnitude in degrees; the angle is drawn uniformly
    /// from `[-max, max]`.
    pub max_rotation_deg: f32,
    /// Color jitter strength; each of brightness, contrast, and saturation
    /// gets an independent factor drawn from `[1 - jitter, 1 + jitter]`.
    pub jitter: f32,
}

impl AugmentConfig {
    /// Creates the default augmentation recipe.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the horizontal-flip probability.
    #[must_use]
    pub fn with_flip_prob(mut self, flip_prob: f64) -> Self {
        self.flip_prob = flip_prob;
        self
    }

    /// Sets the maximum rotation in degrees.
    #[must_use]
    pub fn with_max_rotation_deg(mut self, degrees: f32) -> Self {
        self.max_rotation_deg = degrees;
        self
    }

    /// Sets the color jitter strength.
    #[must_use]
    pub fn with_jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter;
        self
    }
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            flip_prob: 0.5,
            max_rotation_deg: 10.0,
            jitter: 0.2,
        }
    }
}

/// Applies randomized augmentation to decoded images.
///
/// Every call draws fresh parameters from the supplied RNG; there is no
/// internal state, so two images never share draws and a seeded RNG makes
/// the whole sequence reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Augmenter {
    config: AugmentConfig,
}

impl Augmenter {
    /// Creates an augmenter from a configuration.
    #[must_use]
    pub fn new(config: AugmentConfig) -> Self {
        Self { config }
    }

    /// Returns the augmentation configuration.
    #[must_use]
    pub const fn config(&self) -> &AugmentConfig {
        &self.config
    }

    /// Applies flip, rotation, and color jitter to an image.
    ///
    /// Runs on the source image at its native resolution; resizing happens
    /// afterwards in the preprocessor.
    pub fn apply<R: Rng>(&self, img: &DynamicImage, rng: &mut R) -> DynamicImage {
        let mut rgb = img.to_rgb8();

        if rng.gen_bool(self.config.flip_prob) {
            rgb = image::imageops::flip_horizontal(&rgb);
        }

        if self.config.max_rotation_deg > 0.0 {
            let degrees = rng.gen_range(-self.config.max_rotation_deg..=self.config.max_rotation_deg);
            let radians = degrees.to_radians();
            rgb = rotate_about_center(&rgb, radians, Interpolation::Bilinear, Rgb([0, 0, 0]));
        }

        if self.config.jitter > 0.0 {
            let lo = 1.0 - self.config.jitter;
            let hi = 1.0 + self.config.jitter;
            let brightness = rng.gen_range(lo..=hi);
            let contrast = rng.gen_range(lo..=hi);
            let saturation = rng.gen_range(lo..=hi);
            color_jitter(&mut rgb, brightness, contrast, saturation);
        }

        DynamicImage::ImageRgb8(rgb)
    }
}

impl Default for Augmenter {
    fn default() -> Self {
        Self::new(AugmentConfig::default())
    }
}

/// Scales brightness, contrast, and saturation in place.
///
/// Contrast pivots around mid-gray; saturation blends each channel toward
/// the pixel's luma. Results are clamped to the valid byte range.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn color_jitter(img: &mut RgbImage, brightness: f32, contrast: f32, saturation: f32) {
    for pixel in img.pixels_mut() {
        let mut rgb = [0.0_f32; 3];
        for (channel, value) in rgb.iter_mut().zip(pixel.0) {
            let v = f32::from(value) / 255.0 * brightness;
            *channel = (v - 0.5) * contrast + 0.5;
        }
        let luma = 0.299 * rgb[0] + 0.587 * rgb[1] + 0.114 * rgb[2];
        for (value, channel) in pixel.0.iter_mut().zip(rgb) {
            let v = luma + (channel - luma) * saturation;
            *value = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
    }
}
