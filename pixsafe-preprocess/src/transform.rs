//! Deterministic image-to-tensor conversion.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::{PreprocessError, Result};

/// Side length the classifier was designed around.
pub const DEFAULT_IMAGE_SIZE: usize = 256;

/// Converts images into the classifier's normalized tensor layout.
///
/// The pipeline is fixed: convert to RGB, resize to `size x size` with
/// Lanczos filtering (aspect ratio is not preserved), scale each channel
/// to `[0, 1]`, then normalize with mean 0.5 and std 0.5 per channel so
/// values land in `[-1, 1]`. Output is channel-major (`CHW`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preprocessor {
    size: usize,
}

impl Preprocessor {
    /// Creates a preprocessor targeting a square side length.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    #[must_use]
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "target size must be > 0, got {size}");
        Self { size }
    }

    /// Creates a preprocessor, returning an error on a zero size.
    ///
    /// # Errors
    ///
    /// Returns [`PreprocessError::InvalidSize`] if `size` is zero.
    pub fn try_new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(PreprocessError::invalid_size("target size must be > 0"));
        }
        Ok(Self { size })
    }

    /// Returns the target side length.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Decodes raw bytes into an image.
    ///
    /// `origin` describes where the bytes came from (a path or URL) and is
    /// carried into the error on failure.
    ///
    /// # Errors
    ///
    /// Returns [`PreprocessError::ImageDecode`] if the bytes are not a
    /// decodable image.
    pub fn decode(&self, bytes: &[u8], origin: &str) -> Result<DynamicImage> {
        image::load_from_memory(bytes)
            .map_err(|e| PreprocessError::image_decode(origin, e.to_string()))
    }

    /// Resizes an image to the target square without normalizing.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn resize(&self, img: &DynamicImage) -> RgbImage {
        let side = self.size as u32;
        image::imageops::resize(&img.to_rgb8(), side, side, FilterType::Lanczos3)
    }

    /// Converts an image to normalized channel-major floats.
    ///
    /// The output has length `3 * size * size`, laid out as all of R,
    /// then all of G, then all of B, rows top to bottom.
    #[must_use]
    pub fn image_to_chw(&self, img: &DynamicImage) -> Vec<f32> {
        let resized = self.resize(img);
        let mut data = Vec::with_capacity(3 * self.size * self.size);
        for channel in 0..3 {
            for pixel in resized.pixels() {
                let v = f32::from(pixel.0[channel]) / 255.0;
                data.push((v - 0.5) / 0.5);
            }
        }
        data
    }

    /// Converts an image to a `[1, 3, size, size]` tensor for inference.
    #[must_use]
    pub fn to_tensor<B: Backend>(&self, img: &DynamicImage, device: &B::Device) -> Tensor<B, 4> {
        let data = self.image_to_chw(img);
        Tensor::<B, 1>::from_floats(data.as_slice(), device)
            .reshape([1, 3, self.size, self.size])
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self { size: DEFAULT_IMAGE_SIZE }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    type TestBackend = burn::backend::NdArray<f32>;

    fn gradient_image(width: u32, height: u32) -> DynamicImage {
        let mut img = RgbImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) % 256) as u8]);
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn try_new_rejects_zero() {
        assert!(Preprocessor::try_new(0).is_err());
        assert!(Preprocessor::try_new(64).is_ok());
    }

    #[test]
    fn default_size_is_256() {
        assert_eq!(Preprocessor::default().size(), DEFAULT_IMAGE_SIZE);
    }

    #[test]
    fn decode_rejects_garbage() {
        let pre = Preprocessor::new(32);
        let result = pre.decode(b"not an image", "garbage.jpg");
        assert!(matches!(
            result,
            Err(PreprocessError::ImageDecode { ref input, .. }) if input == "garbage.jpg"
        ));
    }

    #[test]
    fn decode_accepts_png_bytes() {
        let pre = Preprocessor::new(16);
        let img = gradient_image(8, 8);
        let mut bytes = Vec::new();
        let encoded = img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        );
        assert!(encoded.is_ok());
        assert!(pre.decode(&bytes, "gradient.png").is_ok());
    }

    #[test]
    fn chw_layout_and_range() {
        let pre = Preprocessor::new(16);
        let img = gradient_image(40, 24);
        let data = pre.image_to_chw(&img);
        assert_eq!(data.len(), 3 * 16 * 16);
        assert!(data.iter().all(|&v| (-1.0..=1.0).contains(&v)));
    }

    #[test]
    fn white_normalizes_to_one() {
        let pre = Preprocessor::new(4);
        let mut img = RgbImage::new(4, 4);
        for pixel in img.pixels_mut() {
            *pixel = Rgb([255, 255, 255]);
        }
        let data = pre.image_to_chw(&DynamicImage::ImageRgb8(img));
        assert!(data.iter().all(|&v| (v - 1.0).abs() < 1e-6));
    }

    #[test]
    fn conversion_is_deterministic() {
        let pre = Preprocessor::new(16);
        let img = gradient_image(33, 17);
        let a = pre.image_to_chw(&img);
        let b = pre.image_to_chw(&img);
        assert_eq!(a, b);
    }

    #[test]
    fn tensor_shape_is_nchw() {
        let pre = Preprocessor::new(16);
        let device = Default::default();
        let img = gradient_image(20, 20);
        let tensor = pre.to_tensor::<TestBackend>(&img, &device);
        assert_eq!(tensor.dims(), [1, 3, 16, 16]);
    }
}
