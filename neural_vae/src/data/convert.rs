//! Pixel layout conversions.
//!
//! Pixels travel through the model channel-first (`[3, H, W]`) as `f32` in
//! `[0, 1]`. On the way out they are clamped, scaled by 255 and truncated.

use std::path::Path;

use burn::prelude::*;
use image::RgbImage;

use crate::error::{NeuralVaeError, Result};

/// Convert an RGB image to channel-first `f32` pixels in `[0, 1]`.
pub fn rgb_to_pixels(image: &RgbImage) -> Vec<f32> {
    let (width, height) = image.dimensions();
    let plane = (width * height) as usize;
    let mut pixels = vec![0.0f32; 3 * plane];

    for (x, y, rgb) in image.enumerate_pixels() {
        let offset = (y * width + x) as usize;
        for (channel, &value) in rgb.0.iter().enumerate() {
            pixels[channel * plane + offset] = value as f32 / 255.0;
        }
    }

    pixels
}

/// Convert channel-first pixels back to an RGB image.
///
/// Values are clamped to `[0, 1]` and mapped with `(v * 255) as u8`.
pub fn pixels_to_image(pixels: &[f32], width: usize, height: usize) -> Result<RgbImage> {
    let plane = width * height;
    if pixels.len() != 3 * plane {
        return Err(NeuralVaeError::ShapeMismatch {
            expected: vec![3, height, width],
            got: vec![pixels.len()],
        });
    }

    let mut raw = Vec::with_capacity(3 * plane);
    for offset in 0..plane {
        for channel in 0..3 {
            let value = pixels[channel * plane + offset].clamp(0.0, 1.0);
            raw.push((value * 255.0) as u8);
        }
    }

    RgbImage::from_raw(width as u32, height as u32, raw).ok_or_else(|| {
        NeuralVaeError::ShapeMismatch {
            expected: vec![3, height, width],
            got: vec![pixels.len()],
        }
    })
}

/// Split a `[batch, 3, H, W]` tensor into RGB images.
pub fn tensor_to_images<B: Backend>(images: Tensor<B, 4>) -> Result<Vec<RgbImage>> {
    let [batch, channels, height, width] = images.dims();
    if channels != 3 {
        return Err(NeuralVaeError::ShapeMismatch {
            expected: vec![batch, 3, height, width],
            got: vec![batch, channels, height, width],
        });
    }

    let values: Vec<f32> = images
        .into_data()
        .convert::<f32>()
        .to_vec()
        .map_err(|err| NeuralVaeError::TensorData(format!("{err:?}")))?;

    let stride = channels * height * width;
    values
        .chunks_exact(stride)
        .map(|pixels| pixels_to_image(pixels, width, height))
        .collect()
}

/// Write an image as PNG.
pub fn save_png(image: &RgbImage, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| NeuralVaeError::Image {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use image::Rgb;

    #[test]
    fn test_pixels_are_channel_first() {
        let mut image = RgbImage::new(2, 1);
        image.put_pixel(0, 0, Rgb([255, 0, 51]));
        image.put_pixel(1, 0, Rgb([0, 255, 0]));

        let pixels = rgb_to_pixels(&image);
        assert_eq!(pixels, vec![1.0, 0.0, 0.0, 1.0, 0.2, 0.0]);
    }

    #[test]
    fn test_output_is_clamped_and_truncated() {
        // One pixel: r out of range high, g out of range low, b truncates 127.5 -> 127.
        let image = pixels_to_image(&[1.5, -0.3, 0.5], 1, 1).unwrap();
        assert_eq!(image.get_pixel(0, 0), &Rgb([255, 0, 127]));
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(pixels_to_image(&[0.0; 5], 1, 1).is_err());
    }

    #[test]
    fn test_tensor_to_images() {
        let device = Default::default();
        let batch = Tensor::<NdArray, 4>::ones([2, 3, 4, 5], &device);
        let images = tensor_to_images(batch).unwrap();

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].dimensions(), (5, 4));
        assert!(images[1].pixels().all(|p| p.0 == [255, 255, 255]));
    }
}
