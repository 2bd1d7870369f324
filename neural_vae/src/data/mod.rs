//! Image data loading.
//!
//! This module provides:
//! - `ImageFolder`: a flat directory of images, decoded on demand
//! - Conversions between `image` buffers, channel-first pixel vectors and tensors

mod convert;
mod image_folder;

pub use convert::{pixels_to_image, rgb_to_pixels, save_png, tensor_to_images};
pub use image_folder::ImageFolder;
