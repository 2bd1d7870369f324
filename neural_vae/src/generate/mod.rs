//! Image generation from a trained model.
//!
//! Latent codes are drawn from the standard normal prior and decoded; the
//! encoder is never used.

mod generator;

pub use generator::{generate_images, generated_image_name, sample_images, Generator};
