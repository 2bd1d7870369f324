//! Sampling images from the prior and writing them as PNG files.

use std::fs;
use std::path::{Path, PathBuf};

use burn::prelude::*;

use crate::config::GenerationConfig;
use crate::data::{save_png, tensor_to_images};
use crate::error::Result;
use crate::nn::{sample_prior, Vae};
use crate::training::load_checkpoint;

/// File name of the `index`-th generated image (1-based).
pub fn generated_image_name(index: usize) -> String {
    format!("generated_image_{index}.png")
}

/// Decode `count` prior samples into a `[count, 3, S, S]` batch.
pub fn sample_images<B: Backend>(model: &Vae<B>, count: usize, device: &B::Device) -> Tensor<B, 4> {
    let latents = sample_prior::<B>(count, model.latent_dim(), device);
    model.decode(latents)
}

/// Write `count` sampled images to `output_dir` as
/// `generated_image_1.png` .. `generated_image_<count>.png`.
///
/// The directory is created if missing and existing files are overwritten.
/// Returns the written paths in order.
pub fn generate_images<B: Backend>(
    model: &Vae<B>,
    count: usize,
    output_dir: impl AsRef<Path>,
    device: &B::Device,
) -> Result<Vec<PathBuf>> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let mut written = Vec::with_capacity(count);
    for index in 1..=count {
        let batch = sample_images(model, 1, device);
        for image in tensor_to_images(batch)? {
            let path = output_dir.join(generated_image_name(index));
            save_png(&image, &path)?;
            written.push(path);
        }

        if index % 100 == 0 {
            log::info!("Generated {}/{} images", index, count);
        }
    }

    log::info!("Wrote {} images to {:?}", written.len(), output_dir);
    Ok(written)
}

/// A trained model loaded for sampling.
#[derive(Debug)]
pub struct Generator<B: Backend> {
    model: Vae<B>,
    config: GenerationConfig,
    device: B::Device,
}

impl<B: Backend> Generator<B> {
    /// Load the checkpoint named in `config`.
    pub fn from_config(config: GenerationConfig, device: B::Device) -> Result<Self> {
        config.model.validate()?;
        if let Some(seed) = config.seed {
            B::seed(seed);
        }

        let (model, _) = load_checkpoint::<B>(&config.model, &config.checkpoint_path, &device)?;
        Ok(Self::new(model, config, device))
    }

    /// Wrap an already loaded model.
    pub fn new(model: Vae<B>, config: GenerationConfig, device: B::Device) -> Self {
        Self {
            model,
            config,
            device,
        }
    }

    /// The model being sampled.
    pub fn model(&self) -> &Vae<B> {
        &self.model
    }

    /// Write `num_images` images to `output_dir`.
    pub fn run(&self) -> Result<Vec<PathBuf>> {
        generate_images(
            &self.model,
            self.config.num_images,
            &self.config.output_dir,
            &self.device,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VaeConfig;
    use burn::backend::NdArray;
    use tempfile::TempDir;

    type TestBackend = NdArray;

    #[test]
    fn test_image_names_are_one_based() {
        assert_eq!(generated_image_name(1), "generated_image_1.png");
        assert_eq!(generated_image_name(500), "generated_image_500.png");
    }

    #[test]
    fn test_zero_images_creates_directory_only() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let model = VaeConfig::new(4)
            .with_image_size(16)
            .with_hidden_dim(8)
            .init::<TestBackend>(&Default::default())
            .unwrap();

        let written = generate_images(&model, 0, &out, &Default::default()).unwrap();
        assert!(written.is_empty());
        assert!(out.is_dir());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }
}
