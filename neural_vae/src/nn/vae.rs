//! The variational autoencoder.

use burn::module::Module;
use burn::prelude::*;

use super::{reparameterize, Decoder, Encoder};
use crate::config::VaeConfig;
use crate::error::{NeuralVaeError, Result};

/// Output of a full forward pass.
#[derive(Debug, Clone)]
pub struct VaeOutput<B: Backend> {
    /// Decoded images [batch, 3, S, S] in [0, 1].
    pub reconstruction: Tensor<B, 4>,
    /// Posterior mean [batch, latent_dim].
    pub mu: Tensor<B, 2>,
    /// Posterior log-variance [batch, latent_dim].
    pub log_var: Tensor<B, 2>,
}

/// Convolutional VAE.
///
/// `forward` encodes, samples one latent per image with the
/// reparameterization trick, and decodes. Inference uses the same path.
#[derive(Module, Debug)]
pub struct Vae<B: Backend> {
    encoder: Encoder<B>,
    decoder: Decoder<B>,
    latent_dim: usize,
    image_size: usize,
}

impl VaeConfig {
    /// Initialize a freshly weighted model.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<Vae<B>> {
        self.validate()?;

        let model = Vae {
            encoder: Encoder::new(self, device)?,
            decoder: Decoder::new(self, device)?,
            latent_dim: self.latent_dim,
            image_size: self.image_size,
        };

        log::debug!(
            "Initialized VAE: latent_dim={}, image_size={}, {} parameters",
            self.latent_dim,
            self.image_size,
            model.num_params()
        );

        Ok(model)
    }
}

impl<B: Backend> Vae<B> {
    /// Encode images to posterior statistics `(mu, log_var)`.
    pub fn encode(&self, images: Tensor<B, 4>) -> (Tensor<B, 2>, Tensor<B, 2>) {
        self.encoder.forward(images)
    }

    /// Decode latent codes to images.
    pub fn decode(&self, latents: Tensor<B, 2>) -> Tensor<B, 4> {
        self.decoder.forward(latents)
    }

    /// Encode, sample and decode.
    pub fn forward(&self, images: Tensor<B, 4>) -> VaeOutput<B> {
        let (mu, log_var) = self.encode(images);
        let z = reparameterize(mu.clone(), log_var.clone());
        let reconstruction = self.decode(z);

        VaeOutput {
            reconstruction,
            mu,
            log_var,
        }
    }

    /// Length of the latent code.
    pub fn latent_dim(&self) -> usize {
        self.latent_dim
    }

    /// Side length of the images the model reads and writes.
    pub fn image_size(&self) -> usize {
        self.image_size
    }

    /// Shape of one image: `[3, S, S]`.
    pub fn image_dims(&self) -> [usize; 3] {
        [vae_core::IMAGE_CHANNELS, self.image_size, self.image_size]
    }

    /// Check that `images` is a `[batch, 3, S, S]` batch this model accepts.
    pub fn check_images(&self, images: &Tensor<B, 4>) -> Result<()> {
        let [batch, channels, height, width] = images.dims();
        let [c, h, w] = self.image_dims();

        if channels != c || height != h || width != w {
            return Err(NeuralVaeError::ShapeMismatch {
                expected: vec![batch, c, h, w],
                got: vec![batch, channels, height, width],
            });
        }
        Ok(())
    }

    /// Check that `latents` is a `[batch, latent_dim]` batch.
    pub fn check_latents(&self, latents: &Tensor<B, 2>) -> Result<()> {
        let [batch, dim] = latents.dims();
        if dim != self.latent_dim {
            return Err(NeuralVaeError::ShapeMismatch {
                expected: vec![batch, self.latent_dim],
                got: vec![batch, dim],
            });
        }
        Ok(())
    }
}
