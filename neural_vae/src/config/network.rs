//! Model configuration.

use burn::config::Config;
use vae_core::VaeGeometry;

use crate::error::NeuralVaeError;

/// Latent dimensionality used when none is given.
pub const DEFAULT_LATENT_DIM: usize = 2056;

/// Configuration for the convolutional VAE.
///
/// The convolution stages themselves are fixed (see [`vae_core::layout`]);
/// only the sizes around them are configurable.
#[derive(Config, Debug)]
pub struct VaeConfig {
    /// Length of the latent code.
    pub latent_dim: usize,

    /// Side length of the square RGB images. Must be a multiple of 16.
    #[config(default = 256)]
    pub image_size: usize,

    /// Width of the dense layer between the convolutions and the latent heads.
    #[config(default = 1024)]
    pub hidden_dim: usize,
}

impl Default for VaeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LATENT_DIM)
    }
}

impl VaeConfig {
    /// Plan and validate the convolution geometry for this image size.
    pub fn geometry(&self) -> crate::error::Result<VaeGeometry> {
        Ok(VaeGeometry::standard(self.image_size)?)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.latent_dim == 0 {
            return Err(NeuralVaeError::InvalidConfig {
                message: "latent_dim must be positive".to_string(),
            });
        }
        if self.hidden_dim == 0 {
            return Err(NeuralVaeError::InvalidConfig {
                message: "hidden_dim must be positive".to_string(),
            });
        }
        self.geometry()?;
        Ok(())
    }

    /// Shape of one input image: `[channels, height, width]`.
    pub fn image_dims(&self) -> [usize; 3] {
        [vae_core::IMAGE_CHANNELS, self.image_size, self.image_size]
    }

    /// Whether two configurations build modules with identical parameter shapes.
    pub fn is_compatible_with(&self, other: &VaeConfig) -> bool {
        self.latent_dim == other.latent_dim
            && self.image_size == other.image_size
            && self.hidden_dim == other.hidden_dim
    }
}
