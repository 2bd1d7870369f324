//! # neural_vae
//!
//! Convolutional variational autoencoder for RGB images, built with Burn.
//!
//! This crate trains a VAE on a directory of images and samples new images
//! from the trained model, using the stage geometry from `vae_core`.
//!
//! ## Features
//!
//! - **Model**: `Vae<B>` with a seven-stage convolutional encoder and a
//!   four-stage transposed-convolution decoder
//! - **Loss**: mean squared error plus KL divergence to `N(0, I)`
//! - **Training**: Adam, shuffled batches, held-out evaluation, an append-only
//!   history file and periodic checkpoints with resumption
//! - **Generation**: decode prior samples to `generated_image_<i>.png`
//!
//! ## Quick Start
//!
//! ```ignore
//! use neural_vae::{
//!     config::TrainingConfig,
//!     data::ImageFolder,
//!     training::VaeTrainer,
//! };
//! use burn::backend::{Autodiff, NdArray};
//!
//! type MyBackend = Autodiff<NdArray>;
//!
//! let config = TrainingConfig::default();
//! let train = ImageFolder::open(&config.train_dir, config.model.image_size)?;
//! let test = ImageFolder::open(&config.test_dir, config.model.image_size)?;
//!
//! let trainer = VaeTrainer::<MyBackend>::new(config, Default::default())?;
//! let model = trainer.run(&train, &test)?;
//!
//! neural_vae::generate::generate_images(&model, 10, "generated_photos", &Default::default())?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! vae_core (pure geometry + bookkeeping)
//!     │
//!     ▼
//! neural_vae
//!     ├── nn        Encoder / Decoder / Vae
//!     ├── loss      MSE + KL
//!     ├── data      ImageFolder, pixel conversion
//!     ├── training  VaeTrainer, checkpoints, history
//!     └── generate  prior sampling to PNG
//! ```
//!
//! ## Feature Flags
//!
//! - `ndarray` (default): CPU backend for the binaries
//! - `wgpu`: GPU acceleration via WebGPU

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod data;
pub mod error;
pub mod generate;
pub mod loss;
pub mod nn;
pub mod training;

// Re-export key types for convenience
pub use config::{GenerationConfig, TrainingConfig, VaeConfig};
pub use error::{NeuralVaeError, Result};
pub use loss::VaeLoss;
pub use nn::{Vae, VaeOutput};
pub use training::{TrainOutput, VaeTrainer};

// Re-export from vae_core for convenience
pub use vae_core::{CheckpointSchedule, EpochSummary, VaeGeometry};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{GenerationConfig, TrainingConfig, VaeConfig};
    pub use crate::data::{pixels_to_image, rgb_to_pixels, save_png, tensor_to_images, ImageFolder};
    pub use crate::error::{NeuralVaeError, Result};
    pub use crate::generate::{generate_images, generated_image_name, sample_images, Generator};
    pub use crate::loss::{kl_divergence, reconstruction_loss, LossOutput, VaeLoss};
    pub use crate::nn::{reparameterize, sample_prior, Decoder, Encoder, Vae, VaeOutput};
    pub use crate::training::{
        checkpoint_exists, evaluate, load_checkpoint, save_checkpoint, train_step,
        BatchSampler, CheckpointMetadata, StepMetrics, TrainOutput, TrainingHistory,
        VaeTrainer,
    };

    pub use vae_core::{CheckpointSchedule, EpochAccumulator, EpochSummary, VaeGeometry};
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{Autodiff, NdArray};
    use burn::module::Module;

    type TestBackend = Autodiff<NdArray>;

    #[test]
    fn test_public_api() {
        // Verify that the public API is accessible
        let _config = TrainingConfig::default();
        let _generation = GenerationConfig::default();
        let _schedule = CheckpointSchedule::default();
    }

    #[test]
    fn test_default_geometry() {
        let geometry = VaeConfig::default().geometry().unwrap();
        assert_eq!(geometry.flattened_len(), 32768);
    }

    #[test]
    fn test_model_creation() {
        use burn::backend::ndarray::NdArrayDevice;

        let device = NdArrayDevice::Cpu;
        let model = VaeConfig::new(8)
            .with_image_size(32)
            .with_hidden_dim(16)
            .init::<TestBackend>(&device)
            .unwrap();

        assert_eq!(model.latent_dim(), 8);
        assert!(model.num_params() > 0);
    }
}
