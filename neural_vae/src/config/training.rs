//! Training and generation configuration types.

use burn::config::Config;
use burn::grad_clipping::GradientClippingConfig;
use burn::optim::AdamConfig;
use vae_core::CheckpointSchedule;

use super::VaeConfig;
use crate::error::NeuralVaeError;

/// Configuration for the VAE training loop.
#[derive(Config)]
pub struct TrainingConfig {
    /// Model configuration.
    pub model: VaeConfig,

    /// Adam hyperparameters (the learning rate lives in `learning_rate`).
    pub optimizer: AdamConfig,

    /// Number of passes over the training set.
    #[config(default = 100000)]
    pub num_epochs: usize,

    /// Images per training batch.
    #[config(default = 200)]
    pub batch_size: usize,

    /// Learning rate.
    #[config(default = 1e-3)]
    pub learning_rate: f64,

    /// Save a periodic checkpoint every this many epochs (0 = never).
    #[config(default = 25)]
    pub checkpoint_interval: usize,

    /// Shuffle the training set every epoch.
    #[config(default = true)]
    pub shuffle: bool,

    /// Seed for the backend RNG and the shuffler.
    #[config(default = "None")]
    pub seed: Option<u64>,

    /// Clip every gradient element to `[-v, v]` before the optimizer step.
    #[config(default = "None")]
    pub gradient_clip: Option<f32>,

    /// Directory of training images.
    #[config(default = "String::from(\"photos\")")]
    pub train_dir: String,

    /// Directory of held-out images.
    #[config(default = "String::from(\"test_photos\")")]
    pub test_dir: String,

    /// Append-only per-epoch history file.
    #[config(default = "String::from(\"model_history.txt\")")]
    pub history_path: String,

    /// Periodic checkpoint, also loaded at start when present.
    #[config(default = "String::from(\"variational_autoencoder\")")]
    pub checkpoint_path: String,

    /// Checkpoint written once training completes.
    #[config(default = "String::from(\"variational_autoencoder_final\")")]
    pub final_checkpoint_path: String,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self::new(VaeConfig::default(), AdamConfig::new().with_epsilon(1e-8))
    }
}

impl TrainingConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> crate::error::Result<()> {
        self.model.validate()?;

        if self.learning_rate <= 0.0 || !self.learning_rate.is_finite() {
            return Err(NeuralVaeError::InvalidConfig {
                message: "learning_rate must be positive".to_string(),
            });
        }
        if self.batch_size == 0 {
            return Err(NeuralVaeError::InvalidConfig {
                message: "batch_size must be positive".to_string(),
            });
        }
        if let Some(clip) = self.gradient_clip {
            if clip <= 0.0 {
                return Err(NeuralVaeError::InvalidConfig {
                    message: "gradient_clip must be positive".to_string(),
                });
            }
        }
        if self.checkpoint_path == self.final_checkpoint_path {
            return Err(NeuralVaeError::InvalidConfig {
                message: "final_checkpoint_path must differ from checkpoint_path".to_string(),
            });
        }

        Ok(())
    }

    /// Cadence of periodic checkpoints.
    pub fn checkpoint_schedule(&self) -> CheckpointSchedule {
        CheckpointSchedule::every(self.checkpoint_interval)
    }

    /// Adam configuration with the configured gradient clipping applied.
    pub fn optimizer_config(&self) -> AdamConfig {
        self.optimizer
            .clone()
            .with_grad_clipping(self.gradient_clip.map(GradientClippingConfig::Value))
    }
}

/// Configuration for sampling images from a trained model.
#[derive(Config, Debug)]
pub struct GenerationConfig {
    /// Model configuration; must match the checkpoint.
    pub model: VaeConfig,

    /// Checkpoint to sample from.
    #[config(default = "String::from(\"variational_autoencoder\")")]
    pub checkpoint_path: String,

    /// Directory the PNG files are written to.
    #[config(default = "String::from(\"generated_photos\")")]
    pub output_dir: String,

    /// Number of images to generate.
    #[config(default = 500)]
    pub num_images: usize,

    /// Seed for the backend RNG.
    #[config(default = "None")]
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(VaeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_training_config() {
        let config = TrainingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.batch_size, 200);
        assert_eq!(config.num_epochs, 100000);
        assert_eq!(config.checkpoint_interval, 25);
        assert_eq!(config.train_dir, "photos");
        assert_eq!(config.final_checkpoint_path, "variational_autoencoder_final");
    }

    #[test]
    fn test_builder_pattern() {
        let config = TrainingConfig::default()
            .with_learning_rate(1e-4)
            .with_batch_size(4);

        assert_eq!(config.learning_rate, 1e-4);
        assert_eq!(config.batch_size, 4);
    }

    #[test]
    fn test_invalid_training_configs() {
        assert!(TrainingConfig::default().with_batch_size(0).validate().is_err());
        assert!(TrainingConfig::default().with_learning_rate(0.0).validate().is_err());
        assert!(TrainingConfig::default()
            .with_gradient_clip(Some(-1.0))
            .validate()
            .is_err());
        assert!(TrainingConfig::default()
            .with_final_checkpoint_path("variational_autoencoder".to_string())
            .validate()
            .is_err());
    }

    #[test]
    fn test_schedule_follows_interval() {
        let config = TrainingConfig::default().with_checkpoint_interval(10);
        assert!(config.checkpoint_schedule().is_due(10));
        assert!(!config.checkpoint_schedule().is_due(5));
    }

    #[test]
    fn test_json_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("training.json");

        let mut config = TrainingConfig::default()
            .with_num_epochs(3)
            .with_seed(Some(7));
        config.model = VaeConfig::new(8).with_image_size(64);
        config.save(&path).unwrap();

        let loaded = TrainingConfig::load(&path).unwrap();
        assert_eq!(loaded.num_epochs, 3);
        assert_eq!(loaded.seed, Some(7));
        assert!(loaded.model.is_compatible_with(&config.model));
    }

    #[test]
    fn test_default_generation_config() {
        let config = GenerationConfig::default();
        assert_eq!(config.num_images, 500);
        assert_eq!(config.output_dir, "generated_photos");
    }
}
