//! Checkpoint save/load.
//!
//! A checkpoint named `base` is two files:
//! - `base.bin`: model parameters, full precision, via burn's binary recorder
//! - `base.json`: [`CheckpointMetadata`] describing the architecture
//!
//! Loading checks the metadata against the requested configuration before any
//! parameter is read, and the parameter count afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use burn::module::Module;
use burn::prelude::*;
use burn::record::{BinFileRecorder, FullPrecisionSettings};
use serde::{Deserialize, Serialize};

use crate::config::VaeConfig;
use crate::error::{NeuralVaeError, Result};
use crate::nn::Vae;

/// Current checkpoint format version.
pub const CHECKPOINT_VERSION: u32 = 1;

/// Checkpoint metadata stored as JSON next to the parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    /// Checkpoint version for compatibility.
    pub version: u32,
    /// Epoch the checkpoint was taken after; `None` for the final model.
    pub epoch: Option<usize>,
    /// Number of scalar parameters in the record.
    pub num_params: usize,
    /// Architecture the parameters belong to.
    pub model: VaeConfig,
}

impl CheckpointMetadata {
    /// Describe `model`, built from `config`.
    pub fn new<B: Backend>(model: &Vae<B>, config: &VaeConfig, epoch: Option<usize>) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            epoch,
            num_params: model.num_params(),
            model: config.clone(),
        }
    }

    /// Fail unless a model built from `config` can hold these parameters.
    pub fn check_compatible(&self, config: &VaeConfig) -> Result<()> {
        if self.version != CHECKPOINT_VERSION {
            return Err(NeuralVaeError::CheckpointMismatch {
                message: format!(
                    "unsupported checkpoint version {} (expected {})",
                    self.version, CHECKPOINT_VERSION
                ),
            });
        }
        if !self.model.is_compatible_with(config) {
            return Err(NeuralVaeError::CheckpointMismatch {
                message: format!(
                    "checkpoint has latent_dim={}, image_size={}, hidden_dim={}; \
                     model has latent_dim={}, image_size={}, hidden_dim={}",
                    self.model.latent_dim,
                    self.model.image_size,
                    self.model.hidden_dim,
                    config.latent_dim,
                    config.image_size,
                    config.hidden_dim
                ),
            });
        }
        Ok(())
    }
}

/// Parameter file of checkpoint `base`.
pub fn record_path(base: impl AsRef<Path>) -> PathBuf {
    base.as_ref().with_extension("bin")
}

/// Metadata file of checkpoint `base`.
pub fn metadata_path(base: impl AsRef<Path>) -> PathBuf {
    base.as_ref().with_extension("json")
}

/// Whether both files of checkpoint `base` exist.
pub fn checkpoint_exists(base: impl AsRef<Path>) -> bool {
    record_path(&base).is_file() && metadata_path(&base).is_file()
}

fn recorder() -> BinFileRecorder<FullPrecisionSettings> {
    BinFileRecorder::<FullPrecisionSettings>::new()
}

/// Save model parameters and metadata to checkpoint `base`.
///
/// Existing files are overwritten.
pub fn save_checkpoint<B: Backend>(
    model: &Vae<B>,
    config: &VaeConfig,
    epoch: Option<usize>,
    base: impl AsRef<Path>,
) -> Result<()> {
    let base = base.as_ref();
    if let Some(parent) = base.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    // Parameters first: metadata must never describe a record that was not written.
    model.clone().save_file(record_path(base), &recorder())?;

    let metadata = CheckpointMetadata::new(model, config, epoch);
    fs::write(metadata_path(base), serde_json::to_string_pretty(&metadata)?)?;

    log::info!(
        "Saved checkpoint to {:?} ({} parameters{})",
        base,
        metadata.num_params,
        epoch.map(|e| format!(", epoch {e}")).unwrap_or_default()
    );

    Ok(())
}

/// Load checkpoint `base` into a model built from `config`.
///
/// Fails with [`NeuralVaeError::CheckpointMismatch`] when the checkpoint was
/// written for a different architecture.
pub fn load_checkpoint<B: Backend>(
    config: &VaeConfig,
    base: impl AsRef<Path>,
    device: &B::Device,
) -> Result<(Vae<B>, CheckpointMetadata)> {
    let base = base.as_ref();

    let json = fs::read_to_string(metadata_path(base))?;
    let metadata: CheckpointMetadata = serde_json::from_str(&json)?;
    metadata.check_compatible(config)?;

    let model = config.init::<B>(device)?;
    let expected = model.num_params();
    if metadata.num_params != expected {
        return Err(NeuralVaeError::CheckpointMismatch {
            message: format!(
                "checkpoint holds {} parameters, model needs {}",
                metadata.num_params, expected
            ),
        });
    }

    let model = model.load_file(record_path(base), &recorder(), device)?;
    if model.num_params() != expected {
        return Err(NeuralVaeError::CheckpointMismatch {
            message: format!(
                "loaded {} parameters, model needs {}",
                model.num_params(),
                expected
            ),
        });
    }

    log::info!("Loaded checkpoint from {:?}", base);

    Ok((model, metadata))
}
