//! Training infrastructure for the VAE.
//!
//! This module provides:
//! - `VaeTrainer`: epoch loop with evaluation, history and checkpoints
//! - `BatchSampler`: shuffled index batches over a dataset
//! - Per-step metrics
//! - Checkpoint save/load for training resumption and generation

mod batch;
mod checkpoint;
mod history;
mod metrics;
mod trainer;

pub use batch::BatchSampler;
pub use checkpoint::{
    checkpoint_exists, load_checkpoint, metadata_path, record_path, save_checkpoint,
    CheckpointMetadata,
};
pub use history::TrainingHistory;
pub use metrics::{StepMetrics, TrainOutput};
pub use trainer::{console_line, evaluate, train_step, VaeTrainer};
