//! Train the VAE on a directory of images.
//!
//! ```text
//! vae-train [--config training.json]
//! ```
//!
//! Set `RUST_LOG=info` for per-epoch summaries, `RUST_LOG=debug` for per-batch
//! losses.

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use burn::backend::Autodiff;
use burn::config::Config;
use clap::Parser;
use neural_vae::data::ImageFolder;
use neural_vae::{TrainingConfig, VaeTrainer};

#[cfg(feature = "wgpu")]
type Backend = Autodiff<burn::backend::Wgpu>;
#[cfg(not(feature = "wgpu"))]
type Backend = Autodiff<burn::backend::NdArray>;

#[derive(Parser, Debug)]
#[command(name = "vae-train", about = "Train a convolutional VAE on a directory of images")]
struct Args {
    /// Training configuration (JSON). Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => TrainingConfig::load(path)
            .map_err(|err| anyhow!("failed to load {}: {:?}", path.display(), err))?,
        None => TrainingConfig::default(),
    };

    let device = Default::default();
    log::info!("Using device {:?}", device);

    let image_size = config.model.image_size;
    let train = ImageFolder::open(&config.train_dir, image_size)
        .with_context(|| format!("failed to open training set {}", config.train_dir))?;
    let test = ImageFolder::open(&config.test_dir, image_size)
        .with_context(|| format!("failed to open test set {}", config.test_dir))?;

    let trainer = VaeTrainer::<Backend>::new(config, device)?;
    trainer.run(&train, &test)?;

    log::info!(
        "Training finished, final model saved to {}",
        trainer.config().final_checkpoint_path
    );
    Ok(())
}
