//! Sample images from a trained VAE.
//!
//! ```text
//! vae-generate [--config generation.json]
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use burn::config::Config;
use clap::Parser;
use neural_vae::generate::Generator;
use neural_vae::GenerationConfig;

#[cfg(feature = "wgpu")]
type Backend = burn::backend::Wgpu;
#[cfg(not(feature = "wgpu"))]
type Backend = burn::backend::NdArray;

#[derive(Parser, Debug)]
#[command(name = "vae-generate", about = "Generate images from a trained VAE checkpoint")]
struct Args {
    /// Generation configuration (JSON). Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GenerationConfig::load(path)
            .map_err(|err| anyhow!("failed to load {}: {:?}", path.display(), err))?,
        None => GenerationConfig::default(),
    };

    let checkpoint = config.checkpoint_path.clone();
    let generator = Generator::<Backend>::from_config(config, Default::default())
        .with_context(|| format!("failed to load checkpoint {checkpoint}"))?;
    let written = generator.run()?;

    println!("Generated {} images", written.len());
    Ok(())
}
