//! Loss functions for VAE training.
//!
//! The objective is the unweighted sum of:
//! - Reconstruction: mean squared error between decoded and input pixels
//! - Divergence: KL(q(z|x) || N(0, I)), summed over latent dimensions and batch

mod vae;

pub use vae::{kl_divergence, reconstruction_loss, LossOutput, VaeLoss};
