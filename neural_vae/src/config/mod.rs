//! Configuration types for neural_vae.
//!
//! This module provides Burn-style configuration structs for the model,
//! the training loop and the generator. All of them serialize to JSON through
//! Burn's `Config` trait, which is how the binaries read overrides.

mod network;
mod training;

pub use network::VaeConfig;
pub use training::{GenerationConfig, TrainingConfig};
