//! # vae_core
//!
//! Pure bookkeeping for the convolutional variational autoencoder.
//!
//! This crate holds everything about the VAE that can be stated without a
//! tensor runtime: the geometry of every convolution stage, the fixed named
//! encoder/decoder layouts, the checkpoint cadence and the per-epoch summary
//! record written to the training history. `neural_vae` builds the Burn
//! modules from these descriptions, so a layout that does not chain is
//! rejected before a single weight is allocated.
//!
//! ## Features
//!
//! - **no_std compatible**: No allocation, no dependencies
//! - **Construction-time shape checks**: Stage chaining and spatial sizes are
//!   validated up front, including the flattened encoder width
//! - **Named stages**: Each stage carries the field name used for its weights
//!
//! ## Feature Flags
//!
//! - `std` (default): Implements `std::error::Error` for [`VaeCoreError`]
//!
//! ## Modules
//!
//! - [`geometry`]: `ConvStage`, `TransposedConvStage`, `FeatureVolume`
//! - [`layout`]: `EncoderLayout`, `DecoderLayout`, `VaeGeometry`
//! - [`schedule`]: `CheckpointSchedule`
//! - [`summary`]: `EpochAccumulator`, `EpochSummary`
//! - [`error`]: Error types
//!
//! ## Usage
//!
//! ```ignore
//! use vae_core::prelude::*;
//!
//! let geometry = VaeGeometry::plan(&EncoderLayout::STANDARD, &DecoderLayout::STANDARD, 256)?;
//! assert_eq!(geometry.flattened_len(), 128 * 16 * 16);
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]

#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod geometry;
pub mod layout;
pub mod schedule;
pub mod summary;

pub use error::VaeCoreError;
pub use geometry::{ConvStage, FeatureVolume, TransposedConvStage};
pub use layout::{DecoderLayout, EncoderLayout, VaeGeometry};
pub use schedule::CheckpointSchedule;
pub use summary::{EpochAccumulator, EpochSummary};

/// Number of colour channels in every image the model sees.
pub const IMAGE_CHANNELS: usize = 3;

/// Default square image resolution.
pub const DEFAULT_IMAGE_SIZE: usize = 256;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::VaeCoreError;
    pub use crate::geometry::{ConvStage, FeatureVolume, TransposedConvStage};
    pub use crate::layout::{DecoderLayout, EncoderLayout, VaeGeometry};
    pub use crate::schedule::CheckpointSchedule;
    pub use crate::summary::{EpochAccumulator, EpochSummary};
    pub use crate::{DEFAULT_IMAGE_SIZE, IMAGE_CHANNELS};
}
