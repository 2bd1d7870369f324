//! Neural network modules.
//!
//! - `Encoder`: convolution stages plus the two latent heads
//! - `Decoder`: dense expansion plus transposed convolutions
//! - `Vae`: composition of both with the reparameterization step

mod decoder;
mod encoder;
pub mod sampler;
mod vae;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use sampler::{reparameterize, sample_prior};
pub use vae::{Vae, VaeOutput};
