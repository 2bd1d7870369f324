//! Latent sampling.
//!
//! Both functions draw from the backend RNG, so [`Backend::seed`] makes them
//! reproducible.

use burn::prelude::*;
use burn::tensor::Distribution;

/// Draw `z = mu + eps * exp(0.5 * log_var)` with `eps ~ N(0, I)`.
///
/// Gradients flow to `mu` and `log_var`; the noise is a constant.
pub fn reparameterize<B: Backend, const D: usize>(
    mu: Tensor<B, D>,
    log_var: Tensor<B, D>,
) -> Tensor<B, D> {
    let std = log_var.mul_scalar(0.5).exp();
    let eps = std.random_like(Distribution::Normal(0.0, 1.0));
    mu + eps * std
}

/// Draw `count` latent codes from the standard normal prior.
pub fn sample_prior<B: Backend>(
    count: usize,
    latent_dim: usize,
    device: &B::Device,
) -> Tensor<B, 2> {
    Tensor::random([count, latent_dim], Distribution::Normal(0.0, 1.0), device)
}
