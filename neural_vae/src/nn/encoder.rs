//! Convolutional encoder: image -> (mu, log_var).

use burn::module::Module;
use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::nn::{Linear, LinearConfig, PaddingConfig2d, Relu};
use burn::prelude::*;
use vae_core::{ConvStage, EncoderLayout};

use crate::config::VaeConfig;
use crate::error::Result;

/// Encoder mapping `[batch, 3, S, S]` images to the posterior statistics.
///
/// Architecture:
/// 1. Seven convolution stages from [`EncoderLayout::STANDARD`], ReLU after each
/// 2. Flatten the `128 x S/16 x S/16` volume
/// 3. Dense layer to `hidden_dim`, ReLU
/// 4. Two parallel heads producing mu and log-variance
#[derive(Module, Debug)]
pub struct Encoder<B: Backend> {
    refine1: Conv2d<B>,
    halve1: Conv2d<B>,
    refine2: Conv2d<B>,
    halve2: Conv2d<B>,
    refine3: Conv2d<B>,
    halve3: Conv2d<B>,
    halve4: Conv2d<B>,
    /// Flattened features -> hidden_dim.
    dense: Linear<B>,
    /// Posterior mean head.
    fc_mu: Linear<B>,
    /// Posterior log-variance head.
    fc_log_var: Linear<B>,
    activation: Relu,
}

fn conv<B: Backend>(stage: &ConvStage, device: &B::Device) -> Conv2d<B> {
    Conv2dConfig::new(
        [stage.in_channels, stage.out_channels],
        [stage.kernel, stage.kernel],
    )
    .with_stride([stage.stride, stage.stride])
    .with_padding(PaddingConfig2d::Explicit(stage.padding, stage.padding))
    .init(device)
}

impl<B: Backend> Encoder<B> {
    /// Create a new encoder from configuration.
    ///
    /// The dense layer's input width is taken from the planned geometry.
    pub fn new(config: &VaeConfig, device: &B::Device) -> Result<Self> {
        let geometry = config.geometry()?;
        let layout = EncoderLayout::STANDARD;

        Ok(Self {
            refine1: conv(&layout.refine1, device),
            halve1: conv(&layout.halve1, device),
            refine2: conv(&layout.refine2, device),
            halve2: conv(&layout.halve2, device),
            refine3: conv(&layout.refine3, device),
            halve3: conv(&layout.halve3, device),
            halve4: conv(&layout.halve4, device),
            dense: LinearConfig::new(geometry.flattened_len(), config.hidden_dim).init(device),
            fc_mu: LinearConfig::new(config.hidden_dim, config.latent_dim).init(device),
            fc_log_var: LinearConfig::new(config.hidden_dim, config.latent_dim).init(device),
            activation: Relu::new(),
        })
    }

    /// Hidden features before the latent heads.
    ///
    /// Input shape: [batch, 3, S, S]
    /// Output shape: [batch, hidden_dim]
    pub fn features(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let stages = [
            &self.refine1,
            &self.halve1,
            &self.refine2,
            &self.halve2,
            &self.refine3,
            &self.halve3,
            &self.halve4,
        ];

        let mut x = images;
        for stage in stages {
            x = self.activation.forward(stage.forward(x));
        }

        let flat: Tensor<B, 2> = x.flatten(1, 3);
        self.activation.forward(self.dense.forward(flat))
    }

    /// Forward pass.
    ///
    /// Input shape: [batch, 3, S, S]
    /// Output: (mu, log_var), each [batch, latent_dim]
    pub fn forward(&self, images: Tensor<B, 4>) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let hidden = self.features(images);
        let mu = self.fc_mu.forward(hidden.clone());
        let log_var = self.fc_log_var.forward(hidden);
        (mu, log_var)
    }

    /// Length of the latent statistics.
    pub fn latent_dim(&self) -> usize {
        self.fc_mu.weight.dims()[1]
    }
}
