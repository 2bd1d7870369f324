//! Transposed-convolution decoder: latent code -> image.

use burn::module::Module;
use burn::nn::conv::{ConvTranspose2d, ConvTranspose2dConfig};
use burn::nn::{Linear, LinearConfig, Relu};
use burn::prelude::*;
use burn::tensor::activation::sigmoid;
use vae_core::{DecoderLayout, TransposedConvStage};

use crate::config::VaeConfig;
use crate::error::Result;

/// Decoder mapping `[batch, latent_dim]` codes to `[batch, 3, S, S]` images in `[0, 1]`.
#[derive(Module, Debug)]
pub struct Decoder<B: Backend> {
    expand: Linear<B>,
    project: Linear<B>,
    up1: ConvTranspose2d<B>,
    up2: ConvTranspose2d<B>,
    up3: ConvTranspose2d<B>,
    up4: ConvTranspose2d<B>,
    activation: Relu,
    feature_channels: usize,
    feature_size: usize,
}

fn conv_transpose<B: Backend>(
    stage: &TransposedConvStage,
    device: &B::Device,
) -> ConvTranspose2d<B> {
    ConvTranspose2dConfig::new(
        [stage.in_channels, stage.out_channels],
        [stage.kernel, stage.kernel],
    )
    .with_stride([stage.stride, stage.stride])
    .with_padding([stage.padding, stage.padding])
    .with_padding_out([stage.output_padding, stage.output_padding])
    .init(device)
}

impl<B: Backend> Decoder<B> {
    /// Create a new decoder from configuration.
    pub fn new(config: &VaeConfig, device: &B::Device) -> Result<Self> {
        let geometry = config.geometry()?;
        let layout = DecoderLayout::STANDARD;

        Ok(Self {
            expand: LinearConfig::new(config.latent_dim, config.hidden_dim).init(device),
            project: LinearConfig::new(config.hidden_dim, geometry.flattened_len()).init(device),
            up1: conv_transpose(&layout.up1, device),
            up2: conv_transpose(&layout.up2, device),
            up3: conv_transpose(&layout.up3, device),
            up4: conv_transpose(&layout.up4, device),
            activation: Relu::new(),
            feature_channels: geometry.features.channels,
            feature_size: geometry.features.height,
        })
    }

    /// Forward pass.
    ///
    /// Input shape: [batch, latent_dim]
    /// Output shape: [batch, 3, S, S], every value in [0, 1]
    pub fn forward(&self, latents: Tensor<B, 2>) -> Tensor<B, 4> {
        let [batch, _] = latents.dims();

        let x = self.activation.forward(self.expand.forward(latents));
        let x = self.activation.forward(self.project.forward(x));
        let x: Tensor<B, 4> =
            x.reshape([batch, self.feature_channels, self.feature_size, self.feature_size]);

        let x = self.activation.forward(self.up1.forward(x));
        let x = self.activation.forward(self.up2.forward(x));
        let x = self.activation.forward(self.up3.forward(x));
        sigmoid(self.up4.forward(x))
    }

    /// Length of the accepted latent codes.
    pub fn latent_dim(&self) -> usize {
        self.expand.weight.dims()[0]
    }
}
