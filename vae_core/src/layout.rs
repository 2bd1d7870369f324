//! Fixed encoder/decoder layouts.
//!
//! The encoder alternates size-preserving "refine" stages with "halve"
//! stages, the decoder doubles the resolution four times:
//!
//! ```text
//! encoder  3x256x256 -> 16x256 -> 16x128 -> 32x128 -> 32x64 -> 64x64 -> 64x32 -> 128x16x16
//! decoder  128x16x16 -> 64x32 -> 32x64 -> 16x128 -> 3x256x256
//! ```
//!
//! The flattened encoder width is derived from the layout, never declared.

use crate::error::VaeCoreError;
use crate::geometry::{ConvStage, FeatureVolume, TransposedConvStage};
use crate::IMAGE_CHANNELS;

/// The seven named convolution stages of the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderLayout {
    /// 3 -> 16, full resolution.
    pub refine1: ConvStage,
    /// 16 -> 16, half resolution.
    pub halve1: ConvStage,
    /// 16 -> 32.
    pub refine2: ConvStage,
    /// 32 -> 32, half resolution.
    pub halve2: ConvStage,
    /// 32 -> 64.
    pub refine3: ConvStage,
    /// 64 -> 64, half resolution.
    pub halve3: ConvStage,
    /// 64 -> 128, half resolution.
    pub halve4: ConvStage,
}

impl EncoderLayout {
    /// The standard encoder layout.
    pub const STANDARD: Self = Self {
        refine1: ConvStage::refine("refine1", 3, 16),
        halve1: ConvStage::halve("halve1", 16, 16),
        refine2: ConvStage::refine("refine2", 16, 32),
        halve2: ConvStage::halve("halve2", 32, 32),
        refine3: ConvStage::refine("refine3", 32, 64),
        halve3: ConvStage::halve("halve3", 64, 64),
        halve4: ConvStage::halve("halve4", 64, 128),
    };

    /// Stages in execution order.
    pub fn stages(&self) -> [&ConvStage; 7] {
        [
            &self.refine1,
            &self.halve1,
            &self.refine2,
            &self.halve2,
            &self.refine3,
            &self.halve3,
            &self.halve4,
        ]
    }

    /// Channels entering the first stage.
    pub fn in_channels(&self) -> usize {
        self.refine1.in_channels
    }

    /// Channels leaving the last stage.
    pub fn out_channels(&self) -> usize {
        self.halve4.out_channels
    }

    /// Product of all stage strides.
    pub fn downsampling_factor(&self) -> usize {
        self.stages().iter().map(|s| s.stride.max(1)).product()
    }

    /// Volume produced for a given input volume.
    pub fn output_volume(&self, input: FeatureVolume) -> Result<FeatureVolume, VaeCoreError> {
        self.stages()
            .iter()
            .try_fold(input, |volume, stage| stage.apply(volume))
    }

    /// Learnable parameters across all convolution stages.
    pub fn num_params(&self) -> usize {
        self.stages().iter().map(|s| s.num_params()).sum()
    }
}

impl Default for EncoderLayout {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// The four named transposed convolution stages of the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderLayout {
    /// 128 -> 64.
    pub up1: TransposedConvStage,
    /// 64 -> 32.
    pub up2: TransposedConvStage,
    /// 32 -> 16.
    pub up3: TransposedConvStage,
    /// 16 -> 3, followed by the sigmoid instead of ReLU.
    pub up4: TransposedConvStage,
}

impl DecoderLayout {
    /// The standard decoder layout.
    pub const STANDARD: Self = Self {
        up1: TransposedConvStage::double("up1", 128, 64),
        up2: TransposedConvStage::double("up2", 64, 32),
        up3: TransposedConvStage::double("up3", 32, 16),
        up4: TransposedConvStage::double("up4", 16, 3),
    };

    /// Stages in execution order.
    pub fn stages(&self) -> [&TransposedConvStage; 4] {
        [&self.up1, &self.up2, &self.up3, &self.up4]
    }

    /// Channels entering the first stage.
    pub fn in_channels(&self) -> usize {
        self.up1.in_channels
    }

    /// Channels leaving the last stage.
    pub fn out_channels(&self) -> usize {
        self.up4.out_channels
    }

    /// Volume produced for a given input volume.
    pub fn output_volume(&self, input: FeatureVolume) -> Result<FeatureVolume, VaeCoreError> {
        self.stages()
            .iter()
            .try_fold(input, |volume, stage| stage.apply(volume))
    }

    /// Learnable parameters across all transposed convolution stages.
    pub fn num_params(&self) -> usize {
        self.stages().iter().map(|s| s.num_params()).sum()
    }
}

impl Default for DecoderLayout {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Validated shapes of a full encoder/decoder pair for one image size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaeGeometry {
    /// Input and reconstruction volume.
    pub image: FeatureVolume,
    /// Encoder output, and the volume the decoder starts from.
    pub features: FeatureVolume,
}

impl VaeGeometry {
    /// Plan the geometry for square `image_size` RGB images.
    ///
    /// Fails if any stage does not chain, if the image size is not a multiple
    /// of the encoder's downsampling factor, or if the decoder does not map
    /// the encoder's output volume back to the image volume.
    pub fn plan(
        encoder: &EncoderLayout,
        decoder: &DecoderLayout,
        image_size: usize,
    ) -> Result<Self, VaeCoreError> {
        let factor = encoder.downsampling_factor();
        if image_size == 0 || image_size % factor != 0 {
            return Err(VaeCoreError::InvalidImageSize {
                size: image_size,
                factor,
            });
        }

        let image = FeatureVolume::square(IMAGE_CHANNELS, image_size);
        let features = encoder.output_volume(image)?;

        if decoder.in_channels() != features.channels {
            return Err(VaeCoreError::ChannelMismatch {
                stage: decoder.up1.name,
                expected: decoder.in_channels(),
                got: features.channels,
            });
        }

        let reconstructed = decoder.output_volume(features)?;
        if reconstructed != image {
            return Err(VaeCoreError::DecoderOutputMismatch {
                expected: image,
                got: reconstructed,
            });
        }

        Ok(Self { image, features })
    }

    /// Plan the standard layouts.
    pub fn standard(image_size: usize) -> Result<Self, VaeCoreError> {
        Self::plan(&EncoderLayout::STANDARD, &DecoderLayout::STANDARD, image_size)
    }

    /// Width of the flattened encoder output.
    pub fn flattened_len(&self) -> usize {
        self.features.len()
    }

    /// Side length of the square images.
    pub fn image_size(&self) -> usize {
        self.image.height
    }
}
