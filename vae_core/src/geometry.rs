//! Convolution stage geometry.
//!
//! Output sizes follow the usual conventions:
//!
//! ```text
//! conv:            out = (in + 2p - k) / s + 1
//! transposed conv: out = (in - 1) * s - 2p + k + output_padding
//! ```

use core::fmt;

use crate::error::VaeCoreError;

/// A `channels x height x width` feature volume (batch dimension excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureVolume {
    /// Channel count.
    pub channels: usize,
    /// Spatial height.
    pub height: usize,
    /// Spatial width.
    pub width: usize,
}

impl FeatureVolume {
    /// Create a new volume.
    #[inline]
    pub const fn new(channels: usize, height: usize, width: usize) -> Self {
        Self {
            channels,
            height,
            width,
        }
    }

    /// Create a volume with equal height and width.
    #[inline]
    pub const fn square(channels: usize, size: usize) -> Self {
        Self::new(channels, size, size)
    }

    /// Number of scalar elements in the volume.
    #[inline]
    pub const fn len(&self) -> usize {
        self.channels * self.height * self.width
    }

    /// Whether the volume holds no elements.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimensions as `[channels, height, width]`.
    #[inline]
    pub const fn dims(&self) -> [usize; 3] {
        [self.channels, self.height, self.width]
    }
}

impl fmt::Display for FeatureVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.channels, self.height, self.width)
    }
}

/// A named 2D convolution stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvStage {
    /// Field name of the stage (also its key in checkpoints).
    pub name: &'static str,
    /// Input channels.
    pub in_channels: usize,
    /// Output channels.
    pub out_channels: usize,
    /// Square kernel size.
    pub kernel: usize,
    /// Stride in both spatial dimensions.
    pub stride: usize,
    /// Zero padding on every side.
    pub padding: usize,
}

impl ConvStage {
    /// Create a new stage.
    pub const fn new(
        name: &'static str,
        in_channels: usize,
        out_channels: usize,
        kernel: usize,
        stride: usize,
        padding: usize,
    ) -> Self {
        Self {
            name,
            in_channels,
            out_channels,
            kernel,
            stride,
            padding,
        }
    }

    /// Size-preserving stage that only changes channel depth (k=3, s=1, p=1).
    pub const fn refine(name: &'static str, in_channels: usize, out_channels: usize) -> Self {
        Self::new(name, in_channels, out_channels, 3, 1, 1)
    }

    /// Stage that exactly halves an even spatial size (k=4, s=2, p=1).
    pub const fn halve(name: &'static str, in_channels: usize, out_channels: usize) -> Self {
        Self::new(name, in_channels, out_channels, 4, 2, 1)
    }

    /// Spatial output size for a given input size.
    pub fn output_size(&self, input: usize) -> Result<usize, VaeCoreError> {
        if self.stride == 0 {
            return Err(VaeCoreError::ZeroStride { stage: self.name });
        }
        let padded = input + 2 * self.padding;
        if input == 0 || padded < self.kernel {
            return Err(VaeCoreError::KernelExceedsInput {
                stage: self.name,
                input: padded,
                kernel: self.kernel,
            });
        }
        Ok((padded - self.kernel) / self.stride + 1)
    }

    /// Apply the stage to a volume, checking the channel count.
    pub fn apply(&self, input: FeatureVolume) -> Result<FeatureVolume, VaeCoreError> {
        if input.channels != self.in_channels {
            return Err(VaeCoreError::ChannelMismatch {
                stage: self.name,
                expected: self.in_channels,
                got: input.channels,
            });
        }
        Ok(FeatureVolume::new(
            self.out_channels,
            self.output_size(input.height)?,
            self.output_size(input.width)?,
        ))
    }

    /// Number of learnable parameters (weights and bias).
    pub const fn num_params(&self) -> usize {
        self.in_channels * self.out_channels * self.kernel * self.kernel + self.out_channels
    }
}

/// A named 2D transposed convolution stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransposedConvStage {
    /// Field name of the stage (also its key in checkpoints).
    pub name: &'static str,
    /// Input channels.
    pub in_channels: usize,
    /// Output channels.
    pub out_channels: usize,
    /// Square kernel size.
    pub kernel: usize,
    /// Stride in both spatial dimensions.
    pub stride: usize,
    /// Padding removed from every side of the output.
    pub padding: usize,
    /// Extra size added to one side of the output.
    pub output_padding: usize,
}

impl TransposedConvStage {
    /// Create a new stage.
    pub const fn new(
        name: &'static str,
        in_channels: usize,
        out_channels: usize,
        kernel: usize,
        stride: usize,
        padding: usize,
        output_padding: usize,
    ) -> Self {
        Self {
            name,
            in_channels,
            out_channels,
            kernel,
            stride,
            padding,
            output_padding,
        }
    }

    /// Stage that exactly doubles the spatial size (k=4, s=2, p=1).
    pub const fn double(name: &'static str, in_channels: usize, out_channels: usize) -> Self {
        Self::new(name, in_channels, out_channels, 4, 2, 1, 0)
    }

    /// Spatial output size for a given input size.
    pub fn output_size(&self, input: usize) -> Result<usize, VaeCoreError> {
        if self.stride == 0 {
            return Err(VaeCoreError::ZeroStride { stage: self.name });
        }
        if input == 0 {
            return Err(VaeCoreError::KernelExceedsInput {
                stage: self.name,
                input,
                kernel: self.kernel,
            });
        }
        let full = (input - 1) * self.stride + self.kernel + self.output_padding;
        if full <= 2 * self.padding {
            return Err(VaeCoreError::KernelExceedsInput {
                stage: self.name,
                input,
                kernel: self.kernel,
            });
        }
        Ok(full - 2 * self.padding)
    }

    /// Apply the stage to a volume, checking the channel count.
    pub fn apply(&self, input: FeatureVolume) -> Result<FeatureVolume, VaeCoreError> {
        if input.channels != self.in_channels {
            return Err(VaeCoreError::ChannelMismatch {
                stage: self.name,
                expected: self.in_channels,
                got: input.channels,
            });
        }
        Ok(FeatureVolume::new(
            self.out_channels,
            self.output_size(input.height)?,
            self.output_size(input.width)?,
        ))
    }

    /// Number of learnable parameters (weights and bias).
    pub const fn num_params(&self) -> usize {
        self.in_channels * self.out_channels * self.kernel * self.kernel + self.out_channels
    }
}
