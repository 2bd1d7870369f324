//! Error types for vae_core operations.
//!
//! Provides a simple error enum with no external dependencies for no_std compatibility.

use core::fmt;

use crate::geometry::FeatureVolume;

/// Errors raised while planning the VAE architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaeCoreError {
    /// A stage was declared with a zero stride.
    ZeroStride {
        /// Name of the offending stage.
        stage: &'static str,
    },
    /// The (padded) input is smaller than the stage's kernel.
    KernelExceedsInput {
        /// Name of the offending stage.
        stage: &'static str,
        /// Spatial size of the input.
        input: usize,
        /// Kernel size of the stage.
        kernel: usize,
    },
    /// A stage received a volume with the wrong channel count.
    ChannelMismatch {
        /// Name of the offending stage.
        stage: &'static str,
        /// Channels the stage was declared with.
        expected: usize,
        /// Channels it actually received.
        got: usize,
    },
    /// The image size cannot be reduced by the encoder's downsampling factor.
    InvalidImageSize {
        /// Requested square image size.
        size: usize,
        /// Total downsampling factor of the encoder.
        factor: usize,
    },
    /// The decoder does not reproduce the image volume.
    DecoderOutputMismatch {
        /// Image volume the decoder must produce.
        expected: FeatureVolume,
        /// Volume it produces instead.
        got: FeatureVolume,
    },
}

impl fmt::Display for VaeCoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VaeCoreError::ZeroStride { stage } => {
                write!(f, "stage {} has a zero stride", stage)
            }
            VaeCoreError::KernelExceedsInput {
                stage,
                input,
                kernel,
            } => write!(
                f,
                "stage {}: kernel {} exceeds padded input size {}",
                stage, kernel, input
            ),
            VaeCoreError::ChannelMismatch {
                stage,
                expected,
                got,
            } => write!(
                f,
                "stage {} expects {} input channels, got {}",
                stage, expected, got
            ),
            VaeCoreError::InvalidImageSize { size, factor } => write!(
                f,
                "image size {} is not a positive multiple of {}",
                size, factor
            ),
            VaeCoreError::DecoderOutputMismatch { expected, got } => write!(
                f,
                "decoder produces {} but the image volume is {}",
                got, expected
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for VaeCoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "std")]
    #[test]
    fn test_error_display() {
        use std::format;

        let err = VaeCoreError::ZeroStride { stage: "halve1" };
        assert_eq!(format!("{}", err), "stage halve1 has a zero stride");

        let err = VaeCoreError::ChannelMismatch {
            stage: "refine2",
            expected: 16,
            got: 32,
        };
        assert_eq!(
            format!("{}", err),
            "stage refine2 expects 16 input channels, got 32"
        );

        let err = VaeCoreError::InvalidImageSize {
            size: 100,
            factor: 16,
        };
        assert_eq!(
            format!("{}", err),
            "image size 100 is not a positive multiple of 16"
        );

        let err = VaeCoreError::DecoderOutputMismatch {
            expected: FeatureVolume::square(3, 256),
            got: FeatureVolume::square(3, 240),
        };
        assert_eq!(
            format!("{}", err),
            "decoder produces 3x240x240 but the image volume is 3x256x256"
        );
    }

    #[test]
    fn test_error_equality() {
        let err1 = VaeCoreError::ZeroStride { stage: "a" };
        let err2 = VaeCoreError::ZeroStride { stage: "a" };
        let err3 = VaeCoreError::ZeroStride { stage: "b" };

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
