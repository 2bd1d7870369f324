//! Error types for neural_vae.

use std::path::PathBuf;

use burn::record::RecorderError;
use thiserror::Error;

/// Errors that can occur while building, training or sampling the VAE.
#[derive(Error, Debug)]
pub enum NeuralVaeError {
    /// Invalid configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// The stage layout does not chain for the requested image size.
    #[error("invalid architecture: {0}")]
    Layout(#[from] vae_core::VaeCoreError),

    /// Tensor shape mismatch.
    #[error("tensor shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape.
        expected: Vec<usize>,
        /// Actual shape.
        got: Vec<usize>,
    },

    /// A checkpoint does not fit the model it is loaded into.
    #[error("checkpoint mismatch: {message}")]
    CheckpointMismatch {
        /// Description of the mismatch.
        message: String,
    },

    /// The dataset directory holds no samples.
    #[error("dataset directory {path:?} contains no files")]
    EmptyDataset {
        /// Dataset directory.
        path: PathBuf,
    },

    /// An image could not be decoded or encoded.
    #[error("image error for {path:?}: {source}")]
    Image {
        /// File being read or written.
        path: PathBuf,
        /// Underlying codec error.
        #[source]
        source: image::ImageError,
    },

    /// Burn recorder failure while saving or loading parameters.
    #[error("record error: {0}")]
    Record(#[from] RecorderError),

    /// Checkpoint metadata could not be read or written.
    #[error("checkpoint metadata error: {0}")]
    Metadata(#[from] serde_json::Error),

    /// Tensor data could not be read back from the backend.
    #[error("tensor data error: {0}")]
    TensorData(String),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for neural_vae operations.
pub type Result<T> = std::result::Result<T, NeuralVaeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_error_display() {
        let err: NeuralVaeError = vae_core::VaeCoreError::InvalidImageSize {
            size: 100,
            factor: 16,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "invalid architecture: image size 100 is not a positive multiple of 16"
        );
    }

    #[test]
    fn test_shape_mismatch_display() {
        let err = NeuralVaeError::ShapeMismatch {
            expected: vec![3, 256, 256],
            got: vec![1, 256, 256],
        };
        assert_eq!(
            err.to_string(),
            "tensor shape mismatch: expected [3, 256, 256], got [1, 256, 256]"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let err: NeuralVaeError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(err.to_string().starts_with("I/O error"));
    }
}
