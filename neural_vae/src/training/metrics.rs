//! Training metrics and output types.

use burn::prelude::*;

use crate::loss::LossOutput;

/// Loss values of a single optimizer step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepMetrics {
    /// Reconstruction plus divergence.
    pub total_loss: f64,
    /// Mean squared error.
    pub mse_loss: f64,
    /// KL divergence.
    pub kld_loss: f64,
}

impl StepMetrics {
    /// Create new step metrics.
    pub fn new(total_loss: f64, mse_loss: f64, kld_loss: f64) -> Self {
        Self {
            total_loss,
            mse_loss,
            kld_loss,
        }
    }

    /// Read the metrics back from a loss computation.
    pub fn from_loss<B: Backend>(loss: &LossOutput<B>) -> Self {
        let (total, mse, kld) = loss.values();
        Self::new(total, mse, kld)
    }

    /// Whether every term is a finite number.
    pub fn is_finite(&self) -> bool {
        self.total_loss.is_finite() && self.mse_loss.is_finite() && self.kld_loss.is_finite()
    }
}

/// Output from a single training step.
#[derive(Debug, Clone)]
pub struct TrainOutput<B: Backend> {
    /// Total loss (scalar), still attached to the graph.
    pub loss: Tensor<B, 1>,
    /// Loss values.
    pub metrics: StepMetrics,
}

impl<B: Backend> TrainOutput<B> {
    /// Create a new training output.
    pub fn new(loss: Tensor<B, 1>, metrics: StepMetrics) -> Self {
        Self { loss, metrics }
    }

    /// Build from the loss terms, keeping the total for the backward pass.
    pub fn from_loss(loss: LossOutput<B>) -> Self {
        let metrics = StepMetrics::from_loss(&loss);
        Self::new(loss.total, metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_detected() {
        assert!(StepMetrics::new(1.0, 0.5, 0.5).is_finite());
        assert!(!StepMetrics::new(f64::NAN, 0.5, f64::NAN).is_finite());
        assert!(!StepMetrics::new(f64::INFINITY, 0.5, 0.5).is_finite());
    }
}
