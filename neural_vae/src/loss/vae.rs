//! Reconstruction and divergence terms.

use burn::nn::loss::{MseLoss, Reduction};
use burn::prelude::*;
use burn::tensor::ElementConversion;

use crate::nn::VaeOutput;

/// Scalar loss terms of one batch.
#[derive(Debug, Clone)]
pub struct LossOutput<B: Backend> {
    /// `reconstruction + divergence`, the value that is differentiated.
    pub total: Tensor<B, 1>,
    /// Mean squared error.
    pub reconstruction: Tensor<B, 1>,
    /// KL divergence to the standard normal prior.
    pub divergence: Tensor<B, 1>,
}

impl<B: Backend> LossOutput<B> {
    /// Read the three terms back as `(total, reconstruction, divergence)`.
    pub fn values(&self) -> (f64, f64, f64) {
        (
            self.total.clone().into_scalar().elem::<f64>(),
            self.reconstruction.clone().into_scalar().elem::<f64>(),
            self.divergence.clone().into_scalar().elem::<f64>(),
        )
    }
}

/// Mean squared error over every element.
///
/// Input: two tensors of identical shape
/// Output: scalar loss
pub fn reconstruction_loss<B: Backend, const D: usize>(
    reconstruction: Tensor<B, D>,
    target: Tensor<B, D>,
) -> Tensor<B, 1> {
    MseLoss::new().forward(reconstruction, target, Reduction::Mean)
}

/// KL divergence of `N(mu, exp(log_var))` from `N(0, I)`.
///
/// L_kld = -0.5 * sum(1 + log_var - mu² - exp(log_var))
///
/// The sum runs over every element, so the term grows with batch size
/// while the reconstruction term does not.
pub fn kl_divergence<B: Backend, const D: usize>(
    mu: Tensor<B, D>,
    log_var: Tensor<B, D>,
) -> Tensor<B, 1> {
    let mu_sq = mu.powf_scalar(2.0);
    let var = log_var.clone().exp();

    log_var
        .add_scalar(1.0)
        .sub(mu_sq)
        .sub(var)
        .sum()
        .mul_scalar(-0.5)
}

/// VAE objective.
#[derive(Debug, Clone, Default)]
pub struct VaeLoss;

impl VaeLoss {
    /// Create a new loss calculator.
    pub fn new() -> Self {
        Self
    }

    /// Compute all terms from a forward pass and its input batch.
    pub fn forward<B: Backend>(&self, output: VaeOutput<B>, target: Tensor<B, 4>) -> LossOutput<B> {
        let reconstruction = reconstruction_loss(output.reconstruction, target);
        let divergence = kl_divergence(output.mu, output.log_var);
        let total = reconstruction.clone() + divergence.clone();

        LossOutput {
            total,
            reconstruction,
            divergence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_mse_known_value() {
        let device = Default::default();
        let a = Tensor::<TestBackend, 2>::from_floats([[0.0, 1.0], [1.0, 0.0]], &device);
        let b = Tensor::<TestBackend, 2>::zeros([2, 2], &device);

        let loss: f32 = reconstruction_loss(a, b).into_scalar();
        assert!((loss - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_kl_known_value() {
        let device = Default::default();
        // mu = 1, log_var = 0: -0.5 * (1 + 0 - 1 - 1) = 0.5 per element.
        let mu = Tensor::<TestBackend, 2>::ones([2, 3], &device);
        let log_var = Tensor::<TestBackend, 2>::zeros([2, 3], &device);

        let kl: f32 = kl_divergence(mu, log_var).into_scalar();
        assert!((kl - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_total_is_sum() {
        let device = Default::default();
        let output = VaeOutput {
            reconstruction: Tensor::<TestBackend, 4>::full([1, 3, 2, 2], 0.5, &device),
            mu: Tensor::ones([1, 4], &device),
            log_var: Tensor::zeros([1, 4], &device),
        };
        let target = Tensor::zeros([1, 3, 2, 2], &device);

        let (total, rec, div) = VaeLoss::new().forward(output, target).values();
        assert!((rec - 0.25).abs() < 1e-6);
        assert!((div - 2.0).abs() < 1e-5);
        assert!((total - (rec + div)).abs() < 1e-5);
    }
}
