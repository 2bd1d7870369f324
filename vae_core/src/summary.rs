//! Per-epoch loss accumulation and the training history record.

use core::fmt;

/// Running sums of the three training losses over one epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EpochAccumulator {
    total: f64,
    reconstruction: f64,
    divergence: f64,
    batches: usize,
}

impl EpochAccumulator {
    /// Create an empty accumulator.
    pub const fn new() -> Self {
        Self {
            total: 0.0,
            reconstruction: 0.0,
            divergence: 0.0,
            batches: 0,
        }
    }

    /// Add the losses of one batch.
    pub fn add(&mut self, total: f64, reconstruction: f64, divergence: f64) {
        self.total += total;
        self.reconstruction += reconstruction;
        self.divergence += divergence;
        self.batches += 1;
    }

    /// Number of batches seen.
    pub const fn batches(&self) -> usize {
        self.batches
    }

    /// Clear all sums.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Average the sums over the batches seen and build the epoch record.
    ///
    /// With no batches every average is zero.
    pub fn finish(&self, epoch: usize, test_mse_loss: f64) -> EpochSummary {
        let n = self.batches.max(1) as f64;
        EpochSummary {
            epoch,
            avg_total_loss: self.total / n,
            avg_mse_loss: self.reconstruction / n,
            avg_kld_loss: self.divergence / n,
            test_mse_loss,
        }
    }
}

/// One line of the training history.
///
/// `Display` renders the history format:
///
/// ```text
/// Epoch: 3, Avg_Total_Loss: 0.123456, Avg_MSE_Loss: 0.023456, Avg_KLD_Loss: 0.100000, Test_MSE_Loss: 0.030000
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochSummary {
    /// 0-based epoch index.
    pub epoch: usize,
    /// Mean total loss over the epoch's batches.
    pub avg_total_loss: f64,
    /// Mean reconstruction (MSE) loss.
    pub avg_mse_loss: f64,
    /// Mean KL divergence loss.
    pub avg_kld_loss: f64,
    /// Mean reconstruction loss on the held-out set.
    pub test_mse_loss: f64,
}

impl EpochSummary {
    /// Whether every loss value is finite.
    pub fn is_finite(&self) -> bool {
        self.avg_total_loss.is_finite()
            && self.avg_mse_loss.is_finite()
            && self.avg_kld_loss.is_finite()
            && self.test_mse_loss.is_finite()
    }
}

impl fmt::Display for EpochSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Epoch: {}, Avg_Total_Loss: {:.6}, Avg_MSE_Loss: {:.6}, Avg_KLD_Loss: {:.6}, Test_MSE_Loss: {:.6}",
            self.epoch, self.avg_total_loss, self.avg_mse_loss, self.avg_kld_loss, self.test_mse_loss
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulator_average() {
        let mut acc = EpochAccumulator::new();
        acc.add(1.0, 0.25, 0.75);
        acc.add(3.0, 0.75, 2.25);
        assert_eq!(acc.batches(), 2);

        let summary = acc.finish(7, 0.5);
        assert_eq!(summary.epoch, 7);
        assert!((summary.avg_total_loss - 2.0).abs() < 1e-12);
        assert!((summary.avg_mse_loss - 0.5).abs() < 1e-12);
        assert!((summary.avg_kld_loss - 1.5).abs() < 1e-12);
        assert!((summary.test_mse_loss - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_accumulator_reset() {
        let mut acc = EpochAccumulator::new();
        acc.add(1.0, 1.0, 1.0);
        acc.reset();
        assert_eq!(acc, EpochAccumulator::new());
    }

    #[test]
    fn test_empty_accumulator_is_zero() {
        let summary = EpochAccumulator::new().finish(0, 0.0);
        assert_eq!(summary.avg_total_loss, 0.0);
        assert!(summary.is_finite());
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_history_line_format() {
        use std::format;

        let summary = EpochSummary {
            epoch: 3,
            avg_total_loss: 0.1234564,
            avg_mse_loss: 0.02,
            avg_kld_loss: 0.1,
            test_mse_loss: 0.03,
        };
        assert_eq!(
            format!("{}", summary),
            "Epoch: 3, Avg_Total_Loss: 0.123456, Avg_MSE_Loss: 0.020000, Avg_KLD_Loss: 0.100000, Test_MSE_Loss: 0.030000"
        );
    }
}
