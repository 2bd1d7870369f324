//! VAE trainer implementation.

use burn::module::{AutodiffModule, Module};
use burn::optim::{GradientsParams, Optimizer};
use burn::prelude::*;
use burn::tensor::backend::AutodiffBackend;
use burn::tensor::ElementConversion;
use vae_core::{EpochAccumulator, EpochSummary};

use crate::config::TrainingConfig;
use crate::data::ImageFolder;
use crate::error::Result;
use crate::loss::{reconstruction_loss, VaeLoss};
use crate::nn::Vae;

use super::batch::BatchSampler;
use super::checkpoint::{checkpoint_exists, load_checkpoint, save_checkpoint};
use super::history::TrainingHistory;
use super::metrics::{StepMetrics, TrainOutput};

/// Perform one optimizer step on a batch.
///
/// Runs the forward pass with sampling, backpropagates the total loss and
/// applies the optimizer update. Returns the updated model and the loss values
/// measured before the update.
pub fn train_step<B, O>(
    model: Vae<B>,
    optimizer: &mut O,
    images: Tensor<B, 4>,
    learning_rate: f64,
) -> (Vae<B>, StepMetrics)
where
    B: AutodiffBackend,
    O: Optimizer<Vae<B>, B>,
{
    let output = model.forward(images.clone());
    let step = TrainOutput::from_loss(VaeLoss::new().forward(output, images));

    let grads = step.loss.backward();
    let grads = GradientsParams::from_grads(grads, &model);
    let model = optimizer.step(learning_rate, model, grads);

    (model, step.metrics)
}

/// Mean reconstruction error over `dataset`, one image at a time.
///
/// Uses the full forward pass, sampling included, so repeated calls differ
/// unless the backend is seeded.
pub fn evaluate<B: Backend>(
    model: &Vae<B>,
    dataset: &ImageFolder,
    device: &B::Device,
) -> Result<f64> {
    let mut total = 0.0;
    for index in 0..dataset.len() {
        let images = dataset.batch::<B>(&[index], device)?;
        model.check_images(&images)?;

        let output = model.forward(images.clone());
        total += reconstruction_loss(output.reconstruction, images)
            .into_scalar()
            .elem::<f64>();
    }

    Ok(total / dataset.len().max(1) as f64)
}

/// Trainer driving the epoch loop.
///
/// Each epoch trains on shuffled batches, evaluates on the held-out set,
/// appends a history line and saves a checkpoint when the schedule says so.
/// The final model is saved separately once every epoch has run.
pub struct VaeTrainer<B: AutodiffBackend> {
    config: TrainingConfig,
    device: B::Device,
}

impl<B: AutodiffBackend> std::fmt::Debug for VaeTrainer<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaeTrainer")
            .field("model", &self.config.model)
            .field("num_epochs", &self.config.num_epochs)
            .field("batch_size", &self.config.batch_size)
            .field("learning_rate", &self.config.learning_rate)
            .field("device", &self.device)
            .finish()
    }
}

impl<B: AutodiffBackend> VaeTrainer<B> {
    /// Create a new trainer from configuration.
    pub fn new(config: TrainingConfig, device: B::Device) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, device })
    }

    /// Get the training configuration.
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Device the model lives on.
    pub fn device(&self) -> &B::Device {
        &self.device
    }

    /// Resume from the periodic checkpoint if one exists, otherwise start fresh.
    pub fn init_model(&self) -> Result<Vae<B>> {
        let path = &self.config.checkpoint_path;
        if checkpoint_exists(path) {
            let (model, metadata) = load_checkpoint::<B>(&self.config.model, path, &self.device)?;
            log::info!(
                "Resuming from {:?} (saved after epoch {:?})",
                path,
                metadata.epoch
            );
            return Ok(model);
        }

        log::warn!("No checkpoint found at {:?}, starting from scratch", path);
        let model = self.config.model.init::<B>(&self.device)?;
        log::info!("Model has {} parameters", model.num_params());
        Ok(model)
    }

    /// Train one epoch, returning the updated model and the accumulated losses.
    pub fn train_epoch<O>(
        &self,
        mut model: Vae<B>,
        optimizer: &mut O,
        sampler: &mut BatchSampler,
        dataset: &ImageFolder,
    ) -> Result<(Vae<B>, EpochAccumulator)>
    where
        O: Optimizer<Vae<B>, B>,
    {
        let mut accumulator = EpochAccumulator::new();

        for (batch_index, indices) in sampler.epoch(dataset.len()).iter().enumerate() {
            let images = dataset.batch::<B>(indices, &self.device)?;
            model.check_images(&images)?;

            let (next, metrics) = train_step(model, optimizer, images, self.config.learning_rate);
            model = next;
            accumulator.add(metrics.total_loss, metrics.mse_loss, metrics.kld_loss);

            log::debug!(
                "batch {} ({} images): total={:.6} mse={:.6} kld={:.6}",
                batch_index,
                indices.len(),
                metrics.total_loss,
                metrics.mse_loss,
                metrics.kld_loss
            );
        }

        Ok((model, accumulator))
    }

    /// Run the full training loop and return the trained model.
    ///
    /// Steps per epoch:
    /// 1. Train on every batch of `train`
    /// 2. Evaluate reconstruction error on `test`
    /// 3. Append the epoch summary to the history file
    /// 4. Save the periodic checkpoint if due
    pub fn run(&self, train: &ImageFolder, test: &ImageFolder) -> Result<Vae<B>> {
        if let Some(seed) = self.config.seed {
            B::seed(seed);
        }

        let mut model = self.init_model()?;
        let mut optimizer = self.config.optimizer_config().init();
        let mut sampler = BatchSampler::new(
            self.config.batch_size,
            self.config.shuffle,
            self.config.seed,
        );
        let schedule = self.config.checkpoint_schedule();
        let history = TrainingHistory::new(&self.config.history_path);

        log::info!(
            "Training for {} epochs on {} images ({} batches of up to {}), evaluating on {}",
            self.config.num_epochs,
            train.len(),
            sampler.num_batches(train.len()),
            sampler.batch_size(),
            test.len()
        );

        for epoch in 0..self.config.num_epochs {
            let (next, accumulator) = self.train_epoch(model, &mut optimizer, &mut sampler, train)?;
            model = next;

            let test_mse = evaluate(&model.valid(), test, &self.device)?;
            let summary = accumulator.finish(epoch, test_mse);
            self.report(&summary);
            history.append(&summary)?;

            if schedule.is_due(epoch) {
                save_checkpoint(
                    &model,
                    &self.config.model,
                    Some(epoch),
                    &self.config.checkpoint_path,
                )?;
            }
        }

        save_checkpoint(&model, &self.config.model, None, &self.config.final_checkpoint_path)?;

        Ok(model)
    }

    fn report(&self, summary: &EpochSummary) {
        if !summary.is_finite() {
            log::warn!("Non-finite loss in epoch {}", summary.epoch + 1);
        }
        log::info!("{}", console_line(summary));
    }
}

/// Console form of an epoch summary, numbering epochs from 1.
///
/// The history file keeps the 0-based `Display` form of [`EpochSummary`].
pub fn console_line(summary: &EpochSummary) -> String {
    format!(
        "Epoch {}, Avg Total Loss: {:.6}, Avg MSE Loss: {:.6}, Avg KLD Loss: {:.6}, Test MSE Loss: {:.6}",
        summary.epoch + 1,
        summary.avg_total_loss,
        summary.avg_mse_loss,
        summary.avg_kld_loss,
        summary.test_mse_loss
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VaeConfig;
    use burn::backend::{Autodiff, NdArray};
    use burn::optim::AdamConfig;

    type TestBackend = Autodiff<NdArray>;

    #[test]
    fn test_train_step_changes_parameters() {
        let device = Default::default();
        let config = VaeConfig::new(4).with_image_size(16).with_hidden_dim(8);
        let model = config.init::<TestBackend>(&device).unwrap();
        let mut optimizer = AdamConfig::new().init();

        let images = Tensor::<TestBackend, 4>::full([2, 3, 16, 16], 0.3, &device);
        let latent = Tensor::<TestBackend, 2>::zeros([1, 4], &device);
        let before: Vec<f32> = model.decode(latent.clone()).into_data().to_vec().unwrap();

        let (model, metrics) = train_step(model, &mut optimizer, images, 1e-2);
        let after: Vec<f32> = model.decode(latent).into_data().to_vec().unwrap();

        assert!(metrics.is_finite());
        assert!(metrics.total_loss > 0.0);
        assert_ne!(before, after);
    }

    #[test]
    fn test_console_line_counts_from_one() {
        let summary = EpochSummary {
            epoch: 0,
            avg_total_loss: 1.5,
            avg_mse_loss: 0.25,
            avg_kld_loss: 1.25,
            test_mse_loss: 0.125,
        };

        assert_eq!(
            console_line(&summary),
            "Epoch 1, Avg Total Loss: 1.500000, Avg MSE Loss: 0.250000, \
             Avg KLD Loss: 1.250000, Test MSE Loss: 0.125000"
        );
        assert!(summary.to_string().starts_with("Epoch: 0, Avg_Total_Loss: "));
    }

    #[test]
    fn test_trainer_debug_names_model() {
        let trainer = VaeTrainer::<TestBackend>::new(TrainingConfig::default(), Default::default())
            .unwrap();
        let text = format!("{trainer:?}");
        assert!(text.starts_with("VaeTrainer"));
        assert!(text.contains("latent_dim: 2056"));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = TrainingConfig::default().with_batch_size(0);
        assert!(VaeTrainer::<TestBackend>::new(config, Default::default()).is_err());
    }
}
