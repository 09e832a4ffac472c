use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::audio::dataset::Dataset;
use crate::loss::esr::esr;
use crate::loss::mse::MseLoss;
use crate::math::matrix::Matrix;
use crate::network::model::AmpModel;
use crate::network::network::Network;
use crate::optim::scheduler::ExponentialDecay;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::EpochStats;
use crate::train::observer::{TrainerControl, TrainingObserver};
use crate::train::train_config::LoopConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `model` for up to `config.epochs` epochs and returns the number of
/// epochs actually completed.
///
/// # Arguments
/// - `model`: modified in place
/// - `train`: training windows
/// - `validation`: windows scored after every epoch
/// - `optimizer`: SGD optimizer; its learning rate decays once per epoch
/// - `config`: loop settings
/// - `control`: stop flag shared with the observers
/// - `observers`: notified after every epoch, in order
/// - `rng`: shuffles the window order each epoch
///
/// # Early termination
/// The loop checks `control.should_stop` before each epoch, so an observer
/// that sets it during `on_train_epoch_end` stops the run before the next
/// epoch begins.
#[allow(clippy::too_many_arguments)]
pub fn train_loop<R: Rng>(
    model: &mut AmpModel,
    train: &Dataset,
    validation: &Dataset,
    optimizer: &mut Sgd,
    config: &LoopConfig,
    control: &mut TrainerControl,
    observers: &mut [&mut dyn TrainingObserver],
    rng: &mut R,
) -> usize {
    let schedule = ExponentialDecay::new(config.lr_decay);
    let mut indices = train.strided_indices(config.max_windows_per_epoch);
    let val_indices = validation.strided_indices(config.max_windows_per_epoch);
    let mut completed = 0;

    for epoch in 1..=config.epochs {
        if control.should_stop {
            break;
        }

        let t_start = Instant::now();
        let learning_rate = optimizer.learning_rate;

        indices.shuffle(rng);
        let train_loss = run_one_epoch(&mut model.network, train, &indices, optimizer, config.batch_size);
        let validation_esr = score(model, validation, &val_indices);
        schedule.step(optimizer);
        completed = epoch;

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            validation_esr,
            learning_rate,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        tracing::debug!(
            "epoch {}/{}: loss {:.6}, val ESR {:.4}",
            stats.epoch, stats.total_epochs, stats.train_loss, stats.validation_esr
        );

        for observer in observers.iter_mut() {
            observer.on_train_epoch_end(control, &stats);
        }
    }

    completed
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Runs one pass of mini-batch SGD over the given windows.
/// Returns the mean loss over them.
fn run_one_epoch(
    network: &mut Network,
    data: &Dataset,
    indices: &[usize],
    optimizer: &Sgd,
    batch_size: usize,
) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    let mut total_loss = 0.0;

    for batch in indices.chunks(batch_size.max(1)) {
        let mut acc_grads: Vec<(Matrix, Matrix)> = network.layers.iter()
            .map(|layer| (
                Matrix::zeros(layer.weights.rows, layer.weights.cols),
                Matrix::zeros(layer.biases.rows, layer.biases.cols),
            ))
            .collect();

        for &k in batch {
            let window = data.window(k);
            let output = network.forward(window);
            let error = MseLoss::sample(output[0], data.target(k));

            total_loss += error.loss;
            let mut delta = Matrix::row(&[error.gradient]);

            // Backward pass.
            for i in (0..network.layers.len()).rev() {
                let input_for_layer = if i == 0 {
                    Matrix::row(window)
                } else {
                    network.layers[i - 1].neurons.clone()
                };

                let (w_grad, b_grad) = network.layers[i].compute_gradients(&delta, &input_for_layer);

                if i > 0 {
                    delta = &b_grad * &network.layers[i].weights.transpose();
                }

                acc_grads[i].0.add_scaled(&w_grad, 1.0);
                acc_grads[i].1.add_scaled(&b_grad, 1.0);
            }
        }

        optimizer.apply_batch(network, acc_grads, batch.len());
    }

    total_loss / indices.len() as f64
}

/// ESR of the model over the selected validation windows.
fn score(model: &mut AmpModel, validation: &Dataset, indices: &[usize]) -> f64 {
    let predicted: Vec<f64> = indices.iter().map(|&k| model.predict(validation.window(k))).collect();
    let target: Vec<f64> = indices.iter().map(|&k| validation.target(k)).collect();
    esr(&predicted, &target)
}
