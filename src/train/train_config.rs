use std::path::PathBuf;

use crate::config::run_config::RunConfiguration;
use crate::network::architecture::Architecture;

/// Hyperparameters fixed for every run launched from the dialog.
pub const LEARNING_RATE: f64 = 0.004;
pub const LEARNING_RATE_DECAY: f64 = 0.007;
pub const SEED: u64 = 0;

/// Arguments of one training call.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainRequest {
    pub input_path: PathBuf,
    pub capture_path: PathBuf,
    pub output_dir: PathBuf,
    pub epochs: usize,
    pub delay: i64,
    pub architecture: Architecture,
    pub lr: f64,
    pub lr_decay: f64,
    pub seed: u64,
    pub silent: bool,
    pub save_plot: bool,
    /// Capture base name; used for the model metadata and the plot file.
    pub model_name: String,
    pub theme: String,
}

impl TrainRequest {
    pub fn for_capture(config: &RunConfiguration, file: &str, model_name: &str) -> TrainRequest {
        TrainRequest {
            input_path: config.input_source_file.clone(),
            capture_path: config.capture_path(file),
            output_dir: config.output_folder.clone(),
            epochs: config.training_epochs,
            delay: config.delay,
            architecture: config.architecture,
            lr: LEARNING_RATE,
            lr_decay: LEARNING_RATE_DECAY,
            seed: SEED,
            silent: config.silent_run,
            save_plot: config.save_plot,
            model_name: model_name.to_owned(),
            theme: config.theme.clone(),
        }
    }
}

/// Settings of the epoch loop itself.
///
/// # Fields
/// - `epochs`: total number of passes
/// - `batch_size`: windows per mini-batch
/// - `max_windows_per_epoch`: cap on training windows visited per epoch;
///                             longer recordings are strided down to it
/// - `lr_decay`: per-epoch exponential learning-rate decay
#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub max_windows_per_epoch: usize,
    pub lr_decay: f64,
}
