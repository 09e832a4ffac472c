use serde::{Serialize, Deserialize};

/// Per-epoch training statistics handed to `TrainingObserver::on_train_epoch_end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean training MSE over the windows seen this epoch.
    pub train_loss: f64,
    /// ESR over (a strided sample of) the validation windows.
    pub validation_esr: f64,
    /// Learning rate used during this epoch.
    pub learning_rate: f64,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}
