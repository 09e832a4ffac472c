pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod audio;
pub mod train;
pub mod evaluate;
pub mod config;
pub mod progress;
pub mod logging;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use network::{AmpModel, Architecture, Network};
pub use config::{ConfigError, FailurePolicy, RunConfiguration};
pub use train::{CaptureTrainer, EpochStats, TrainError, TrainRequest, TrainedModel, Trainer, TrainingObserver};
pub use evaluate::{PlotAndExport, RunFinisher};
pub use progress::{DialogOptions, DialogOutcome, DialogView, TrainingDialog};
