pub mod epoch_stats;
pub mod error;
pub mod loop_fn;
pub mod observer;
pub mod train_config;
pub mod trainer;

pub use epoch_stats::EpochStats;
pub use error::TrainError;
pub use loop_fn::train_loop;
pub use observer::{TrainerControl, TrainingObserver};
pub use train_config::{LoopConfig, TrainRequest};
pub use trainer::{CaptureTrainer, TrainedModel, Trainer};
