use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by the training, scoring and export services.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("Failed to read audio {path}: {source}")]
    Audio {
        path: PathBuf,
        source: hound::Error,
    },
    #[error("{path} contains no samples")]
    EmptyAudio { path: PathBuf },
    #[error("Sample rate mismatch: source is {source_rate} Hz but {path} is {capture_rate} Hz")]
    SampleRateMismatch {
        path: PathBuf,
        source_rate: u32,
        capture_rate: u32,
    },
    #[error("Not enough aligned audio to train: {available} windows, need at least {required}")]
    TooShort { available: usize, required: usize },
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to (de)serialize model {path}: {source}")]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to render plot {path}: {source}")]
    Plot {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Training environment unavailable: {0}")]
    Environment(String),
    #[error("Training panicked: {0}")]
    Panicked(String),
}
