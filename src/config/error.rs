use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Config {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Config {path} must contain a JSON object")]
    NotAnObject { path: PathBuf },
    #[error("Failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("No capture files selected")]
    NoCaptures,
    #[error("Invalid value for '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("{what} not found: {path}")]
    MissingFile { what: &'static str, path: PathBuf },
    #[error("Failed to create output folder {path}: {source}")]
    OutputFolder {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to scan capture folder {path}: {source}")]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },
}
