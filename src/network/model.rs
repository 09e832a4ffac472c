use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::audio::dataset::Dataset;
use crate::network::architecture::Architecture;
use crate::network::metadata::ModelMetadata;
use crate::network::network::Network;
use crate::train::error::TrainError;

/// File extension of exported amp models.
pub const MODEL_EXTENSION: &str = "nam";

const FORMAT_VERSION: &str = "0.1.0";

/// A trained amp model: an architecture preset plus its weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmpModel {
    pub version: String,
    pub architecture: Architecture,
    pub receptive_field: usize,
    #[serde(default)]
    pub metadata: ModelMetadata,
    pub network: Network,
}

impl AmpModel {
    pub fn new<R: Rng>(architecture: Architecture, rng: &mut R) -> AmpModel {
        AmpModel {
            version: FORMAT_VERSION.to_owned(),
            architecture,
            receptive_field: architecture.receptive_field(),
            metadata: ModelMetadata::default(),
            network: Network::new(architecture.layer_specs(), rng),
        }
    }

    /// Predicts one output sample from an input window.
    pub fn predict(&mut self, window: &[f64]) -> f64 {
        self.network.forward(window).first().copied().unwrap_or(0.0)
    }

    /// Predicts the output for every window of `dataset`.
    pub fn predict_all(&mut self, dataset: &Dataset) -> Vec<f64> {
        (0..dataset.len()).map(|k| self.predict(dataset.window(k))).collect()
    }

    /// Writes the model to `<output_dir>/<base_name>.nam`, creating the
    /// directory if needed. Returns the written path.
    pub fn export(&self, output_dir: &Path, base_name: &str) -> Result<PathBuf, TrainError> {
        fs::create_dir_all(output_dir).map_err(|source| TrainError::Io {
            path: output_dir.to_path_buf(),
            source,
        })?;
        let path = output_dir.join(format!("{base_name}.{MODEL_EXTENSION}"));
        let file = fs::File::create(&path).map_err(|source| TrainError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self).map_err(|source| TrainError::Serialize {
            path: path.clone(),
            source,
        })?;
        tracing::info!("Exported model to {}", path.display());
        Ok(path)
    }

    /// Reads a model previously written by `export`.
    pub fn load(path: &Path) -> Result<AmpModel, TrainError> {
        let file = fs::File::open(path).map_err(|source| TrainError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| TrainError::Serialize {
            path: path.to_path_buf(),
            source,
        })
    }
}
