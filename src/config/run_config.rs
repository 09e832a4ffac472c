use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::captures;
use crate::config::error::ConfigError;
use crate::network::architecture::Architecture;

/// Default settings file, read from the working directory.
pub const CONFIG_FILE_NAME: &str = "tui_config.json";

pub const SILENT_RUN_KEY: &str = "silentrun";
pub const SAVE_PLOT_KEY: &str = "saveplot";
pub const TRAINING_EPOCHS_KEY: &str = "trainingEpochs";
pub const DELAY_KEY: &str = "delay";
pub const MODEL_NAME_KEY: &str = "modelName";
pub const OUTPUT_FOLDER_KEY: &str = "outputFolderName";
pub const INPUT_SOURCE_FILE_KEY: &str = "inputSourceFile";
pub const SELECTED_ARCH_KEY: &str = "selectedArchitecture";
pub const CAPTURE_FOLDER_KEY: &str = "captureFolderName";
pub const SELECTED_AMP_CAPTURE_KEY: &str = "selectedAmpCapture";
pub const SELECTED_THEME_KEY: &str = "selectedTheme";
pub const FAILURE_POLICY_KEY: &str = "onTrainingFailure";

/// What the worker does after a run fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the batch; remaining captures never run.
    #[default]
    Abort,
    /// Record the failure and move on to the next capture.
    Continue,
}

/// Settings for one batch of training runs. Read-only once a dialog opens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfiguration {
    #[serde(rename = "silentrun")]
    pub silent_run: bool,
    #[serde(rename = "saveplot")]
    pub save_plot: bool,
    #[serde(rename = "trainingEpochs")]
    pub training_epochs: usize,
    #[serde(rename = "delay")]
    pub delay: i64,
    #[serde(rename = "modelName")]
    pub model_name: String,
    #[serde(rename = "outputFolderName")]
    pub output_folder: PathBuf,
    #[serde(rename = "inputSourceFile")]
    pub input_source_file: PathBuf,
    #[serde(rename = "selectedArchitecture")]
    pub architecture: Architecture,
    #[serde(rename = "captureFolderName")]
    pub capture_folder: PathBuf,
    #[serde(rename = "selectedAmpCapture")]
    pub captures: Vec<String>,
    #[serde(rename = "selectedTheme")]
    pub theme: String,
    #[serde(rename = "onTrainingFailure")]
    pub failure_policy: FailurePolicy,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        RunConfiguration {
            silent_run: false,
            save_plot: true,
            training_epochs: 100,
            delay: 0,
            model_name: "model.nam".to_owned(),
            output_folder: PathBuf::new(),
            input_source_file: PathBuf::new(),
            architecture: Architecture::Feather,
            capture_folder: PathBuf::new(),
            captures: Vec::new(),
            theme: String::new(),
            failure_policy: FailurePolicy::Abort,
        }
    }
}

impl RunConfiguration {
    /// Loads settings from `path`.
    ///
    /// A missing file gives the defaults. Each key is read on its own: a
    /// missing or mistyped value keeps its default and logs a warning.
    pub fn load(path: &Path) -> Result<RunConfiguration, ConfigError> {
        if !path.exists() {
            tracing::info!("No config at {}; using defaults", path.display());
            return Ok(RunConfiguration::default());
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let map = value.as_object().ok_or_else(|| ConfigError::NotAnObject {
            path: path.to_path_buf(),
        })?;
        Ok(RunConfiguration::from_map(map))
    }

    fn from_map(map: &Map<String, Value>) -> RunConfiguration {
        let d = RunConfiguration::default();
        RunConfiguration {
            silent_run:        read_key(map, SILENT_RUN_KEY, d.silent_run),
            save_plot:         read_key(map, SAVE_PLOT_KEY, d.save_plot),
            training_epochs:   read_key(map, TRAINING_EPOCHS_KEY, d.training_epochs),
            delay:             read_key(map, DELAY_KEY, d.delay),
            model_name:        read_key(map, MODEL_NAME_KEY, d.model_name),
            output_folder:     read_key(map, OUTPUT_FOLDER_KEY, d.output_folder),
            input_source_file: read_key(map, INPUT_SOURCE_FILE_KEY, d.input_source_file),
            architecture:      read_key(map, SELECTED_ARCH_KEY, d.architecture),
            capture_folder:    read_key(map, CAPTURE_FOLDER_KEY, d.capture_folder),
            captures:          read_key(map, SELECTED_AMP_CAPTURE_KEY, d.captures),
            theme:             read_key(map, SELECTED_THEME_KEY, d.theme),
            failure_policy:    read_key(map, FAILURE_POLICY_KEY, d.failure_policy),
        }
    }

    /// Loads the settings a front end trains with, then writes them back.
    ///
    /// With no capture selected, every `.wav` under the capture folder is
    /// selected. The resolved settings are saved to `path` so the file always
    /// holds every key; a failed write only logs a warning.
    pub fn load_for_training(path: &Path) -> Result<RunConfiguration, ConfigError> {
        let mut config = RunConfiguration::load(path)?;
        if config.captures.is_empty() && config.capture_folder.is_dir() {
            config.captures = captures::scan_captures(&config.capture_folder)?;
            tracing::info!(
                "No capture selected; using all {} in {}",
                config.captures.len(),
                config.capture_folder.display()
            );
        }
        if let Err(err) = config.save(path) {
            tracing::warn!("{err}");
        }
        Ok(config)
    }

    /// Writes the settings as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let file = fs::File::create(path).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self).map_err(ConfigError::Serialize)
    }

    /// Checks everything a batch needs before any thread is started, and
    /// creates the output folder if it does not exist yet.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.captures.is_empty() {
            return Err(ConfigError::NoCaptures);
        }
        if self.training_epochs == 0 {
            return Err(ConfigError::Invalid {
                key: TRAINING_EPOCHS_KEY,
                reason: "must be at least 1".to_owned(),
            });
        }
        if !self.input_source_file.is_file() {
            return Err(ConfigError::MissingFile {
                what: "Input source file",
                path: self.input_source_file.clone(),
            });
        }
        for file in &self.captures {
            let path = self.capture_path(file);
            if !path.is_file() {
                return Err(ConfigError::MissingFile { what: "Capture file", path });
            }
        }
        fs::create_dir_all(&self.output_folder).map_err(|source| ConfigError::OutputFolder {
            path: self.output_folder.clone(),
            source,
        })
    }

    pub fn capture_path(&self, file: &str) -> PathBuf {
        captures::capture_path(&self.capture_folder, file)
    }

    pub fn total_runs(&self) -> usize {
        self.captures.len()
    }
}

fn read_key<T: DeserializeOwned>(map: &Map<String, Value>, key: &str, default: T) -> T {
    match map.get(key) {
        None => {
            tracing::warn!("Config key '{key}' missing; using default");
            default
        }
        Some(value) => match serde_json::from_value(value.clone()) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!("Unable to read '{key}' from config ({err}); using default");
                default
            }
        },
    }
}
