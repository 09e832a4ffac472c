pub mod captures;
pub mod error;
pub mod run_config;

pub use captures::{capture_base_name, scan_captures};
pub use error::ConfigError;
pub use run_config::{FailurePolicy, RunConfiguration, CONFIG_FILE_NAME};
