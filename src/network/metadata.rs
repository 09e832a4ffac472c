use serde::{Deserialize, Serialize};

/// Annotations stored next to the weights in an exported `.nam` file.
/// All fields are optional so hand-edited files still load.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ModelMetadata {
    pub name: Option<String>,
    pub sample_rate: Option<u32>,
    /// Capture-to-source alignment used during training, in samples.
    pub delay: Option<i64>,
    /// Validation ESR at export time.
    pub validation_esr: Option<f64>,
}
