use serde::{Serialize, Deserialize};

/// Element-wise activations used by amp models: `Tanh` on hidden layers,
/// `Identity` on the single output sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    Tanh,
    Identity,
}

impl ActivationFunction {
    pub fn function(self, x: f64) -> f64 {
        match self {
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::Identity => x,
        }
    }

    /// Slope at the pre-activation value `x`.
    pub fn derivative(self, x: f64) -> f64 {
        match self {
            ActivationFunction::Tanh => 1.0 - x.tanh().powi(2),
            ActivationFunction::Identity => 1.0,
        }
    }
}
