use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;

/// Model size presets offered in the capture trainer.
///
/// Every preset is a feed-forward network over a sliding window of the most
/// recent input samples; bigger presets see further back and have wider
/// hidden layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    Standard,
    Lite,
    #[default]
    Feather,
}

impl Architecture {
    pub const ALL: [Architecture; 3] = [Architecture::Standard, Architecture::Lite, Architecture::Feather];

    /// Number of input samples (current plus history) fed to the network.
    pub fn receptive_field(&self) -> usize {
        match self {
            Architecture::Standard => 32,
            Architecture::Lite     => 24,
            Architecture::Feather  => 16,
        }
    }

    pub fn hidden_layers(&self) -> &'static [usize] {
        match self {
            Architecture::Standard => &[24, 24],
            Architecture::Lite     => &[16, 16],
            Architecture::Feather  => &[12],
        }
    }

    /// (size, input_size, activation) for each layer, input → output.
    pub fn layer_specs(&self) -> Vec<(usize, usize, ActivationFunction)> {
        let mut specs = Vec::new();
        let mut input_size = self.receptive_field();
        for &width in self.hidden_layers() {
            specs.push((width, input_size, ActivationFunction::Tanh));
            input_size = width;
        }
        specs.push((1, input_size, ActivationFunction::Identity));
        specs
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::Standard => "standard",
            Architecture::Lite     => "lite",
            Architecture::Feather  => "feather",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_specs_chain_sizes() {
        for arch in Architecture::ALL {
            let specs = arch.layer_specs();
            assert_eq!(specs[0].1, arch.receptive_field());
            for pair in specs.windows(2) {
                assert_eq!(pair[0].0, pair[1].1);
            }
            assert_eq!(specs.last().map(|s| s.0), Some(1));
        }
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Architecture::Lite).unwrap(), "\"lite\"");
        let parsed: Architecture = serde_json::from_str("\"standard\"").unwrap();
        assert_eq!(parsed, Architecture::Standard);
    }
}
