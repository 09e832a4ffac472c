use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::{activation::activation::ActivationFunction, layers::dense::Layer, math::matrix::Matrix};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
}

impl Network {
    /// Builds a network from (size, input_size, activation) tuples.
    pub fn new<R: Rng>(layer_specs: Vec<(usize, usize, ActivationFunction)>, rng: &mut R) -> Network {
        let layers = layer_specs.into_iter()
            .map(|(size, input_size, activation)| Layer::new(size, input_size, activation, rng))
            .collect();
        Network { layers }
    }

    /// Forward pass; stores activations in each layer for backprop.
    pub fn forward(&mut self, input: &[f64]) -> Vec<f64> {
        let mut current = Matrix::row(input);
        for layer in &mut self.layers {
            current = layer.feed_from(&current);
        }
        current.data.into_iter().next().unwrap_or_default()
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map(|l| l.weights.rows).unwrap_or(0)
    }
}
