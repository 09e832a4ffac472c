use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::{math::matrix::Matrix, activation::activation::ActivationFunction};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer{
    pub size: usize,
    #[serde(skip)]
    pub neurons: Matrix,
    #[serde(skip)]
    pre_neurons: Matrix,  // pre-activation values (z = Wx + b) needed for correct derivative
    pub weights: Matrix,
    pub biases: Matrix,
    pub activator: ActivationFunction
}

impl Layer {
    /// Builds a layer with seeded Xavier weights and zero biases.
    pub fn new<R: Rng>(size: usize, input_size: usize, activation: ActivationFunction, rng: &mut R) -> Layer {
        let weights = Matrix::xavier(input_size, size, rng);

        Layer {
            size,
            neurons: Matrix::zeros(1, size),
            pre_neurons: Matrix::zeros(1, size),
            weights,
            biases: Matrix::zeros(1, size),
            activator: activation
        }
    }

    pub fn feed_from(&mut self, input: &Matrix) -> Matrix {
        let mut z = input * &self.weights;
        z.add_scaled(&self.biases, 1.0);
        let a = z.map(|x| self.activator.function(x));
        self.pre_neurons = z;
        self.neurons = a.clone();
        a
    }

    /// Computes gradient adjustments. Returns (weights_grad, biases_grad).
    /// `next_layer_delta` is ∂L/∂a for this layer (error in activation space).
    pub fn compute_gradients(
        &self,
        next_layer_delta: &Matrix,
        inputs: &Matrix,
    ) -> (Matrix, Matrix) {
        // Use pre-activation z so that derivative(z) = σ'(z) is computed correctly
        let act_derivative = self.pre_neurons.map(|x| self.activator.derivative(x));
        // δ = error ⊙ σ'(z)
        let layer_delta = next_layer_delta.hadamard(&act_derivative);

        let weights_adjustment = &inputs.transpose() * &layer_delta;
        let biases_adjustment = layer_delta;

        (weights_adjustment, biases_adjustment)
    }

    /// Applies pre-computed gradients scaled by lr.
    pub fn apply_gradients(&mut self, weights_grad: &Matrix, biases_grad: &Matrix, lr: f64) {
        self.weights.add_scaled(weights_grad, -lr);
        self.biases.add_scaled(biases_grad, -lr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn identity_layer_computes_affine_map() {
        let mut layer = Layer::new(1, 2, ActivationFunction::Identity, &mut StdRng::seed_from_u64(3));
        layer.weights = Matrix::from_data(vec![vec![2.0], vec![-1.0]]);
        layer.biases = Matrix::row(&[0.5]);
        let out = layer.feed_from(&Matrix::row(&[1.0, 1.0]));
        assert_eq!(out.data, vec![vec![1.5]]);
    }

    #[test]
    fn gradient_step_reduces_error() {
        let mut layer = Layer::new(1, 1, ActivationFunction::Identity, &mut StdRng::seed_from_u64(3));
        layer.weights = Matrix::from_data(vec![vec![0.0]]);
        let input = Matrix::row(&[1.0]);
        let before = layer.feed_from(&input).data[0][0];
        let delta = Matrix::row(&[before - 1.0]);
        let (w, b) = layer.compute_gradients(&delta, &input);
        layer.apply_gradients(&w, &b, 0.1);
        let after = layer.feed_from(&input).data[0][0];
        assert!((after - 1.0).abs() < (before - 1.0).abs());
    }
}
