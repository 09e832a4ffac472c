use crate::{math::matrix::Matrix, network::network::Network};

/// Plain gradient descent over every layer of a network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies gradients summed over `batch_len` windows, as their mean.
    /// `accumulated` holds one (weights, biases) pair per layer.
    pub fn apply_batch(&self, network: &mut Network, accumulated: Vec<(Matrix, Matrix)>, batch_len: usize) {
        let scale = 1.0 / batch_len.max(1) as f64;
        for (layer, (w_sum, b_sum)) in network.layers.iter_mut().zip(accumulated) {
            layer.apply_gradients(&w_sum.map(|x| x * scale), &b_sum.map(|x| x * scale), self.learning_rate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn batch_gradients_are_averaged() {
        let mut network = Network::new(vec![(1, 2, ActivationFunction::Identity)], &mut StdRng::seed_from_u64(0));
        let before = network.layers[0].weights.clone();
        let grads = vec![(Matrix::from_data(vec![vec![4.0], vec![-2.0]]), Matrix::from_data(vec![vec![1.0]]))];

        Sgd::new(0.5).apply_batch(&mut network, grads, 4);

        let layer = &network.layers[0];
        assert!((layer.weights.data[0][0] - (before.data[0][0] - 0.5)).abs() < 1e-12);
        assert!((layer.weights.data[1][0] - (before.data[1][0] + 0.25)).abs() < 1e-12);
        assert!((layer.biases.data[0][0] + 0.125).abs() < 1e-12);
    }
}
