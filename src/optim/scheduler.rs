use crate::optim::sgd::Sgd;

/// Exponential learning-rate decay applied once per epoch:
/// `lr_{n+1} = lr_n * (1 - decay)`.
#[derive(Debug, Clone, Copy)]
pub struct ExponentialDecay {
    gamma: f64,
}

impl ExponentialDecay {
    pub fn new(decay: f64) -> ExponentialDecay {
        ExponentialDecay { gamma: (1.0 - decay).clamp(0.0, 1.0) }
    }

    pub fn step(&self, optimizer: &mut Sgd) {
        optimizer.learning_rate *= self.gamma;
    }
}
