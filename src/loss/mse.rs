/// Squared error of one predicted output sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleError {
    pub loss: f64,
    /// d(loss/2)/d(prediction); the factor of two folds into the learning rate.
    pub gradient: f64,
}

pub struct MseLoss;

impl MseLoss {
    pub fn sample(predicted: f64, target: f64) -> SampleError {
        let diff = predicted - target;
        SampleError { loss: diff * diff, gradient: diff }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_and_gradient_follow_the_sign_of_the_miss() {
        let over = MseLoss::sample(0.75, 0.25);
        assert_eq!(over, SampleError { loss: 0.25, gradient: 0.5 });
        assert_eq!(MseLoss::sample(0.25, 0.75).gradient, -0.5);
    }
}
