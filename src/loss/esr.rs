/// Error-to-signal ratio: `sum((y - ŷ)²) / sum(y²)`. Lower is better.
///
/// A silent (all-zero) target has no signal energy; the raw error energy is
/// returned in that case so the value stays finite.
pub fn esr(predicted: &[f64], target: &[f64]) -> f64 {
    let (error, signal) = predicted.iter().zip(target.iter())
        .fold((0.0, 0.0), |(err, sig), (p, y)| (err + (y - p).powi(2), sig + y * y));
    if signal == 0.0 {
        error
    } else {
        error / signal
    }
}
