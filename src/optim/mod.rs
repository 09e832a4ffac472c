pub mod sgd;
pub mod scheduler;

pub use sgd::Sgd;
pub use scheduler::ExponentialDecay;
