pub mod mse;
pub mod esr;

pub use mse::{MseLoss, SampleError};
pub use esr::esr;
