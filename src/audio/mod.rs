pub mod wav;
pub mod dataset;

pub use wav::{read_mono, MonoSignal};
pub use dataset::Dataset;
