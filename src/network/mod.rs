pub mod architecture;
pub mod metadata;
pub mod model;
pub mod network;

pub use architecture::Architecture;
pub use metadata::ModelMetadata;
pub use model::AmpModel;
pub use network::Network;
