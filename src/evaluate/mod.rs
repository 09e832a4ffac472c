pub mod finisher;
pub mod plot;
pub mod window;

pub use finisher::{PlotAndExport, RunFinisher};
pub use plot::plot;
pub use window::PlotWindow;
