use serde::{Deserialize, Serialize};

/// Number of validation samples shown in a comparison plot.
pub const PLOT_WINDOW_LEN: usize = 2_000;

/// Half-open range `[start, end)` of validation samples to plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlotWindow {
    pub start: usize,
    pub end: usize,
}

impl PlotWindow {
    /// A window of at most `PLOT_WINDOW_LEN` samples centred in the
    /// validation set.
    pub fn for_validation(len: usize) -> PlotWindow {
        if len <= PLOT_WINDOW_LEN {
            return PlotWindow { start: 0, end: len };
        }
        let start = (len - PLOT_WINDOW_LEN) / 2;
        PlotWindow { start, end: start + PLOT_WINDOW_LEN }
    }

    /// Clamps the window to a signal of `len` samples.
    pub fn clamp_to(&self, len: usize) -> PlotWindow {
        let end = self.end.min(len);
        PlotWindow { start: self.start.min(end), end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
