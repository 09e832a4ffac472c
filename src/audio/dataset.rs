/// Sliding-window view over an aligned (source, capture) signal pair.
///
/// Window `k` is `input[k .. k + receptive_field]` and its target is the
/// capture sample at the window's last position, so the model predicts the
/// amp output from the current input sample plus its history.
#[derive(Debug, Clone)]
pub struct Dataset {
    input: Vec<f64>,
    target: Vec<f64>,
    receptive_field: usize,
}

impl Default for Dataset {
    /// An empty dataset with a one-sample window.
    fn default() -> Dataset {
        Dataset { input: Vec::new(), target: Vec::new(), receptive_field: 1 }
    }
}

impl Dataset {
    /// Aligns `capture` against `source` and truncates both to the shorter
    /// length. A positive `delay` means the capture lags the source by that
    /// many samples.
    pub fn from_signals(source: &[f64], capture: &[f64], receptive_field: usize, delay: i64) -> Dataset {
        let (x, y) = align(source, capture, delay);
        let n = x.len().min(y.len());
        Dataset {
            input: x[..n].to_vec(),
            target: y[..n].to_vec(),
            receptive_field: receptive_field.max(1),
        }
    }

    /// Number of complete windows.
    pub fn len(&self) -> usize {
        self.input.len().saturating_sub(self.receptive_field.saturating_sub(1))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn receptive_field(&self) -> usize {
        self.receptive_field
    }

    pub fn window(&self, k: usize) -> &[f64] {
        &self.input[k..k + self.receptive_field]
    }

    pub fn target(&self, k: usize) -> f64 {
        self.target[k + self.receptive_field - 1]
    }

    /// All window targets, in order.
    pub fn targets(&self) -> &[f64] {
        if self.is_empty() {
            &[]
        } else {
            &self.target[self.receptive_field - 1..]
        }
    }

    /// Splits off the tail as the validation set.
    ///
    /// At least one window lands on each side whenever the dataset holds two
    /// or more windows.
    pub fn split(&self, validation_fraction: f64) -> (Dataset, Dataset) {
        let m = self.len();
        let wanted = (m as f64 * validation_fraction).round() as usize;
        let val_count = match m {
            0 => 0,
            1 => 1,
            _ => wanted.clamp(1, m - 1),
        };
        let train_count = m - val_count;
        let rf = self.receptive_field;

        let train_end = if train_count == 0 { 0 } else { train_count + rf - 1 };
        let train = Dataset {
            input: self.input[..train_end].to_vec(),
            target: self.target[..train_end].to_vec(),
            receptive_field: rf,
        };
        let validation = Dataset {
            input: self.input[train_count..].to_vec(),
            target: self.target[train_count..].to_vec(),
            receptive_field: rf,
        };
        (train, validation)
    }

    /// Evenly strided window indices, at most `max` of them.
    pub fn strided_indices(&self, max: usize) -> Vec<usize> {
        let m = self.len();
        if m <= max {
            (0..m).collect()
        } else {
            (0..max).map(|i| i * m / max).collect()
        }
    }
}

fn align<'a>(source: &'a [f64], capture: &'a [f64], delay: i64) -> (&'a [f64], &'a [f64]) {
    let shift = delay.unsigned_abs() as usize;
    if delay > 0 {
        (source, &capture[shift.min(capture.len())..])
    } else if delay < 0 {
        (&source[shift.min(source.len())..], capture)
    } else {
        (source, capture)
    }
}
