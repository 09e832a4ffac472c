use std::path::PathBuf;

use crate::evaluate::plot::plot;
use crate::train::error::TrainError;
use crate::train::trainer::TrainedModel;

/// Post-processing applied to each finished run on the dialog's thread.
/// Returns the run's validation ESR.
pub trait RunFinisher {
    fn finish(&mut self, trained: TrainedModel, base_name: &str) -> Result<f64, TrainError>;
}

/// Scores and plots the run, then exports the model into `output_dir`.
#[derive(Debug, Clone)]
pub struct PlotAndExport {
    output_dir: PathBuf,
}

impl PlotAndExport {
    pub fn new(output_dir: impl Into<PathBuf>) -> PlotAndExport {
        PlotAndExport { output_dir: output_dir.into() }
    }
}

impl RunFinisher for PlotAndExport {
    fn finish(&mut self, mut trained: TrainedModel, base_name: &str) -> Result<f64, TrainError> {
        let score = plot(
            &mut trained.model,
            &trained.validation,
            trained.plot_path.as_deref(),
            trained.silent,
            trained.window,
            &trained.theme,
        )?;
        trained.model.metadata.validation_esr = Some(score);
        trained.model.export(&self.output_dir, base_name)?;
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::dataset::Dataset;
    use crate::evaluate::window::PlotWindow;
    use crate::network::{AmpModel, Architecture};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn exports_model_with_score() {
        let dir = tempfile::tempdir().unwrap();
        let x: Vec<f64> = (0..100).map(|i| (i as f64 * 0.2).sin()).collect();
        let validation = Dataset::from_signals(&x, &x, Architecture::Feather.receptive_field(), 0);
        let trained = TrainedModel {
            model: AmpModel::new(Architecture::Feather, &mut StdRng::seed_from_u64(0)),
            window: PlotWindow::for_validation(validation.len()),
            validation,
            plot_path: None,
            silent: true,
            theme: String::new(),
            epochs_completed: 1,
            stopped: false,
        };

        let score = PlotAndExport::new(dir.path()).finish(trained, "ampA").unwrap();

        let exported = AmpModel::load(&dir.path().join("ampA.nam")).unwrap();
        assert_eq!(exported.metadata.validation_esr, Some(score));
    }

    #[test]
    fn empty_validation_set_still_exports() {
        let dir = tempfile::tempdir().unwrap();
        let trained = TrainedModel {
            model: AmpModel::new(Architecture::Feather, &mut StdRng::seed_from_u64(0)),
            validation: Dataset::default(),
            plot_path: Some(dir.path().join("ampA.png")),
            silent: true,
            window: PlotWindow::default(),
            theme: String::new(),
            epochs_completed: 0,
            stopped: true,
        };

        let score = PlotAndExport::new(dir.path()).finish(trained, "ampA").unwrap();

        assert_eq!(score, 0.0);
        assert!(dir.path().join("ampA.nam").is_file());
    }
}
