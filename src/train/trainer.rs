use std::path::PathBuf;

use rand::{rngs::StdRng, SeedableRng};

use crate::audio::dataset::Dataset;
use crate::audio::wav::read_mono;
use crate::evaluate::window::PlotWindow;
use crate::network::metadata::ModelMetadata;
use crate::network::model::AmpModel;
use crate::optim::sgd::Sgd;
use crate::train::error::TrainError;
use crate::train::loop_fn::train_loop;
use crate::train::observer::{TrainerControl, TrainingObserver};
use crate::train::train_config::{LoopConfig, TrainRequest};

/// Fewest aligned windows a capture must yield: one to train on and one to
/// validate against.
const MIN_WINDOWS: usize = 2;

/// Everything post-processing needs from a finished training call.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub model: AmpModel,
    pub validation: Dataset,
    /// Where the comparison plot goes; `None` when plotting is disabled.
    pub plot_path: Option<PathBuf>,
    pub silent: bool,
    pub window: PlotWindow,
    pub theme: String,
    pub epochs_completed: usize,
    /// True when an observer stopped the run early.
    pub stopped: bool,
}

/// The training service the worker calls once per capture.
pub trait Trainer: Send + Sync {
    /// Checked once, before the worker thread is started.
    fn check_environment(&self) -> Result<(), TrainError> {
        Ok(())
    }

    /// Runs one blocking training session, invoking `observers` at init
    /// start, init end and every epoch end.
    fn train(
        &self,
        request: &TrainRequest,
        observers: &mut [&mut dyn TrainingObserver],
    ) -> Result<TrainedModel, TrainError>;
}

/// Trains an `AmpModel` to map the source recording onto a capture.
#[derive(Debug, Clone)]
pub struct CaptureTrainer {
    pub batch_size: usize,
    pub max_windows_per_epoch: usize,
    pub validation_fraction: f64,
}

impl Default for CaptureTrainer {
    fn default() -> Self {
        CaptureTrainer { batch_size: 32, max_windows_per_epoch: 4096, validation_fraction: 0.1 }
    }
}

impl Trainer for CaptureTrainer {
    fn train(
        &self,
        request: &TrainRequest,
        observers: &mut [&mut dyn TrainingObserver],
    ) -> Result<TrainedModel, TrainError> {
        let mut control = TrainerControl::default();
        for observer in observers.iter_mut() {
            observer.on_init_start(&mut control);
        }

        let source = read_mono(&request.input_path)?;
        let capture = read_mono(&request.capture_path)?;
        if source.sample_rate != capture.sample_rate {
            return Err(TrainError::SampleRateMismatch {
                path: request.capture_path.clone(),
                source_rate: source.sample_rate,
                capture_rate: capture.sample_rate,
            });
        }

        let receptive_field = request.architecture.receptive_field();
        let dataset = Dataset::from_signals(&source.samples, &capture.samples, receptive_field, request.delay);
        if dataset.len() < MIN_WINDOWS {
            return Err(TrainError::TooShort { available: dataset.len(), required: MIN_WINDOWS });
        }
        let (train, validation) = dataset.split(self.validation_fraction);

        let mut rng = StdRng::seed_from_u64(request.seed);
        let mut model = AmpModel::new(request.architecture, &mut rng);
        model.metadata = ModelMetadata {
            name: Some(request.model_name.clone()),
            sample_rate: Some(source.sample_rate),
            delay: Some(request.delay),
            validation_esr: None,
        };
        tracing::info!(
            "Training {} ({}, {} train / {} validation windows, {} epochs)",
            request.model_name,
            request.architecture.as_str(),
            train.len(),
            validation.len(),
            request.epochs
        );

        for observer in observers.iter_mut() {
            observer.on_init_end(&mut control);
        }

        let mut optimizer = Sgd::new(request.lr);
        let loop_config = LoopConfig {
            epochs: request.epochs,
            batch_size: self.batch_size,
            max_windows_per_epoch: self.max_windows_per_epoch,
            lr_decay: request.lr_decay,
        };
        let epochs_completed = train_loop(
            &mut model,
            &train,
            &validation,
            &mut optimizer,
            &loop_config,
            &mut control,
            observers,
            &mut rng,
        );
        if control.should_stop {
            tracing::info!("{} stopped after {} epochs", request.model_name, epochs_completed);
        }

        let plot_path = request
            .save_plot
            .then(|| request.output_dir.join(format!("{}.png", request.model_name)));

        Ok(TrainedModel {
            window: PlotWindow::for_validation(validation.len()),
            model,
            validation,
            plot_path,
            silent: request.silent,
            theme: request.theme.clone(),
            epochs_completed,
            stopped: control.should_stop,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::architecture::Architecture;
    use crate::train::epoch_stats::EpochStats;
    use hound::{SampleFormat, WavSpec, WavWriter};
    use std::path::Path;

    fn write_wav(path: &Path, rate: u32, samples: impl Iterator<Item = f32>) {
        let spec = WavSpec { channels: 1, sample_rate: rate, bits_per_sample: 32, sample_format: SampleFormat::Float };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn request(dir: &Path, epochs: usize) -> TrainRequest {
        let input = dir.join("input.wav");
        let capture = dir.join("ampA.wav");
        write_wav(&input, 8_000, (0..600).map(|i| ((i as f32) * 0.07).sin() * 0.4));
        write_wav(&capture, 8_000, (0..600).map(|i| (((i as f32) * 0.07).sin() * 0.8).tanh()));
        TrainRequest {
            input_path: input,
            capture_path: capture,
            output_dir: dir.join("out"),
            epochs,
            delay: 0,
            architecture: Architecture::Feather,
            lr: 0.004,
            lr_decay: 0.007,
            seed: 0,
            silent: true,
            save_plot: true,
            model_name: "ampA".into(),
            theme: String::new(),
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        stop_at_init: bool,
    }

    impl TrainingObserver for Recorder {
        fn on_init_start(&mut self, control: &mut TrainerControl) {
            self.events.push("init_start".into());
            control.should_stop |= self.stop_at_init;
        }
        fn on_init_end(&mut self, _control: &mut TrainerControl) {
            self.events.push("init_end".into());
        }
        fn on_train_epoch_end(&mut self, _control: &mut TrainerControl, stats: &EpochStats) {
            self.events.push(format!("epoch_end {}", stats.epoch));
        }
    }

    #[test]
    fn hooks_fire_in_lifecycle_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = Recorder::default();
        let trained = CaptureTrainer::default()
            .train(&request(dir.path(), 3), &mut [&mut recorder])
            .unwrap();

        assert_eq!(recorder.events, vec!["init_start", "init_end", "epoch_end 1", "epoch_end 2", "epoch_end 3"]);
        assert_eq!(trained.epochs_completed, 3);
        assert!(!trained.stopped);
        assert_eq!(trained.plot_path, Some(dir.path().join("out").join("ampA.png")));
        assert_eq!(trained.model.metadata.sample_rate, Some(8_000));
    }

    #[test]
    fn stop_during_init_skips_epochs() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = Recorder { stop_at_init: true, ..Recorder::default() };
        let trained = CaptureTrainer::default()
            .train(&request(dir.path(), 3), &mut [&mut recorder])
            .unwrap();

        assert_eq!(recorder.events, vec!["init_start", "init_end"]);
        assert_eq!(trained.epochs_completed, 0);
        assert!(trained.stopped);
    }

    #[test]
    fn mismatched_sample_rates_fail() {
        let dir = tempfile::tempdir().unwrap();
        let req = request(dir.path(), 1);
        write_wav(&req.capture_path, 44_100, (0..600).map(|_| 0.1));
        let err = CaptureTrainer::default().train(&req, &mut []).unwrap_err();
        assert!(matches!(err, TrainError::SampleRateMismatch { source_rate: 8_000, capture_rate: 44_100, .. }));
    }
}
