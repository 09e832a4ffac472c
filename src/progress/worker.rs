use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::config::captures::capture_base_name;
use crate::config::run_config::{FailurePolicy, RunConfiguration};
use crate::progress::cancel::CancelFlag;
use crate::progress::gate::CancellationGate;
use crate::progress::notification::{Notifier, RunOutcome};
use crate::train::error::TrainError;
use crate::train::observer::TrainingObserver;
use crate::train::train_config::TrainRequest;
use crate::train::trainer::Trainer;

/// Summary of what the worker did, sent with `WorkerFinished`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    /// Training calls that returned a model.
    pub completed: usize,
    pub failed: usize,
    /// Captures that never ran.
    pub skipped: usize,
    pub cancelled: bool,
}

/// Trains every configured capture in order on one dedicated thread.
pub struct WorkerDriver {
    config: Arc<RunConfiguration>,
    trainer: Arc<dyn Trainer>,
    cancel: CancelFlag,
    notifier: Notifier,
}

impl WorkerDriver {
    pub fn new(
        config: Arc<RunConfiguration>,
        trainer: Arc<dyn Trainer>,
        cancel: CancelFlag,
        notifier: Notifier,
    ) -> WorkerDriver {
        WorkerDriver { config, trainer, cancel, notifier }
    }

    pub fn spawn(self) -> io::Result<JoinHandle<WorkerReport>> {
        thread::Builder::new()
            .name("training-worker".to_owned())
            .spawn(move || self.run())
    }

    /// The worker loop. The cancel flag is checked before each capture;
    /// once it is set the remaining captures are skipped.
    pub fn run(self) -> WorkerReport {
        let total = self.config.total_runs();
        let mut report = WorkerReport::default();

        for (index, file) in self.config.captures.iter().enumerate() {
            if self.cancel.is_set() {
                report.cancelled = true;
                report.skipped = total - index;
                tracing::info!("Training cancelled; skipping {} remaining capture(s)", report.skipped);
                break;
            }

            let run = index + 1;
            let base_name = capture_base_name(file);
            self.notifier.run_started(run);

            let request = TrainRequest::for_capture(&self.config, file, &base_name);
            let mut gate = CancellationGate::new(self.cancel.clone(), self.notifier.clone());
            let outcome = self.call_trainer(&request, &mut gate);

            let failed = match &outcome {
                Ok(trained) => {
                    report.completed += 1;
                    report.cancelled |= trained.stopped;
                    false
                }
                Err(err) => {
                    report.failed += 1;
                    tracing::error!("Run {run} ({base_name}) failed: {err}");
                    true
                }
            };
            self.notifier.run_complete(run, outcome);

            if failed && self.config.failure_policy == FailurePolicy::Abort {
                report.skipped = total - run;
                break;
            }
        }

        self.notifier.worker_finished(report);
        report
    }

    /// Runs the blocking training call, turning a panic into a failed run.
    fn call_trainer(&self, request: &TrainRequest, gate: &mut CancellationGate) -> RunOutcome {
        let observer: &mut dyn TrainingObserver = gate;
        panic::catch_unwind(AssertUnwindSafe(|| self.trainer.train(request, &mut [observer])))
            .unwrap_or_else(|payload| Err(TrainError::Panicked(panic_message(payload.as_ref()))))
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::dataset::Dataset;
    use crate::evaluate::window::PlotWindow;
    use crate::network::{AmpModel, Architecture};
    use crate::progress::notification::{channel, Notification, NotificationKind};
    use crate::train::epoch_stats::EpochStats;
    use crate::train::observer::TrainerControl;
    use crate::train::trainer::TrainedModel;
    use rand::{rngs::StdRng, SeedableRng};
    use std::sync::Mutex;

    /// Runs `epochs` fake epochs through the observers and records calls.
    struct FakeTrainer {
        epochs: usize,
        calls: Mutex<Vec<String>>,
        cancel_after_call: Option<(usize, CancelFlag)>,
        fail_on: Option<usize>,
    }

    impl FakeTrainer {
        fn new(epochs: usize) -> FakeTrainer {
            FakeTrainer { epochs, calls: Mutex::new(Vec::new()), cancel_after_call: None, fail_on: None }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Trainer for FakeTrainer {
        fn train(
            &self,
            request: &TrainRequest,
            observers: &mut [&mut dyn TrainingObserver],
        ) -> Result<TrainedModel, TrainError> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(request.model_name.clone());
                calls.len()
            };
            if self.fail_on == Some(call) {
                panic!("trainer exploded");
            }
            let mut control = TrainerControl::default();
            for o in observers.iter_mut() {
                o.on_init_start(&mut control);
            }
            for o in observers.iter_mut() {
                o.on_init_end(&mut control);
            }
            let mut done = 0;
            for epoch in 1..=self.epochs {
                if control.should_stop {
                    break;
                }
                done = epoch;
                let stats = EpochStats { epoch, total_epochs: self.epochs, train_loss: 0.0, validation_esr: 0.0, learning_rate: 0.0, elapsed_ms: 0 };
                for o in observers.iter_mut() {
                    o.on_train_epoch_end(&mut control, &stats);
                }
            }
            if let Some((after, flag)) = &self.cancel_after_call {
                if *after == call {
                    flag.set();
                }
            }
            Ok(TrainedModel {
                model: AmpModel::new(Architecture::Feather, &mut StdRng::seed_from_u64(0)),
                validation: Dataset::default(),
                plot_path: None,
                silent: true,
                window: PlotWindow::default(),
                theme: String::new(),
                epochs_completed: done,
                stopped: control.should_stop,
            })
        }
    }

    fn config(captures: &[&str], policy: FailurePolicy) -> Arc<RunConfiguration> {
        Arc::new(RunConfiguration {
            training_epochs: 2,
            captures: captures.iter().map(|c| c.to_string()).collect(),
            failure_policy: policy,
            ..RunConfiguration::default()
        })
    }

    fn kinds(queue: &crate::progress::notification::NotificationQueue) -> Vec<NotificationKind> {
        queue.drain().iter().map(NotificationKind::of).collect()
    }

    #[test]
    fn emits_start_epochs_and_complete_per_capture() {
        let (notifier, queue) = channel();
        let trainer = Arc::new(FakeTrainer::new(2));
        let report = WorkerDriver::new(config(&["ampA.wav", "sub/ampB.wav"], FailurePolicy::Abort), trainer.clone(), CancelFlag::new(), notifier)
            .spawn()
            .unwrap()
            .join()
            .unwrap();

        assert_eq!(trainer.calls(), vec!["ampA", "ampB"]);
        assert_eq!(report, WorkerReport { completed: 2, failed: 0, skipped: 0, cancelled: false });
        assert_eq!(kinds(&queue), vec![
            NotificationKind::RunStarted(1),
            NotificationKind::EpochAdvanced(2),
            NotificationKind::EpochAdvanced(3),
            NotificationKind::RunComplete(1),
            NotificationKind::RunStarted(2),
            NotificationKind::EpochAdvanced(2),
            NotificationKind::EpochAdvanced(3),
            NotificationKind::RunComplete(2),
            NotificationKind::WorkerFinished,
        ]);
    }

    #[test]
    fn cancel_between_runs_skips_pending_captures() {
        let (notifier, queue) = channel();
        let cancel = CancelFlag::new();
        let trainer = Arc::new(FakeTrainer { cancel_after_call: Some((1, cancel.clone())), ..FakeTrainer::new(1) });
        let report = WorkerDriver::new(config(&["a.wav", "b.wav", "c.wav"], FailurePolicy::Abort), trainer.clone(), cancel, notifier).run();

        assert_eq!(trainer.calls(), vec!["a"]);
        assert_eq!(report.skipped, 2);
        assert!(report.cancelled);
        assert_eq!(kinds(&queue), vec![
            NotificationKind::RunStarted(1),
            NotificationKind::EpochAdvanced(2),
            NotificationKind::RunComplete(1),
            NotificationKind::WorkerFinished,
        ]);
    }

    #[test]
    fn cancel_before_start_runs_nothing() {
        let (notifier, queue) = channel();
        let cancel = CancelFlag::new();
        cancel.set();
        let trainer = Arc::new(FakeTrainer::new(1));
        let report = WorkerDriver::new(config(&["a.wav"], FailurePolicy::Abort), trainer.clone(), cancel, notifier).run();

        assert!(trainer.calls().is_empty());
        assert_eq!(report.skipped, 1);
        assert_eq!(kinds(&queue), vec![NotificationKind::WorkerFinished]);
    }

    #[test]
    fn panic_becomes_failed_run_and_aborts() {
        let (notifier, queue) = channel();
        let trainer = Arc::new(FakeTrainer { fail_on: Some(1), ..FakeTrainer::new(1) });
        let report = WorkerDriver::new(config(&["a.wav", "b.wav"], FailurePolicy::Abort), trainer.clone(), CancelFlag::new(), notifier).run();

        assert_eq!(report, WorkerReport { completed: 0, failed: 1, skipped: 1, cancelled: false });
        let events = queue.drain();
        match &events[1] {
            Notification::RunComplete { run: 1, outcome: Err(TrainError::Panicked(msg)) } => {
                assert_eq!(msg, "trainer exploded");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn continue_policy_trains_remaining_captures() {
        let (notifier, _queue) = channel();
        let trainer = Arc::new(FakeTrainer { fail_on: Some(1), ..FakeTrainer::new(1) });
        let report = WorkerDriver::new(config(&["a.wav", "b.wav"], FailurePolicy::Continue), trainer.clone(), CancelFlag::new(), notifier).run();

        assert_eq!(trainer.calls(), vec!["a", "b"]);
        assert_eq!(report, WorkerReport { completed: 1, failed: 1, skipped: 0, cancelled: false });
    }
}
