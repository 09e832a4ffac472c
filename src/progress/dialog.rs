use std::sync::Arc;
use std::thread::JoinHandle;

use thiserror::Error;

use crate::config::error::ConfigError;
use crate::config::run_config::RunConfiguration;
use crate::evaluate::finisher::RunFinisher;
use crate::progress::cancel::CancelFlag;
use crate::progress::controller::{DialogState, ProgressController};
use crate::progress::notification::{channel, NotificationKind, NotificationQueue, Notifier};
use crate::progress::worker::{WorkerDriver, WorkerReport};
use crate::train::error::TrainError;
use crate::train::trainer::Trainer;

#[derive(Debug, Error)]
pub enum DialogError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Environment(#[from] TrainError),
    #[error("Failed to start training thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Something that draws the dialog. Called on the dialog's thread after
/// every handled notification.
pub trait DialogView {
    fn refresh(&mut self, dialog: &DialogState);
}

/// Automatic close rules for front ends without a person at the button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DialogOptions {
    /// Close as soon as the button turns into "Close".
    pub close_on_complete: bool,
    /// Close once a cancelled worker has drained.
    pub close_when_drained: bool,
}

/// What the dialog ended with.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogOutcome {
    pub completion_log: Vec<String>,
    pub cancelled: bool,
    pub completed_runs: usize,
    pub failed_runs: usize,
    /// `None` if the worker thread died outside the training call.
    pub worker: Option<WorkerReport>,
}

/// The modal training-progress dialog: controller, queue and worker.
pub struct TrainingDialog {
    controller: ProgressController,
    queue: NotificationQueue,
    notifier: Notifier,
    worker: JoinHandle<WorkerReport>,
}

impl TrainingDialog {
    /// Validates the configuration and the trainer's environment, then
    /// starts the worker thread. Nothing is spawned if a check fails.
    pub fn open(
        config: RunConfiguration,
        trainer: Arc<dyn Trainer>,
        finisher: Box<dyn RunFinisher>,
    ) -> Result<TrainingDialog, DialogError> {
        config.validate()?;
        trainer.check_environment()?;

        let config = Arc::new(config);
        let cancel = CancelFlag::new();
        let (notifier, queue) = channel();
        let controller = ProgressController::new(config.clone(), cancel.clone(), finisher);
        let worker = WorkerDriver::new(config, trainer, cancel, notifier.clone())
            .spawn()
            .map_err(DialogError::Spawn)?;
        tracing::info!("Training dialog opened");

        Ok(TrainingDialog { controller, queue, notifier, worker })
    }

    /// A sender for UI input sources (button clicks, window close).
    pub fn notifier(&self) -> Notifier {
        self.notifier.clone()
    }

    pub fn dialog(&self) -> &DialogState {
        self.controller.dialog()
    }

    /// The dialog's message loop. Handles notifications in arrival order
    /// until the dialog closes, then waits for the worker to finish.
    pub fn run<V: DialogView + ?Sized>(self, view: &mut V, options: DialogOptions) -> DialogOutcome {
        let TrainingDialog { mut controller, queue, notifier, worker } = self;
        // Input sources hold their own clones.
        drop(notifier);

        view.refresh(controller.dialog());
        while !controller.is_closed() {
            let Some(notification) = queue.recv() else {
                tracing::debug!("All notification senders gone; closing dialog");
                controller.close();
                break;
            };
            tracing::trace!("Handling {:?}", NotificationKind::of(&notification));
            controller.handle(notification);

            if options.close_on_complete && controller.is_finished() {
                controller.close();
            }
            if options.close_when_drained && controller.is_cancelled() && controller.state().worker_finished {
                controller.close();
            }
            view.refresh(controller.dialog());
        }
        view.refresh(controller.dialog());

        let pending = queue.drain();
        if !pending.is_empty() {
            tracing::debug!("Dropping {} notification(s) queued after close", pending.len());
        }
        // Emits from the draining worker are dropped from here on.
        drop(queue);
        let worker = match worker.join() {
            Ok(report) => Some(report),
            Err(_) => {
                tracing::error!("Training worker thread panicked");
                None
            }
        };

        DialogOutcome {
            completion_log: controller.dialog().completion_log.clone(),
            cancelled: controller.is_cancelled(),
            completed_runs: controller.state().completed_runs,
            failed_runs: controller.state().failed_runs,
            worker,
        }
    }
}
