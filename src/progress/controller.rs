use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::Serialize;

use crate::config::captures::capture_base_name;
use crate::config::run_config::{FailurePolicy, RunConfiguration};
use crate::evaluate::finisher::RunFinisher;
use crate::progress::cancel::CancelFlag;
use crate::progress::notification::{Notification, RunOutcome};
use crate::progress::worker::{panic_message, WorkerReport};
use crate::train::error::TrainError;

pub const DIALOG_TITLE: &str = "Training In Progress...";
pub const CANCEL_LABEL: &str = "Cancel";
pub const CLOSE_LABEL: &str = "Close";
pub const COMPLETE_BANNER: &str = "TRAINING COMPLETE";
pub const ABORTED_BANNER: &str = "TRAINING ABORTED";

/// Counters owned by the controller. Only its handlers mutate them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunState {
    /// 1-based index of the active run; 0 before the first run starts.
    pub current_run: usize,
    /// Epoch in progress within the active run; 0 before the first run.
    pub current_epoch: usize,
    pub completed_runs: usize,
    pub failed_runs: usize,
    pub worker_finished: bool,
}

/// Everything a view needs to draw the dialog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogState {
    pub title: String,
    /// Whether the indeterminate progress bar is animating.
    pub indicator_running: bool,
    pub run_label: String,
    pub epoch_label: String,
    /// One entry per finished run, in run order. Append-only.
    pub completion_log: Vec<String>,
    pub button_label: String,
    pub closed: bool,
}

impl DialogState {
    /// The "Completed models" panel text.
    pub fn completed_text(&self) -> String {
        self.completion_log.join("\n")
    }
}

/// Owns the run state and the dialog text, and reacts to notifications on
/// the dialog's thread.
pub struct ProgressController {
    config: Arc<RunConfiguration>,
    cancel: CancelFlag,
    finisher: Box<dyn RunFinisher>,
    state: RunState,
    dialog: DialogState,
    active_name: String,
}

impl ProgressController {
    pub fn new(config: Arc<RunConfiguration>, cancel: CancelFlag, finisher: Box<dyn RunFinisher>) -> ProgressController {
        let run_label = format!("Currently training: {} (0/{})", config.model_name, config.total_runs());
        let epoch_label = epoch_label(0, config.training_epochs);
        ProgressController {
            config,
            cancel,
            finisher,
            state: RunState::default(),
            dialog: DialogState {
                title: DIALOG_TITLE.to_owned(),
                indicator_running: true,
                run_label,
                epoch_label,
                completion_log: Vec::new(),
                button_label: CANCEL_LABEL.to_owned(),
                closed: false,
            },
            active_name: String::new(),
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn dialog(&self) -> &DialogState {
        &self.dialog
    }

    pub fn is_closed(&self) -> bool {
        self.dialog.closed
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_set()
    }

    /// True once the batch has reached a terminal state and the button
    /// reads "Close".
    pub fn is_finished(&self) -> bool {
        self.dialog.button_label == CLOSE_LABEL
    }

    /// Routes one notification to its handler. Events arriving after the
    /// dialog closed are dropped.
    pub fn handle(&mut self, notification: Notification) {
        if self.dialog.closed {
            return;
        }
        match notification {
            Notification::RunStarted { .. } => self.on_run_started(),
            Notification::EpochAdvanced { epoch } => self.on_epoch_advanced(epoch),
            Notification::RunComplete { run, outcome } => self.on_run_complete(run, outcome),
            Notification::Dismiss => self.close(),
            Notification::WorkerFinished(report) => self.on_worker_finished(report),
            Notification::CancelClicked => self.on_cancel_requested(),
            Notification::CloseClicked => self.on_close_requested(),
        }
    }

    pub fn on_run_started(&mut self) {
        let total = self.config.total_runs();
        if self.state.current_run >= total {
            tracing::warn!("Run start beyond the {total} configured captures ignored");
            return;
        }
        self.state.current_run += 1;
        self.state.current_epoch = 1;
        self.active_name = capture_base_name(&self.config.captures[self.state.current_run - 1]);
        self.dialog.run_label = format!(
            "Currently training: {} ({}/{})",
            self.active_name, self.state.current_run, total
        );
        self.dialog.epoch_label = epoch_label(self.state.current_epoch, self.config.training_epochs);
        tracing::info!("Run {}/{}: {}", self.state.current_run, total, self.active_name);
    }

    /// Epoch numbers past the configured count are ignored.
    pub fn on_epoch_advanced(&mut self, epoch: usize) {
        if epoch > self.config.training_epochs {
            tracing::debug!("Ignoring epoch {epoch} beyond {}", self.config.training_epochs);
            return;
        }
        self.state.current_epoch = epoch;
        self.dialog.epoch_label = epoch_label(epoch, self.config.training_epochs);
    }

    /// Post-processes the finished run and appends its line to the log.
    pub fn on_run_complete(&mut self, run: usize, outcome: RunOutcome) {
        if run != self.state.current_run {
            tracing::warn!("Completion for run {run} while run {} is active", self.state.current_run);
        }
        let name = self.active_name.clone();
        let finisher = &mut self.finisher;
        let result = outcome.and_then(|trained| {
            panic::catch_unwind(AssertUnwindSafe(|| finisher.finish(trained, &name)))
                .unwrap_or_else(|payload| Err(TrainError::Panicked(panic_message(payload.as_ref()))))
        });

        let (line, failed) = match result {
            Ok(esr) => {
                self.state.completed_runs += 1;
                tracing::info!("{name}: ESR = {esr:.4}");
                (format!("{name}: ESR = {esr:.4}"), false)
            }
            Err(err) => {
                self.state.failed_runs += 1;
                tracing::error!("{name} failed: {err}");
                (format!("{name}: FAILED ({err})"), true)
            }
        };

        if failed && self.config.failure_policy == FailurePolicy::Abort {
            self.dialog.completion_log.push(format!("{line}\n\n{ABORTED_BANNER}"));
            self.finish_batch();
        } else if self.state.current_run == self.config.total_runs() {
            self.dialog.completion_log.push(format!("{line}\n\n{COMPLETE_BANNER}"));
            self.finish_batch();
        } else {
            self.dialog.completion_log.push(line);
        }
    }

    /// The action button. Sets the cancel flag; closes right away only when
    /// the batch is already over.
    pub fn on_cancel_requested(&mut self) {
        self.cancel.set();
        if self.is_finished() {
            self.close();
        } else {
            tracing::info!("Cancel requested; stopping at the next checkpoint");
        }
    }

    /// The window's close control. Also cancels so the worker drains.
    pub fn on_close_requested(&mut self) {
        self.cancel.set();
        self.close();
    }

    pub fn on_worker_finished(&mut self, report: WorkerReport) {
        self.state.worker_finished = true;
        if report.skipped > 0 {
            tracing::info!("Worker finished; {} capture(s) skipped", report.skipped);
        } else {
            tracing::debug!("Worker finished: {report:?}");
        }
    }

    pub fn close(&mut self) {
        if !self.dialog.closed {
            self.dialog.closed = true;
            self.dialog.indicator_running = false;
        }
    }

    fn finish_batch(&mut self) {
        self.dialog.button_label = CLOSE_LABEL.to_owned();
        self.dialog.indicator_running = false;
    }
}

fn epoch_label(epoch: usize, total: usize) -> String {
    format!("Training epoch in progress: ({epoch}/{total})")
}
