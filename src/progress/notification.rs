use std::sync::mpsc;

use crate::progress::worker::WorkerReport;
use crate::train::error::TrainError;
use crate::train::trainer::TrainedModel;

/// Result of one training call, handed from the worker to the dialog.
pub type RunOutcome = Result<TrainedModel, TrainError>;

/// Events delivered to the dialog's thread, in emission order.
#[derive(Debug)]
pub enum Notification {
    /// The worker is about to train run `run` (1-based).
    RunStarted { run: usize },
    /// Epoch `epoch` of the active run is now in progress.
    EpochAdvanced { epoch: usize },
    /// The training call for `run` returned.
    RunComplete { run: usize, outcome: RunOutcome },
    /// The worker saw the cancel flag at a checkpoint; close the dialog.
    Dismiss,
    /// The worker thread has no more runs to do.
    WorkerFinished(WorkerReport),
    /// The user pressed the action button ("Cancel" / "Close").
    CancelClicked,
    /// The user closed the dialog window.
    CloseClicked,
}

/// Creates the single ordered queue and its first sender.
pub fn channel() -> (Notifier, NotificationQueue) {
    let (tx, rx) = mpsc::channel();
    (Notifier { tx }, NotificationQueue { rx })
}

/// Sending half. Cheap to clone; every clone feeds the same queue.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::Sender<Notification>,
}

impl Notifier {
    /// Queues `notification`. Returns false once the dialog has gone away,
    /// in which case the event is dropped.
    pub fn emit(&self, notification: Notification) -> bool {
        match self.tx.send(notification) {
            Ok(()) => true,
            Err(mpsc::SendError(dropped)) => {
                tracing::debug!("Dialog closed; dropping {:?}", NotificationKind::of(&dropped));
                false
            }
        }
    }

    pub fn run_started(&self, run: usize) -> bool {
        self.emit(Notification::RunStarted { run })
    }

    pub fn epoch_advanced(&self, epoch: usize) -> bool {
        self.emit(Notification::EpochAdvanced { epoch })
    }

    pub fn run_complete(&self, run: usize, outcome: RunOutcome) -> bool {
        self.emit(Notification::RunComplete { run, outcome })
    }

    pub fn dismiss(&self) -> bool {
        self.emit(Notification::Dismiss)
    }

    pub fn worker_finished(&self, report: WorkerReport) -> bool {
        self.emit(Notification::WorkerFinished(report))
    }

    pub fn cancel_clicked(&self) -> bool {
        self.emit(Notification::CancelClicked)
    }

    pub fn close_clicked(&self) -> bool {
        self.emit(Notification::CloseClicked)
    }
}

/// Receiving half, drained only by the dialog's thread.
#[derive(Debug)]
pub struct NotificationQueue {
    rx: mpsc::Receiver<Notification>,
}

impl NotificationQueue {
    /// Blocks for the next notification. `None` once every sender is gone.
    pub fn recv(&self) -> Option<Notification> {
        self.rx.recv().ok()
    }

    /// Everything queued right now, without blocking.
    pub fn drain(&self) -> Vec<Notification> {
        self.rx.try_iter().collect()
    }
}

/// Payload-free discriminant, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    RunStarted(usize),
    EpochAdvanced(usize),
    RunComplete(usize),
    Dismiss,
    WorkerFinished,
    CancelClicked,
    CloseClicked,
}

impl NotificationKind {
    pub fn of(notification: &Notification) -> NotificationKind {
        match notification {
            Notification::RunStarted { run } => NotificationKind::RunStarted(*run),
            Notification::EpochAdvanced { epoch } => NotificationKind::EpochAdvanced(*epoch),
            Notification::RunComplete { run, .. } => NotificationKind::RunComplete(*run),
            Notification::Dismiss => NotificationKind::Dismiss,
            Notification::WorkerFinished(_) => NotificationKind::WorkerFinished,
            Notification::CancelClicked => NotificationKind::CancelClicked,
            Notification::CloseClicked => NotificationKind::CloseClicked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn interleaved_kinds_keep_emission_order() {
        let (notifier, queue) = channel();
        let worker = notifier.clone();
        thread::spawn(move || {
            worker.run_started(1);
            worker.epoch_advanced(2);
            worker.epoch_advanced(3);
            worker.dismiss();
            worker.run_started(2);
        })
        .join()
        .unwrap();
        notifier.cancel_clicked();

        let kinds: Vec<_> = queue.drain().iter().map(NotificationKind::of).collect();
        assert_eq!(kinds, vec![
            NotificationKind::RunStarted(1),
            NotificationKind::EpochAdvanced(2),
            NotificationKind::EpochAdvanced(3),
            NotificationKind::Dismiss,
            NotificationKind::RunStarted(2),
            NotificationKind::CancelClicked,
        ]);
    }

    #[test]
    fn every_emission_is_delivered() {
        let (notifier, queue) = channel();
        for _ in 0..5 {
            notifier.epoch_advanced(4);
        }
        assert_eq!(queue.drain().len(), 5);
    }

    #[test]
    fn emit_reports_closed_dialog() {
        let (notifier, queue) = channel();
        drop(queue);
        assert!(!notifier.run_started(1));
    }

    #[test]
    fn recv_ends_when_senders_drop() {
        let (notifier, queue) = channel();
        notifier.close_clicked();
        drop(notifier);
        assert!(matches!(queue.recv(), Some(Notification::CloseClicked)));
        assert!(queue.recv().is_none());
    }
}
