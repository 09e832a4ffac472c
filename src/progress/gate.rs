use crate::progress::cancel::CancelFlag;
use crate::progress::notification::Notifier;
use crate::train::epoch_stats::EpochStats;
use crate::train::observer::{TrainerControl, TrainingObserver};

/// Observer handed to the trainer for one run. Reports epoch progress and
/// turns a pending cancel into a trainer stop plus a dialog dismissal.
#[derive(Debug)]
pub struct CancellationGate {
    cancel: CancelFlag,
    notifier: Notifier,
    dismissed: bool,
}

impl CancellationGate {
    pub fn new(cancel: CancelFlag, notifier: Notifier) -> CancellationGate {
        CancellationGate { cancel, notifier, dismissed: false }
    }

    fn checkpoint(&mut self, control: &mut TrainerControl) {
        if !self.cancel.is_set() {
            return;
        }
        control.should_stop = true;
        if !self.dismissed {
            self.dismissed = true;
            tracing::info!("Cancel observed at checkpoint; stopping trainer");
            self.notifier.dismiss();
        }
    }
}

impl TrainingObserver for CancellationGate {
    fn on_init_start(&mut self, control: &mut TrainerControl) {
        self.checkpoint(control);
    }

    fn on_init_end(&mut self, control: &mut TrainerControl) {
        self.checkpoint(control);
    }

    /// Announces the next epoch (one past the finished one), then checks
    /// for cancellation.
    fn on_train_epoch_end(&mut self, control: &mut TrainerControl, stats: &EpochStats) {
        self.notifier.epoch_advanced(stats.epoch + 1);
        self.checkpoint(control);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::notification::{channel, NotificationKind};

    fn stats(epoch: usize) -> EpochStats {
        EpochStats { epoch, total_epochs: 3, train_loss: 0.1, validation_esr: 0.2, learning_rate: 0.004, elapsed_ms: 1 }
    }

    #[test]
    fn epoch_end_announces_next_epoch() {
        let (notifier, queue) = channel();
        let mut gate = CancellationGate::new(CancelFlag::new(), notifier);
        let mut control = TrainerControl::default();

        gate.on_init_start(&mut control);
        gate.on_init_end(&mut control);
        gate.on_train_epoch_end(&mut control, &stats(1));
        gate.on_train_epoch_end(&mut control, &stats(3));

        assert!(!control.should_stop);
        let kinds: Vec<_> = queue.drain().iter().map(NotificationKind::of).collect();
        assert_eq!(kinds, vec![NotificationKind::EpochAdvanced(2), NotificationKind::EpochAdvanced(4)]);
    }

    #[test]
    fn cancel_stops_trainer_and_dismisses_once() {
        let (notifier, queue) = channel();
        let cancel = CancelFlag::new();
        let mut gate = CancellationGate::new(cancel.clone(), notifier);
        let mut control = TrainerControl::default();

        gate.on_train_epoch_end(&mut control, &stats(1));
        cancel.set();
        gate.on_train_epoch_end(&mut control, &stats(2));
        gate.on_train_epoch_end(&mut control, &stats(3));

        assert!(control.should_stop);
        let kinds: Vec<_> = queue.drain().iter().map(NotificationKind::of).collect();
        assert_eq!(kinds, vec![
            NotificationKind::EpochAdvanced(2),
            NotificationKind::EpochAdvanced(3),
            NotificationKind::Dismiss,
            NotificationKind::EpochAdvanced(4),
        ]);
    }

    #[test]
    fn cancel_seen_at_init_start() {
        let (notifier, queue) = channel();
        let cancel = CancelFlag::new();
        cancel.set();
        let mut gate = CancellationGate::new(cancel, notifier);
        let mut control = TrainerControl::default();

        gate.on_init_start(&mut control);

        assert!(control.should_stop);
        assert!(matches!(queue.drain().as_slice(), [crate::progress::notification::Notification::Dismiss]));
    }
}
