use crate::train::epoch_stats::EpochStats;

/// The trainer-side state observers may act on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TrainerControl {
    /// Once set, the trainer runs no further epochs.
    pub should_stop: bool,
}

/// Hooks the trainer calls synchronously, on its own thread, at fixed points
/// of a run. Implementations must return quickly.
pub trait TrainingObserver {
    /// Before audio is loaded and the model is built.
    fn on_init_start(&mut self, _control: &mut TrainerControl) {}

    /// After setup, right before the first epoch.
    fn on_init_end(&mut self, _control: &mut TrainerControl) {}

    /// After every completed epoch.
    fn on_train_epoch_end(&mut self, _control: &mut TrainerControl, _stats: &EpochStats) {}
}
