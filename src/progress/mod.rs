pub mod cancel;
pub mod console;
pub mod controller;
pub mod dialog;
pub mod gate;
pub mod notification;
pub mod worker;

pub use cancel::CancelFlag;
pub use console::ConsoleView;
pub use controller::{DialogState, ProgressController, RunState};
pub use dialog::{DialogError, DialogOptions, DialogOutcome, DialogView, TrainingDialog};
pub use gate::CancellationGate;
pub use notification::{channel, Notification, NotificationQueue, Notifier, RunOutcome};
pub use worker::{WorkerDriver, WorkerReport};
