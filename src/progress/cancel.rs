use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Set-once cancellation signal shared between the dialog thread (writer)
/// and the worker thread (reader). There is no reset.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> CancelFlag {
        CancelFlag::default()
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
