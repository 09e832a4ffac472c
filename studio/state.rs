use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ferrite_amp::progress::{DialogState, DialogView, Notifier};

// ---------------------------------------------------------------------------
// Shared studio state
// ---------------------------------------------------------------------------

/// What request handlers can see of the running dialog.
pub struct StudioState {
    /// Latest dialog snapshot published by the dialog thread.
    pub dialog:   DialogState,
    /// Bumped on every change so SSE streams know when to push.
    pub version:  u64,
    /// Feeds button clicks into the dialog's queue.
    pub notifier: Notifier,
}

impl StudioState {
    pub fn new(dialog: DialogState, notifier: Notifier) -> Self {
        StudioState { dialog, version: 0, notifier }
    }
}

/// Shared state type: an `Arc<Mutex<StudioState>>` passed to every handler.
pub type SharedState = Arc<Mutex<StudioState>>;

/// Locks the shared state. A handler that panicked mid-update leaves only
/// a stale snapshot behind, so poisoning is ignored.
pub fn lock(state: &SharedState) -> MutexGuard<'_, StudioState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// Dialog view
// ---------------------------------------------------------------------------

/// Publishes every dialog change into the shared state.
pub struct WebView {
    state: SharedState,
}

impl WebView {
    pub fn new(state: SharedState) -> Self {
        WebView { state }
    }
}

impl DialogView for WebView {
    fn refresh(&mut self, dialog: &DialogState) {
        let mut st = lock(&self.state);
        if st.dialog != *dialog {
            st.dialog = dialog.clone();
            st.version += 1;
        }
    }
}
