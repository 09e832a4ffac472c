use tiny_http::Request;

use crate::render::render_dialog;
use crate::routes::{html_response, no_content};
use crate::state::{lock, SharedState};

/// `GET /`: the dialog page, pre-filled with the current snapshot.
pub fn handle_get(request: Request, state: SharedState) {
    let html = render_dialog(&lock(&state).dialog);
    let _ = request.respond(html_response(html));
}

/// `POST /cancel`: the action button, whatever it currently says.
pub fn handle_cancel(request: Request, state: SharedState) {
    let delivered = lock(&state).notifier.cancel_clicked();
    if !delivered {
        tracing::debug!("Button pressed after the dialog closed");
    }
    let _ = request.respond(no_content());
}

/// `POST /close`: the window's close box.
pub fn handle_close(request: Request, state: SharedState) {
    let delivered = lock(&state).notifier.close_clicked();
    if !delivered {
        tracing::debug!("Close pressed after the dialog closed");
    }
    let _ = request.respond(no_content());
}
