use std::time::Duration;
use tiny_http::Request;

use crate::state::{lock, SharedState};
use crate::util::sse::{format_sse_event, format_sse_keepalive, write_sse, SSE_HEADER};

const POLL_INTERVAL: Duration = Duration::from_millis(200);
/// Polls between keep-alive comments.
const KEEPALIVE_EVERY: u32 = 50;

/// `GET /events`: streams the dialog as Server-Sent Events.
///
/// Every change is sent as an `event: progress` frame carrying the full
/// dialog snapshot as JSON, starting with the current one. When the dialog
/// closes a final `event: closed` frame is written and the stream ends.
/// Client reconnection is handled natively by `EventSource`.
pub fn handle(request: Request, state: SharedState) {
    let mut writer = request.into_writer();
    if !write_sse(&mut *writer, SSE_HEADER) {
        return;
    }

    let mut sent_version = None;
    let mut idle_polls = 0;
    loop {
        let (version, json, closed) = {
            let st = lock(&state);
            let json = if sent_version == Some(st.version) {
                None
            } else {
                serde_json::to_string(&st.dialog).ok()
            };
            (st.version, json, st.dialog.closed)
        };

        if let Some(json) = json {
            if !write_sse(&mut *writer, &format_sse_event("progress", &json)) {
                return;
            }
            sent_version = Some(version);
            idle_polls = 0;
        }

        if closed {
            let _ = write_sse(&mut *writer, &format_sse_event("closed", "{}"));
            return;
        }

        idle_polls += 1;
        if idle_polls >= KEEPALIVE_EVERY {
            if !write_sse(&mut *writer, format_sse_keepalive()) {
                return;
            }
            idle_polls = 0;
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}
