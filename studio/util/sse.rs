use std::io::Write;

// ---------------------------------------------------------------------------
// SSE framing helpers
// ---------------------------------------------------------------------------

/// Status line and headers for an event stream, written straight onto the
/// socket since tiny_http has no streaming bodies.
pub const SSE_HEADER: &str = "HTTP/1.1 200 OK\r\n\
                              Content-Type: text/event-stream\r\n\
                              Cache-Control: no-cache\r\n\
                              Connection: keep-alive\r\n\
                              X-Accel-Buffering: no\r\n\
                              \r\n";

/// Formats a named SSE event with a JSON data payload:
/// `event: <name>\ndata: <json>\n\n`.
pub fn format_sse_event(event_name: &str, json_data: &str) -> String {
    format!("event: {}\ndata: {}\n\n", event_name, json_data)
}

/// Comment frame; ignored by `EventSource` but keeps the connection open.
pub fn format_sse_keepalive() -> &'static str {
    ": ping\n\n"
}

/// Writes one frame and flushes it. `false` means the client went away.
pub fn write_sse<W: Write + ?Sized>(writer: &mut W, msg: &str) -> bool {
    writer.write_all(msg.as_bytes()).is_ok() && writer.flush().is_ok()
}
