use std::io::Cursor;
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::handlers;
use crate::state::SharedState;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn header(name: &str, value: &str) -> Option<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}

pub fn html_response(body: String) -> Response<Cursor<Vec<u8>>> {
    let bytes = body.into_bytes();
    let len = bytes.len();
    Response::new(
        StatusCode(200),
        header("Content-Type", "text/html; charset=utf-8").into_iter().collect(),
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

pub fn no_content() -> Response<Cursor<Vec<u8>>> {
    Response::new(StatusCode(204), Vec::new(), Cursor::new(Vec::new()), Some(0), None)
}

fn plain(status: u16, body: &str) -> Response<Cursor<Vec<u8>>> {
    let body = body.as_bytes().to_vec();
    let len = body.len();
    Response::new(
        StatusCode(status),
        header("Content-Type", "text/plain").into_iter().collect(),
        Cursor::new(body),
        Some(len),
        None,
    )
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Routes a request to its handler. Each request runs on its own thread, so
/// the event stream may block for the whole session.
pub fn dispatch(request: Request, state: SharedState) {
    let method = request.method().clone();
    let path = request.url().split('?').next().unwrap_or("/").to_owned();
    tracing::debug!("{:?} {}", method, path);

    match (&method, path.as_str()) {
        (Method::Get, "/")        => handlers::dialog::handle_get(request, state),
        (Method::Get, "/events")  => handlers::events::handle(request, state),
        (Method::Post, "/cancel") => handlers::dialog::handle_cancel(request, state),
        (Method::Post, "/close")  => handlers::dialog::handle_close(request, state),
        (_, "/" | "/events" | "/cancel" | "/close") => {
            let _ = request.respond(plain(405, "405 Method Not Allowed"));
        }
        _ => {
            let _ = request.respond(plain(404, "404 Not Found"));
        }
    }
}
