/// Capture trainer studio
///
/// Serves the training-progress dialog to a browser. The dialog's message
/// loop runs on the main thread; the page follows it over Server-Sent
/// Events and posts button clicks back.
///
/// Run with:
///   cargo run --bin studio --release -- [path/to/tui_config.json]
/// Then open http://127.0.0.1:7878

mod state;
mod render;
mod routes;
mod handlers;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tiny_http::Server;

use ferrite_amp::config::CONFIG_FILE_NAME;
use ferrite_amp::{CaptureTrainer, DialogOptions, PlotAndExport, RunConfiguration, TrainingDialog};

use state::{StudioState, WebView};

const ADDR: &str = "127.0.0.1:7878";
/// Time left for open pages to receive the `closed` event before exiting.
const CLOSE_GRACE: Duration = Duration::from_millis(500);

fn main() -> ExitCode {
    if let Err(err) = ferrite_amp::logging::init() {
        eprintln!("{err}");
    }

    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
    let config = match RunConfiguration::load_for_training(&config_path) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    // Bind before the worker starts so a busy port doesn't leave it training unseen.
    let server = match Server::http(ADDR) {
        Ok(server) => server,
        Err(err) => {
            tracing::error!("Failed to bind HTTP server on {ADDR}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let finisher = Box::new(PlotAndExport::new(config.output_folder.clone()));
    let dialog = match TrainingDialog::open(config, Arc::new(CaptureTrainer::default()), finisher) {
        Ok(dialog) => dialog,
        Err(err) => {
            tracing::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let shared_state = Arc::new(Mutex::new(StudioState::new(dialog.dialog().clone(), dialog.notifier())));

    println!("╔══════════════════════════════════════════════╗");
    println!("║          ferrite-amp Studio                  ║");
    println!("╠══════════════════════════════════════════════╣");
    println!("║  Open in your browser:                       ║");
    println!("║  http://{}                       ║", ADDR);
    println!("╚══════════════════════════════════════════════╝");

    let server_state = shared_state.clone();
    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            let state_clone = server_state.clone();
            std::thread::spawn(move || {
                routes::dispatch(request, state_clone);
            });
        }
    });

    let outcome = dialog.run(&mut WebView::new(shared_state), DialogOptions::default());
    std::thread::sleep(CLOSE_GRACE);

    tracing::info!(
        "Dialog closed: {} trained, {} failed{}",
        outcome.completed_runs,
        outcome.failed_runs,
        if outcome.cancelled { ", cancelled" } else { "" }
    );
    if outcome.failed_runs > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
