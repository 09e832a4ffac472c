// Console front end for the capture trainer.
//
//   cargo run --release -- [path/to/tui_config.json]
//
// Type `c` + Enter to press the dialog button (Cancel / Close) and `q` +
// Enter to close the window. The dialog closes by itself once every capture
// is trained, or once a cancelled batch has drained. With no capture selected
// in the settings file, every `.wav` in the capture folder is trained, and the
// resolved settings are written back to the file.
use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;

use ferrite_amp::config::CONFIG_FILE_NAME;
use ferrite_amp::progress::{ConsoleView, Notifier};
use ferrite_amp::{CaptureTrainer, DialogOptions, PlotAndExport, RunConfiguration, TrainingDialog};

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

    let finisher = Box::new(PlotAndExport::new(config.output_folder.clone()));
    let dialog = match TrainingDialog::open(config, Arc::new(CaptureTrainer::default()), finisher) {
        Ok(dialog) => dialog,
        Err(err) => {
            tracing::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    spawn_input_reader(dialog.notifier());

    let options = DialogOptions { close_on_complete: true, close_when_drained: true };
    let outcome = dialog.run(&mut ConsoleView::new(std::io::stdout()), options);

    if outcome.failed_runs > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Reads button presses from stdin on a helper thread.
fn spawn_input_reader(notifier: Notifier) {
    let spawned = thread::Builder::new()
        .name("console-input".to_owned())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                let delivered = match line.trim() {
                    "c" | "C" => notifier.cancel_clicked(),
                    "q" | "Q" => notifier.close_clicked(),
                    _ => true,
                };
                if !delivered {
                    break;
                }
            }
        });
    if let Err(err) = spawned {
        tracing::warn!("Console input unavailable, dialog cannot be cancelled: {err}");
    }
}
