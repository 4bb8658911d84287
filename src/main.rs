//! chatview: browse and search exported chat threads from the terminal.

use std::process::ExitCode;

use chatlog_viewer::cli;

fn main() -> ExitCode {
    // Logging is initialized by cli::run based on --log-level and --log-format
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");

            if std::env::var("RUST_BACKTRACE").is_ok() {
                if let Some(source) = std::error::Error::source(&e) {
                    eprintln!("Caused by: {source}");
                }
            }

            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}
