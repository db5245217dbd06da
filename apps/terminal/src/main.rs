//! # Larek Terminal Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        larek (terminal)                                 │
//! │                                                                         │
//! │  stdin ──► commands ──► StoreBus ──► larek-core stores / checkout       │
//! │                             │                                           │
//! │                             ├──► View ──► stdout                        │
//! │                             └──► Session ──► HTTP API (larek-client)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    match larek_terminal::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("larek: {err}");
            ExitCode::FAILURE
        }
    }
}
