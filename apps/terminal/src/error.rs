//! # App Error Type
//!
//! Errors raised by the terminal adapter itself.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Terminal App                       │
//! │                                                                         │
//! │  Input error (unknown command, bad argument)                            │
//! │      └──► printed, loop continues                                       │
//! │                                                                         │
//! │  Refused checkout action                                                │
//! │      └──► core publishes checkout:refused ──► View prints it           │
//! │                                                                         │
//! │  Client error (catalog fetch)                                           │
//! │      └──► core publishes catalog:failed ──► View prints it             │
//! │                                                                         │
//! │  Startup error (bad config URL, stdin closed unexpectedly)              │
//! │      └──► returned from run() ──► main exits non-zero                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use larek_client::ClientError;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unknown command '{0}'. Type `help` for the list.")]
    UnknownCommand(String),

    #[error("`{command}` needs an argument: {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("No product {0} in the catalog")]
    NoSuchProduct(String),

    #[error("Empty input")]
    EmptyInput,

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Input errors are reported to the shopper and the session goes on.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AppError::UnknownCommand(_)
                | AppError::MissingArgument { .. }
                | AppError::InvalidArgument(_)
                | AppError::NoSuchProduct(_)
                | AppError::EmptyInput
        )
    }
}
