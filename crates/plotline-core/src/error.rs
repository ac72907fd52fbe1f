//! Error types for plotline-core.
//!
//! Everything here is a framework-level failure. Script-level failures never
//! surface as an [`Error`]; they are reported inside an
//! [`ExecutionResult`](crate::ExecutionResult) with `Status::Error`.

use thiserror::Error;

/// Result type for plotline-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in plotline-core.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O failure while flushing output or inside the interpreter.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration value was malformed or unknown.
    #[error("configuration error: {0}")]
    Config(String),

    /// The live-object registry was unavailable.
    #[error("live registry error: {0}")]
    Registry(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Render the error together with a short recovery hint.
    pub fn with_hint(&self) -> String {
        let hint = match self {
            Error::Io(_) => "check where the output listener and the interpreter read or write",
            Error::Config(_) => {
                "options are interactive, close, angular (True/False) and width, height (positive integers)"
            }
            Error::Registry(_) => "attach a live registry to the context or run with angular=False",
            Error::Json(_) => "the registry bookkeeping entry could not be encoded",
        };
        format!("{self}\n  hint: {hint}")
    }
}
