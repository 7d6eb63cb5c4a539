//! Error handling and exit codes.

use std::io;

use stackdash_core::exit_codes;
use stackdash_core::DashError;

/// Failures that end the application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("terminal error: {0}")]
    Terminal(#[source] io::Error),
}

/// Map an error to the process exit code.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(err) = err.downcast_ref::<AppError>() {
        return match err {
            AppError::Config(_) => exit_codes::ERROR_CONFIG,
            AppError::Terminal(_) => exit_codes::ERROR_TERMINAL,
        };
    }
    match err.downcast_ref::<DashError>() {
        Some(DashError::Config(_)) => exit_codes::ERROR_CONFIG,
        _ => exit_codes::ERROR_GENERIC,
    }
}
