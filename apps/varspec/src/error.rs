//! # Application Errors
//!
//! `KdpError` covers everything that can go wrong talking to KDP;
//! `AppError` is what CLI commands and the server return to `main`.

use crate::config::ConfigError;
use thiserror::Error;
use varspec_core::VarspecError;

/// Errors raised by the KDP client service and its collaborators.
#[derive(Debug, Error)]
pub enum KdpError {
    /// The core engine rejected the input (guard, translation, selection).
    #[error(transparent)]
    Core(#[from] VarspecError),

    /// The request never produced a response.
    #[error("KDP transport failed: {0}")]
    Transport(String),

    /// KDP answered with a non-success status.
    #[error("Error from KDP with status code {status} and message: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The response body was not valid JSON for the envelope.
    #[error("KDP response could not be parsed: {0}")]
    Parse(String),

    /// No token could be issued for the request.
    #[error("KDP token unavailable: {0}")]
    Token(String),

    /// The order lookup found nothing for this id.
    #[error("Test object order '{0}' not found")]
    OrderNotFound(String),

    /// The response envelope parsed but failed validation.
    #[error("KDP response is invalid: {0}")]
    InvalidResponse(String),

    /// A request could not be built from the configured settings.
    #[error("KDP configuration error: {0}")]
    Config(String),
}

/// Top-level error for CLI commands and the server.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] VarspecError),

    #[error(transparent)]
    Kdp(#[from] KdpError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Test object order '{0}' not found")]
    OrderNotFound(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("{0} order(s) failed validation")]
    Invalid(usize),
}
