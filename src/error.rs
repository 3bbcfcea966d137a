//! Error types for a single check run.
//!
//! Configuration problems never reach this type: clap rejects a missing
//! environment variable before any network call is made. Everything that
//! can go wrong after that is a `MonitorError`, which the binary reports to
//! the chat (best effort) before exiting with a failure status.

use thiserror::Error;

/// Runtime failures of a check run.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// A configured value is present but unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The watched address is not valid base58check.
    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Transport failure, timeout, or a non-2xx status from an HTTP endpoint.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The contract call answered without any result word.
    #[error("Empty contract result{}", .0.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    EmptyContractResult(Option<String>),

    /// The gateway answered with a shape we cannot interpret.
    #[error("Unexpected gateway response: {0}")]
    UnexpectedResponse(String),

    /// The Telegram Bot API rejected or failed a request.
    #[error("Telegram request failed: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// Writing the status file failed.
    #[error("Failed to save status file={path}: {reason}")]
    State { path: String, reason: String },
}
