use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors rejecting a configuration at build time.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("endpoint must not be empty")]
    EmptyEndpoint,
    #[error("endpoint `{endpoint}` is not a host:port address")]
    InvalidEndpoint { endpoint: String },
    #[error("log filter must not be empty")]
    EmptyLogFilter,
    #[error("max_line_bytes must be non-zero")]
    ZeroLineLimit,
}

/// Errors aborting activation. None of these leave a worker running.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("logClient binary `{binary}` could not be spawned: {source}")]
    Spawn {
        binary: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("logClient stdout unavailable")]
    StdoutUnavailable,
    #[error("input is already running")]
    AlreadyStarted,
    #[error("input was stopped and cannot be restarted")]
    AlreadyStopped,
}

/// Errors from deactivation.
#[derive(Debug, Error)]
pub enum StopError {
    #[error("input was never started")]
    NotStarted,
    #[error("failed to join reader worker: {0}")]
    Join(#[from] tokio::task::JoinError),
}
