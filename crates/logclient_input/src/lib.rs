//! Input stage that shells out to a monitoring agent's `logClient` and streams
//! its line-delimited JSON output into the pipeline as normalized entries.
//!
//! The stage owns exactly one long-running `logClient` subprocess, invoked as
//! `logClient --gRPC=<endpoint> --logFilter=<filter> --json`, and a single
//! background worker that reads stdout line by line, decodes each line, and
//! writes the resulting [`collector_core::Entry`] to the configured sink. A
//! malformed line is logged and skipped; only a read error (or end of stream)
//! ends the worker.
//!
//! Lifecycle is one-shot: build, start once, stop once. `stop` cancels the
//! shared token, terminates the child, and returns only after the worker has
//! fully exited, so nothing is emitted past its return.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use collector_core::{ChannelSink, NopPersister};
//! use logclient_input::LogClientConfig;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (sink, mut entries) = ChannelSink::channel(64);
//! let mut input = LogClientConfig::default().build(Arc::new(sink))?;
//! input.start(Arc::new(NopPersister)).await?;
//! while let Some(entry) = entries.recv().await {
//!     println!("{} {:?}", entry.timestamp, entry.body);
//! }
//! input.stop().await?;
//! # Ok(()) }
//! ```

mod config;
mod decode;
mod error;
mod input;
mod process;
mod reader;

#[cfg(test)]
mod tests;

pub use config::LogClientConfig;
pub use decode::{decode_line, DecodeError};
pub use error::{BuildError, StartError, StopError};
pub use input::LogClientInput;
