#![forbid(unsafe_code)]
//! Shared contracts between log-collection pipeline stages.
//!
//! This crate is intentionally **not** a pipeline runtime. It provides:
//! - The normalized [`Entry`] record that flows between stages.
//! - The [`EntrySink`] contract a producing stage writes into, plus a
//!   channel-backed reference implementation.
//! - The [`InputOperator`] lifecycle contract the hosting framework drives
//!   input stages through, and the [`Persister`] checkpoint handle it passes
//!   to them.

mod entry;
mod operator;
mod persist;
mod sink;

pub use entry::Entry;
pub use operator::{InputOperator, OperatorError};
pub use persist::{NopPersister, PersistError, Persister};
pub use sink::{ChannelSink, EntrySink, SinkError};
