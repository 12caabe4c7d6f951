use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::Entry;

/// Errors a sink may report back to the producing stage.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The downstream stage is gone; the entry was dropped.
    #[error("downstream stage closed")]
    Closed,
    /// The producing stage's cancellation fired while the write was pending.
    #[error("write cancelled")]
    Cancelled,
}

/// Downstream contract consumed by producing stages.
///
/// `write` takes ownership of the entry. The producing stage passes its own
/// cancellation token so a sink that has to wait (for channel capacity, an
/// outbound connection, ...) can abandon the write when the stage shuts down
/// instead of wedging it.
#[async_trait]
pub trait EntrySink: Send + Sync {
    async fn write(&self, cancel: &CancellationToken, entry: Entry) -> Result<(), SinkError>;
}

/// Reference sink forwarding entries to the next stage over a bounded channel.
pub struct ChannelSink {
    tx: mpsc::Sender<Entry>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<Entry>) -> Self {
        Self { tx }
    }

    /// Convenience constructor returning the sink and its receiving half.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Entry>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl EntrySink for ChannelSink {
    async fn write(&self, cancel: &CancellationToken, entry: Entry) -> Result<(), SinkError> {
        tokio::select! {
            () = cancel.cancelled() => Err(SinkError::Cancelled),
            sent = self.tx.send(entry) => sent.map_err(|_| SinkError::Closed),
        }
    }
}
