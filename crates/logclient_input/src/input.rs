use std::sync::Arc;

use async_trait::async_trait;
use collector_core::{EntrySink, InputOperator, OperatorError, Persister, SinkError};
use tokio::{
    io::AsyncRead,
    process::{Child, ChildStdout},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{
    decode::decode_line,
    process::CommandSpec,
    reader::{BoundedLineReader, ReadLine},
    StartError, StopError,
};

/// The logClient input stage.
///
/// Owns one producer subprocess and one background worker for its active
/// lifetime. One-shot: a stopped input cannot be started again.
pub struct LogClientInput {
    spec: CommandSpec,
    max_line_bytes: usize,
    output: Arc<dyn EntrySink>,
    lifecycle: Lifecycle,
}

enum Lifecycle {
    Idle,
    Running {
        cancel: CancellationToken,
        worker: JoinHandle<()>,
    },
    Stopped,
}

impl LogClientInput {
    pub(crate) fn new(spec: CommandSpec, max_line_bytes: usize, output: Arc<dyn EntrySink>) -> Self {
        Self {
            spec,
            max_line_bytes,
            output,
            lifecycle: Lifecycle::Idle,
        }
    }

    /// Launches the producer and the reader worker, then returns immediately.
    ///
    /// The persister is part of the framework contract; this stage has no
    /// resumable state and leaves it untouched. On a spawn or pipe failure
    /// nothing is left running and no worker exists.
    pub async fn start(&mut self, _persister: Arc<dyn Persister>) -> Result<(), StartError> {
        match self.lifecycle {
            Lifecycle::Idle => {}
            Lifecycle::Running { .. } => return Err(StartError::AlreadyStarted),
            Lifecycle::Stopped => return Err(StartError::AlreadyStopped),
        }

        let (child, stdout) = self.spec.spawn()?;
        debug!(binary = %self.spec.binary.display(), "logClient started");

        let cancel = CancellationToken::new();
        let worker = tokio::spawn(run_worker(
            child,
            stdout,
            self.max_line_bytes,
            Arc::clone(&self.output),
            cancel.clone(),
        ));
        self.lifecycle = Lifecycle::Running { cancel, worker };
        Ok(())
    }

    /// Cancels the stage and waits for the worker to exit.
    ///
    /// Blocks unboundedly on the worker; once this returns, no further entry
    /// reaches the sink. Idempotent: stopping a stopped input is a no-op.
    pub async fn stop(&mut self) -> Result<(), StopError> {
        match std::mem::replace(&mut self.lifecycle, Lifecycle::Stopped) {
            Lifecycle::Idle => {
                self.lifecycle = Lifecycle::Idle;
                Err(StopError::NotStarted)
            }
            Lifecycle::Stopped => Ok(()),
            Lifecycle::Running { cancel, worker } => {
                cancel.cancel();
                worker.await?;
                debug!("logClient input stopped");
                Ok(())
            }
        }
    }
}

#[async_trait]
impl InputOperator for LogClientInput {
    async fn start(&mut self, persister: Arc<dyn Persister>) -> Result<(), OperatorError> {
        LogClientInput::start(self, persister)
            .await
            .map_err(OperatorError::new)
    }

    async fn stop(&mut self) -> Result<(), OperatorError> {
        LogClientInput::stop(self).await.map_err(OperatorError::new)
    }
}

/// Worker body: drive the read loop, then take the producer down with us.
///
/// The kill covers both exits: on cancellation the child is still up and must
/// die so the pipe closes; after a child-initiated EOF the kill is a no-op and
/// the wait reaps the exit status.
async fn run_worker(
    mut child: Child,
    stdout: ChildStdout,
    max_line_bytes: usize,
    output: Arc<dyn EntrySink>,
    cancel: CancellationToken,
) {
    read_entries(stdout, max_line_bytes, &*output, &cancel).await;
    let _ = child.start_kill();
    let _ = child.wait().await;
}

/// The read-decode-emit loop.
///
/// Strict FIFO, one line in flight at a time. A malformed line costs one
/// warning; a read error costs the stream; end of stream is silent. The
/// cancellation token short-circuits the blocking read so shutdown never
/// depends on the producer writing another line.
pub(crate) async fn read_entries<R>(
    source: R,
    max_line_bytes: usize,
    output: &dyn EntrySink,
    cancel: &CancellationToken,
) where
    R: AsyncRead + Unpin,
{
    let mut reader = BoundedLineReader::new(source, max_line_bytes);

    loop {
        let next = tokio::select! {
            () = cancel.cancelled() => break,
            next = reader.next_line() => next,
        };

        match next {
            None => break,
            Some(ReadLine::Io {
                line_number,
                source,
            }) => {
                warn!(line_number, error = %source, "error reading logClient stdout");
                break;
            }
            Some(ReadLine::TooLong {
                line_number,
                observed_bytes,
                max_line_bytes,
            }) => {
                warn!(line_number, observed_bytes, max_line_bytes, "skipping oversized line");
            }
            Some(ReadLine::Line { line_number, bytes }) => {
                let entry = match decode_line(&bytes) {
                    Ok(entry) => entry,
                    Err(error) => {
                        warn!(line_number, error = %error, "skipping undecodable line");
                        continue;
                    }
                };
                match output.write(cancel, entry).await {
                    Ok(()) => {}
                    Err(SinkError::Cancelled) => break,
                    Err(error @ SinkError::Closed) => {
                        warn!(error = %error, "downstream sink dropped entry");
                    }
                }
            }
        }
    }
}
