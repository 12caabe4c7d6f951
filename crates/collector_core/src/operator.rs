use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::Persister;

/// Error returned from a stage's lifecycle calls.
///
/// Stages define their own error types; this wrapper carries them across the
/// trait-object boundary with the source chain intact.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct OperatorError(Box<dyn std::error::Error + Send + Sync>);

impl OperatorError {
    pub fn new(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Box::new(source))
    }
}

/// Lifecycle contract for input stages.
///
/// `start` must return once the stage is live (it never blocks on produced
/// data); `stop` must not return until the stage's background work has fully
/// exited, so the framework can tear stages down in order.
#[async_trait]
pub trait InputOperator: Send {
    async fn start(&mut self, persister: Arc<dyn Persister>) -> Result<(), OperatorError>;
    async fn stop(&mut self) -> Result<(), OperatorError>;
}
