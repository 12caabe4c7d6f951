use async_trait::async_trait;
use thiserror::Error;

/// Failure surfaced by a persistence backend.
#[derive(Debug, Error)]
#[error("persistence backend error: {message}")]
pub struct PersistError {
    pub message: String,
}

impl PersistError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Checkpoint storage handed to input stages at start.
///
/// Stages that track offsets persist them through this handle; stages without
/// resumable state accept it and ignore it.
#[async_trait]
pub trait Persister: Send + Sync {
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), PersistError>;
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistError>;
}

/// Persister that stores nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NopPersister;

#[async_trait]
impl Persister for NopPersister {
    async fn set(&self, _key: &str, _value: Vec<u8>) -> Result<(), PersistError> {
        Ok(())
    }

    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, PersistError> {
        Ok(None)
    }
}
