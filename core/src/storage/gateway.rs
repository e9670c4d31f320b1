use async_trait::async_trait;

use crate::error::StorageError;

/// Scoped key/value storage. No multi-key transactional guarantees.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    fn name(&self) -> &str;
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
