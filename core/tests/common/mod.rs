#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use modegate_core::api::{
    AppConfig, EventBus, InMemoryGateway, ModeStore, PersistenceGateway, StorageError,
};

/// Gateway whose `set` suspends until a permit is released.
pub struct GatedGateway {
    inner: InMemoryGateway,
    gate: Semaphore,
}

impl GatedGateway {
    pub fn new() -> Self {
        Self {
            inner: InMemoryGateway::new(),
            gate: Semaphore::new(0),
        }
    }

    pub fn release(&self, writes: usize) {
        self.gate.add_permits(writes);
    }

    pub fn write_count(&self) -> u64 {
        self.inner.write_count()
    }
}

#[async_trait]
impl PersistenceGateway for GatedGateway {
    fn name(&self) -> &str {
        "gated"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let permit = self.gate.acquire().await.map_err(|_| StorageError::Closed)?;
        permit.forget();
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }
}

/// Gateway that fails every write; reads see an empty store.
#[derive(Default)]
pub struct FailingGateway;

#[async_trait]
impl PersistenceGateway for FailingGateway {
    fn name(&self) -> &str {
        "failing"
    }

    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: Vec<u8>) -> Result<(), StorageError> {
        Err(StorageError::Backend("disk full".into()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Backend("disk full".into()))
    }
}

/// In-memory gateway that counts writes and removes per key.
#[derive(Default)]
pub struct RecordingGateway {
    inner: InMemoryGateway,
    writes: Mutex<HashMap<String, usize>>,
    removes: Mutex<HashMap<String, usize>>,
}

impl RecordingGateway {
    pub fn with_entries(entries: &[(&str, &[u8])]) -> Self {
        Self {
            inner: InMemoryGateway::with_entries(
                entries.iter().map(|(k, v)| (k.to_string(), v.to_vec())),
            ),
            ..Self::default()
        }
    }

    pub fn writes_to(&self, key: &str) -> usize {
        self.writes.lock().get(key).copied().unwrap_or(0)
    }

    pub fn removes_of(&self, key: &str) -> usize {
        self.removes.lock().get(key).copied().unwrap_or(0)
    }

    pub async fn keys(&self) -> Vec<String> {
        self.inner.keys().await
    }
}

#[async_trait]
impl PersistenceGateway for RecordingGateway {
    fn name(&self) -> &str {
        "recording"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        *self.writes.lock().entry(key.to_string()).or_default() += 1;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        *self.removes.lock().entry(key.to_string()).or_default() += 1;
        self.inner.remove(key).await
    }
}

pub fn store_on(gateway: Arc<dyn PersistenceGateway>, cfg: &AppConfig) -> ModeStore {
    ModeStore::new(cfg, gateway, EventBus::new())
}
