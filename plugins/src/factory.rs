use std::sync::Arc;

use anyhow::{Context, Result};

use modegate_core::api::{AppConfig, InMemoryGateway, PersistenceGateway, StorageProvider};

use crate::storage::FileGateway;

pub fn build_gateway(cfg: &AppConfig) -> Result<Arc<dyn PersistenceGateway>> {
    match cfg.storage.provider {
        StorageProvider::Memory => Ok(Arc::new(InMemoryGateway::new())),
        StorageProvider::File => {
            let dir = cfg
                .storage
                .directory
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .context("storage.directory is required for the file provider")?;
            Ok(Arc::new(FileGateway::open(dir)?))
        }
    }
}
