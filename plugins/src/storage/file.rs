//! File-backed persistence gateway.
//!
//! One file per physical key under a root directory. Writes land in a
//! temporary sibling first and are renamed into place.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use uuid::Uuid;

use modegate_core::api::{PersistenceGateway, StorageError};

pub struct FileGateway {
    root: PathBuf,
}

impl FileGateway {
    pub fn open<P: Into<PathBuf>>(root: P) -> Result<Self> {
        let root = root.into();
        if !root.exists() {
            std::fs::create_dir_all(&root)
                .with_context(|| format!("Failed to create storage directory: {:?}", root))?;
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(encode_key(key))
    }
}

/// Escape everything outside `[A-Za-z0-9_-]` so keys like `app:auth:data`
/// are valid file names on every platform.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for b in key.bytes() {
        if b.is_ascii_alphanumeric() || b == b'_' || b == b'-' {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

#[async_trait]
impl PersistenceGateway for FileGateway {
    fn name(&self) -> &str {
        "file"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let target = self.path_for(key);
        let tmp = self
            .root
            .join(format!(".{}.{}.tmp", encode_key(key), Uuid::new_v4().simple()));

        tokio::fs::write(&tmp, &value).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &target).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        tracing::trace!(key, bytes = value.len(), "stored blob");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modegate_core::api::{run_migration, StorageKeyRegistry};
    use tempfile::TempDir;

    #[test]
    fn test_encode_key() {
        assert_eq!(encode_key("app:auth:data"), "app%3Aauth%3Adata");
        assert_eq!(encode_key("LAST_SCREEN_PATH"), "LAST_SCREEN_PATH");
        assert_eq!(encode_key("a/b"), "a%2Fb");
    }

    #[tokio::test]
    async fn test_round_trip_on_disk() {
        let dir = TempDir::new().unwrap();
        let gw = FileGateway::open(dir.path().join("nested")).unwrap();

        assert!(gw.get("app:auth:data").await.unwrap().is_none());
        gw.set("app:auth:data", b"one".to_vec()).await.unwrap();
        gw.set("app:auth:data", b"two".to_vec()).await.unwrap();
        assert_eq!(gw.get("app:auth:data").await.unwrap(), Some(b"two".to_vec()));

        let files: Vec<_> = std::fs::read_dir(gw.root())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(files, vec!["app%3Aauth%3Adata".to_string()]);

        gw.remove("app:auth:data").await.unwrap();
        gw.remove("app:auth:data").await.unwrap();
        assert!(gw.get("app:auth:data").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = TempDir::new().unwrap();
        FileGateway::open(dir.path())
            .unwrap()
            .set("app:app:settings", br#"{"app_mode":"live"}"#.to_vec())
            .await
            .unwrap();

        let reopened = FileGateway::open(dir.path()).unwrap();
        let bytes = reopened.get("app:app:settings").await.unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["app_mode"], "live");
    }

    #[tokio::test]
    async fn test_migration_against_files() {
        let dir = TempDir::new().unwrap();
        let gw = FileGateway::open(dir.path()).unwrap();
        gw.set("LIVE_MODE_AUTH_DATA", b"legacy".to_vec()).await.unwrap();

        let report = run_migration(&gw, &StorageKeyRegistry::new()).await;
        assert_eq!(report.migrated.len(), 1);
        assert_eq!(gw.get("app:auth:data").await.unwrap(), Some(b"legacy".to_vec()));
        assert!(gw.get("LIVE_MODE_AUTH_DATA").await.unwrap().is_none());
    }
}
