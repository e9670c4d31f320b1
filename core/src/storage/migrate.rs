//! Best-effort, idempotent migration of legacy-keyed blobs.
//!
//! A legacy blob is copied to its current key only when the current key is
//! empty, then the legacy key is removed. A second pass finds nothing under
//! the legacy names and writes nothing.
//!
//! Legacy auth payloads (`{"user": {...}, "token": "..."}`) are rewritten into
//! the `UserStatus` form the store reads from `app:auth:data`. Other blobs are
//! copied as is.

use serde::{Deserialize, Serialize};

use super::gateway::PersistenceGateway;
use super::keys::{LogicalKey, StorageKeyRegistry};
use crate::status::{UnauthReason, UserId, UserStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// `(legacy, current)` pairs that were copied.
    pub migrated: Vec<(String, String)>,
    /// Legacy keys dropped because the current key already held data.
    pub superseded: Vec<String>,
    /// Retired legacy keys still present in storage. Left untouched.
    pub retired_present: Vec<String>,
    pub failures: Vec<MigrationFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationFailure {
    pub key: String,
    pub error: String,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        self.migrated.is_empty() && self.superseded.is_empty() && self.failures.is_empty()
    }

    fn fail(&mut self, key: &str, error: impl ToString) {
        let error = error.to_string();
        tracing::warn!(target: "modegate.migrate", key, error = %error, "legacy key migration failed");
        self.failures.push(MigrationFailure {
            key: key.to_string(),
            error,
        });
    }
}

pub async fn run_migration(
    gateway: &dyn PersistenceGateway,
    registry: &StorageKeyRegistry,
) -> MigrationReport {
    let mut report = MigrationReport::default();
    tracing::debug!(target: "modegate.migrate", version = StorageKeyRegistry::VERSION, "checking legacy keys");

    for (legacy, current) in registry.migrations() {
        let blob = match gateway.get(legacy).await {
            Ok(Some(blob)) => blob,
            Ok(None) => continue,
            Err(e) => {
                report.fail(legacy, e);
                continue;
            }
        };

        let current_present = match gateway.get(current).await {
            Ok(v) => v.is_some(),
            Err(e) => {
                report.fail(current, e);
                continue;
            }
        };

        if current_present {
            tracing::info!(target: "modegate.migrate", legacy, current, "current key already populated, dropping legacy copy");
        } else {
            let blob = match upgrade_blob(current, blob) {
                Ok(blob) => blob,
                Err(e) => {
                    report.fail(legacy, e);
                    continue;
                }
            };
            if let Err(e) = gateway.set(current, blob).await {
                // keep the legacy blob so a later pass can retry
                report.fail(current, e);
                continue;
            }
            tracing::info!(target: "modegate.migrate", legacy, current, "migrated legacy key");
        }

        if let Err(e) = gateway.remove(legacy).await {
            report.fail(legacy, e);
            continue;
        }

        if current_present {
            report.superseded.push(legacy.to_string());
        } else {
            report
                .migrated
                .push((legacy.to_string(), current.to_string()));
        }
    }

    for retired in registry.retired_keys() {
        match gateway.get(retired).await {
            Ok(Some(_)) => {
                tracing::debug!(target: "modegate.migrate", key = retired, "retired legacy key present, leaving as is");
                report.retired_present.push(retired.to_string());
            }
            Ok(None) => {}
            Err(e) => report.fail(retired, e),
        }
    }

    report
}

#[derive(Deserialize)]
struct LegacyAuth {
    #[serde(default)]
    user: Option<LegacyUser>,
    #[serde(default)]
    token: Option<String>,
}

#[derive(Deserialize)]
struct LegacyUser {
    id: serde_json::Value,
}

fn upgrade_blob(current: &str, blob: Vec<u8>) -> Result<Vec<u8>, String> {
    if current != LogicalKey::AuthData.physical() {
        return Ok(blob);
    }
    if serde_json::from_slice::<UserStatus>(&blob).is_ok() {
        return Ok(blob);
    }

    let legacy: LegacyAuth =
        serde_json::from_slice(&blob).map_err(|e| format!("unreadable legacy auth data: {e}"))?;
    let has_token = legacy.token.as_deref().is_some_and(|t| !t.trim().is_empty());
    let status = match legacy.user {
        Some(user) => {
            let id = match user.id {
                serde_json::Value::String(s) if !s.is_empty() => s,
                serde_json::Value::Number(n) => n.to_string(),
                other => return Err(format!("legacy auth data has unusable user id {other}")),
            };
            if has_token {
                UserStatus::authenticated(UserId::new(id))
            } else {
                UserStatus::unauthenticated(Some(UnauthReason::Expired))
            }
        }
        None => UserStatus::guest(),
    };
    serde_json::to_vec(&status).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryGateway;

    #[tokio::test]
    async fn test_migrates_legacy_blob() {
        let gw = InMemoryGateway::with_entries([("LAST_SCREEN_PATH", b"/orders".to_vec())]);
        let report = run_migration(&gw, &StorageKeyRegistry::new()).await;

        assert_eq!(
            report.migrated,
            vec![(
                "LAST_SCREEN_PATH".to_string(),
                "app:navigation:last_path".to_string()
            )]
        );
        assert_eq!(
            gw.get("app:navigation:last_path").await.unwrap(),
            Some(b"/orders".to_vec())
        );
        assert!(gw.get("LAST_SCREEN_PATH").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_legacy_auth_becomes_user_status() {
        let legacy = br#"{"user":{"id":"u-42","name":"Ada"},"token":"abc"}"#;
        let gw = InMemoryGateway::with_entries([("LIVE_MODE_AUTH_DATA", legacy.to_vec())]);
        let report = run_migration(&gw, &StorageKeyRegistry::new()).await;

        assert_eq!(report.migrated.len(), 1);
        let blob = gw.get("app:auth:data").await.unwrap().unwrap();
        let status: UserStatus = serde_json::from_slice(&blob).unwrap();
        assert_eq!(status.user_id(), Some(&UserId::new("u-42")));
    }

    #[test]
    fn test_legacy_auth_shapes() {
        let auth = LogicalKey::AuthData.physical();
        let decode = |raw: &[u8]| -> UserStatus {
            serde_json::from_slice(&upgrade_blob(auth, raw.to_vec()).unwrap()).unwrap()
        };

        let numeric = decode(br#"{"user":{"id":7},"token":"t"}"#);
        assert_eq!(numeric.user_id(), Some(&UserId::new("7")));

        let expired = decode(br#"{"user":{"id":"u-1"},"token":""}"#);
        assert!(matches!(
            expired,
            UserStatus::Unauthenticated {
                reason: Some(UnauthReason::Expired),
                ..
            }
        ));

        assert!(decode(b"{}").user_id().is_none());
        assert!(upgrade_blob(auth, b"token".to_vec()).is_err());
        assert_eq!(
            upgrade_blob("app:navigation:last_path", b"token".to_vec()).unwrap(),
            b"token".to_vec()
        );
    }

    #[tokio::test]
    async fn test_unreadable_auth_stays_under_legacy_key() {
        let gw = InMemoryGateway::with_entries([("LIVE_MODE_AUTH_DATA", b"token".to_vec())]);
        let report = run_migration(&gw, &StorageKeyRegistry::new()).await;

        assert!(report.migrated.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].key, "LIVE_MODE_AUTH_DATA");
        assert!(gw.get("app:auth:data").await.unwrap().is_none());
        assert!(gw.get("LIVE_MODE_AUTH_DATA").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_current_data_wins() {
        let gw = InMemoryGateway::with_entries([
            ("LAST_SCREEN_PATH", b"/old".to_vec()),
            ("app:navigation:last_path", b"/new".to_vec()),
        ]);
        let report = run_migration(&gw, &StorageKeyRegistry::new()).await;

        assert!(report.migrated.is_empty());
        assert_eq!(report.superseded, vec!["LAST_SCREEN_PATH".to_string()]);
        assert_eq!(
            gw.get("app:navigation:last_path").await.unwrap(),
            Some(b"/new".to_vec())
        );
        assert_eq!(gw.write_count(), 0);
    }

    #[tokio::test]
    async fn test_retired_keys_left_alone() {
        let gw = InMemoryGateway::with_entries([("DEBUG_FORCE_DEMO_MODE", b"true".to_vec())]);
        let report = run_migration(&gw, &StorageKeyRegistry::new()).await;

        assert!(report.is_noop());
        assert_eq!(report.retired_present, vec!["DEBUG_FORCE_DEMO_MODE".to_string()]);
        assert!(gw.get("DEBUG_FORCE_DEMO_MODE").await.unwrap().is_some());
    }
}
