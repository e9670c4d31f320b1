mod common;

use std::sync::Arc;

use common::RecordingGateway;
use modegate_core::api::{
    run_migration, AppConfig, CoarseStatus, EventBus, ModeStore, PersistenceGateway,
    StorageKeyRegistry, UserId,
};

#[tokio::test]
async fn migration_pass_is_idempotent() {
    let gateway = RecordingGateway::with_entries(&[
        ("LIVE_MODE_AUTH_DATA", br#"{"user":{"id":"u-7"},"token":"abc"}"#),
        ("LAST_SCREEN_PATH", b"/home"),
        ("DEBUG_FORCE_LIVE_MODE", b"true"),
    ]);
    let registry = StorageKeyRegistry::new();

    let first = run_migration(&gateway, &registry).await;
    let keys_after_first = gateway.keys().await;
    let second = run_migration(&gateway, &registry).await;

    assert_eq!(first.migrated.len(), 2);
    assert!(first.failures.is_empty());
    assert!(second.is_noop());

    assert_eq!(gateway.writes_to("app:auth:data"), 1);
    assert_eq!(gateway.writes_to("app:navigation:last_path"), 1);
    assert_eq!(gateway.removes_of("LIVE_MODE_AUTH_DATA"), 1);
    assert_eq!(gateway.keys().await, keys_after_first);

    assert_eq!(
        gateway.get("app:navigation:last_path").await.unwrap(),
        Some(b"/home".to_vec())
    );
    assert!(gateway.get("LIVE_MODE_AUTH_DATA").await.unwrap().is_none());
    // retired keys have no successor and are left in place
    assert!(gateway.get("DEBUG_FORCE_LIVE_MODE").await.unwrap().is_some());
    assert_eq!(second.retired_present, vec!["DEBUG_FORCE_LIVE_MODE".to_string()]);
}

#[tokio::test]
async fn store_initialization_runs_migration() {
    let gateway = Arc::new(RecordingGateway::with_entries(&[(
        "LAST_SCREEN_PATH",
        b"/settings",
    )]));
    let store = ModeStore::new(&AppConfig::default(), gateway.clone(), EventBus::new());

    let report = store.initialize_store().await.unwrap();
    assert_eq!(
        report.migrated,
        vec![(
            "LAST_SCREEN_PATH".to_string(),
            "app:navigation:last_path".to_string()
        )]
    );

    let again = store.initialize_store().await.unwrap();
    assert!(again.is_noop());
    assert_eq!(gateway.writes_to("app:navigation:last_path"), 1);
}

#[tokio::test]
async fn legacy_login_survives_migration() {
    let gateway = Arc::new(RecordingGateway::with_entries(&[(
        "LIVE_MODE_AUTH_DATA",
        br#"{"user":{"id":"u-314","email":"a@b.c"},"token":"abc","refreshToken":"def"}"#,
    )]));
    let store = ModeStore::new(&AppConfig::default(), gateway.clone(), EventBus::new());

    let report = store.initialize_store().await.unwrap();
    assert_eq!(report.migrated.len(), 1);
    assert_eq!(store.current_user_status(), CoarseStatus::Authenticated);
    assert_eq!(store.user_status().user_id(), Some(&UserId::new("u-314")));

    // a fresh process reads the rewritten blob directly
    let restarted = ModeStore::new(&AppConfig::default(), gateway, EventBus::new());
    assert!(restarted.initialize_store().await.unwrap().is_noop());
    assert_eq!(restarted.current_user_status(), CoarseStatus::Authenticated);
}
