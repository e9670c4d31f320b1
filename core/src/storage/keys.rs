//! Logical → physical storage key mapping, plus the one-hop table from the
//! legacy (bare, unnamespaced) key generation to the current one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigurationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogicalKey {
    AuthData,
    DemoSession,
    LiveSession,
    UserSettings,
    UserPreferences,
    UserProfileCache,
    AppSettings,
    LastNavigationPath,
    AppWasClosed,
    HasValidLiveSession,
    ResetDemoSessionOnStart,
    ResetOnAppStart,
    SearchHistory,
}

impl LogicalKey {
    pub const ALL: [LogicalKey; 13] = [
        LogicalKey::AuthData,
        LogicalKey::DemoSession,
        LogicalKey::LiveSession,
        LogicalKey::UserSettings,
        LogicalKey::UserPreferences,
        LogicalKey::UserProfileCache,
        LogicalKey::AppSettings,
        LogicalKey::LastNavigationPath,
        LogicalKey::AppWasClosed,
        LogicalKey::HasValidLiveSession,
        LogicalKey::ResetDemoSessionOnStart,
        LogicalKey::ResetOnAppStart,
        LogicalKey::SearchHistory,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::AuthData => "AUTH_DATA",
            Self::DemoSession => "DEMO_SESSION",
            Self::LiveSession => "LIVE_SESSION",
            Self::UserSettings => "USER_SETTINGS",
            Self::UserPreferences => "USER_PREFERENCES",
            Self::UserProfileCache => "USER_PROFILE_CACHE",
            Self::AppSettings => "APP_SETTINGS",
            Self::LastNavigationPath => "LAST_NAVIGATION_PATH",
            Self::AppWasClosed => "APP_WAS_CLOSED",
            Self::HasValidLiveSession => "HAS_VALID_LIVE_SESSION",
            Self::ResetDemoSessionOnStart => "RESET_DEMO_SESSION_ON_START",
            Self::ResetOnAppStart => "RESET_ON_APP_START",
            Self::SearchHistory => "SEARCH_HISTORY",
        }
    }

    /// Current-generation physical key, `app:<category>:<name>`.
    pub fn physical(self) -> &'static str {
        match self {
            Self::AuthData => "app:auth:data",
            Self::DemoSession => "app:session:demo",
            Self::LiveSession => "app:session:live",
            Self::UserSettings => "app:user:settings",
            Self::UserPreferences => "app:user:preferences",
            Self::UserProfileCache => "app:user:profile_cache",
            Self::AppSettings => "app:app:settings",
            Self::LastNavigationPath => "app:navigation:last_path",
            Self::AppWasClosed => "app:flags:app_was_closed",
            Self::HasValidLiveSession => "app:flags:has_valid_live_session",
            Self::ResetDemoSessionOnStart => "app:flags:reset_demo_session_on_start",
            Self::ResetOnAppStart => "app:flags:reset_on_app_start",
            Self::SearchHistory => "app:search:history",
        }
    }
}

impl fmt::Display for LogicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogicalKey {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogicalKey::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| ConfigurationError::UnknownLogicalKey(s.to_string()))
    }
}

/// Every physical key shipped by the legacy generation.
pub const LEGACY_KEYS: [&str; 6] = [
    "LIVE_MODE_AUTH_DATA",
    "LAST_SCREEN_PATH",
    "DEMO_MODE_AUTH_DATA",
    "USER_DATA",
    "DEBUG_FORCE_DEMO_MODE",
    "DEBUG_FORCE_LIVE_MODE",
];

/// Legacy keys with a successor. Everything else in `LEGACY_KEYS` is retired.
const MIGRATIONS: [(&str, LogicalKey); 2] = [
    ("LIVE_MODE_AUTH_DATA", LogicalKey::AuthData),
    ("LAST_SCREEN_PATH", LogicalKey::LastNavigationPath),
];

/// Static, versioned key table.
#[derive(Debug, Clone, Copy, Default)]
pub struct StorageKeyRegistry;

impl StorageKeyRegistry {
    pub const VERSION: u32 = 2;

    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, key: LogicalKey) -> &'static str {
        key.physical()
    }

    pub fn resolve_name(&self, name: &str) -> Result<&'static str, ConfigurationError> {
        Ok(name.parse::<LogicalKey>()?.physical())
    }

    /// Current key for a legacy key, or `None` when it has no successor.
    pub fn migrate_legacy_key(&self, old: &str) -> Option<&'static str> {
        MIGRATIONS
            .iter()
            .find(|(legacy, _)| *legacy == old)
            .map(|(_, key)| key.physical())
    }

    pub fn migrations(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        MIGRATIONS.iter().map(|(legacy, key)| (*legacy, key.physical()))
    }

    pub fn retired_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        LEGACY_KEYS
            .into_iter()
            .filter(move |k| self.migrate_legacy_key(k).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_resolve_is_stable() {
        let registry = StorageKeyRegistry::new();
        let first = registry.resolve(LogicalKey::AuthData);
        for _ in 0..10 {
            assert_eq!(registry.resolve(LogicalKey::AuthData), first);
        }
        assert_eq!(first, "app:auth:data");
        assert_eq!(registry.resolve_name("AUTH_DATA").unwrap(), first);
    }

    #[test]
    fn test_physical_keys_are_unique_and_namespaced() {
        let keys: HashSet<_> = LogicalKey::ALL.iter().map(|k| k.physical()).collect();
        assert_eq!(keys.len(), LogicalKey::ALL.len());
        for key in keys {
            assert_eq!(key.split(':').count(), 3, "{key}");
            assert!(key.starts_with("app:"));
        }
    }

    #[test]
    fn test_unknown_logical_key() {
        let err = StorageKeyRegistry::new().resolve_name("NOPE").unwrap_err();
        assert_eq!(err, ConfigurationError::UnknownLogicalKey("NOPE".into()));
    }

    #[test]
    fn test_migration_table_is_one_hop() {
        let registry = StorageKeyRegistry::new();
        let current: HashSet<_> = LogicalKey::ALL.iter().map(|k| k.physical()).collect();
        for (legacy, target) in registry.migrations() {
            assert!(LEGACY_KEYS.contains(&legacy));
            assert!(current.contains(target));
            // targets are never themselves migratable
            assert!(registry.migrate_legacy_key(target).is_none());
        }
        assert_eq!(registry.migrations().count(), 2);
    }

    #[test]
    fn test_migrate_legacy_key() {
        let registry = StorageKeyRegistry::new();
        assert_eq!(
            registry.migrate_legacy_key("LIVE_MODE_AUTH_DATA"),
            Some("app:auth:data")
        );
        assert_eq!(
            registry.migrate_legacy_key("LAST_SCREEN_PATH"),
            Some("app:navigation:last_path")
        );
        assert_eq!(registry.migrate_legacy_key("DEBUG_FORCE_DEMO_MODE"), None);
        assert_eq!(registry.migrate_legacy_key("app:auth:data"), None);
        assert_eq!(registry.retired_keys().count(), 4);
    }
}
