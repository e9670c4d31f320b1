use serde::{Deserialize, Serialize};

use crate::status::AppMode;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default = "default_logging_file")]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "modegate_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_file() -> bool {
    false
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: default_logging_file(),
            level: default_logging_level(),
            directory: None,
        }
    }
}

/// What happens to the in-memory state when a write-through fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    /// Mutate, issue the write, publish. A failed write is recorded in
    /// `last_error` but the mutation stays.
    #[default]
    Optimistic,
    /// Write first; mutate and publish only once the write succeeded.
    ConfirmFirst,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_mode")]
    pub default_mode: AppMode,

    #[serde(default)]
    pub write_policy: WritePolicy,
}

fn default_mode() -> AppMode {
    AppMode::Development
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_mode: default_mode(),
            write_policy: WritePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default)]
    pub production: bool,

    /// Mode a production build is locked to. Defaults to `live` when unset.
    #[serde(default)]
    pub pinned_mode: Option<AppMode>,
}

impl BuildConfig {
    pub fn production() -> Self {
        Self {
            production: true,
            pinned_mode: None,
        }
    }

    /// `Some(mode)` when mode switching is locked by the build.
    pub fn pinned(&self) -> Option<AppMode> {
        self.production
            .then(|| self.pinned_mode.unwrap_or(AppMode::Live))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageProvider {
    Memory,
    #[default]
    File,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub provider: StorageProvider,

    /// Root directory for the file provider. Filled in by `load_default` when empty.
    #[serde(default)]
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_demo_user_id")]
    pub demo_user_id: String,

    #[serde(default = "default_demo_display_name")]
    pub demo_display_name: String,

    #[serde(default = "default_demo_email")]
    pub demo_email: Option<String>,
}

fn default_demo_user_id() -> String {
    "demo-user".to_string()
}

fn default_demo_display_name() -> String {
    "Demo User".to_string()
}

fn default_demo_email() -> Option<String> {
    Some("demo@example.com".to_string())
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            demo_user_id: default_demo_user_id(),
            demo_display_name: default_demo_display_name(),
            demo_email: default_demo_email(),
        }
    }
}
