//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `modegate_core::api` instead of reaching into internal modules.

pub use crate::bootstrap::{AutoSession, BootstrapOutcome};
pub use crate::config::{
    load_default, load_from_path, AppConfig, BootstrapConfig, BuildConfig, LoggingConfig,
    StorageConfig, StorageProvider, StoreConfig, WritePolicy,
};
pub use crate::error::{ConfigurationError, ErrorKind, StorageError, StoreError};
pub use crate::events::{Event, EventBus, EventKind, PublishReport, Subscription};
pub use crate::state::{ModeState, ModeStore};
pub use crate::status::{
    is_valid_app_mode, AppMode, CoarseStatus, UnauthReason, UserId, UserProfile, UserStatus,
};
pub use crate::storage::{
    run_migration, InMemoryGateway, LogicalKey, MigrationReport, PersistenceGateway,
    StorageKeyRegistry,
};
