//! Storage key naming and the persistence seam.

pub mod gateway;
pub mod keys;
pub mod memory;
pub mod migrate;

pub use gateway::PersistenceGateway;
pub use keys::{LogicalKey, StorageKeyRegistry, LEGACY_KEYS};
pub use memory::InMemoryGateway;
pub use migrate::{run_migration, MigrationFailure, MigrationReport};
