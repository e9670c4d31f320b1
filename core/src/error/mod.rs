#[allow(clippy::module_inception)]
pub mod error;
pub mod kind;

pub use error::{ConfigurationError, StorageError, StoreError};
pub use kind::ErrorKind;
