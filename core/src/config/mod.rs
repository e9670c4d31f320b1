pub mod load;
pub mod types;

pub use load::{get_modegate_data_dir, load_default, load_from_path};
pub use types::{
    AppConfig, BootstrapConfig, BuildConfig, LoggingConfig, StorageConfig, StorageProvider,
    StoreConfig, WritePolicy,
};
