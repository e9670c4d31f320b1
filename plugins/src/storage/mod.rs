pub mod file;

pub use file::FileGateway;
