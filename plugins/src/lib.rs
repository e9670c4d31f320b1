pub mod factory;
pub mod storage;

pub use factory::build_gateway;
pub use storage::FileGateway;
