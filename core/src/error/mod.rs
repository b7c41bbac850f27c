#[allow(clippy::module_inception)]
pub mod error;
pub mod storage;
pub mod store;

pub use error::CliError;
pub use storage::StorageError;
pub use store::{DecodeError, StoreError};
