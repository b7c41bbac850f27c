pub mod state;
pub mod sync;
pub mod r#trait;

pub use r#trait::DocumentStore;
pub use state::{LoadState, StoreSnapshot};
pub use sync::{CollectionSyncStore, DEFAULT_DOCUMENT};
