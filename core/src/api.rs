//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `recharge_core::api` instead of reaching into internal modules.

pub use crate::config::{load_default, AppConfig, LoggingConfig, StorageConfig, StoreConfig};
pub use crate::error::{CliError, DecodeError, StorageError, StoreError};
pub use crate::item::{decode_collection, Collection, Item};
pub use crate::notify::{Notifier, TracingNotifier};
pub use crate::store::{
    CollectionSyncStore, DocumentStore, LoadState, StoreSnapshot, DEFAULT_DOCUMENT,
};
pub use crate::upload::{
    chunked_body, file_extension, format_file_size, is_dot_segment, is_image_file, is_video_file,
    key_from_url, ObjectStore, ObjectUploader, ProgressCallback, PutRequest, UploadFile, UploadProgress,
    DEFAULT_FOLDER,
};
