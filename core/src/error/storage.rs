use thiserror::Error;

/// Failures of the object uploader.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to upload '{key}': {source:#}")]
    Upload {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to delete '{key}': {source:#}")]
    Delete {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid upload folder '{folder}': '.' and '..' segments are not allowed")]
    InvalidFolder { folder: String },

    #[error("invalid object url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}
