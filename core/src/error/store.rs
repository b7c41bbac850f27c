use thiserror::Error;

/// Failures of the collection sync store.
///
/// `Validation`, `Index` and `NotReady` are detected locally and never reach
/// the document store. `Fetch` and `Write` carry the transport or decode error
/// as their source.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("please fill in all required fields (missing: {})", .missing.join(", "))]
    Validation { missing: Vec<&'static str> },

    #[error("index {index} is out of bounds for a collection of {len} item(s)")]
    Index { index: usize, len: usize },

    #[error("collection is not loaded")]
    NotReady,

    #[error("failed to fetch document '{document}': {source:#}")]
    Fetch {
        document: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to write document '{document}': {source:#}")]
    Write {
        document: String,
        #[source]
        source: anyhow::Error,
    },
}

impl StoreError {
    /// True for errors raised before any remote call was attempted.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            StoreError::Validation { .. } | StoreError::Index { .. } | StoreError::NotReady
        )
    }
}

/// The stored document could not be turned into a collection.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("expected an array or an object, found {found}")]
    UnexpectedShape { found: &'static str },

    #[error("invalid record at '{position}': {source}")]
    Record {
        position: String,
        #[source]
        source: serde_json::Error,
    },
}
