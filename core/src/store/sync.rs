use std::sync::Arc;

use tokio::sync::watch;

use super::r#trait::DocumentStore;
use super::state::{LoadState, StoreSnapshot};
use crate::error::StoreError;
use crate::item::{decode_collection, Collection, Item};
use crate::notify::{Notifier, TracingNotifier};

pub const DEFAULT_DOCUMENT: &str = "Recharge";

const MSG_UPDATED: &str = "Recharge items updated successfully!";

/// Local mirror of one remote document holding the recharge collection.
///
/// Every mutation rewrites the whole document and only then replaces the
/// mirror, so the mirror never runs ahead of a confirmed write. There is no
/// versioning: two editors writing concurrently will lose one of the updates.
pub struct CollectionSyncStore {
    backend: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
    document: String,
    state: LoadState,
    items: Collection,
    snapshot_tx: watch::Sender<StoreSnapshot>,
}

impl CollectionSyncStore {
    pub fn new(backend: Arc<dyn DocumentStore>, document: impl Into<String>) -> Self {
        let (snapshot_tx, _) = watch::channel(StoreSnapshot::loading());
        Self {
            backend,
            notifier: Arc::new(TracingNotifier),
            document: document.into(),
            state: LoadState::Loading,
            items: Vec::new(),
            snapshot_tx,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// The mirrored collection, or `None` while loading or after a failed load.
    pub fn items(&self) -> Option<&[Item]> {
        self.state.is_ready().then_some(self.items.as_slice())
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Load the document into the mirror. An absent document is an empty
    /// collection; transport and decode failures put the store in `Error`.
    pub async fn fetch(&mut self) -> Result<&[Item], StoreError> {
        self.transition(LoadState::Loading);
        tracing::debug!(
            target: "recharge.store",
            stage = "store.fetch.in",
            backend = self.backend.name(),
            document = %self.document
        );

        let loaded = match self.backend.get(&self.document).await {
            Ok(None) => Ok(Vec::new()),
            Ok(Some(value)) => decode_collection(value).map_err(anyhow::Error::new),
            Err(err) => Err(err),
        };

        match loaded {
            Ok(items) => {
                tracing::debug!(
                    target: "recharge.store",
                    stage = "store.fetch.out",
                    items = items.len()
                );
                self.items = items;
                self.transition(LoadState::Ready);
                Ok(&self.items)
            }
            Err(source) => {
                self.notifier
                    .error(&format!("Failed to fetch recharge items: {source:#}"));
                let err = StoreError::Fetch {
                    document: self.document.clone(),
                    source,
                };
                tracing::warn!(target: "recharge.store", stage = "store.fetch.error", error = %err);
                self.items.clear();
                self.transition(LoadState::Error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Overwrite the remote document with `items`, then mirror it.
    ///
    /// On failure the mirror keeps its previous value.
    pub async fn replace_all(&mut self, items: Collection) -> Result<(), StoreError> {
        self.ensure_ready()?;
        tracing::debug!(
            target: "recharge.store",
            stage = "store.replace_all.in",
            document = %self.document,
            items = items.len()
        );

        let write = match serde_json::to_value(&items) {
            Ok(value) => self.backend.set(&self.document, &value).await,
            Err(err) => Err(anyhow::Error::new(err)),
        };

        if let Err(source) = write {
            self.notifier
                .error(&format!("Failed to update recharge items: {source:#}"));
            let err = StoreError::Write {
                document: self.document.clone(),
                source,
            };
            tracing::warn!(target: "recharge.store", stage = "store.replace_all.error", error = %err);
            return Err(err);
        }

        self.items = items;
        self.publish();
        tracing::debug!(target: "recharge.store", stage = "store.replace_all.out");
        self.notifier.success(MSG_UPDATED);
        Ok(())
    }

    pub async fn add(&mut self, item: Item) -> Result<(), StoreError> {
        self.ensure_ready()?;
        self.check(item.validate())?;

        let mut next = self.items.clone();
        next.push(item);
        self.replace_all(next).await
    }

    pub async fn update(&mut self, index: usize, item: Item) -> Result<(), StoreError> {
        self.ensure_ready()?;
        self.check(self.check_index(index))?;
        self.check(item.validate())?;

        let mut next = self.items.clone();
        next[index] = item;
        self.replace_all(next).await
    }

    pub async fn remove(&mut self, index: usize) -> Result<(), StoreError> {
        self.ensure_ready()?;
        self.check(self.check_index(index))?;

        let mut next = self.items.clone();
        next.remove(index);
        self.replace_all(next).await
    }

    fn ensure_ready(&self) -> Result<(), StoreError> {
        self.check(if self.state.is_ready() {
            Ok(())
        } else {
            Err(StoreError::NotReady)
        })
    }

    fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(StoreError::Index {
                index,
                len: self.items.len(),
            })
        }
    }

    /// Surface a locally detected error to the user before returning it.
    fn check(&self, result: Result<(), StoreError>) -> Result<(), StoreError> {
        if let Err(err) = &result {
            match err {
                StoreError::Validation { .. } => {
                    self.notifier.error("Please fill in all required fields")
                }
                other => self.notifier.error(&other.to_string()),
            }
        }
        result
    }

    fn transition(&mut self, state: LoadState) {
        self.state = state;
        self.publish();
    }

    fn publish(&self) {
        let items = if self.state.is_ready() {
            self.items.clone()
        } else {
            Vec::new()
        };
        self.snapshot_tx.send_replace(StoreSnapshot {
            state: self.state.clone(),
            items,
        });
    }
}
