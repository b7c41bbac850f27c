use serde::Serialize;

use crate::item::Collection;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum LoadState {
    Loading,
    Ready,
    Error(String),
}

impl LoadState {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready)
    }
}

/// What observers see after every state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreSnapshot {
    pub state: LoadState,
    pub items: Collection,
}

impl StoreSnapshot {
    pub fn loading() -> Self {
        Self {
            state: LoadState::Loading,
            items: Vec::new(),
        }
    }
}
