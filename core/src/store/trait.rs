use async_trait::async_trait;
use serde_json::Value;

/// A remote store addressing whole JSON documents by name.
///
/// `set` replaces the entire value; there is no partial update.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn name(&self) -> &str;

    /// `Ok(None)` when the document does not exist.
    async fn get(&self, document: &str) -> anyhow::Result<Option<Value>>;

    async fn set(&self, document: &str, value: &Value) -> anyhow::Result<()>;
}
