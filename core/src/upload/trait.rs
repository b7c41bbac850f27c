use async_trait::async_trait;
use bytes::Bytes;

use super::progress::ProgressCallback;

#[derive(Debug, Clone)]
pub struct PutRequest {
    pub key: String,
    pub body: Bytes,
    pub content_type: String,
    pub public_read: bool,
}

/// Object storage addressed by key.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    fn name(&self) -> &str;

    /// Path prefix of the public object URLs, empty when keys sit directly
    /// under the URL root.
    fn public_base_path(&self) -> &str {
        ""
    }

    /// Store the object and return its public location URL.
    ///
    /// `progress` receives cumulative byte counts as the body is sent.
    async fn put(
        &self,
        request: PutRequest,
        progress: Option<ProgressCallback>,
    ) -> anyhow::Result<String>;

    async fn delete(&self, key: &str) -> anyhow::Result<()>;
}
