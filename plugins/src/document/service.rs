use anyhow::Result;
use async_trait::async_trait;
use recharge_core::api::DocumentStore;
use serde_json::Value;

use super::http_client::RealtimeDbClient;

pub struct RealtimeDocumentStore {
    client: RealtimeDbClient,
}

impl RealtimeDocumentStore {
    pub fn new(base_url: String, auth_token: String, timeout_ms: u64) -> Result<Self> {
        let client = RealtimeDbClient::new(base_url, auth_token, timeout_ms)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentStore for RealtimeDocumentStore {
    fn name(&self) -> &str {
        "realtime_db"
    }

    async fn get(&self, document: &str) -> Result<Option<Value>> {
        let value = self.client.get_document(document).await?;
        Ok((!value.is_null()).then_some(value))
    }

    async fn set(&self, document: &str, value: &Value) -> Result<()> {
        self.client.put_document(document, value).await
    }
}
