use anyhow::Result;
use async_trait::async_trait;
use recharge_core::api::{chunked_body, ObjectStore, ProgressCallback, PutRequest, UploadProgress};

use super::http_client::{ObjectAuth, ObjectHttpClient, ObjectUpload};
use super::sigv4;

/// Bytes handed to the transport between progress reports.
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

pub struct HttpObjectStore {
    client: ObjectHttpClient,
    public_base_path: String,
}

impl HttpObjectStore {
    pub fn new(
        endpoint: String,
        bucket: String,
        public_base_url: String,
        auth: ObjectAuth,
        timeout_ms: u64,
    ) -> Result<Self> {
        let client = ObjectHttpClient::new(endpoint, bucket, public_base_url, auth, timeout_ms)?;
        let public_base_path = url::Url::parse(client.public_base_url())
            .map_err(|e| anyhow::anyhow!("invalid public base url: {e}"))?
            .path()
            .to_string();
        Ok(Self {
            client,
            public_base_path,
        })
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    fn name(&self) -> &str {
        "s3_http"
    }

    fn public_base_path(&self) -> &str {
        &self.public_base_path
    }

    async fn put(&self, request: PutRequest, progress: Option<ProgressCallback>) -> Result<String> {
        let total = request.body.len() as u64;
        let payload_sha256 = sigv4::payload_hash(&request.body);
        let body = match progress {
            Some(cb) => reqwest::Body::wrap_stream(chunked_body(
                request.body,
                UPLOAD_CHUNK_SIZE,
                move |loaded| cb(UploadProgress::new(loaded, total)),
            )),
            None => reqwest::Body::from(request.body),
        };
        self.client
            .put_object(
                &request.key,
                ObjectUpload {
                    body,
                    content_length: total,
                    content_type: &request.content_type,
                    public_read: request.public_read,
                    payload_sha256,
                },
            )
            .await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.client.delete_object(key).await
    }
}
