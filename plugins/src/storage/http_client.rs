use reqwest::header::CONTENT_LENGTH;
use reqwest::{Method, RequestBuilder, Url};

use recharge_core::api::is_dot_segment;

use super::sigv4::{self, SigningKeys};
use crate::http::{check_status, encode_path, HttpError};

const ACL_HEADER: &str = "x-amz-acl";

/// How requests to the object endpoint are authorized.
#[derive(Debug, Clone)]
pub enum ObjectAuth {
    Anonymous,
    /// Bearer token for gateways and presigning proxies.
    Bearer(String),
    /// AWS Signature Version 4.
    SigV4(SigningKeys),
}

/// Body and metadata of a single PUT.
pub struct ObjectUpload<'a> {
    pub body: reqwest::Body,
    pub content_length: u64,
    pub content_type: &'a str,
    pub public_read: bool,
    /// Hex SHA-256 of the body, sent as `x-amz-content-sha256`.
    pub payload_sha256: String,
}

/// Path-style client for an S3-compatible endpoint:
/// objects live at `{endpoint}/{bucket}/{key}`.
#[derive(Clone)]
pub struct ObjectHttpClient {
    auth: ObjectAuth,
    http: reqwest::Client,
    bucket_url: String,
    public_base_url: String,
}

impl ObjectHttpClient {
    pub fn new(
        endpoint: String,
        bucket: String,
        public_base_url: String,
        auth: ObjectAuth,
        timeout_ms: u64,
    ) -> anyhow::Result<Self> {
        if endpoint.trim().is_empty() || bucket.trim().is_empty() {
            anyhow::bail!("object storage endpoint and bucket must be configured");
        }
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            auth,
            http,
            bucket_url: format!(
                "{}/{}",
                normalize_base_url(&endpoint)?,
                encode_path(bucket.trim_matches('/'))
            ),
            public_base_url: normalize_base_url(&public_base_url)?,
        })
    }

    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.bucket_url, encode_path(key))
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, encode_path(key))
    }

    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }

    /// Parsed request URL for `key`. Dot segments are refused: URL
    /// normalization would resolve them to an object outside the bucket.
    fn request_url(&self, key: &str) -> anyhow::Result<Url> {
        if key.split('/').any(is_dot_segment) {
            anyhow::bail!("object key '{key}' contains '.' or '..' segments");
        }
        Ok(Url::parse(&self.object_url(key))?)
    }

    fn authorize(
        &self,
        req: RequestBuilder,
        method: &Method,
        url: &Url,
        signed_headers: &[(&str, &str)],
        payload_sha256: &str,
    ) -> anyhow::Result<RequestBuilder> {
        match &self.auth {
            ObjectAuth::Anonymous => Ok(req),
            ObjectAuth::Bearer(token) => Ok(req.bearer_auth(token)),
            ObjectAuth::SigV4(keys) => {
                let headers = sigv4::sign(
                    keys,
                    method.as_str(),
                    url,
                    signed_headers,
                    payload_sha256,
                    chrono::Utc::now(),
                )?;
                Ok(headers
                    .into_iter()
                    .fold(req, |req, (name, value)| req.header(name, value)))
            }
        }
    }

    /// Upload an object and return its public URL.
    pub async fn put_object(&self, key: &str, upload: ObjectUpload<'_>) -> anyhow::Result<String> {
        let url = self.request_url(key)?;
        tracing::debug!(
            target: "recharge.upload",
            stage = "object.http.put.in",
            url = %url,
            content_type = %upload.content_type,
            content_length = upload.content_length,
            public_read = upload.public_read
        );

        let mut signed = vec![("content-type", upload.content_type)];
        if upload.public_read {
            signed.push((ACL_HEADER, "public-read"));
        }
        let req = signed.iter().fold(
            self.http
                .put(url.clone())
                .header(CONTENT_LENGTH, upload.content_length),
            |req, (name, value)| req.header(*name, *value),
        );
        let req = self
            .authorize(req, &Method::PUT, &url, &signed, &upload.payload_sha256)?
            .body(upload.body);

        let resp = req
            .send()
            .await
            .map_err(|err| HttpError::transport(err, &url))?;
        let status = resp.status();
        check_status(resp).await?;
        tracing::debug!(
            target: "recharge.upload",
            stage = "object.http.put.out",
            status = %status
        );
        Ok(self.public_url(key))
    }

    pub async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
        let url = self.request_url(key)?;
        tracing::debug!(
            target: "recharge.upload",
            stage = "object.http.delete.in",
            url = %url
        );
        let req = self.authorize(
            self.http.delete(url.clone()),
            &Method::DELETE,
            &url,
            &[],
            &sigv4::payload_hash(b""),
        )?;
        let resp = req
            .send()
            .await
            .map_err(|err| HttpError::transport(err, &url))?;
        let status = resp.status();
        check_status(resp).await?;
        tracing::debug!(
            target: "recharge.upload",
            stage = "object.http.delete.out",
            status = %status
        );
        Ok(())
    }
}

/// Scheme and host plus the non-empty path segments, without a trailing `/`.
fn normalize_base_url(raw: &str) -> anyhow::Result<String> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| anyhow::anyhow!("invalid base url '{}': {e}", raw.trim()))?;
    let path = url
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url.as_str().trim_end_matches('/').to_string())
}
