use serde_json::Value;

use crate::http::{check_status, encode_path, read_json, HttpError};

/// Client for the realtime database REST dialect: every document path is
/// reachable at `{base_url}/{path}.json`.
#[derive(Clone)]
pub struct RealtimeDbClient {
    auth_token: String,
    http: reqwest::Client,
    base_url: String,
}

impl RealtimeDbClient {
    pub fn new(base_url: String, auth_token: String, timeout_ms: u64) -> anyhow::Result<Self> {
        if base_url.trim().is_empty() {
            anyhow::bail!("document store base_url is not configured");
        }
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            auth_token,
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn document_url(&self, document: &str) -> String {
        format!(
            "{}/{}.json",
            self.base_url,
            encode_path(document.trim_matches('/'))
        )
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.auth_token.trim().is_empty() {
            req
        } else {
            req.query(&[("auth", self.auth_token.as_str())])
        }
    }

    /// Returns `Value::Null` for a document that does not exist.
    pub async fn get_document(&self, document: &str) -> anyhow::Result<Value> {
        let url = reqwest::Url::parse(&self.document_url(document))?;
        tracing::debug!(
            target: "recharge.store",
            stage = "document.http.get.in",
            url = %url
        );
        let resp = self
            .auth(self.http.get(url.clone()))
            .send()
            .await
            .map_err(|err| HttpError::transport(err, &url))?;
        let status = resp.status();
        let v = read_json(resp).await?;
        tracing::debug!(
            target: "recharge.store",
            stage = "document.http.get.out",
            status = %status,
            exists = !v.is_null()
        );
        Ok(v)
    }

    /// Replace the whole document with `value`.
    pub async fn put_document(&self, document: &str, value: &Value) -> anyhow::Result<()> {
        let url = reqwest::Url::parse(&self.document_url(document))?;
        tracing::debug!(
            target: "recharge.store",
            stage = "document.http.put.in",
            url = %url
        );
        let resp = self
            .auth(self.http.put(url.clone()).json(value))
            .send()
            .await
            .map_err(|err| HttpError::transport(err, &url))?;
        let status = resp.status();
        check_status(resp).await?;
        tracing::debug!(
            target: "recharge.store",
            stage = "document.http.put.out",
            status = %status
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[test]
    fn test_requires_base_url() {
        assert!(RealtimeDbClient::new("  ".to_string(), String::new(), 1_000).is_err());
    }

    #[test]
    fn test_document_url_encodes_segments() {
        let client =
            RealtimeDbClient::new("https://demo.firebaseio.com/".to_string(), String::new(), 1_000)
                .unwrap();
        assert_eq!(
            client.document_url("Recharge"),
            "https://demo.firebaseio.com/Recharge.json"
        );
        assert_eq!(
            client.document_url("/admin/pay options"),
            "https://demo.firebaseio.com/admin/pay%20options.json"
        );
    }

    #[tokio::test]
    async fn test_get_document_returns_json() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/Recharge.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"name":"PayFast","click":"https://payfast.example","images":""}]"#)
            .create_async()
            .await;

        let client = RealtimeDbClient::new(server.url(), String::new(), 1_000).unwrap();
        let value = client.get_document("Recharge").await.unwrap();
        assert_eq!(value[0]["name"], "PayFast");
    }

    #[tokio::test]
    async fn test_get_missing_document_is_null() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/Recharge.json")
            .with_status(200)
            .with_body("null")
            .create_async()
            .await;

        let client = RealtimeDbClient::new(server.url(), String::new(), 1_000).unwrap();
        assert!(client.get_document("Recharge").await.unwrap().is_null());
    }

    #[tokio::test]
    async fn test_put_document_sends_whole_value_with_auth() {
        let mut server = Server::new_async().await;
        let body = json!([{"name": "A", "click": "https://a.example", "images": ""}]);
        let m = server
            .mock("PUT", "/Recharge.json")
            .match_query(Matcher::UrlEncoded("auth".into(), "secret".into()))
            .match_body(Matcher::Json(body.clone()))
            .with_status(200)
            .with_body(body.to_string())
            .create_async()
            .await;

        let client = RealtimeDbClient::new(server.url(), "secret".to_string(), 1_000).unwrap();
        client.put_document("Recharge", &body).await.unwrap();
        m.assert_async().await;
    }

    #[test]
    fn test_auth_query_absent_when_token_empty() {
        let client =
            RealtimeDbClient::new("https://demo.firebaseio.com".to_string(), String::new(), 1_000)
                .unwrap();
        let req = client
            .auth(client.http.get(client.document_url("Recharge")))
            .build()
            .unwrap();
        assert_eq!(req.url().query(), None);
    }

    #[tokio::test]
    async fn test_put_status_error_is_classified() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("PUT", "/Recharge.json")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"error":"Permission denied"}"#)
            .create_async()
            .await;

        let client = RealtimeDbClient::new(server.url(), "secret".to_string(), 1_000).unwrap();
        let err = client
            .put_document("Recharge", &json!([]))
            .await
            .unwrap_err();
        let http_err = err
            .downcast_ref::<HttpError>()
            .expect("expected HttpError");
        match http_err {
            HttpError::Status { status, url, body } => {
                assert_eq!(*status, 401);
                assert!(url.ends_with("/Recharge.json"));
                assert!(!url.contains("secret"));
                assert!(body.contains("Permission denied"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!format!("{err:#}").contains("secret"));
    }

    #[tokio::test]
    async fn test_get_decode_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/Recharge.json")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = RealtimeDbClient::new(server.url(), String::new(), 1_000).unwrap();
        let err = client.get_document("Recharge").await.unwrap_err();
        let http_err = err
            .downcast_ref::<HttpError>()
            .expect("expected HttpError");
        assert!(matches!(http_err, HttpError::Json { body, .. } if body.contains("maintenance")));
    }
}
