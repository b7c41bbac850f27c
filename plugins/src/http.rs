//! Response handling shared by the document and object storage clients.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;
use thiserror::Error;

const BODY_PREVIEW_CHARS: usize = 512;

/// RFC 3986 unreserved characters stay as they are; everything else is escaped.
pub(crate) const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Timeout,
    Connect,
    Other,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Other => "transport",
        })
    }
}

/// URLs in these errors never carry a query string, so auth tokens passed
/// as query parameters stay out of logs.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request to {url} failed ({kind})")]
    Transport {
        kind: TransportKind,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with status {status}: {body}")]
    Status { status: u16, url: String, body: String },

    #[error("{url} returned malformed JSON: {body}")]
    Json {
        url: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

impl HttpError {
    pub(crate) fn transport(err: reqwest::Error, url: &reqwest::Url) -> Self {
        let err = err.without_url();
        let kind = if err.is_timeout() {
            TransportKind::Timeout
        } else if err.is_connect() {
            TransportKind::Connect
        } else {
            TransportKind::Other
        };
        HttpError::Transport {
            kind,
            url: redact_query(url),
            source: err,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Percent-encode each `/`-separated segment of a key or document path.
pub(crate) fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

pub(crate) fn redact_query(url: &reqwest::Url) -> String {
    let mut shown = url.clone();
    shown.set_query(None);
    shown.to_string()
}

fn preview(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    let mut out: String = trimmed.chars().take(BODY_PREVIEW_CHARS).collect();
    if trimmed.chars().nth(BODY_PREVIEW_CHARS).is_some() {
        out.push_str("...");
    }
    out
}

/// Decode a JSON response body. An empty body reads as `null`.
pub(crate) async fn read_json(resp: reqwest::Response) -> Result<Value, HttpError> {
    let status = resp.status();
    let url = resp.url().clone();
    let body = resp
        .text()
        .await
        .map_err(|err| HttpError::transport(err, &url))?;

    if !status.is_success() {
        return Err(HttpError::Status {
            status: status.as_u16(),
            url: redact_query(&url),
            body: preview(&body),
        });
    }
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).map_err(|source| HttpError::Json {
        url: redact_query(&url),
        body: preview(&body),
        source,
    })
}

/// Fail on a non-2xx response, keeping a preview of the error body.
pub(crate) async fn check_status(resp: reqwest::Response) -> Result<(), HttpError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let url = resp.url().clone();
    let body = resp
        .text()
        .await
        .map_err(|err| HttpError::transport(err, &url))?;
    Err(HttpError::Status {
        status: status.as_u16(),
        url: redact_query(&url),
        body: preview(&body),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_of_blank_body() {
        assert_eq!(preview("  \n "), "<empty body>");
    }

    #[test]
    fn test_preview_truncates_long_bodies() {
        let body = "é".repeat(BODY_PREVIEW_CHARS + 1);
        let shown = preview(&body);
        assert!(shown.ends_with("..."));
        assert_eq!(shown.chars().count(), BODY_PREVIEW_CHARS + 3);
        assert_eq!(preview(&"a".repeat(BODY_PREVIEW_CHARS)).len(), BODY_PREVIEW_CHARS);
    }

    #[test]
    fn test_status_error_display() {
        let err = HttpError::Status {
            status: 403,
            url: "https://demo.firebaseio.com/Recharge.json".into(),
            body: "Permission denied".into(),
        };
        assert_eq!(err.status(), Some(403));
        assert_eq!(
            err.to_string(),
            "https://demo.firebaseio.com/Recharge.json responded with status 403: Permission denied"
        );
    }

    #[test]
    fn test_encode_path_keeps_separators() {
        assert_eq!(encode_path("uploads/1-a.png"), "uploads/1-a.png");
        assert_eq!(encode_path("my folder/1-a b.png"), "my%20folder/1-a%20b.png");
        assert_eq!(encode_path("a+b/c=d"), "a%2Bb/c%3Dd");
    }

    #[test]
    fn test_redact_query_drops_auth() {
        let url = reqwest::Url::parse("https://demo.firebaseio.com/Recharge.json?auth=secret")
            .unwrap();
        assert_eq!(redact_query(&url), "https://demo.firebaseio.com/Recharge.json");
    }
}
