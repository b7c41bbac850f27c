//! AWS Signature Version 4 header signing for S3 requests.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use percent_encoding::utf8_percent_encode;
use sha2::{Digest, Sha256};

use crate::http::PATH_SEGMENT;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";
const DEFAULT_REGION: &str = "us-east-1";

pub const CONTENT_SHA256_HEADER: &str = "x-amz-content-sha256";
pub const DATE_HEADER: &str = "x-amz-date";

#[derive(Clone)]
pub struct SigningKeys {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
}

impl SigningKeys {
    pub fn new(access_key_id: String, secret_access_key: String, region: String) -> Self {
        let region = match region.trim() {
            "" => DEFAULT_REGION.to_string(),
            r => r.to_string(),
        };
        Self {
            access_key_id: access_key_id.trim().to_string(),
            secret_access_key: secret_access_key.trim().to_string(),
            region,
        }
    }
}

impl fmt::Debug for SigningKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKeys")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("region", &self.region)
            .finish()
    }
}

/// Lowercase hex SHA-256 of a request body.
pub fn payload_hash(body: &[u8]) -> String {
    hex::encode(Sha256::digest(body))
}

/// Headers that authorize a request: `x-amz-date`, `x-amz-content-sha256`
/// and `authorization`.
///
/// `headers` are the extra headers to sign (e.g. `content-type`, `x-amz-acl`);
/// they must be sent unchanged. `host` is taken from `url`.
pub fn sign(
    keys: &SigningKeys,
    method: &str,
    url: &reqwest::Url,
    headers: &[(&str, &str)],
    payload_sha256: &str,
    now: DateTime<Utc>,
) -> anyhow::Result<Vec<(&'static str, String)>> {
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date = now.format("%Y%m%d").to_string();

    let host = match (url.host_str(), url.port()) {
        (Some(h), Some(port)) => format!("{h}:{port}"),
        (Some(h), None) => h.to_string(),
        (None, _) => anyhow::bail!("cannot sign a request without a host: {url}"),
    };

    let mut canonical: BTreeMap<String, String> = headers
        .iter()
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();
    canonical.insert("host".to_string(), host);
    canonical.insert(CONTENT_SHA256_HEADER.to_string(), payload_sha256.to_string());
    canonical.insert(DATE_HEADER.to_string(), amz_date.clone());

    let signed_headers = canonical.keys().cloned().collect::<Vec<_>>().join(";");
    let canonical_headers: String = canonical
        .iter()
        .map(|(k, v)| format!("{k}:{v}\n"))
        .collect();

    let path = match url.path() {
        "" => "/",
        p => p,
    };
    let canonical_request = format!(
        "{method}\n{path}\n{query}\n{canonical_headers}\n{signed_headers}\n{payload_sha256}",
        query = canonical_query(url),
    );

    let scope = format!("{date}/{}/{SERVICE}/aws4_request", keys.region);
    let string_to_sign = format!(
        "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
        hex::encode(Sha256::digest(canonical_request.as_bytes()))
    );

    let k_date = hmac(
        format!("AWS4{}", keys.secret_access_key).as_bytes(),
        date.as_bytes(),
    )?;
    let k_region = hmac(&k_date, keys.region.as_bytes())?;
    let k_service = hmac(&k_region, SERVICE.as_bytes())?;
    let k_signing = hmac(&k_service, b"aws4_request")?;
    let signature = hex::encode(hmac(&k_signing, string_to_sign.as_bytes())?);

    let authorization = format!(
        "{ALGORITHM} Credential={}/{scope},SignedHeaders={signed_headers},Signature={signature}",
        keys.access_key_id
    );

    Ok(vec![
        (DATE_HEADER, amz_date),
        (CONTENT_SHA256_HEADER, payload_sha256.to_string()),
        ("authorization", authorization),
    ])
}

fn canonical_query(url: &reqwest::Url) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            (
                utf8_percent_encode(&k, PATH_SEGMENT).to_string(),
                utf8_percent_encode(&v, PATH_SEGMENT).to_string(),
            )
        })
        .collect();
    pairs.sort();
    pairs
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn hmac(key: &[u8], data: &[u8]) -> anyhow::Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|_| anyhow::anyhow!("invalid HMAC key length"))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}
