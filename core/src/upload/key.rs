//! Storage key generation and recovery.

use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::StorageError;

/// Replace every character outside `[A-Za-z0-9.-]` with `_`.
pub fn sanitize_file_name(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `{folder}/{timestamp_ms}-{sanitized file name}`.
///
/// Leading and trailing `/` on the folder are dropped; an empty folder puts
/// the object at the bucket root. `.` and `..` segments would be resolved away
/// by URL normalization, so such folders are rejected.
pub fn storage_key(
    folder: &str,
    timestamp_ms: i64,
    file_name: &str,
) -> Result<String, StorageError> {
    let folder = folder.trim_matches('/');
    if folder.split('/').any(is_dot_segment) {
        return Err(StorageError::InvalidFolder {
            folder: folder.to_string(),
        });
    }
    let name = format!("{}-{}", timestamp_ms, sanitize_file_name(file_name));
    if folder.is_empty() {
        Ok(name)
    } else {
        Ok(format!("{}/{}", folder, name))
    }
}

pub fn is_dot_segment(segment: &str) -> bool {
    segment == "." || segment == ".."
}

/// Recover the storage key from an object URL: the percent-decoded path with
/// its single leading `/` removed.
pub fn key_from_url(object_url: &str) -> Result<String, StorageError> {
    key_from_url_under(object_url, "")
}

/// Like [`key_from_url`], for public URLs served below a path prefix
/// (e.g. path-style `https://host/{bucket}/{key}`). The prefix is removed
/// when present.
pub fn key_from_url_under(object_url: &str, base_path: &str) -> Result<String, StorageError> {
    let invalid = |reason: String| StorageError::InvalidUrl {
        url: object_url.to_string(),
        reason,
    };

    let parsed = Url::parse(object_url).map_err(|e| invalid(e.to_string()))?;
    let path = parsed.path();
    let mut raw = path.strip_prefix('/').unwrap_or(path);

    let prefix = base_path.trim_matches('/');
    if !prefix.is_empty() {
        if let Some(rest) = raw
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('/'))
        {
            raw = rest;
        }
    }

    let key = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|e| invalid(e.to_string()))?
        .into_owned();

    if key.is_empty() {
        return Err(invalid("url has no object path".to_string()));
    }
    Ok(key)
}
