use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;

use super::key::{key_from_url_under, storage_key};
use super::progress::{ProgressCallback, ProgressTracker};
use super::r#trait::{ObjectStore, PutRequest};
use crate::error::StorageError;

pub const DEFAULT_FOLDER: &str = "uploads";

/// A file ready to be uploaded.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a local file, guessing its MIME type from the extension.
    pub async fn from_path(path: &Path) -> anyhow::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow::anyhow!("path has no file name: {}", path.display()))?;
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();
        Ok(Self::new(file_name, content_type, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Uploads files under generated keys and deletes them again by URL.
#[derive(Clone)]
pub struct ObjectUploader {
    store: Arc<dyn ObjectStore>,
}

impl ObjectUploader {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Upload `file` as a public object under `folder` and return its URL.
    pub async fn upload(
        &self,
        file: UploadFile,
        folder: Option<&str>,
        on_progress: Option<ProgressCallback>,
    ) -> Result<String, StorageError> {
        let folder = folder.unwrap_or(DEFAULT_FOLDER);
        let key = storage_key(folder, chrono::Utc::now().timestamp_millis(), &file.file_name)?;
        let size = file.size();
        tracing::debug!(
            target: "recharge.upload",
            stage = "upload.put.in",
            backend = self.store.name(),
            key = %key,
            content_type = %file.content_type,
            size = size
        );

        let tracker = on_progress.map(|cb| ProgressTracker::new(cb, size));
        let request = PutRequest {
            key: key.clone(),
            body: file.bytes,
            content_type: file.content_type,
            public_read: true,
        };

        let location = self
            .store
            .put(request, tracker.as_ref().map(ProgressTracker::as_callback))
            .await
            .map_err(|source| StorageError::Upload {
                key: key.clone(),
                source,
            })?;

        if let Some(tracker) = &tracker {
            tracker.finish();
        }
        tracing::debug!(
            target: "recharge.upload",
            stage = "upload.put.out",
            key = %key,
            location = %location
        );
        Ok(location)
    }

    /// Delete the object behind a URL previously returned by [`upload`](Self::upload).
    pub async fn remove(&self, object_url: &str) -> Result<(), StorageError> {
        let result = self.remove_inner(object_url).await;
        if let Err(err) = &result {
            tracing::error!(
                target: "recharge.upload",
                stage = "upload.delete.error",
                url = %object_url,
                error = %err,
                "Error deleting file from object storage"
            );
        }
        result
    }

    async fn remove_inner(&self, object_url: &str) -> Result<(), StorageError> {
        let key = key_from_url_under(object_url, self.store.public_base_path())?;
        tracing::debug!(
            target: "recharge.upload",
            stage = "upload.delete.in",
            backend = self.store.name(),
            key = %key
        );
        self.store
            .delete(&key)
            .await
            .map_err(|source| StorageError::Delete {
                key: key.clone(),
                source,
            })?;
        tracing::debug!(target: "recharge.upload", stage = "upload.delete.out", key = %key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::progress::UploadProgress;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Keeps objects in memory and serves them from a fixed public base.
    struct MemoryObjects {
        base: String,
        base_path: String,
        objects: Mutex<HashMap<String, (String, bool, Bytes)>>,
        fail: bool,
    }

    impl MemoryObjects {
        fn new(base: &str) -> Self {
            let base_path = url::Url::parse(base).unwrap().path().to_string();
            Self {
                base: base.trim_end_matches('/').to_string(),
                base_path,
                objects: Mutex::new(HashMap::new()),
                fail: false,
            }
        }
    }

    #[async_trait]
    impl ObjectStore for MemoryObjects {
        fn name(&self) -> &str {
            "memory"
        }

        fn public_base_path(&self) -> &str {
            &self.base_path
        }

        async fn put(
            &self,
            request: PutRequest,
            progress: Option<ProgressCallback>,
        ) -> anyhow::Result<String> {
            if self.fail {
                anyhow::bail!("access denied");
            }
            let total = request.body.len() as u64;
            if let Some(cb) = progress {
                cb(UploadProgress::new(total / 2, total));
            }
            let url = format!("{}/{}", self.base, request.key);
            self.objects.lock().unwrap().insert(
                request.key,
                (request.content_type, request.public_read, request.body),
            );
            Ok(url)
        }

        async fn delete(&self, key: &str) -> anyhow::Result<()> {
            self.objects
                .lock()
                .unwrap()
                .remove(key)
                .map(|_| ())
                .ok_or_else(|| anyhow::anyhow!("no such key: {key}"))
        }
    }

    fn photo() -> UploadFile {
        UploadFile::new("My Photo!.png", "image/png", Bytes::from_static(b"\x89PNG...."))
    }

    fn stored_keys(store: &MemoryObjects) -> Vec<String> {
        store.objects.lock().unwrap().keys().cloned().collect()
    }

    #[tokio::test]
    async fn upload_generates_sanitized_key_in_default_folder() {
        let store = Arc::new(MemoryObjects::new("https://media.example.com"));
        let uploader = ObjectUploader::new(store.clone());

        let url = uploader.upload(photo(), None, None).await.unwrap();

        let keys = stored_keys(&store);
        assert_eq!(keys.len(), 1);
        let key = &keys[0];
        let rest = key.strip_prefix("uploads/").expect("default folder");
        let (digits, name) = rest.split_once('-').unwrap();
        assert!(!digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(name, "My_Photo_.png");
        assert_eq!(url, format!("https://media.example.com/{key}"));

        let (content_type, public_read, _) = store.objects.lock().unwrap()[key].clone();
        assert_eq!(content_type, "image/png");
        assert!(public_read);
    }

    #[tokio::test]
    async fn progress_ends_at_full() {
        let store = Arc::new(MemoryObjects::new("https://media.example.com"));
        let uploader = ObjectUploader::new(store);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let cb: ProgressCallback = Arc::new(move |p: UploadProgress| {
            sink.lock().unwrap().push(p.percentage)
        });

        uploader.upload(photo(), Some("logos"), Some(cb)).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![50, 100]);
    }

    #[tokio::test]
    async fn failed_put_is_upload_error() {
        let mut store = MemoryObjects::new("https://media.example.com");
        store.fail = true;
        let uploader = ObjectUploader::new(Arc::new(store));

        let err = uploader.upload(photo(), None, None).await.unwrap_err();
        match err {
            StorageError::Upload { key, source } => {
                assert!(key.starts_with("uploads/"));
                assert_eq!(source.to_string(), "access denied");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn parent_folder_is_rejected_before_any_write() {
        let store = Arc::new(MemoryObjects::new("https://media.example.com"));
        let uploader = ObjectUploader::new(store.clone());

        let err = uploader
            .upload(photo(), Some("../other"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::InvalidFolder { ref folder } if folder == "../other"));
        assert!(stored_keys(&store).is_empty());
    }

    #[tokio::test]
    async fn remove_round_trips_the_uploaded_key() {
        let store = Arc::new(MemoryObjects::new("https://media.example.com"));
        let uploader = ObjectUploader::new(store.clone());

        let url = uploader.upload(photo(), Some("logos"), None).await.unwrap();
        uploader.remove(&url).await.unwrap();

        assert!(stored_keys(&store).is_empty());
    }

    #[tokio::test]
    async fn remove_round_trips_under_path_style_base() {
        let store = Arc::new(MemoryObjects::new("http://127.0.0.1:9000/media"));
        let uploader = ObjectUploader::new(store.clone());

        let url = uploader.upload(photo(), None, None).await.unwrap();
        uploader.remove(&url).await.unwrap();

        assert!(stored_keys(&store).is_empty());
    }

    #[tokio::test]
    async fn remove_of_unknown_object_is_delete_error() {
        let uploader = ObjectUploader::new(Arc::new(MemoryObjects::new("https://m.example.com")));
        let err = uploader
            .remove("https://m.example.com/uploads/1-gone.png")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Delete { ref key, .. } if key == "uploads/1-gone.png"));
    }

    #[tokio::test]
    async fn from_path_guesses_content_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banner.jpg");
        tokio::fs::write(&path, b"jpeg").await.unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.file_name, "banner.jpg");
        assert_eq!(file.content_type, "image/jpeg");
        assert_eq!(file.size(), 4);
    }
}
