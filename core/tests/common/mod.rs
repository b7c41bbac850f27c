#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use recharge_core::api::{DocumentStore, Item, ObjectStore, ProgressCallback, PutRequest};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Documents kept in a map, with write counting and an injectable write failure.
#[derive(Default)]
pub struct InMemoryDocuments {
    docs: Mutex<HashMap<String, Value>>,
    writes: AtomicUsize,
    fail_writes: Mutex<bool>,
}

impl InMemoryDocuments {
    pub fn with(document: &str, value: Value) -> Self {
        let store = Self::default();
        store.docs.lock().unwrap().insert(document.to_string(), value);
        store
    }

    pub fn raw(&self, document: &str) -> Option<Value> {
        self.docs.lock().unwrap().get(document).cloned()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocuments {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn get(&self, document: &str) -> anyhow::Result<Option<Value>> {
        Ok(self.raw(document))
    }

    async fn set(&self, document: &str, value: &Value) -> anyhow::Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if *self.fail_writes.lock().unwrap() {
            anyhow::bail!("write rejected");
        }
        self.docs
            .lock()
            .unwrap()
            .insert(document.to_string(), value.clone());
        Ok(())
    }
}

/// Objects kept in a map and served from a virtual-hosted style base URL.
pub struct InMemoryObjects {
    base_url: String,
    pub objects: Mutex<HashMap<String, Bytes>>,
}

impl InMemoryObjects {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            objects: Mutex::new(HashMap::new()),
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjects {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn put(
        &self,
        request: PutRequest,
        _progress: Option<ProgressCallback>,
    ) -> anyhow::Result<String> {
        let url = format!("{}/{}", self.base_url, request.key);
        self.objects.lock().unwrap().insert(request.key, request.body);
        Ok(url)
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}

pub fn item(name: &str) -> Item {
    Item::new(name, format!("https://{name}.example/pay"), "")
}
