use std::sync::Arc;

use anyhow::Result;

use recharge_core::api::{
    AppConfig, CollectionSyncStore, DocumentStore, ObjectStore, ObjectUploader, StorageConfig,
    StoreConfig,
};

use crate::document::RealtimeDocumentStore;
use crate::storage::{HttpObjectStore, ObjectAuth, SigningKeys};

pub fn build_document_store(cfg: &StoreConfig) -> Result<Arc<dyn DocumentStore>> {
    Ok(Arc::new(RealtimeDocumentStore::new(
        cfg.base_url.clone(),
        cfg.auth_token.clone(),
        cfg.timeout_ms,
    )?))
}

/// Endpoint to talk to: the configured one, or the regional AWS endpoint.
pub fn resolve_endpoint(cfg: &StorageConfig) -> String {
    if !cfg.endpoint.trim().is_empty() {
        return cfg.endpoint.trim().to_string();
    }
    if !cfg.region.trim().is_empty() {
        return format!("https://s3.{}.amazonaws.com", cfg.region.trim());
    }
    String::new()
}

/// Access keys win over the bearer token; with neither, requests go unsigned.
pub fn object_auth(cfg: &StorageConfig) -> ObjectAuth {
    if cfg.has_access_keys() {
        ObjectAuth::SigV4(SigningKeys::new(
            cfg.access_key_id.clone(),
            cfg.secret_access_key.clone(),
            cfg.region.clone(),
        ))
    } else if !cfg.api_key.trim().is_empty() {
        ObjectAuth::Bearer(cfg.api_key.trim().to_string())
    } else {
        ObjectAuth::Anonymous
    }
}

pub fn build_object_store(cfg: &StorageConfig) -> Result<Arc<dyn ObjectStore>> {
    let resolved = StorageConfig {
        endpoint: resolve_endpoint(cfg),
        ..cfg.clone()
    };
    Ok(Arc::new(HttpObjectStore::new(
        resolved.endpoint.clone(),
        resolved.bucket.clone(),
        resolved.resolved_public_base_url(),
        object_auth(&resolved),
        resolved.timeout_ms,
    )?))
}

pub fn build_sync_store(cfg: &AppConfig) -> Result<CollectionSyncStore> {
    let backend = build_document_store(&cfg.store)?;
    Ok(CollectionSyncStore::new(backend, cfg.store.document.clone()))
}

pub fn build_uploader(cfg: &AppConfig) -> Result<ObjectUploader> {
    Ok(ObjectUploader::new(build_object_store(&cfg.storage)?))
}
