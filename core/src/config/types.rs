use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "recharge_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}

/// Realtime document store holding the recharge collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub base_url: String,

    /// Sent as the `auth` query parameter when non-empty.
    #[serde(default)]
    pub auth_token: String,

    #[serde(default = "default_document")]
    pub document: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_document() -> String {
    "Recharge".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            auth_token: String::new(),
            document: default_document(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// S3-compatible object storage used for uploads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub endpoint: String,

    #[serde(default)]
    pub bucket: String,

    #[serde(default)]
    pub region: String,

    /// Base of the public object URLs. Defaults to `{endpoint}/{bucket}`.
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// SigV4 credentials. When both are set, requests are signed for `region`.
    #[serde(default)]
    pub access_key_id: String,

    #[serde(default)]
    pub secret_access_key: String,

    /// Bearer token for gateways that do not speak SigV4. Ignored when
    /// access keys are configured.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_folder")]
    pub default_folder: String,

    #[serde(default = "default_upload_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_folder() -> String {
    "uploads".to_string()
}

fn default_upload_timeout_ms() -> u64 {
    120_000
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            bucket: String::new(),
            region: String::new(),
            public_base_url: None,
            access_key_id: String::new(),
            secret_access_key: String::new(),
            api_key: String::new(),
            default_folder: default_folder(),
            timeout_ms: default_upload_timeout_ms(),
        }
    }
}

impl StorageConfig {
    pub fn has_access_keys(&self) -> bool {
        !self.access_key_id.trim().is_empty() && !self.secret_access_key.trim().is_empty()
    }

    pub fn resolved_public_base_url(&self) -> String {
        match self
            .public_base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("{}/{}", self.endpoint.trim_end_matches('/'), self.bucket),
        }
    }
}
