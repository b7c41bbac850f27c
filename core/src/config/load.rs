use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Get the default data directory: ~/.recharge-admin
pub fn get_data_dir() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home.join(".recharge-admin"))
}

pub fn load_from_path(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)?;
    Ok(toml::from_str::<AppConfig>(&s)?)
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.recharge-admin/config.toml (highest)
    let data_dir = get_data_dir()?;
    let user_config = data_dir.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let mut cfg = if user_config.exists() {
        load_from_path(&user_config)?
    } else if local_config.exists() {
        load_from_path(local_config)?
    } else {
        AppConfig::default()
    };

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
    Ok(cfg)
}

/// Environment variable overrides (Priority 0: highest). Blank values are ignored.
pub(crate) fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let set = |target: &mut String, key: &str| {
        if let Some(v) = lookup(key).filter(|v| !v.trim().is_empty()) {
            *target = v;
        }
    };

    set(&mut cfg.store.base_url, "RECHARGE_STORE_URL");
    set(&mut cfg.store.auth_token, "RECHARGE_STORE_AUTH");
    set(&mut cfg.storage.endpoint, "RECHARGE_STORAGE_ENDPOINT");
    set(&mut cfg.storage.bucket, "RECHARGE_STORAGE_BUCKET");
    set(&mut cfg.storage.region, "RECHARGE_STORAGE_REGION");
    set(&mut cfg.storage.access_key_id, "RECHARGE_STORAGE_ACCESS_KEY_ID");
    set(&mut cfg.storage.secret_access_key, "RECHARGE_STORAGE_SECRET_ACCESS_KEY");
    set(&mut cfg.storage.api_key, "RECHARGE_STORAGE_API_KEY");
}
