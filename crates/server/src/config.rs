use std::{collections::HashMap, fs, path::Path};

use tracing::warn;

pub const SETTINGS_FILE: &str = "server.toml";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_AMAP_BASE_URL: &str = "https://restapi.amap.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    /// Web-service key for the map provider. Routes answer 500 without it.
    pub amap_key: Option<String>,
    pub amap_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: DEFAULT_BIND_ADDR.into(),
            amap_key: None,
            amap_base_url: DEFAULT_AMAP_BASE_URL.into(),
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("bind_addr") {
                    settings.server_bind = v.clone();
                }
                if let Some(v) = file_cfg.get("amap_key") {
                    settings.amap_key = Some(v.clone());
                }
                if let Some(v) = file_cfg.get("amap_base_url") {
                    settings.amap_base_url = v.clone();
                }
            }
            Err(error) => warn!(path = %path.display(), %error, "ignoring unreadable settings file"),
        }
    }

    let var = |name: &str| env(name).filter(|value| !value.trim().is_empty());

    if let Some(v) = var("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = var("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = var("AMAP_KEY") {
        settings.amap_key = Some(v);
    }
    if let Some(v) = var("APP__AMAP_KEY") {
        settings.amap_key = Some(v);
    }

    if let Some(v) = var("AMAP_BASE_URL") {
        settings.amap_base_url = v;
    }
    if let Some(v) = var("APP__AMAP_BASE_URL") {
        settings.amap_base_url = v;
    }

    settings.amap_key = settings
        .amap_key
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty());
    settings.amap_base_url = settings.amap_base_url.trim_end_matches('/').to_string();
    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
