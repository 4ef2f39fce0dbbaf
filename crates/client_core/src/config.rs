use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub const SETTINGS_FILE: &str = "planner.toml";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_STATIC_MAP_BASE_URL: &str = "https://restapi.amap.com";
pub const DEFAULT_CITY: &str = "Beijing";
/// IP geolocation endpoint answering `{"status", "lat", "lon"}`.
pub const DEFAULT_GEOLOCATION_URL: &str = "http://ip-api.com/json";
const DATA_DIR_NAME: &str = "trip_planner";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("base url '{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error("no per-user data directory available; set PLANNER_DATA_DIR")]
    NoDataDir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapCredentials {
    pub key: String,
    pub security_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub map_key: Option<String>,
    pub map_security_code: Option<String>,
    pub static_map_base_url: String,
    pub data_dir: Option<PathBuf>,
    pub suggestion_debounce_ms: u64,
    pub recommendation_debounce_ms: u64,
    pub default_city: String,
    /// Empty disables "locate me".
    pub geolocation_url: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            map_key: None,
            map_security_code: None,
            static_map_base_url: DEFAULT_STATIC_MAP_BASE_URL.into(),
            data_dir: None,
            suggestion_debounce_ms: 300,
            recommendation_debounce_ms: 500,
            default_city: DEFAULT_CITY.into(),
            geolocation_url: DEFAULT_GEOLOCATION_URL.into(),
        }
    }
}

impl ClientSettings {
    /// `None` when no usable map key is configured.
    pub fn map_credentials(&self) -> Option<MapCredentials> {
        let key = self.map_key.as_deref().map(str::trim).filter(|k| !k.is_empty())?;
        let security_code = self
            .map_security_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        Some(MapCredentials {
            key: key.to_string(),
            security_code,
        })
    }

    /// `None` when locating is switched off.
    pub fn geolocation_url(&self) -> Option<&str> {
        Some(self.geolocation_url.trim()).filter(|url| !url.is_empty())
    }

    pub fn resolve_data_dir(&self) -> Result<PathBuf, SettingsError> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_local_dir()
            .map(|base| base.join(DATA_DIR_NAME))
            .ok_or(SettingsError::NoDataDir)
    }

    pub fn suggestion_debounce(&self) -> Duration {
        Duration::from_millis(self.suggestion_debounce_ms)
    }

    pub fn recommendation_debounce(&self) -> Duration {
        Duration::from_millis(self.recommendation_debounce_ms)
    }
}

pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

/// File values first, then environment overrides. Empty variables are ignored.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> ClientSettings {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => match toml::from_str::<ClientSettings>(&raw) {
            Ok(parsed) => parsed,
            Err(error) => {
                warn!(path = %path.display(), %error, "ignoring unreadable settings file");
                ClientSettings::default()
            }
        },
        Err(_) => {
            debug!(path = %path.display(), "no settings file; using defaults");
            ClientSettings::default()
        }
    };

    let var = |name: &str| env(name).filter(|value| !value.trim().is_empty());

    if let Some(v) = var("PLANNER_API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = var("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = var("AMAP_JS_KEY").or_else(|| var("AMAP_KEY")) {
        settings.map_key = Some(v);
    }
    if let Some(v) = var("AMAP_SECURITY_CODE") {
        settings.map_security_code = Some(v);
    }
    if let Some(v) = var("AMAP_BASE_URL") {
        settings.static_map_base_url = v;
    }
    if let Some(v) = var("PLANNER_GEOLOCATION_URL") {
        settings.geolocation_url = v;
    }
    if let Some(v) = var("PLANNER_DATA_DIR") {
        settings.data_dir = Some(PathBuf::from(v));
    }

    settings
}

/// Parses a base url and strips any trailing slash so routes can be appended.
pub fn normalize_base_url(raw: &str) -> Result<String, SettingsError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|source| SettingsError::InvalidBaseUrl {
        url: trimmed.to_string(),
        source,
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(SettingsError::UnsupportedScheme(trimmed.to_string()));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
