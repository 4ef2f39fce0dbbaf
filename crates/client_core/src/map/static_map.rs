//! Backdrop images for the canvas map, fetched from the provider's
//! static-map endpoint.

use md5::{Digest, Md5};
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use shared::domain::Coordinate;
use thiserror::Error;
use tracing::{debug, warn};

use super::{view::MapView, MapUnavailable};
use crate::config::MapCredentials;

pub const STATIC_MAP_PATH: &str = "/v3/staticmap";
pub const MAX_STATIC_ZOOM: u8 = 17;
pub const MIN_STATIC_ZOOM: u8 = 1;
pub const MAX_STATIC_SIZE: u32 = 1024;

#[derive(Debug, Error)]
pub enum StaticMapError {
    #[error("static map request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("static map returned {0}")]
    Status(StatusCode),
    #[error("static map answered with {content_type} instead of an image: {body}")]
    NotAnImage { content_type: String, body: String },
}

impl From<StaticMapError> for MapUnavailable {
    fn from(error: StaticMapError) -> Self {
        MapUnavailable::LoadRejected(error.to_string())
    }
}

/// One backdrop request. The static endpoint only takes whole zoom levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticMapRequest {
    pub center: Coordinate,
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
}

impl StaticMapRequest {
    pub fn for_view(view: &MapView, width: u32, height: u32) -> Self {
        let zoom = view
            .zoom
            .round()
            .clamp(f64::from(MIN_STATIC_ZOOM), f64::from(MAX_STATIC_ZOOM)) as u8;
        Self {
            center: view.center,
            zoom,
            width: width.clamp(1, MAX_STATIC_SIZE),
            height: height.clamp(1, MAX_STATIC_SIZE),
        }
    }

    /// Query parameters sorted by name, with `sig` appended when a security
    /// code is configured.
    pub fn query(&self, credentials: &MapCredentials) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("key", credentials.key.clone()),
            (
                "location",
                format!("{:.6},{:.6}", self.center.lng, self.center.lat),
            ),
            ("size", format!("{}*{}", self.width, self.height)),
            ("zoom", self.zoom.to_string()),
        ];
        params.sort_by(|a, b| a.0.cmp(b.0));
        if let Some(code) = &credentials.security_code {
            let signature = sign(&params, code);
            params.push(("sig", signature));
        }
        params
    }
}

/// `md5("k1=v1&k2=v2..." + security_code)` over params already sorted by name.
pub fn sign(sorted_params: &[(&str, String)], security_code: &str) -> String {
    let joined = sorted_params
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    let digest = Md5::digest(format!("{joined}{security_code}").as_bytes());
    format!("{digest:x}")
}

#[derive(Debug, Clone)]
pub struct Backdrop {
    pub request: StaticMapRequest,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct StaticMapClient {
    http: Client,
    base_url: String,
}

impl StaticMapClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn fetch(
        &self,
        credentials: &MapCredentials,
        request: StaticMapRequest,
    ) -> Result<Backdrop, StaticMapError> {
        let url = format!("{}{}", self.base_url, STATIC_MAP_PATH);
        debug!(zoom = request.zoom, width = request.width, height = request.height, "fetching static map");
        let response = self
            .http
            .get(&url)
            .query(&request.query(credentials))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StaticMapError::Status(status));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with("image/") {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(200).collect();
            warn!(%content_type, %body, "static map did not return an image");
            return Err(StaticMapError::NotAnImage { content_type, body });
        }

        let bytes = response.bytes().await?.to_vec();
        Ok(Backdrop { request, bytes })
    }
}

#[cfg(test)]
#[path = "../tests/static_map_tests.rs"]
mod tests;
