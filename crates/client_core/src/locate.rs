//! Best-effort "where am I" lookup for the map's locate button.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use shared::domain::Coordinate;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("geolocation request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("geolocation returned {0}")]
    Status(StatusCode),
    #[error("geolocation returned an undecodable body: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("geolocation refused: {0}")]
    Refused(String),
    #[error("geolocation answer carried no usable position")]
    NoPosition,
}

#[derive(Debug, Deserialize)]
struct PositionBody {
    status: Option<String>,
    message: Option<String>,
    #[serde(alias = "latitude")]
    lat: Option<f64>,
    #[serde(alias = "longitude", alias = "lng")]
    lon: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Locator {
    http: Client,
    url: String,
}

impl Locator {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub async fn fetch_position(&self) -> Result<Coordinate, LocateError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(LocateError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LocateError::Status(status));
        }
        let body: PositionBody = response.json().await.map_err(LocateError::Decode)?;
        if body.status.as_deref() == Some("fail") {
            return Err(LocateError::Refused(body.message.unwrap_or_default()));
        }
        Coordinate::from_parts(body.lon, body.lat).ok_or(LocateError::NoPosition)
    }

    /// Any failure is logged and answered with `None`.
    pub async fn locate(&self) -> Option<Coordinate> {
        match self.fetch_position().await {
            Ok(position) => Some(position),
            Err(error) => {
                debug!(%error, "locate ignored");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/locate_tests.rs"]
mod tests;
