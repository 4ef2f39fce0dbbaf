//! Upstream calls to the map provider's web services and the mapping from
//! its loosely typed answers to the planner's payloads.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use shared::protocol::{SearchSuggestion, TripLocation};
use thiserror::Error;
use tracing::{debug, warn};

pub const INPUT_TIPS_PATH: &str = "/v3/assistant/inputtips";
pub const PLACE_TEXT_PATH: &str = "/v3/place/text";

/// Scenic spots, parks, museums and place names.
pub const SUGGESTION_TYPES: &str = "110000|110100|110200|140000|140100|140200|190000";
pub const RECOMMEND_KEYWORDS: &str = "景点";
pub const RECOMMEND_TYPES: &str = "110000|110100|140000";
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x300?text=No+Image";
pub const DEFAULT_RATING: f64 = 4.5;
pub const DEFAULT_COUNTRY: &str = "China";
const PAGE_SIZE: &str = "20";

#[derive(Debug, Error)]
pub enum AmapError {
    #[error("map provider request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("map provider returned {0}")]
    Status(StatusCode),
    #[error("map provider returned an undecodable body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Keyword and POI-type filter for a recommendation query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoiFilter {
    pub keywords: String,
    pub types: String,
}

/// Widens the base filter for each comma-separated UI tag.
pub fn poi_filter(tags: Option<&str>) -> PoiFilter {
    let mut keywords = RECOMMEND_KEYWORDS.to_string();
    let mut types = RECOMMEND_TYPES.to_string();
    let tags: Vec<&str> = tags
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .collect();

    if tags.contains(&"Nature") {
        types.push_str("|110100|110200");
    }
    if tags.contains(&"Historical") {
        types.push_str("|140000");
    }
    if tags.contains(&"City Break") {
        types.push_str("|050000|060000");
    }
    if tags.contains(&"Coastal") {
        keywords.push_str("|海滨|沙滩");
    }
    PoiFilter { keywords, types }
}

/// The provider answers missing text fields with `[]`, so every field is
/// read as a raw value.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InputTipsResponse {
    pub status: Value,
    pub tips: Vec<RawTip>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawTip {
    pub id: Value,
    pub name: Value,
    pub district: Value,
    pub adcode: Value,
    pub location: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PlaceTextResponse {
    pub status: Value,
    pub info: Value,
    pub pois: Vec<RawPoi>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawPoi {
    pub id: Value,
    pub name: Value,
    #[serde(rename = "type")]
    pub poi_type: Value,
    pub photos: Value,
    pub biz_ext: Value,
}

fn text(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

fn is_ok(status: &Value) -> bool {
    match status {
        Value::String(s) => s == "1",
        Value::Number(n) => n.as_i64() == Some(1),
        _ => false,
    }
}

/// Tips without an id or location are place-name fragments, not places.
pub fn suggestions_from_tips(body: InputTipsResponse) -> Vec<SearchSuggestion> {
    if !is_ok(&body.status) {
        return Vec::new();
    }
    body.tips
        .iter()
        .filter(|tip| text(&tip.id).is_some() && text(&tip.location).is_some())
        .filter_map(|tip| {
            Some(SearchSuggestion {
                name: text(&tip.name)?.to_string(),
                district: text(&tip.district).unwrap_or_default().to_string(),
                adcode: text(&tip.adcode).unwrap_or_default().to_string(),
            })
        })
        .collect()
}

pub fn derive_tags(poi_type: &str) -> Vec<String> {
    let mut tags = Vec::new();
    if poi_type.contains("风景") || poi_type.contains("景点") {
        tags.push("Sightseeing".to_string());
    }
    if poi_type.contains("公园") {
        tags.push("Nature".to_string());
    }
    if poi_type.contains("博物馆") || poi_type.contains("古迹") {
        tags.push("History".to_string());
    }
    if tags.is_empty() {
        tags.push("General".to_string());
    }
    tags
}

pub fn parse_rating(biz_ext: &Value) -> f64 {
    biz_ext
        .get("rating")
        .and_then(text)
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|rating| rating.is_finite())
        .unwrap_or(DEFAULT_RATING)
}

fn first_photo(photos: &Value) -> Option<&str> {
    photos.as_array()?.first()?.get("url").and_then(text)
}

pub fn location_from_poi(poi: &RawPoi) -> Option<TripLocation> {
    let id = text(&poi.id)?;
    let name = text(&poi.name)?;
    Some(TripLocation {
        id: id.to_string(),
        name: name.to_string(),
        country: DEFAULT_COUNTRY.to_string(),
        image: Some(first_photo(&poi.photos).unwrap_or(PLACEHOLDER_IMAGE).to_string()),
        rating: parse_rating(&poi.biz_ext),
        tags: derive_tags(text(&poi.poi_type).unwrap_or_default()),
        days_recommended: 1,
    })
}

pub fn locations_from_places(body: PlaceTextResponse) -> Vec<TripLocation> {
    if !is_ok(&body.status) {
        warn!(info = %body.info, "place search was not successful");
        return Vec::new();
    }
    body.pois.iter().filter_map(location_from_poi).collect()
}

#[derive(Debug, Clone)]
pub struct AmapClient {
    http: Client,
    base_url: String,
    key: String,
}

impl AmapClient {
    pub fn new(http: Client, base_url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            key: key.into(),
        }
    }

    pub async fn input_tips(&self, query: &str) -> Result<Vec<SearchSuggestion>, AmapError> {
        let body: InputTipsResponse = self
            .get(
                INPUT_TIPS_PATH,
                &[
                    ("key", self.key.as_str()),
                    ("keywords", query),
                    ("datatype", "all"),
                    ("types", SUGGESTION_TYPES),
                ],
            )
            .await?;
        Ok(suggestions_from_tips(body))
    }

    pub async fn place_search(
        &self,
        city: &str,
        tags: Option<&str>,
    ) -> Result<Vec<TripLocation>, AmapError> {
        let filter = poi_filter(tags);
        let body: PlaceTextResponse = self
            .get(
                PLACE_TEXT_PATH,
                &[
                    ("key", self.key.as_str()),
                    ("keywords", filter.keywords.as_str()),
                    ("city", city),
                    ("types", filter.types.as_str()),
                    ("citylimit", "true"),
                    ("extensions", "all"),
                    ("offset", PAGE_SIZE),
                    ("page", "1"),
                ],
            )
            .await?;
        Ok(locations_from_places(body))
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AmapError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "map provider request");
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(AmapError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(AmapError::Status(status));
        }
        response.json::<T>().await.map_err(AmapError::Decode)
    }
}

#[cfg(test)]
#[path = "tests/amap_tests.rs"]
mod tests;
