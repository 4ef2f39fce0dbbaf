//! REST payloads exchanged between the planner client and its backend.

use serde::{Deserialize, Serialize};

pub const SEARCH_SUGGESTIONS_ROUTE: &str = "/api/search-suggestions";
pub const RECOMMEND_LOCATIONS_ROUTE: &str = "/api/recommend-locations";

/// Filter chips on the destination screen. `All` sends no tag.
pub const RECOMMENDATION_FILTERS: [&str; 5] = ["All", "Nature", "Historical", "City Break", "Coastal"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSuggestion {
    pub name: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub adcode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripLocation {
    pub id: String,
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub image: Option<String>,
    pub rating: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub days_recommended: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestionQuery {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendQuery {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub tags: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trip_location_uses_camel_case_and_tolerates_missing_image() {
        let location: TripLocation = serde_json::from_str(
            r#"{"id":"B0FFG","name":"Summer Palace","country":"China","rating":4.8,"tags":["Nature"],"daysRecommended":1}"#,
        )
        .expect("decode");
        assert_eq!(location.image, None);
        assert_eq!(location.days_recommended, 1);

        let encoded = serde_json::to_value(&location).expect("encode");
        assert_eq!(encoded["daysRecommended"], 1);
    }
}
