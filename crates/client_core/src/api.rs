use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::protocol::{
    SearchSuggestion, TripLocation, RECOMMEND_LOCATIONS_ROUTE, SEARCH_SUGGESTIONS_ROUTE,
};
use tracing::{debug, warn};

use crate::{config::normalize_base_url, error::ClientError};

/// Queries at or below this many characters (after trimming) never hit the
/// backend.
pub const MIN_SUGGESTION_QUERY_CHARS: usize = 2;

/// Client for the planner backend.
///
/// `fetch_*` return typed errors; the plain-named methods are the
/// best-effort variants the UI uses, which log failures and yield an empty
/// list.
#[derive(Debug, Clone)]
pub struct PlannerApi {
    http: Client,
    base_url: String,
}

impl PlannerApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_suggestions(&self, query: &str) -> Result<Vec<SearchSuggestion>, ClientError> {
        self.get_json(SEARCH_SUGGESTIONS_ROUTE, &[("query", query)])
            .await
    }

    pub async fn fetch_recommendations(
        &self,
        city: &str,
        tags: Option<&str>,
    ) -> Result<Vec<TripLocation>, ClientError> {
        self.get_json(
            RECOMMEND_LOCATIONS_ROUTE,
            &[("city", city), ("tags", tags.unwrap_or_default())],
        )
        .await
    }

    pub async fn search_suggestions(&self, query: &str) -> Vec<SearchSuggestion> {
        let query = query.trim();
        if query.chars().count() < MIN_SUGGESTION_QUERY_CHARS {
            return Vec::new();
        }
        match self.fetch_suggestions(query).await {
            Ok(suggestions) => suggestions,
            Err(error) => {
                warn!(%error, "search suggestions unavailable");
                Vec::new()
            }
        }
    }

    pub async fn recommend_locations(&self, city: &str, tags: Option<&str>) -> Vec<TripLocation> {
        match self.fetch_recommendations(city, tags).await {
            Ok(locations) => locations,
            Err(error) => {
                warn!(%error, city, "recommendations unavailable");
                Vec::new()
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%url, "planner api request");
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| ClientError::Transport { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status { endpoint, status });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| ClientError::Decode { endpoint, source })
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
