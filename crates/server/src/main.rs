use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use reqwest::Client;
use shared::{
    error::ApiError,
    protocol::{
        RecommendQuery, SearchSuggestion, SuggestionQuery, TripLocation, WelcomeResponse,
        RECOMMEND_LOCATIONS_ROUTE, SEARCH_SUGGESTIONS_ROUTE,
    },
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

mod amap;
mod config;

use amap::AmapClient;
use config::load_settings;

#[derive(Clone)]
struct AppState {
    /// `None` when no provider key is configured.
    amap: Option<AmapClient>,
}

const DEFAULT_CITY: &str = "Beijing";

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let amap = match &settings.amap_key {
        Some(key) => Some(AmapClient::new(
            Client::new(),
            settings.amap_base_url.clone(),
            key.clone(),
        )),
        None => {
            warn!("AMAP_KEY is not set; suggestion and recommendation routes will fail");
            None
        }
    };

    let app = build_router(Arc::new(AppState { amap }));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/healthz", get(healthz))
        .route(SEARCH_SUGGESTIONS_ROUTE, get(search_suggestions))
        .route(RECOMMEND_LOCATIONS_ROUTE, get(recommend_locations))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the trip planner API".into(),
    })
}

async fn healthz() -> &'static str {
    "ok"
}

fn provider(state: &AppState) -> Result<&AmapClient, (StatusCode, Json<ApiError>)> {
    state.amap.as_ref().ok_or_else(|| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::not_configured("AMAP_KEY")),
        )
    })
}

async fn search_suggestions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SuggestionQuery>,
) -> ApiResult<Vec<SearchSuggestion>> {
    let amap = provider(&state)?;
    let suggestions = amap.input_tips(&query.query).await.map_err(|e| {
        error!(error = %e, query = %query.query, "input tips failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::upstream(e.to_string())),
        )
    })?;
    Ok(Json(suggestions))
}

/// Upstream failures degrade to an empty list; only a missing key is an error.
async fn recommend_locations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecommendQuery>,
) -> ApiResult<Vec<TripLocation>> {
    let amap = provider(&state)?;
    let city = match query.city.trim() {
        "" => DEFAULT_CITY,
        city => city,
    };
    let tags = query.tags.as_deref().filter(|tags| !tags.trim().is_empty());
    match amap.place_search(city, tags).await {
        Ok(locations) => Ok(Json(locations)),
        Err(e) => {
            error!(error = %e, %city, "place search failed");
            Ok(Json(Vec::new()))
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
