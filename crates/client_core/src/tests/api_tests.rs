use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;

use super::*;

#[derive(Clone, Default)]
struct BackendState {
    suggestion_calls: Arc<AtomicUsize>,
}

async fn suggestions(
    State(state): State<BackendState>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state.suggestion_calls.fetch_add(1, Ordering::SeqCst);
    let text = query.get("query").cloned().unwrap_or_default();
    Json(json!([
        { "name": format!("{text} Station"), "district": "Shimogyo", "adcode": "26106" },
        { "name": format!("{text} Tower") }
    ]))
}

async fn recommendations(Query(query): Query<HashMap<String, String>>) -> impl IntoResponse {
    if query.get("city").map(String::as_str) == Some("Nowhere") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    let tag = query.get("tags").cloned().unwrap_or_default();
    Json(json!([{
        "id": "B000A8UIN8",
        "name": "Summer Palace",
        "country": "China",
        "image": null,
        "rating": 4.8,
        "tags": [if tag.is_empty() { "General".to_string() } else { tag }],
        "daysRecommended": 1
    }]))
    .into_response()
}

async fn spawn_backend() -> Result<(String, BackendState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = BackendState::default();
    let app = Router::new()
        .route(SEARCH_SUGGESTIONS_ROUTE, get(suggestions))
        .route(RECOMMEND_LOCATIONS_ROUTE, get(recommendations))
        .route(
            "/broken/api/search-suggestions",
            get(|| async { "not json" }),
        )
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

#[tokio::test]
async fn suggestions_are_decoded_with_defaults() {
    let (base, state) = spawn_backend().await.expect("spawn backend");
    let api = PlannerApi::new(&base).expect("api");

    let suggestions = api.search_suggestions("  Kyoto ").await;
    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0].name, "Kyoto Station");
    assert_eq!(suggestions[1].district, "");
    assert_eq!(state.suggestion_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn short_queries_never_reach_the_backend() {
    let (base, state) = spawn_backend().await.expect("spawn backend");
    let api = PlannerApi::new(&base).expect("api");

    assert!(api.search_suggestions(" K ").await.is_empty());
    assert!(api.search_suggestions("").await.is_empty());
    assert_eq!(state.suggestion_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn recommendations_pass_city_and_tag() {
    let (base, _) = spawn_backend().await.expect("spawn backend");
    let api = PlannerApi::new(&base).expect("api");

    let tagged = api.recommend_locations("Beijing", Some("Nature")).await;
    assert_eq!(tagged[0].tags, vec!["Nature".to_string()]);

    let all = api.recommend_locations("Beijing", None).await;
    assert_eq!(all[0].tags, vec!["General".to_string()]);
    assert_eq!(all[0].image, None);
}

#[tokio::test]
async fn failures_are_typed_but_best_effort_calls_return_empty() {
    let (base, _) = spawn_backend().await.expect("spawn backend");
    let api = PlannerApi::new(&base).expect("api");

    let status = api.fetch_recommendations("Nowhere", None).await;
    assert!(matches!(
        status,
        Err(ClientError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            ..
        })
    ));
    assert!(api.recommend_locations("Nowhere", None).await.is_empty());

    let broken = PlannerApi::new(&format!("{base}/broken")).expect("api");
    assert!(matches!(
        broken.fetch_suggestions("Kyoto").await,
        Err(ClientError::Decode { .. })
    ));

    let unreachable = PlannerApi::new("http://127.0.0.1:9").expect("api");
    assert!(matches!(
        unreachable.fetch_suggestions("Kyoto").await,
        Err(ClientError::Transport { .. })
    ));
}

#[test]
fn base_url_is_normalized() {
    let api = PlannerApi::new("http://localhost:8000/").expect("api");
    assert_eq!(api.base_url(), "http://localhost:8000");
    assert!(matches!(
        PlannerApi::new("file:///tmp"),
        Err(ClientError::Settings(_))
    ));
}
