use std::collections::HashMap;

use super::*;
use axum::{
    body,
    body::Body,
    extract::Query as UpstreamQuery,
    http::{header, Request},
    response::IntoResponse,
};
use serde_json::json;
use tokio::{net::TcpListener, sync::mpsc};
use tower::ServiceExt;

type Seen = mpsc::UnboundedSender<HashMap<String, String>>;

async fn spawn_upstream() -> (String, mpsc::UnboundedReceiver<HashMap<String, String>>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, rx) = mpsc::unbounded_channel();

    let tips_tx: Seen = tx.clone();
    let places_tx: Seen = tx;
    let upstream = Router::new()
        .route(
            amap::INPUT_TIPS_PATH,
            get(move |UpstreamQuery(q): UpstreamQuery<HashMap<String, String>>| {
                let tx = tips_tx.clone();
                async move {
                    let _ = tx.send(q);
                    Json(json!({
                        "status": "1",
                        "tips": [
                            { "id": "B000A7BD6C", "name": "故宫博物院", "district": "北京市东城区", "adcode": "110101", "location": "116.397,39.917" },
                            { "id": [], "name": "故宫", "district": "北京市", "adcode": "110100", "location": [] }
                        ]
                    }))
                }
            }),
        )
        .route(
            amap::PLACE_TEXT_PATH,
            get(move |UpstreamQuery(q): UpstreamQuery<HashMap<String, String>>| {
                let tx = places_tx.clone();
                async move {
                    let broken = q.get("city").map(String::as_str) == Some("Broken");
                    let _ = tx.send(q);
                    if broken {
                        return (StatusCode::BAD_GATEWAY, "upstream down").into_response();
                    }
                    Json(json!({
                        "status": "1",
                        "pois": [
                            { "id": "B000A8UIN8", "name": "颐和园", "type": "风景名胜;公园广场;公园", "photos": [], "biz_ext": { "rating": "4.9" } }
                        ]
                    }))
                    .into_response()
                }
            }),
        );
    tokio::spawn(async move {
        let _ = axum::serve(listener, upstream).await;
    });
    (format!("http://{addr}"), rx)
}

fn app_with(amap: Option<AmapClient>) -> Router {
    build_router(Arc::new(AppState { amap }))
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

#[tokio::test]
async fn healthz_and_welcome_respond() {
    let app = app_with(None);
    let response = app
        .clone()
        .oneshot(Request::get("/healthz").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let body = json_body(response).await;
    assert!(body["message"].as_str().expect("message").contains("Welcome"));
}

#[tokio::test]
async fn missing_key_is_a_500_envelope_on_both_routes() {
    for uri in [
        "/api/search-suggestions?query=palace",
        "/api/recommend-locations?city=Beijing",
    ] {
        let response = app_with(None)
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["code"], "not_configured");
    }
}

#[tokio::test]
async fn suggestions_proxy_input_tips() {
    let (base, mut seen) = spawn_upstream().await;
    let app = app_with(Some(AmapClient::new(Client::new(), base, "test-key")));

    let response = app
        .oneshot(
            Request::get("/api/search-suggestions?query=%E6%95%85%E5%AE%AB")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body,
        json!([{ "name": "故宫博物院", "district": "北京市东城区", "adcode": "110101" }])
    );

    let upstream_query = seen.recv().await.expect("upstream called");
    assert_eq!(upstream_query.get("keywords").map(String::as_str), Some("故宫"));
    assert_eq!(upstream_query.get("key").map(String::as_str), Some("test-key"));
    assert_eq!(
        upstream_query.get("types").map(String::as_str),
        Some(amap::SUGGESTION_TYPES)
    );
}

#[tokio::test]
async fn recommendations_map_pois_and_pass_tag_filter() {
    let (base, mut seen) = spawn_upstream().await;
    let app = app_with(Some(AmapClient::new(Client::new(), base, "test-key")));

    let response = app
        .oneshot(
            Request::get("/api/recommend-locations?city=Beijing&tags=Coastal")
                .header(header::ORIGIN, "http://localhost:5173")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));

    let body = json_body(response).await;
    assert_eq!(body[0]["id"], "B000A8UIN8");
    assert_eq!(body[0]["daysRecommended"], 1);
    assert_eq!(body[0]["image"], amap::PLACEHOLDER_IMAGE);
    assert_eq!(body[0]["tags"], json!(["Sightseeing", "Nature"]));

    let upstream_query = seen.recv().await.expect("upstream called");
    assert_eq!(upstream_query.get("keywords").map(String::as_str), Some("景点|海滨|沙滩"));
    assert_eq!(upstream_query.get("citylimit").map(String::as_str), Some("true"));
    assert_eq!(upstream_query.get("offset").map(String::as_str), Some("20"));
}

#[tokio::test]
async fn upstream_failure_degrades_to_empty_recommendations() {
    let (base, _seen) = spawn_upstream().await;
    let app = app_with(Some(AmapClient::new(Client::new(), base, "test-key")));

    let response = app
        .oneshot(
            Request::get("/api/recommend-locations?city=Broken")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test]
async fn blank_city_defaults_to_beijing() {
    let (base, mut seen) = spawn_upstream().await;
    let app = app_with(Some(AmapClient::new(Client::new(), base, "test-key")));

    let response = app
        .oneshot(
            Request::get("/api/recommend-locations?city=%20&tags=")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let upstream_query = seen.recv().await.expect("upstream called");
    assert_eq!(upstream_query.get("city").map(String::as_str), Some("Beijing"));
    assert_eq!(upstream_query.get("keywords").map(String::as_str), Some("景点"));
}
