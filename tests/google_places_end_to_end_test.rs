use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use httpmock::prelude::*;
use nearby_places::core::{Category, LatLng, PriceRange, Query};
use nearby_places::{server, Aggregator, AppState, GooglePlacesClient, TomlConfig};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::util::ServiceExt;

fn google_place(id: &str, name: &str, types: &[&str], reviews: u64) -> serde_json::Value {
    serde_json::json!({
        "place_id": id,
        "name": name,
        "types": types,
        "user_ratings_total": reviews,
        "geometry": {"location": {"lat": 41.88, "lng": -87.63}},
        "vicinity": "Chicago"
    })
}

#[tokio::test]
async fn test_end_to_end_search_through_router() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/maps/api/place/nearbysearch/json")
            .query_param("location", "41.8781,-87.6298")
            .query_param("radius", "800")
            .query_param("type", "cafe")
            .query_param("minprice", "1")
            .query_param("maxprice", "2")
            .query_param("key", "e2e-key");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "status": "OK",
                "results": [
                    google_place("a", "Intelligentsia", &["cafe", "food"], 1500),
                    google_place("b", "Hotel Lobby Cafe", &["cafe", "lodging"], 3000),
                    google_place("c", "Metric Coffee", &["cafe"], 600)
                ]
            }));
    });

    let toml = format!(
        r#"
[places]
endpoint = "{}"
api_key = "e2e-key"
"#,
        server.url("/maps/api/place/nearbysearch/json")
    );
    let config = TomlConfig::from_toml_str(&toml).unwrap();
    let state = AppState::from_config(&config).unwrap();

    let response = server::build_router(state)
        .oneshot(
            Request::builder()
                .uri("/api/google-places?lat=41.8781&lng=-87.6298&radius=800&types=cafe&minprice=1&maxprice=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    api_mock.assert();
    assert_eq!(body["count"], 2);
    assert_eq!(body["results"][0]["name"], "Intelligentsia");
    assert_eq!(body["results"][1]["name"], "Metric Coffee");
    assert_eq!(body["results"][0]["vicinity"], "Chicago");
}

#[tokio::test]
async fn test_end_to_end_pagination_waits_for_token() {
    let server = MockServer::start();
    let first_page = server.mock(|when, then| {
        when.method(GET)
            .path("/nearby")
            .query_param("type", "supermarket")
            .query_param("key", "k");
        then.status(200).json_body(serde_json::json!({
            "status": "OK",
            "results": [google_place("s1", "Jewel-Osco", &["supermarket"], 800)],
            "next_page_token": "page-2"
        }));
    });
    let second_page = server.mock(|when, then| {
        when.method(GET)
            .path("/nearby")
            .query_param("pagetoken", "page-2")
            .query_param("key", "k");
        then.status(200).json_body(serde_json::json!({
            "status": "OK",
            "results": [google_place("s2", "Trader Joe's", &["supermarket"], 2400)]
        }));
    });

    let aggregator = Aggregator::new(
        Arc::new(GooglePlacesClient::new(server.url("/nearby"))),
        Some("k".to_string()),
    );
    let query = Query::new(
        LatLng::new(41.8781, -87.6298),
        1000,
        vec![Category::from("supermarket")],
        PriceRange::default(),
        30,
    )
    .unwrap();

    let started = Instant::now();
    let results = aggregator.search(&query).await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(2000));
    first_page.assert();
    second_page.assert();
    let names: Vec<&str> = results.places().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Trader Joe's", "Jewel-Osco"]);
}

#[tokio::test]
async fn test_end_to_end_unreachable_upstream_returns_500() {
    // nothing listens on port 9 (discard) in the test environment
    let config = TomlConfig::from_toml_str(
        r#"
[places]
endpoint = "http://127.0.0.1:9/nearby"
api_key = "k"
timeout_seconds = 5
"#,
    )
    .unwrap();
    let state = AppState::from_config(&config).unwrap();

    let response = server::build_router(state)
        .oneshot(
            Request::builder()
                .uri("/api/google-places?lat=1&lng=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
