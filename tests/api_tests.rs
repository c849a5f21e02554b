use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

mod common;

fn setup_test_app() -> axum::Router {
    let search = Arc::new(common::CatalogueSearch::new(common::anyang_catalogue()));
    daytrip::routes::create_router(common::test_state(search))
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn post_itinerary(payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/itineraries")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = setup_test_app();

    let request = Request::builder()
        .uri("/debug/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["checks"]["place_search"], "ok");
    assert_eq!(json["checks"]["ranking_assist"], "disabled");
    assert_eq!(json["checks"]["stations"], 7);
}

#[tokio::test]
async fn test_health_reports_placeholder_mode() {
    let search = Arc::new(common::CatalogueSearch::without_credentials());
    let app = daytrip::routes::create_router(common::test_state(search));

    let request = Request::builder()
        .uri("/debug/health")
        .body(Body::empty())
        .unwrap();
    let json = body_json(app.oneshot(request).await.unwrap()).await;

    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["place_search"], "placeholders");
}

#[tokio::test]
async fn test_itinerary_endpoint() {
    let app = setup_test_app();

    let payload = json!({
        "date": "2025-01-15",
        "peopleCount": "2인",
        "foods": ["한식"],
        "cultures": ["영화"],
        "transport": "도보",
        "numPlaces": 4,
        "seed": 11
    });
    let response = app.oneshot(post_itinerary(payload)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let places = json["recommended_places"].as_array().unwrap();
    let route = json["optimized_route"].as_array().unwrap();
    assert_eq!(places.len(), 4);
    assert_eq!(route.len(), 4);
    assert_eq!(json["requested"], 4);
    assert_eq!(json["partial"], false);
    assert!(json["total_distance_km"].as_f64().unwrap() > 0.0);
    assert_eq!(json["anchor"]["kind"]["type"], "city_center");

    let restaurants = places
        .iter()
        .filter(|p| p["category"] == "RESTAURANT")
        .count();
    assert_eq!(restaurants, 2);
    assert_eq!(route[0]["order_index"], 1);
}

#[tokio::test]
async fn test_itinerary_with_station() {
    let app = setup_test_app();

    let payload = json!({
        "foods": ["한식"],
        "cultures": ["영화"],
        "num_places": 2,
        "selected_station": "범계역",
        "date": "2025-01-15"
    });
    let response = app.oneshot(post_itinerary(payload)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["anchor"]["kind"]["type"], "station");
    assert_eq!(json["anchor"]["kind"]["name"], "범계");
    assert_eq!(json["anchor"]["radius_m"], 1000.0);
}

#[tokio::test]
async fn test_itinerary_rejects_too_many_places() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_itinerary(json!({"numPlaces": 25})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["message"].as_str().unwrap().contains("num_places"));
}

#[tokio::test]
async fn test_itinerary_rejects_malformed_body() {
    let app = setup_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/itineraries")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"numPlaces": "many"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_list_stations() {
    let app = setup_test_app();

    let request = Request::builder()
        .uri("/stations")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 7);
    assert!(names.contains(&"인덕원"));
}

#[tokio::test]
async fn test_get_station_by_name() {
    let app = setup_test_app();

    // "평촌역", percent-encoded
    let request = Request::builder()
        .uri("/stations/%ED%8F%89%EC%B4%8C%EC%97%AD")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "평촌");
    assert_eq!(json["line"], "4호선");
}

#[tokio::test]
async fn test_unknown_station_is_not_found() {
    let app = setup_test_app();

    let request = Request::builder()
        .uri("/stations/gangnam")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
