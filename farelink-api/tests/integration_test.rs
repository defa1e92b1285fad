use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use farelink_api::{app, AppState};
use farelink_core::adapter::ProviderAdapter;
use farelink_core::airports::AirportRegistry;
use farelink_engine::FlightSearchService;
use farelink_providers::garuda::GarudaAdapter;
use farelink_providers::testing::StaticSource;
use farelink_providers::ProviderRegistry;
use farelink_store::app_config::ScoringConfig;
use farelink_store::{FlightCache, MemoryStore};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

const GARUDA_PAYLOAD: &str = r#"
{
    "status": "success",
    "flights": [
        {
            "flight_id": "GA-421",
            "airline": "Garuda Indonesia",
            "airline_code": "GA",
            "departure": {"airport": "CGK", "city": "Jakarta", "time": "2025-12-15T06:00:00+07:00"},
            "arrival": {"airport": "SBY", "city": "Surabaya", "time": "2025-12-15T07:30:00+07:00"},
            "stops": 0,
            "aircraft": "Boeing 737-800",
            "price": {"amount": 1450000, "currency": "IDR"},
            "available_seats": 23,
            "fare_class": "economy",
            "baggage": {"carry_on": 1, "checked": 2},
            "amenities": ["wifi", "meals"]
        }
    ]
}
"#;

fn test_app() -> axum::Router {
    let airports = Arc::new(AirportRegistry::new());
    let adapters: Vec<Arc<dyn ProviderAdapter>> = vec![Arc::new(GarudaAdapter::new(
        Arc::new(StaticSource::new(GARUDA_PAYLOAD)),
        airports,
        Duration::from_secs(2),
    ))];

    let search = Arc::new(FlightSearchService::new(
        ProviderRegistry::new(adapters),
        FlightCache::new(Arc::new(MemoryStore::new()), Duration::from_secs(60)),
        ScoringConfig::default(),
    ));

    app(AppState { search })
}

fn search_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/flights/search")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_search_endpoint_returns_flights() {
    let response = test_app()
        .oneshot(search_request(
            r#"{"origin": "CGK", "destinations": ["SBY"], "departureDate": "2025-12-15"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["metadata"]["totalResults"], 1);
    assert_eq!(body["metadata"]["providersSucceeded"], 1);
    assert_eq!(body["metadata"]["cacheHit"], false);
    assert_eq!(body["flights"][0]["id"], "GA-421_Garuda");
    assert_eq!(body["bestValue"]["id"], "GA-421_Garuda");
}

#[tokio::test]
async fn test_invalid_request_is_rejected_with_400() {
    let response = test_app()
        .oneshot(search_request(
            r#"{"origin": "JAKARTA", "destinations": ["SBY"]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().unwrap().contains("IATA"));
}

#[tokio::test]
async fn test_repeat_search_flips_cache_hit() {
    let app = test_app();

    let first = app
        .clone()
        .oneshot(search_request(
            r#"{"origin": "CGK", "destinations": ["SBY"], "departureDate": "2025-12-15"}"#,
        ))
        .await
        .unwrap();
    let first_bytes = to_bytes(first.into_body(), usize::MAX).await.unwrap();
    let first_body: serde_json::Value = serde_json::from_slice(&first_bytes).unwrap();
    assert_eq!(first_body["metadata"]["cacheHit"], false);

    let second = app
        .oneshot(search_request(
            r#"{"origin": "CGK", "destinations": ["SBY"], "departureDate": "2025-12-15"}"#,
        ))
        .await
        .unwrap();
    let second_bytes = to_bytes(second.into_body(), usize::MAX).await.unwrap();
    let second_body: serde_json::Value = serde_json::from_slice(&second_bytes).unwrap();
    assert_eq!(second_body["metadata"]["cacheHit"], true);
    assert_eq!(second_body["metadata"]["providersQueried"], 0);
}
