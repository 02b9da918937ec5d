use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use httpmock::prelude::*;
use serde_json::json;
use tower::ServiceExt;
use weather_core::{
    ApiKey, Coordinate, CredentialError, OpenWeatherProvider, UpstreamConfig, UpstreamError,
    WeatherObservation, WeatherProvider,
};
use weather_server::{AppState, router};

const FAKE_API_KEY: &str = "abcdef0123456789abcdef0123456789";

#[derive(Debug)]
enum Canned {
    Observation(f64, &'static str),
    EmptyConditions,
}

#[derive(Debug)]
struct FakeProvider {
    canned: Canned,
    calls: AtomicUsize,
}

impl FakeProvider {
    fn new(canned: Canned) -> Arc<Self> {
        Arc::new(Self { canned, calls: AtomicUsize::new(0) })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherProvider for FakeProvider {
    async fn current_weather(
        &self,
        _at: Coordinate,
        _api_key: &ApiKey,
    ) -> Result<WeatherObservation, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.canned {
            Canned::Observation(temp, description) => Ok(WeatherObservation {
                description: description.to_string(),
                temperature_c: temp,
                location_name: None,
                observed_at: None,
            }),
            Canned::EmptyConditions => Err(UpstreamError::EmptyConditions),
        }
    }
}

fn valid_key() -> Result<ApiKey, CredentialError> {
    ApiKey::try_from(FAKE_API_KEY)
}

fn app_with(api_key: Result<ApiKey, CredentialError>, provider: Arc<FakeProvider>) -> Router {
    router(AppState::new(api_key, provider))
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("infallible");

    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    (status, String::from_utf8(bytes.to_vec()).expect("utf-8 body"))
}

#[tokio::test]
async fn health_returns_ok() {
    let provider = FakeProvider::new(Canned::Observation(20.0, "clear sky"));
    let (status, body) = get(app_with(valid_key(), provider.clone()), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn health_works_without_a_credential() {
    let provider = FakeProvider::new(Canned::Observation(20.0, "clear sky"));
    let (status, body) = get(app_with(Err(CredentialError::Missing), provider), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn weather_returns_plain_text_report() {
    let provider = FakeProvider::new(Canned::Observation(25.0, "few clouds"));
    let app = app_with(valid_key(), provider.clone());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/weather?lat=37.7749&lon=-122.4194")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("infallible");

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/plain"), "{content_type}");

    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    assert_eq!(
        String::from_utf8(bytes.to_vec()).expect("utf-8"),
        "Current Temperature:\n  Weather     : few clouds\n  Temperature : Hot (77F / 25C)"
    );
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn missing_credential_is_500_before_validation() {
    let provider = FakeProvider::new(Canned::Observation(20.0, "clear sky"));
    let app = app_with(Err(CredentialError::Missing), provider.clone());
    let (status, body) = get(app, "/weather?lat=bad&lon=bad").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "invalid API key");
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn invalid_latitude_is_400() {
    let provider = FakeProvider::new(Canned::Observation(20.0, "clear sky"));

    for uri in ["/weather?lat=100&lon=0", "/weather?lat=north&lon=0", "/weather?lon=0"] {
        let (status, body) = get(app_with(valid_key(), provider.clone()), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body, "Invalid latitude", "{uri}");
    }
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn invalid_longitude_is_400() {
    let provider = FakeProvider::new(Canned::Observation(20.0, "clear sky"));

    for uri in ["/weather?lat=0&lon=180.1", "/weather?lat=0&lon=east", "/weather?lat=0"] {
        let (status, body) = get(app_with(valid_key(), provider.clone()), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body, "Invalid longitude", "{uri}");
    }
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn repeated_query_keys_use_the_first_value() {
    let provider = FakeProvider::new(Canned::Observation(15.0, "mist"));
    let app = app_with(valid_key(), provider.clone());
    let (status, body) = get(app, "/weather?lat=1&lat=2&lon=3").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.ends_with("Temperature : Moderate (59F / 15C)"), "{body}");
    assert_eq!(provider.calls(), 1);

    let app = app_with(valid_key(), provider.clone());
    let (status, body) = get(app, "/weather?lat=north&lat=1&lon=3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid latitude");
}

#[tokio::test]
async fn missing_credential_wins_over_an_odd_query_string() {
    let provider = FakeProvider::new(Canned::Observation(15.0, "mist"));

    for uri in ["/weather?lat=1&lat=2&lon=3", "/weather?lat=%ZZ&&lon", "/weather"] {
        let app = app_with(Err(CredentialError::InvalidFormat), provider.clone());
        let (status, body) = get(app, uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(body, "invalid API key", "{uri}");
    }
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn boundary_coordinates_are_accepted() {
    let provider = FakeProvider::new(Canned::Observation(-5.0, "snow"));
    let (status, body) = get(app_with(valid_key(), provider), "/weather?lat=-90&lon=180").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.ends_with("Temperature : Cold (23F / -5C)"), "{body}");
}

#[tokio::test]
async fn upstream_failure_is_500_with_generic_message() {
    let provider = FakeProvider::new(Canned::EmptyConditions);
    let (status, body) = get(app_with(valid_key(), provider.clone()), "/weather?lat=1&lon=2").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "upstream weather service error");
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn full_stack_against_mock_openweather() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/data/2.5/weather")
                .query_param("lat", "51.507400")
                .query_param("lon", "-0.127800")
                .query_param("units", "metric")
                .query_param("appid", FAKE_API_KEY);
            then.status(200).json_body(json!({
                "name": "London",
                "main": {"temp": 15.0},
                "weather": [{"description": "overcast clouds"}]
            }));
        })
        .await;

    let upstream = UpstreamConfig {
        base_url: reqwest::Url::parse(&server.url("/data/2.5")).expect("mock url"),
        timeout: Duration::from_secs(5),
    };
    let provider = OpenWeatherProvider::new(&upstream).expect("client builds");
    let app = router(AppState::new(valid_key(), Arc::new(provider)));

    let (status, body) = get(app, "/weather?lat=51.5074&lon=-0.1278").await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        "Current Temperature:\n  Weather     : overcast clouds\n  \
         Temperature : Moderate (59F / 15C)"
    );
}

#[tokio::test]
async fn upstream_status_error_does_not_reach_the_client() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/data/2.5/weather");
            then.status(401).json_body(json!({"cod": 401, "message": "Invalid API key."}));
        })
        .await;

    let upstream = UpstreamConfig {
        base_url: reqwest::Url::parse(&server.url("/data/2.5")).expect("mock url"),
        timeout: Duration::from_secs(5),
    };
    let provider = OpenWeatherProvider::new(&upstream).expect("client builds");
    let app = router(AppState::new(valid_key(), Arc::new(provider)));

    let (status, body) = get(app, "/weather?lat=1&lon=1").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "upstream weather service error");
    assert!(!body.contains(FAKE_API_KEY));
}
