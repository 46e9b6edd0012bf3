//! Drives the blocking client against a local stand-in for the prediction API.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use http::StatusCode;
use serde_json::json;

use inky_amsat::{Client, Error, Location, PassPredictor, ResponseCache};

#[derive(Clone, Default)]
struct Api {
    hits: Arc<AtomicUsize>,
}

async fn next_pass(
    State(api): State<Api>,
    Path(norad): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    api.hits.fetch_add(1, Ordering::SeqCst);

    if norad != "27607" {
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    }
    if params.get("lat").map(String::as_str) != Some("29.27371")
        || params.get("lon").map(String::as_str) != Some("-95.35739")
        || params.get("alt").map(String::as_str) != Some("0")
    {
        return (StatusCode::BAD_REQUEST, "bad location").into_response();
    }

    Json(json!({
        "name": "SO-50",
        "start": "2019-03-01T18:00:00.000Z",
        "tca": "2019-03-01T18:05:00.000Z",
        "end": "2019-03-01T18:10:00.000Z",
        "aosazimuth": 45,
        "maxel": 60,
        "losazimuth": 135
    }))
    .into_response()
}

async fn broken() -> Response {
    Json(json!({ "name": "SO-50" })).into_response()
}

/// Serve the fake API on its own runtime thread and return its address.
fn spawn_api(api: Api) -> SocketAddr {
    let app = Router::new()
        .route("/rest/v1/{norad}/next-pass", get(next_pass))
        .route("/broken/rest/v1/{norad}/next-pass", get(broken))
        .with_state(api);

    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });
    rx.recv().unwrap()
}

fn houston() -> Location {
    Location::new("29.27371", "-95.35739", "0", chrono_tz::US::Central)
}

/// Address nothing listens on.
fn closed_port() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

#[test]
fn test_next_pass() {
    let addr = spawn_api(Api::default());
    let mut client = Client::new().with_base_url(format!("http://{}", addr));

    let pass = client.next_pass("27607", &houston()).unwrap();
    assert_eq!(pass.name, "SO-50");
    assert_eq!(pass.start, "2019-03-01T18:00:00.000Z");
    assert_eq!(pass.losazimuth.to_string(), "135");
}

#[test]
fn test_unknown_norad_is_not_found() {
    let addr = spawn_api(Api::default());
    let mut client = Client::new().with_base_url(format!("http://{}", addr));

    let err = client.next_pass("99999", &houston()).unwrap_err();
    assert!(matches!(err, Error::NotFound { norad } if norad == "99999"));
}

#[test]
fn test_missing_fields_are_fatal() {
    let addr = spawn_api(Api::default());
    let mut client = Client::new().with_base_url(format!("http://{}/broken", addr));

    let err = client.next_pass("27607", &houston()).unwrap_err();
    assert!(matches!(err, Error::Serialization(_)));
}

#[test]
fn test_non_404_error_status_is_parsed_as_body() {
    let addr = spawn_api(Api::default());
    let mut client = Client::new().with_base_url(format!("http://{}", addr));
    let elsewhere = Location::new("51.5", "-0.12", "0", chrono_tz::UTC);

    // 400 with a plain-text body: treated as success, then fails to parse
    let err = client.next_pass("27607", &elsewhere).unwrap_err();
    assert!(matches!(err, Error::Serialization(_)));
}

#[test]
fn test_cache_serves_repeat_requests() {
    let api = Api::default();
    let hits = api.hits.clone();
    let addr = spawn_api(api);
    let dir = tempfile::tempdir().unwrap();

    let mut client = Client::new()
        .with_base_url(format!("http://{}", addr))
        .with_cache(ResponseCache::new(dir.path().join("cache_api.json"), 60));

    let first = client.next_pass("27607", &houston()).unwrap();
    let second = client.next_pass("27607", &houston()).unwrap();
    assert_eq!(first, second);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_not_found_is_not_cached() {
    let api = Api::default();
    let hits = api.hits.clone();
    let addr = spawn_api(api);
    let dir = tempfile::tempdir().unwrap();

    let mut client = Client::new()
        .with_base_url(format!("http://{}", addr))
        .with_cache(ResponseCache::new(dir.path().join("cache_api.json"), 60));

    assert!(client.next_pass("11111", &houston()).is_err());
    assert!(client.next_pass("11111", &houston()).is_err());
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[test]
fn test_unreachable_disables_cache() {
    let dir = tempfile::tempdir().unwrap();
    let mut client = Client::new()
        .with_base_url(format!("http://{}", closed_port()))
        .with_cache(ResponseCache::new(dir.path().join("cache_api.json"), 60));
    assert!(client.cache().unwrap().is_enabled());

    let err = client.next_pass("27607", &houston()).unwrap_err();
    assert!(err.is_unreachable());
    assert!(!client.cache().unwrap().is_enabled());
}
