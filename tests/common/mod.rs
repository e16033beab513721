// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::Response;
use routeshare::config::Config;
use routeshare::routes::create_router;
use routeshare::AppState;
use std::sync::Arc;

/// Two-track GPX; only the first track's first segment should be used.
#[allow(dead_code)]
pub const SAMPLE_GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <name>Lunch Loop</name>
    <trkseg>
      <trkpt lat="0.0" lon="0.0"><ele>10</ele><time>2024-01-15T10:00:00Z</time></trkpt>
      <trkpt lat="0.0" lon="0.001"><ele>15</ele><time>2024-01-15T10:01:00Z</time></trkpt>
      <trkpt lat="0.0" lon="0.002"><ele>12</ele><time>2024-01-15T10:02:00Z</time></trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="1.0" lon="1.0"></trkpt>
      <trkpt lat="1.0" lon="1.1"></trkpt>
    </trkseg>
  </trk>
  <trk>
    <name>Ignored</name>
    <trkseg>
      <trkpt lat="5.0" lon="5.0"></trkpt>
      <trkpt lat="5.0" lon="5.1"></trkpt>
    </trkseg>
  </trk>
</gpx>"#;

/// Create a test app with the default test config.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default())
}

/// Create a test app with a custom config.
#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config).expect("Failed to build app state"));
    (create_router(state.clone()), state)
}

/// Collect a response body as bytes.
#[allow(dead_code)]
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body")
        .to_vec()
}

/// Collect a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

/// Minimal valid activity as request JSON.
#[allow(dead_code)]
pub fn activity_json() -> serde_json::Value {
    serde_json::json!({
        "id": "test_activity",
        "name": "Evening Ride",
        "distance": 25_400.0,
        "duration": 3_900.0,
        "elevation": 310.0,
        "pace": 153.5,
        "coordinates": [
            { "lat": 37.7749, "lng": -122.4194 },
            { "lat": 37.7849, "lng": -122.4094 },
            { "lat": 37.7949, "lng": -122.4294 }
        ],
        "startTime": "2024-01-15T18:00:00Z",
        "type": "Ride"
    })
}
