//! Integration tests for songuess-gc API endpoints

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use songuess_common::config::TomlConfig;
use tower::util::ServiceExt; // for `oneshot` method
use songuess_gc::{build_router, start_session, AppState};

/// Test helper: Create app around a fresh session with default config
fn setup_app() -> axum::Router {
    let session = start_session(&TomlConfig::default());
    build_router(AppState::new(session))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

fn hey_jude() -> Value {
    json!({
        "track": {
            "name": "Hey Jude (Remastered 2015)",
            "artist": "The Beatles",
            "album": "1"
        }
    })
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "songuess-gc");
    assert!(body["version"].is_string());
}

// =============================================================================
// Round
// =============================================================================

#[tokio::test]
async fn test_round_starts_idle() {
    let app = setup_app();

    let response = app.oneshot(get("/api/round")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["phase"], "Idle");
    assert!(body["track"].is_null());
}

#[tokio::test]
async fn test_track_masks_unrevealed_fields() {
    let app = setup_app();

    let response = app
        .oneshot(send_json("POST", "/api/track", hey_jude()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["phase"], "Guessing");
    assert_eq!(body["track"]["name"], "");
    assert_eq!(body["track"]["artist"], "");
    assert_eq!(body["state"]["revealed"]["title"], false);
}

#[tokio::test]
async fn test_guess_flow_completes_round() {
    let app = setup_app();

    app.clone()
        .oneshot(send_json("POST", "/api/track", hey_jude()))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/guess", json!({ "text": "hey jud" })))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["phase"], "Guessing");
    assert!((body["score"].as_f64().unwrap() - 0.875).abs() < 1e-9);
    assert!(body["glow"].as_f64().unwrap() > 0.0);

    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/guess", json!({ "text": "hey jude" })))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["phase"], "Complete");
    assert_eq!(body["outcome"], "guessed");
    assert_eq!(body["guess"], "");
    assert_eq!(body["glow"], 125.0);
    assert_eq!(body["track"]["name"], "Hey Jude (Remastered 2015)");
    assert_eq!(body["track"]["album"], "1");

    // Snapshot endpoint agrees
    let response = app.oneshot(get("/api/round")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["phase"], "Complete");
    assert_eq!(body["state"]["found"]["title"], true);
    assert_eq!(body["state"]["complete"], true);
}

#[tokio::test]
async fn test_give_up_reveals_everything() {
    let app = setup_app();

    app.clone()
        .oneshot(send_json("POST", "/api/track", hey_jude()))
        .await
        .unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/api/give-up")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["outcome"], "gave_up");
    assert_eq!(body["track"]["artist"], "The Beatles");
    assert_eq!(body["state"]["found"]["title"], false);
}

#[tokio::test]
async fn test_artist_list_uses_first_artist() {
    let app = setup_app();

    let track = json!({
        "track": {
            "name": "Under Pressure",
            "artists": ["Queen", "David Bowie"],
            "album": "Hot Space"
        }
    });
    app.clone()
        .oneshot(send_json("POST", "/api/track", track))
        .await
        .unwrap();

    // The second listed artist is not a valid answer
    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/guess", json!({ "text": "david bowie" })))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["state"]["found"]["artist"], false);

    let response = app
        .oneshot(send_json("POST", "/api/guess", json!({ "text": "queen" })))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["state"]["found"]["artist"], true);
    assert_eq!(body["track"]["artist"], "Queen");
    assert_eq!(body["track"]["name"], "");
}

#[tokio::test]
async fn test_null_track_moves_to_idle() {
    let app = setup_app();

    app.clone()
        .oneshot(send_json("POST", "/api/track", hey_jude()))
        .await
        .unwrap();
    let response = app
        .oneshot(send_json("POST", "/api/track", json!({ "track": null })))
        .await
        .unwrap();

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["phase"], "Idle");
    assert!(body["track"].is_null());
}

#[tokio::test]
async fn test_malformed_guess_is_rejected() {
    let app = setup_app();

    let response = app
        .oneshot(send_json("POST", "/api/guess", json!({ "guess": 42 })))
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

// =============================================================================
// Settings
// =============================================================================

#[tokio::test]
async fn test_settings_defaults() {
    let app = setup_app();

    let response = app.oneshot(get("/api/settings")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["player_volume"], 0.5);
    assert_eq!(body["guess_success"]["name"], true);
    assert_eq!(body["guess_success"]["artist"], false);
    assert_eq!(body["guess_success"]["album"], false);
}

#[tokio::test]
async fn test_put_settings_clamps_volume() {
    let app = setup_app();

    let settings = json!({
        "player_volume": 2.0,
        "guess_success": { "name": true, "artist": true, "album": false }
    });
    let response = app
        .clone()
        .oneshot(send_json("PUT", "/api/settings", settings))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["player_volume"], 1.0);

    let response = app.oneshot(get("/api/settings")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["guess_success"]["artist"], true);
}
