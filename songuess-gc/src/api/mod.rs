//! HTTP control surface
//!
//! Inbound collaborators (track provider, guess input, settings) post to the
//! `/api/*` endpoints; the UI and external player follow `/api/events`.

pub mod handlers;
pub mod health;
pub mod sse;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::session::GameSession;

pub use health::health_routes;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub session: GameSession,
}

impl AppState {
    pub fn new(session: GameSession) -> Self {
        Self { session }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/track", post(handlers::track_changed))
        .route("/guess", post(handlers::guess_edited))
        .route("/give-up", post(handlers::give_up))
        .route("/round", get(handlers::get_round))
        .route(
            "/settings",
            get(handlers::get_settings).put(handlers::put_settings),
        )
        .route("/events", get(sse::event_stream));

    Router::new()
        .nest("/api", api)
        .merge(health_routes())
        .with_state(state)
        // Enable CORS for local access
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
