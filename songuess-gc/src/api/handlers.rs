//! HTTP request handlers
//!
//! Inbound endpoints deliver one input each to the game session and answer
//! with the resulting round view.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use songuess_common::events::{RoundOutcome, RoundPhase};
use songuess_common::{GameSettings, TrackMetadata};
use tracing::debug;
use uuid::Uuid;

use super::AppState;
use crate::error::Result;
use crate::round::{RoundSnapshot, RoundState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    /// `null` when playback stopped
    pub track: Option<TrackPayload>,
}

/// Track as reported by the provider
///
/// Accepts either a single `artist` or the provider's `artists` list, of
/// which only the first entry is guessed against.
#[derive(Debug, Deserialize)]
pub struct TrackPayload {
    pub name: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub artists: Vec<String>,
    pub album: String,
}

impl From<TrackPayload> for TrackMetadata {
    fn from(payload: TrackPayload) -> Self {
        match payload.artist {
            Some(artist) => TrackMetadata::new(payload.name, artist, payload.album),
            None => TrackMetadata::from_artists(payload.name, &payload.artists, payload.album),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GuessRequest {
    pub text: String,
}

/// Round as the UI may see it: masked fields are blank
#[derive(Debug, Serialize, Deserialize)]
pub struct RoundResponse {
    pub round_id: Uuid,
    pub phase: RoundPhase,
    pub track: Option<TrackMetadata>,
    pub guess: String,
    pub score: f64,
    pub glow: f64,
    pub state: RoundState,
    pub outcome: Option<RoundOutcome>,
}

impl From<RoundSnapshot> for RoundResponse {
    fn from(snapshot: RoundSnapshot) -> Self {
        Self {
            track: snapshot.visible_track(),
            round_id: snapshot.round_id,
            phase: snapshot.phase,
            guess: snapshot.guess,
            score: snapshot.score,
            glow: snapshot.glow,
            state: snapshot.state,
            outcome: snapshot.outcome,
        }
    }
}

// ============================================================================
// Round
// ============================================================================

/// POST /api/track
pub async fn track_changed(
    State(state): State<AppState>,
    Json(request): Json<TrackRequest>,
) -> Result<Json<RoundResponse>> {
    debug!("Track notification: {:?}", request.track);
    let track = request.track.map(TrackMetadata::from);
    let snapshot = state.session.track_changed(track).await?;
    Ok(Json(snapshot.into()))
}

/// POST /api/guess
pub async fn guess_edited(
    State(state): State<AppState>,
    Json(request): Json<GuessRequest>,
) -> Result<Json<RoundResponse>> {
    let snapshot = state.session.guess_edited(request.text).await?;
    Ok(Json(snapshot.into()))
}

/// POST /api/give-up
pub async fn give_up(State(state): State<AppState>) -> Result<Json<RoundResponse>> {
    let snapshot = state.session.give_up().await?;
    Ok(Json(snapshot.into()))
}

/// GET /api/round
pub async fn get_round(State(state): State<AppState>) -> Json<RoundResponse> {
    Json(state.session.snapshot().await.into())
}

// ============================================================================
// Settings
// ============================================================================

/// GET /api/settings
pub async fn get_settings(State(state): State<AppState>) -> Json<GameSettings> {
    Json(state.session.settings().await)
}

/// PUT /api/settings
///
/// Replaces all settings. Volume outside 0.0-1.0 is clamped.
pub async fn put_settings(
    State(state): State<AppState>,
    Json(settings): Json<GameSettings>,
) -> Result<Json<GameSettings>> {
    let settings = state.session.update_settings(settings).await?;
    Ok(Json(settings))
}
