//! Per-round state and derived UI signals

use serde::{Deserialize, Serialize};
use songuess_common::events::{RoundOutcome, RoundPhase};
use songuess_common::{FieldFlags, TrackField, TrackMetadata};
use uuid::Uuid;

/// Score below which no glow is shown
pub const GLOW_FLOOR: f64 = 0.75;

/// Glow magnitude per unit of score above the floor
pub const GLOW_GAIN: f64 = 500.0;

/// Found/revealed flags of the current round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    /// Fields matched at least once this round; only ever raised
    pub found: FieldFlags,
    /// Fields shown unmasked; trails `found` by one reconcile step
    pub revealed: FieldFlags,
    /// Set once when the round completes, cleared when the skip fires
    pub complete: bool,
}

impl RoundState {
    /// Mark `field` found; returns true on a false→true transition
    pub fn mark_found(&mut self, field: TrackField) -> bool {
        self.found.raise(field)
    }

    /// Reveal every found field that is still masked
    ///
    /// Returns the fields that were newly revealed.
    pub fn reveal_found(&mut self) -> Vec<TrackField> {
        let newly = self.found.difference(&self.revealed);
        for field in &newly {
            self.revealed.raise(*field);
        }
        newly
    }

    /// Reveal everything, found or not
    ///
    /// Returns the fields that were newly revealed.
    pub fn reveal_all(&mut self) -> Vec<TrackField> {
        let newly = FieldFlags::ALL.difference(&self.revealed);
        self.revealed = FieldFlags::ALL;
        newly
    }
}

/// Glow magnitude for the closeness indicator
///
/// A completed round glows at full strength, an empty or zero score shows
/// nothing, and anything else scales linearly above [`GLOW_FLOOR`].
pub fn glow(score: f64, complete: bool) -> f64 {
    if complete {
        return (1.0 - GLOW_FLOOR) * GLOW_GAIN;
    }
    if score <= 0.0 {
        return 0.0;
    }
    (score - GLOW_FLOOR).max(0.0) * GLOW_GAIN
}

/// Read model of the round, published after every handled input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundSnapshot {
    pub round_id: Uuid,
    pub phase: RoundPhase,
    pub track: Option<TrackMetadata>,
    pub guess: String,
    pub score: f64,
    pub glow: f64,
    pub state: RoundState,
    pub outcome: Option<RoundOutcome>,
}

impl RoundSnapshot {
    /// Track with masked fields blanked, as the UI is allowed to render it
    pub fn visible_track(&self) -> Option<TrackMetadata> {
        self.track.as_ref().map(|t| t.masked(&self.state.revealed))
    }
}
