//! Round-related type definitions
//!
//! Supporting types for round lifecycle events.

use serde::{Deserialize, Serialize};

/// Round lifecycle phase
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub enum RoundPhase {
    /// No track playing
    Idle,
    /// Track present, guesses are evaluated
    Guessing,
    /// Round finished, deferred skip pending
    Complete,
    /// Deferred skip fired, waiting for the next track
    Advancing,
}

impl std::fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundPhase::Idle => write!(f, "Idle"),
            RoundPhase::Guessing => write!(f, "Guessing"),
            RoundPhase::Complete => write!(f, "Complete"),
            RoundPhase::Advancing => write!(f, "Advancing"),
        }
    }
}

/// How a round ended
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    /// Completion policy satisfied by the player's guesses
    Guessed,
    /// Player gave up; answer revealed without celebration
    GaveUp,
}

impl std::fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundOutcome::Guessed => write!(f, "guessed"),
            RoundOutcome::GaveUp => write!(f, "gave_up"),
        }
    }
}
