//! Event types for the Songuess event system
//!
//! Provides the outbound event definitions of the game client and the
//! EventBus that distributes them to the UI and the external player.

mod round_types;

pub use round_types::{RoundOutcome, RoundPhase};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::model::{FieldFlags, GameSettings, TrackField, TrackMetadata};

/// Songuess event types
///
/// Every round-scoped event carries the `round_id` it belongs to, so that
/// consumers can discard anything addressed to a round that has already been
/// superseded by a track change.
///
/// Events are broadcast via EventBus and serialized for SSE transmission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A new round started for a newly playing track
    ///
    /// Carries no metadata: every field starts masked.
    ///
    /// Triggers:
    /// - UI: mask all fields, empty the guess box
    RoundStarted {
        round_id: Uuid,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Playback stopped, no track to guess
    RoundIdle {
        round_id: Uuid,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A guess edit was evaluated
    ///
    /// Triggers:
    /// - UI: update the closeness glow
    GuessEvaluated {
        round_id: Uuid,
        /// Name-field similarity (0.0-1.0)
        score: f64,
        /// Glow magnitude derived from `score`
        glow: f64,
        /// Field the guess matched, if any
        matched: Option<TrackField>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A field was found for the first time this round
    FieldFound {
        round_id: Uuid,
        field: TrackField,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The set of unmasked fields changed
    ///
    /// `track` is already masked: fields not in `revealed` are empty.
    ///
    /// Triggers:
    /// - UI: unmask the newly revealed fields
    RevealChanged {
        round_id: Uuid,
        revealed: FieldFlags,
        track: Option<TrackMetadata>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The guess box must be emptied (a field was just revealed)
    GuessCleared {
        round_id: Uuid,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Round reached its end
    RoundCompleted {
        round_id: Uuid,
        outcome: RoundOutcome,
        found: FieldFlags,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Celebrate a correctly guessed round (fired once per round)
    ///
    /// Triggers:
    /// - UI: confetti
    Celebrate {
        round_id: Uuid,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Skip to the next track has been scheduled
    ///
    /// Triggers:
    /// - UI: "Next song..." toast with countdown of `after_ms`
    SkipScheduled {
        round_id: Uuid,
        after_ms: u64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Grace window elapsed; the external player must skip now
    ///
    /// Consumers must compare `round_id` with the round they are showing
    /// and ignore the command on mismatch.
    SkipToNextTrack {
        round_id: Uuid,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Player settings replaced
    SettingsChanged {
        settings: GameSettings,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl GameEvent {
    /// Event type string, used as the SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            GameEvent::RoundStarted { .. } => "RoundStarted",
            GameEvent::RoundIdle { .. } => "RoundIdle",
            GameEvent::GuessEvaluated { .. } => "GuessEvaluated",
            GameEvent::FieldFound { .. } => "FieldFound",
            GameEvent::RevealChanged { .. } => "RevealChanged",
            GameEvent::GuessCleared { .. } => "GuessCleared",
            GameEvent::RoundCompleted { .. } => "RoundCompleted",
            GameEvent::Celebrate { .. } => "Celebrate",
            GameEvent::SkipScheduled { .. } => "SkipScheduled",
            GameEvent::SkipToNextTrack { .. } => "SkipToNextTrack",
            GameEvent::SettingsChanged { .. } => "SettingsChanged",
        }
    }

    /// Round this event belongs to (None for session-wide events)
    pub fn round_id(&self) -> Option<Uuid> {
        match self {
            GameEvent::RoundStarted { round_id, .. }
            | GameEvent::RoundIdle { round_id, .. }
            | GameEvent::GuessEvaluated { round_id, .. }
            | GameEvent::FieldFound { round_id, .. }
            | GameEvent::RevealChanged { round_id, .. }
            | GameEvent::GuessCleared { round_id, .. }
            | GameEvent::RoundCompleted { round_id, .. }
            | GameEvent::Celebrate { round_id, .. }
            | GameEvent::SkipScheduled { round_id, .. }
            | GameEvent::SkipToNextTrack { round_id, .. } => Some(*round_id),
            GameEvent::SettingsChanged { .. } => None,
        }
    }
}

// ========================================
// EventBus Implementation
// ========================================

/// Central event distribution bus for game events
///
/// The EventBus uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block the session)
/// - Multiple concurrent subscribers (SSE clients, player bridge)
/// - Lagged message detection for slow subscribers
///
/// # Examples
///
/// ```
/// use songuess_common::events::{EventBus, GameEvent};
/// use uuid::Uuid;
///
/// let event_bus = EventBus::new(100);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit_lossy(GameEvent::Celebrate {
///     round_id: Uuid::new_v4(),
///     timestamp: chrono::Utc::now(),
/// });
///
/// assert!(matches!(rx.try_recv(), Ok(GameEvent::Celebrate { .. })));
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<GameEvent>,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of events to buffer before dropping old events
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: GameEvent) {
        let _ = self.tx.send(event);
    }
}
