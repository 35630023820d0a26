//! Round state machine
//!
//! Consumes discrete inputs (track changes, guess edits, give-up, elapsed
//! skip timers) one at a time and returns the commands the surrounding
//! session must carry out. The machine never sleeps, spawns or publishes;
//! it only mutates its own state and describes side effects.
//!
//! Phases:
//!
//! ```text
//!   Idle ──track──▶ Guessing ──policy satisfied / give up──▶ Complete
//!    ▲                 ▲                                        │
//!    │                 └──────────────track─────────────────────┤
//!    └────────none─────────────────────────────────────────────┤
//!                                                  skip elapsed ▼
//!                                                          Advancing ──track──▶ Guessing
//! ```

use songuess_common::events::{GameEvent, RoundOutcome, RoundPhase};
use songuess_common::{CompletionPolicy, FieldFlags, TrackField, TrackMetadata};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use super::state::{glow, RoundSnapshot, RoundState};
use crate::guess::{FieldClassifier, GuessClassification};

/// Default grace window between completion and skipping to the next track
pub const DEFAULT_SKIP_DELAY: Duration = Duration::from_millis(4000);

/// Inputs accepted by the round machine
#[derive(Debug, Clone, PartialEq)]
pub enum RoundInput {
    /// The external player reports a new track, or `None` when stopped
    TrackChanged(Option<TrackMetadata>),
    /// Full guess text after an edit
    GuessEdited(String),
    /// Player gives up on the current track
    GiveUp,
    /// Deferred skip timer for `round_id` expired
    SkipElapsed(Uuid),
}

/// Side effects requested by the round machine
#[derive(Debug, Clone, PartialEq)]
pub enum RoundCommand {
    RoundStarted {
        round_id: Uuid,
    },
    RoundIdle {
        round_id: Uuid,
    },
    GuessEvaluated {
        round_id: Uuid,
        score: f64,
        glow: f64,
        matched: Option<TrackField>,
    },
    FieldFound {
        round_id: Uuid,
        field: TrackField,
    },
    /// `track` is masked to `revealed`
    RevealChanged {
        round_id: Uuid,
        revealed: FieldFlags,
        track: Option<TrackMetadata>,
    },
    /// Guess text and score were reset; the UI must empty the guess box
    ClearGuess {
        round_id: Uuid,
    },
    RoundCompleted {
        round_id: Uuid,
        outcome: RoundOutcome,
        found: FieldFlags,
    },
    Celebrate {
        round_id: Uuid,
    },
    /// Start a timer; when it expires feed `SkipElapsed(round_id)` back in
    ScheduleSkip {
        round_id: Uuid,
        after: Duration,
    },
    /// Grace window over; the external player must skip now
    SkipToNextTrack {
        round_id: Uuid,
    },
}

impl RoundCommand {
    /// Outbound event announcing this command
    pub fn to_event(&self, timestamp: chrono::DateTime<chrono::Utc>) -> GameEvent {
        match self.clone() {
            RoundCommand::RoundStarted { round_id } => {
                GameEvent::RoundStarted { round_id, timestamp }
            }
            RoundCommand::RoundIdle { round_id } => GameEvent::RoundIdle { round_id, timestamp },
            RoundCommand::GuessEvaluated {
                round_id,
                score,
                glow,
                matched,
            } => GameEvent::GuessEvaluated {
                round_id,
                score,
                glow,
                matched,
                timestamp,
            },
            RoundCommand::FieldFound { round_id, field } => GameEvent::FieldFound {
                round_id,
                field,
                timestamp,
            },
            RoundCommand::RevealChanged {
                round_id,
                revealed,
                track,
            } => GameEvent::RevealChanged {
                round_id,
                revealed,
                track,
                timestamp,
            },
            RoundCommand::ClearGuess { round_id } => GameEvent::GuessCleared { round_id, timestamp },
            RoundCommand::RoundCompleted {
                round_id,
                outcome,
                found,
            } => GameEvent::RoundCompleted {
                round_id,
                outcome,
                found,
                timestamp,
            },
            RoundCommand::Celebrate { round_id } => GameEvent::Celebrate { round_id, timestamp },
            RoundCommand::ScheduleSkip { round_id, after } => GameEvent::SkipScheduled {
                round_id,
                after_ms: u64::try_from(after.as_millis()).unwrap_or(u64::MAX),
                timestamp,
            },
            RoundCommand::SkipToNextTrack { round_id } => {
                GameEvent::SkipToNextTrack { round_id, timestamp }
            }
        }
    }
}

/// State machine for one live track at a time
#[derive(Debug, Clone)]
pub struct RoundMachine {
    classifier: FieldClassifier,
    skip_delay: Duration,

    round_id: Uuid,
    phase: RoundPhase,
    track: Option<TrackMetadata>,
    state: RoundState,
    guess: String,
    score: f64,
    outcome: Option<RoundOutcome>,
}

impl Default for RoundMachine {
    fn default() -> Self {
        Self::new(FieldClassifier::default(), DEFAULT_SKIP_DELAY)
    }
}

impl RoundMachine {
    /// Create a machine in `Idle`, waiting for the first track
    pub fn new(classifier: FieldClassifier, skip_delay: Duration) -> Self {
        Self {
            classifier,
            skip_delay,
            round_id: Uuid::new_v4(),
            phase: RoundPhase::Idle,
            track: None,
            state: RoundState::default(),
            guess: String::new(),
            score: 0.0,
            outcome: None,
        }
    }

    pub fn round_id(&self) -> Uuid {
        self.round_id
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn track(&self) -> Option<&TrackMetadata> {
        self.track.as_ref()
    }

    pub fn guess(&self) -> &str {
        &self.guess
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    /// Current glow magnitude; full strength while a guessed round completes
    pub fn glow(&self) -> f64 {
        let celebrating =
            self.phase == RoundPhase::Complete && self.outcome == Some(RoundOutcome::Guessed);
        glow(self.score, celebrating)
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            round_id: self.round_id,
            phase: self.phase,
            track: self.track.clone(),
            guess: self.guess.clone(),
            score: self.score,
            glow: self.glow(),
            state: self.state,
            outcome: self.outcome,
        }
    }

    /// Handle one input and return the resulting commands, in order
    ///
    /// `policy` is read fresh on every call so settings changes apply to
    /// the next completion check.
    pub fn handle(&mut self, input: RoundInput, policy: &CompletionPolicy) -> Vec<RoundCommand> {
        match input {
            RoundInput::TrackChanged(track) => self.on_track_changed(track),
            RoundInput::GuessEdited(text) => self.on_guess_edited(text, policy),
            RoundInput::GiveUp => self.on_give_up(),
            RoundInput::SkipElapsed(round_id) => self.on_skip_elapsed(round_id),
        }
    }

    fn on_track_changed(&mut self, track: Option<TrackMetadata>) -> Vec<RoundCommand> {
        let in_round = matches!(self.phase, RoundPhase::Guessing | RoundPhase::Complete);
        if in_round && track.is_some() && track == self.track {
            debug!("Track unchanged, keeping round {}", self.round_id);
            return Vec::new();
        }
        if track.is_none() && self.phase == RoundPhase::Idle {
            return Vec::new();
        }

        // Any pending skip belongs to the old round id and becomes stale here
        self.round_id = Uuid::new_v4();
        self.state = RoundState::default();
        self.guess.clear();
        self.score = 0.0;
        self.outcome = None;
        self.track = track;

        match &self.track {
            Some(track) => {
                self.phase = RoundPhase::Guessing;
                info!(
                    "Round {} started: {:?} by {:?}",
                    self.round_id, track.name, track.artist
                );
                vec![RoundCommand::RoundStarted {
                    round_id: self.round_id,
                }]
            }
            None => {
                self.phase = RoundPhase::Idle;
                info!("Playback stopped, round {} idle", self.round_id);
                vec![RoundCommand::RoundIdle {
                    round_id: self.round_id,
                }]
            }
        }
    }

    fn on_guess_edited(&mut self, text: String, policy: &CompletionPolicy) -> Vec<RoundCommand> {
        let track = match (self.phase, &self.track) {
            (RoundPhase::Guessing, Some(track)) => track,
            (RoundPhase::Idle, _) | (_, None) => {
                debug!("Ignoring guess without a track");
                return Vec::new();
            }
            _ => {
                // Grace window: keep the text, evaluate nothing
                self.guess = text;
                return Vec::new();
            }
        };

        let classification = if text.is_empty() {
            GuessClassification::empty()
        } else {
            self.classifier.classify(&text, track)
        };
        self.guess = text;
        self.score = classification.score;

        let round_id = self.round_id;
        let mut commands = vec![RoundCommand::GuessEvaluated {
            round_id,
            score: self.score,
            glow: glow(self.score, false),
            matched: classification.matched,
        }];

        let newly_found = match classification.matched {
            Some(field) if self.state.mark_found(field) => {
                info!("Round {}: {} found", round_id, field);
                commands.push(RoundCommand::FieldFound { round_id, field });
                true
            }
            _ => false,
        };

        let completed = newly_found && policy.is_satisfied_by(&self.state.found);

        let newly_revealed = if completed {
            self.state.reveal_all()
        } else {
            self.state.reveal_found()
        };
        if !newly_revealed.is_empty() {
            commands.push(self.reveal_changed());
            self.clear_guess(&mut commands);
        }

        if completed {
            self.complete(RoundOutcome::Guessed, &mut commands);
        }

        commands
    }

    fn on_give_up(&mut self) -> Vec<RoundCommand> {
        if self.phase != RoundPhase::Guessing {
            debug!("Ignoring give up in phase {}", self.phase);
            return Vec::new();
        }

        let mut commands = Vec::new();
        if !self.state.reveal_all().is_empty() {
            commands.push(self.reveal_changed());
        }
        self.clear_guess(&mut commands);
        self.complete(RoundOutcome::GaveUp, &mut commands);
        commands
    }

    fn on_skip_elapsed(&mut self, round_id: Uuid) -> Vec<RoundCommand> {
        if round_id != self.round_id || self.phase != RoundPhase::Complete {
            debug!(
                "Dropping stale skip for round {} (current {} in {})",
                round_id, self.round_id, self.phase
            );
            return Vec::new();
        }

        self.phase = RoundPhase::Advancing;
        self.state.complete = false;
        info!("Round {}: skipping to next track", round_id);
        vec![RoundCommand::SkipToNextTrack { round_id }]
    }

    fn reveal_changed(&self) -> RoundCommand {
        let revealed = self.state.revealed;
        RoundCommand::RevealChanged {
            round_id: self.round_id,
            revealed,
            track: self.track.as_ref().map(|t| t.masked(&revealed)),
        }
    }

    fn clear_guess(&mut self, commands: &mut Vec<RoundCommand>) {
        self.guess.clear();
        self.score = 0.0;
        commands.push(RoundCommand::ClearGuess {
            round_id: self.round_id,
        });
    }

    fn complete(&mut self, outcome: RoundOutcome, commands: &mut Vec<RoundCommand>) {
        let round_id = self.round_id;
        self.phase = RoundPhase::Complete;
        self.state.complete = true;
        self.state.revealed = FieldFlags::ALL;
        self.outcome = Some(outcome);
        info!("Round {} complete ({})", round_id, outcome);

        commands.push(RoundCommand::RoundCompleted {
            round_id,
            outcome,
            found: self.state.found,
        });
        if outcome == RoundOutcome::Guessed {
            commands.push(RoundCommand::Celebrate { round_id });
        }
        commands.push(RoundCommand::ScheduleSkip {
            round_id,
            after: self.skip_delay,
        });
    }
}
