//! songuess-gc library - Game Client module
//!
//! Guess evaluation and the progressive reveal round engine of the song
//! guessing game, plus the async session and HTTP surface that drive them.

pub mod api;
pub mod error;
pub mod guess;
pub mod round;
pub mod session;

pub use api::{build_router, AppState};
pub use error::{Error, Result};
pub use session::GameSession;

use songuess_common::config::TomlConfig;
use songuess_common::events::EventBus;
use std::time::Duration;

use guess::FieldClassifier;
use round::RoundMachine;

/// Build the event bus and spawn a game session from configuration
///
/// Must be called from within a Tokio runtime.
pub fn start_session(config: &TomlConfig) -> GameSession {
    let classifier = FieldClassifier::new(config.guess.match_threshold);
    let machine = RoundMachine::new(classifier, Duration::from_millis(config.guess.skip_delay_ms));
    let events = EventBus::new(config.event_capacity);
    GameSession::spawn(machine, config.settings, events)
}
