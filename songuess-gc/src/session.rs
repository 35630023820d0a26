//! Game session driver
//!
//! Runs the [`RoundMachine`] on a dedicated task. All inputs (HTTP requests,
//! expired skip timers) arrive through one unbounded channel and are handled
//! strictly in order, so the machine itself needs no lock. After every input
//! the session publishes a fresh [`RoundSnapshot`] and only then broadcasts
//! the resulting [`GameEvent`]s on the [`EventBus`], so a subscriber reacting
//! to an event always reads a snapshot at least as new as that event.

use std::sync::Arc;
use std::time::Duration;

use songuess_common::events::{EventBus, GameEvent};
use songuess_common::{GameSettings, TrackMetadata};
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::round::{RoundCommand, RoundInput, RoundMachine, RoundSnapshot};

/// Message delivered to the session task
struct SessionMessage {
    input: RoundInput,
    reply: Option<oneshot::Sender<RoundSnapshot>>,
}

/// Handle to a running game session
///
/// Cheap to clone; the task stops once every handle is dropped.
#[derive(Clone)]
pub struct GameSession {
    tx: mpsc::UnboundedSender<SessionMessage>,
    snapshot: Arc<RwLock<RoundSnapshot>>,
    settings: Arc<RwLock<GameSettings>>,
    events: EventBus,
}

impl GameSession {
    /// Spawn the session task on the current Tokio runtime
    pub fn spawn(machine: RoundMachine, settings: GameSettings, events: EventBus) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let snapshot = Arc::new(RwLock::new(machine.snapshot()));
        let settings = Arc::new(RwLock::new(settings));

        let task = SessionTask {
            machine,
            rx,
            timer_tx: tx.downgrade(),
            snapshot: Arc::clone(&snapshot),
            settings: Arc::clone(&settings),
            events: events.clone(),
        };
        tokio::spawn(task.run());

        Self {
            tx,
            snapshot,
            settings,
            events,
        }
    }

    /// Report a track change from the track provider (`None` when stopped)
    pub async fn track_changed(&self, track: Option<TrackMetadata>) -> Result<RoundSnapshot> {
        self.request(RoundInput::TrackChanged(track)).await
    }

    /// Report the full guess text after an edit
    pub async fn guess_edited(&self, text: impl Into<String>) -> Result<RoundSnapshot> {
        self.request(RoundInput::GuessEdited(text.into())).await
    }

    pub async fn give_up(&self) -> Result<RoundSnapshot> {
        self.request(RoundInput::GiveUp).await
    }

    /// Latest published round snapshot
    pub async fn snapshot(&self) -> RoundSnapshot {
        self.snapshot.read().await.clone()
    }

    pub async fn settings(&self) -> GameSettings {
        *self.settings.read().await
    }

    /// Replace the player settings
    ///
    /// Volume is clamped into range; the new completion policy applies from
    /// the next completion check.
    pub async fn update_settings(&self, settings: GameSettings) -> Result<GameSettings> {
        let settings = settings.sanitized()?;
        *self.settings.write().await = settings;
        info!(
            "Settings updated: volume={:.2} policy={:?}",
            settings.player_volume, settings.guess_success
        );
        self.events.emit_lossy(GameEvent::SettingsChanged {
            settings,
            timestamp: chrono::Utc::now(),
        });
        Ok(settings)
    }

    /// Subscribe to outbound game events
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    async fn request(&self, input: RoundInput) -> Result<RoundSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(SessionMessage {
                input,
                reply: Some(reply_tx),
            })
            .map_err(|_| Error::SessionClosed)?;
        reply_rx.await.map_err(|_| Error::SessionClosed)
    }
}

/// State owned by the session task
struct SessionTask {
    machine: RoundMachine,
    rx: mpsc::UnboundedReceiver<SessionMessage>,
    timer_tx: mpsc::WeakUnboundedSender<SessionMessage>,
    snapshot: Arc<RwLock<RoundSnapshot>>,
    settings: Arc<RwLock<GameSettings>>,
    events: EventBus,
}

impl SessionTask {
    async fn run(mut self) {
        debug!("Game session started");

        while let Some(message) = self.rx.recv().await {
            let policy = self.settings.read().await.guess_success;
            let commands = self.machine.handle(message.input, &policy);

            let snapshot = self.machine.snapshot();
            *self.snapshot.write().await = snapshot.clone();

            for command in &commands {
                self.execute(command);
            }

            if let Some(reply) = message.reply {
                // Caller may have given up waiting
                let _ = reply.send(snapshot);
            }
        }

        debug!("Game session stopped");
    }

    fn execute(&self, command: &RoundCommand) {
        if let RoundCommand::ScheduleSkip { round_id, after } = command {
            self.schedule_skip(*round_id, *after);
        }
        self.events.emit_lossy(command.to_event(chrono::Utc::now()));
    }

    fn schedule_skip(&self, round_id: Uuid, after: Duration) {
        let timer_tx = self.timer_tx.clone();
        debug!("Skip for round {} scheduled in {:?}", round_id, after);

        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let Some(tx) = timer_tx.upgrade() else {
                return;
            };
            let message = SessionMessage {
                input: RoundInput::SkipElapsed(round_id),
                reply: None,
            };
            if tx.send(message).is_err() {
                warn!("Session closed before skip for round {} fired", round_id);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use songuess_common::events::RoundPhase;

    fn session() -> GameSession {
        GameSession::spawn(RoundMachine::default(), GameSettings::default(), EventBus::new(100))
    }

    #[tokio::test]
    async fn test_snapshot_reflects_inputs() {
        let session = session();
        assert_eq!(session.snapshot().await.phase, RoundPhase::Idle);

        let track = TrackMetadata::new("Let It Be", "The Beatles", "Let It Be");
        let snapshot = session.track_changed(Some(track.clone())).await.unwrap();
        assert_eq!(snapshot.phase, RoundPhase::Guessing);
        assert_eq!(snapshot.track, Some(track));
        assert_eq!(session.snapshot().await, snapshot);
    }

    #[tokio::test]
    async fn test_update_settings_clamps_and_broadcasts() {
        let session = session();
        let mut rx = session.subscribe();

        let updated = session
            .update_settings(GameSettings {
                player_volume: 1.5,
                ..GameSettings::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.player_volume, 1.0);
        assert_eq!(session.settings().await.player_volume, 1.0);
        assert_eq!(rx.recv().await.unwrap().event_type(), "SettingsChanged");
    }

    #[tokio::test]
    async fn test_update_settings_rejects_nan() {
        let session = session();
        let result = session
            .update_settings(GameSettings {
                player_volume: f64::NAN,
                ..GameSettings::default()
            })
            .await;
        assert!(result.is_err());
        assert_eq!(session.settings().await.player_volume, 0.5);
    }
}
