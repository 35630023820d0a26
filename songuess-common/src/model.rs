//! Track and round data model
//!
//! Value types exchanged between the game client and its collaborators:
//! the track provider delivers [`TrackMetadata`], the settings collaborator
//! owns [`GameSettings`] (and with it the [`CompletionPolicy`]), and the round
//! state is expressed as per-field [`FieldFlags`].

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Metadata snapshot of the currently playing track
///
/// Created on every track-change notification and replaced wholesale when
/// the track changes again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    /// Track title as reported by the streaming service
    pub name: String,
    /// Primary artist name
    pub artist: String,
    /// Album name
    pub album: String,
}

impl TrackMetadata {
    pub fn new(
        name: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            artist: artist.into(),
            album: album.into(),
        }
    }

    /// Build from a provider payload that lists several artists
    ///
    /// Only the first artist is guessed against. An empty list yields an
    /// empty artist, which is still a valid comparison target.
    pub fn from_artists<S: AsRef<str>>(
        name: impl Into<String>,
        artists: &[S],
        album: impl Into<String>,
    ) -> Self {
        let artist = artists
            .first()
            .map(|a| a.as_ref().to_string())
            .unwrap_or_default();
        Self::new(name, artist, album)
    }

    /// Copy with every field not set in `revealed` blanked
    ///
    /// This is the only form of the track that may reach the UI.
    pub fn masked(&self, revealed: &FieldFlags) -> TrackMetadata {
        let keep = |field: TrackField| {
            if revealed.get(field) {
                self.field(field).to_string()
            } else {
                String::new()
            }
        };
        TrackMetadata {
            name: keep(TrackField::Name),
            artist: keep(TrackField::Artist),
            album: keep(TrackField::Album),
        }
    }

    /// Raw metadata text for a field
    pub fn field(&self, field: TrackField) -> &str {
        match field {
            TrackField::Name => &self.name,
            TrackField::Artist => &self.artist,
            TrackField::Album => &self.album,
        }
    }
}

/// Guessable part of a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackField {
    Name,
    Artist,
    Album,
}

impl TrackField {
    /// Fixed evaluation priority: name, then artist, then album
    pub const PRIORITY: [TrackField; 3] = [TrackField::Name, TrackField::Artist, TrackField::Album];
}

impl std::fmt::Display for TrackField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackField::Name => write!(f, "name"),
            TrackField::Artist => write!(f, "artist"),
            TrackField::Album => write!(f, "album"),
        }
    }
}

/// One boolean per guessable field
///
/// Used for both the `found` and the `revealed` halves of the round state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFlags {
    pub title: bool,
    pub artist: bool,
    pub album: bool,
}

impl FieldFlags {
    pub const NONE: FieldFlags = FieldFlags {
        title: false,
        artist: false,
        album: false,
    };

    pub const ALL: FieldFlags = FieldFlags {
        title: true,
        artist: true,
        album: true,
    };

    pub fn get(&self, field: TrackField) -> bool {
        match field {
            TrackField::Name => self.title,
            TrackField::Artist => self.artist,
            TrackField::Album => self.album,
        }
    }

    /// Raise the flag for `field`; returns true if it was previously unset
    ///
    /// Flags are never lowered here, only by replacing the whole value.
    pub fn raise(&mut self, field: TrackField) -> bool {
        let slot = match field {
            TrackField::Name => &mut self.title,
            TrackField::Artist => &mut self.artist,
            TrackField::Album => &mut self.album,
        };
        let was_unset = !*slot;
        *slot = true;
        was_unset
    }

    pub fn is_all(&self) -> bool {
        self.title && self.artist && self.album
    }

    /// Fields set here but not in `other`, in priority order
    pub fn difference(&self, other: &FieldFlags) -> Vec<TrackField> {
        TrackField::PRIORITY
            .into_iter()
            .filter(|f| self.get(*f) && !other.get(*f))
            .collect()
    }
}

/// Which found-fields are mandatory for a round to count as complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionPolicy {
    #[serde(rename = "name", default = "default_true")]
    pub require_name: bool,
    #[serde(rename = "artist", default)]
    pub require_artist: bool,
    #[serde(rename = "album", default)]
    pub require_album: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CompletionPolicy {
    fn default() -> Self {
        Self {
            require_name: true,
            require_artist: false,
            require_album: false,
        }
    }
}

impl CompletionPolicy {
    pub fn requires(&self, field: TrackField) -> bool {
        match field {
            TrackField::Name => self.require_name,
            TrackField::Artist => self.require_artist,
            TrackField::Album => self.require_album,
        }
    }

    /// Every required field is found; disabled requirements are ignored
    pub fn is_satisfied_by(&self, found: &FieldFlags) -> bool {
        TrackField::PRIORITY
            .into_iter()
            .all(|f| !self.requires(f) || found.get(f))
    }
}

/// Player preferences owned by the settings collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    /// Player volume (0.0-1.0), consumed by the external player only
    #[serde(default = "default_player_volume")]
    pub player_volume: f64,

    /// Completion policy
    #[serde(default)]
    pub guess_success: CompletionPolicy,
}

fn default_player_volume() -> f64 {
    0.5
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            player_volume: default_player_volume(),
            guess_success: CompletionPolicy::default(),
        }
    }
}

impl GameSettings {
    /// Validate as loaded from a file: volume must already be in range
    pub fn validate(&self) -> Result<()> {
        if !self.player_volume.is_finite() || !(0.0..=1.0).contains(&self.player_volume) {
            return Err(Error::InvalidInput(format!(
                "player_volume must be within 0.0-1.0, got {}",
                self.player_volume
            )));
        }
        Ok(())
    }

    /// Normalize a runtime update: clamp volume, reject non-finite values
    pub fn sanitized(mut self) -> Result<Self> {
        if !self.player_volume.is_finite() {
            return Err(Error::InvalidInput(format!(
                "player_volume must be a finite number, got {}",
                self.player_volume
            )));
        }
        self.player_volume = self.player_volume.clamp(0.0, 1.0);
        Ok(self)
    }
}
