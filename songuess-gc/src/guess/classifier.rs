//! Field classification of a guess against the playing track

use serde::Serialize;
use songuess_common::{TrackField, TrackMetadata};
use tracing::debug;

use super::normalize::normalize;
use super::similarity::similarity;

/// Similarity a guess must reach to count as a match
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.97;

/// Per-field similarity of one guess
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FieldScores {
    pub name: f64,
    pub artist: f64,
    pub album: f64,
}

impl FieldScores {
    pub fn get(&self, field: TrackField) -> f64 {
        match field {
            TrackField::Name => self.name,
            TrackField::Artist => self.artist,
            TrackField::Album => self.album,
        }
    }
}

/// Result of classifying one guess
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GuessClassification {
    /// First field (name, artist, album) whose score reached the threshold
    pub matched: Option<TrackField>,

    /// Closeness signal for the UI
    ///
    /// Always the name-field similarity, even when artist or album matched.
    pub score: f64,

    /// Similarity of every field, for diagnostics
    pub scores: FieldScores,
}

impl GuessClassification {
    /// Classification of an empty guess
    pub fn empty() -> Self {
        Self {
            matched: None,
            score: 0.0,
            scores: FieldScores::default(),
        }
    }

    pub fn is_match(&self) -> bool {
        self.matched.is_some()
    }
}

/// Classifies guesses against a track with one threshold for all fields
#[derive(Debug, Clone, Copy)]
pub struct FieldClassifier {
    threshold: f64,
}

impl Default for FieldClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_THRESHOLD)
    }
}

impl FieldClassifier {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Classify `guess` against the name, artist and album of `track`
    ///
    /// A guess that is empty after normalization never matches and scores
    /// `0.0`; this keeps an empty guess from matching an empty field.
    pub fn classify(&self, guess: &str, track: &TrackMetadata) -> GuessClassification {
        let guess = normalize(guess);
        if guess.is_empty() {
            return GuessClassification::empty();
        }

        let scores = FieldScores {
            name: similarity(&guess, &normalize(&track.name)),
            artist: similarity(&guess, &normalize(&track.artist)),
            album: similarity(&guess, &normalize(&track.album)),
        };

        let matched = TrackField::PRIORITY
            .into_iter()
            .find(|field| scores.get(*field) >= self.threshold);

        debug!(
            "Classified guess {:?}: name={:.3} artist={:.3} album={:.3} matched={:?}",
            guess,
            scores.name,
            scores.artist,
            scores.album,
            matched
        );

        GuessClassification {
            matched,
            score: scores.name,
            scores,
        }
    }
}
