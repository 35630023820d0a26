//! Guess evaluation: normalization, similarity scoring and field classification
//!
//! All functions here are pure and allocation-light, safe to run on every
//! keystroke without debouncing.

pub mod classifier;
pub mod normalize;
pub mod similarity;

pub use classifier::{FieldClassifier, FieldScores, GuessClassification, DEFAULT_MATCH_THRESHOLD};
pub use normalize::normalize;
pub use similarity::similarity;
