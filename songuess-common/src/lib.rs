//! # Songuess Common Library
//!
//! Shared code for the Songuess game client and its collaborators:
//! - Track and round data model (TrackMetadata, flags, completion policy)
//! - Event types (GameEvent enum) and the EventBus
//! - Configuration loading (TOML bootstrap file)
//! - Error types

pub mod config;
pub mod error;
pub mod events;
pub mod model;

pub use error::{Error, Result};
pub use model::{CompletionPolicy, FieldFlags, GameSettings, TrackField, TrackMetadata};
