//! Round lifecycle: per-round state, glow and the round state machine

pub mod machine;
pub mod state;

pub use machine::{RoundCommand, RoundInput, RoundMachine, DEFAULT_SKIP_DELAY};
pub use state::{glow, RoundSnapshot, RoundState};
