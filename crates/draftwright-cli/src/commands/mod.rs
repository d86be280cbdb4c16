//! Command implementations.

pub mod detect;
pub mod replay;

pub use self::detect::execute_detect;
pub use self::replay::{execute_replay, replay_transcript, ReplayReport};
