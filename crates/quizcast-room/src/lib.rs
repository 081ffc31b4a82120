//! Room management for Quizcast: the room state machine, scoring,
//! round timers, and snapshot fan-out.
//!
//! The [`GameCoordinator`] is the crate's front door. It owns the
//! [`RoomRegistry`] (pin allocation and lookup), the [`BroadcastHub`]
//! (subscriber fan-out), and the [`RoundTimer`] (per-round auto-lock),
//! and exposes one async method per host or player action. Transports
//! call the coordinator; nothing else in the crate is aware of the
//! network.

mod config;
mod coordinator;
mod error;
mod hub;
mod pin;
mod registry;
mod room;
pub mod scoring;
mod timer;

pub use config::{RoomConfig, RoomPhase};
pub use coordinator::{
    GameCoordinator, Leaderboard, QuestionAdvanced, RoomCreated, RoomJoined,
};
pub use error::{RoomError, StateError};
pub use hub::{BroadcastHub, SubscriberId};
pub use pin::PinGenerator;
pub use registry::RoomRegistry;
pub use room::{AdvanceResult, AnswerResult, Player, RankEntry, Room, RoundStart};
pub use timer::RoundTimer;
