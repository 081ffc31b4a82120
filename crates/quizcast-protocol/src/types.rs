//! Core wire types for the Quizcast protocol.
//!
//! Everything here is serialized to JSON and sent to subscribed clients,
//! so the serde attributes define the wire contract. The snapshot shape is
//! intentionally flat — one self-contained frame per broadcast, no deltas.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// The short numeric code identifying a room.
///
/// A newtype over `String` rather than an integer: pins are user-facing
/// codes with leading zeros ("042913" is a valid pin), so string identity
/// is the honest representation.
///
/// `#[serde(transparent)]` serializes a `RoomPin` as the bare string, so
/// `RoomPin("483920")` becomes `"483920"` in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomPin(String);

impl RoomPin {
    /// Wraps a raw pin string.
    pub fn new(pin: impl Into<String>) -> Self {
        Self(pin.into())
    }

    /// Returns the pin as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoomPin {
    fn from(pin: &str) -> Self {
        Self(pin.to_string())
    }
}

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

/// A single quiz question, fixed at room creation.
///
/// This is the *authoring* representation: it carries `correct_index`,
/// which is why a `Question` is never embedded in a [`StateSnapshot`] —
/// snapshots copy only `text` and `choices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The question text shown to players.
    pub text: String,
    /// Answer choices, in display order.
    pub choices: Vec<String>,
    /// Index into `choices` of the correct answer.
    pub correct_index: usize,
}

impl Question {
    /// Convenience constructor for literal question sets.
    pub fn new(
        text: impl Into<String>,
        choices: Vec<String>,
        correct_index: usize,
    ) -> Self {
        Self {
            text: text.into(),
            choices,
            correct_index,
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One player's public state inside a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Player name — the sole identity key within a room.
    pub name: String,
    /// Accumulated score. Never decreases.
    pub score: u32,
    /// Tri-state: `None` until the player answers in the current round.
    pub last_answer_correct: Option<bool>,
}

/// A complete, consistent view of one room at one instant.
///
/// Every broadcast sends an identical copy of one snapshot to all
/// subscribers of a room; a client can always render from the latest
/// frame alone. Note what is *absent*: the correct answer index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Room pin.
    pub pin: RoomPin,
    /// Whether the host has started the game.
    pub started: bool,
    /// 0-based index of the current question.
    pub current_question: usize,
    /// Current question text ("" if the room has no questions).
    pub question: String,
    /// Current answer choices (empty if the room has no questions).
    pub choices: Vec<String>,
    /// Whether the current question is locked against new answers.
    pub question_locked: bool,
    /// Whole seconds remaining in the round, 0 once expired or before
    /// the first round starts.
    pub seconds_left: u64,
    /// The configured round duration in seconds.
    pub question_duration: u64,
    /// How many players answered in the current round.
    pub answered_count: usize,
    /// All players, ordered by join order.
    pub players: Vec<PlayerView>,
}

// ---------------------------------------------------------------------------
// Subscription messages
// ---------------------------------------------------------------------------

/// Messages a live-subscription client may send.
///
/// Internally tagged (`{"type": "Subscribe", "pin": "483920"}`) — the
/// format browser clients work with most naturally. `Subscribe` is the
/// only meaningful inbound message; anything sent after it is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// "Send me this room's state, now and on every change."
    Subscribe { pin: RoomPin },
}

/// Messages the server pushes to a subscribed client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// A full room snapshot.
    State(StateSnapshot),

    /// Something went wrong. `code` follows HTTP conventions
    /// (404 = room not found, 400 = bad request).
    Error { code: u16, message: String },
}

// =========================================================================
// Tests
// =========================================================================
