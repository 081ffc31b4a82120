//! Error types for the room layer.

use quizcast_protocol::RoomPin;

/// Errors that can occur during room operations.
///
/// Two families, matching what the request layer needs to distinguish:
/// something is *missing* ([`RoomNotFound`](Self::RoomNotFound),
/// [`PlayerNotFound`](Self::PlayerNotFound)), or the operation is not
/// valid in the room's current phase ([`InvalidState`](Self::InvalidState)).
/// None of these ever crash the process; retrying is the caller's call.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No room with this pin exists.
    #[error("room {0} not found")]
    RoomNotFound(RoomPin),

    /// The named player never joined this room.
    #[error("player {0} not found")]
    PlayerNotFound(String),

    /// The room's round phase doesn't allow this operation.
    ///
    /// Beware: `TimeUp` is a *side-effecting* failure — a late submit
    /// locks the question before reporting the error, and the lock
    /// persists. Callers must not assume failure implies no state change.
    #[error("invalid state: {0}")]
    InvalidState(#[from] StateError),
}

/// The specific phase violation behind a [`RoomError::InvalidState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// The host hasn't started the game yet.
    #[error("game not started")]
    NotStarted,

    /// The current question no longer accepts answers.
    #[error("question locked")]
    Locked,

    /// This player already answered in the current round.
    #[error("already answered")]
    AlreadyAnswered,

    /// The round deadline passed before the answer arrived.
    #[error("time is up")]
    TimeUp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_error_converts_into_room_error() {
        let err: RoomError = StateError::AlreadyAnswered.into();
        assert!(matches!(
            err,
            RoomError::InvalidState(StateError::AlreadyAnswered)
        ));
        assert!(err.to_string().contains("already answered"));
    }

    #[test]
    fn test_not_found_message_includes_pin() {
        let err = RoomError::RoomNotFound(RoomPin::from("123456"));
        assert_eq!(err.to_string(), "room 123456 not found");
    }
}
