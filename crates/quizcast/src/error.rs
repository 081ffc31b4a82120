//! Unified error type for the Quizcast server.

use quizcast_protocol::ProtocolError;
use quizcast_room::RoomError;
use quizcast_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `quizcast` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum QuizcastError {
    /// A transport-level error (connection, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (not found, invalid state).
    #[error(transparent)]
    Room(#[from] RoomError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizcast_protocol::RoomPin;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::SendFailed(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "peer gone",
        ));
        let quizcast_err: QuizcastError = err.into();
        assert!(matches!(quizcast_err, QuizcastError::Transport(_)));
        assert!(quizcast_err.to_string().contains("send failed"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let quizcast_err: QuizcastError = err.into();
        assert!(matches!(quizcast_err, QuizcastError::Protocol(_)));
    }

    #[test]
    fn test_from_room_error() {
        let err = RoomError::RoomNotFound(RoomPin::from("123456"));
        let quizcast_err: QuizcastError = err.into();
        assert!(matches!(quizcast_err, QuizcastError::Room(_)));
        assert!(quizcast_err.to_string().contains("123456"));
    }
}
