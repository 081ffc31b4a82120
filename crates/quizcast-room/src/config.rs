//! Room configuration and the round phase machine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Configuration shared by every room a coordinator creates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoomConfig {
    /// How long each question stays open for answers.
    #[serde(with = "duration_secs")]
    pub question_duration: Duration,

    /// Number of decimal digits in a room pin.
    pub pin_length: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            question_duration: Duration::from_secs(20),
            pin_length: 6,
        }
    }
}

impl RoomConfig {
    /// Shortest pin that keeps accidental collisions rare.
    pub const MIN_PIN_LENGTH: usize = 4;

    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// Called by `GameCoordinator::new`. A zero question duration would
    /// lock every round before anyone could answer, so it is rejected too.
    pub fn validated(mut self) -> Self {
        if self.pin_length < Self::MIN_PIN_LENGTH {
            tracing::warn!(
                len = self.pin_length,
                min = Self::MIN_PIN_LENGTH,
                "pin_length below minimum, clamping"
            );
            self.pin_length = Self::MIN_PIN_LENGTH;
        }
        if self.question_duration.is_zero() {
            tracing::warn!("question_duration is zero, using default");
            self.question_duration = Self::default().question_duration;
        }
        self
    }
}

/// Serialize the round duration as whole seconds, matching the wire format.
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        d: &Duration,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}

// ---------------------------------------------------------------------------
// RoomPhase
// ---------------------------------------------------------------------------

/// The lifecycle phase of a room, derived from its round state.
///
/// ```text
/// Lobby → RoundActive ⇄ RoundLocked → Finished
/// ```
///
/// - **Lobby**: created, players joining, host hasn't started.
/// - **RoundActive**: a question is open; answers are accepted until the
///   deadline or an explicit lock.
/// - **RoundLocked**: the question closed (timer or late submit); waiting
///   for the host to advance.
/// - **Finished**: the host advanced past the last question. Terminal.
///
/// Unlike the flags it is derived from, the phase never moves backwards
/// within a round; a new round (host advance or restart) is the only way
/// back to `RoundActive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomPhase {
    Lobby,
    RoundActive,
    RoundLocked,
    Finished,
}

impl RoomPhase {
    /// Returns `true` if submits are accepted in this phase.
    pub fn accepts_answers(&self) -> bool {
        matches!(self, Self::RoundActive)
    }

    /// Returns `true` once no further rounds can start.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished)
    }
}

impl std::fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lobby => write!(f, "Lobby"),
            Self::RoundActive => write!(f, "RoundActive"),
            Self::RoundLocked => write!(f, "RoundLocked"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_config_default() {
        let config = RoomConfig::default();
        assert_eq!(config.question_duration, Duration::from_secs(20));
        assert_eq!(config.pin_length, 6);
    }

    #[test]
    fn test_validated_clamps_short_pins() {
        let config = RoomConfig {
            pin_length: 1,
            ..RoomConfig::default()
        }
        .validated();
        assert_eq!(config.pin_length, RoomConfig::MIN_PIN_LENGTH);
    }

    #[test]
    fn test_validated_rejects_zero_duration() {
        let config = RoomConfig {
            question_duration: Duration::ZERO,
            ..RoomConfig::default()
        }
        .validated();
        assert_eq!(config.question_duration, Duration::from_secs(20));
    }

    #[test]
    fn test_phase_accepts_answers_only_when_active() {
        assert!(!RoomPhase::Lobby.accepts_answers());
        assert!(RoomPhase::RoundActive.accepts_answers());
        assert!(!RoomPhase::RoundLocked.accepts_answers());
        assert!(!RoomPhase::Finished.accepts_answers());
    }

    #[test]
    fn test_phase_terminal() {
        assert!(RoomPhase::Finished.is_terminal());
        assert!(!RoomPhase::RoundLocked.is_terminal());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(RoomPhase::Lobby.to_string(), "Lobby");
        assert_eq!(RoomPhase::RoundActive.to_string(), "RoundActive");
    }
}
