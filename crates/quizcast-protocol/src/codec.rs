//! Codec trait and implementations for message serialization.
//!
//! The protocol layer doesn't care how frames become bytes — anything that
//! implements [`Codec`] will do. [`JsonCodec`] is the default: snapshots
//! are read by browser clients, so a human-readable format is the right
//! trade for this workload.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Converts protocol values to and from raw bytes.
///
/// `Send + Sync + 'static` because a codec is shared across connection
/// handler tasks for the life of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

/// A [`Codec`] backed by `serde_json`.
///
/// Behind the `json` feature flag (enabled by default).
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{RoomPin, ServerMessage};

    #[test]
    fn test_json_codec_round_trip() {
        let codec = JsonCodec;
        let msg = ServerMessage::Error {
            code: 404,
            message: format!("room {} not found", RoomPin::from("999999")),
        };
        let bytes = codec.encode(&msg).unwrap();
        let decoded: ServerMessage = codec.decode(&bytes).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_json_codec_decode_malformed_fails() {
        let codec = JsonCodec;
        let result: Result<ServerMessage, _> = codec.decode(b"{truncated");
        assert!(result.is_err());
    }
}
