//! Wire protocol for Quizcast.
//!
//! This crate defines the "language" that quiz clients and the server speak:
//!
//! - **Types** ([`StateSnapshot`], [`ClientMessage`], [`ServerMessage`],
//!   [`RoomPin`], [`Question`]) — the structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! The protocol layer sits between transport (raw bytes) and the room core
//! (game state). It doesn't know about connections or rooms — it only knows
//! how to describe and serialize messages.
//!
//! A hard rule for this domain: a question's `correct_index` never appears
//! in any serialized snapshot. Clients learn correctness only through the
//! submit-answer response of the request layer.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientMessage, PlayerView, Question, RoomPin, ServerMessage,
    StateSnapshot,
};
