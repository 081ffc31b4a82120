//! # Quizcast
//!
//! Real-time quiz room server over WebSockets.
//!
//! A host creates a room and gets a short numeric pin. Players join with
//! the pin and race to answer multiple-choice questions inside a time
//! limit; faster correct answers earn a bigger bonus. Every subscriber
//! watching the room receives a fresh JSON state snapshot after each
//! change, so lobby screens and player devices stay in sync without
//! polling.
//!
//! The [`QuizServer`] accepts WebSocket subscribers; host and player
//! actions go through the [`GameCoordinator`]:
//!
//! ```rust,no_run
//! use quizcast::{Question, QuizServer};
//!
//! # async fn demo() -> Result<(), quizcast::QuizcastError> {
//! let server = QuizServer::builder().bind("127.0.0.1:9090").build().await?;
//! let game = server.coordinator();
//!
//! let created = game
//!     .create_room(
//!         "alice",
//!         vec![Question::new("2 + 2?", vec!["3".into(), "4".into()], 1)],
//!     )
//!     .await;
//! println!("join with pin {}", created.pin);
//!
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::QuizcastError;
pub use server::{QuizServer, QuizServerBuilder};

pub use quizcast_protocol::{
    ClientMessage, Codec, JsonCodec, PlayerView, ProtocolError, Question,
    RoomPin, ServerMessage, StateSnapshot,
};
pub use quizcast_room::{
    AnswerResult, GameCoordinator, Leaderboard, QuestionAdvanced, RankEntry,
    RoomConfig, RoomCreated, RoomError, RoomJoined, RoomPhase, StateError,
};
pub use quizcast_transport::{Connection, Transport, TransportError};
