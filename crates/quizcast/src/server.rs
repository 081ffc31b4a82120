//! `QuizServer` builder and server loop.
//!
//! This is the entry point for running a Quizcast server. It ties the
//! layers together: transport → protocol → coordinator.

use std::sync::Arc;

use quizcast_protocol::{Codec, JsonCodec};
use quizcast_room::{GameCoordinator, RoomConfig};
use quizcast_transport::{Transport, WebSocketTransport};

use crate::handler::handle_subscriber;
use crate::QuizcastError;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The
/// coordinator is internally shared, so no outer lock is needed.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) coordinator: GameCoordinator,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Quizcast server.
///
/// # Example
///
/// ```rust,ignore
/// let server = QuizServer::builder()
///     .bind("0.0.0.0:9090")
///     .build()
///     .await?;
/// let game = server.coordinator();
/// server.run().await
/// ```
pub struct QuizServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
}

impl QuizServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:9090".to_string(),
            room_config: RoomConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the room configuration.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Builds and starts the server.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`, which is what browser
    /// quiz clients speak.
    pub async fn build(self) -> Result<QuizServer<JsonCodec>, QuizcastError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            coordinator: GameCoordinator::new(self.room_config),
            codec: JsonCodec,
        });

        Ok(QuizServer { transport, state })
    }
}

impl Default for QuizServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Quizcast server.
///
/// Call [`run()`](Self::run) to start accepting subscriber connections.
/// Host and player actions go through the [`GameCoordinator`] returned
/// by [`coordinator()`](Self::coordinator).
pub struct QuizServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl QuizServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> QuizServerBuilder {
        QuizServerBuilder::new()
    }
}

impl<C> QuizServer<C>
where
    C: Codec,
{
    /// A handle to the coordinator driving this server's rooms.
    pub fn coordinator(&self) -> GameCoordinator {
        self.state.coordinator.clone()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr, QuizcastError> {
        Ok(self.transport.local_addr()?)
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a subscriber handler task
    /// for each. Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), QuizcastError> {
        tracing::info!("Quizcast server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_subscriber(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
