//! Per-connection subscriber handler.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Receive Subscribe → resolve the pin
//!   2. Send the current state snapshot (the hub pushes it on subscribe)
//!   3. Loop: forward every snapshot the hub broadcasts for that room
//!
//! Subscribers are read-only: anything the client sends after Subscribe
//! is ignored. Host and player actions arrive through the coordinator,
//! not through this socket.

use std::sync::Arc;
use std::time::Duration;

use quizcast_protocol::{ClientMessage, Codec, ProtocolError, RoomPin, ServerMessage};
use quizcast_room::{GameCoordinator, SubscriberId};
use quizcast_transport::{Connection, WebSocketConnection};

use crate::server::ServerState;
use crate::QuizcastError;

/// How long a client has to send its Subscribe frame.
const SUBSCRIBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Drop guard that removes the subscription when the handler exits.
///
/// This ensures cleanup happens even if the handler errors out. Since
/// `Drop` is synchronous, we spawn a fire-and-forget task for the async
/// hub call.
struct SubscriberGuard {
    pin: RoomPin,
    id: SubscriberId,
    coordinator: GameCoordinator,
}

impl Drop for SubscriberGuard {
    fn drop(&mut self) {
        let pin = self.pin.clone();
        let id = self.id;
        let coordinator = self.coordinator.clone();
        tokio::spawn(async move {
            coordinator.hub().unsubscribe(&pin, id).await;
        });
    }
}

/// Handles a single subscriber connection from accept to close.
pub(crate) async fn handle_subscriber<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), QuizcastError> {
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let pin = receive_subscribe(&conn, &state).await?;

    let (sub_id, mut snapshots) =
        match state.coordinator.hub().subscribe(&pin).await {
            Ok(sub) => sub,
            Err(e) => {
                send_error(&conn, &state.codec, 404, &e.to_string()).await?;
                let _ = conn.close().await;
                return Ok(());
            }
        };

    tracing::info!(%conn_id, %pin, subscriber = %sub_id, "subscriber attached");
    let _guard = SubscriberGuard {
        pin: pin.clone(),
        id: sub_id,
        coordinator: state.coordinator.clone(),
    };

    loop {
        tokio::select! {
            snapshot = snapshots.recv() => {
                let Some(snapshot) = snapshot else {
                    // Hub dropped our channel, nothing left to forward.
                    break;
                };
                let frame = state.codec.encode(&ServerMessage::State(snapshot))?;
                if conn.send(&frame).await.is_err() {
                    break;
                }
            }
            inbound = conn.recv() => {
                match inbound {
                    Ok(Some(_)) => {
                        tracing::trace!(%conn_id, "ignoring frame from subscriber");
                    }
                    Ok(None) => {
                        tracing::debug!(%conn_id, %pin, "subscriber closed");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%conn_id, error = %e, "recv error");
                        break;
                    }
                }
            }
        }
    }

    // _guard drops here → hub unsubscribe fires.
    Ok(())
}

/// Receives and validates the Subscribe frame, returning the pin.
async fn receive_subscribe<C: Codec>(
    conn: &WebSocketConnection,
    state: &Arc<ServerState<C>>,
) -> Result<RoomPin, QuizcastError> {
    let data =
        match tokio::time::timeout(SUBSCRIBE_TIMEOUT, conn.recv()).await {
            Ok(Ok(Some(data))) => data,
            Ok(Ok(None)) => {
                return Err(QuizcastError::Protocol(
                    ProtocolError::InvalidMessage(
                        "connection closed before Subscribe".into(),
                    ),
                ));
            }
            Ok(Err(e)) => return Err(QuizcastError::Transport(e)),
            Err(_) => {
                return Err(QuizcastError::Protocol(
                    ProtocolError::InvalidMessage("Subscribe timed out".into()),
                ));
            }
        };

    match state.codec.decode(&data) {
        Ok(ClientMessage::Subscribe { pin }) => Ok(pin),
        Err(e) => {
            send_error(conn, &state.codec, 400, "expected Subscribe").await?;
            Err(QuizcastError::Protocol(e))
        }
    }
}

/// Sends a `ServerMessage::Error` frame to the client.
async fn send_error(
    conn: &WebSocketConnection,
    codec: &impl Codec,
    code: u16,
    message: &str,
) -> Result<(), QuizcastError> {
    let frame = codec.encode(&ServerMessage::Error {
        code,
        message: message.to_string(),
    })?;
    conn.send(&frame).await.map_err(QuizcastError::Transport)?;
    Ok(())
}
