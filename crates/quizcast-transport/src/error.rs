//! Error types for the transport layer.

/// Errors that can occur while moving frames over a transport.
///
/// Each variant wraps the underlying I/O error. Subscriber handlers
/// treat all of these as "this client is gone": log and drop the
/// connection, never the server.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Sending a frame failed; the peer has likely hung up.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving a frame failed mid-stream.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Binding the listener or accepting a connection failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),
}
