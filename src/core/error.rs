//! Custom error types for redis-repl
//!
//! Connection-level failures are fatal to the process; everything else is
//! reported for the single command that produced it.

use thiserror::Error;

/// Main error type for redis-repl operations
#[derive(Error, Debug)]
pub enum ReplError {
    /// Could not reach or handshake with the server
    #[error("Connection error: {0}")]
    Connection(String),

    /// Error reply sent back by the server for a command
    #[error("{0}")]
    Server(String),

    /// Malformed data on the wire
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Wrong arguments for a local command
    #[error("{0}")]
    Usage(String),

    /// SAVE issued before any reply was displayed
    #[error("No reply to save")]
    NoReply,

    /// Connection was detached and can no longer carry commands
    #[error("Connection closed")]
    Closed,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// TLS setup or handshake errors
    #[error("TLS error: {0}")]
    Tls(#[from] native_tls::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for redis-repl operations
pub type Result<T> = std::result::Result<T, ReplError>;

impl ReplError {
    /// Create a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a server error
    pub fn server(msg: impl Into<String>) -> Self {
        Self::Server(msg.into())
    }

    /// Create a protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a usage error
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error must end the session.
    ///
    /// Wire-level `Protocol` and `Io` failures are reported by the connection
    /// as `Connection`; a bare `Io` here is local (SAVE, the terminal).
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Tls(_) | Self::Closed)
    }
}
