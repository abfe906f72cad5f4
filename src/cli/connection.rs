//! Connection lifecycle
//!
//! A small state machine decides when the REPL may start. The loop is
//! started on the first transition into `Ready` and never again; any
//! connection error is terminal.

use crate::client::RespConnection;
use crate::core::{Config, ReplError};

/// Where the connection is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Initial attempt in progress
    Connecting,
    /// Handshake done, commands may flow
    Ready,
    /// Transport dropped after having been ready
    Reconnecting,
    /// Failed; terminal
    Error(String),
    /// Released by EXIT/QUIT; terminal
    Closed,
}

/// Something the transport reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Ready,
    /// Transport dropped but may come back. Only a reconnecting transport
    /// emits this; `RespConnection` never does.
    Disconnected,
    Error(String),
    Closed,
}

/// What the caller has to do after an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// First time ready: start the REPL
    StartRepl,
    /// Ready again after a drop: keep the running REPL. Follows
    /// `Disconnected`, so unreachable with `RespConnection`.
    Resumed,
    /// Report and terminate
    Fatal(String),
    /// Connection released, exit normally
    Shutdown,
    /// Nothing to do
    Ignored,
}

/// Owns the connection state for the process
#[derive(Debug)]
pub struct ConnectionManager {
    state: ConnectionState,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Connecting,
        }
    }

    /// Current state
    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Apply an event and say what should happen next
    pub fn handle(&mut self, event: ConnectionEvent) -> Transition {
        let transition = match (self.state.clone(), event) {
            (ConnectionState::Error(_) | ConnectionState::Closed, event) => {
                tracing::debug!(?event, state = ?self.state, "event after terminal state");
                return Transition::Ignored;
            }
            (ConnectionState::Connecting, ConnectionEvent::Ready) => {
                self.state = ConnectionState::Ready;
                Transition::StartRepl
            }
            (ConnectionState::Reconnecting, ConnectionEvent::Ready) => {
                self.state = ConnectionState::Ready;
                Transition::Resumed
            }
            (ConnectionState::Ready, ConnectionEvent::Ready) => Transition::Ignored,
            (ConnectionState::Ready, ConnectionEvent::Disconnected) => {
                self.state = ConnectionState::Reconnecting;
                Transition::Ignored
            }
            (_, ConnectionEvent::Disconnected) => Transition::Ignored,
            (_, ConnectionEvent::Error(msg)) => {
                self.state = ConnectionState::Error(msg.clone());
                Transition::Fatal(msg)
            }
            (_, ConnectionEvent::Closed) => {
                self.state = ConnectionState::Closed;
                Transition::Shutdown
            }
        };
        tracing::debug!(state = ?self.state, ?transition, "connection transition");
        transition
    }

    /// Make the single connection attempt.
    ///
    /// Returns the connection when the REPL should start, or the message to
    /// report when the process must stop.
    pub async fn establish(&mut self, config: &Config) -> Result<RespConnection, String> {
        match RespConnection::connect(config).await {
            Ok(connection) => match self.handle(ConnectionEvent::Ready) {
                Transition::StartRepl => Ok(connection),
                other => Err(format!("unexpected connection transition: {:?}", other)),
            },
            Err(e) => Err(self.fail(&e)),
        }
    }

    /// Record a fatal error and return the message to report
    pub fn fail(&mut self, error: &ReplError) -> String {
        match self.handle(ConnectionEvent::Error(error.to_string())) {
            Transition::Fatal(msg) => msg,
            _ => error.to_string(),
        }
    }

    /// Record an orderly close
    pub fn close(&mut self) -> Transition {
        self.handle(ConnectionEvent::Closed)
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}
