//! Connection trait for abstracting the protocol client
//!
//! Lets the REPL run against a real server or a scripted stand-in.

use async_trait::async_trait;

use crate::core::{Reply, Result};

/// A live connection to a key-value server
#[async_trait]
pub trait Connection: Send {
    /// Command names the server accepts, in enumeration order
    fn commands(&self) -> Vec<String>;

    /// Send one command and wait for its reply.
    ///
    /// `Ok(None)` is a nil reply. Server-side errors come back as
    /// [`ReplError::Server`](crate::core::ReplError::Server).
    async fn send_command(&mut self, name: &str, args: &[String]) -> Result<Option<Reply>>;

    /// Drop the transport without waiting on outstanding work
    fn detach(&mut self);
}
