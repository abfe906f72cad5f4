//! redis-repl - interactive client for Redis-compatible servers
//!
//! Reads commands typed at a terminal, sends them to a server over a single
//! connection and prints the replies.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, error handling and logging
//! - **Client**: The `Connection` seam and its RESP implementation
//! - **CLI**: Tokenizer, command table, reply renderer, connection
//!   lifecycle and the REPL loop
//!
//! # Usage
//!
//! ```rust,no_run
//! use redis_repl::client::{Connection, RespConnection};
//! use redis_repl::{CommandRegistry, Config, Repl};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> redis_repl::Result<()> {
//!     let config = Config::default();
//!     let connection = RespConnection::connect(&config).await?;
//!     let registry = CommandRegistry::new(connection.commands());
//!
//!     let mut repl = Repl::new(&config.server.host, registry, Box::new(connection));
//!     repl.run().await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod client;
pub mod core;

// Re-export commonly used items
pub use cli::{CommandRegistry, ConnectionManager, ExitReason, Repl};
pub use core::{Config, Reply, ReplError, Result};
