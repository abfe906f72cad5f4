//! CLI module - the interactive front end
//!
//! Tokenizer, command table, reply renderer, connection lifecycle and the
//! REPL loop that ties them together.

pub mod commands;
pub mod connection;
pub mod render;
pub mod repl;
pub mod tokenizer;

pub use commands::CommandRegistry;
pub use connection::ConnectionManager;
pub use repl::{ExitReason, Repl};
