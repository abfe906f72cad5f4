//! Client module - the protocol client the REPL talks through
//!
//! The REPL only sees the [`Connection`] trait; [`RespConnection`] is the
//! TCP/TLS implementation used by the binary.

pub mod codec;
pub mod commands;
pub mod resp;
pub mod traits;

pub use resp::RespConnection;
pub use traits::Connection;
