//! Core module - shared infrastructure for redis-repl
//!
//! Configuration, error handling, reply types and logging setup.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::Config;
pub use error::{ReplError, Result};
pub use types::*;
