//! Shared types used across redis-repl modules

/// A value produced by a dispatched command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Plain string reply
    Text(String),
    /// Structured reply: nested arrays/maps of primitives
    Value(serde_json::Value),
}

impl Reply {
    /// Create a text reply
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Serialize for writing to a file.
    ///
    /// Strings are written verbatim, everything else as compact JSON.
    pub fn to_file_contents(&self) -> serde_json::Result<String> {
        match self {
            Reply::Text(s) => Ok(s.clone()),
            Reply::Value(v) => serde_json::to_string(v),
        }
    }
}

impl From<serde_json::Value> for Reply {
    fn from(value: serde_json::Value) -> Self {
        Self::Value(value)
    }
}

/// Result of a command handler
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Command completed, with or without a reply
    Reply(Option<Reply>),
    /// Release the connection and leave the REPL
    Exit,
}

impl CommandOutcome {
    /// Completed without a reply
    pub fn none() -> Self {
        Self::Reply(None)
    }

    /// Completed with a reply
    pub fn reply(reply: impl Into<Reply>) -> Self {
        Self::Reply(Some(reply.into()))
    }
}
