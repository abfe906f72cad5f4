//! Interactive REPL for redis-repl
//!
//! Reads one line at a time, dispatches it through the command table and
//! prints the reply. The next prompt is only written once the current
//! command has completed.

use std::io::{self, Write};

use colored::Colorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::cli::commands::{CommandContext, CommandRegistry, Resolved, EMPTY_LINE};
use crate::cli::render::render;
use crate::cli::tokenizer::tokenize;
use crate::client::Connection;
use crate::core::{CommandOutcome, Reply, Result};

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Input stream closed
    EndOfInput,
    /// EXIT or QUIT
    Quit,
}

/// Interactive REPL (Read-Eval-Print Loop)
pub struct Repl {
    prompt: String,
    registry: CommandRegistry,
    connection: Box<dyn Connection>,
    last_reply: Option<Reply>,
    color: bool,
}

impl Repl {
    /// Create a REPL over an established connection
    pub fn new(
        hostname: &str,
        registry: CommandRegistry,
        connection: Box<dyn Connection>,
    ) -> Self {
        Self {
            prompt: format!("{}> ", hostname),
            registry,
            connection,
            last_reply: None,
            color: false,
        }
    }

    /// Enable or disable colored output
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Reply shown by the most recent command, if any
    pub fn last_reply(&self) -> Option<&Reply> {
        self.last_reply.as_ref()
    }

    /// Run on the process terminal
    pub async fn run(&mut self) -> Result<ExitReason> {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = io::stdout();
        let mut stderr = io::stderr();
        self.run_with(stdin, &mut stdout, &mut stderr).await
    }

    /// Run until end of input or an exit command.
    ///
    /// Replies go to `out`, diagnostics to `err`. Connection-level failures
    /// end the loop with an error.
    pub async fn run_with<R, O, E>(
        &mut self,
        input: R,
        out: &mut O,
        err: &mut E,
    ) -> Result<ExitReason>
    where
        R: AsyncBufRead + Unpin,
        O: Write,
        E: Write,
    {
        let mut lines = input.lines();

        loop {
            write!(out, "{}", self.prompt)?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                tracing::debug!("end of input");
                writeln!(out)?;
                return Ok(ExitReason::EndOfInput);
            };

            if let Some(reason) = self.execute(&line, out, err).await? {
                return Ok(reason);
            }
        }
    }

    /// Dispatch a single line
    pub async fn execute<O, E>(
        &mut self,
        line: &str,
        out: &mut O,
        err: &mut E,
    ) -> Result<Option<ExitReason>>
    where
        O: Write,
        E: Write,
    {
        let tokens = tokenize(line);
        let (name, args) = match tokens.split_first() {
            Some((first, rest)) => (first.to_uppercase(), rest.to_vec()),
            None => (EMPTY_LINE.to_string(), Vec::new()),
        };

        let (handler, name, args) = match self.registry.resolve(&name) {
            Resolved::Found(handler) => (handler, name, args),
            Resolved::Fallback(handler) => {
                writeln!(err, "{}", self.diagnostic(&format!("Unknown command '{}'", name)))?;
                (handler, "HELP".to_string(), Vec::new())
            }
        };

        tracing::debug!(command = %name, args = args.len(), "dispatch");
        let ctx = CommandContext {
            connection: self.connection.as_mut(),
            last_reply: self.last_reply.as_ref(),
        };

        let outcome = handler.invoke(ctx, &name, &args).await;
        let reply = match outcome {
            Ok(CommandOutcome::Exit) => return Ok(Some(ExitReason::Quit)),
            Ok(CommandOutcome::Reply(reply)) => reply,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::debug!(command = %name, error = %e, "command failed");
                writeln!(err, "{}", self.diagnostic(&e.to_string()))?;
                None
            }
        };

        if let Some(reply) = &reply {
            render(out, reply, self.color)?;
        }
        self.last_reply = reply;
        Ok(None)
    }

    fn diagnostic(&self, msg: &str) -> String {
        let text = format!("(error) {}", msg);
        if self.color {
            text.as_str().red().to_string()
        } else {
            text
        }
    }
}
