//! Command table for the REPL
//!
//! Every server command forwards through the shared connection; a handful of
//! meta-commands (HELP, NOOP, EXIT, QUIT, SAVE) are handled locally. Both
//! kinds sit behind the same [`CommandHandler`] trait so the loop cannot tell
//! them apart.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::client::Connection;
use crate::core::{CommandOutcome, Reply, ReplError, Result};

/// Name the loop dispatches when a line has no tokens
pub const EMPTY_LINE: &str = "";

/// What a handler may touch while it runs
pub struct CommandContext<'a> {
    /// The single server connection
    pub connection: &'a mut dyn Connection,
    /// Most recently displayed reply, read-only
    pub last_reply: Option<&'a Reply>,
}

/// A command the REPL can dispatch.
///
/// The returned future completing is the command's completion: `Err` is
/// reported as a diagnostic, `Ok` carries the reply or an exit request.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn invoke(
        &self,
        ctx: CommandContext<'_>,
        name: &str,
        args: &[String],
    ) -> Result<CommandOutcome>;
}

/// Sends the command to the server unchanged
pub struct ForwardCommand;

#[async_trait]
impl CommandHandler for ForwardCommand {
    async fn invoke(
        &self,
        ctx: CommandContext<'_>,
        name: &str,
        args: &[String],
    ) -> Result<CommandOutcome> {
        let reply = ctx.connection.send_command(name, args).await?;
        Ok(CommandOutcome::Reply(reply))
    }
}

/// Does nothing; also used for blank lines
pub struct NoopCommand;

#[async_trait]
impl CommandHandler for NoopCommand {
    async fn invoke(
        &self,
        _ctx: CommandContext<'_>,
        _name: &str,
        _args: &[String],
    ) -> Result<CommandOutcome> {
        Ok(CommandOutcome::none())
    }
}

/// Lists server commands, optionally filtered by substring
#[derive(Clone)]
pub struct HelpCommand {
    vocabulary: Vec<String>,
}

impl HelpCommand {
    pub fn new(vocabulary: Vec<String>) -> Self {
        Self { vocabulary }
    }

    /// Names containing `filter`, case-insensitively, in vocabulary order
    pub fn matching(&self, filter: Option<&str>) -> Vec<String> {
        let filter = filter.map(str::to_uppercase);
        self.vocabulary
            .iter()
            .filter(|name| filter.as_deref().map_or(true, |f| name.contains(f)))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn invoke(
        &self,
        _ctx: CommandContext<'_>,
        _name: &str,
        args: &[String],
    ) -> Result<CommandOutcome> {
        let names = self
            .matching(args.first().map(String::as_str))
            .into_iter()
            .map(Value::String)
            .collect();
        Ok(CommandOutcome::reply(Value::Array(names)))
    }
}

/// Releases the connection and ends the session
pub struct ExitCommand;

#[async_trait]
impl CommandHandler for ExitCommand {
    async fn invoke(
        &self,
        ctx: CommandContext<'_>,
        _name: &str,
        _args: &[String],
    ) -> Result<CommandOutcome> {
        ctx.connection.detach();
        Ok(CommandOutcome::Exit)
    }
}

/// Writes the last reply to a file
pub struct SaveCommand;

#[async_trait]
impl CommandHandler for SaveCommand {
    async fn invoke(
        &self,
        ctx: CommandContext<'_>,
        _name: &str,
        args: &[String],
    ) -> Result<CommandOutcome> {
        let [filename] = args else {
            return Err(ReplError::usage("SAVE filename"));
        };
        let reply = ctx.last_reply.ok_or(ReplError::NoReply)?;

        std::fs::write(filename, reply.to_file_contents()?)?;
        tracing::info!(file = %filename, "saved last reply");

        Ok(CommandOutcome::reply(Reply::text(format!(
            "Reply saved to {}",
            filename
        ))))
    }
}

/// Result of looking a name up in the registry
pub enum Resolved<'a> {
    /// The name is registered
    Found(&'a dyn CommandHandler),
    /// Unknown name; run this (HELP) instead
    Fallback(&'a dyn CommandHandler),
}

/// Uppercase command name to handler, fixed once the REPL starts
pub struct CommandRegistry {
    handlers: HashMap<String, Box<dyn CommandHandler>>,
    fallback: HelpCommand,
}

impl CommandRegistry {
    /// Build the table from the server vocabulary plus the meta-commands.
    ///
    /// Names are uppercased and deduplicated, first occurrence wins the
    /// position. Meta-commands replace server commands of the same name.
    pub fn new<I, S>(vocabulary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = Vec::new();
        for name in vocabulary {
            let name = name.as_ref().to_uppercase();
            if !names.contains(&name) {
                names.push(name);
            }
        }

        let fallback = HelpCommand::new(names.clone());
        let mut handlers: HashMap<String, Box<dyn CommandHandler>> = names
            .into_iter()
            .map(|name| (name, Box::new(ForwardCommand) as Box<dyn CommandHandler>))
            .collect();

        handlers.insert("HELP".to_string(), Box::new(fallback.clone()));
        handlers.insert("NOOP".to_string(), Box::new(NoopCommand));
        handlers.insert(EMPTY_LINE.to_string(), Box::new(NoopCommand));
        handlers.insert("EXIT".to_string(), Box::new(ExitCommand));
        handlers.insert("QUIT".to_string(), Box::new(ExitCommand));
        handlers.insert("SAVE".to_string(), Box::new(SaveCommand));

        Self { handlers, fallback }
    }

    /// Add or replace a handler before the registry is handed to the REPL
    pub fn with_handler(mut self, name: &str, handler: impl CommandHandler + 'static) -> Self {
        self.handlers.insert(name.to_uppercase(), Box::new(handler));
        self
    }

    /// Case-insensitive lookup
    pub fn lookup(&self, name: &str) -> Option<&dyn CommandHandler> {
        self.handlers.get(&name.to_uppercase()).map(|h| h.as_ref())
    }

    /// Lookup that falls back to HELP on a miss
    pub fn resolve(&self, name: &str) -> Resolved<'_> {
        match self.lookup(name) {
            Some(handler) => Resolved::Found(handler),
            None => Resolved::Fallback(&self.fallback),
        }
    }

    /// Number of registered names, meta-commands included
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Server command names in enumeration order
    pub fn vocabulary(&self) -> Vec<String> {
        self.fallback.matching(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[derive(Default)]
    struct RecordingConnection {
        sent: Vec<(String, Vec<String>)>,
        detached: bool,
    }

    #[async_trait]
    impl Connection for RecordingConnection {
        fn commands(&self) -> Vec<String> {
            vec!["get".into(), "set".into(), "getrange".into()]
        }

        async fn send_command(&mut self, name: &str, args: &[String]) -> Result<Option<Reply>> {
            self.sent.push((name.to_string(), args.to_vec()));
            Ok(Some(Reply::text("OK")))
        }

        fn detach(&mut self) {
            self.detached = true;
        }
    }

    fn registry() -> CommandRegistry {
        CommandRegistry::new(["get", "set", "getrange"])
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    async fn run(
        registry: &CommandRegistry,
        conn: &mut RecordingConnection,
        last: Option<&Reply>,
        name: &str,
        list: &[&str],
    ) -> Result<CommandOutcome> {
        let handler = registry.lookup(name).unwrap();
        let ctx = CommandContext {
            connection: conn,
            last_reply: last,
        };
        handler.invoke(ctx, &name.to_uppercase(), &args(list)).await
    }

    #[test]
    fn test_registry_contents() {
        let registry = registry();
        for name in ["GET", "SET", "GETRANGE", "HELP", "NOOP", "EXIT", "QUIT", "SAVE", ""] {
            assert!(registry.lookup(name).is_some(), "missing {:?}", name);
        }
        assert_eq!(registry.len(), 9);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = registry();
        assert!(registry.lookup("get").is_some());
        assert!(registry.lookup("GeTrAnGe").is_some());
        assert!(registry.lookup("nope").is_none());
    }

    #[test]
    fn test_resolve_falls_back_to_help() {
        let registry = registry();
        assert!(matches!(registry.resolve("get"), Resolved::Found(_)));
        assert!(matches!(registry.resolve("bogus"), Resolved::Fallback(_)));
    }

    #[test]
    fn test_vocabulary_is_deduplicated_in_order() {
        let registry = CommandRegistry::new(["set", "GET", "get", "del"]);
        assert_eq!(registry.vocabulary(), vec!["SET", "GET", "DEL"]);
    }

    #[tokio::test]
    async fn test_forward_passes_arguments_verbatim() {
        let registry = registry();
        let mut conn = RecordingConnection::default();

        let outcome = run(&registry, &mut conn, None, "set", &["k", "a b"]).await.unwrap();

        assert_eq!(outcome, CommandOutcome::reply(Reply::text("OK")));
        assert_eq!(conn.sent, vec![("SET".to_string(), args(&["k", "a b"]))]);
    }

    #[tokio::test]
    async fn test_noop_and_empty_line() {
        let registry = registry();
        let mut conn = RecordingConnection::default();

        for name in ["NOOP", EMPTY_LINE] {
            let outcome = run(&registry, &mut conn, None, name, &[]).await.unwrap();
            assert_eq!(outcome, CommandOutcome::none());
        }
        assert!(conn.sent.is_empty());
    }

    #[tokio::test]
    async fn test_help_lists_full_vocabulary() {
        let registry = registry();
        let mut conn = RecordingConnection::default();

        let outcome = run(&registry, &mut conn, None, "help", &[]).await.unwrap();
        let CommandOutcome::Reply(Some(Reply::Value(Value::Array(names)))) = outcome else {
            panic!("expected array reply");
        };

        let unique: HashSet<&str> = names.iter().filter_map(Value::as_str).collect();
        assert_eq!(unique.len(), names.len());
        assert_eq!(Value::Array(names), json!(["GET", "SET", "GETRANGE"]));
    }

    #[tokio::test]
    async fn test_help_filter_is_case_insensitive_substring() {
        let registry = registry();
        let mut conn = RecordingConnection::default();

        let outcome = run(&registry, &mut conn, None, "HELP", &["get"]).await.unwrap();
        assert_eq!(outcome, CommandOutcome::reply(json!(["GET", "GETRANGE"])));

        let outcome = run(&registry, &mut conn, None, "HELP", &["xyz"]).await.unwrap();
        assert_eq!(outcome, CommandOutcome::reply(json!([])));
    }

    #[tokio::test]
    async fn test_exit_and_quit_detach() {
        let registry = registry();
        for name in ["exit", "QUIT"] {
            let mut conn = RecordingConnection::default();
            let outcome = run(&registry, &mut conn, None, name, &[]).await.unwrap();
            assert_eq!(outcome, CommandOutcome::Exit);
            assert!(conn.detached);
        }
    }

    #[tokio::test]
    async fn test_save_requires_exactly_one_argument() {
        let registry = registry();
        let mut conn = RecordingConnection::default();
        let last = Reply::text("OK");

        for list in [&[][..], &["a.txt", "b.txt"][..]] {
            let err = run(&registry, &mut conn, Some(&last), "SAVE", list)
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), "SAVE filename");
        }
    }

    #[tokio::test]
    async fn test_save_without_reply() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let registry = registry();
        let mut conn = RecordingConnection::default();

        let err = run(&registry, &mut conn, None, "SAVE", &[path.to_str().unwrap()])
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "No reply to save");
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_save_text_reply_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let file = path.to_str().unwrap();
        let registry = registry();
        let mut conn = RecordingConnection::default();
        let last = Reply::text("OK");

        let outcome = run(&registry, &mut conn, Some(&last), "save", &[file])
            .await
            .unwrap();

        assert_eq!(
            outcome,
            CommandOutcome::reply(Reply::text(format!("Reply saved to {}", file)))
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "OK");
    }

    #[tokio::test]
    async fn test_save_structured_reply_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, "stale contents that are longer").unwrap();
        let registry = registry();
        let mut conn = RecordingConnection::default();
        let last = Reply::from(json!(["a", "b"]));

        run(&registry, &mut conn, Some(&last), "SAVE", &[path.to_str().unwrap()])
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"["a","b"]"#);
    }

    #[tokio::test]
    async fn test_save_write_failure_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        let registry = registry();
        let mut conn = RecordingConnection::default();
        let last = Reply::text("OK");

        let err = run(&registry, &mut conn, Some(&last), "SAVE", &[path.to_str().unwrap()])
            .await
            .unwrap_err();
        assert!(matches!(err, ReplError::Io(_)));
    }

    #[tokio::test]
    async fn test_with_handler_overrides_entry() {
        let registry = registry().with_handler("get", NoopCommand);
        let mut conn = RecordingConnection::default();

        let outcome = run(&registry, &mut conn, None, "GET", &["k"]).await.unwrap();
        assert_eq!(outcome, CommandOutcome::none());
        assert!(conn.sent.is_empty());
    }
}
