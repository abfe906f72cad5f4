//! redis-repl - interactive client for Redis-compatible servers
//!
//! Main entry point for the CLI application.

use std::io::{self, IsTerminal};
use std::process;

use clap::{ArgAction, Parser};
use redis_repl::client::Connection;
use redis_repl::core::telemetry;
use redis_repl::{CommandRegistry, Config, ConnectionManager, Repl};

/// Interactive client for Redis-compatible servers
#[derive(Parser, Debug)]
#[command(name = "redis-repl")]
#[command(version, about, long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Args {
    /// Server hostname
    #[arg(long, short = 'h')]
    hostname: Option<String>,

    /// Server port (default 6379, or 6380 with --tls)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// Password to authenticate with
    #[arg(long, short = 'a')]
    password: Option<String>,

    /// Connect over TLS
    #[arg(long)]
    tls: bool,

    /// Enable debug logging on stderr
    #[arg(long, short = 'd')]
    debug: bool,

    /// Print version
    #[arg(long, short = 'v', action = ArgAction::Version)]
    version: Option<bool>,

    /// Print help
    #[arg(long, short = '?', action = ArgAction::Help)]
    help: Option<bool>,
}

impl Args {
    /// Apply CLI overrides on top of env and file settings
    fn apply(&self, config: &mut Config) {
        if let Some(ref hostname) = self.hostname {
            config.server.host = hostname.clone();
        }
        if let Some(port) = self.port {
            config.server.port = Some(port);
        }
        if let Some(ref password) = self.password {
            config.server.password = Some(password.clone());
        }
        if self.tls {
            config.server.tls = true;
        }
        if self.debug {
            config.logging.debug = true;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (mut config, warnings) = Config::load();
    args.apply(&mut config);
    telemetry::initialise(&config)?;
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    let mut manager = ConnectionManager::new();
    let connection = match manager.establish(&config).await {
        Ok(connection) => connection,
        Err(msg) => {
            eprintln!("{}", msg);
            process::exit(1);
        }
    };

    let registry = CommandRegistry::new(connection.commands());
    let mut repl = Repl::new(&config.server.host, registry, Box::new(connection))
        .with_color(io::stdout().is_terminal());

    // Exit directly: the pending stdin read would otherwise hold the
    // runtime open on shutdown.
    match repl.run().await {
        Ok(reason) => {
            tracing::debug!(?reason, "session ended");
            manager.close();
            process::exit(0);
        }
        Err(e) if e.is_fatal() => {
            eprintln!("{}", manager.fail(&e));
            process::exit(1);
        }
        Err(e) => {
            // Terminal I/O failure (e.g. broken pipe): not a connection problem
            tracing::debug!(error = %e, "terminal I/O failed");
            manager.close();
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}
