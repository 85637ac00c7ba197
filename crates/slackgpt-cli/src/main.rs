//! slackgpt CLI — entry point.
//!
//! # Commands
//!
//! - `slackgpt gateway` — serve the Events API and answer mentions
//! - `slackgpt prompt --channel C [--thread TS]` — print the prompt a mention would produce
//! - `slackgpt onboard` — write a default config
//! - `slackgpt status` — show configuration and credential status

mod gateway;
mod helpers;
mod onboard;
mod prompt_cmd;
mod status;

use anyhow::Result;
use clap::{Parser, Subcommand};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// slackgpt — answer Slack mentions with a text completion of the conversation
#[derive(Parser)]
#[command(name = "slackgpt", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Events API server
    Gateway {
        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Fetch history and print the rendered prompt without calling the completion API
    Prompt {
        /// Channel id (e.g. C0123456789)
        #[arg(short, long)]
        channel: String,

        /// Thread anchor timestamp, for a mention inside a thread
        #[arg(short, long)]
        thread: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Initialize configuration
    Onboard,

    /// Show configuration and credential status
    Status,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Gateway { logs } => {
            init_logging(logs, "info");
            gateway::run().await
        }
        Commands::Prompt {
            channel,
            thread,
            logs,
        } => {
            init_logging(logs, "warn");
            prompt_cmd::run(&channel, thread.as_deref()).await
        }
        Commands::Onboard => onboard::run(),
        Commands::Status => status::run(),
    }
}

/// Initialize tracing/logging. `RUST_LOG` wins when set.
fn init_logging(verbose: bool, default_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("slackgpt=debug,info")
        } else {
            EnvFilter::new(default_level)
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_prompt_command() {
        let cli = Cli::try_parse_from([
            "slackgpt", "prompt", "--channel", "C1", "--thread", "1700000000.000100",
        ])
        .unwrap();
        match cli.command {
            Commands::Prompt {
                channel,
                thread,
                logs,
            } => {
                assert_eq!(channel, "C1");
                assert_eq!(thread.as_deref(), Some("1700000000.000100"));
                assert!(!logs);
            }
            _ => panic!("expected prompt command"),
        }
    }

    #[test]
    fn test_prompt_requires_channel() {
        assert!(Cli::try_parse_from(["slackgpt", "prompt"]).is_err());
    }
}
