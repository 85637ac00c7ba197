//! `slackgpt onboard` — write a default config and print the Slack app setup.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use slackgpt_core::config::{get_config_path, save_config, Config};

use crate::helpers;

/// Bot token scopes the pipeline needs.
const BOT_SCOPES: &[&str] = &[
    "app_mentions:read",
    "channels:history",
    "groups:history",
    "chat:write",
];

/// Bot events the gateway handles.
const BOT_EVENTS: &[&str] = &["app_mention", "app_home_opened"];

/// Run the onboard command.
pub fn run() -> Result<()> {
    helpers::print_banner("Setup");

    let config_path = get_config_path();
    let shown = helpers::display_path(&config_path);

    if write_default_config(&config_path)? {
        println!("  {} created config at {}", "✓".green(), shown);
    } else {
        println!("  {} config already exists at {}", "✓".green(), shown);
    }

    let defaults = Config::default();
    println!();
    println!("  {}", "Next steps:".bold());
    println!("    1. Put your bot token, signing secret and OpenAI key in {shown}");
    println!("       (or export SLACK_BOT_TOKEN, SLACK_SIGNING_SECRET, OPENAI_API_KEY)");
    println!("    2. Give the Slack app these bot scopes: {}", BOT_SCOPES.join(", "));
    println!(
        "    3. Enable Event Subscriptions with request URL https://<your-host>{}",
        defaults.slack.events_path
    );
    println!("       and subscribe to: {}", BOT_EVENTS.join(", "));
    println!();
    println!(
        "{}",
        "  Setup complete! Run `slackgpt gateway` to start answering mentions.".green()
    );
    println!();

    Ok(())
}

/// Write `Config::default()` to `path` unless a file is already there.
/// Returns whether a file was written.
fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), Some(path))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use slackgpt_core::config::load_config;

    #[test]
    fn write_default_config_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        assert!(write_default_config(&path).unwrap());
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"historyLimit\": 10"));

        let loaded = load_config(Some(&path));
        assert_eq!(loaded.slack.events_path, "/slack/events");
    }

    #[test]
    fn write_default_config_keeps_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"gateway": {"port": 9999}}"#).unwrap();

        assert!(!write_default_config(&path).unwrap());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            r#"{"gateway": {"port": 9999}}"#
        );
    }

    #[test]
    fn scopes_cover_history_and_posting() {
        assert!(BOT_SCOPES.contains(&"channels:history"));
        assert!(BOT_SCOPES.contains(&"chat:write"));
        assert_eq!(BOT_EVENTS, ["app_mention", "app_home_opened"]);
    }
}
