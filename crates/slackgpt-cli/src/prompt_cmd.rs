//! `slackgpt prompt` — dry run of the mention pipeline.
//!
//! Fetches and merges history exactly as the gateway would for a mention in
//! `channel` (or in the thread `thread`), then prints the prompt instead of
//! sending it to the completion API.

use anyhow::{bail, Context, Result};
use colored::Colorize;

use slackgpt_agent::assemble_prompt;
use slackgpt_channels::SlackClient;
use slackgpt_core::config::load_config;

/// Run the prompt command.
pub async fn run(channel: &str, thread: Option<&str>) -> Result<()> {
    let config = load_config(None);
    if !config.slack.is_configured() {
        bail!("No Slack bot token configured. Set SLACK_BOT_TOKEN or slack.botToken.");
    }

    let slack = SlackClient::new(&config.slack);
    let bot_user_id = slack
        .auth_test()
        .await
        .context("failed to resolve bot identity with auth.test")?;

    let prompt = assemble_prompt(
        &slack,
        channel,
        thread,
        config.context.history_limit,
        &bot_user_id,
    )
    .await
    .with_context(|| format!("failed to fetch history for {channel}"))?;

    let scope = match thread {
        Some(ts) => format!("{channel} thread {ts}"),
        None => channel.to_string(),
    };
    eprintln!(
        "{} {} ({} lines)",
        "Prompt for".dimmed(),
        scope.bold(),
        prompt.lines().count()
    );
    println!("{prompt}");

    Ok(())
}
