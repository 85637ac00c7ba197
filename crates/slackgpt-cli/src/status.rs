//! `slackgpt status` — show configuration and credential status.

use anyhow::Result;
use colored::Colorize;

use slackgpt_core::config::{get_config_path, load_config};

use crate::helpers::{self, status_mark};

/// Run the status command.
pub fn run() -> Result<()> {
    let config = load_config(None);
    let config_path = get_config_path();

    helpers::print_banner("Status");

    // Config
    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        helpers::display_path(&config_path),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );

    // Gateway
    println!(
        "  {:<18} http://{}{}",
        "Events URL:".bold(),
        config.gateway.bind_addr(),
        config.slack.events_path
    );

    // Completion
    println!("  {:<18} {}", "Model:".bold(), config.openai.model);
    let c = &config.completion;
    println!(
        "  {:<18} {}",
        "Parameters:".bold(),
        format!(
            "temp: {} | max_tokens: {} | top_p: {} | freq: {} | presence: {}",
            c.temperature, c.max_tokens, c.top_p, c.frequency_penalty, c.presence_penalty
        )
        .dimmed()
    );
    println!(
        "  {:<18} last {} messages",
        "History:".bold(),
        config.context.history_limit
    );

    // Credentials
    println!();
    println!("  {}", "Credentials:".bold());
    println!(
        "    {:<20} {}",
        "Slack bot token",
        status_mark(config.slack.is_configured(), "(token set)")
    );
    println!(
        "    {:<20} {}",
        "Signing secret",
        status_mark(config.slack.verifies_signatures(), "(requests verified)")
    );
    println!(
        "    {:<20} {}",
        "OpenAI",
        status_mark(config.openai.is_configured(), "(key set)")
    );
    if let Some(ref base) = config.openai.api_base {
        println!("    {:<20} {}", "OpenAI base", base.dimmed());
    }

    println!();

    Ok(())
}
