//! Gateway command — serves the Events API and answers mentions.
//!
//! Startup sequence:
//! 1. Load config
//! 2. Create the completion provider and the Slack client
//! 3. Resolve the bot's user id with `auth.test`
//! 4. Build the mention handler and the events router
//! 5. Serve until Ctrl+C

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tracing::{error, info, warn};

use slackgpt_agent::MentionHandler;
use slackgpt_channels::events::{self, EventHandler, EventsState};
use slackgpt_channels::home::home_view;
use slackgpt_channels::SlackClient;
use slackgpt_core::config::schema::HomeTabConfig;
use slackgpt_core::config::{get_config_path, load_config};
use slackgpt_core::{MentionEvent, PipelineError};
use slackgpt_providers::{create_provider, CompletionOptions};

use crate::helpers;

/// Routes accepted events to the mention pipeline and the Home tab.
struct GatewayEvents {
    mentions: MentionHandler,
    slack: Arc<SlackClient>,
    home: HomeTabConfig,
}

#[async_trait]
impl EventHandler for GatewayEvents {
    async fn on_mention(
        &self,
        event: MentionEvent,
        bot_user_id: Option<String>,
    ) -> Result<(), PipelineError> {
        self.mentions.handle(&event, bot_user_id.as_deref()).await
    }

    async fn on_home_opened(&self, user_id: String) -> Result<()> {
        self.slack.publish_home(&user_id, home_view(&self.home)).await
    }
}

/// Run the gateway.
pub async fn run() -> Result<()> {
    helpers::print_banner("Gateway");

    // 1. Load config
    let config = load_config(None);
    if !config.slack.is_configured() {
        bail!(
            "No Slack bot token configured. Set SLACK_BOT_TOKEN or slack.botToken in {}",
            helpers::display_path(&get_config_path())
        );
    }

    // 2. Provider + Slack client
    let provider = create_provider(&config.openai).map_err(|e| anyhow::anyhow!(e))?;
    let slack = Arc::new(SlackClient::new(&config.slack));

    // 3. Bot identity
    let bot_user_id = slack
        .auth_test()
        .await
        .context("failed to resolve bot identity with auth.test")?;

    // 4. Handler + router
    let mentions = MentionHandler::new(
        slack.clone(),
        slack.clone(),
        Arc::new(provider),
        bot_user_id.clone(),
    )
    .with_options(CompletionOptions::from(&config.completion))
    .with_history_limit(config.context.history_limit);

    let secret = if config.slack.verifies_signatures() {
        Some(config.slack.signing_secret.clone())
    } else {
        warn!("no signing secret configured, Events API requests are not verified");
        None
    };

    let state = EventsState::new(
        secret,
        Arc::new(GatewayEvents {
            mentions,
            slack: slack.clone(),
            home: config.slack.home.clone(),
        }),
    );
    let app = events::router(&config.slack.events_path, state);

    // 5. Serve
    let addr = config.gateway.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        addr = %addr,
        path = %config.slack.events_path,
        bot_user_id = %bot_user_id,
        model = %config.openai.model,
        "gateway starting"
    );

    println!("  Bot:       <@{bot_user_id}>");
    println!("  Model:     {}", config.openai.model);
    println!("  Listening: http://{addr}{}", config.slack.events_path);
    println!("  History:   last {} messages", config.context.history_limit);
    println!();
    println!("  Ctrl+C to stop");
    println!();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("events server failed")?;

    println!("  Gateway stopped. Goodbye!");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl+C");
        return;
    }
    println!();
    println!("  Shutting down...");
    info!("received Ctrl+C, shutting down");
}
