//! App Home tab — the static view published when a user opens the bot's home.

use serde_json::{json, Value};
use slackgpt_core::config::schema::HomeTabConfig;

/// Build the Block Kit `home` view.
pub fn home_view(cfg: &HomeTabConfig) -> Value {
    json!({
        "type": "home",
        "callback_id": "home_view",
        "blocks": [
            {
                "type": "section",
                "text": { "type": "mrkdwn", "text": cfg.title }
            },
            { "type": "divider" },
            {
                "type": "section",
                "text": { "type": "mrkdwn", "text": cfg.description },
                "accessory": {
                    "type": "image",
                    "image_url": cfg.image_url,
                    "alt_text": cfg.image_alt_text
                }
            },
            {
                "type": "actions",
                "elements": [
                    {
                        "type": "button",
                        "text": { "type": "plain_text", "text": cfg.button_text },
                        "url": cfg.button_url
                    }
                ]
            }
        ]
    })
}
