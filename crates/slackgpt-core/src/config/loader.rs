//! Config loader — reads `~/.slackgpt/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.slackgpt/config.json`
//! 3. Plain deployment env vars: `OPENAI_API_KEY`, `SLACK_BOT_TOKEN`,
//!    `SLACK_SIGNING_SECRET`, `PORT`
//! 4. Environment variables `SLACKGPT_<SECTION>__<FIELD>`

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    apply_env_overrides(load_config_from_path(&config_path))
}

/// Load config from a specific file path, without env overrides.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config {}: {}", path.display(), e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply process environment overrides on top of a loaded config.
pub fn apply_env_overrides(config: Config) -> Config {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides using an arbitrary variable lookup.
///
/// Supported variables:
/// - `OPENAI_API_KEY`, `SLACKGPT_OPENAI__API_KEY` → `openai.api_key`
/// - `SLACKGPT_OPENAI__API_BASE` → `openai.api_base`
/// - `SLACKGPT_OPENAI__MODEL` → `openai.model`
/// - `SLACK_BOT_TOKEN`, `SLACKGPT_SLACK__BOT_TOKEN` → `slack.bot_token`
/// - `SLACK_SIGNING_SECRET`, `SLACKGPT_SLACK__SIGNING_SECRET` → `slack.signing_secret`
/// - `SLACKGPT_SLACK__EVENTS_PATH` → `slack.events_path`
/// - `SLACKGPT_SLACK__API_BASE` → `slack.api_base`
/// - `SLACKGPT_COMPLETION__TEMPERATURE` / `__MAX_TOKENS` / `__TOP_P` /
///   `__FREQUENCY_PENALTY` / `__PRESENCE_PENALTY` → `completion.*`
/// - `SLACKGPT_CONTEXT__HISTORY_LIMIT` → `context.history_limit`
/// - `SLACKGPT_GATEWAY__HOST` → `gateway.host`
/// - `PORT`, `SLACKGPT_GATEWAY__PORT` → `gateway.port`
///
/// Unparsable numeric values are ignored with a warning.
fn apply_overrides_from<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    // Plain deployment variables first, so prefixed ones win.
    if let Some(val) = lookup("OPENAI_API_KEY") {
        config.openai.api_key = val;
    }
    if let Some(val) = lookup("SLACK_BOT_TOKEN") {
        config.slack.bot_token = val;
    }
    if let Some(val) = lookup("SLACK_SIGNING_SECRET") {
        config.slack.signing_secret = val;
    }
    if let Some(port) = parse_var(&lookup, "PORT") {
        config.gateway.port = port;
    }

    // OpenAI
    if let Some(val) = lookup("SLACKGPT_OPENAI__API_KEY") {
        config.openai.api_key = val;
    }
    if let Some(val) = lookup("SLACKGPT_OPENAI__API_BASE") {
        config.openai.api_base = Some(val);
    }
    if let Some(val) = lookup("SLACKGPT_OPENAI__MODEL") {
        config.openai.model = val;
    }

    // Slack
    if let Some(val) = lookup("SLACKGPT_SLACK__BOT_TOKEN") {
        config.slack.bot_token = val;
    }
    if let Some(val) = lookup("SLACKGPT_SLACK__SIGNING_SECRET") {
        config.slack.signing_secret = val;
    }
    if let Some(val) = lookup("SLACKGPT_SLACK__EVENTS_PATH") {
        config.slack.events_path = val;
    }
    if let Some(val) = lookup("SLACKGPT_SLACK__API_BASE") {
        config.slack.api_base = val;
    }

    // Completion options
    if let Some(t) = parse_var(&lookup, "SLACKGPT_COMPLETION__TEMPERATURE") {
        config.completion.temperature = t;
    }
    if let Some(n) = parse_var(&lookup, "SLACKGPT_COMPLETION__MAX_TOKENS") {
        config.completion.max_tokens = n;
    }
    if let Some(p) = parse_var(&lookup, "SLACKGPT_COMPLETION__TOP_P") {
        config.completion.top_p = p;
    }
    if let Some(p) = parse_var(&lookup, "SLACKGPT_COMPLETION__FREQUENCY_PENALTY") {
        config.completion.frequency_penalty = p;
    }
    if let Some(p) = parse_var(&lookup, "SLACKGPT_COMPLETION__PRESENCE_PENALTY") {
        config.completion.presence_penalty = p;
    }

    // Context
    if let Some(n) = parse_var(&lookup, "SLACKGPT_CONTEXT__HISTORY_LIMIT") {
        config.context.history_limit = n;
    }

    // Gateway
    if let Some(val) = lookup("SLACKGPT_GATEWAY__HOST") {
        config.gateway.host = val;
    }
    if let Some(port) = parse_var(&lookup, "SLACKGPT_GATEWAY__PORT") {
        config.gateway.port = port;
    }

    config
}

/// Look up and parse a single variable.
fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(var = key, value = %raw, "ignoring unparsable env override");
            None
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_load_missing_file() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.json"));
        assert_eq!(config.context.history_limit, 10);
        assert_eq!(config.gateway.port, 8080);
    }

    #[test]
    fn test_load_valid_json() {
        let file = write_temp_json(
            r#"{
            "openai": { "apiKey": "sk-file", "model": "davinci-002" },
            "context": { "historyLimit": 20 }
        }"#,
        );

        let config = load_config_from_path(file.path());
        assert_eq!(config.openai.api_key, "sk-file");
        assert_eq!(config.openai.model, "davinci-002");
        assert_eq!(config.context.history_limit, 20);
        // Default preserved
        assert_eq!(config.completion.max_tokens, 100);
    }

    #[test]
    fn test_load_invalid_json_returns_defaults() {
        let file = write_temp_json("not valid json {{{");
        let config = load_config_from_path(file.path());
        assert_eq!(config.context.history_limit, 10);
        assert!(!config.openai.is_configured());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.slack.bot_token = "xoxb-saved".to_string();
        config.completion.temperature = 0.3;

        save_config(&config, Some(&path)).unwrap();

        let reloaded = load_config_from_path(&path);
        assert_eq!(reloaded.slack.bot_token, "xoxb-saved");
        assert_eq!(reloaded.completion.temperature, 0.3);
    }

    #[test]
    fn test_saved_json_uses_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        save_config(&Config::default(), Some(&path)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert!(raw["completion"].get("maxTokens").is_some());
        assert!(raw["completion"].get("max_tokens").is_none());
        assert!(raw["slack"].get("signingSecret").is_some());
    }

    #[test]
    fn test_plain_deployment_vars() {
        let config = apply_overrides_from(
            Config::default(),
            env(&[
                ("OPENAI_API_KEY", "sk-env"),
                ("SLACK_BOT_TOKEN", "xoxb-env"),
                ("SLACK_SIGNING_SECRET", "s3cret"),
                ("PORT", "3000"),
            ]),
        );
        assert_eq!(config.openai.api_key, "sk-env");
        assert_eq!(config.slack.bot_token, "xoxb-env");
        assert_eq!(config.slack.signing_secret, "s3cret");
        assert_eq!(config.gateway.port, 3000);
    }

    #[test]
    fn test_prefixed_vars_win_over_plain() {
        let config = apply_overrides_from(
            Config::default(),
            env(&[
                ("OPENAI_API_KEY", "sk-plain"),
                ("SLACKGPT_OPENAI__API_KEY", "sk-prefixed"),
                ("PORT", "3000"),
                ("SLACKGPT_GATEWAY__PORT", "4000"),
            ]),
        );
        assert_eq!(config.openai.api_key, "sk-prefixed");
        assert_eq!(config.gateway.port, 4000);
    }

    #[test]
    fn test_completion_and_context_overrides() {
        let config = apply_overrides_from(
            Config::default(),
            env(&[
                ("SLACKGPT_COMPLETION__TEMPERATURE", "0.7"),
                ("SLACKGPT_COMPLETION__MAX_TOKENS", "256"),
                ("SLACKGPT_CONTEXT__HISTORY_LIMIT", "5"),
                ("SLACKGPT_OPENAI__API_BASE", "http://localhost:9000/v1"),
            ]),
        );
        assert_eq!(config.completion.temperature, 0.7);
        assert_eq!(config.completion.max_tokens, 256);
        assert_eq!(config.context.history_limit, 5);
        assert_eq!(
            config.openai.api_base.as_deref(),
            Some("http://localhost:9000/v1")
        );
    }

    #[test]
    fn test_unparsable_number_is_ignored() {
        let config = apply_overrides_from(Config::default(), env(&[("PORT", "eighty")]));
        assert_eq!(config.gateway.port, 8080);
    }
}
