//! Completion provider trait — the seam between the mention pipeline and
//! whatever text-completion backend answers it.

use async_trait::async_trait;
use slackgpt_core::config::schema::CompletionConfig;
use slackgpt_core::CompletionError;

/// Sampling options passed to each completion call.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionOptions {
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    pub top_p: f64,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        CompletionOptions::from(&CompletionConfig::default())
    }
}

impl From<&CompletionConfig> for CompletionOptions {
    fn from(cfg: &CompletionConfig) -> Self {
        Self {
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
            top_p: cfg.top_p,
            frequency_penalty: cfg.frequency_penalty,
            presence_penalty: cfg.presence_penalty,
        }
    }
}

/// Trait that all completion providers implement.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Complete `prompt` and return the generated text, untrimmed.
    ///
    /// Errors are returned as-is; callers decide what to do with them.
    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, CompletionError>;

    /// Model identifier sent with each request.
    fn model(&self) -> &str;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = CompletionOptions::default();
        assert_eq!(opts.temperature, 0.0);
        assert_eq!(opts.max_tokens, 100);
        assert_eq!(opts.top_p, 1.0);
        assert_eq!(opts.frequency_penalty, 0.5);
        assert_eq!(opts.presence_penalty, 0.0);
    }

    #[test]
    fn test_options_from_config() {
        let cfg = CompletionConfig {
            temperature: 0.9,
            max_tokens: 42,
            ..CompletionConfig::default()
        };
        let opts = CompletionOptions::from(&cfg);
        assert_eq!(opts.temperature, 0.9);
        assert_eq!(opts.max_tokens, 42);
        assert_eq!(opts.frequency_penalty, 0.5);
    }
}
