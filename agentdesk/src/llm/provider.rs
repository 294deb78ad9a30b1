use std::sync::Arc;
use std::time::Duration;

use crate::config::{LlmConfig, GROQ_BASE_URL};
use crate::error::{DeskError, Result};
use crate::llm::api::LlmApiClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmBackend {
    Groq,
    OpenAICompatible { base_url: String },
    Unavailable { reason: String },
}

#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f32>,
    pub stop: Option<Vec<String>>,
}

impl CompletionOptions {
    pub fn with_max_tokens(max_tokens: u32) -> Self {
        Self {
            max_tokens: Some(max_tokens),
            ..Default::default()
        }
    }

    /// Fills every unset field from the configured sampling defaults.
    fn or_defaults(&self, config: &LlmConfig) -> Self {
        Self {
            temperature: self.temperature.or(Some(config.temperature)),
            max_tokens: self.max_tokens.or(Some(config.max_tokens)),
            top_p: self.top_p.or(Some(config.top_p)),
            stop: self.stop.clone(),
        }
    }
}

/// Process-wide handle to the upstream text-completion service.
///
/// A missing API key does not fail construction: the provider reports itself
/// unavailable and every completion fails fast with an upstream error.
#[derive(Clone)]
pub struct LlmProvider {
    backend: LlmBackend,
    config: Arc<LlmConfig>,
    client: Option<LlmApiClient>,
}

impl LlmProvider {
    pub fn new(config: &LlmConfig) -> Self {
        let config = Arc::new(config.clone());

        let client = match LlmApiClient::new(&config) {
            Ok(client) => client,
            Err(e) => {
                return Self {
                    backend: LlmBackend::Unavailable {
                        reason: e.to_string(),
                    },
                    config,
                    client: None,
                }
            }
        };

        let backend = if config.base_url.trim_end_matches('/') == GROQ_BASE_URL {
            LlmBackend::Groq
        } else {
            LlmBackend::OpenAICompatible {
                base_url: config.base_url.clone(),
            }
        };

        Self {
            backend,
            config,
            client: Some(client),
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, LlmBackend::Unavailable { .. })
    }

    pub fn backend(&self) -> &LlmBackend {
        &self.backend
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub async fn complete(
        &self,
        prompt: &str,
        options: Option<&CompletionOptions>,
    ) -> Result<String> {
        self.complete_with_system(prompt, None, options).await
    }

    pub async fn complete_with_system(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        options: Option<&CompletionOptions>,
    ) -> Result<String> {
        let client = self.client()?;
        let options = options
            .cloned()
            .unwrap_or_default()
            .or_defaults(&self.config);

        client.complete(prompt, system_prompt, &options).await
    }

    /// Sends a tiny completion to check that the provider answers at all.
    ///
    /// Bounded by `health_timeout_secs`; never returns an error.
    pub async fn ping(&self) -> bool {
        if !self.is_available() {
            return false;
        }

        let timeout = Duration::from_secs(self.config.health_timeout_secs);
        let options = CompletionOptions::with_max_tokens(5);

        match tokio::time::timeout(timeout, self.complete("Hello", Some(&options))).await {
            Ok(Ok(text)) => !text.trim().is_empty(),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "LLM ping failed");
                false
            }
            Err(_) => {
                tracing::warn!(timeout_secs = timeout.as_secs(), "LLM ping timed out");
                false
            }
        }
    }

    fn client(&self) -> Result<&LlmApiClient> {
        match (&self.backend, &self.client) {
            (LlmBackend::Unavailable { reason }, _) => {
                Err(DeskError::LlmUnavailable(reason.clone()))
            }
            (_, Some(client)) => Ok(client),
            (_, None) => Err(DeskError::LlmUnavailable(
                "LLM client was not initialized".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_unavailable() {
        let provider = LlmProvider::new(&LlmConfig::default());
        assert!(!provider.is_available());
        match provider.backend() {
            LlmBackend::Unavailable { reason } => assert!(reason.contains("GROQ_API_KEY")),
            other => panic!("Expected unavailable backend, got {other:?}"),
        }
    }

    #[test]
    fn test_groq_backend_detection() {
        let config = LlmConfig {
            api_key: Some("gsk_test".to_string()),
            ..LlmConfig::default()
        };
        let provider = LlmProvider::new(&config);
        assert_eq!(provider.backend(), &LlmBackend::Groq);
        assert!(provider.is_available());
    }

    #[test]
    fn test_custom_base_url_is_openai_compatible() {
        let config = LlmConfig {
            api_key: Some("key".to_string()),
            base_url: "http://localhost:11434/v1".to_string(),
            ..LlmConfig::default()
        };
        let provider = LlmProvider::new(&config);
        assert!(matches!(provider.backend(), LlmBackend::OpenAICompatible { .. }));
    }

    #[test]
    fn test_options_fill_from_config() {
        let config = LlmConfig::default();
        let merged = CompletionOptions::with_max_tokens(5).or_defaults(&config);
        assert_eq!(merged.max_tokens, Some(5));
        assert_eq!(merged.temperature, Some(config.temperature));
        assert_eq!(merged.top_p, Some(config.top_p));
    }

    #[tokio::test]
    async fn test_unavailable_provider_fails_fast() {
        let provider = LlmProvider::new(&LlmConfig::default());
        let result = provider.complete("Hello", None).await;
        assert!(matches!(result, Err(DeskError::LlmUnavailable(_))));
        assert!(!provider.ping().await);
    }
}
