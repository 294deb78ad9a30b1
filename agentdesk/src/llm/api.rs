use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse, Stop,
    },
    Client,
};

use crate::{
    config::LlmConfig,
    error::{DeskError, Result},
    llm::provider::CompletionOptions,
};

const RATE_LIMIT_MARKERS: [&str; 4] = [
    "rate limit",
    "rate_limit",
    "too many requests",
    "insufficient_quota",
];

const AUTH_MARKERS: [&str; 5] = [
    "invalid api key",
    "invalid_api_key",
    "unauthorized",
    "forbidden",
    "authentication",
];

/// How a failed completion is reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    RateLimited,
    Unauthorized,
    Other,
}

/// One-shot client for an OpenAI-compatible chat completion endpoint.
///
/// Every call is a single attempt; nothing is retried here or inside
/// async-openai.
#[derive(Clone)]
pub struct LlmApiClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl LlmApiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let Some(api_key) = config.api_key.clone() else {
            return Err(DeskError::LlmUnavailable(
                "GROQ_API_KEY is not set".to_string(),
            ));
        };

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DeskError::Llm(format!("Failed to build LLM HTTP client: {e}")))?;

        // A zero elapsed-time budget makes async-openai give up after the first 429/5xx.
        let no_retry = backoff::ExponentialBackoff {
            max_elapsed_time: Some(Duration::ZERO),
            ..Default::default()
        };

        let client = Client::with_config(
            OpenAIConfig::new()
                .with_api_base(config.base_url.clone())
                .with_api_key(api_key),
        )
        .with_http_client(http_client)
        .with_backoff(no_retry);

        Ok(Self {
            client,
            model: config.model.clone(),
        })
    }

    pub async fn complete(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        options: &CompletionOptions,
    ) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(DeskError::Validation("Prompt cannot be empty".to_string()));
        }

        let request = self.build_request(prompt, system_prompt, options)?;
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(into_desk_error)?;

        let text = first_choice_text(response)?;
        tracing::debug!(
            model = self.model.as_str(),
            chars = text.len(),
            "LLM completion received"
        );
        Ok(text)
    }

    #[allow(deprecated)]
    fn build_request(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        options: &CompletionOptions,
    ) -> Result<CreateChatCompletionRequest> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone())
            .messages(messages(prompt, system_prompt)?)
            .stream(false);

        if let Some(temperature) = options.temperature {
            args.temperature(temperature);
        }
        // Groq reads the classic `max_tokens` field.
        if let Some(max_tokens) = options.max_tokens {
            args.max_tokens(max_tokens);
        }
        if let Some(top_p) = options.top_p {
            args.top_p(top_p);
        }
        if let Some(stop) = options.stop.as_ref().filter(|s| !s.is_empty()) {
            args.stop(Stop::StringArray(stop.clone()));
        }

        args.build()
            .map_err(|e| DeskError::Validation(format!("Invalid completion request: {e}")))
    }
}

/// System prompt (when non-blank) followed by the user prompt.
fn messages(
    prompt: &str,
    system_prompt: Option<&str>,
) -> Result<Vec<ChatCompletionRequestMessage>> {
    let invalid = |e: OpenAIError| DeskError::Validation(format!("Invalid prompt: {e}"));
    let mut messages = Vec::with_capacity(2);

    if let Some(system) = system_prompt.map(str::trim).filter(|s| !s.is_empty()) {
        messages.push(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system)
                .build()
                .map_err(invalid)?
                .into(),
        );
    }

    messages.push(
        ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(invalid)?
            .into(),
    );

    Ok(messages)
}

fn first_choice_text(response: CreateChatCompletionResponse) -> Result<String> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default();

    match content.trim() {
        "" => Err(DeskError::Llm("LLM returned an empty completion".to_string())),
        text => Ok(text.to_string()),
    }
}

fn failure_kind(error: &OpenAIError) -> Failure {
    match error {
        OpenAIError::Reqwest(e) => match e.status().map(|status| status.as_u16()) {
            Some(429) => Failure::RateLimited,
            Some(401 | 403) => Failure::Unauthorized,
            _ => Failure::Other,
        },
        OpenAIError::ApiError(api) => api_failure_kind(api),
        _ => Failure::Other,
    }
}

/// Providers only return the error body here, so the kind is read from its text.
fn api_failure_kind(api: &ApiError) -> Failure {
    let haystack = format!(
        "{} {} {}",
        api.message,
        api.r#type.as_deref().unwrap_or_default(),
        api.code.as_deref().unwrap_or_default()
    )
    .to_lowercase();

    let any = |needles: &[&str]| needles.iter().any(|n| haystack.contains(n));

    if any(&RATE_LIMIT_MARKERS) {
        Failure::RateLimited
    } else if any(&AUTH_MARKERS) {
        Failure::Unauthorized
    } else {
        Failure::Other
    }
}

fn into_desk_error(error: OpenAIError) -> DeskError {
    let detail = match &error {
        OpenAIError::ApiError(api) => api.message.clone(),
        other => other.to_string(),
    };

    match failure_kind(&error) {
        Failure::RateLimited => DeskError::LlmRateLimit(detail),
        Failure::Unauthorized => DeskError::Llm(format!("LLM authentication failed: {detail}")),
        Failure::Other => match error {
            OpenAIError::InvalidArgument(message) => DeskError::Validation(message),
            OpenAIError::JSONDeserialize(e) => {
                DeskError::Llm(format!("Unreadable LLM response: {e}"))
            }
            OpenAIError::Reqwest(e) => DeskError::Llm(format!("LLM request failed: {e}")),
            _ => DeskError::Llm(format!("LLM provider error: {detail}")),
        },
    }
}
