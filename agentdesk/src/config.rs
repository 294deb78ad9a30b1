use std::env;
use std::path::PathBuf;

/// Placeholder shipped in sample `.env` files; treated the same as an unset key.
pub const API_KEY_PLACEHOLDER: &str = "your-api-key-here";

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn api_key_from_env() -> Option<String> {
    env::var("GROQ_API_KEY")
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty() && key != API_KEY_PLACEHOLDER)
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub output: OutputConfig,
    pub presentation: PresentationConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

/// Connection and sampling settings for the upstream chat-completion provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    // Upper bound for the reachability ping behind /health
    pub health_timeout_secs: u64,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

/// Slide-count policy. Requested counts outside `min_slides..=max_slides` are clamped.
#[derive(Debug, Clone)]
pub struct PresentationConfig {
    pub default_slides: u32,
    pub min_slides: u32,
    pub max_slides: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: GROQ_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 30,
            health_timeout_secs: 5,
            max_tokens: 300,
            temperature: 0.1,
            top_p: 0.9,
        }
    }
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            default_slides: 4,
            min_slides: 1,
            max_slides: 20,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let presentation_defaults = PresentationConfig::default();
        let llm_defaults = LlmConfig::default();

        Self {
            server: ServerConfig {
                host: env::var("AGENTDESK_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("AGENTDESK_PORT", 8000),
                max_body_bytes: parse_env_or("MAX_BODY_BYTES", 10 * 1024 * 1024),
            },
            llm: LlmConfig {
                api_key: api_key_from_env(),
                base_url: env::var("GROQ_BASE_URL").unwrap_or(llm_defaults.base_url),
                model: env::var("GROQ_MODEL").unwrap_or(llm_defaults.model),
                timeout_secs: parse_env_or("LLM_TIMEOUT", llm_defaults.timeout_secs),
                health_timeout_secs: parse_env_or(
                    "LLM_HEALTH_TIMEOUT",
                    llm_defaults.health_timeout_secs,
                ),
                max_tokens: parse_env_or("LLM_MAX_TOKENS", llm_defaults.max_tokens),
                temperature: parse_env_or("LLM_TEMPERATURE", llm_defaults.temperature),
                top_p: parse_env_or("LLM_TOP_P", llm_defaults.top_p),
            },
            output: OutputConfig {
                dir: env::var("OUTPUT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("outputs")),
            },
            presentation: PresentationConfig {
                default_slides: parse_env_or(
                    "DEFAULT_SLIDES",
                    presentation_defaults.default_slides,
                ),
                min_slides: parse_env_or("MIN_SLIDES", presentation_defaults.min_slides),
                max_slides: parse_env_or("MAX_SLIDES", presentation_defaults.max_slides),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.presentation.normalize();
        config
    }
}

impl PresentationConfig {
    /// Repairs inverted or zero bounds so that clamping never panics.
    pub fn normalize(&mut self) {
        self.min_slides = self.min_slides.max(1);
        if self.max_slides < self.min_slides {
            tracing::warn!(
                "MAX_SLIDES ({}) is below MIN_SLIDES ({}). Using MIN_SLIDES for both.",
                self.max_slides,
                self.min_slides
            );
            self.max_slides = self.min_slides;
        }
        self.default_slides = self.default_slides.clamp(self.min_slides, self.max_slides);
    }

    /// Resolves a requested slide count against the configured policy.
    ///
    /// Absent requests use the default; anything else is clamped into range.
    pub fn resolve(&self, requested: Option<i64>) -> u32 {
        match requested {
            None => self.default_slides,
            Some(count) => {
                let clamped = count.clamp(self.min_slides as i64, self.max_slides as i64);
                clamped as u32
            }
        }
    }
}
