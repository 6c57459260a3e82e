//! Configuration for news research operations
//!
//! Loaded once at startup from the environment and shared read-only by
//! `Arc` afterwards.

use crate::error::{NewsError, Result};
use agent_utils::{ConfigError, EnvSource};
use std::time::Duration;

/// Environment variable names
pub mod env {
    /// LLM API key (required)
    pub const GROQ_API_KEY: &str = "GROQ_API_KEY";
    /// LLM model name
    pub const GROQ_MODEL: &str = "GROQ_MODEL";
    /// OpenAI-compatible base URL
    pub const GROQ_API_BASE: &str = "GROQ_API_BASE";
    /// GNews API key (required)
    pub const GNEWS_API_KEY: &str = "GNEWS_API_KEY";
    /// Serper API key (required)
    pub const SERPER_API_KEY: &str = "SERPER_API_KEY";
    /// LLM request timeout in seconds
    pub const TIMEOUT_SECS: &str = "NEWS_CREW_TIMEOUT_SECS";
    /// Attempts per orchestrator run
    pub const MAX_ATTEMPTS: &str = "NEWS_CREW_MAX_ATTEMPTS";
    /// LLM calls per task
    pub const MAX_ITERATIONS: &str = "NEWS_CREW_MAX_ITERATIONS";
    /// GNews requests per minute
    pub const GNEWS_RATE_LIMIT: &str = "GNEWS_RATE_LIMIT";
}

/// Default LLM model
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
/// Default OpenAI-compatible endpoint
pub const DEFAULT_API_BASE: &str = agent_llm::providers::openai::DEFAULT_API_BASE;
/// Default GNews endpoint
pub const DEFAULT_GNEWS_BASE_URL: &str = "https://gnews.io/api/v4";
/// Default Serper endpoint
pub const DEFAULT_SERPER_BASE_URL: &str = "https://google.serper.dev";

/// Configuration for the news research crew
#[derive(Clone)]
pub struct NewsConfig {
    /// LLM API key
    pub groq_api_key: String,

    /// LLM model name
    pub model: String,

    /// OpenAI-compatible base URL
    pub api_base: String,

    /// GNews API key
    pub gnews_api_key: String,

    /// Serper API key
    pub serper_api_key: String,

    /// Deadline for each LLM request
    pub request_timeout: Duration,

    /// Attempts per orchestrator run
    pub max_attempts: usize,

    /// LLM calls allowed per task
    pub max_iterations: usize,

    /// GNews requests per minute
    pub gnews_rate_limit: u32,

    /// Pause between timed-out attempts
    pub retry_pause: Duration,

    /// GNews base URL
    pub gnews_base_url: String,

    /// Serper base URL
    pub serper_base_url: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            groq_api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            gnews_api_key: String::new(),
            serper_api_key: String::new(),
            request_timeout: Duration::from_secs(30),
            max_attempts: 3,
            max_iterations: 8,
            gnews_rate_limit: 30,
            retry_pause: Duration::ZERO,
            gnews_base_url: DEFAULT_GNEWS_BASE_URL.to_string(),
            serper_base_url: DEFAULT_SERPER_BASE_URL.to_string(),
        }
    }
}

impl std::fmt::Debug for NewsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsConfig")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("request_timeout", &self.request_timeout)
            .field("max_attempts", &self.max_attempts)
            .field("max_iterations", &self.max_iterations)
            .field("gnews_rate_limit", &self.gnews_rate_limit)
            .field("retry_pause", &self.retry_pause)
            .finish_non_exhaustive()
    }
}

impl NewsConfig {
    /// Create a new configuration builder
    pub fn builder() -> NewsConfigBuilder {
        NewsConfigBuilder::default()
    }

    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_source(&EnvSource::process())
    }

    /// Load from an arbitrary variable source
    pub fn from_source(source: &EnvSource) -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            groq_api_key: source.require(env::GROQ_API_KEY)?,
            model: source.get_or(env::GROQ_MODEL, DEFAULT_MODEL),
            api_base: source.get_or(env::GROQ_API_BASE, DEFAULT_API_BASE),
            gnews_api_key: source.require(env::GNEWS_API_KEY)?,
            serper_api_key: source.require(env::SERPER_API_KEY)?,
            request_timeout: Duration::from_secs(source.parse_or(
                env::TIMEOUT_SECS,
                defaults.request_timeout.as_secs(),
            )?),
            max_attempts: source.parse_or(env::MAX_ATTEMPTS, defaults.max_attempts)?,
            max_iterations: source.parse_or(env::MAX_ITERATIONS, defaults.max_iterations)?,
            gnews_rate_limit: source.parse_or(env::GNEWS_RATE_LIMIT, defaults.gnews_rate_limit)?,
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let required = [
            (env::GROQ_API_KEY, &self.groq_api_key),
            (env::GNEWS_API_KEY, &self.gnews_api_key),
            (env::SERPER_API_KEY, &self.serper_api_key),
        ];
        if let Some((name, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ConfigError::Missing((*name).to_string()).into());
        }

        let invalid = |name: &str, detail: &str| -> NewsError {
            ConfigError::Invalid {
                name: name.to_string(),
                detail: detail.to_string(),
            }
            .into()
        };

        if self.request_timeout.is_zero() {
            return Err(invalid(env::TIMEOUT_SECS, "must be greater than 0"));
        }
        if self.max_iterations == 0 {
            return Err(invalid(env::MAX_ITERATIONS, "must be greater than 0"));
        }
        if self.gnews_rate_limit == 0 {
            return Err(invalid(env::GNEWS_RATE_LIMIT, "must be greater than 0"));
        }

        Ok(())
    }
}

/// Builder for NewsConfig
#[derive(Debug, Default)]
pub struct NewsConfigBuilder {
    config: NewsConfig,
}

impl NewsConfigBuilder {
    /// Set the LLM API key
    pub fn groq_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.groq_api_key = key.into();
        self
    }

    /// Set the LLM model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the OpenAI-compatible base URL
    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.config.api_base = url.into();
        self
    }

    /// Set the GNews API key
    pub fn gnews_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.gnews_api_key = key.into();
        self
    }

    /// Set the Serper API key
    pub fn serper_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.serper_api_key = key.into();
        self
    }

    /// Set the LLM request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.config.request_timeout = duration;
        self
    }

    /// Set attempts per run
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    /// Set LLM calls per task
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.config.max_iterations = iterations;
        self
    }

    /// Set GNews requests per minute
    pub fn gnews_rate_limit(mut self, per_minute: u32) -> Self {
        self.config.gnews_rate_limit = per_minute;
        self
    }

    /// Set the pause between timed-out attempts
    pub fn retry_pause(mut self, pause: Duration) -> Self {
        self.config.retry_pause = pause;
        self
    }

    /// Point the GNews client elsewhere
    pub fn gnews_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.gnews_base_url = url.into();
        self
    }

    /// Point the Serper client elsewhere
    pub fn serper_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.serper_base_url = url.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<NewsConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
