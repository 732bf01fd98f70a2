//! Configuration for the extraction → enhancement → render pipeline.
//!
//! All behaviour is controlled through [`EnhancerConfig`], built via its
//! [`EnhancerConfigBuilder`] or read from the process environment with
//! [`EnhancerConfig::from_env`].
//!
//! Provider credentials live here rather than in module-level globals: the
//! [`crate::pipeline::llm::ModelDispatcher`] is constructed from a config, so
//! whether a provider is usable is settled once, at construction time.

use crate::error::EnhanceError;
use std::fmt;
use std::path::PathBuf;

/// Placeholder credential shipped in sample `.env` files;
/// treated as "no key configured".
const DUMMY_KEY: &str = "dummy_key_for_testing";

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; content-pdf/0.1)";

/// Configuration shared by every pipeline stage.
///
/// # Example
/// ```rust
/// use content_pdf::EnhancerConfig;
///
/// let config = EnhancerConfig::builder()
///     .openai_api_key("sk-test")
///     .fetch_timeout_secs(10)
///     .build()
///     .unwrap();
/// assert!(config.openai_api_key.is_some());
/// ```
#[derive(Clone)]
pub struct EnhancerConfig {
    /// OpenAI API key. `None` makes the `openai` model unavailable.
    pub openai_api_key: Option<String>,

    /// Anthropic API key. `None` makes the `claude` model unavailable.
    pub anthropic_api_key: Option<String>,

    /// Google Generative Language API key. `None` makes every Gemini model unavailable.
    pub gemini_api_key: Option<String>,

    /// Base URL for the OpenAI chat-completions API.
    pub openai_base_url: String,

    /// Base URL for the Anthropic messages API.
    pub anthropic_base_url: String,

    /// Base URL for the Gemini `generateContent` API.
    pub gemini_base_url: String,

    /// Sampling temperature for every provider. Default: 0.3.
    pub temperature: f32,

    /// Timeout for downloading a source page, in seconds. Default: 30.
    pub fetch_timeout_secs: u64,

    /// Timeout for one completion round-trip, in seconds. Default: 120.
    pub api_timeout_secs: u64,

    /// Advisory render deadline in seconds. Default: 45.
    ///
    /// Exceeding it is logged, never enforced.
    pub render_deadline_secs: u64,

    /// Minimum readable characters a fetched page must yield. Default: 100.
    pub min_extracted_chars: usize,

    /// Minimum trimmed content length accepted for enhancement. Default: 50.
    pub min_content_chars: usize,

    /// User-Agent header sent when fetching source pages.
    pub user_agent: String,

    /// Chrome/Chromium executable for the renderer. `None` lets chromiumoxide search.
    pub chrome_executable: Option<PathBuf>,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            anthropic_api_key: None,
            gemini_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            anthropic_base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            temperature: 0.3,
            fetch_timeout_secs: 30,
            api_timeout_secs: 120,
            render_deadline_secs: 45,
            min_extracted_chars: 100,
            min_content_chars: 50,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            chrome_executable: None,
        }
    }
}

impl fmt::Debug for EnhancerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |k: &Option<String>| k.as_ref().map(|_| "<redacted>");
        f.debug_struct("EnhancerConfig")
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("anthropic_api_key", &redact(&self.anthropic_api_key))
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("openai_base_url", &self.openai_base_url)
            .field("anthropic_base_url", &self.anthropic_base_url)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("temperature", &self.temperature)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("render_deadline_secs", &self.render_deadline_secs)
            .field("min_extracted_chars", &self.min_extracted_chars)
            .field("min_content_chars", &self.min_content_chars)
            .field("user_agent", &self.user_agent)
            .field("chrome_executable", &self.chrome_executable)
            .finish()
    }
}

impl EnhancerConfig {
    /// Create a new builder for `EnhancerConfig`.
    pub fn builder() -> EnhancerConfigBuilder {
        EnhancerConfigBuilder {
            config: Self::default(),
        }
    }

    /// Read credentials and the Chrome path from the process environment.
    ///
    /// Reads `OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `GEMINI_API_KEY` and
    /// `CHROME_BIN`. Everything else keeps its default.
    pub fn from_env() -> Self {
        Self {
            openai_api_key: credential_from_env("OPENAI_API_KEY"),
            anthropic_api_key: credential_from_env("ANTHROPIC_API_KEY"),
            gemini_api_key: credential_from_env("GEMINI_API_KEY"),
            chrome_executable: std::env::var_os("CHROME_BIN").map(PathBuf::from),
            ..Self::default()
        }
    }

    /// Continue building from this configuration, e.g. to apply CLI overrides.
    pub fn into_builder(self) -> EnhancerConfigBuilder {
        EnhancerConfigBuilder { config: self }
    }
}

fn credential_from_env(var: &str) -> Option<String> {
    std::env::var(var).ok().and_then(normalise_credential)
}

/// Empty strings and the test placeholder count as "not configured".
fn normalise_credential(key: String) -> Option<String> {
    let trimmed = key.trim();
    if trimmed.is_empty() || trimmed == DUMMY_KEY {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Builder for [`EnhancerConfig`].
#[derive(Debug)]
pub struct EnhancerConfigBuilder {
    config: EnhancerConfig,
}

impl EnhancerConfigBuilder {
    pub fn openai_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.openai_api_key = normalise_credential(key.into());
        self
    }

    pub fn anthropic_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.anthropic_api_key = normalise_credential(key.into());
        self
    }

    pub fn gemini_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.gemini_api_key = normalise_credential(key.into());
        self
    }

    pub fn openai_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.openai_base_url = url.into();
        self
    }

    pub fn anthropic_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.anthropic_base_url = url.into();
        self
    }

    pub fn gemini_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.gemini_base_url = url.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.config.fetch_timeout_secs = secs;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn render_deadline_secs(mut self, secs: u64) -> Self {
        self.config.render_deadline_secs = secs;
        self
    }

    pub fn min_extracted_chars(mut self, n: usize) -> Self {
        self.config.min_extracted_chars = n;
        self
    }

    pub fn min_content_chars(mut self, n: usize) -> Self {
        self.config.min_content_chars = n;
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    pub fn chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.chrome_executable = Some(path.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<EnhancerConfig, EnhanceError> {
        let c = &self.config;
        if c.fetch_timeout_secs == 0 || c.api_timeout_secs == 0 {
            return Err(EnhanceError::InvalidConfig(
                "Timeouts must be ≥ 1 second".into(),
            ));
        }
        for (name, url) in [
            ("openai_base_url", &c.openai_base_url),
            ("anthropic_base_url", &c.anthropic_base_url),
            ("gemini_base_url", &c.gemini_base_url),
        ] {
            if reqwest::Url::parse(url).is_err() {
                return Err(EnhanceError::InvalidConfig(format!(
                    "{name} is not a valid URL: '{url}'"
                )));
            }
        }
        Ok(self.config)
    }
}
