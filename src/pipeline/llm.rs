//! Model dispatch: route a composed prompt to one of three providers.
//!
//! The providers form a closed set, [`Provider`], each implementing
//! [`CompletionProvider`]. Adding a provider means adding a variant and a
//! `ProviderKind`; call sites only ever talk to [`ModelDispatcher`].
//!
//! ## Response normalisation
//!
//! | Provider  | API shape          | Text taken from                       |
//! |-----------|--------------------|---------------------------------------|
//! | OpenAI    | chat completions   | `choices[0].message.content`          |
//! | Anthropic | messages           | first `content` block of type `text`  |
//! | Google    | `generateContent`  | parts of `candidates[0].content`      |
//!
//! A successful call that yields no usable text soft-fails to a fixed
//! placeholder instead of aborting the pipeline. Transport errors and
//! non-2xx statuses become [`EnhanceError::ProviderError`]. There are no
//! retries and no streaming: one blocking round-trip per request.

use crate::catalog::{ModelId, ProviderKind};
use crate::config::EnhancerConfig;
use crate::error::EnhanceError;
use crate::prompts::Prompt;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Placeholder for an empty completion from OpenAI or Anthropic.
pub const NO_RESPONSE: &str = "No response generated";
/// Placeholder for an empty completion from Gemini.
pub const NO_RESPONSE_GEMINI: &str = "No response generated from Gemini";

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Per-call parameters handed to a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Upstream model variant, e.g. `gpt-4-turbo-preview`.
    pub model: &'static str,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn for_model(model: ModelId, temperature: f32) -> Self {
        Self {
            model: model.upstream_model(),
            max_tokens: model.max_output_tokens(),
            temperature,
        }
    }
}

/// The single capability every provider offers.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Run one completion and return its text, soft-failing on empty output.
    async fn complete(
        &self,
        prompt: &Prompt,
        request: &CompletionRequest,
    ) -> Result<String, EnhanceError>;
}

// ── OpenAI ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: Option<OpenAiMessage>,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

/// OpenAI chat-completions client.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(client: Client, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: trim_base(base_url.into()),
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn complete(
        &self,
        prompt: &Prompt,
        request: &CompletionRequest,
    ) -> Result<String, EnhanceError> {
        let body = OpenAiRequest {
            model: request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body);
        let response: OpenAiResponse = send_json(self.kind(), builder).await?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content);
        Ok(or_placeholder(self.kind(), text, NO_RESPONSE))
    }
}

// ── Anthropic ────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

/// Anthropic messages client.
#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AnthropicProvider {
    pub fn new(client: Client, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: trim_base(base_url.into()),
        }
    }
}

#[async_trait]
impl CompletionProvider for AnthropicProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    async fn complete(
        &self,
        prompt: &Prompt,
        request: &CompletionRequest,
    ) -> Result<String, EnhanceError> {
        let body = AnthropicRequest {
            model: request.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: &prompt.system,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt.user,
            }],
        };

        let builder = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);
        let response: AnthropicResponse = send_json(self.kind(), builder).await?;

        let text = response
            .content
            .into_iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text);
        Ok(or_placeholder(self.kind(), text, NO_RESPONSE))
    }
}

// ── Google ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

/// Google Generative Language client; one instance serves every Gemini variant.
#[derive(Debug, Clone)]
pub struct GoogleProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleProvider {
    pub fn new(client: Client, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: trim_base(base_url.into()),
        }
    }
}

#[async_trait]
impl CompletionProvider for GoogleProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    async fn complete(
        &self,
        prompt: &Prompt,
        request: &CompletionRequest,
    ) -> Result<String, EnhanceError> {
        // No separate system slot: the framing leads the user turn.
        let text = prompt.to_string();
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: &text }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            },
        };

        let builder = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, request.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&body);
        let response: GeminiResponse = send_json(self.kind(), builder).await?;

        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            });
        Ok(or_placeholder(self.kind(), text, NO_RESPONSE_GEMINI))
    }
}

// ── Closed provider set ──────────────────────────────────────────────────

/// Every supported provider.
#[derive(Debug, Clone)]
pub enum Provider {
    Google(GoogleProvider),
    OpenAi(OpenAiProvider),
    Anthropic(AnthropicProvider),
}

#[async_trait]
impl CompletionProvider for Provider {
    fn kind(&self) -> ProviderKind {
        match self {
            Provider::Google(p) => p.kind(),
            Provider::OpenAi(p) => p.kind(),
            Provider::Anthropic(p) => p.kind(),
        }
    }

    async fn complete(
        &self,
        prompt: &Prompt,
        request: &CompletionRequest,
    ) -> Result<String, EnhanceError> {
        match self {
            Provider::Google(p) => p.complete(prompt, request).await,
            Provider::OpenAi(p) => p.complete(prompt, request).await,
            Provider::Anthropic(p) => p.complete(prompt, request).await,
        }
    }
}

/// Routes prompts to the provider behind a [`ModelId`].
///
/// Providers are built once from the configured credentials. A model whose
/// provider has no credential is rejected with
/// [`EnhanceError::ProviderUnavailable`] before any network activity.
#[derive(Debug, Clone)]
pub struct ModelDispatcher {
    providers: Vec<Provider>,
    temperature: f32,
}

impl ModelDispatcher {
    pub fn new(config: &EnhancerConfig) -> Result<Self, EnhanceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| EnhanceError::Internal(format!("Failed to build HTTP client: {e}")))?;

        let mut providers = Vec::new();
        if let Some(ref key) = config.gemini_api_key {
            providers.push(Provider::Google(GoogleProvider::new(
                client.clone(),
                key,
                &config.gemini_base_url,
            )));
        }
        if let Some(ref key) = config.openai_api_key {
            providers.push(Provider::OpenAi(OpenAiProvider::new(
                client.clone(),
                key,
                &config.openai_base_url,
            )));
        }
        if let Some(ref key) = config.anthropic_api_key {
            providers.push(Provider::Anthropic(AnthropicProvider::new(
                client,
                key,
                &config.anthropic_base_url,
            )));
        }

        debug!(
            "Model dispatcher ready with providers: {:?}",
            providers.iter().map(|p| p.kind()).collect::<Vec<_>>()
        );

        Ok(Self {
            providers,
            temperature: config.temperature,
        })
    }

    /// Use an explicit provider list, e.g. in tests.
    pub fn with_providers(providers: Vec<Provider>, temperature: f32) -> Self {
        Self {
            providers,
            temperature,
        }
    }

    pub fn is_available(&self, model: ModelId) -> bool {
        self.provider_for(model.provider()).is_some()
    }

    fn provider_for(&self, kind: ProviderKind) -> Option<&Provider> {
        self.providers.iter().find(|p| p.kind() == kind)
    }

    /// Send `prompt` to the provider serving `model` and return its text.
    pub async fn complete(&self, prompt: &Prompt, model: ModelId) -> Result<String, EnhanceError> {
        let kind = model.provider();
        let provider =
            self.provider_for(kind)
                .ok_or_else(|| EnhanceError::ProviderUnavailable {
                    provider: kind.display_name().to_string(),
                    hint: format!(
                        "Set {} or choose another model (selected: {}).",
                        kind.env_var(),
                        model
                    ),
                })?;

        let request = CompletionRequest::for_model(model, self.temperature);
        info!(
            provider = %kind,
            model = request.model,
            "Requesting completion ({} prompt chars)",
            prompt.user.len()
        );
        let start = Instant::now();
        let text = provider.complete(prompt, &request).await?;
        info!(
            provider = %kind,
            "Completion received: {} chars in {}ms",
            text.len(),
            start.elapsed().as_millis()
        );
        Ok(text)
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Error body shared by all three APIs: `{"error": {"message": "..."}}`.
#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

async fn send_json<T: DeserializeOwned>(
    kind: ProviderKind,
    builder: RequestBuilder,
) -> Result<T, EnhanceError> {
    let provider_error = |message: String| EnhanceError::ProviderError {
        provider: kind.display_name().to_string(),
        message,
    };

    let response = builder.send().await.map_err(|e| {
        if e.is_timeout() {
            provider_error("request timed out".into())
        } else {
            provider_error(e.to_string())
        }
    })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| provider_error(format!("failed to read response: {e}")))?;

    if !status.is_success() {
        let detail = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| body.chars().take(200).collect());
        return Err(provider_error(format!("HTTP {status}: {detail}")));
    }

    serde_json::from_str(&body).map_err(|e| provider_error(format!("unexpected response: {e}")))
}

fn or_placeholder(kind: ProviderKind, text: Option<String>, placeholder: &str) -> String {
    match text {
        Some(t) if !t.trim().is_empty() => t,
        _ => {
            warn!(provider = %kind, "Empty completion; substituting placeholder");
            placeholder.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_model_limits() {
        let r = CompletionRequest::for_model(ModelId::Gemini15Flash, 0.3);
        assert_eq!(r.model, "gemini-1.5-flash");
        assert_eq!(r.max_tokens, 8192);
        assert_eq!(r.temperature, 0.3);

        let r = CompletionRequest::for_model(ModelId::Claude, 0.3);
        assert_eq!(r.model, "claude-3-sonnet-20240229");
        assert_eq!(r.max_tokens, 4096);
    }

    #[test]
    fn dispatcher_only_builds_configured_providers() {
        let config = EnhancerConfig::builder()
            .anthropic_api_key("sk-ant")
            .build()
            .unwrap();
        let d = ModelDispatcher::new(&config).unwrap();
        assert!(d.is_available(ModelId::Claude));
        assert!(!d.is_available(ModelId::OpenAi));
        assert!(!d.is_available(ModelId::Gemini20FlashExp));
    }

    #[tokio::test]
    async fn unconfigured_provider_fails_without_network() {
        // Base URL points nowhere; reaching it would produce ProviderError instead.
        let config = EnhancerConfig::builder()
            .openai_base_url("http://127.0.0.1:9")
            .build()
            .unwrap();
        let d = ModelDispatcher::new(&config).unwrap();
        let prompt = Prompt {
            system: "s".into(),
            user: "u".into(),
        };
        let err = d.complete(&prompt, ModelId::OpenAi).await.unwrap_err();
        match err {
            EnhanceError::ProviderUnavailable { provider, hint } => {
                assert_eq!(provider, "OpenAI");
                assert!(hint.contains("OPENAI_API_KEY"));
            }
            other => panic!("expected ProviderUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn empty_text_soft_fails() {
        assert_eq!(
            or_placeholder(ProviderKind::OpenAi, Some("  \n".into()), NO_RESPONSE),
            NO_RESPONSE
        );
        assert_eq!(
            or_placeholder(ProviderKind::Google, None, NO_RESPONSE_GEMINI),
            NO_RESPONSE_GEMINI
        );
        assert_eq!(
            or_placeholder(ProviderKind::Anthropic, Some("ok".into()), NO_RESPONSE),
            "ok"
        );
    }

    #[test]
    fn anthropic_picks_first_text_block() {
        let json = r#"{"content":[{"type":"tool_use","id":"x"},{"type":"text","text":"hello"}]}"#;
        let r: AnthropicResponse = serde_json::from_str(json).unwrap();
        let text = r
            .content
            .into_iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text);
        assert_eq!(text.as_deref(), Some("hello"));
    }
}
