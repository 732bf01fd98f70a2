//! Model catalog: the closed set of selectable model identifiers.
//!
//! | Id                        | Provider  | Upstream model              | Max tokens |
//! |---------------------------|-----------|-----------------------------|-----------:|
//! | `gemini-2.0-flash-exp`    | Google    | `gemini-2.0-flash-exp`      | 8192 |
//! | `gemini-1.5-flash-latest` | Google    | `gemini-1.5-flash-latest`   | 8192 |
//! | `gemini-1.5-flash`        | Google    | `gemini-1.5-flash`          | 8192 |
//! | `openai`                  | OpenAI    | `gpt-4-turbo-preview`       | 4096 |
//! | `claude`                  | Anthropic | `claude-3-sonnet-20240229`  | 4096 |
//!
//! Availability is derived purely from which credentials the
//! [`EnhancerConfig`] carries; listing models never touches the network.

use crate::config::EnhancerConfig;
use crate::error::EnhanceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three provider families a model can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    Google,
    OpenAi,
    Anthropic,
}

impl ProviderKind {
    /// Human-readable provider name, used in messages and the models listing.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Google => "Google",
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Anthropic => "Anthropic",
        }
    }

    /// Environment variable holding this provider's credential.
    pub fn env_var(&self) -> &'static str {
        match self {
            ProviderKind::Google => "GEMINI_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    pub fn is_configured(&self, config: &EnhancerConfig) -> bool {
        match self {
            ProviderKind::Google => config.gemini_api_key.is_some(),
            ProviderKind::OpenAi => config.openai_api_key.is_some(),
            ProviderKind::Anthropic => config.anthropic_api_key.is_some(),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A selectable model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModelId {
    #[default]
    #[serde(rename = "gemini-2.0-flash-exp")]
    Gemini20FlashExp,
    #[serde(rename = "gemini-1.5-flash-latest")]
    Gemini15FlashLatest,
    #[serde(rename = "gemini-1.5-flash")]
    Gemini15Flash,
    #[serde(rename = "openai", alias = "gpt-4")]
    OpenAi,
    #[serde(rename = "claude", alias = "claude-3")]
    Claude,
}

impl ModelId {
    pub const ALL: [ModelId; 5] = [
        ModelId::Gemini20FlashExp,
        ModelId::Gemini15FlashLatest,
        ModelId::Gemini15Flash,
        ModelId::OpenAi,
        ModelId::Claude,
    ];

    /// The identifier used on the wire and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::Gemini20FlashExp => "gemini-2.0-flash-exp",
            ModelId::Gemini15FlashLatest => "gemini-1.5-flash-latest",
            ModelId::Gemini15Flash => "gemini-1.5-flash",
            ModelId::OpenAi => "openai",
            ModelId::Claude => "claude",
        }
    }

    pub fn provider(&self) -> ProviderKind {
        match self {
            ModelId::Gemini20FlashExp | ModelId::Gemini15FlashLatest | ModelId::Gemini15Flash => {
                ProviderKind::Google
            }
            ModelId::OpenAi => ProviderKind::OpenAi,
            ModelId::Claude => ProviderKind::Anthropic,
        }
    }

    /// Model variant name sent to the provider API.
    pub fn upstream_model(&self) -> &'static str {
        match self {
            ModelId::Gemini20FlashExp => "gemini-2.0-flash-exp",
            ModelId::Gemini15FlashLatest => "gemini-1.5-flash-latest",
            ModelId::Gemini15Flash => "gemini-1.5-flash",
            ModelId::OpenAi => "gpt-4-turbo-preview",
            ModelId::Claude => "claude-3-sonnet-20240229",
        }
    }

    pub fn max_output_tokens(&self) -> u32 {
        match self.provider() {
            ProviderKind::Google => 8192,
            ProviderKind::OpenAi | ProviderKind::Anthropic => 4096,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ModelId::Gemini20FlashExp => "Gemini 2.0 Flash (Experimental)",
            ModelId::Gemini15FlashLatest => "Gemini 1.5 Flash (Latest)",
            ModelId::Gemini15Flash => "Gemini 1.5 Flash",
            ModelId::OpenAi => "GPT-4 Turbo",
            ModelId::Claude => "Claude 3 Sonnet",
        }
    }

    fn description(&self, available: bool) -> &'static str {
        match (self, available) {
            (ModelId::Gemini20FlashExp, true) => {
                "Latest experimental Gemini model with enhanced capabilities"
            }
            (ModelId::Gemini20FlashExp, false) => "Latest experimental Gemini model (requires API key)",
            (ModelId::Gemini15FlashLatest, true) => "Latest Gemini 1.5 Flash with most recent updates",
            (ModelId::Gemini15FlashLatest, false) => "Latest Gemini 1.5 Flash (requires API key)",
            (ModelId::Gemini15Flash, true) => "Fast, reliable Gemini model for most use cases",
            (ModelId::Gemini15Flash, false) => "Fast, reliable Gemini model (requires API key)",
            (ModelId::OpenAi, true) => "Premium OpenAI model (API key configured)",
            (ModelId::OpenAi, false) => "Premium OpenAI model (requires API key)",
            (ModelId::Claude, true) => "Premium Anthropic model (API key configured)",
            (ModelId::Claude, false) => "Premium Anthropic model (requires API key)",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = EnhanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini-2.0-flash-exp" => Ok(ModelId::Gemini20FlashExp),
            "gemini-1.5-flash-latest" => Ok(ModelId::Gemini15FlashLatest),
            "gemini-1.5-flash" => Ok(ModelId::Gemini15Flash),
            "openai" | "gpt-4" => Ok(ModelId::OpenAi),
            "claude" | "claude-3" => Ok(ModelId::Claude),
            other => Err(EnhanceError::Validation(format!(
                "Invalid AI model selected: '{other}'"
            ))),
        }
    }
}

/// Credential presence per provider family, as reported by the models listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProviderAvailability {
    pub gemini: bool,
    pub openai: bool,
    pub claude: bool,
}

/// One row of the models listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub id: ModelId,
    pub name: &'static str,
    pub provider: &'static str,
    pub status: &'static str,
    pub status_color: &'static str,
    pub available: bool,
    pub is_default: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelListing {
    pub availability: ProviderAvailability,
    pub models: Vec<ModelInfo>,
}

/// List every model with availability derived from configured credentials.
pub fn list_models(config: &EnhancerConfig) -> ModelListing {
    let availability = ProviderAvailability {
        gemini: ProviderKind::Google.is_configured(config),
        openai: ProviderKind::OpenAi.is_configured(config),
        claude: ProviderKind::Anthropic.is_configured(config),
    };

    let models = ModelId::ALL
        .iter()
        .map(|id| {
            let available = id.provider().is_configured(config);
            ModelInfo {
                id: *id,
                name: id.display_name(),
                provider: id.provider().display_name(),
                status: if available { "AVAILABLE" } else { "API KEY REQUIRED" },
                status_color: if available { "green" } else { "orange" },
                available,
                is_default: *id == ModelId::default(),
                description: id.description(available).to_string(),
            }
        })
        .collect();

    ModelListing {
        availability,
        models,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn google_group_shares_one_provider() {
        for id in [
            ModelId::Gemini20FlashExp,
            ModelId::Gemini15FlashLatest,
            ModelId::Gemini15Flash,
        ] {
            assert_eq!(id.provider(), ProviderKind::Google);
            assert_eq!(id.max_output_tokens(), 8192);
        }
        assert_eq!(ModelId::OpenAi.max_output_tokens(), 4096);
        assert_eq!(ModelId::Claude.max_output_tokens(), 4096);
    }

    #[test]
    fn parse_accepts_aliases_and_rejects_unknown() {
        assert_eq!("gpt-4".parse::<ModelId>().unwrap(), ModelId::OpenAi);
        assert_eq!("Claude-3".parse::<ModelId>().unwrap(), ModelId::Claude);
        assert!(matches!(
            "llama".parse::<ModelId>(),
            Err(EnhanceError::Validation(_))
        ));
    }

    #[test]
    fn serde_uses_wire_ids() {
        let v = serde_json::to_value(ModelId::Gemini15FlashLatest).unwrap();
        assert_eq!(v, "gemini-1.5-flash-latest");
        let id: ModelId = serde_json::from_str("\"claude-3\"").unwrap();
        assert_eq!(id, ModelId::Claude);
        assert!(serde_json::from_str::<ModelId>("\"mistral\"").is_err());
    }

    #[test]
    fn listing_reflects_credentials() {
        let config = EnhancerConfig::builder()
            .openai_api_key("sk-test")
            .build()
            .unwrap();
        let listing = list_models(&config);
        assert!(listing.availability.openai);
        assert!(!listing.availability.gemini);
        assert!(!listing.availability.claude);
        assert_eq!(listing.models.len(), 5);

        let openai = listing.models.iter().find(|m| m.id == ModelId::OpenAi).unwrap();
        assert_eq!(openai.status, "AVAILABLE");
        let claude = listing.models.iter().find(|m| m.id == ModelId::Claude).unwrap();
        assert_eq!(claude.status, "API KEY REQUIRED");
        assert!(claude.description.contains("requires API key"));

        let defaults: Vec<_> = listing.models.iter().filter(|m| m.is_default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id, ModelId::Gemini20FlashExp);
    }

    #[test]
    fn descriptions_follow_availability() {
        let config = EnhancerConfig::builder()
            .openai_api_key("sk-test")
            .build()
            .unwrap();
        let listing = list_models(&config);
        let find = |id| listing.models.iter().find(|m| m.id == id).unwrap();

        assert_eq!(
            find(ModelId::OpenAi).description,
            "Premium OpenAI model (API key configured)"
        );
        assert_eq!(
            find(ModelId::Claude).description,
            "Premium Anthropic model (requires API key)"
        );
        assert_eq!(
            find(ModelId::Gemini20FlashExp).description,
            "Latest experimental Gemini model (requires API key)"
        );
        assert_eq!(
            ModelId::Gemini15Flash.description(true),
            "Fast, reliable Gemini model for most use cases"
        );
    }
}
