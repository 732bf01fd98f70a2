//! Error types for the content-pdf library.
//!
//! Every stage of the pipeline returns [`EnhanceError`]. There is no partial
//! recovery: a failure at any stage aborts the rest of the request and the
//! caller may resubmit. The variants group into five families:
//!
//! | Family                | Variants                                              |
//! |-----------------------|-------------------------------------------------------|
//! | validation            | [`EnhanceError::Validation`], [`EnhanceError::InvalidUrl`] |
//! | extraction            | [`EnhanceError::FetchFailed`], [`EnhanceError::InsufficientContent`] |
//! | provider unavailable  | [`EnhanceError::ProviderUnavailable`]                 |
//! | provider error        | [`EnhanceError::ProviderError`]                       |
//! | render                | [`EnhanceError::RenderFailed`]                        |
//!
//! The one deliberate soft-fail, an empty-but-successful completion, never
//! reaches this type; see [`crate::pipeline::llm`].

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the content-pdf library.
#[derive(Debug, Error)]
pub enum EnhanceError {
    // ── Validation errors ─────────────────────────────────────────────────
    /// Required input is missing or malformed.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The string is not an absolute HTTP/HTTPS URL.
    #[error("Invalid URL format: '{input}'")]
    InvalidUrl { input: String },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The page could not be downloaded.
    #[error("Failed to fetch content from '{url}': {reason}")]
    FetchFailed { url: String, reason: String },

    /// The page was downloaded but too little readable text was found.
    #[error("Could not extract meaningful content from '{url}' ({chars} characters, need {min})")]
    InsufficientContent { url: String, chars: usize, min: usize },

    // ── Provider errors ───────────────────────────────────────────────────
    /// The selected model's provider has no usable credential.
    #[error("{provider} provider is not configured.\n{hint}")]
    ProviderUnavailable { provider: String, hint: String },

    /// The upstream completion call failed or returned unusable data.
    #[error("{provider} processing failed: {message}")]
    ProviderError { provider: String, message: String },

    // ── Render errors ─────────────────────────────────────────────────────
    /// The headless renderer could not produce a document.
    #[error("PDF generation failed: {0}")]
    RenderFailed(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EnhanceError {
    /// Pipeline stage that produced the error, for structured logs.
    pub fn stage(&self) -> &'static str {
        match self {
            EnhanceError::Validation(_) | EnhanceError::InvalidUrl { .. } => "validation",
            EnhanceError::FetchFailed { .. } | EnhanceError::InsufficientContent { .. } => {
                "extraction"
            }
            EnhanceError::ProviderUnavailable { .. } | EnhanceError::ProviderError { .. } => {
                "enhancement"
            }
            EnhanceError::RenderFailed(_) => "render",
            EnhanceError::OutputWriteFailed { .. } => "output",
            EnhanceError::InvalidConfig(_) => "config",
            EnhanceError::Internal(_) => "internal",
        }
    }

    /// Provider name, for the two provider variants.
    pub fn provider(&self) -> Option<&str> {
        match self {
            EnhanceError::ProviderUnavailable { provider, .. }
            | EnhanceError::ProviderError { provider, .. } => Some(provider),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_is_provider_qualified() {
        let e = EnhanceError::ProviderError {
            provider: "Gemini".into(),
            message: "quota exceeded".into(),
        };
        let msg = e.to_string();
        assert!(msg.starts_with("Gemini"), "got: {msg}");
        assert!(msg.contains("quota exceeded"));
        assert_eq!(e.provider(), Some("Gemini"));
        assert_eq!(e.stage(), "enhancement");
    }

    #[test]
    fn insufficient_content_display() {
        let e = EnhanceError::InsufficientContent {
            url: "https://example.com".into(),
            chars: 12,
            min: 100,
        };
        let msg = e.to_string();
        assert!(msg.contains("12 characters"), "got: {msg}");
        assert!(msg.contains("need 100"));
        assert_eq!(e.stage(), "extraction");
    }

    #[test]
    fn stages_cover_every_family() {
        assert_eq!(EnhanceError::Validation("x".into()).stage(), "validation");
        assert_eq!(
            EnhanceError::InvalidUrl { input: "nope".into() }.stage(),
            "validation"
        );
        assert_eq!(EnhanceError::RenderFailed("boom".into()).stage(), "render");
        assert_eq!(EnhanceError::Internal("x".into()).provider(), None);
    }
}
