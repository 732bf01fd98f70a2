//! Request and result records that flow through the pipeline.
//!
//! Every record is created once per request and never mutated afterwards.
//! Field names serialise in camelCase so the JSON surface matches what
//! browser clients of the HTTP API send and expect.

use crate::catalog::ModelId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which instruction the language model receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Comprehensive summary with headings and bullet points.
    Summarize,
    /// Detailed elaboration with added context.
    Expand,
    /// Fact-check report.
    Validate,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Summarize => "summarize",
            Action::Expand => "expand",
            Action::Validate => "validate",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw user input: a URL to fetch, or text to use as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ContentInput {
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            text: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            url: None,
            text: Some(text.into()),
        }
    }
}

/// Optional page metadata scraped alongside the article text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
}

/// Readable article content produced by extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedContent {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// ISO-8601 timestamp or free text, as found on the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    /// Plain-text body.
    pub content: String,
    /// Source URL when the input was a URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentMetadata>,
}

/// Per-request enhancement settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingOptions {
    pub model: ModelId,
    pub action: Action,
    #[serde(default)]
    pub include_original: bool,
    #[serde(default)]
    pub generate_citations: bool,
}

impl ProcessingOptions {
    pub fn new(model: ModelId, action: Action) -> Self {
        Self {
            model,
            action,
            include_original: false,
            generate_citations: false,
        }
    }
}

/// One entry in the reference list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A node in the table of contents.
///
/// Children always have a strictly greater `level` than their parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocItem {
    pub id: String,
    pub title: String,
    /// Heading depth, 1–6.
    pub level: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TocItem>,
}

/// The AI-enhanced result, with everything needed to render a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedContent {
    pub original: ExtractedContent,
    pub enhanced: String,
    pub action: Action,
    pub model: ModelId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<Citation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_of_contents: Option<Vec<TocItem>>,
}

/// Toggles for the optional document sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    #[serde(default = "default_true")]
    pub include_table_of_contents: bool,
    #[serde(default = "default_true")]
    pub include_citations: bool,
    #[serde(default)]
    pub include_original: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_table_of_contents: true,
            include_citations: true,
            include_original: false,
        }
    }
}

/// Body of a document-generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRequest {
    pub content: EnhancedContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<RenderOptions>,
}

/// A rendered PDF with its download filename.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}
