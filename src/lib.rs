//! # content-pdf
//!
//! Turn a web article (or pasted text) into an AI-enhanced PDF.
//!
//! A URL or raw text is reduced to readable content, sent to one of three
//! hosted language models to be summarised, expanded or fact-checked, and
//! the resulting Markdown is laid out as a printable document with a cover
//! page, table of contents and citations, then printed to PDF by headless
//! Chromium.
//!
//! ## Pipeline Overview
//!
//! ```text
//! URL / text
//!  │
//!  ├─ 1. Input     fetch the page or take the text as-is
//!  ├─ 2. Extract   readable text + metadata (scraper)
//!  ├─ 3. Enhance   summarize / expand / validate via Gemini, GPT-4 or Claude
//!  ├─ 4. Tidy      deterministic Markdown clean-up
//!  ├─ 5. Index     heading outline and citations
//!  ├─ 6. Assemble  fixed HTML template
//!  └─ 7. Render    headless Chromium → PDF bytes
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use content_pdf::{
//!     convert_to_file, Action, ChromiumRenderer, ContentInput, ConvertRequest,
//!     EnhancerConfig, ModelDispatcher, ModelId, NoopProgressCallback, ProcessingOptions,
//!     RenderOptions,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credentials from OPENAI_API_KEY / ANTHROPIC_API_KEY / GEMINI_API_KEY
//!     let config = EnhancerConfig::from_env();
//!     let dispatcher = ModelDispatcher::new(&config)?;
//!     let renderer = ChromiumRenderer::from_config(&config);
//!
//!     let request = ConvertRequest {
//!         input: ContentInput::url("https://blog.rust-lang.org/"),
//!         options: ProcessingOptions::new(ModelId::Claude, Action::Summarize),
//!         render_options: RenderOptions::default(),
//!         output: None,
//!     };
//!     let summary =
//!         convert_to_file(&request, &config, &dispatcher, &renderer, &NoopProgressCallback)
//!             .await?;
//!     eprintln!("wrote {}", summary.output_path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `content-pdf` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when embedding the library:
//! ```toml
//! content-pdf = { version = "0.1", default-features = false }
//! ```
//!
//! ## Models
//!
//! | Id | Provider | Upstream model | Max output tokens |
//! |----|----------|----------------|-------------------|
//! | `gemini-2.0-flash-exp` (default) | Google | `gemini-2.0-flash-exp` | 8192 |
//! | `gemini-1.5-flash-latest` | Google | `gemini-1.5-flash-latest` | 8192 |
//! | `gemini-1.5-flash` | Google | `gemini-1.5-flash` | 8192 |
//! | `openai` | OpenAI | `gpt-4-turbo-preview` | 4096 |
//! | `claude` | Anthropic | `claude-3-sonnet-20240229` | 4096 |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod catalog;
pub mod config;
pub mod enhance;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod server;
pub mod types;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use catalog::{list_models, ModelId, ModelInfo, ModelListing, ProviderKind};
pub use config::{EnhancerConfig, EnhancerConfigBuilder};
pub use enhance::{convert_to_file, enhance, extract, generate_document, ConversionSummary, ConvertRequest};
pub use error::EnhanceError;
pub use pipeline::llm::{CompletionProvider, ModelDispatcher, Provider};
pub use pipeline::render::{ChromiumRenderer, DocumentRenderer};
pub use progress::{NoopProgressCallback, PipelineProgressCallback, Stage};
pub use types::{
    Action, Citation, ContentInput, DocumentRequest, EnhancedContent, ExtractedContent,
    ProcessingOptions, RenderOptions, RenderedDocument, TocItem,
};
