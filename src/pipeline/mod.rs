//! Pipeline stages for article enhancement and PDF generation.
//!
//! Each submodule implements exactly one transformation step.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ llm ──▶ postprocess ──▶ outline/citations ──▶ assemble ──▶ render
//! (URL/text) (scraper) (AI)    (tidy)          (TOC, refs)           (HTML)       (Chromium)
//! ```
//!
//! 1. [`input`]        turn raw user input into [`crate::types::ExtractedContent`]
//! 2. [`extract`]      HTML → readable text and page metadata
//! 3. [`llm`]          route a prompt to one of three providers; the only
//!    stage with provider network I/O
//! 4. [`postprocess`]  deterministic tidy-up of model Markdown
//! 5. [`outline`]      heading hierarchy for the table of contents
//! 6. [`citations`]    reference list for validation reports
//! 7. [`markup`]       minimal Markdown → HTML converter
//! 8. [`assemble`]     fixed document template
//! 9. [`render`]       headless Chromium prints the HTML to PDF

pub mod assemble;
pub mod citations;
pub mod extract;
pub mod input;
pub mod llm;
pub mod markup;
pub mod outline;
pub mod postprocess;
pub mod render;
