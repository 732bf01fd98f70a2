//! Orchestration: extraction → enhancement → document → file.
//!
//! Each entry point runs its stages sequentially and returns the first
//! error unchanged; nothing is retried and no partial result is kept. The
//! HTTP handlers call [`extract`], [`enhance`] and [`generate_document`]
//! one per request, while [`convert_to_file`] chains all of them for the CLI.

use crate::config::EnhancerConfig;
use crate::error::EnhanceError;
use crate::pipeline::assemble::{assemble_html, document_filename, estimate_reading_time, PageLayout};
use crate::pipeline::citations::build_citations;
use crate::pipeline::input::{resolve_input, validate_content};
use crate::pipeline::llm::ModelDispatcher;
use crate::pipeline::outline::build_outline;
use crate::pipeline::postprocess::tidy_markdown;
use crate::pipeline::render::DocumentRenderer;
use crate::progress::{PipelineProgressCallback, Stage};
use crate::prompts::compose_prompt;
use crate::types::{
    Action, ContentInput, DocumentRequest, EnhancedContent, ExtractedContent, ProcessingOptions,
    RenderOptions, RenderedDocument,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info};

fn log_failure(operation: &str, e: &EnhanceError) {
    error!(
        stage = e.stage(),
        provider = e.provider().unwrap_or("-"),
        "{operation} failed: {e}"
    );
}

/// Resolve a URL or raw text into [`ExtractedContent`].
pub async fn extract(
    input: &ContentInput,
    config: &EnhancerConfig,
) -> Result<ExtractedContent, EnhanceError> {
    resolve_input(input, config)
        .await
        .inspect_err(|e| log_failure("Extraction", e))
}

/// Run one enhancement: validate, prompt, complete, tidy, index.
///
/// Citations are attached only for [`Action::Validate`] with
/// `generate_citations` set and a source URL present.
pub async fn enhance(
    content: &ExtractedContent,
    options: &ProcessingOptions,
    dispatcher: &ModelDispatcher,
    config: &EnhancerConfig,
) -> Result<EnhancedContent, EnhanceError> {
    let start = Instant::now();
    info!(
        model = %options.model,
        action = %options.action,
        "Enhancing \"{}\" ({} chars)",
        content.title,
        content.content.len()
    );

    let result = async {
        validate_content(content, config.min_content_chars)?;

        let prompt = compose_prompt(content, options.action);
        let raw = dispatcher.complete(&prompt, options.model).await?;
        let enhanced = tidy_markdown(&raw);

        let outline = build_outline(&enhanced);
        let citations = (options.action == Action::Validate && options.generate_citations)
            .then(|| build_citations(content, &enhanced))
            .filter(|c| !c.is_empty());

        Ok::<_, EnhanceError>(EnhancedContent {
            original: content.clone(),
            action: options.action,
            model: options.model,
            citations,
            table_of_contents: (!outline.is_empty()).then_some(outline),
            enhanced,
        })
    }
    .await
    .inspect_err(|e| log_failure("Enhancement", e))?;

    info!(
        "Enhancement complete: {} chars, {} min read, {}ms",
        result.enhanced.len(),
        estimate_reading_time(&result.enhanced),
        start.elapsed().as_millis()
    );
    Ok(result)
}

/// Assemble and render the document for `request`.
pub async fn generate_document(
    request: &DocumentRequest,
    renderer: &dyn DocumentRenderer,
) -> Result<RenderedDocument, EnhanceError> {
    let content = &request.content;
    let options = request.options.unwrap_or_default();

    let html = assemble_html(content, &options);
    let layout = PageLayout::for_title(&content.original.title);
    let bytes = renderer
        .render(&html, &layout)
        .await
        .inspect_err(|e| log_failure("PDF generation", e))?;

    Ok(RenderedDocument {
        filename: document_filename(&content.original.title),
        bytes,
    })
}

/// One end-to-end conversion job for [`convert_to_file`].
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub input: ContentInput,
    pub options: ProcessingOptions,
    pub render_options: RenderOptions,
    /// A file or an existing directory; `None` means the current directory.
    pub output: Option<PathBuf>,
}

/// Result of [`convert_to_file`].
#[derive(Debug, Clone)]
pub struct ConversionSummary {
    pub output_path: PathBuf,
    pub pdf_bytes: usize,
    pub reading_time_minutes: usize,
    pub content: EnhancedContent,
}

/// Run the whole pipeline once and write the PDF.
///
/// A directory target receives the title-derived filename. The write is
/// atomic (temp file + rename), so a failed run never leaves a partial PDF.
pub async fn convert_to_file(
    request: &ConvertRequest,
    config: &EnhancerConfig,
    dispatcher: &ModelDispatcher,
    renderer: &dyn DocumentRenderer,
    progress: &dyn PipelineProgressCallback,
) -> Result<ConversionSummary, EnhanceError> {
    let total_start = Instant::now();

    progress.on_stage_start(Stage::Extract);
    let extracted = extract(&request.input, config)
        .await
        .inspect_err(|e| progress.on_stage_error(Stage::Extract, &e.to_string()))?;
    progress.on_stage_complete(
        Stage::Extract,
        &format!("\"{}\" ({} chars)", extracted.title, extracted.content.len()),
    );

    progress.on_stage_start(Stage::Enhance);
    let content = enhance(&extracted, &request.options, dispatcher, config)
        .await
        .inspect_err(|e| progress.on_stage_error(Stage::Enhance, &e.to_string()))?;
    progress.on_stage_complete(
        Stage::Enhance,
        &format!("{} chars via {}", content.enhanced.len(), content.model),
    );

    progress.on_stage_start(Stage::Render);
    let document_request = DocumentRequest {
        content,
        options: Some(request.render_options),
    };
    let document = generate_document(&document_request, renderer)
        .await
        .inspect_err(|e| progress.on_stage_error(Stage::Render, &e.to_string()))?;
    progress.on_stage_complete(Stage::Render, &format!("{} bytes", document.bytes.len()));

    progress.on_stage_start(Stage::Write);
    let path = resolve_output_path(request.output.as_deref(), &document.filename).await;
    write_atomic(&path, &document.bytes)
        .await
        .inspect_err(|e| {
            log_failure("Write", e);
            progress.on_stage_error(Stage::Write, &e.to_string());
        })?;
    progress.on_stage_complete(Stage::Write, &path.display().to_string());

    info!(
        "Wrote {} ({} bytes) in {}ms",
        path.display(),
        document.bytes.len(),
        total_start.elapsed().as_millis()
    );

    let content = document_request.content;
    Ok(ConversionSummary {
        output_path: path,
        pdf_bytes: document.bytes.len(),
        reading_time_minutes: estimate_reading_time(&content.enhanced),
        content,
    })
}

async fn resolve_output_path(output: Option<&Path>, filename: &str) -> PathBuf {
    match output {
        None => PathBuf::from(filename),
        Some(p) if tokio::fs::metadata(p).await.is_ok_and(|m| m.is_dir()) => p.join(filename),
        Some(p) => p.to_path_buf(),
    }
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), EnhanceError> {
    let write_failed = |source: std::io::Error| EnhanceError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_failed)?;
    }

    let tmp_path = path.with_extension("pdf.tmp");
    tokio::fs::write(&tmp_path, bytes).await.map_err(write_failed)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_failed)?;
    Ok(())
}
