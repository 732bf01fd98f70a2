//! Document assembly: [`EnhancedContent`] → printable HTML.
//!
//! The template is fixed. Sections appear in this order, each optional one
//! gated by [`RenderOptions`]:
//!
//! 1. cover page (title, author, model badge, date, reading time, source)
//! 2. table of contents, when an outline exists
//! 3. enhanced body
//! 4. original-content appendix, on a new page
//! 5. citations, when any exist
//!
//! Every interpolated value is escaped. Page geometry lives in
//! [`PageLayout`] and is applied by the renderer.

use crate::pipeline::markup::{escape_html, inline_unlinked, markdown_to_html, plain_text_to_html};
use crate::types::{Citation, EnhancedContent, RenderOptions, TocItem};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write as _;

/// Reading speed used for time estimates.
pub const WORDS_PER_MINUTE: usize = 200;

/// Appended to the sanitised title to name the PDF.
pub const FILENAME_SUFFIX: &str = "-enhanced";

/// Estimated reading time in whole minutes, rounded up. Empty text is 0.
pub fn estimate_reading_time(text: &str) -> usize {
    text.split_whitespace().count().div_ceil(WORDS_PER_MINUTE)
}

static RE_NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]+").unwrap());

/// Lowercase, hyphen-separated, alphanumeric-only form of `name`.
pub fn sanitize_filename(name: &str) -> String {
    RE_NON_ALNUM
        .replace_all(name, "-")
        .trim_matches('-')
        .to_lowercase()
}

/// Download filename for a document titled `title`.
pub fn document_filename(title: &str) -> String {
    let stem = sanitize_filename(&format!("{title}{FILENAME_SUFFIX}"));
    format!("{stem}.pdf")
}

/// Paper size, margins and running header/footer for printing.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    /// Inches.
    pub paper_width: f64,
    /// Inches.
    pub paper_height: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub print_background: bool,
    pub header_template: String,
    pub footer_template: String,
}

const RUNNING_STYLE: &str = "font-size: 10px; width: 100%; text-align: center; color: #666;";

impl PageLayout {
    /// A4 with the running title in the header and page numbers in the footer.
    pub fn for_title(title: &str) -> Self {
        Self {
            paper_width: 8.27,
            paper_height: 11.69,
            margin_top: 1.0,
            margin_bottom: 1.0,
            margin_left: 0.8,
            margin_right: 0.8,
            print_background: true,
            header_template: format!(
                "<div style=\"{RUNNING_STYLE}\">{}</div>",
                escape_html(title)
            ),
            footer_template: format!(
                "<div style=\"{RUNNING_STYLE}\">Page <span class=\"pageNumber\"></span> of <span class=\"totalPages\"></span></div>"
            ),
        }
    }
}

/// Assemble the full HTML document.
pub fn assemble_html(content: &EnhancedContent, options: &RenderOptions) -> String {
    let original = &content.original;
    let title = escape_html(&original.title);

    let mut html = String::with_capacity(content.enhanced.len() * 2 + PDF_STYLES.len() + 2048);
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{title} - Enhanced</title>\n<style>{PDF_STYLES}</style>\n</head>\n<body>\n"
    );

    write_cover(&mut html, content);

    if options.include_table_of_contents {
        if let Some(toc) = content.table_of_contents.as_deref().filter(|t| !t.is_empty()) {
            write_toc(&mut html, toc);
        }
    }

    let _ = write!(
        html,
        "<div class=\"main-content\">\n<h1>Enhanced Content</h1>\n\
         <div class=\"content-body\">\n{}</div>\n</div>\n",
        markdown_to_html(&content.enhanced)
    );

    if options.include_original {
        let _ = write!(
            html,
            "<div class=\"page-break\"></div>\n<div class=\"original-content\">\n\
             <h1>Original Content</h1>\n\
             <p class=\"reading-time\">Estimated reading time: {} minutes</p>\n\
             <div class=\"content-body\">\n{}</div>\n</div>\n",
            estimate_reading_time(&original.content),
            plain_text_to_html(&original.content)
        );
    }

    if options.include_citations {
        if let Some(citations) = content.citations.as_deref().filter(|c| !c.is_empty()) {
            write_citations(&mut html, citations);
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn write_cover(html: &mut String, content: &EnhancedContent) {
    let original = &content.original;
    let generated = chrono::Local::now().format("%Y-%m-%d");

    let _ = write!(
        html,
        "<div class=\"cover-page\">\n<div class=\"cover-content\">\n\
         <h1 class=\"cover-title\">{}</h1>\n",
        escape_html(&original.title)
    );
    if let Some(author) = original.author.as_deref().filter(|a| !a.trim().is_empty()) {
        let _ = writeln!(html, "<p class=\"cover-author\">By {}</p>", escape_html(author));
    }
    let _ = write!(
        html,
        "<div class=\"cover-metadata\">\n\
         <p><strong>Enhanced with:</strong> {} ({})</p>\n\
         <p><strong>Generated:</strong> {generated}</p>\n\
         <p><strong>Estimated reading time:</strong> {} minutes</p>\n",
        escape_html(&content.model.as_str().to_uppercase()),
        content.action,
        estimate_reading_time(&content.enhanced)
    );
    if let Some(url) = original.url.as_deref() {
        let url = escape_html(url);
        let _ = writeln!(
            html,
            "<p><strong>Original source:</strong> <a href=\"{url}\">{url}</a></p>"
        );
    }
    html.push_str("</div>\n</div>\n</div>\n");
}

enum TocStep<'a> {
    Open(&'a TocItem),
    Close,
}

/// Nested `<ul>` lists, walked iteratively with an explicit stack.
fn write_toc(html: &mut String, toc: &[TocItem]) {
    html.push_str("<div class=\"toc\">\n<h1>Table of Contents</h1>\n<ul>\n");

    let mut stack: Vec<TocStep<'_>> = toc.iter().rev().map(TocStep::Open).collect();
    while let Some(step) = stack.pop() {
        match step {
            TocStep::Open(item) => {
                let _ = write!(
                    html,
                    "<li class=\"level-{}\"><a href=\"#{}\">{}</a>",
                    item.level,
                    escape_html(&item.id),
                    inline_unlinked(&item.title)
                );
                if item.children.is_empty() {
                    html.push_str("</li>\n");
                } else {
                    html.push_str("\n<ul>\n");
                    stack.push(TocStep::Close);
                    stack.extend(item.children.iter().rev().map(TocStep::Open));
                }
            }
            TocStep::Close => html.push_str("</ul>\n</li>\n"),
        }
    }

    html.push_str("</ul>\n</div>\n");
}

fn write_citations(html: &mut String, citations: &[Citation]) {
    html.push_str("<div class=\"citations\">\n<h1>Citations &amp; References</h1>\n");
    for (i, c) in citations.iter().enumerate() {
        let _ = write!(
            html,
            "<div class=\"citation\">\n<div class=\"citation-title\">[{}] {}</div>\n\
             <div class=\"citation-meta\">\n",
            i + 1,
            escape_html(&c.title)
        );
        if let Some(ref author) = c.author {
            let _ = writeln!(html, "Author: {}<br>", escape_html(author));
        }
        if let Some(ref url) = c.url {
            let url = escape_html(url);
            let _ = writeln!(html, "URL: <a href=\"{url}\">{url}</a><br>");
        }
        if let Some(ref date) = c.published_date {
            let _ = writeln!(html, "Published: {}<br>", escape_html(date));
        }
        if let Some(ref description) = c.description {
            let _ = writeln!(html, "Description: {}", escape_html(description));
        }
        html.push_str("</div>\n</div>\n");
    }
    html.push_str("</div>\n");
}

const PDF_STYLES: &str = r#"
* { box-sizing: border-box; }
body { font-family: 'Georgia', serif; line-height: 1.6; color: #333; margin: 0; padding: 0; }
.cover-page { height: 100vh; display: flex; align-items: center; justify-content: center; text-align: center; page-break-after: always; }
.cover-title { font-size: 2.5em; margin-bottom: 0.5em; color: #2c3e50; }
.cover-author { font-size: 1.2em; color: #7f8c8d; margin-bottom: 2em; }
.cover-metadata { font-size: 0.9em; color: #666; max-width: 500px; margin: 0 auto; }
.cover-metadata p { margin: 0.5em 0; }
.toc { page-break-after: always; padding: 2em 0; }
.toc h1 { color: #2c3e50; border-bottom: 2px solid #3498db; padding-bottom: 0.5em; }
.toc ul { list-style: none; padding-left: 0; }
.toc li { margin: 0.5em 0; padding-left: 1em; }
.toc .level-2 { padding-left: 2em; }
.toc .level-3 { padding-left: 3em; }
.toc .level-4 { padding-left: 4em; }
.main-content { padding: 2em 0; }
.content-body { text-align: justify; }
.content-body h1, .content-body h2, .content-body h3,
.content-body h4, .content-body h5, .content-body h6 { color: #2c3e50; margin-top: 2em; margin-bottom: 1em; }
.content-body h1 { font-size: 2em; border-bottom: 2px solid #3498db; padding-bottom: 0.5em; }
.content-body h2 { font-size: 1.5em; }
.content-body p { margin: 1em 0; }
.content-body ul, .content-body ol { margin: 1em 0; padding-left: 2em; }
.content-body blockquote { border-left: 4px solid #3498db; padding-left: 1em; margin: 1.5em 0; font-style: italic; color: #666; }
.original-content { padding: 2em 0; color: #555; }
.original-content h1 { color: #2c3e50; border-bottom: 2px solid #e74c3c; padding-bottom: 0.5em; }
.reading-time { font-size: 0.9em; color: #888; }
.citations { page-break-before: always; padding: 2em 0; }
.citations h1 { color: #2c3e50; border-bottom: 2px solid #3498db; padding-bottom: 0.5em; }
.citation { margin: 1em 0; padding: 1em; border-left: 3px solid #3498db; background-color: #f8f9fa; }
.citation-title { font-weight: bold; color: #2c3e50; }
.citation-meta { font-size: 0.9em; color: #666; margin-top: 0.5em; }
.page-break { page-break-before: always; }
a { color: #3498db; text-decoration: none; }
@media print { body { font-size: 12pt; } }
"#;
