//! Input resolution: turn a URL or raw text into [`ExtractedContent`].
//!
//! Raw text is accepted as-is (it wins when both fields are given). A URL is
//! validated, downloaded once with the configured user agent and timeout,
//! then run through [`crate::pipeline::extract`]. Pages yielding fewer than
//! `min_extracted_chars` readable characters are rejected here so the model
//! is never asked to enhance a cookie banner.

use crate::config::EnhancerConfig;
use crate::error::EnhanceError;
use crate::pipeline::extract::{extract_metadata, extract_readable_text};
use crate::types::{ContentInput, ContentMetadata, ExtractedContent};
use std::time::Duration;
use tracing::{debug, info};

pub const USER_TEXT_TITLE: &str = "User Provided Text";
pub const USER_TEXT_AUTHOR: &str = "User Input";

/// Check if the input string is an absolute HTTP/HTTPS URL.
pub fn is_url(input: &str) -> bool {
    match reqwest::Url::parse(input) {
        Ok(u) => matches!(u.scheme(), "http" | "https") && u.host_str().is_some(),
        Err(_) => false,
    }
}

/// Resolve user input into extracted content.
pub async fn resolve_input(
    input: &ContentInput,
    config: &EnhancerConfig,
) -> Result<ExtractedContent, EnhanceError> {
    let text = input.text.as_deref().filter(|t| !t.trim().is_empty());
    let url = input.url.as_deref().map(str::trim).filter(|u| !u.is_empty());

    match (text, url) {
        (Some(text), _) => Ok(from_text(text)),
        (None, Some(url)) => fetch_and_extract(url, config).await,
        (None, None) => Err(EnhanceError::Validation(
            "Either URL or text content is required".into(),
        )),
    }
}

/// Wrap user-supplied text, stamped with the current time.
pub fn from_text(text: &str) -> ExtractedContent {
    ExtractedContent {
        title: USER_TEXT_TITLE.to_string(),
        author: Some(USER_TEXT_AUTHOR.to_string()),
        published_date: Some(chrono::Utc::now().to_rfc3339()),
        content: text.to_string(),
        url: None,
        metadata: None,
    }
}

/// Download `url` and extract its readable content.
pub async fn fetch_and_extract(
    url: &str,
    config: &EnhancerConfig,
) -> Result<ExtractedContent, EnhanceError> {
    if !is_url(url) {
        return Err(EnhanceError::InvalidUrl {
            input: url.to_string(),
        });
    }

    let html = fetch_html(url, config).await?;
    let content = extract_from_html(url, &html, config.min_extracted_chars)?;
    info!(
        "Extracted {} chars from {} (title: {:?})",
        content.content.len(),
        url,
        content.title
    );
    Ok(content)
}

/// Build [`ExtractedContent`] from an already-downloaded page.
pub fn extract_from_html(
    url: &str,
    html: &str,
    min_chars: usize,
) -> Result<ExtractedContent, EnhanceError> {
    let text = extract_readable_text(html);
    let chars = text.chars().count();
    if chars < min_chars {
        return Err(EnhanceError::InsufficientContent {
            url: url.to_string(),
            chars,
            min: min_chars,
        });
    }

    let meta = extract_metadata(html, Some(url));
    let metadata = ContentMetadata {
        description: meta.description,
        image: meta.image,
        site_name: meta.site_name,
    };

    Ok(ExtractedContent {
        title: meta.title,
        author: meta.author,
        published_date: meta.published_date,
        content: text,
        url: Some(url.to_string()),
        metadata: Some(metadata),
    })
}

async fn fetch_html(url: &str, config: &EnhancerConfig) -> Result<String, EnhanceError> {
    info!("Fetching content from: {}", url);

    let fetch_failed = |reason: String| EnhanceError::FetchFailed {
        url: url.to_string(),
        reason,
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.fetch_timeout_secs))
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|e| fetch_failed(e.to_string()))?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            fetch_failed(format!("timed out after {}s", config.fetch_timeout_secs))
        } else {
            fetch_failed(e.to_string())
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(fetch_failed(format!("HTTP {status}")));
    }

    let html = response.text().await.map_err(|e| fetch_failed(e.to_string()))?;
    debug!("Downloaded {} bytes of HTML", html.len());
    Ok(html)
}

/// Check that content is fit for enhancement, reporting every problem at once.
pub fn validate_content(content: &ExtractedContent, min_chars: usize) -> Result<(), EnhanceError> {
    let mut errors = Vec::new();

    if content.title.trim().is_empty() {
        errors.push("Content title is required".to_string());
    }
    if content.content.trim().chars().count() < min_chars {
        errors.push(format!("Content must be at least {min_chars} characters long"));
    }
    if let Some(ref url) = content.url {
        if !is_url(url) {
            errors.push("Invalid URL format".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(EnhanceError::Validation(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(content: &str) -> ExtractedContent {
        ExtractedContent {
            title: "Title".into(),
            author: None,
            published_date: None,
            content: content.into(),
            url: None,
            metadata: None,
        }
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/post"));
        assert!(is_url("http://example.com"));
        assert!(!is_url("ftp://example.com/file"));
        assert!(!is_url("example.com"));
        assert!(!is_url(""));
    }

    #[test]
    fn text_input_keeps_text_verbatim() {
        let c = from_text("  exactly this  ");
        assert_eq!(c.content, "  exactly this  ");
        assert_eq!(c.title, USER_TEXT_TITLE);
        assert_eq!(c.author.as_deref(), Some(USER_TEXT_AUTHOR));
        assert!(c.url.is_none());
        assert!(c.published_date.is_some());
    }

    #[tokio::test]
    async fn empty_input_is_a_validation_error() {
        let err = resolve_input(&ContentInput::default(), &EnhancerConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EnhanceError::Validation(_)));
    }

    #[tokio::test]
    async fn malformed_url_rejected_before_any_request() {
        let err = resolve_input(&ContentInput::url("not a url"), &EnhancerConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EnhanceError::InvalidUrl { .. }));
    }

    #[test]
    fn thin_pages_are_rejected() {
        let err = extract_from_html(
            "https://example.com",
            "<html><body><p>Too short.</p></body></html>",
            100,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EnhanceError::InsufficientContent { chars: 10, min: 100, .. }
        ));
    }

    #[test]
    fn validation_collects_all_errors() {
        let mut c = sample("short");
        c.title = "  ".into();
        c.url = Some("nope".into());
        let err = validate_content(&c, 50).unwrap_err().to_string();
        assert!(err.contains("title is required"));
        assert!(err.contains("at least 50 characters"));
        assert!(err.contains("Invalid URL"));
    }

    #[test]
    fn validation_accepts_good_content() {
        let c = sample(&"word ".repeat(20));
        assert!(validate_content(&c, 50).is_ok());
    }
}
