//! HTML → PDF through headless Chromium.
//!
//! Every render launches its own browser and tears it down afterwards; no
//! process is pooled or shared between requests.
//!
//! The render deadline is advisory: a watchdog logs a warning once it
//! passes, but the render is allowed to finish.

use crate::config::EnhancerConfig;
use crate::error::EnhanceError;
use crate::pipeline::assemble::PageLayout;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Turns assembled HTML into document bytes.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(&self, html: &str, layout: &PageLayout) -> Result<Vec<u8>, EnhanceError>;
}

/// [`DocumentRenderer`] backed by a freshly launched headless Chromium.
#[derive(Debug, Clone)]
pub struct ChromiumRenderer {
    chrome_executable: Option<PathBuf>,
    deadline: Duration,
}

impl ChromiumRenderer {
    pub fn new(chrome_executable: Option<PathBuf>, deadline: Duration) -> Self {
        Self {
            chrome_executable,
            deadline,
        }
    }

    pub fn from_config(config: &EnhancerConfig) -> Self {
        Self::new(
            config.chrome_executable.clone(),
            Duration::from_secs(config.render_deadline_secs),
        )
    }

    fn browser_config(&self) -> Result<BrowserConfig, EnhanceError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-setuid-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");
        if let Some(ref path) = self.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        builder
            .build()
            .map_err(|e| EnhanceError::RenderFailed(format!("Invalid browser configuration: {e}")))
    }
}

fn print_params(layout: &PageLayout) -> PrintToPdfParams {
    PrintToPdfParams {
        print_background: Some(layout.print_background),
        display_header_footer: Some(true),
        paper_width: Some(layout.paper_width),
        paper_height: Some(layout.paper_height),
        margin_top: Some(layout.margin_top),
        margin_bottom: Some(layout.margin_bottom),
        margin_left: Some(layout.margin_left),
        margin_right: Some(layout.margin_right),
        header_template: Some(layout.header_template.clone()),
        footer_template: Some(layout.footer_template.clone()),
        ..Default::default()
    }
}

async fn print_page(
    browser: &Browser,
    html: &str,
    layout: &PageLayout,
) -> Result<Vec<u8>, EnhanceError> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| EnhanceError::RenderFailed(format!("Failed to open page: {e}")))?;
    page.set_content(html)
        .await
        .map_err(|e| EnhanceError::RenderFailed(format!("Failed to load document: {e}")))?;
    page.pdf(print_params(layout))
        .await
        .map_err(|e| EnhanceError::RenderFailed(format!("Failed to print PDF: {e}")))
}

#[async_trait]
impl DocumentRenderer for ChromiumRenderer {
    async fn render(&self, html: &str, layout: &PageLayout) -> Result<Vec<u8>, EnhanceError> {
        let start = Instant::now();
        let deadline = self.deadline;
        let watchdog = tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            warn!(
                "PDF rendering still running after {}s; the caller may time out",
                deadline.as_secs()
            );
        });

        let result = async {
            let (mut browser, mut handler) = Browser::launch(self.browser_config()?)
                .await
                .map_err(|e| EnhanceError::RenderFailed(format!("Failed to launch browser: {e}")))?;
            let events = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });
            debug!("Browser launched");

            let printed = print_page(&browser, html, layout).await;

            // Tear down even when printing failed.
            if let Err(e) = browser.close().await {
                warn!("Failed to close browser cleanly: {e}");
            }
            if let Err(e) = browser.wait().await {
                warn!("Failed to reap browser process: {e}");
            }
            let _ = events.await;

            printed
        }
        .await;

        watchdog.abort();

        if let Ok(ref bytes) = result {
            info!(
                "Rendered PDF: {} bytes in {}ms",
                bytes.len(),
                start.elapsed().as_millis()
            );
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_params_follow_layout() {
        let layout = PageLayout::for_title("Title");
        let params = print_params(&layout);
        assert_eq!(params.paper_width, Some(8.27));
        assert_eq!(params.paper_height, Some(11.69));
        assert_eq!(params.margin_top, Some(1.0));
        assert_eq!(params.margin_right, Some(0.8));
        assert_eq!(params.print_background, Some(true));
        assert_eq!(params.display_header_footer, Some(true));
        assert_eq!(params.header_template.as_deref(), Some(layout.header_template.as_str()));
    }

    #[test]
    fn renderer_takes_settings_from_config() {
        let config = EnhancerConfig::builder()
            .render_deadline_secs(10)
            .chrome_executable("/usr/bin/chromium")
            .build()
            .unwrap();
        let r = ChromiumRenderer::from_config(&config);
        assert_eq!(r.deadline, Duration::from_secs(10));
        assert_eq!(r.chrome_executable, Some(PathBuf::from("/usr/bin/chromium")));
    }
}
