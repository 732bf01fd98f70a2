//! Shared application state.

use crate::config::EnhancerConfig;
use crate::error::EnhanceError;
use crate::pipeline::llm::ModelDispatcher;
use crate::pipeline::render::{ChromiumRenderer, DocumentRenderer};
use std::sync::Arc;

/// Cloned into every handler. Nothing in here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnhancerConfig>,
    pub dispatcher: Arc<ModelDispatcher>,
    pub renderer: Arc<dyn DocumentRenderer>,
}

impl AppState {
    /// State with the headless-Chromium renderer.
    pub fn new(config: EnhancerConfig) -> Result<Self, EnhanceError> {
        let renderer = Arc::new(ChromiumRenderer::from_config(&config));
        Self::with_renderer(config, renderer)
    }

    pub fn with_renderer(
        config: EnhancerConfig,
        renderer: Arc<dyn DocumentRenderer>,
    ) -> Result<Self, EnhanceError> {
        let dispatcher = ModelDispatcher::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
            renderer,
        })
    }
}
