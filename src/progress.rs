//! Progress-callback trait for pipeline stage events.
//!
//! Pass a [`PipelineProgressCallback`] to
//! [`crate::enhance::convert_to_file`] to hear about each stage as it
//! starts, finishes or fails. The CLI drives its spinner from these events;
//! library users can forward them anywhere.
//!
//! # Example
//!
//! ```rust
//! use content_pdf::{PipelineProgressCallback, Stage};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl PipelineProgressCallback for CountingCallback {
//!     fn on_stage_complete(&self, stage: Stage, detail: &str) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{stage}: {detail}");
//!     }
//! }
//! ```

use std::fmt;

/// One step of [`crate::enhance::convert_to_file`], in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Extract,
    Enhance,
    Render,
    Write,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Extract, Stage::Enhance, Stage::Render, Stage::Write];

    /// Present-tense label for spinners.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Extract => "Extracting content",
            Stage::Enhance => "Enhancing with AI",
            Stage::Render => "Rendering PDF",
            Stage::Write => "Writing file",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Extract => "extract",
            Stage::Enhance => "enhance",
            Stage::Render => "render",
            Stage::Write => "write",
        })
    }
}

/// Called by the pipeline around each stage.
///
/// All methods default to no-ops so implementors only override what they
/// need. Events arrive sequentially from one task.
pub trait PipelineProgressCallback: Send + Sync {
    fn on_stage_start(&self, stage: Stage) {
        let _ = stage;
    }

    /// `detail` is a short human-readable result, e.g. `"4213 chars"`.
    fn on_stage_complete(&self, stage: Stage, detail: &str) {
        let _ = (stage, detail);
    }

    /// Called once when a stage fails; no further events follow.
    fn on_stage_error(&self, stage: Stage, error: &str) {
        let _ = (stage, error);
    }
}

/// Ignores every event.
pub struct NoopProgressCallback;

impl PipelineProgressCallback for NoopProgressCallback {}
