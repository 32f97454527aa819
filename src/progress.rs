//! Progress reporting for the capture pipeline.
//!
//! The driver reports every notable event to a [`CaptureObserver`]. All
//! methods default to no-ops so implementations override only what they
//! need. [`LogObserver`] renders the events as progress lines through the
//! `log` facade.

use crate::config::VariantSpec;
use log::{info, warn};
use std::path::Path;

/// Receives pipeline events, strictly in pipeline order
pub trait CaptureObserver {
    /// A fresh load of the source document found `slide_count` slides
    fn on_document_loaded(&self, variant: &VariantSpec, slide_count: usize) {
        let _ = (variant, slide_count);
    }

    /// A variant pass is starting
    fn on_variant_start(&self, variant: &VariantSpec) {
        let _ = variant;
    }

    /// Slide `index` (0-based) of `total` is about to be captured
    fn on_slide_start(&self, index: usize, total: usize) {
        let _ = (index, total);
    }

    /// Content of slide `index` measured `height` px and was shrunk by `scale`
    fn on_scale_applied(&self, index: usize, height: f64, scale: f64) {
        let _ = (index, height, scale);
    }

    /// The visible slide matched the requested one
    fn on_slide_captured(&self, index: usize, title: &str) {
        let _ = (index, title);
    }

    /// The visible slide differs from the requested one (`None`: no slide visible)
    fn on_capture_mismatch(&self, requested: usize, found: Option<usize>, title: &str) {
        let _ = (requested, found, title);
    }

    /// The container for a variant was written
    fn on_variant_persisted(&self, variant: &VariantSpec, path: &Path, pages: usize) {
        let _ = (variant, path, pages);
    }
}

/// Observer that ignores every event
pub struct NoopObserver;

impl CaptureObserver for NoopObserver {}

/// Observer that writes human-readable progress lines via `log`
pub struct LogObserver;

impl CaptureObserver for LogObserver {
    fn on_document_loaded(&self, _variant: &VariantSpec, slide_count: usize) {
        info!("Found {} slides", slide_count);
    }

    fn on_variant_start(&self, variant: &VariantSpec) {
        info!("Generating {} PDF...", variant.name);
    }

    fn on_slide_start(&self, index: usize, total: usize) {
        info!("  Processing slide {}/{}...", index + 1, total);
    }

    fn on_scale_applied(&self, _index: usize, height: f64, scale: f64) {
        info!(
            "  Content height: {}px, applying {:.1}% scale",
            height.round(),
            scale * 100.0
        );
    }

    fn on_slide_captured(&self, index: usize, title: &str) {
        if title.is_empty() {
            info!("  Capturing: Slide {}", index + 1);
        } else {
            info!("  Capturing: {}", title);
        }
    }

    fn on_capture_mismatch(&self, requested: usize, found: Option<usize>, title: &str) {
        match found {
            Some(found) => warn!(
                "  Expected slide {}, but slide {} is visible ({})",
                requested + 1,
                found + 1,
                title
            ),
            None => warn!("  Expected slide {}, but no slide is visible", requested + 1),
        }
    }

    fn on_variant_persisted(&self, variant: &VariantSpec, path: &Path, pages: usize) {
        info!("{} PDF generated: {} ({} pages)", variant.name, path.display(), pages);
    }
}
