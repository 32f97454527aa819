//! Deckpress
//!
//! Exports a paginated, browser-rendered slide deck to multi-page PDF
//! documents, one page per slide, once per visual variant (color and
//! grayscale by default).
//!
//! # Features
//!
//! - **CDP Backend** (default): drives headless Chrome through the Chrome
//!   DevTools Protocol
//! - **Engine seam**: the pipeline only talks to a [`SlideSurface`], so any
//!   [`Engine`] (or a test double) can stand in for the browser
//! - **Capture safety**: per-slide autoscale, visible-slide verification and
//!   a transient-state reset after every page
//!
//! # Example
//!
//! ```no_run
//! use deckpress::{ExportConfig, LogObserver};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExportConfig::default();
//! let report = deckpress::export_deck(&config, &LogObserver)?;
//! for doc in &report.documents {
//!     println!("{} ({} pages)", doc.path.display(), doc.pages);
//! }
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod error;
pub use error::{Error, Result};

pub mod assemble;
pub mod autoscale;
pub mod config;
pub mod dom;
pub mod export;
pub mod isolate;
pub mod pipeline;
pub mod progress;
pub mod style;
pub mod verify;

#[cfg(feature = "cdp")]
pub mod cdp;

pub use assemble::{DocumentAssembler, PersistedDocument};
pub use config::{ColorMode, DeckSelectors, ExportConfig, FitConfig, SettleDelays, VariantSpec, VerifyConfig};
pub use dom::{DomSurface, SlideSurface};
pub use pipeline::{Driver, ExportReport};
pub use progress::{CaptureObserver, LogObserver, NoopObserver};
pub use verify::MismatchPolicy;

/// Configuration for the rendering engine session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Viewport dimensions
    pub viewport: Viewport,
    /// Timeout for document loads in milliseconds
    pub timeout_ms: u64,
    /// Run the browser without a visible window
    pub headless: bool,
    /// Keep the browser's process sandbox enabled
    pub sandbox: bool,
    /// Explicit browser executable; autodetected when `None`
    pub browser_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            timeout_ms: 30000,
            headless: true,
            sandbox: false,
            browser_path: None,
        }
    }
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Fixed-size page export parameters handed to the engine
///
/// Sizes are in inches. `scale` is the engine's own print scale and has
/// nothing to do with the per-slide content autoscale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFormat {
    pub width_in: f64,
    pub height_in: f64,
    pub landscape: bool,
    pub print_background: bool,
    pub display_header_footer: bool,
    pub scale: f64,
    pub margin_in: f64,
}

impl PageFormat {
    /// The landscape A4 canvas every exported page must match
    pub const fn landscape_a4() -> Self {
        Self {
            width_in: 11.69,
            height_in: 8.27,
            landscape: true,
            print_background: true,
            display_header_footer: false,
            scale: 1.0,
            margin_in: 0.0,
        }
    }

    /// Page size in PDF points (1/72 in)
    pub fn size_pt(&self) -> (f64, f64) {
        (self.width_in * 72.0, self.height_in * 72.0)
    }
}

impl Default for PageFormat {
    fn default() -> Self {
        Self::landscape_a4()
    }
}

/// Result of JavaScript execution
///
/// `value` is the string the script returned (pipeline scripts return
/// JSON text). `is_error` indicates whether the script threw.
#[derive(Debug, Clone)]
pub struct ScriptResult {
    /// Returned value
    pub value: String,
    /// Whether the script threw an error
    pub is_error: bool,
}

/// Core trait for rendering engine sessions
pub trait Engine {
    /// Create a new engine instance with the given configuration
    fn new(config: EngineConfig) -> Result<Self>
    where
        Self: Sized;

    /// Load a URL and wait for the document to finish navigating
    fn load_url(&mut self, url: &str) -> Result<()>;

    /// Block until an element matching `selector` appears, or time out
    fn wait_for_selector(&mut self, selector: &str, timeout_ms: u64) -> Result<()>;

    /// Evaluate JavaScript in the page's global context, awaiting promises
    fn evaluate_script_in_page(&mut self, script: &str) -> Result<ScriptResult>;

    /// Export the current rendering as a fixed-size PDF page
    fn print_to_pdf(&mut self, format: &PageFormat) -> Result<Vec<u8>>;

    /// Close the engine and clean up resources
    fn close(self) -> Result<()>;
}

/// Run the whole export against an already-created engine.
///
/// The engine is closed on every exit path; a pipeline error takes
/// precedence over a close error.
pub fn export_with_engine<E: Engine>(
    engine: E,
    config: &ExportConfig,
    observer: &dyn CaptureObserver,
) -> Result<ExportReport> {
    let mut surface = DomSurface::new(engine, config);
    let outcome = Driver::new(config, observer).run(&mut surface);
    let closed = surface.into_engine().close();

    match (outcome, closed) {
        (Ok(report), Ok(())) => Ok(report),
        (Err(e), closed) => {
            if let Err(close_err) = closed {
                log::warn!("Failed to close engine after error: {}", close_err);
            }
            Err(e)
        }
        (Ok(_), Err(e)) => Err(e),
    }
}

/// Launch headless Chrome and export the deck described by `config`.
#[cfg(feature = "cdp")]
pub fn export_deck(config: &ExportConfig, observer: &dyn CaptureObserver) -> Result<ExportReport> {
    config.validate()?;
    let engine = cdp::CdpEngine::new(config.engine.clone())?;
    export_with_engine(engine, config, observer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_engine_config() {
        let config = EngineConfig::default();
        assert_eq!(config.viewport.width, 1920);
        assert_eq!(config.viewport.height, 1080);
        assert_eq!(config.timeout_ms, 30000);
        assert!(config.headless);
        assert!(!config.sandbox);
    }

    #[test]
    fn test_landscape_page_format() {
        let f = PageFormat::default();
        assert!(f.landscape);
        assert!(f.print_background);
        assert!(!f.display_header_footer);
        assert_eq!(f.scale, 1.0);
        assert_eq!(f.margin_in, 0.0);
        let (w, h) = f.size_pt();
        assert!((w - 841.68).abs() < 1e-6);
        assert!((h - 595.44).abs() < 1e-6);
        assert!(w > h);
    }
}
