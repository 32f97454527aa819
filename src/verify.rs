//! Capture verification: which slide is actually on the canvas?
//!
//! After isolation and scaling, the geometry of every slide is compared to
//! the canvas box. The first slide whose left edge sits within the
//! tolerance of the canvas origin and whose width covers enough of the
//! canvas is the visible one.

use crate::config::VerifyConfig;
use crate::dom::{GeometryScan, SlideSurface};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Characters of heading text kept for diagnostics
pub const TITLE_SNIPPET_CHARS: usize = 50;

/// What to do when the visible slide is not the requested one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MismatchPolicy {
    /// Report the mismatch and export anyway
    Warn,
    /// Re-isolate and re-verify up to `attempts` times, then report and export
    Retry { attempts: u32 },
    /// Abort the run with [`Error::CaptureMismatch`]
    FailClosed,
}

impl Default for MismatchPolicy {
    fn default() -> Self {
        MismatchPolicy::Retry { attempts: 1 }
    }
}

impl MismatchPolicy {
    /// Extra isolation rounds allowed before giving up
    pub fn retries(&self) -> u32 {
        match self {
            MismatchPolicy::Retry { attempts } => *attempts,
            _ => 0,
        }
    }
}

impl FromStr for MismatchPolicy {
    type Err = Error;

    /// Accepts `warn`, `fail-closed`, `retry` and `retry:<n>`
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "warn" => Ok(MismatchPolicy::Warn),
            "fail-closed" => Ok(MismatchPolicy::FailClosed),
            "retry" => Ok(MismatchPolicy::default()),
            other => other
                .strip_prefix("retry:")
                .and_then(|n| n.parse().ok())
                .map(|attempts| MismatchPolicy::Retry { attempts })
                .ok_or_else(|| Error::ConfigError(format!("unknown mismatch policy '{}'", s))),
        }
    }
}

/// The slide found on the canvas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleSlide {
    /// `None` when no slide qualifies
    pub index: Option<usize>,
    pub title: String,
}

/// Result of checking one capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub requested: usize,
    pub visible: VisibleSlide,
}

impl Verification {
    pub fn matches(&self) -> bool {
        self.visible.index == Some(self.requested)
    }

    /// Convert a mismatch into an error
    pub fn into_error(self) -> Error {
        Error::CaptureMismatch {
            requested: self.requested,
            found: self.visible.index,
        }
    }
}

/// Trimmed heading text, whitespace collapsed, cut to [`TITLE_SNIPPET_CHARS`]
pub fn title_snippet(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(TITLE_SNIPPET_CHARS)
        .collect()
}

/// Find the slide geometrically occupying the canvas
pub fn locate_visible_slide(scan: &GeometryScan, cfg: &VerifyConfig) -> VisibleSlide {
    let canvas = &scan.container;
    scan.slides
        .iter()
        .position(|s| {
            (s.rect.left - canvas.left).abs() <= cfg.tolerance_px
                && s.rect.width >= canvas.width * cfg.min_coverage
        })
        .map(|i| VisibleSlide {
            index: Some(i),
            title: title_snippet(&scan.slides[i].title),
        })
        .unwrap_or(VisibleSlide { index: None, title: String::new() })
}

/// Scan the surface and compare the visible slide with `requested`
pub fn verify<S: SlideSurface + ?Sized>(
    surface: &mut S,
    requested: usize,
    cfg: &VerifyConfig,
) -> Result<Verification> {
    let scan = surface.scan_geometry()?;
    Ok(Verification {
        requested,
        visible: locate_visible_slide(&scan, cfg),
    })
}
