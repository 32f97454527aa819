//! Typed access to the deck's rendered document.
//!
//! [`SlideSurface`] is everything the capture pipeline needs from the live
//! rendering session. [`DomSurface`] implements it over any [`crate::Engine`]
//! by evaluating the page scripts in [`scripts`].

mod scripts;
mod surface;

pub use surface::DomSurface;

use crate::isolate::StyleAssignment;
use crate::{PageFormat, Result};
use serde::Deserialize;
use std::time::Duration;

/// A box in CSS pixels, relative to the viewport
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Rendered box and heading text of one slide
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SlideGeometry {
    pub rect: Rect,
    /// Text of the first `h2`, else the first `h1`, else empty
    pub title: String,
}

/// Canvas box plus every slide's geometry, in document order
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeometryScan {
    pub container: Rect,
    pub slides: Vec<SlideGeometry>,
}

/// Outcome of an isolation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Isolation {
    /// `false` when the index was outside the deck and nothing changed
    pub applied: bool,
    /// Number of slides marked active afterwards
    pub active: usize,
}

/// Read/measure/mutate operations against the loaded deck.
///
/// All operations act on one shared layout state and must be called
/// sequentially; layout-mutating calls should be followed by [`settle`].
///
/// [`settle`]: SlideSurface::settle
pub trait SlideSurface {
    /// Load (or reload) the document, wait for the first slide element and
    /// return the slide count
    fn load(&mut self, url: &str) -> Result<usize>;

    /// Append a stylesheet to the document
    fn inject_style(&mut self, css: &str) -> Result<()>;

    /// Set `display: none` on every element matching the selectors; returns
    /// how many elements were hidden
    fn hide_elements(&mut self, selectors: &[String]) -> Result<usize>;

    /// Activate slide `index`, deactivate all others and apply `corrections`
    /// inside its content region
    fn isolate(&mut self, index: usize, corrections: &[StyleAssignment]) -> Result<Isolation>;

    /// Rendered height of the active slide's content region, if there is one
    fn measure_active_content(&mut self) -> Result<Option<f64>>;

    /// Scale the active content region uniformly from its top center and
    /// center it in its slide; returns `false` if there was nothing to scale
    fn apply_content_scale(&mut self, scale: f64) -> Result<bool>;

    fn scan_geometry(&mut self) -> Result<GeometryScan>;

    /// Export the current rendering as one fixed-size page
    fn print_page(&mut self, format: &PageFormat) -> Result<Vec<u8>>;

    /// Clear content transforms and slide alignment overrides
    fn reset_transient(&mut self) -> Result<()>;

    /// Wait until layout is stable, at most `max`
    fn settle(&mut self, max: Duration) -> Result<()>;
}
