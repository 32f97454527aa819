//! The pipeline driver.
//!
//! Per variant: load, inject style, then for every slide in order isolate,
//! fit, verify and export, and finally assemble and persist. Variants run
//! one after another, each on a fresh load of the source document.

use crate::assemble::{DocumentAssembler, PersistedDocument};
use crate::autoscale::{autoscale, FitOutcome};
use crate::config::{ExportConfig, VariantSpec};
use crate::dom::SlideSurface;
use crate::export::export_page;
use crate::isolate::isolate;
use crate::progress::CaptureObserver;
use crate::verify::{verify, MismatchPolicy, Verification};
use crate::{style, Result};
use log::{debug, info};

/// Per-slide record of what the pipeline did
#[derive(Debug, Clone, PartialEq)]
pub struct SlideCapture {
    pub index: usize,
    pub scale: f64,
    /// Visible slide at capture time when it was not the requested one
    pub mismatch: Option<Option<usize>>,
    /// Isolation rounds performed (1 unless retried)
    pub attempts: u32,
}

/// Outcome of one variant pass
#[derive(Debug, Clone, PartialEq)]
pub struct VariantReport {
    pub variant: VariantSpec,
    pub document: PersistedDocument,
    pub slides: Vec<SlideCapture>,
}

impl VariantReport {
    pub fn mismatches(&self) -> usize {
        self.slides.iter().filter(|s| s.mismatch.is_some()).count()
    }
}

/// Everything a completed run produced
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub variants: Vec<VariantReport>,
    pub documents: Vec<PersistedDocument>,
}

/// Sequential driver over a single [`SlideSurface`]
pub struct Driver<'a> {
    config: &'a ExportConfig,
    observer: &'a dyn CaptureObserver,
}

impl<'a> Driver<'a> {
    pub fn new(config: &'a ExportConfig, observer: &'a dyn CaptureObserver) -> Self {
        Self { config, observer }
    }

    /// Run every configured variant; the first error aborts the run.
    ///
    /// Containers persisted before a failure stay on disk.
    pub fn run<S: SlideSurface + ?Sized>(&self, surface: &mut S) -> Result<ExportReport> {
        self.config.validate()?;
        let url = self.config.input_url()?;
        info!("Loading deck from: {}", url);

        let mut variants = Vec::with_capacity(self.config.variants.len());
        for variant in &self.config.variants {
            variants.push(self.run_variant(surface, &url, variant)?);
        }

        let documents = variants.iter().map(|v| v.document.clone()).collect();
        Ok(ExportReport { variants, documents })
    }

    fn run_variant<S: SlideSurface + ?Sized>(
        &self,
        surface: &mut S,
        url: &str,
        variant: &VariantSpec,
    ) -> Result<VariantReport> {
        let slide_count = surface.load(url)?;
        self.observer.on_document_loaded(variant, slide_count);
        self.observer.on_variant_start(variant);

        style::inject(surface, &self.config.selectors, variant.mode)?;
        surface.settle(self.config.settle.after_style())?;

        let mut assembler = DocumentAssembler::new();
        let mut slides = Vec::with_capacity(slide_count);
        for index in 0..slide_count {
            self.observer.on_slide_start(index, slide_count);
            let (capture, page) = self.capture_slide(surface, index, slide_count)?;
            assembler.append(&page)?;
            slides.push(capture);
        }

        let path = self.config.output_path(variant);
        let document = assembler.persist(&path)?;
        debug!("{} sha256 {}", document.path.display(), document.sha256);
        self.observer
            .on_variant_persisted(variant, &document.path, document.pages);

        Ok(VariantReport {
            variant: variant.clone(),
            document,
            slides,
        })
    }

    /// Isolate, fit and verify slide `index`, retrying per the mismatch
    /// policy, then export it
    fn capture_slide<S: SlideSurface + ?Sized>(
        &self,
        surface: &mut S,
        index: usize,
        slide_count: usize,
    ) -> Result<(SlideCapture, Vec<u8>)> {
        let policy = self.config.verify.policy;
        let mut attempts = 0;
        let (fit, verification) = loop {
            attempts += 1;
            let (fit, verification) = self.prepare(surface, index, slide_count)?;
            if verification.matches() || attempts > policy.retries() {
                break (fit, verification);
            }
            debug!(
                "Slide {} not on canvas (attempt {}), isolating again",
                index + 1,
                attempts
            );
            surface.reset_transient()?;
        };

        if let (true, Some(height)) = (fit.scaled(), fit.height) {
            self.observer.on_scale_applied(index, height, fit.scale);
        }

        let mismatch = if verification.matches() {
            self.observer
                .on_slide_captured(index, &verification.visible.title);
            None
        } else {
            self.observer.on_capture_mismatch(
                index,
                verification.visible.index,
                &verification.visible.title,
            );
            if policy == MismatchPolicy::FailClosed {
                surface.reset_transient()?;
                return Err(verification.into_error());
            }
            Some(verification.visible.index)
        };

        let page = export_page(surface, &self.config.page)?;
        let capture = SlideCapture {
            index,
            scale: fit.scale,
            mismatch,
            attempts,
        };
        Ok((capture, page))
    }

    fn prepare<S: SlideSurface + ?Sized>(
        &self,
        surface: &mut S,
        index: usize,
        slide_count: usize,
    ) -> Result<(FitOutcome, Verification)> {
        let settle = &self.config.settle;

        isolate(surface, index, slide_count)?;
        surface.settle(settle.after_isolate())?;

        let fit = autoscale(surface, &self.config.fit)?;
        surface.settle(settle.after_fit(fit.scaled()))?;

        let verification = verify(surface, index, &self.config.verify)?;
        Ok((fit, verification))
    }
}
