//! Shared doubles for the pipeline integration tests

#![allow(dead_code)]

use deckpress::dom::{GeometryScan, Isolation, Rect, SlideGeometry};
use deckpress::isolate::StyleAssignment;
use deckpress::{Engine, EngineConfig, Error, ExportConfig, PageFormat, Result, ScriptResult, SlideSurface};
use lopdf::{Dictionary, Document, Object, Stream};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const CANVAS_WIDTH: f64 = 1920.0;

pub const TITLES: [&str; 11] = [
    "Acme Robotics",
    "The Problem",
    "Our Solution",
    "Product",
    "Traction",
    "How It Works",
    "Market Size",
    "Business Model",
    "Competition",
    "The Opportunity",
    "The Ask",
];

/// One-page PDF whose content stream shows `label`
pub fn one_page_pdf(label: &str, format: &PageFormat) -> Vec<u8> {
    let (w, h) = format.size_pt();
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();
    let content = format!("BT /F1 18 Tf 36 36 Td ({}) Tj ET", label);
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let mut page = Dictionary::new();
    page.set("Type", Object::Name(b"Page".to_vec()));
    page.set("Parent", Object::Reference(pages_id));
    page.set("Contents", Object::Reference(content_id));
    let page_id = doc.add_object(page);

    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
    pages.set("Count", Object::Integer(1));
    pages.set(
        "MediaBox",
        Object::Array(vec![0.into(), 0.into(), Object::Real(w as f32), Object::Real(h as f32)]),
    );
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Text of every page's content stream, in page order
pub fn page_labels(path: &Path) -> Vec<String> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|id| String::from_utf8_lossy(&doc.get_page_content(*id).unwrap()).into_owned())
        .collect()
}

/// In-memory deck that models slide activation, wrapper position and
/// content scaling the way the rendered document behaves.
pub struct MockDeck {
    pub titles: Vec<String>,
    pub heights: Vec<f64>,
    /// Requested slide -> (slide that ends up visible, times it happens)
    pub misaligned: HashMap<usize, (usize, u32)>,
    pub fail_print_at: Option<usize>,

    active: Vec<bool>,
    offset: usize,
    visible_override: Option<usize>,
    pub scale: f64,

    pub loads: usize,
    pub css: Vec<String>,
    pub hidden: Vec<String>,
    pub isolations: Vec<usize>,
    pub corrections: Vec<(usize, usize)>,
    pub scales: Vec<(usize, f64)>,
    pub printed: usize,
    pub resets: usize,
    pub settles: Vec<Duration>,
}

impl MockDeck {
    pub fn new(count: usize) -> Self {
        Self {
            titles: (0..count)
                .map(|i| TITLES.get(i).map(|t| t.to_string()).unwrap_or_else(|| format!("Slide {}", i + 1)))
                .collect(),
            heights: vec![700.0; count],
            misaligned: HashMap::new(),
            fail_print_at: None,
            active: vec![false; count],
            offset: 0,
            visible_override: None,
            scale: 1.0,
            loads: 0,
            css: Vec::new(),
            hidden: Vec::new(),
            isolations: Vec::new(),
            corrections: Vec::new(),
            scales: Vec::new(),
            printed: 0,
            resets: 0,
            settles: Vec::new(),
        }
    }

    /// The eleven-slide pitch deck
    pub fn pitch_deck() -> Self {
        Self::new(TITLES.len())
    }

    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|a| **a).count()
    }

    fn active_index(&self) -> Option<usize> {
        self.active.iter().position(|a| *a)
    }

    fn visible(&self) -> usize {
        self.visible_override.unwrap_or(self.offset)
    }

    fn grayscale(&self) -> bool {
        self.css.iter().any(|c| c.contains("grayscale(100%)"))
    }
}

impl SlideSurface for MockDeck {
    fn load(&mut self, _url: &str) -> Result<usize> {
        self.loads += 1;
        self.css.clear();
        self.hidden.clear();
        self.active = vec![false; self.titles.len()];
        self.active[0] = true;
        self.offset = 0;
        self.visible_override = None;
        self.scale = 1.0;
        Ok(self.titles.len())
    }

    fn inject_style(&mut self, css: &str) -> Result<()> {
        self.css.push(css.to_string());
        Ok(())
    }

    fn hide_elements(&mut self, selectors: &[String]) -> Result<usize> {
        self.hidden.extend(selectors.iter().cloned());
        Ok(selectors.len())
    }

    fn isolate(&mut self, index: usize, corrections: &[StyleAssignment]) -> Result<Isolation> {
        if index >= self.titles.len() {
            return Ok(Isolation { applied: false, active: self.active_count() });
        }
        self.isolations.push(index);
        if !corrections.is_empty() {
            self.corrections.push((index, corrections.len()));
        }
        for (i, a) in self.active.iter_mut().enumerate() {
            *a = i == index;
        }
        self.offset = index;
        self.visible_override = None;
        if let Some((shown, times)) = self.misaligned.get_mut(&index) {
            if *times > 0 {
                *times -= 1;
                self.visible_override = Some(*shown);
            }
        }
        assert_eq!(self.active_count(), 1, "exactly one slide must be active");
        Ok(Isolation { applied: true, active: 1 })
    }

    fn measure_active_content(&mut self) -> Result<Option<f64>> {
        Ok(self.active_index().map(|i| self.heights[i] * self.scale))
    }

    fn apply_content_scale(&mut self, scale: f64) -> Result<bool> {
        match self.active_index() {
            Some(i) => {
                self.scale = scale;
                self.scales.push((i, scale));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn scan_geometry(&mut self) -> Result<GeometryScan> {
        let visible = self.visible() as f64;
        Ok(GeometryScan {
            container: Rect::new(0.0, 0.0, CANVAS_WIDTH, 1080.0),
            slides: self
                .titles
                .iter()
                .enumerate()
                .map(|(i, t)| SlideGeometry {
                    rect: Rect::new((i as f64 - visible) * CANVAS_WIDTH, 0.0, CANVAS_WIDTH, 1080.0),
                    title: t.clone(),
                })
                .collect(),
        })
    }

    fn print_page(&mut self, format: &PageFormat) -> Result<Vec<u8>> {
        if self.fail_print_at == Some(self.printed) {
            return Err(Error::ExportError("printToPDF failed".into()));
        }
        self.printed += 1;
        let mode = if self.grayscale() { "gray" } else { "color" };
        let title = self.titles.get(self.visible()).map(String::as_str).unwrap_or("<blank>");
        let label = format!("{} [{}] x{:.3}", title, mode, self.scale);
        Ok(one_page_pdf(&label, format))
    }

    fn reset_transient(&mut self) -> Result<()> {
        self.resets += 1;
        self.scale = 1.0;
        Ok(())
    }

    fn settle(&mut self, max: Duration) -> Result<()> {
        self.settles.push(max);
        Ok(())
    }
}

/// Engine whose document never shows a slide element
pub struct StallingEngine {
    pub closed: Arc<AtomicBool>,
    pub loads: usize,
}

impl StallingEngine {
    pub fn with_flag(closed: Arc<AtomicBool>) -> Self {
        Self { closed, loads: 0 }
    }
}

impl Engine for StallingEngine {
    fn new(_config: EngineConfig) -> Result<Self> {
        Ok(Self::with_flag(Arc::new(AtomicBool::new(false))))
    }

    fn load_url(&mut self, _url: &str) -> Result<()> {
        self.loads += 1;
        Ok(())
    }

    fn wait_for_selector(&mut self, _selector: &str, timeout_ms: u64) -> Result<()> {
        Err(Error::Timeout(timeout_ms))
    }

    fn evaluate_script_in_page(&mut self, _script: &str) -> Result<ScriptResult> {
        panic!("no script may run before the deck is loaded")
    }

    fn print_to_pdf(&mut self, _format: &PageFormat) -> Result<Vec<u8>> {
        panic!("nothing may be exported before the deck is loaded")
    }

    fn close(self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Config pointing at a throwaway deck document inside `dir`
pub fn config_in(dir: &Path) -> ExportConfig {
    let input = dir.join("deck.html");
    std::fs::write(&input, "<html><body><div class=\"slide\"></div></body></html>").unwrap();
    ExportConfig {
        input,
        output_dir: dir.join("out"),
        ..ExportConfig::default()
    }
}
