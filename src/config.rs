//! Export configuration.
//!
//! Every field defaults to the fixed constants the exporter was tuned with;
//! a JSON file (see [`ExportConfig::from_json_file`]) may override the
//! locations, engine options and verification policy.

use crate::verify::MismatchPolicy;
use crate::{EngineConfig, Error, PageFormat, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration for a deck export run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Markup document holding the deck
    pub input: PathBuf,
    /// Directory receiving one PDF per variant
    pub output_dir: PathBuf,
    /// File stem shared by all outputs (`<stem>-<variant>.pdf`)
    pub output_stem: String,
    /// Rendering session options
    pub engine: EngineConfig,
    /// How long to wait for the first slide element after a load
    pub element_timeout_ms: u64,
    pub selectors: DeckSelectors,
    /// Autoscale budget and floor
    #[serde(skip)]
    pub fit: FitConfig,
    pub verify: VerifyConfig,
    pub settle: SettleDelays,
    /// Exported page geometry
    #[serde(skip)]
    pub page: PageFormat,
    /// Variants, rendered in order, each from a fresh load
    pub variants: Vec<VariantSpec>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("presentations/pitch-deck.html"),
            output_dir: PathBuf::from("presentations"),
            output_stem: "pitch-deck".to_string(),
            engine: EngineConfig::default(),
            element_timeout_ms: 10000,
            selectors: DeckSelectors::default(),
            fit: FitConfig::default(),
            verify: VerifyConfig::default(),
            settle: SettleDelays::default(),
            page: PageFormat::landscape_a4(),
            variants: vec![VariantSpec::color(), VariantSpec::grayscale()],
        }
    }
}

impl ExportConfig {
    /// Load overrides from a JSON file; missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.variants.is_empty() {
            return Err(Error::ConfigError("at least one variant is required".into()));
        }
        let mut names = std::collections::HashSet::new();
        for v in &self.variants {
            if v.name.trim().is_empty() {
                return Err(Error::ConfigError("variant names must not be empty".into()));
            }
            if !names.insert(v.name.as_str()) {
                return Err(Error::ConfigError(format!("duplicate variant '{}'", v.name)));
            }
        }
        if self.output_stem.trim().is_empty() {
            return Err(Error::ConfigError("output stem must not be empty".into()));
        }
        Ok(())
    }

    /// Where the container for `variant` is written
    pub fn output_path(&self, variant: &VariantSpec) -> PathBuf {
        self.output_dir
            .join(format!("{}-{}.pdf", self.output_stem, variant.name))
    }

    /// `file://` URL for the input document
    pub fn input_url(&self) -> Result<String> {
        let abs = std::fs::canonicalize(&self.input).map_err(|e| {
            Error::LoadError(format!("{}: {}", self.input.display(), e))
        })?;
        url::Url::from_file_path(&abs)
            .map(|u| u.to_string())
            .map_err(|_| Error::LoadError(format!("not a file path: {}", abs.display())))
    }
}

/// Selectors identifying the deck structure and the on-screen chrome
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckSelectors {
    pub slide: String,
    pub content: String,
    /// Element translated horizontally to bring a slide into view
    pub wrapper: String,
    /// Element whose box defines the visible canvas
    pub container: String,
    /// Navigation, counters and decoration never allowed in the output
    pub chrome: Vec<String>,
}

impl Default for DeckSelectors {
    fn default() -> Self {
        Self {
            slide: ".slide".to_string(),
            content: ".slide-content".to_string(),
            wrapper: "#slidesWrapper".to_string(),
            container: ".slide-container".to_string(),
            chrome: vec![
                ".slide-nav".to_string(),
                ".slide-counter".to_string(),
                ".keyboard-hint".to_string(),
                ".bg-mesh".to_string(),
                "#velocity-lines".to_string(),
            ],
        }
    }
}

/// Autoscale parameters; see [`crate::autoscale::fit_scale`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FitConfig {
    /// Safe content height in CSS px (canvas height minus top/bottom margin)
    pub budget_px: f64,
    /// Smallest scale ever applied
    pub floor: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            budget_px: 950.0,
            floor: 0.70,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Allowed horizontal offset between a slide and the canvas origin
    pub tolerance_px: f64,
    /// Minimum fraction of the canvas width a visible slide must cover
    pub min_coverage: f64,
    pub policy: MismatchPolicy,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            tolerance_px: 50.0,
            min_coverage: 0.9,
            policy: MismatchPolicy::default(),
        }
    }
}

/// Upper bounds for the layout-settling waits, in milliseconds
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SettleDelays {
    pub after_style_ms: u64,
    pub after_isolate_ms: u64,
    pub after_scale_ms: u64,
    pub unscaled_ms: u64,
}

impl SettleDelays {
    pub fn after_style(&self) -> Duration {
        Duration::from_millis(self.after_style_ms)
    }

    pub fn after_isolate(&self) -> Duration {
        Duration::from_millis(self.after_isolate_ms)
    }

    /// Wait after the fit check, longer when a transform was applied
    pub fn after_fit(&self, scaled: bool) -> Duration {
        Duration::from_millis(if scaled { self.after_scale_ms } else { self.unscaled_ms })
    }
}

impl Default for SettleDelays {
    fn default() -> Self {
        Self {
            after_style_ms: 300,
            after_isolate_ms: 600,
            after_scale_ms: 400,
            unscaled_ms: 200,
        }
    }
}

/// Color treatment of a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Color,
    Grayscale,
}

/// One visual rendering of the full deck, producing one output container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSpec {
    pub name: String,
    pub mode: ColorMode,
}

impl VariantSpec {
    pub fn color() -> Self {
        Self { name: "color".to_string(), mode: ColorMode::Color }
    }

    pub fn grayscale() -> Self {
        Self { name: "grayscale".to_string(), mode: ColorMode::Grayscale }
    }
}
