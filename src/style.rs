//! Export style overrides.
//!
//! The patch hides interactive chrome, tightens spacing on text-heavy
//! regions and, for grayscale variants, desaturates the whole page. Chrome
//! is additionally hidden through inline styles so a lost cascade fight
//! cannot bring it back.

use crate::config::{ColorMode, DeckSelectors};
use crate::dom::SlideSurface;
use crate::Result;
use log::debug;

/// A CSS rule whose declarations are all emitted as `!important`
#[derive(Debug, Clone, Copy)]
pub struct StyleRule {
    pub selector: &'static str,
    pub declarations: &'static [(&'static str, &'static str)],
}

impl StyleRule {
    fn render(&self, out: &mut String) {
        out.push_str(self.selector);
        out.push_str(" {\n");
        for (prop, value) in self.declarations {
            out.push_str(&format!("    {}: {} !important;\n", prop, value));
        }
        out.push_str("}\n");
    }
}

/// Spacing and font clamps that make slides denser than the on-screen deck
pub const DENSITY_RULES: &[StyleRule] = &[
    StyleRule { selector: ".slide", declarations: &[("padding", "50px 80px")] },
    StyleRule {
        selector: ".slide h2",
        declarations: &[("margin-bottom", "30px"), ("font-size", "clamp(2rem, 4vw, 3.5rem)")],
    },
    StyleRule {
        selector: ".slide h3",
        declarations: &[("margin-bottom", "15px"), ("font-size", "clamp(1.3rem, 2.5vw, 1.8rem)")],
    },
    StyleRule {
        selector: ".slide p, .slide li",
        declarations: &[("margin-bottom", "12px"), ("font-size", "clamp(1rem, 1.8vw, 1.3rem)")],
    },
    StyleRule { selector: ".process-flow", declarations: &[("margin-top", "30px"), ("gap", "30px")] },
    StyleRule { selector: ".process-step", declarations: &[("padding", "25px"), ("min-height", "220px")] },
    StyleRule { selector: ".market-circles", declarations: &[("margin-top", "30px"), ("gap", "15px")] },
    StyleRule { selector: ".market-circle", declarations: &[("width", "160px"), ("height", "160px")] },
    StyleRule { selector: ".market-circle.tam", declarations: &[("width", "300px"), ("height", "300px")] },
    StyleRule { selector: ".market-circle.sam", declarations: &[("width", "190px"), ("height", "190px")] },
    StyleRule { selector: ".market-circle.som", declarations: &[("width", "140px"), ("height", "140px")] },
    StyleRule { selector: ".opportunity-highlight", declarations: &[("padding", "35px"), ("margin", "30px 0")] },
    StyleRule { selector: ".opportunity-points", declarations: &[("gap", "20px"), ("margin-top", "30px")] },
    StyleRule {
        selector: ".opportunity-point",
        declarations: &[("padding", "20px"), ("font-size", "clamp(1rem, 1.8vw, 1.3rem)")],
    },
    StyleRule {
        selector: r#".ask-content > div[style*="margin-top: 60px"]"#,
        declarations: &[("margin-top", "40px")],
    },
    StyleRule {
        selector: r#".ask-content p[style*="font-size: 1.8rem"]"#,
        declarations: &[("font-size", "1.4rem"), ("margin-bottom", "15px")],
    },
    StyleRule { selector: ".positioning-statement", declarations: &[("padding", "30px"), ("margin", "30px 0")] },
    StyleRule {
        selector: ".positioning-statement p",
        declarations: &[("font-size", "clamp(1.1rem, 1.9vw, 1.4rem)")],
    },
    StyleRule { selector: ".ask-content h3", declarations: &[("margin-top", "30px"), ("margin-bottom", "25px")] },
    StyleRule { selector: ".funds-breakdown", declarations: &[("margin-top", "30px"), ("gap", "20px")] },
    StyleRule { selector: ".fund-item", declarations: &[("padding", "25px")] },
];

pub const GRAYSCALE_RULE: StyleRule = StyleRule {
    selector: "body, body *",
    declarations: &[("filter", "grayscale(100%)"), ("-webkit-filter", "grayscale(100%)")],
};

/// Stylesheet injected once after every fresh load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylePatch {
    pub css: String,
    /// Selectors additionally hidden through inline styles
    pub hidden: Vec<String>,
}

impl StylePatch {
    pub fn new(selectors: &DeckSelectors, mode: ColorMode) -> Self {
        let mut css = String::new();
        if !selectors.chrome.is_empty() {
            css.push_str(&selectors.chrome.join(", "));
            css.push_str(" {\n    display: none !important;\n}\n");
        }
        for rule in DENSITY_RULES {
            rule.render(&mut css);
        }
        if mode == ColorMode::Grayscale {
            GRAYSCALE_RULE.render(&mut css);
        }
        Self {
            css,
            hidden: selectors.chrome.clone(),
        }
    }
}

/// Apply the export patch for `mode` to a freshly loaded deck
pub fn inject<S: SlideSurface + ?Sized>(
    surface: &mut S,
    selectors: &DeckSelectors,
    mode: ColorMode,
) -> Result<()> {
    let patch = StylePatch::new(selectors, mode);
    surface.inject_style(&patch.css)?;
    let hidden = surface.hide_elements(&patch.hidden)?;
    debug!("Injected export style ({:?}); {} chrome elements hidden", mode, hidden);
    Ok(())
}
