//! Slide isolation: bring exactly one slide onto the canvas.
//!
//! Isolating slide `i` translates the slide wrapper so `i` sits at the
//! canvas origin, marks it active and deactivates every other slide. Slides
//! known to be dense get a named [`CorrectionProfile`] applied on top.

use crate::dom::SlideSurface;
use crate::Result;
use log::{debug, warn};
use serde::Serialize;

/// Which of the elements matching a selector receive the overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pick {
    All,
    First,
    /// The first match, and only when its text contains the needle
    FirstContaining(&'static str),
}

/// CSS property overrides applied to elements inside a slide's content region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleAssignment {
    pub selector: &'static str,
    pub pick: Pick,
    pub properties: &'static [(&'static str, &'static str)],
}

/// A named set of compaction overrides for one slide position
#[derive(Debug, Clone, Copy)]
pub struct CorrectionProfile {
    pub name: &'static str,
    pub slide: usize,
    pub assignments: &'static [StyleAssignment],
}

pub const PROCESS_FLOW: CorrectionProfile = CorrectionProfile {
    name: "process-flow",
    slide: 5,
    assignments: &[
        StyleAssignment {
            selector: ".process-flow",
            pick: Pick::First,
            properties: &[("margin-top", "20px"), ("gap", "20px")],
        },
        StyleAssignment {
            selector: ".process-step",
            pick: Pick::All,
            properties: &[("padding", "20px"), ("min-height", "180px")],
        },
    ],
};

pub const MARKET_SIZE: CorrectionProfile = CorrectionProfile {
    name: "market-size",
    slide: 6,
    assignments: &[
        StyleAssignment {
            selector: ".market-circles",
            pick: Pick::First,
            properties: &[("margin-top", "20px"), ("gap", "12px")],
        },
        StyleAssignment {
            selector: r#"p[style*="font-size: 1.5rem"]"#,
            pick: Pick::All,
            properties: &[("font-size", "1.2rem"), ("margin-bottom", "25px")],
        },
        StyleAssignment {
            selector: r#"p[style*="text-align: center"]"#,
            pick: Pick::FirstContaining("Prize"),
            properties: &[("margin-top", "25px"), ("font-size", "1.1rem")],
        },
    ],
};

pub const OPPORTUNITY: CorrectionProfile = CorrectionProfile {
    name: "opportunity",
    slide: 9,
    assignments: &[
        StyleAssignment {
            selector: ".opportunity-highlight",
            pick: Pick::First,
            properties: &[("padding", "25px"), ("margin", "20px 0")],
        },
        StyleAssignment {
            selector: ".opportunity-point",
            pick: Pick::All,
            properties: &[("padding", "18px"), ("font-size", "1.1rem")],
        },
    ],
};

pub const FUNDING_ASK: CorrectionProfile = CorrectionProfile {
    name: "funding-ask",
    slide: 10,
    assignments: &[
        StyleAssignment {
            selector: r#"div[style*="margin-top: 60px"]"#,
            pick: Pick::First,
            properties: &[("margin-top", "30px")],
        },
        StyleAssignment {
            selector: r#"p[style*="font-size: 1.8rem"]"#,
            pick: Pick::All,
            properties: &[("font-size", "1.3rem"), ("margin-bottom", "12px")],
        },
        StyleAssignment {
            selector: ".positioning-statement",
            pick: Pick::First,
            properties: &[("padding", "25px"), ("margin", "20px 0")],
        },
        StyleAssignment {
            selector: r#"h3[style*="margin-top: 40px"]"#,
            pick: Pick::First,
            properties: &[("margin-top", "25px"), ("margin-bottom", "20px")],
        },
        StyleAssignment {
            selector: ".funds-breakdown",
            pick: Pick::First,
            properties: &[("margin-top", "20px"), ("gap", "15px")],
        },
    ],
};

/// Built-in profiles, keyed by slide position
pub const PROFILES: &[CorrectionProfile] = &[PROCESS_FLOW, MARKET_SIZE, OPPORTUNITY, FUNDING_ASK];

/// Profile registered for the slide at `index`, if any
pub fn profile_for(index: usize) -> Option<&'static CorrectionProfile> {
    PROFILES.iter().find(|p| p.slide == index)
}

/// Make slide `index` the single active slide.
///
/// Returns `false` without touching the surface when `index` is outside the
/// deck; whatever slide was active before stays active.
pub fn isolate<S: SlideSurface + ?Sized>(
    surface: &mut S,
    index: usize,
    slide_count: usize,
) -> Result<bool> {
    if index >= slide_count {
        debug!("Ignoring isolation of slide {} (deck has {})", index + 1, slide_count);
        return Ok(false);
    }

    let profile = profile_for(index);
    if let Some(p) = profile {
        debug!("Applying '{}' corrections to slide {}", p.name, index + 1);
    }
    let corrections = profile.map(|p| p.assignments).unwrap_or(&[]);

    let outcome = surface.isolate(index, corrections)?;
    if outcome.applied && outcome.active != 1 {
        warn!(
            "{} slides active after isolating slide {}",
            outcome.active,
            index + 1
        );
    }
    Ok(outcome.applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_cover_the_four_dense_slides() {
        let names: Vec<_> = [5, 6, 9, 10]
            .iter()
            .map(|&i| profile_for(i).map(|p| p.name))
            .collect();
        assert_eq!(
            names,
            vec![
                Some("process-flow"),
                Some("market-size"),
                Some("opportunity"),
                Some("funding-ask")
            ]
        );
        for i in [0, 1, 2, 3, 4, 7, 8, 11] {
            assert!(profile_for(i).is_none(), "slide {} has no profile", i);
        }
    }

    #[test]
    fn profile_slides_are_unique() {
        let mut slides: Vec<_> = PROFILES.iter().map(|p| p.slide).collect();
        slides.sort_unstable();
        slides.dedup();
        assert_eq!(slides.len(), PROFILES.len());
    }

    #[test]
    fn assignments_serialize_for_the_page_script() {
        let v = serde_json::to_value(MARKET_SIZE.assignments).unwrap();
        assert_eq!(v[0]["pick"], "first");
        assert_eq!(v[1]["pick"], "all");
        assert_eq!(v[2]["pick"]["first_containing"], "Prize");
        assert_eq!(v[0]["properties"][1], serde_json::json!(["gap", "12px"]));
    }
}
