//! Fit check and autoscale for the active slide.
//!
//! One measurement, one clamped shrink: content taller than the budget is
//! scaled by `budget / height`, never below the floor. There is no
//! re-measurement after scaling.

use crate::config::FitConfig;
use crate::dom::SlideSurface;
use crate::Result;

/// Scale that brings `height` within `fit.budget_px`, clamped to `fit.floor`.
///
/// Returns exactly `1.0` when the content already fits.
pub fn fit_scale(height: f64, fit: &FitConfig) -> f64 {
    if height <= fit.budget_px {
        1.0
    } else {
        (fit.budget_px / height).max(fit.floor)
    }
}

/// What the fit check did to the active slide
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOutcome {
    /// Measured content height, `None` when no active content region exists
    pub height: Option<f64>,
    pub scale: f64,
}

impl FitOutcome {
    pub fn scaled(&self) -> bool {
        self.scale < 1.0
    }
}

/// Measure the active slide and shrink it if it overflows the budget
pub fn autoscale<S: SlideSurface + ?Sized>(surface: &mut S, fit: &FitConfig) -> Result<FitOutcome> {
    let height = match surface.measure_active_content()? {
        Some(h) => h,
        None => return Ok(FitOutcome { height: None, scale: 1.0 }),
    };

    let scale = fit_scale(height, fit);
    if scale < 1.0 && !surface.apply_content_scale(scale)? {
        return Ok(FitOutcome { height: Some(height), scale: 1.0 });
    }
    Ok(FitOutcome { height: Some(height), scale })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_within_budget_is_untouched() {
        let fit = FitConfig::default();
        assert_eq!(fit_scale(0.0, &fit), 1.0);
        assert_eq!(fit_scale(700.0, &fit), 1.0);
        assert_eq!(fit_scale(950.0, &fit), 1.0);
    }

    #[test]
    fn overflow_shrinks_by_height_ratio() {
        let fit = FitConfig::default();
        let s = fit_scale(1100.0, &fit);
        assert!((s - 950.0 / 1100.0).abs() < 1e-12);
        assert_eq!(format!("{:.3}", s), "0.864");
    }

    #[test]
    fn shrink_never_goes_below_floor() {
        let fit = FitConfig::default();
        assert_eq!(fit_scale(1357.2, &fit), (950.0 / 1357.2f64).max(0.70));
        assert_eq!(fit_scale(2000.0, &fit), 0.70);
        assert_eq!(fit_scale(1e9, &fit), 0.70);
    }

    #[test]
    fn scale_is_monotone_in_height() {
        let fit = FitConfig::default();
        let mut last = f64::INFINITY;
        for h in (0..3000).step_by(7) {
            let s = fit_scale(h as f64, &fit);
            assert!(s <= last, "scale rose at height {}", h);
            assert!((0.70..=1.0).contains(&s));
            last = s;
        }
    }
}
