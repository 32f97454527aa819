use super::scripts::{self, with_payload};
use super::{GeometryScan, Isolation, SlideSurface};
use crate::config::{DeckSelectors, ExportConfig};
use crate::isolate::StyleAssignment;
use crate::{Engine, Error, PageFormat, Result};
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

/// [`SlideSurface`] backed by page scripts evaluated through an [`Engine`]
pub struct DomSurface<E: Engine> {
    engine: E,
    selectors: DeckSelectors,
    element_timeout_ms: u64,
}

#[derive(Deserialize)]
struct Settled {
    settled: bool,
    waited_ms: f64,
}

impl<E: Engine> DomSurface<E> {
    pub fn new(engine: E, config: &ExportConfig) -> Self {
        Self {
            engine,
            selectors: config.selectors.clone(),
            element_timeout_ms: config.element_timeout_ms,
        }
    }

    /// Give back the engine, e.g. to close it
    pub fn into_engine(self) -> E {
        self.engine
    }

    fn eval_json<P: Serialize, T: DeserializeOwned>(&mut self, template: &str, payload: &P) -> Result<T> {
        let script = with_payload(template, payload)?;
        let res = self.engine.evaluate_script_in_page(&script)?;
        if res.is_error {
            return Err(Error::ScriptError(res.value));
        }
        serde_json::from_str(&res.value).map_err(|e| {
            Error::ScriptError(format!("unexpected script result {:?}: {}", res.value, e))
        })
    }

    fn slide_payload(&self) -> serde_json::Value {
        json!({ "slide": self.selectors.slide, "content": self.selectors.content })
    }
}

impl<E: Engine> SlideSurface for DomSurface<E> {
    fn load(&mut self, url: &str) -> Result<usize> {
        self.engine.load_url(url)?;
        let slide = self.selectors.slide.clone();
        self.engine.wait_for_selector(&slide, self.element_timeout_ms)?;

        let count: usize = self.eval_json(scripts::COUNT_SLIDES, &json!({ "slide": slide }))?;
        if count == 0 {
            return Err(Error::LoadError(format!("no '{}' elements in {}", slide, url)));
        }
        Ok(count)
    }

    fn inject_style(&mut self, css: &str) -> Result<()> {
        let _: bool = self.eval_json(scripts::INJECT_STYLE, &json!({ "css": css }))?;
        Ok(())
    }

    fn hide_elements(&mut self, selectors: &[String]) -> Result<usize> {
        self.eval_json(scripts::HIDE_ELEMENTS, &json!({ "selectors": selectors }))
    }

    fn isolate(&mut self, index: usize, corrections: &[StyleAssignment]) -> Result<Isolation> {
        let payload = json!({
            "index": index,
            "slide": self.selectors.slide,
            "content": self.selectors.content,
            "wrapper": self.selectors.wrapper,
            "corrections": corrections,
        });
        self.eval_json(scripts::ISOLATE, &payload)
    }

    fn measure_active_content(&mut self) -> Result<Option<f64>> {
        let payload = self.slide_payload();
        self.eval_json(scripts::MEASURE_ACTIVE, &payload)
    }

    fn apply_content_scale(&mut self, scale: f64) -> Result<bool> {
        let mut payload = self.slide_payload();
        payload["scale"] = json!(scale);
        self.eval_json(scripts::APPLY_SCALE, &payload)
    }

    fn scan_geometry(&mut self) -> Result<GeometryScan> {
        let payload = json!({
            "slide": self.selectors.slide,
            "container": self.selectors.container,
        });
        self.eval_json(scripts::SCAN_GEOMETRY, &payload)
    }

    fn print_page(&mut self, format: &PageFormat) -> Result<Vec<u8>> {
        self.engine.print_to_pdf(format)
    }

    fn reset_transient(&mut self) -> Result<()> {
        let payload = self.slide_payload();
        let _: bool = self.eval_json(scripts::RESET_TRANSIENT, &payload)?;
        Ok(())
    }

    fn settle(&mut self, max: Duration) -> Result<()> {
        let payload = json!({ "max_ms": max.as_millis() as u64 });
        match self.eval_json::<_, Settled>(scripts::SETTLE, &payload) {
            Ok(s) if s.settled => debug!("Layout settled after {:.0}ms", s.waited_ms),
            Ok(s) => debug!("Layout still animating after {:.0}ms", s.waited_ms),
            Err(Error::ScriptError(e)) => {
                debug!("Settle script failed ({}); sleeping {:?}", e, max);
                std::thread::sleep(max);
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }
}
