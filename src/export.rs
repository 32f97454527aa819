//! Single-page export of the isolated slide.

use crate::dom::SlideSurface;
use crate::{Error, PageFormat, Result};
use log::debug;

/// Print the current rendering as one fixed-size page.
///
/// Transient transforms and alignment overrides are reset afterwards
/// whether or not the print succeeded; a print error wins over a reset
/// error.
pub fn export_page<S: SlideSurface + ?Sized>(surface: &mut S, format: &PageFormat) -> Result<Vec<u8>> {
    let printed = surface.print_page(format);
    let reset = surface.reset_transient();

    let bytes = printed?;
    reset?;

    if !bytes.starts_with(b"%PDF-") {
        return Err(Error::ExportError(format!(
            "engine returned {} bytes without a PDF header",
            bytes.len()
        )));
    }
    debug!("Exported page ({} bytes)", bytes.len());
    Ok(bytes)
}
