use std::path::{Path, PathBuf};

use ab_glyph::FontArc;
use tracing::{debug, info, warn};

use crate::config::defaults::FALLBACK_FONT_PATHS;

/// DejaVu Serif, shipped with the binary so captions never depend on host fonts
const DEJAVU_SERIF_TTF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSerif.ttf");

/// Load the caption font from `configured`, then common system serif fonts,
/// then the bundled DejaVu Serif.
pub fn load_caption_font(configured: Option<&Path>) -> Option<FontArc> {
    if let Some(path) = configured {
        match read_font(path) {
            Some(font) => return Some(font),
            None => warn!(path = %path.display(), "Configured caption font could not be loaded"),
        }
    }

    for candidate in FALLBACK_FONT_PATHS.iter().map(PathBuf::from) {
        if let Some(font) = read_font(&candidate) {
            info!(path = %candidate.display(), "Using system caption font");
            return Some(font);
        }
    }

    debug!("No system caption font found, using bundled DejaVu Serif");
    embedded_font()
}

/// The bundled caption font
pub fn embedded_font() -> Option<FontArc> {
    match FontArc::try_from_slice(DEJAVU_SERIF_TTF) {
        Ok(font) => Some(font),
        Err(e) => {
            warn!(error = %e, "Bundled caption font is unusable; charts will be rendered without text");
            None
        }
    }
}

fn read_font(path: &Path) -> Option<FontArc> {
    let bytes = std::fs::read(path).ok()?;
    match FontArc::try_from_vec(bytes) {
        Ok(font) => Some(font),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Not a usable font file");
            None
        }
    }
}
