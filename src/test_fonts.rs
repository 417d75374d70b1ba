//! Installed fonts for tests that need real shaping and rasterization.
//!
//! Tests using these return early on machines without a matching font.

use std::sync::Arc;

use crate::face::OpenTypeFace;
use crate::font_storage::FontStorage;
use crate::typeface::Typeface;

const FAMILIES: &[fontdb::Family<'static>] = &[
    fontdb::Family::Name("DejaVu Sans"),
    fontdb::Family::Name("Liberation Sans"),
    fontdb::Family::Name("Noto Sans"),
    fontdb::Family::Name("Arial"),
    fontdb::Family::SansSerif,
];

/// A Latin sans-serif typeface from the system, if one is installed.
pub fn system_sans() -> Option<Arc<Typeface>> {
    let mut storage = FontStorage::new();
    storage.load_system_fonts();
    let query = fontdb::Query {
        families: FAMILIES,
        ..fontdb::Query::default()
    };
    match storage.query(&query) {
        Some((_, typeface)) => Some(typeface),
        None => {
            log::warn!("no system sans-serif font found; skipping");
            None
        }
    }
}

/// The bytes of [`system_sans`] as a bare face.
pub fn system_sans_face() -> Option<OpenTypeFace> {
    let typeface = system_sans()?;
    let face = typeface.face();
    OpenTypeFace::from_bytes(face.data().to_vec(), face.index()).ok()
}
