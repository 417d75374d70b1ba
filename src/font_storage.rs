use std::{collections::HashMap, path::PathBuf, sync::Arc};

use crate::error::{FontError, FontResult};
use crate::typeface::{Typeface, TypefaceConfig};

/// Loads font bytes through `fontdb` and hands out one [`Typeface`] per face.
///
/// Typefaces are built on first request and kept, so every caller asking for
/// the same face shares its shaping cache. This only loads what it is told
/// to; picking a fallback face for unrenderable text is left to the caller
/// (see [`Typeface::can_render`]).
pub struct FontStorage {
    font_db: fontdb::Database,
    config: TypefaceConfig,
    /// Not all faces in `font_db` are necessarily loaded here.
    loaded: HashMap<fontdb::ID, Arc<Typeface>, fxhash::FxBuildHasher>,
}

impl Default for FontStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl FontStorage {
    /// Creates an empty storage whose typefaces use the default config.
    pub fn new() -> Self {
        Self::with_config(TypefaceConfig::default())
    }

    /// Creates an empty storage whose typefaces use `config`.
    pub fn with_config(config: TypefaceConfig) -> Self {
        Self {
            font_db: fontdb::Database::new(),
            config,
            loaded: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
        }
    }

    /// The config new typefaces are built with.
    pub fn config(&self) -> &TypefaceConfig {
        &self.config
    }
}

/// Loading fonts into fontdb.
impl FontStorage {
    /// Loads a font from binary data.
    pub fn load_font_binary(&mut self, data: impl Into<Vec<u8>>) {
        self.font_db.load_font_data(data.into());
    }

    /// Loads a font from a file path.
    pub fn load_font_file(&mut self, path: PathBuf) -> FontResult<()> {
        self.font_db.load_font_file(path)?;
        Ok(())
    }

    /// Loads all fonts from a directory.
    pub fn load_fonts_dir(&mut self, dir: PathBuf) {
        self.font_db.load_fonts_dir(dir)
    }

    /// Loads the system fonts.
    pub fn load_system_fonts(&mut self) {
        self.font_db.load_system_fonts();
    }

    /// Removes a face and drops its typeface. Typefaces already handed out stay usable.
    pub fn remove_face(&mut self, id: fontdb::ID) {
        self.font_db.remove_face(id);
        self.loaded.remove(&id);
    }

    /// Whether no face is known.
    pub fn is_empty(&self) -> bool {
        self.font_db.is_empty()
    }

    /// Returns the number of known faces.
    pub fn len(&self) -> usize {
        self.font_db.len()
    }

    /// Returns the number of faces turned into typefaces so far.
    pub fn loaded_len(&self) -> usize {
        self.loaded.len()
    }
}

/// Get `Typeface`
impl FontStorage {
    /// Queries `fontdb` for a face matching the description.
    pub fn query(&mut self, query: &fontdb::Query<'_>) -> Option<(fontdb::ID, Arc<Typeface>)> {
        let id = self.font_db.query(query)?;
        self.typeface(id).map(|typeface| (id, typeface))
    }

    /// Retrieves the typeface for `id`, building it if necessary.
    ///
    /// Failures are logged; use [`Self::try_typeface`] to see the error.
    pub fn typeface(&mut self, id: fontdb::ID) -> Option<Arc<Typeface>> {
        match self.try_typeface(id) {
            Ok(typeface) => Some(typeface),
            Err(e) => {
                log::error!("Failed to load font (id: {:?}): {}", id, e);
                None
            }
        }
    }

    /// Retrieves the typeface for `id`, building it if necessary.
    pub fn try_typeface(&mut self, id: fontdb::ID) -> FontResult<Arc<Typeface>> {
        use std::collections::hash_map::Entry;

        match self.loaded.entry(id) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let config = self.config;
                let typeface = self
                    .font_db
                    .with_face_data(id, |data, index| {
                        Typeface::from_bytes(data.to_vec(), index, config)
                    })
                    .ok_or(FontError::UnknownFace(id))??;

                let r: &mut Arc<Typeface> = entry.insert(Arc::new(typeface));
                Ok(Arc::clone(r))
            }
        }
    }

    /// Returns an iterator over all known faces.
    pub fn faces(&self) -> impl Iterator<Item = &fontdb::FaceInfo> {
        self.font_db.faces()
    }

    /// Returns face info for an ID.
    pub fn face(&self, id: fontdb::ID) -> Option<&fontdb::FaceInfo> {
        self.font_db.face(id)
    }
}
