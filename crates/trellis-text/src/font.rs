//! Font registry
//!
//! Maps toolkit font names to faces in a fontdb database. Names that were
//! never registered resolve to [`DEFAULT_FONT`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use fontdb::{Database, Family, Query, Source, ID};

use crate::{Result, TextError};

/// Name of the font used when a text state does not pick one
pub const DEFAULT_FONT: &str = "default";

/// Named font faces
pub struct FontRegistry {
    db: Database,
    names: HashMap<String, ID>,
}

impl FontRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            db: Database::new(),
            names: HashMap::new(),
        }
    }

    /// Create a registry with system fonts, mapping the default name to the
    /// system sans-serif face
    pub fn with_system_fonts() -> Self {
        let mut registry = Self::new();
        registry.db.load_system_fonts();

        let query = Query {
            families: &[Family::SansSerif],
            ..Query::default()
        };
        match registry.db.query(&query) {
            Some(id) => {
                registry.names.insert(DEFAULT_FONT.to_string(), id);
            }
            None => tracing::warn!("No system sans-serif font found, text will not render"),
        }
        tracing::debug!("Loaded {} system font faces", registry.db.len());
        registry
    }

    /// Register font bytes under `name`
    pub fn register_font(&mut self, name: &str, data: Vec<u8>) -> Result<()> {
        let ids = self.db.load_font_source(Source::Binary(Arc::new(data)));
        let id = ids
            .first()
            .copied()
            .ok_or_else(|| TextError::FontParsing(name.to_string()))?;

        tracing::debug!("Registered font '{}'", name);
        self.names.insert(name.to_string(), id);
        Ok(())
    }

    /// Register a font file under `name`
    pub fn register_font_file(&mut self, name: &str, path: impl AsRef<Path>) -> Result<()> {
        let data = std::fs::read(path)?;
        self.register_font(name, data)
    }

    /// Make `name` refer to an installed family, e.g. "DejaVu Sans"
    pub fn register_family(&mut self, name: &str, family: &str) -> Result<()> {
        let query = Query {
            families: &[Family::Name(family)],
            ..Query::default()
        };
        let id = self
            .db
            .query(&query)
            .ok_or_else(|| TextError::FontNotFound(family.to_string()))?;
        self.names.insert(name.to_string(), id);
        Ok(())
    }

    /// Resolve a name, falling back to the default font
    pub fn resolve(&self, name: &str) -> Option<ID> {
        self.names
            .get(name)
            .or_else(|| self.names.get(DEFAULT_FONT))
            .copied()
    }

    /// Whether `name` itself is registered (no fallback)
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Run `f` over the raw face data for `name`
    pub fn with_face_data<T>(&self, name: &str, f: impl FnOnce(&[u8], u32) -> T) -> Option<T> {
        let id = self.resolve(name)?;
        self.db.with_face_data(id, f)
    }

    /// Number of registered names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FontRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontRegistry")
            .field("names", &self.names.keys().collect::<Vec<_>>())
            .field("faces", &self.db.len())
            .finish()
    }
}
