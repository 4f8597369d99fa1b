//! Font and texture registries
//!
//! Per-canvas tables mapping caller-chosen names to resources. Entries are
//! registered once and never removed.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use sdlcanvas_render::Resolution;

use crate::error::{CanvasError, CanvasResult, ResourceKind};

/// Registered TrueType fonts by name
#[derive(Debug, Default)]
pub(crate) struct FontRegistry {
    fonts: FxHashMap<String, PathBuf>,
}

impl FontRegistry {
    /// Register a font file; the file must exist now
    pub fn register(&mut self, name: &str, path: &Path) -> CanvasResult<()> {
        if !path.is_file() {
            return Err(CanvasError::MissingFile(path.to_path_buf()));
        }
        if self.fonts.contains_key(name) {
            return Err(CanvasError::duplicate(ResourceKind::Font, name));
        }
        self.fonts.insert(name.to_string(), path.to_path_buf());
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> CanvasResult<&Path> {
        self.fonts
            .get(name)
            .map(PathBuf::as_path)
            .ok_or_else(|| CanvasError::unknown(ResourceKind::Font, name))
    }
}

/// A decoded texture known to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextureEntry {
    pub path: PathBuf,
    pub resolution: Resolution,
}

/// Registered textures by id
#[derive(Debug, Default)]
pub(crate) struct TextureRegistry {
    textures: FxHashMap<String, TextureEntry>,
}

impl TextureRegistry {
    pub fn contains(&self, id: &str) -> bool {
        self.textures.contains_key(id)
    }

    pub fn insert(&mut self, id: &str, entry: TextureEntry) -> CanvasResult<()> {
        if self.contains(id) {
            return Err(CanvasError::duplicate(ResourceKind::Texture, id));
        }
        self.textures.insert(id.to_string(), entry);
        Ok(())
    }

    pub fn lookup(&self, id: &str) -> CanvasResult<&TextureEntry> {
        self.textures
            .get(id)
            .ok_or_else(|| CanvasError::unknown(ResourceKind::Texture, id))
    }
}
