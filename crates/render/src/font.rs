//! Font rendering
//!
//! Text rasterization using fontdue, with fonts loaded lazily from TrueType files.

use std::fs;
use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings};
use rustc_hash::FxHashMap;

use crate::error::{RenderError, RenderResult};

/// Cache of parsed fonts and rendered glyphs
#[derive(Default)]
pub struct FontCache {
    fonts: Vec<Font>,
    by_path: FxHashMap<PathBuf, usize>,
    glyph_cache: FxHashMap<GlyphKey, GlyphData>,
}

/// Key for cached glyphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct GlyphKey {
    font: usize,
    character: char,
    size_tenths: u32, // Font size * 10 to avoid float hashing
}

/// Cached glyph bitmap data
#[derive(Debug, Clone)]
pub struct GlyphData {
    pub width: u32,
    pub height: u32,
    pub bitmap: Vec<u8>,
    pub advance_width: f32,
    pub offset_x: i32,
    pub offset_y: i32,
}

/// A line of text rasterized into a single alpha coverage bitmap
#[derive(Debug, Clone)]
pub struct TextBitmap {
    pub width: u32,
    pub height: u32,
    pub coverage: Vec<u8>,
}

impl TextBitmap {
    /// Expand coverage into RGBA pixels tinted with a color
    pub fn to_rgba(&self, r: u8, g: u8, b: u8, a: u8) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.coverage.len() * 4);
        for &alpha in &self.coverage {
            let blended_alpha = ((alpha as u32 * a as u32) / 255) as u8;
            rgba.extend_from_slice(&[r, g, b, blended_alpha]);
        }
        rgba
    }
}

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a font from a file, reusing an earlier parse of the same path
    pub fn load(&mut self, path: &Path) -> RenderResult<usize> {
        if let Some(&index) = self.by_path.get(path) {
            return Ok(index);
        }
        let data = fs::read(path)?;
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| RenderError::Font(format!("{}: {}", path.display(), e)))?;
        let index = self.fonts.len();
        self.fonts.push(font);
        self.by_path.insert(path.to_path_buf(), index);
        log::debug!("Parsed font {} as #{}", path.display(), index);
        Ok(index)
    }

    /// Rasterize a character at a given size
    pub fn rasterize(&mut self, font: usize, c: char, size: f32) -> &GlyphData {
        let key = GlyphKey {
            font,
            character: c,
            size_tenths: (size * 10.0) as u32,
        };
        let font = &self.fonts[font];
        self.glyph_cache.entry(key).or_insert_with(|| {
            let (metrics, bitmap) = font.rasterize(c, size);
            GlyphData {
                width: metrics.width as u32,
                height: metrics.height as u32,
                bitmap,
                advance_width: metrics.advance_width,
                offset_x: metrics.xmin,
                offset_y: metrics.ymin,
            }
        })
    }

    /// Get the ascent for a font size
    pub fn ascent(&self, font: usize, size: f32) -> f32 {
        match self.fonts[font].horizontal_line_metrics(size) {
            Some(m) => m.ascent,
            None => size * 0.8,
        }
    }

    /// Get line metrics for a font size
    pub fn line_height(&self, font: usize, size: f32) -> f32 {
        match self.fonts[font].horizontal_line_metrics(size) {
            Some(m) => m.new_line_size,
            None => size * 1.2,
        }
    }

    /// Measure the width of a string
    pub fn measure_text(&mut self, font: usize, text: &str, size: f32) -> f32 {
        text.chars()
            .map(|c| self.rasterize(font, c, size).advance_width)
            .sum()
    }

    /// Rasterize a whole line of text into one coverage bitmap
    pub fn render_line(&mut self, path: &Path, text: &str, size: f32) -> RenderResult<TextBitmap> {
        let font = self.load(path)?;
        let width = self.measure_text(font, text, size).ceil().max(0.0) as u32;
        let height = self.line_height(font, size).ceil().max(0.0) as u32;
        let baseline = self.ascent(font, size) as i32;

        let mut coverage = vec![0u8; width as usize * height as usize];
        let mut cursor_x = 0i32;
        for c in text.chars() {
            let glyph = self.rasterize(font, c, size);
            let glyph_x = cursor_x + glyph.offset_x;
            let glyph_y = baseline - glyph.offset_y - glyph.height as i32;
            for row in 0..glyph.height as i32 {
                for col in 0..glyph.width as i32 {
                    let (x, y) = (glyph_x + col, glyph_y + row);
                    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
                        continue;
                    }
                    let src = glyph.bitmap[(row * glyph.width as i32 + col) as usize];
                    let dst = &mut coverage[(y * width as i32 + x) as usize];
                    *dst = (*dst).max(src);
                }
            }
            cursor_x += glyph.advance_width as i32;
        }

        Ok(TextBitmap {
            width,
            height,
            coverage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_cache_creation() {
        let cache = FontCache::new();
        assert!(cache.glyph_cache.is_empty());
        assert!(cache.fonts.is_empty());
    }

    #[test]
    fn test_missing_font_file() {
        let mut cache = FontCache::new();
        let result = cache.load(Path::new("/nonexistent/font.ttf"));
        assert!(matches!(result, Err(RenderError::Io(_))));
    }

    #[test]
    fn test_invalid_font_data() {
        let path = std::env::temp_dir().join("sdlcanvas-render-not-a-font.ttf");
        fs::write(&path, b"definitely not a font").unwrap();
        let mut cache = FontCache::new();
        let result = cache.load(&path);
        assert!(matches!(result, Err(RenderError::Font(_))));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_text_bitmap_to_rgba() {
        let bitmap = TextBitmap {
            width: 2,
            height: 1,
            coverage: vec![255, 0],
        };
        let rgba = bitmap.to_rgba(10, 20, 30, 255);
        assert_eq!(rgba, vec![10, 20, 30, 255, 10, 20, 30, 0]);
    }
}
