//=========================================================================
// Fonts
//=========================================================================
//
// Text rasterisers implementing `core::menu::Font`.
//
// - `BlockFont`: built-in 5x7 pixel glyphs scaled by an integer factor.
//   Needs no files, so the game always has a usable font.
// - `GlyphFont`: any TTF/OTF file rasterised through fontdue.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::fs;
use std::path::Path;

use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};
use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::menu::Font;
use crate::core::render::{Bitmap, Color};

//=== FontError ===========================================================

#[derive(Debug)]
pub enum FontError {
    Io { path: String, source: std::io::Error },
    Parse(String),
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "Cannot read font {}: {}", path, source),
            Self::Parse(e) => write!(f, "Invalid font data: {}", e),
        }
    }
}

impl std::error::Error for FontError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(_) => None,
        }
    }
}

//=== BlockFont ===========================================================

const GLYPH_W: i32 = 5;
const GLYPH_H: i32 = 7;
const ADVANCE: i32 = GLYPH_W + 1;

/// Fixed-pitch bitmap font. Lowercase letters render as uppercase.
#[derive(Debug, Clone, Copy)]
pub struct BlockFont {
    scale: i32,
}

impl BlockFont {
    /// # Panics
    ///
    /// Panics if `scale` is not positive.
    pub fn new(scale: i32) -> Self {
        assert!(scale > 0, "BlockFont scale must be positive");
        Self { scale }
    }

    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// Width in pixels of `text` when rasterised.
    pub fn measure(&self, text: &str) -> i32 {
        let n = text.chars().count() as i32;
        (n * ADVANCE - 1).max(0) * self.scale
    }

    fn glyph(ch: char) -> [u8; 7] {
        match ch.to_ascii_uppercase() {
            'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
            'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
            'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
            'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
            'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
            'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
            'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
            'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
            'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
            'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
            'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
            'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
            'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
            'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
            'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
            'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
            'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
            'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
            'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
            'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
            'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
            'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
            'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
            'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
            'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
            'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
            '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
            '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
            '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
            '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
            '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
            '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
            '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
            '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
            '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
            '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
            '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
            ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
            '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
            '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
            ' ' => [0x00; 7],
            _ => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
        }
    }
}

impl Default for BlockFont {
    fn default() -> Self {
        Self::new(5)
    }
}

impl Font for BlockFont {
    fn rasterize(&self, text: &str, color: Color) -> Bitmap {
        let s = self.scale;
        let mut bmp = Bitmap::new(self.measure(text), GLYPH_H * s);

        for (i, ch) in text.chars().enumerate() {
            let origin = i as i32 * ADVANCE * s;
            for (row, bits) in Self::glyph(ch).iter().enumerate() {
                for col in 0..GLYPH_W {
                    if bits & (0x10 >> col) == 0 {
                        continue;
                    }
                    let x0 = origin + col * s;
                    let y0 = row as i32 * s;
                    for dy in 0..s {
                        for dx in 0..s {
                            bmp.set(x0 + dx, y0 + dy, color);
                        }
                    }
                }
            }
        }
        bmp
    }
}

//=== GlyphFont ===========================================================

/// Outline font rasterised with fontdue at a fixed pixel size.
pub struct GlyphFont {
    font: fontdue::Font,
    px: f32,
}

impl GlyphFont {
    pub fn from_bytes(bytes: &[u8], px: f32) -> Result<Self, FontError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontError::Parse(e.to_string()))?;
        Ok(Self { font, px })
    }

    pub fn load(path: impl AsRef<Path>, px: f32) -> Result<Self, FontError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| FontError::Io {
            path: path.display().to_string(),
            source,
        })?;
        debug!(target: "assets", "Loaded font {} at {}px", path.display(), px);
        Self::from_bytes(&bytes, px)
    }
}

impl Font for GlyphFont {
    fn rasterize(&self, text: &str, color: Color) -> Bitmap {
        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[&self.font], &TextStyle::new(text, self.px, 0));

        let width = layout
            .glyphs()
            .iter()
            .map(|g| (g.x + g.width as f32).ceil() as i32)
            .max()
            .unwrap_or(0);
        let height = layout.height().ceil() as i32;
        let mut bmp = Bitmap::new(width.max(0), height.max(0));

        for g in layout.glyphs() {
            if g.width == 0 || g.height == 0 {
                continue;
            }
            let (metrics, coverage) = self.font.rasterize_config(g.key);
            let ox = g.x.round() as i32;
            let oy = g.y.round() as i32;
            for (i, &c) in coverage.iter().enumerate() {
                if c == 0 {
                    continue;
                }
                let x = ox + (i % metrics.width) as i32;
                let y = oy + (i / metrics.width) as i32;
                bmp.blend(x, y, color.with_coverage(c));
            }
        }
        bmp
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_font_measures_without_trailing_gap() {
        let font = BlockFont::new(2);
        assert_eq!(font.measure(""), 0);
        assert_eq!(font.measure("A"), 10);
        assert_eq!(font.measure("AB"), 22);
    }

    #[test]
    fn block_font_bitmap_matches_measure() {
        let font = BlockFont::new(3);
        let bmp = font.rasterize("Play!", Color::WHITE);
        assert_eq!(bmp.width(), font.measure("Play!"));
        assert_eq!(bmp.height(), 21);
    }

    #[test]
    fn block_font_paints_glyph_pixels() {
        let font = BlockFont::new(1);
        let bmp = font.rasterize("T", Color::YELLOW);

        // Top bar of T is solid, the stem is the centre column
        for x in 0..5 {
            assert_eq!(bmp.get(x, 0), Some(Color::YELLOW));
        }
        assert_eq!(bmp.get(2, 6), Some(Color::YELLOW));
        assert_eq!(bmp.get(0, 6), Some(Color::TRANSPARENT));
    }

    #[test]
    fn block_font_lowercase_matches_uppercase() {
        let font = BlockFont::new(1);
        assert_eq!(
            font.rasterize("quit", Color::WHITE),
            font.rasterize("QUIT", Color::WHITE)
        );
    }

    #[test]
    fn glyph_font_rejects_garbage() {
        assert!(matches!(
            GlyphFont::from_bytes(b"not a font", 20.0),
            Err(FontError::Parse(_))
        ));
    }

    #[test]
    fn glyph_font_missing_file_is_io_error() {
        assert!(matches!(
            GlyphFont::load("/definitely/not/here.ttf", 20.0),
            Err(FontError::Io { .. })
        ));
    }
}
