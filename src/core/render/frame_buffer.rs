//=========================================================================
// Frame Buffer
//=========================================================================
//
// In-memory output surface. The core thread renders each frame here and
// hands the finished buffer to a `Presenter`.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{Bitmap, Color, RenderTarget};

//=== FrameBuffer =========================================================

/// Opaque RGBA surface with source-over blitting and edge clipping.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: i32,
    height: i32,
    pixels: Vec<Color>,
}

impl FrameBuffer {
    /// Creates a black surface.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is not positive.
    pub fn new(width: i32, height: i32) -> Self {
        assert!(
            width > 0 && height > 0,
            "FrameBuffer dimensions must be positive, got {}x{}",
            width,
            height
        );
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; (width * height) as usize],
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Writes the surface as tightly packed RGBA8 bytes into `out`.
    ///
    /// `out` must hold exactly `width * height * 4` bytes; extra bytes are
    /// left untouched and missing ones are skipped.
    pub fn copy_rgba_into(&self, out: &mut [u8]) {
        for (dst, src) in out.chunks_exact_mut(4).zip(&self.pixels) {
            dst.copy_from_slice(&[src.r, src.g, src.b, 255]);
        }
    }

    /// Surface as a freshly allocated RGBA8 byte vector.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut out = vec![0; self.pixels.len() * 4];
        self.copy_rgba_into(&mut out);
        out
    }
}

impl RenderTarget for FrameBuffer {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    fn blit(&mut self, bitmap: &Bitmap, x: i32, y: i32) {
        // Clip the source rectangle against the surface
        let src_x0 = (-x).max(0);
        let src_y0 = (-y).max(0);
        let src_x1 = bitmap.width().min(self.width - x);
        let src_y1 = bitmap.height().min(self.height - y);

        if src_x0 >= src_x1 || src_y0 >= src_y1 {
            return;
        }

        let src = bitmap.pixels();
        for sy in src_y0..src_y1 {
            let src_row = (sy * bitmap.width()) as usize;
            let dst_row = ((sy + y) * self.width) as usize;
            for sx in src_x0..src_x1 {
                let s = src[src_row + sx as usize];
                let d = &mut self.pixels[dst_row + (sx + x) as usize];
                *d = s.over(*d);
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_sets_every_pixel() {
        let mut fb = FrameBuffer::new(4, 3);
        fb.fill(Color::WHITE);
        assert!(fb.pixels().iter().all(|&c| c == Color::WHITE));
    }

    #[test]
    fn blit_places_bitmap_at_offset() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.blit(&Bitmap::filled(2, 2, Color::WHITE), 1, 2);

        assert_eq!(fb.pixel(1, 2), Some(Color::WHITE));
        assert_eq!(fb.pixel(2, 3), Some(Color::WHITE));
        assert_eq!(fb.pixel(0, 2), Some(Color::BLACK));
        assert_eq!(fb.pixel(1, 1), Some(Color::BLACK));
    }

    #[test]
    fn blit_clips_at_edges() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.blit(&Bitmap::filled(3, 3, Color::WHITE), -2, 3);

        assert_eq!(fb.pixel(0, 3), Some(Color::WHITE));
        assert_eq!(fb.pixel(1, 3), Some(Color::BLACK));
    }

    #[test]
    fn blit_fully_outside_is_noop() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.blit(&Bitmap::filled(2, 2, Color::WHITE), 10, 10);
        fb.blit(&Bitmap::filled(2, 2, Color::WHITE), -2, 0);
        assert!(fb.pixels().iter().all(|&c| c == Color::BLACK));
    }

    #[test]
    fn blit_skips_transparent_pixels() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.fill(Color::WHITE);
        fb.blit(&Bitmap::new(2, 1), 0, 0);
        assert!(fb.pixels().iter().all(|&c| c == Color::WHITE));
    }

    #[test]
    fn rgba_bytes_are_opaque() {
        let mut fb = FrameBuffer::new(1, 1);
        fb.fill(Color::rgb(10, 20, 30));
        assert_eq!(fb.to_rgba_bytes(), vec![10, 20, 30, 255]);
    }
}
