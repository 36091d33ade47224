//=========================================================================
// Bitmap
//=========================================================================
//
// Pre-rasterised RGBA image. This is the "drawable" handle bound to scene
// graph entities; it carries its intrinsic size and nothing else.
//
//=========================================================================

//=== Color ===============================================================

/// 8-bit RGBA color (straight alpha).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the color with its alpha scaled by `coverage / 255`.
    pub fn with_coverage(self, coverage: u8) -> Self {
        let a = (self.a as u16 * coverage as u16 + 127) / 255;
        Self { a: a as u8, ..self }
    }

    /// Composites `self` over `dst` ("source over").
    pub fn over(self, dst: Color) -> Color {
        match self.a {
            0 => dst,
            255 => self,
            a => {
                let a = a as u16;
                let inv = 255 - a;
                let mix = |s: u8, d: u8| ((s as u16 * a + d as u16 * inv + 127) / 255) as u8;
                let out_a = a + (dst.a as u16 * inv + 127) / 255;
                Color {
                    r: mix(self.r, dst.r),
                    g: mix(self.g, dst.g),
                    b: mix(self.b, dst.b),
                    a: out_a.min(255) as u8,
                }
            }
        }
    }
}

//=== Bitmap ==============================================================

/// Row-major RGBA image with an intrinsic width and height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: i32,
    height: i32,
    pixels: Vec<Color>,
}

impl Bitmap {
    //--- Construction -----------------------------------------------------

    /// Creates a fully transparent bitmap.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is negative.
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, Color::TRANSPARENT)
    }

    /// Creates a bitmap filled with `color`.
    pub fn filled(width: i32, height: i32, color: Color) -> Self {
        assert!(
            width >= 0 && height >= 0,
            "Bitmap dimensions must be non-negative, got {}x{}",
            width,
            height
        );
        Self {
            width,
            height,
            pixels: vec![color; (width * height) as usize],
        }
    }

    /// Wraps existing pixel data.
    ///
    /// # Panics
    ///
    /// Panics if `pixels.len() != width * height`.
    pub fn from_pixels(width: i32, height: i32, pixels: Vec<Color>) -> Self {
        assert_eq!(
            pixels.len(),
            (width.max(0) * height.max(0)) as usize,
            "Pixel count does not match {}x{}",
            width,
            height
        );
        Self { width, height, pixels }
    }

    //--- Accessors --------------------------------------------------------

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the bitmap.
    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    /// Writes a pixel; out-of-bounds writes are ignored.
    pub fn set(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return;
        }
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Composites `color` over the pixel at `(x, y)`.
    pub fn blend(&mut self, x: i32, y: i32, color: Color) {
        if let Some(dst) = self.get(x, y) {
            self.set(x, y, color.over(dst));
        }
    }

    //--- Transforms -------------------------------------------------------

    /// Mirror image across the vertical axis.
    pub fn flip_horizontal(&self) -> Bitmap {
        let mut out = Vec::with_capacity(self.pixels.len());
        for row in self.pixels.chunks(self.width.max(1) as usize) {
            out.extend(row.iter().rev().copied());
        }
        Bitmap::from_pixels(self.width, self.height, out)
    }

    /// Mirror image across the horizontal axis.
    pub fn flip_vertical(&self) -> Bitmap {
        let mut out = Vec::with_capacity(self.pixels.len());
        for row in self.pixels.chunks(self.width.max(1) as usize).rev() {
            out.extend_from_slice(row);
        }
        Bitmap::from_pixels(self.width, self.height, out)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_opaque_replaces() {
        let red = Color::rgb(255, 0, 0);
        assert_eq!(red.over(Color::WHITE), red);
    }

    #[test]
    fn over_transparent_keeps_destination() {
        assert_eq!(Color::TRANSPARENT.over(Color::WHITE), Color::WHITE);
    }

    #[test]
    fn over_half_alpha_mixes() {
        let shade = Color::rgba(0, 0, 0, 127);
        let out = shade.over(Color::WHITE);
        assert!(out.r > 120 && out.r < 135, "got {:?}", out);
        assert_eq!(out.a, 255);
    }

    #[test]
    fn coverage_scales_alpha() {
        assert_eq!(Color::WHITE.with_coverage(0).a, 0);
        assert_eq!(Color::WHITE.with_coverage(255).a, 255);
    }

    #[test]
    fn get_and_set_respect_bounds() {
        let mut bmp = Bitmap::new(2, 2);
        bmp.set(1, 1, Color::WHITE);
        bmp.set(5, 5, Color::WHITE);
        assert_eq!(bmp.get(1, 1), Some(Color::WHITE));
        assert_eq!(bmp.get(2, 0), None);
        assert_eq!(bmp.get(-1, 0), None);
    }

    #[test]
    fn flip_horizontal_mirrors_rows() {
        let a = Color::rgb(1, 0, 0);
        let b = Color::rgb(2, 0, 0);
        let bmp = Bitmap::from_pixels(2, 1, vec![a, b]);
        assert_eq!(bmp.flip_horizontal().pixels(), &[b, a]);
    }

    #[test]
    fn flip_vertical_mirrors_columns() {
        let a = Color::rgb(1, 0, 0);
        let b = Color::rgb(2, 0, 0);
        let bmp = Bitmap::from_pixels(1, 2, vec![a, b]);
        assert_eq!(bmp.flip_vertical().pixels(), &[b, a]);
    }

    #[test]
    #[should_panic(expected = "Pixel count does not match")]
    fn from_pixels_checks_length() {
        Bitmap::from_pixels(2, 2, vec![Color::BLACK; 3]);
    }
}
