//=========================================================================
// Render Primitives
//=========================================================================
//
// Pixel-level types shared by the scene graph and the platform layer.
//
// Architecture:
//   Bitmap (opaque drawable) ──blit──> RenderTarget (output surface)
//                                          └─ FrameBuffer (in-memory)
//
// The core never decodes images or rasterises fonts. It only paints
// already-rasterised bitmaps at integer offsets.
//
//=========================================================================

//=== Module Declarations =================================================

mod bitmap;
mod frame_buffer;

//=== Public API ==========================================================

pub use bitmap::{Bitmap, Color};
pub use frame_buffer::FrameBuffer;

//=== RenderTarget ========================================================

/// Mutable 2D destination that bitmaps are painted onto.
///
/// Implemented by [`FrameBuffer`] for real rendering and by recording
/// targets in tests.
pub trait RenderTarget {
    /// Surface width in pixels.
    fn width(&self) -> i32;

    /// Surface height in pixels.
    fn height(&self) -> i32;

    /// Fills the whole surface with a single color.
    fn fill(&mut self, color: Color);

    /// Paints `bitmap` with its top-left corner at `(x, y)`.
    ///
    /// Pixels falling outside the surface are clipped.
    fn blit(&mut self, bitmap: &Bitmap, x: i32, y: i32);
}
