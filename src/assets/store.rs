//=========================================================================
// Asset Store
//=========================================================================
//
// String-keyed drawable registry plus the procedural image builders the
// game uses in place of image files.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::sync::Arc;

use log::{trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::render::{Bitmap, Color};

//=== DrawableProvider ====================================================

/// Resolves asset keys to drawables.
pub trait DrawableProvider {
    fn drawable(&self, key: &str) -> Option<Arc<Bitmap>>;
}

//=== AssetStore ==========================================================

#[derive(Debug, Default)]
pub struct AssetStore {
    drawables: HashMap<String, Arc<Bitmap>>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `bitmap` under `key` and returns the shared handle.
    pub fn insert(&mut self, key: impl Into<String>, bitmap: Bitmap) -> Arc<Bitmap> {
        let key = key.into();
        let handle = Arc::new(bitmap);
        trace!(
            target: "assets",
            "Stored {} ({}x{})",
            key,
            handle.width(),
            handle.height()
        );
        if self.drawables.insert(key.clone(), handle.clone()).is_some() {
            warn!(target: "assets", "Asset {} was already stored and has been replaced", key);
        }
        handle
    }

    /// Stores a horizontally mirrored copy of `src` under `key`.
    ///
    /// Returns `None` if `src` is unknown.
    pub fn insert_flipped_h(&mut self, key: impl Into<String>, src: &str) -> Option<Arc<Bitmap>> {
        let flipped = self.drawables.get(src)?.flip_horizontal();
        Some(self.insert(key, flipped))
    }

    pub fn insert_flipped_v(&mut self, key: impl Into<String>, src: &str) -> Option<Arc<Bitmap>> {
        let flipped = self.drawables.get(src)?.flip_vertical();
        Some(self.insert(key, flipped))
    }

    pub fn get(&self, key: &str) -> Option<&Arc<Bitmap>> {
        self.drawables.get(key)
    }

    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }
}

impl DrawableProvider for AssetStore {
    fn drawable(&self, key: &str) -> Option<Arc<Bitmap>> {
        self.drawables.get(key).cloned()
    }
}

//=== Procedural Images ===================================================

/// Rectangle filled with `color`; alpha is kept, so translucent shades work.
pub fn solid(width: i32, height: i32, color: Color) -> Bitmap {
    Bitmap::filled(width, height, color)
}

/// Filled ellipse inscribed in a `width`×`height` box.
pub fn ellipse(width: i32, height: i32, color: Color) -> Bitmap {
    let mut bmp = Bitmap::new(width, height);
    let rx = width as f32 / 2.0;
    let ry = height as f32 / 2.0;

    for y in 0..height {
        for x in 0..width {
            let dx = (x as f32 + 0.5 - rx) / rx;
            let dy = (y as f32 + 0.5 - ry) / ry;
            if dx * dx + dy * dy <= 1.0 {
                bmp.set(x, y, color);
            }
        }
    }
    bmp
}

/// Paints `top` over `base` with its top-left corner at `(x, y)`.
pub fn stamp(base: &mut Bitmap, top: &Bitmap, x: i32, y: i32) {
    for ty in 0..top.height() {
        for tx in 0..top.width() {
            if let Some(c) = top.get(tx, ty) {
                base.blend(x + tx, y + ty, c);
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
    fn provider_returns_shared_handle() {
        let mut store = AssetStore::new();
        let stored = store.insert("egg", solid(2, 3, Color::WHITE));

        let fetched = store.drawable("egg").unwrap();
        assert!(Arc::ptr_eq(&stored, &fetched));
        assert!(store.drawable("missing").is_none());
    }

    #[test]
    fn flipped_copy_is_mirrored() {
        let mut store = AssetStore::new();
        let a = Color::rgb(1, 0, 0);
        let b = Color::rgb(2, 0, 0);
        store.insert("left", Bitmap::from_pixels(2, 1, vec![a, b]));

        let right = store.insert_flipped_h("right", "left").unwrap();
        assert_eq!(right.pixels(), &[b, a]);
        assert!(store.insert_flipped_v("nope", "unknown").is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn ellipse_fills_centre_not_corners() {
        let bmp = ellipse(10, 6, Color::WHITE);
        assert_eq!(bmp.get(5, 3), Some(Color::WHITE));
        assert_eq!(bmp.get(0, 0), Some(Color::TRANSPARENT));
        assert_eq!(bmp.get(9, 5), Some(Color::TRANSPARENT));
    }

    #[test]
    fn stamp_blends_and_clips() {
        let mut base = solid(3, 3, Color::BLACK);
        stamp(&mut base, &solid(2, 2, Color::WHITE), 2, 2);
        assert_eq!(base.get(2, 2), Some(Color::WHITE));
        assert_eq!(base.get(1, 1), Some(Color::BLACK));
    }
}
