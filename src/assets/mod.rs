//=========================================================================
// Assets
//=========================================================================
//
// Collaborators that produce what the core consumes: drawables, fonts
// and declarative scene trees.
//
// Components:
// - `store`: string-keyed drawables and procedural image builders
// - `font`: built-in block font and fontdue-backed outline fonts
// - `description`: RON scene descriptions instantiated into a graph
//
//=========================================================================

//=== Module Declarations =================================================

mod description;
mod font;
mod store;

//=== Public API ==========================================================

pub use description::{Dimension, NodeDesc, Position, SceneDescription, SceneError, SceneInstance};
pub use font::{BlockFont, FontError, GlyphFont};
pub use store::{ellipse, solid, stamp, AssetStore, DrawableProvider};

//=== Error Conversions ===================================================

use crate::core::mode::ModeError;

impl From<SceneError> for ModeError {
    fn from(e: SceneError) -> Self {
        ModeError::setup(e)
    }
}
