//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use eggdrop_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder, EngineError};

// Modes
pub use crate::core::mode::{DispatchPolicy, Mode, ModeContext, ModeError, ModeKey, ModeManager};

// Input system
pub use crate::core::input::{InputEvent, KeyCode, Modifiers, MouseButton};

// Rendering
pub use crate::core::render::{Bitmap, Color, FrameBuffer, RenderTarget};

// Scene graph and widgets
pub use crate::core::aabb::Aabb;
pub use crate::core::menu::{Justification, Menu, MenuItem};
pub use crate::core::scene::{EntityId, SceneGraph};
