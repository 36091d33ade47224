//=========================================================================
// Core
//=========================================================================
//
// Engine systems that run on the core (non-platform) thread.
//
// Components:
// - `render`: bitmaps, colors, render targets
// - `scene`: retained scene graph and layout helpers
// - `menu`: text menus built on the scene graph
// - `aabb`: axis-aligned bounding boxes
// - `input`: platform-independent input events
// - `mode`: application modes and the transition handshake
// - `frame`: frame loop and pacing
// - `platform_bridge`: messages exchanged with the platform thread
//
// Nothing in here depends on winit, pixels or the game.
//
//=========================================================================

pub mod aabb;
pub mod frame;
pub mod input;
pub mod menu;
pub mod mode;
pub mod platform_bridge;
pub mod render;
pub mod scene;
