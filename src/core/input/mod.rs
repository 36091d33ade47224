//=========================================================================
// Input
//=========================================================================
//
// Platform-independent input vocabulary shared by the platform layer and
// every mode.
//
//=========================================================================

//=== Module Declarations =================================================

mod event;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode, Modifiers, MouseButton};
