//=========================================================================
// Platform Bridge
//=========================================================================
//
// Contract between the platform layer (winit + pixels) and the core.
//
// The core never names winit types: it consumes `PlatformEvent`s through
// an `EventSource` and emits `PlatformCommand`s through a `Presenter`.
//
// Components:
// - `interface`: message and error types (the contract)
// - `event_source`: core-side event acquisition per dispatch policy
// - `frame_slot`: latest-frame mailbox towards the platform
//
//=========================================================================

//=== Module Declarations =================================================

mod event_source;
mod frame_slot;
mod interface;

//=== Public API ==========================================================

pub use event_source::{Acquired, EventSource};
pub use frame_slot::{Frame, FrameSlot};
pub use interface::{PlatformCommand, PlatformError, PlatformEvent};
