//=========================================================================
// Frame System
//=========================================================================
//
// Loop driver of the core thread.
//
// Architecture:
//   FrameLoop
//     ├─ EventSource   (acquire per DispatchPolicy)
//     ├─ ModeManager   (dispatch + render)
//     ├─ FrameBuffer   (render target)
//     ├─ Presenter     (hand-off to the platform)
//     └─ FramePacer    (fixed cadence, no catch-up)
//
//=========================================================================

//=== Module Declarations =================================================

mod frame_loop;
mod pacer;

//=== Public API ==========================================================

pub use frame_loop::{FrameLoop, PresentError, Presenter, TickControl};
pub use pacer::FramePacer;
