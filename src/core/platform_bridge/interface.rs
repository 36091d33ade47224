//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Messages exchanged between the platform (main) thread and the core
// thread, and the platform error type.
//
//   platform ──PlatformEvent (crossbeam)──> core
//   core ─────PlatformCommand (EventLoopProxy)──> platform
//   core ─────Frame (FrameSlot)──> platform
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== PlatformEvent =======================================================

/// Events delivered to the core frame loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlatformEvent {
    Input(InputEvent),

    /// Carries no information. Injected to release a blocking wait after
    /// the dispatch policy changes.
    Wake,

    /// The window was closed or the platform loop ended.
    WindowClosed,
}

//=== PlatformCommand =====================================================

/// Requests sent from the core thread to the platform loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformCommand {
    /// A new frame is waiting in the `FrameSlot`.
    FrameReady,

    /// The core loop has stopped; close the window.
    Exit,
}

//=== PlatformError =======================================================

#[derive(Debug)]
pub enum PlatformError {
    /// Event loop creation failed (OS-level issue).
    EventLoopCreation(String),

    /// Event loop execution error.
    EventLoopExecution(String),

    /// Window or pixel surface could not be created.
    Surface(String),
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EventLoopCreation(e) => write!(f, "Event loop creation failed: {}", e),
            Self::EventLoopExecution(e) => write!(f, "Event loop error: {}", e),
            Self::Surface(e) => write!(f, "Surface creation failed: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {}
