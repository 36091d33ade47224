//=========================================================================
// Mode Context
//=========================================================================
//
// Explicit context handed to every mode callback.
//
// Replaces global state: surface metrics and the frame cadence are read
// from here, and requests to the manager are queued here.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use super::{CommandQueue, DispatchPolicy, ModeCommand, ModeKey};

//=== ModeContext =========================================================

#[derive(Debug)]
pub struct ModeContext<K: ModeKey> {
    surface_width: i32,
    surface_height: i32,
    frame_delay: Duration,
    commands: CommandQueue<K>,
}

impl<K: ModeKey> ModeContext<K> {
    //--- Construction -----------------------------------------------------

    pub fn new(surface_width: i32, surface_height: i32, frame_delay: Duration) -> Self {
        Self {
            surface_width,
            surface_height,
            frame_delay,
            commands: CommandQueue::new(),
        }
    }

    //--- Metrics ----------------------------------------------------------

    pub fn surface_width(&self) -> i32 {
        self.surface_width
    }

    pub fn surface_height(&self) -> i32 {
        self.surface_height
    }

    /// Target duration of one frame. Animated modes use it as their
    /// simulation step.
    pub fn frame_delay(&self) -> Duration {
        self.frame_delay
    }

    //--- Requests ---------------------------------------------------------

    /// Asks the manager to switch to `key`.
    pub fn request_mode(&mut self, key: K) {
        self.commands.push(ModeCommand::SetMode(key));
    }

    /// Signals that the incoming mode is ready to be shown.
    pub fn transition_complete(&mut self) {
        self.commands.push(ModeCommand::TransitionComplete);
    }

    pub fn set_dispatch_policy(&mut self, policy: DispatchPolicy) {
        self.commands.push(ModeCommand::SetDispatch(policy));
    }

    /// Commands queued and not yet applied.
    pub fn pending(&self) -> &CommandQueue<K> {
        &self.commands
    }

    pub(crate) fn commands_mut(&mut self) -> &mut CommandQueue<K> {
        &mut self.commands
    }
}
