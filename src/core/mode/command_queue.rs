//=========================================================================
// Command Queue
//=========================================================================
//
// Requests queued by modes for the mode manager.
//
// Modes cannot call back into the manager that is currently invoking
// them, so they push commands here instead. The manager pops them in FIFO
// order once the callback returns; commands queued while a command is
// being applied join the back of the same queue.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;

//=== Internal Dependencies ===============================================

use super::{DispatchPolicy, ModeKey};

//=== ModeCommand =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeCommand<K: ModeKey> {
    /// Start a switch to another mode.
    SetMode(K),

    /// Finish the pending switch (handshake phase 4).
    TransitionComplete,

    /// Change how the frame loop waits for events.
    SetDispatch(DispatchPolicy),
}

//=== CommandQueue ========================================================

#[derive(Debug)]
pub struct CommandQueue<K: ModeKey> {
    queue: VecDeque<ModeCommand<K>>,
}

impl<K: ModeKey> CommandQueue<K> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Queues a command to be applied after the current callback.
    pub fn push(&mut self, command: ModeCommand<K>) {
        self.queue.push_back(command);
    }

    /// Removes the oldest queued command.
    pub fn pop(&mut self) -> Option<ModeCommand<K>> {
        self.queue.pop_front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModeCommand<K>> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear()
    }
}

impl<K: ModeKey> Default for CommandQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
