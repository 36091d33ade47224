//=========================================================================
// Frame Slot
//=========================================================================
//
// Single-frame mailbox from the core thread to the platform thread.
//
//   core:     publish(frame) ──> [slot: 0 or 1 frame] ──> take()  :platform
//                 │                                         ↑
//                 └─ FrameReady (proxy) only when no ───────┘
//                    notification is outstanding
//
// A newer frame replaces an unpresented one, so a slow presenter never
// queues frames. The `notified` flag is cleared by the platform before it
// takes, which guarantees every published frame is either taken by an
// already-pending notification or gets a fresh one.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use log::trace;

//=== Frame ===============================================================

/// A finished frame as tightly packed RGBA8 rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

//=== FrameSlot ===========================================================

/// Cloneable handle to the shared slot; each thread keeps one.
#[derive(Debug, Clone)]
pub struct FrameSlot {
    sender: Sender<Frame>,
    receiver: Receiver<Frame>,
    notified: Arc<AtomicBool>,
}

impl FrameSlot {
    pub fn new() -> Self {
        let (sender, receiver) = bounded(1);
        Self {
            sender,
            receiver,
            notified: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stores `frame`, dropping any frame not yet taken.
    ///
    /// Returns `true` when the caller must notify the platform.
    pub fn publish(&self, frame: Frame) -> bool {
        let mut frame = frame;
        loop {
            match self.sender.try_send(frame) {
                Ok(()) => break,
                Err(TrySendError::Full(back)) => {
                    if self.receiver.try_recv().is_ok() {
                        trace!(target: "frame", "Replaced unpresented frame");
                    }
                    frame = back;
                }
                // Both ends live in every handle
                Err(TrySendError::Disconnected(_)) => return false,
            }
        }
        !self.notified.swap(true, Ordering::AcqRel)
    }

    /// Takes the newest frame, if any. Call on every notification.
    pub fn take(&self) -> Option<Frame> {
        self.notified.store(false, Ordering::Release);
        self.receiver.try_recv().ok()
    }
}

impl Default for FrameSlot {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
