//=========================================================================
// Event Source
//=========================================================================
//
// Core-side end of the platform event channel.
//
// Architecture:
//   Receiver<PlatformEvent> → next(policy) → Acquired
//                           → poll()       → Acquired
//   Sender<PlatformEvent>   ← wake()        (self-injected Wake)
//
// The wait strategy is chosen per call from the current DispatchPolicy.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError};
use log::trace;

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::mode::DispatchPolicy;

//=== Acquired ============================================================

/// Outcome of one attempt to take an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Acquired {
    Event(PlatformEvent),

    /// No event within the allowed wait.
    Empty,

    /// Every sender is gone.
    Disconnected,
}

//=== EventSource =========================================================

pub struct EventSource {
    receiver: Receiver<PlatformEvent>,
    waker: Sender<PlatformEvent>,
    timeout: Duration,
}

impl EventSource {
    /// `timeout` bounds the `BlockingTimeout` wait, normally the frame
    /// cadence.
    pub fn new(
        receiver: Receiver<PlatformEvent>,
        waker: Sender<PlatformEvent>,
        timeout: Duration,
    ) -> Self {
        Self {
            receiver,
            waker,
            timeout,
        }
    }

    /// Takes the next event using the wait strategy of `policy`.
    pub fn next(&self, policy: DispatchPolicy) -> Acquired {
        match policy {
            DispatchPolicy::Blocking => match self.receiver.recv() {
                Ok(event) => Acquired::Event(event),
                Err(_) => Acquired::Disconnected,
            },
            DispatchPolicy::BlockingTimeout => match self.receiver.recv_timeout(self.timeout) {
                Ok(event) => Acquired::Event(event),
                Err(RecvTimeoutError::Timeout) => Acquired::Empty,
                Err(RecvTimeoutError::Disconnected) => Acquired::Disconnected,
            },
            DispatchPolicy::Poll => self.poll(),
        }
    }

    /// Takes an already queued event without waiting.
    pub fn poll(&self) -> Acquired {
        match self.receiver.try_recv() {
            Ok(event) => Acquired::Event(event),
            Err(TryRecvError::Empty) => Acquired::Empty,
            Err(TryRecvError::Disconnected) => Acquired::Disconnected,
        }
    }

    /// Injects a `Wake` so that a pending or upcoming blocking wait
    /// returns.
    ///
    /// A full channel already guarantees the wait returns, so the wake is
    /// dropped in that case.
    pub fn wake(&self) {
        match self.waker.try_send(PlatformEvent::Wake) {
            Ok(()) => trace!(target: "frame", "Injected wake event"),
            Err(TrySendError::Full(_)) => trace!(target: "frame", "Wake skipped, queue is full"),
            Err(TrySendError::Disconnected(_)) => {}
        }
    }

    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
