//=========================================================================
// Frame Loop
//=========================================================================
//
// The single cooperative loop of the core thread.
//
// Each tick:
//  1. Acquires one event using the current dispatch policy
//  2. Drains every other pending event without waiting (bounded)
//  3. Exits on request, window close or disconnect
//  4. Renders the current mode into the frame buffer
//  5. Hands the frame to the presenter
//  6. Injects a wake event if the dispatch policy changed
//  7. Sleeps out the rest of the frame
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use super::FramePacer;
use crate::core::mode::{ModeKey, ModeManager};
use crate::core::platform_bridge::{Acquired, EventSource, PlatformEvent};
use crate::core::render::FrameBuffer;

//=== TickControl =========================================================

/// Loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== Presenter ===========================================================

/// Receives each finished frame.
pub trait Presenter {
    fn present(&mut self, frame: &FrameBuffer) -> Result<(), PresentError>;
}

#[derive(Debug)]
pub enum PresentError {
    /// The surface is gone; the loop should stop.
    Closed,

    /// A single frame could not be shown.
    Failed(String),
}

impl fmt::Display for PresentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "Presentation surface is closed"),
            Self::Failed(e) => write!(f, "Frame presentation failed: {}", e),
        }
    }
}

impl std::error::Error for PresentError {}

//=== FrameLoop ===========================================================

pub struct FrameLoop<K: ModeKey> {
    manager: ModeManager<K>,
    source: EventSource,
    pacer: FramePacer,
    frame: FrameBuffer,
}

impl<K: ModeKey> FrameLoop<K> {
    const MAX_EVENTS_PER_FRAME: usize = 100;

    /// The frame buffer takes its size from the manager's context.
    pub fn new(manager: ModeManager<K>, source: EventSource, pacer: FramePacer) -> Self {
        let frame = FrameBuffer::new(
            manager.context().surface_width(),
            manager.context().surface_height(),
        );
        Self {
            manager,
            source,
            pacer,
            frame,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn manager(&self) -> &ModeManager<K> {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut ModeManager<K> {
        &mut self.manager
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    //--- Loop -------------------------------------------------------------

    /// Runs ticks until one returns [`TickControl::Exit`].
    pub fn run(&mut self, presenter: &mut dyn Presenter) {
        info!(target: "frame", "Frame loop started");
        while self.tick(presenter) == TickControl::Continue {}
        info!(target: "frame", "Frame loop exiting");
    }

    /// Performs one loop iteration.
    pub fn tick(&mut self, presenter: &mut dyn Presenter) -> TickControl {
        //--- Step 1: Acquire ----------------------------------------------
        let first = self.source.next(self.manager.dispatch_policy());
        if self.dispatch(first) == TickControl::Exit {
            return TickControl::Exit;
        }

        //--- Step 2: Drain --------------------------------------------------
        let mut drained = 0;
        while drained < Self::MAX_EVENTS_PER_FRAME {
            match self.source.poll() {
                Acquired::Empty => break,
                acquired => {
                    if self.dispatch(acquired) == TickControl::Exit {
                        return TickControl::Exit;
                    }
                    drained += 1;
                }
            }
        }

        if drained >= Self::MAX_EVENTS_PER_FRAME {
            warn!(
                target: "frame",
                "Event queue backlog: drained {} events this frame, {} left",
                drained,
                self.source.pending()
            );
        }

        //--- Step 3: Render and present ---------------------------------
        self.manager.render(&mut self.frame);

        match presenter.present(&self.frame) {
            Ok(()) => {}
            Err(PresentError::Closed) => {
                debug!(target: "frame", "Presenter closed");
                return TickControl::Exit;
            }
            Err(err) => warn!(target: "frame", "{}", err),
        }

        //--- Step 4: Release a blocking wait after a policy switch ----------
        if self.manager.take_policy_changed() {
            self.source.wake();
        }

        //--- Step 5: Pace ---------------------------------------------------
        self.pacer.delay_to_next_frame();

        TickControl::Continue
    }

    fn dispatch(&mut self, acquired: Acquired) -> TickControl {
        match acquired {
            Acquired::Event(PlatformEvent::Input(event)) => {
                if self.manager.handle_event(&event) {
                    info!(target: "frame", "Exit requested by {:?}", self.manager.current());
                    return TickControl::Exit;
                }
                TickControl::Continue
            }
            Acquired::Event(PlatformEvent::Wake) => {
                trace!(target: "frame", "Wake");
                TickControl::Continue
            }
            Acquired::Event(PlatformEvent::WindowClosed) => {
                info!(target: "frame", "Window closed");
                TickControl::Exit
            }
            Acquired::Disconnected => {
                info!(target: "frame", "Event source disconnected");
                TickControl::Exit
            }
            Acquired::Empty => TickControl::Continue,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputEvent, KeyCode};
    use crate::core::mode::{DispatchPolicy, Mode, ModeContext, ModeError};
    use crate::core::render::{Color, RenderTarget};
    use crossbeam_channel::{unbounded, Sender};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    //--- Test Helpers -----------------------------------------------------

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Key {
        Only,
    }

    impl crate::core::mode::ModeKey for Key {}

    /// Counts events, paints white, quits on Escape, switches to polling
    /// on `P`.
    struct Counter {
        events: Rc<RefCell<Vec<InputEvent>>>,
    }

    impl Mode<Key> for Counter {
        fn init(&mut self, _ctx: &mut ModeContext<Key>) -> Result<(), ModeError> {
            Ok(())
        }

        fn render(&mut self, target: &mut dyn RenderTarget, _ctx: &mut ModeContext<Key>) {
            target.fill(Color::WHITE);
        }

        fn handle_event(&mut self, event: &InputEvent, ctx: &mut ModeContext<Key>) -> bool {
            self.events.borrow_mut().push(*event);
            if event.pressed_key() == Some(KeyCode::KeyP) {
                ctx.set_dispatch_policy(DispatchPolicy::Poll);
            }
            event.pressed_key() == Some(KeyCode::Escape)
        }
    }

    #[derive(Default)]
    struct RecordingPresenter {
        frames: usize,
        closed: bool,
        last_pixel: Option<Color>,
    }

    impl Presenter for RecordingPresenter {
        fn present(&mut self, frame: &FrameBuffer) -> Result<(), PresentError> {
            if self.closed {
                return Err(PresentError::Closed);
            }
            self.frames += 1;
            self.last_pixel = frame.pixel(0, 0);
            Ok(())
        }
    }

    type Events = Rc<RefCell<Vec<InputEvent>>>;

    fn setup(policy: DispatchPolicy) -> (Sender<PlatformEvent>, FrameLoop<Key>, Events) {
        let (tx, rx) = unbounded();
        let source = EventSource::new(rx, tx.clone(), Duration::from_millis(5));
        let events = Events::default();

        let mut manager = ModeManager::new(8, 8, Duration::from_millis(1));
        manager
            .register_mode(Key::Only, Counter { events: events.clone() })
            .unwrap();
        manager.set_mode(Key::Only).unwrap();
        manager.set_dispatch_policy(policy);
        manager.take_policy_changed();

        let frame_loop = FrameLoop::new(manager, source, FramePacer::new(Duration::from_millis(1)));
        (tx, frame_loop, events)
    }

    fn key(k: KeyCode) -> PlatformEvent {
        PlatformEvent::Input(InputEvent::key_down(k))
    }

    //--- Tick -------------------------------------------------------------

    #[test]
    fn poll_tick_renders_without_events() {
        let (_tx, mut frame_loop, events) = setup(DispatchPolicy::Poll);
        let mut presenter = RecordingPresenter::default();

        assert_eq!(frame_loop.tick(&mut presenter), TickControl::Continue);
        assert_eq!(presenter.frames, 1);
        assert_eq!(presenter.last_pixel, Some(Color::WHITE));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn tick_dispatches_all_pending_events_in_order() {
        let (tx, mut frame_loop, events) = setup(DispatchPolicy::Blocking);
        tx.send(key(KeyCode::KeyA)).unwrap();
        tx.send(key(KeyCode::KeyB)).unwrap();
        tx.send(PlatformEvent::Wake).unwrap();
        tx.send(key(KeyCode::KeyC)).unwrap();

        let mut presenter = RecordingPresenter::default();
        frame_loop.tick(&mut presenter);

        let keys: Vec<_> = events.borrow().iter().filter_map(|e| e.pressed_key()).collect();
        assert_eq!(keys, vec![KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC]);
        assert_eq!(presenter.frames, 1);
    }

    #[test]
    fn drain_is_bounded_per_tick() {
        let (tx, mut frame_loop, events) = setup(DispatchPolicy::Poll);
        for _ in 0..150 {
            tx.send(key(KeyCode::Space)).unwrap();
        }

        let mut presenter = RecordingPresenter::default();
        frame_loop.tick(&mut presenter);
        assert_eq!(events.borrow().len(), 101);

        frame_loop.tick(&mut presenter);
        assert_eq!(events.borrow().len(), 150);
    }

    #[test]
    fn exit_request_stops_before_render() {
        let (tx, mut frame_loop, events) = setup(DispatchPolicy::Blocking);
        tx.send(key(KeyCode::Escape)).unwrap();
        tx.send(key(KeyCode::KeyA)).unwrap();

        let mut presenter = RecordingPresenter::default();
        assert_eq!(frame_loop.tick(&mut presenter), TickControl::Exit);
        assert_eq!(presenter.frames, 0);
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn window_closed_exits() {
        let (tx, mut frame_loop, _) = setup(DispatchPolicy::Blocking);
        tx.send(PlatformEvent::WindowClosed).unwrap();

        let mut presenter = RecordingPresenter::default();
        assert_eq!(frame_loop.tick(&mut presenter), TickControl::Exit);
    }

    #[test]
    fn closed_presenter_exits() {
        let (_tx, mut frame_loop, _) = setup(DispatchPolicy::Poll);
        let mut presenter = RecordingPresenter {
            closed: true,
            ..Default::default()
        };
        assert_eq!(frame_loop.tick(&mut presenter), TickControl::Exit);
    }

    #[test]
    fn policy_change_injects_wake() {
        let (tx, mut frame_loop, _) = setup(DispatchPolicy::Blocking);
        tx.send(key(KeyCode::KeyP)).unwrap();

        let mut presenter = RecordingPresenter::default();
        frame_loop.tick(&mut presenter);

        assert_eq!(frame_loop.manager().dispatch_policy(), DispatchPolicy::Poll);
        assert_eq!(frame_loop.source.poll(), Acquired::Event(PlatformEvent::Wake));
    }

    #[test]
    fn run_stops_on_window_close() {
        let (tx, mut frame_loop, events) = setup(DispatchPolicy::Blocking);
        tx.send(key(KeyCode::KeyA)).unwrap();
        tx.send(PlatformEvent::WindowClosed).unwrap();

        let mut presenter = RecordingPresenter::default();
        frame_loop.run(&mut presenter);

        assert_eq!(events.borrow().len(), 1);
        assert_eq!(presenter.frames, 0);
    }
}
