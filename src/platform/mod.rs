//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) and `pixels` (frame presentation) with
// the engine's core thread.
//
// Architecture:
// ```text
//  Main Thread:                        Core Thread:
//  ┌─────────────────────────────┐    ┌──────────────────────┐
//  │  Winit Event Loop           │    │  FrameLoop           │
//  │   ↓                         │    │   ├─ EventSource     │
//  │  InputProcessor             │    │   ├─ ModeManager     │
//  │   ├─ Window → surface px    │    │   └─ FrameBuffer     │
//  │   └─ Tracks modifiers       │    │                      │
//  │   ↓                         │    │                      │
//  │  crossbeam Sender ──────────┼───>│  PlatformEvent       │
//  │                             │    │                      │
//  │  user_event() <─────────────┼────┤  EventLoopProxy      │
//  │   ├─ FrameReady → pixels    │    │  PlatformCommand     │
//  │   └─ Exit → event_loop.exit │    │                      │
//  │                             │    │                      │
//  │  FrameSlot::take() <────────┼────┤  FrameSlot::publish  │
//  └─────────────────────────────┘    └──────────────────────┘
// ```
//
// Key Design Decisions:
// - **Latest frame wins**: frames travel through a one-frame slot, so a
//   slow presenter skips frames instead of queueing them
// - **Input is forwarded immediately**: the core chooses when to wait
//   (dispatch policy), so nothing is batched here
// - **Sticky modifiers**: Modifier state persists across events until
//   explicitly changed (matches platform behavior)
// - **Graceful channel disconnect**: If the core thread dies, platform
//   logs a warning but keeps running to allow window closure
// - **Main thread requirement**: Winit mandates main thread on macOS/iOS,
//   so this runs on the thread that called `Engine::run()`
//
//=========================================================================

//=== Submodules ==========================================================

mod input_processor;

//=== External Crates =====================================================

use std::sync::Arc;

use crossbeam_channel::Sender;
use log::*;
use pixels::{Pixels, SurfaceTexture};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::input::InputEvent;
use crate::core::platform_bridge::{Frame, FrameSlot, PlatformCommand, PlatformError, PlatformEvent};
use input_processor::InputProcessor;

//=== WindowConfig ========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

//=== Platform ============================================================

/// Window owner, input forwarder and frame presenter.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(config, sender, frames)`
/// 2. **Execution**: `platform.run(event_loop)` blocks until exit
/// 3. **Window**: created lazily in `resumed()` together with the pixel
///    surface
/// 4. **Shutdown**: window close sends `WindowClosed`; a core `Exit`
///    command leaves the loop
///
/// This type is NOT Send/Sync - it must remain on the main thread.
pub(crate) struct Platform {
    config: WindowConfig,

    /// OS window handle (None until `resumed()` called).
    window: Option<Arc<Window>>,

    /// Pixel surface sized `config.width`×`config.height`.
    pixels: Option<Pixels<'static>>,

    event_sender: Sender<PlatformEvent>,
    frames: FrameSlot,
    input_processor: InputProcessor,

    /// First fatal error seen inside the loop, reported by `run()`.
    error: Option<PlatformError>,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    pub fn new(config: WindowConfig, event_sender: Sender<PlatformEvent>, frames: FrameSlot) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            config,
            window: None,
            pixels: None,
            event_sender,
            frames,
            input_processor: InputProcessor::new(),
            error: None,
        }
    }

    /// Creates the event loop the core thread gets its proxy from.
    pub fn create_event_loop() -> Result<EventLoop<PlatformCommand>, PlatformError> {
        EventLoop::<PlatformCommand>::with_user_event()
            .build()
            .map_err(|e| PlatformError::EventLoopCreation(e.to_string()))
    }

    //--- Execution --------------------------------------------------------

    /// Runs the Winit event loop until the window closes or the core asks
    /// to exit.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the loop fails or the window / pixel
    /// surface could not be created.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread (macOS/iOS Winit requirement).
    pub fn run(mut self, event_loop: EventLoop<PlatformCommand>) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        event_loop
            .run_app(&mut self)
            .map_err(|e| PlatformError::EventLoopExecution(e.to_string()))?;

        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    /// Forwards one input event to the core thread.
    ///
    /// A disconnected channel (core thread gone) drops the event with a
    /// warning so the window can still be closed normally.
    fn forward(&self, event: InputEvent) {
        trace!(target: "platform::input", "Forwarding {:?}", event);
        if self.event_sender.send(PlatformEvent::Input(event)).is_err() {
            warn!(target: "platform::input", "Channel disconnected, dropping {:?}", event);
        }
    }

    fn notify_closed(&self) {
        let _ = self.event_sender.send(PlatformEvent::WindowClosed);
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: PlatformError) {
        error!(target: "platform", "{}", error);
        self.error.get_or_insert(error);
        self.notify_closed();
        event_loop.exit();
    }

    /// Maps a physical window position to surface pixels, clamping to the
    /// surface edges.
    fn to_surface(&self, x: f64, y: f64) -> (f32, f32) {
        match &self.pixels {
            Some(pixels) => {
                let (px, py) = pixels
                    .window_pos_to_pixel((x as f32, y as f32))
                    .unwrap_or_else(|pos| pixels.clamp_pixel_pos(pos));
                (px as f32, py as f32)
            }
            None => (x as f32, y as f32),
        }
    }

    fn create_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<(), PlatformError> {
        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let window = event_loop
            .create_window(attrs)
            .map(Arc::new)
            .map_err(|e| PlatformError::Surface(e.to_string()))?;

        let size = window.inner_size();
        info!(
            target: "platform",
            "Window created: {}x{} @ {}x DPI",
            size.width,
            size.height,
            window.scale_factor()
        );

        let texture = SurfaceTexture::new(size.width, size.height, window.clone());
        let pixels = Pixels::new(self.config.width, self.config.height, texture)
            .map_err(|e| PlatformError::Surface(e.to_string()))?;

        window.request_redraw();
        self.window = Some(window);
        self.pixels = Some(pixels);
        Ok(())
    }

    fn present(&mut self, frame: &Frame) -> Result<(), PlatformError> {
        let Some(pixels) = &mut self.pixels else {
            trace!(target: "platform", "Frame arrived before the surface, dropped");
            return Ok(());
        };

        if frame.width != self.config.width || frame.height != self.config.height {
            warn!(
                target: "platform",
                "Frame {}x{} does not match surface {}x{}, dropped",
                frame.width,
                frame.height,
                self.config.width,
                self.config.height
            );
            return Ok(());
        }

        pixels.frame_mut().copy_from_slice(&frame.rgba);
        pixels
            .render()
            .map_err(|e| PlatformError::Surface(e.to_string()))
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler<PlatformCommand> for Platform {
    /// Called when app becomes active (startup or mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        if let Err(e) = self.create_surface(event_loop) {
            self.fail(event_loop, e);
        }
    }

    /// Commands from the core thread.
    fn user_event(&mut self, event_loop: &ActiveEventLoop, command: PlatformCommand) {
        match command {
            PlatformCommand::FrameReady => {
                let Some(frame) = self.frames.take() else {
                    trace!(target: "platform", "Frame already presented");
                    return;
                };
                if let Err(e) = self.present(&frame) {
                    self.fail(event_loop, e);
                }
            }
            PlatformCommand::Exit => {
                info!(target: "platform", "Core requested exit");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.notify_closed();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(pixels) = &mut self.pixels {
                    if let Err(e) = pixels.resize_surface(size.width, size.height) {
                        let e = PlatformError::Surface(e.to_string());
                        self.fail(event_loop, e);
                    }
                }
            }

            WindowEvent::ModifiersChanged(state) => {
                trace!(target: "platform::input", "Modifiers changed: {:?}", state);
                self.input_processor.update_modifiers(state.state());
            }

            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = self.to_surface(position.x, position.y);
                let event = self.input_processor.process_mouse_move(x, y);
                self.forward(event);
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let Some(event) = self.input_processor.process_key_event(key_event) {
                    self.forward(event);
                } else {
                    trace!(target: "platform::input", "Unmapped key ignored");
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.input_processor.process_mouse_button(*button, *state);
                self.forward(event);
            }

            WindowEvent::RedrawRequested => {
                // Repaint the last frame (expose, resize)
                if let Some(pixels) = &self.pixels {
                    if let Err(e) = pixels.render() {
                        let e = PlatformError::Surface(e.to_string());
                        self.fail(event_loop, e);
                    }
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
