//=========================================================================
// Eggdrop Engine
//
// Main entry point and coordinator for the engine.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──init()──>  Engine  ──run()──>  [Runtime]
//         │                          │                                      │
//         ├─ with_fps()              └─ stores the mode setup               ├─ spawns core thread
//         ├─ with_window_size()                                             ├─ runs platform
//         ├─ with_title()                                                   └─ joins on exit
//         ├─ with_channel_capacity()
//         └─ with_initial_policy()
// ```
//
// Modes are created on the core thread by the `init` closure, so they
// never cross a thread boundary.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::marker::PhantomData;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, error, info};
use winit::event_loop::EventLoopProxy;

//=== Internal Dependencies ===============================================

use crate::core::frame::{FrameLoop, FramePacer, PresentError, Presenter};
use crate::core::mode::{DispatchPolicy, ModeError, ModeKey, ModeManager};
use crate::core::platform_bridge::{
    EventSource, Frame, FrameSlot, PlatformCommand, PlatformError, PlatformEvent,
};
use crate::core::render::FrameBuffer;
use crate::platform::{Platform, WindowConfig};

//=== EngineError =========================================================

#[derive(Debug)]
pub enum EngineError {
    Platform(PlatformError),
    Mode(ModeError),

    /// The core thread panicked.
    CoreThreadPanicked,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Platform(e) => write!(f, "Platform error: {}", e),
            Self::Mode(e) => write!(f, "Mode error: {}", e),
            Self::CoreThreadPanicked => write!(f, "Core thread panicked"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Platform(e) => Some(e),
            Self::Mode(e) => Some(e),
            Self::CoreThreadPanicked => None,
        }
    }
}

impl From<PlatformError> for EngineError {
    fn from(e: PlatformError) -> Self {
        Self::Platform(e)
    }
}

impl From<ModeError> for EngineError {
    fn from(e: ModeError) -> Self {
        Self::Mode(e)
    }
}

//=== EngineConfig ========================================================

#[derive(Debug, Clone, PartialEq)]
struct EngineConfig {
    fps: f64,
    width: u32,
    height: u32,
    title: String,
    channel_capacity: usize,
    initial_policy: DispatchPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fps: 60.0,
            width: 800,
            height: 600,
            title: "Eggdrop!".to_string(),
            channel_capacity: 128,
            initial_policy: DispatchPolicy::Blocking,
        }
    }
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **FPS**: 60.0
/// - **Window**: 800×600, titled "Eggdrop!"
/// - **Channel capacity**: 128 events
/// - **Initial dispatch policy**: `Blocking`
///
/// # Examples
///
/// ```no_run
/// use eggdrop_engine::EngineBuilder;
/// use eggdrop_engine::game::{self, GameFonts, Screen};
///
/// EngineBuilder::<Screen>::new()
///     .with_fps(30.0)
///     .with_window_size(800, 600)
///     .build()
///     .init(|manager| game::install(manager, GameFonts::block(), None))
///     .run()
///     .expect("engine failed");
/// ```
pub struct EngineBuilder<K: ModeKey> {
    config: EngineConfig,
    _phantom: PhantomData<K>,
}

impl<K: ModeKey> EngineBuilder<K> {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            _phantom: PhantomData,
        }
    }

    /// Sets the target frames per second of the core loop.
    ///
    /// # Panics
    ///
    /// Panics if `fps <= 0.0`.
    pub fn with_fps(mut self, fps: f64) -> Self {
        assert!(fps > 0.0, "FPS must be positive, got {}", fps);
        self.config.fps = fps;
        self
    }

    /// Sets the surface size in pixels. The window opens at this logical
    /// size and the frame buffer always has exactly this size.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(
            width > 0 && height > 0,
            "Window size must be positive, got {}x{}",
            width,
            height
        );
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Sets the channel capacity for platform → core communication.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.config.channel_capacity = capacity;
        self
    }

    /// Policy in force until a mode chooses its own.
    pub fn with_initial_policy(mut self, policy: DispatchPolicy) -> Self {
        self.config.initial_policy = policy;
        self
    }

    pub fn build(self) -> Engine<K> {
        info!(
            "Building engine ({} FPS, {}x{}, channel: {})",
            self.config.fps, self.config.width, self.config.height, self.config.channel_capacity
        );

        Engine {
            config: self.config,
            setup: None,
        }
    }
}

impl<K: ModeKey> Default for EngineBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

type ModeSetup<K> = Box<dyn FnOnce(&mut ModeManager<K>) -> Result<(), ModeError> + Send>;

/// Eggdrop engine runtime.
///
/// ```text
/// Engine (Main Thread)
///   ├─► FrameLoop (Core Thread)
///   │     └─► ModeManager, modes, FrameBuffer
///   │
///   └─► Platform (Event Loop)
///         └─► Window, input, pixels surface
///
/// Communication: crossbeam channel (PlatformEvent),
///                EventLoopProxy (PlatformCommand) and FrameSlot (Frame)
/// ```
pub struct Engine<K: ModeKey> {
    config: EngineConfig,
    setup: Option<ModeSetup<K>>,
}

impl<K: ModeKey> Engine<K> {
    //--- Initialization ---------------------------------------------------

    /// Stores the mode setup. It runs on the core thread before the first
    /// frame; an error stops the engine and is returned from [`Engine::run`].
    ///
    /// Calling `init` again replaces the previous setup.
    pub fn init<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut ModeManager<K>) -> Result<(), ModeError> + Send + 'static,
    {
        self.setup = Some(Box::new(setup));
        self
    }

    //--- Execution --------------------------------------------------------

    /// Starts the engine and blocks until the application exits.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the event loop and the platform → core channel
    /// 2. Spawns the core thread (mode setup, then the frame loop)
    /// 3. Runs the platform event loop (blocks here)
    /// 4. On exit: wakes the core with `WindowClosed` and joins it
    ///
    /// # Errors
    ///
    /// Returns the mode setup error if there is one, otherwise the first
    /// platform error.
    pub fn run(self) -> Result<(), EngineError> {
        info!("Starting engine runtime ({} FPS)", self.config.fps);

        //--- 1. Event loop and channel ------------------------------------
        let event_loop = Platform::create_event_loop()?;
        let proxy = event_loop.create_proxy();

        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.config.channel_capacity);
        debug!("Channel created (capacity: {})", self.config.channel_capacity);

        // Lets the first frame render under a blocking policy
        let _ = tx.send(PlatformEvent::Wake);

        let slot = FrameSlot::new();

        //--- 2. Core thread -----------------------------------------------
        let core_handle = {
            let config = self.config.clone();
            let waker = tx.clone();
            let setup = self.setup;
            let presenter = ProxyPresenter {
                proxy,
                slot: slot.clone(),
            };
            thread::spawn(move || run_core::<K>(config, rx, waker, presenter, setup))
        };
        info!("Core thread spawned");

        //--- 3. Platform ----------------------------------------------------
        let platform = Platform::new(
            WindowConfig {
                title: self.config.title.clone(),
                width: self.config.width,
                height: self.config.height,
            },
            tx.clone(),
            slot,
        );
        let platform_result = platform.run(event_loop);
        info!("Platform event loop exited");

        //--- 4. Shutdown ----------------------------------------------------
        let _ = tx.send(PlatformEvent::WindowClosed);
        drop(tx);

        let core_result = match core_handle.join() {
            Ok(result) => result,
            Err(e) => {
                error!("Core thread panicked: {:?}", e);
                Err(EngineError::CoreThreadPanicked)
            }
        };

        info!("Engine shutdown complete");
        core_result?;
        platform_result.map_err(EngineError::from)
    }
}

//=== Core Thread =========================================================

fn run_core<K: ModeKey>(
    config: EngineConfig,
    receiver: Receiver<PlatformEvent>,
    waker: Sender<PlatformEvent>,
    mut presenter: ProxyPresenter,
    setup: Option<ModeSetup<K>>,
) -> Result<(), EngineError> {
    let pacer = FramePacer::from_fps(config.fps);
    let mut manager = ModeManager::new(config.width as i32, config.height as i32, pacer.target());
    manager.set_dispatch_policy(config.initial_policy);

    if let Some(setup) = setup {
        if let Err(e) = setup(&mut manager) {
            error!("Mode setup failed: {}", e);
            presenter.exit();
            return Err(e.into());
        }
    }

    let source = EventSource::new(receiver, waker, pacer.target());
    let mut frame_loop = FrameLoop::new(manager, source, pacer);
    frame_loop.run(&mut presenter);

    presenter.exit();
    Ok(())
}

//=== ProxyPresenter ======================================================

/// Ships frames to the platform thread through the frame slot, waking
/// the event loop through its proxy.
struct ProxyPresenter {
    proxy: EventLoopProxy<PlatformCommand>,
    slot: FrameSlot,
}

impl ProxyPresenter {
    fn exit(&self) {
        if self.proxy.send_event(PlatformCommand::Exit).is_err() {
            debug!("Event loop already closed");
        }
    }
}

impl Presenter for ProxyPresenter {
    fn present(&mut self, frame: &FrameBuffer) -> Result<(), PresentError> {
        if !self.slot.publish(to_frame(frame)) {
            return Ok(());
        }
        self.proxy
            .send_event(PlatformCommand::FrameReady)
            .map_err(|_| PresentError::Closed)
    }
}

fn to_frame(frame: &FrameBuffer) -> Frame {
    use crate::core::render::RenderTarget;

    Frame {
        width: frame.width() as u32,
        height: frame.height() as u32,
        rgba: frame.to_rgba_bytes(),
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
