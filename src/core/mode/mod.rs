//=========================================================================
// Mode System
//=========================================================================
//
// Mutually exclusive top-level application modes (intro, play, ...) and
// the four-phase handshake used to switch between them.
//
// Architecture:
//   ModeManager
//     ├─ modes: HashMap<K, Box<dyn Mode<K>>>
//     ├─ phases: HashMap<K, ModePhase>
//     ├─ transition: Idle | AwaitingCompletion { from, to }
//     └─ context: ModeContext (surface size, frame delay, commands)
//
// Handshake:
//   set_mode(to) → will_hide(from) → will_show(to)
//     ... transition_complete() → did_hide(from) → did_show(to) → commit
//
// Modes talk back to the manager only by queuing commands on the context;
// the manager drains them after every callback it makes.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::error::Error;
use std::fmt::{self, Debug};
use std::hash::Hash;

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;
use crate::core::render::RenderTarget;

//=== Module Declarations =================================================

mod command_queue;
mod context;
mod mode_manager;

//=== Public API ==========================================================

pub use command_queue::{CommandQueue, ModeCommand};
pub use context::ModeContext;
pub use mode_manager::{ModeManager, TransitionState};

//=== ModeKey =============================================================

/// Marker trait for mode identifiers, typically a small game-side enum.
pub trait ModeKey: Clone + Copy + Eq + Hash + Debug + 'static {}

//=== ModePhase ===========================================================

/// Lifecycle position of a registered mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModePhase {
    Hidden,
    TransitioningIn,
    Active,
    TransitioningOut,
}

//=== DispatchPolicy ======================================================

/// How the frame loop waits for the next event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DispatchPolicy {
    /// Sleep until an event arrives. Suits static menus.
    #[default]
    Blocking,

    /// Wait at most one frame cadence for an event.
    BlockingTimeout,

    /// Never wait. Suits continuously animated modes.
    Poll,
}

//=== Mode Trait ==========================================================

/// Behaviour of one application mode.
///
/// Only `init`, `render` and `handle_event` are required. The default
/// `will_show` completes the transition immediately; a mode that needs to
/// prepare asynchronously overrides it and calls
/// [`ModeContext::transition_complete`] later.
///
/// ```rust
/// # use eggdrop_engine::prelude::*;
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum Screen { Title }
/// # impl ModeKey for Screen {}
/// struct Title;
///
/// impl Mode<Screen> for Title {
///     fn init(&mut self, _ctx: &mut ModeContext<Screen>) -> Result<(), ModeError> {
///         Ok(())
///     }
///
///     fn render(&mut self, target: &mut dyn RenderTarget, _ctx: &mut ModeContext<Screen>) {
///         target.fill(Color::BLACK);
///     }
///
///     fn handle_event(&mut self, event: &InputEvent, _ctx: &mut ModeContext<Screen>) -> bool {
///         event.pressed_key() == Some(KeyCode::Escape)
///     }
/// }
/// ```
pub trait Mode<K: ModeKey> {
    /// Called once at registration.
    fn init(&mut self, ctx: &mut ModeContext<K>) -> Result<(), ModeError>;

    /// Paints one frame. Only called while the mode is current.
    fn render(&mut self, target: &mut dyn RenderTarget, ctx: &mut ModeContext<K>);

    /// Handles one input event. Returning `true` requests application exit.
    fn handle_event(&mut self, event: &InputEvent, ctx: &mut ModeContext<K>) -> bool;

    fn will_show(&mut self, ctx: &mut ModeContext<K>) {
        ctx.transition_complete();
    }

    fn did_show(&mut self, _ctx: &mut ModeContext<K>) {}

    fn will_hide(&mut self, _ctx: &mut ModeContext<K>) {}

    fn did_hide(&mut self, _ctx: &mut ModeContext<K>) {}
}

//=== ModeError ===========================================================

#[derive(Debug)]
pub enum ModeError {
    /// `set_mode` named a key that was never registered.
    Unregistered(String),

    /// `set_mode` was called while another switch awaits completion.
    TransitionInProgress { from: Option<String>, to: String },

    /// A mode failed to build its resources during `init`.
    Setup(Box<dyn Error + Send + Sync>),
}

impl ModeError {
    pub fn setup(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self::Setup(err.into())
    }
}

impl fmt::Display for ModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeError::Unregistered(key) => write!(f, "Mode {} is not registered", key),
            ModeError::TransitionInProgress { from: Some(from), to } => {
                write!(f, "Transition from {} to {} is still in progress", from, to)
            }
            ModeError::TransitionInProgress { from: None, to } => {
                write!(f, "Transition to {} is still in progress", to)
            }
            ModeError::Setup(err) => write!(f, "Mode setup failed: {}", err),
        }
    }
}

impl Error for ModeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ModeError::Setup(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
