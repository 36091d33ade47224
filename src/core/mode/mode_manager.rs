//=========================================================================
// Mode Manager
//=========================================================================
//
// Owns every registered mode, routes events and rendering to the current
// one, and drives the transition handshake.
//
// Modes are registered once and never removed, so each keeps its state
// between activations.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use super::{DispatchPolicy, Mode, ModeCommand, ModeContext, ModeError, ModeKey, ModePhase};
use crate::core::input::InputEvent;
use crate::core::render::RenderTarget;

//=== TransitionState =====================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionState<K: ModeKey> {
    #[default]
    Idle,

    /// `will_show` has been delivered to `to`; waiting for completion.
    AwaitingCompletion { from: Option<K>, to: K },
}

//=== ModeManager =========================================================

pub struct ModeManager<K: ModeKey> {
    modes: HashMap<K, Box<dyn Mode<K>>>,
    phases: HashMap<K, ModePhase>,
    current: Option<K>,
    transition: TransitionState<K>,
    policy: DispatchPolicy,
    policy_dirty: bool,
    context: ModeContext<K>,
}

impl<K: ModeKey> ModeManager<K> {
    //--- Construction -----------------------------------------------------

    /// Creates a manager with no modes and the `Blocking` policy.
    pub fn new(surface_width: i32, surface_height: i32, frame_delay: Duration) -> Self {
        Self {
            modes: HashMap::new(),
            phases: HashMap::new(),
            current: None,
            transition: TransitionState::Idle,
            policy: DispatchPolicy::default(),
            policy_dirty: false,
            context: ModeContext::new(surface_width, surface_height, frame_delay),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Runs `init` on `mode` and stores it under `key`.
    ///
    /// An `init` failure is returned and the mode is not stored.
    /// Registering an existing key replaces the previous mode.
    pub fn register_mode<T>(&mut self, key: K, mut mode: T) -> Result<(), ModeError>
    where
        T: Mode<K> + 'static,
    {
        mode.init(&mut self.context)?;

        if self.modes.insert(key, Box::new(mode)).is_some() {
            warn!(target: "mode", "Mode {:?} was already registered and has been replaced", key);
        } else {
            debug!(target: "mode", "Registered mode {:?}", key);
        }
        self.phases.entry(key).or_insert(ModePhase::Hidden);

        self.run_commands();
        Ok(())
    }

    //--- Transitions ------------------------------------------------------

    /// Starts switching to `key`.
    ///
    /// Delivers `will_hide` to the current mode (if any) and `will_show` to
    /// the new one. The switch finishes when [`ModeManager::transition_complete`]
    /// runs, which the default `will_show` triggers immediately.
    pub fn set_mode(&mut self, key: K) -> Result<(), ModeError> {
        if !self.modes.contains_key(&key) {
            return Err(ModeError::Unregistered(format!("{:?}", key)));
        }

        if let TransitionState::AwaitingCompletion { from, to } = self.transition {
            return Err(ModeError::TransitionInProgress {
                from: from.map(|k| format!("{:?}", k)),
                to: format!("{:?}", to),
            });
        }

        let from = self.current;
        debug!(target: "mode", "Switching mode {:?} -> {:?}", from, key);
        self.transition = TransitionState::AwaitingCompletion { from, to: key };

        // Phase 1
        if let Some(old) = from {
            self.phases.insert(old, ModePhase::TransitioningOut);
            if let Some(mode) = self.modes.get_mut(&old) {
                mode.will_hide(&mut self.context);
            }
        }

        // Phase 2
        self.phases.insert(key, ModePhase::TransitioningIn);
        if let Some(mode) = self.modes.get_mut(&key) {
            mode.will_show(&mut self.context);
        }

        // Phase 3: wait for a completion command, possibly already queued
        self.run_commands();
        Ok(())
    }

    /// Finishes the pending switch: `did_hide` on the outgoing mode,
    /// `did_show` on the incoming one, then commits the new current mode.
    ///
    /// Logs a warning and does nothing when no switch is pending.
    pub fn transition_complete(&mut self) {
        let TransitionState::AwaitingCompletion { from, to } = self.transition else {
            warn!(target: "mode", "Transition completion signalled with no transition in progress");
            return;
        };
        self.transition = TransitionState::Idle;

        if let Some(old) = from {
            self.phases.insert(old, ModePhase::Hidden);
            if let Some(mode) = self.modes.get_mut(&old) {
                mode.did_hide(&mut self.context);
            }
        }

        self.phases.insert(to, ModePhase::Active);
        if let Some(mode) = self.modes.get_mut(&to) {
            mode.did_show(&mut self.context);
        }

        self.current = Some(to);
        info!(target: "mode", "Mode {:?} is now active", to);

        self.run_commands();
    }

    //--- Routing ----------------------------------------------------------

    /// Forwards `event` to the current mode.
    ///
    /// Returns the mode's exit request, or `false` with no current mode.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        let Some(key) = self.current else {
            return false;
        };

        trace!(target: "mode", "Dispatching {:?} to {:?}", event, key);
        let quit = match self.modes.get_mut(&key) {
            Some(mode) => mode.handle_event(event, &mut self.context),
            None => false,
        };

        self.run_commands();
        quit
    }

    /// Lets the current mode paint one frame.
    pub fn render(&mut self, target: &mut dyn RenderTarget) {
        let Some(key) = self.current else {
            return;
        };

        if let Some(mode) = self.modes.get_mut(&key) {
            mode.render(target, &mut self.context);
        }

        self.run_commands();
    }

    //--- Dispatch Policy --------------------------------------------------

    pub fn dispatch_policy(&self) -> DispatchPolicy {
        self.policy
    }

    /// Changes the event wait policy and marks it for a wake-up.
    pub fn set_dispatch_policy(&mut self, policy: DispatchPolicy) {
        if policy != self.policy {
            debug!(target: "mode", "Dispatch policy {:?} -> {:?}", self.policy, policy);
        }
        self.policy = policy;
        self.policy_dirty = true;
    }

    /// Returns whether the policy was set since the last call, clearing
    /// the flag.
    pub fn take_policy_changed(&mut self) -> bool {
        std::mem::take(&mut self.policy_dirty)
    }

    //--- Queries ----------------------------------------------------------

    pub fn current(&self) -> Option<K> {
        self.current
    }

    pub fn transition(&self) -> TransitionState<K> {
        self.transition
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition != TransitionState::Idle
    }

    /// Lifecycle phase of a registered mode.
    pub fn phase(&self, key: K) -> Option<ModePhase> {
        self.phases.get(&key).copied()
    }

    pub fn is_registered(&self, key: K) -> bool {
        self.modes.contains_key(&key)
    }

    pub fn context(&self) -> &ModeContext<K> {
        &self.context
    }

    //--- Internal Helpers -------------------------------------------------

    fn run_commands(&mut self) {
        while let Some(command) = self.context.commands_mut().pop() {
            trace!(target: "mode", "Applying {:?}", command);
            match command {
                ModeCommand::SetMode(key) => {
                    if let Err(err) = self.set_mode(key) {
                        warn!(target: "mode", "Mode request ignored: {}", err);
                    }
                }
                ModeCommand::TransitionComplete => self.transition_complete(),
                ModeCommand::SetDispatch(policy) => self.set_dispatch_policy(policy),
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
