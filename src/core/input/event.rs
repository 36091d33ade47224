//=========================================================================
// Input Events
//
// Platform-independent keyboard and pointer events delivered to modes.
//
// The platform layer converts winit events into these types; modes never
// see winit directly. Pointer coordinates are surface pixels with a
// top-left origin, already scaled from window space.
//
// Event Flow:
// ```text
// winit (main thread)
//         ↓
//    InputProcessor → InputEvent
//         ↓ crossbeam channel
//    FrameLoop → ModeManager → current Mode
// ```
//
//=========================================================================

//=== MouseButton =========================================================

/// Physical mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,

    /// Side, thumb and any other non-standard button.
    Other,
}

//=== KeyCode =============================================================

/// Physical key location, independent of keyboard layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    /// Any key the platform layer does not map.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Held modifier keys. Left and right variants are not distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };

    pub const ALT: Self = Self {
        shift: false,
        ctrl: false,
        alt: true,
    };

    pub fn is_empty(self) -> bool {
        self == Self::NONE
    }
}

//=== InputEvent ==========================================================

/// One discrete input occurrence.
///
/// Button events carry the pointer position at the time of the press so
/// that modes can hit-test without tracking the cursor themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown {
        key: KeyCode,
        modifiers: Modifiers,
    },

    KeyUp {
        key: KeyCode,
        modifiers: Modifiers,
    },

    MouseButtonDown {
        button: MouseButton,
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },

    MouseButtonUp {
        button: MouseButton,
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },

    /// Cursor moved to `(x, y)` in surface pixels.
    MouseMoved { x: f32, y: f32 },

    /// Event the platform layer could not classify. Modes ignore it.
    Unidentified,
}

impl InputEvent {
    //--- Constructors -----------------------------------------------------

    pub fn key_down(key: KeyCode) -> Self {
        Self::KeyDown {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn key_up(key: KeyCode) -> Self {
        Self::KeyUp {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn mouse_down(button: MouseButton, x: f32, y: f32) -> Self {
        Self::MouseButtonDown {
            button,
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn mouse_moved(x: f32, y: f32) -> Self {
        Self::MouseMoved { x, y }
    }

    //--- Queries ----------------------------------------------------------

    /// Returns the pressed key for `KeyDown`, `None` otherwise.
    pub fn pressed_key(&self) -> Option<KeyCode> {
        match *self {
            Self::KeyDown { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Pointer position in whole pixels, for pointer events only.
    pub fn pointer_position(&self) -> Option<(i32, i32)> {
        match *self {
            Self::MouseMoved { x, y }
            | Self::MouseButtonDown { x, y, .. }
            | Self::MouseButtonUp { x, y, .. } => Some((x as i32, y as i32)),
            _ => None,
        }
    }

    /// Returns a copy with updated modifiers. Pointer motion and
    /// unidentified events are returned unchanged.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        match &mut self {
            Self::KeyDown { modifiers: m, .. }
            | Self::KeyUp { modifiers: m, .. }
            | Self::MouseButtonDown { modifiers: m, .. }
            | Self::MouseButtonUp { modifiers: m, .. } => *m = modifiers,
            _ => {}
        }
        self
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressed_key_only_for_key_down() {
        assert_eq!(InputEvent::key_down(KeyCode::Enter).pressed_key(), Some(KeyCode::Enter));
        assert_eq!(InputEvent::key_up(KeyCode::Enter).pressed_key(), None);
        assert_eq!(InputEvent::mouse_moved(1.0, 2.0).pressed_key(), None);
    }

    #[test]
    fn pointer_position_truncates() {
        assert_eq!(InputEvent::mouse_moved(10.7, 65.2).pointer_position(), Some((10, 65)));
        assert_eq!(
            InputEvent::mouse_down(MouseButton::Left, 3.0, 4.9).pointer_position(),
            Some((3, 4))
        );
        assert_eq!(InputEvent::key_down(KeyCode::Space).pointer_position(), None);
        assert_eq!(InputEvent::Unidentified.pointer_position(), None);
    }

    #[test]
    fn with_modifiers_updates_keys_and_buttons() {
        let key = InputEvent::key_down(KeyCode::KeyP).with_modifiers(Modifiers::SHIFT);
        assert_eq!(
            key,
            InputEvent::KeyDown {
                key: KeyCode::KeyP,
                modifiers: Modifiers::SHIFT
            }
        );

        let click = InputEvent::mouse_down(MouseButton::Right, 0.0, 0.0).with_modifiers(Modifiers::CTRL);
        assert!(matches!(
            click,
            InputEvent::MouseButtonDown { modifiers, .. } if modifiers == Modifiers::CTRL
        ));
    }

    #[test]
    fn with_modifiers_ignores_motion() {
        let moved = InputEvent::mouse_moved(5.0, 6.0);
        assert_eq!(moved.with_modifiers(Modifiers::ALT), moved);
    }

    #[test]
    fn modifiers_default_is_empty() {
        assert!(Modifiers::default().is_empty());
        assert!(!Modifiers::SHIFT.is_empty());
    }
}
