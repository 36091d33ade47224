//=========================================================================
// Eggdrop Game
//=========================================================================
//
// The two modes of the game and the resources they share.
//
// Architecture:
//   Screen::Intro → IntroMode  (title + [Play!, Quit])
//   Screen::Play  → PlayMode   (chicken, eggs, nest, score, pause overlay)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::path::Path;
use std::sync::Arc;

//=== Internal Dependencies ===============================================

use crate::assets::{BlockFont, FontError, GlyphFont};
use crate::core::menu::{Font, MenuItem};
use crate::core::mode::{ModeError, ModeKey, ModeManager};
use crate::core::render::Color;

//=== Module Declarations =================================================

mod intro;
mod play;

//=== Public API ==========================================================

pub use intro::IntroMode;
pub use play::PlayMode;

//=== Screen ==============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Intro,
    Play,
}

impl ModeKey for Screen {}

//=== Shared Style ========================================================

pub const TEXT_NORMAL: Color = Color::WHITE;
pub const TEXT_HIGHLIGHT: Color = Color::YELLOW;

/// Vertical distance between menu items.
pub const MENU_SPACING: i32 = 60;

/// Top of every menu.
pub const MENU_Y: i32 = 200;

//=== GameFonts ===========================================================

/// Title and menu fonts shared by both modes.
#[derive(Clone)]
pub struct GameFonts {
    pub title: Arc<dyn Font>,
    pub menu: Arc<dyn Font>,
}

impl GameFonts {
    const TITLE_PX: f32 = 50.0;
    const MENU_PX: f32 = 40.0;

    /// Built-in block fonts.
    pub fn block() -> Self {
        Self {
            title: Arc::new(BlockFont::new(7)),
            menu: Arc::new(BlockFont::new(5)),
        }
    }

    /// Outline fonts loaded from a TTF/OTF file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FontError> {
        let path = path.as_ref();
        Ok(Self {
            title: Arc::new(GlyphFont::load(path, Self::TITLE_PX)?),
            menu: Arc::new(GlyphFont::load(path, Self::MENU_PX)?),
        })
    }

    /// Menu items in the shared normal/highlight colors.
    pub fn menu_items(&self, texts: &[&str]) -> Vec<MenuItem> {
        texts
            .iter()
            .map(|text| MenuItem::new(self.menu.clone(), *text, TEXT_NORMAL, TEXT_HIGHLIGHT))
            .collect()
    }
}

impl fmt::Debug for GameFonts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameFonts").finish_non_exhaustive()
    }
}

//=== Registration ========================================================

/// Registers both modes and enters the intro.
pub fn install(
    manager: &mut ModeManager<Screen>,
    fonts: GameFonts,
    seed: Option<u64>,
) -> Result<(), ModeError> {
    manager.register_mode(Screen::Intro, IntroMode::new(fonts.clone()))?;
    manager.register_mode(Screen::Play, PlayMode::new(fonts, seed))?;
    manager.set_mode(Screen::Intro)
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mode::{DispatchPolicy, ModePhase};
    use std::time::Duration;

    #[test]
    fn install_enters_intro() {
        let mut manager = ModeManager::new(800, 600, Duration::from_millis(16));
        install(&mut manager, GameFonts::block(), Some(7)).unwrap();

        assert_eq!(manager.current(), Some(Screen::Intro));
        assert_eq!(manager.phase(Screen::Play), Some(ModePhase::Hidden));
        assert_eq!(manager.dispatch_policy(), DispatchPolicy::Blocking);
    }

    #[test]
    fn menu_items_share_style() {
        let items = GameFonts::block().menu_items(&["Play!", "Quit"]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].text, "Quit");
        assert_eq!(items[0].highlight, TEXT_HIGHLIGHT);
    }
}
