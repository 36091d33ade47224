//=========================================================================
// Pause Overlay
//=========================================================================
//
// Translucent shade with a [Return to Game, Main Menu] menu. While open it
// captures all input; the play field underneath is frozen.
//
// Pointer events are ignored until the overlay has been rendered once
// since it opened: menu hit tests read the transforms of that pass.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use log::debug;

//=== Internal Dependencies ===============================================

use crate::assets::solid;
use crate::core::input::{InputEvent, KeyCode, MouseButton};
use crate::core::menu::{Justification, Menu};
use crate::core::render::Color;
use crate::core::scene::{layout, EntityId, SceneGraph};
use crate::game::{GameFonts, MENU_SPACING, MENU_Y};

//=== Constants ===========================================================

const SHADE: Color = Color::rgba(0, 0, 0, 127);

const ITEM_RESUME: usize = 0;
const ITEM_MAIN_MENU: usize = 1;

//=== PauseAction =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseAction {
    None,
    Resume,
    MainMenu,
}

//=== PauseOverlay ========================================================

pub struct PauseOverlay {
    shade: EntityId,
    menu: Menu,
    rendered: bool,
}

impl PauseOverlay {
    /// Builds the hidden overlay. The caller attaches [`PauseOverlay::root`].
    pub fn build(graph: &mut SceneGraph, fonts: &GameFonts, width: i32, height: i32) -> Self {
        let shade = graph.spawn(Some(Arc::new(solid(width, height, SHADE))));
        graph.set_visible(shade, false);

        let menu = Menu::build(
            graph,
            fonts.menu_items(&["Return to Game", "Main Menu"]),
            MENU_SPACING,
            Justification::Center,
        );
        layout::center_in_parent(graph, menu.root(), shade);
        graph.get_mut(menu.root()).y = MENU_Y;
        graph.add_child(shade, menu.root());

        Self {
            shade,
            menu,
            rendered: false,
        }
    }

    pub fn root(&self) -> EntityId {
        self.shade
    }

    pub fn is_open(&self, graph: &SceneGraph) -> bool {
        graph.get(self.shade).visible
    }

    pub fn selected(&self) -> usize {
        self.menu.selected()
    }

    /// Shows the overlay with the first item selected.
    pub fn open(&mut self, graph: &mut SceneGraph) {
        debug!(target: "game", "Paused");
        self.menu.set_selected(graph, ITEM_RESUME);
        graph.set_visible(self.shade, true);
        self.rendered = false;
    }

    pub fn close(&mut self, graph: &mut SceneGraph) {
        debug!(target: "game", "Resumed");
        graph.set_visible(self.shade, false);
    }

    /// Records that a render pass has laid out the open overlay.
    pub fn mark_rendered(&mut self, graph: &SceneGraph) {
        self.rendered = self.is_open(graph);
    }

    /// Routes one event to the pause menu.
    pub fn handle_event(&mut self, event: &InputEvent, graph: &mut SceneGraph) -> PauseAction {
        match *event {
            InputEvent::KeyDown { key, .. } => match key {
                KeyCode::Escape => PauseAction::Resume,
                KeyCode::ArrowDown => {
                    self.menu.select_next(graph);
                    PauseAction::None
                }
                KeyCode::ArrowUp => {
                    self.menu.select_prev(graph);
                    PauseAction::None
                }
                KeyCode::Enter => Self::action_for(self.menu.selected()),
                _ => PauseAction::None,
            },
            InputEvent::MouseMoved { .. } | InputEvent::MouseButtonDown { .. }
                if !self.rendered =>
            {
                PauseAction::None
            }
            InputEvent::MouseMoved { y, .. } => {
                self.menu.select_by_pointer_y(graph, y as i32);
                PauseAction::None
            }
            InputEvent::MouseButtonDown {
                button: MouseButton::Left,
                y,
                ..
            } => {
                self.menu.select_by_pointer_click_y(graph, y as i32);
                self.menu.clicked().map_or(PauseAction::None, Self::action_for)
            }
            _ => PauseAction::None,
        }
    }

    fn action_for(item: usize) -> PauseAction {
        match item {
            ITEM_RESUME => PauseAction::Resume,
            ITEM_MAIN_MENU => PauseAction::MainMenu,
            _ => PauseAction::None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
