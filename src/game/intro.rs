//=========================================================================
// Intro Mode
//=========================================================================
//
// Title screen: "Eggdrop!" and a [Play!, Quit] menu driven by arrows,
// Enter and the mouse. Static, so it waits for events (Blocking).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use log::info;

//=== Internal Dependencies ===============================================

use super::{GameFonts, Screen, MENU_SPACING, MENU_Y, TEXT_NORMAL};
use crate::core::input::{InputEvent, KeyCode, MouseButton};
use crate::core::menu::{Justification, Menu};
use crate::core::mode::{DispatchPolicy, Mode, ModeContext, ModeError};
use crate::core::render::{Color, RenderTarget};
use crate::core::scene::{layout, EntityId, SceneGraph};

//=== Constants ===========================================================

const BACKGROUND: Color = Color::rgb(60, 160, 60);
const TITLE_Y: i32 = 40;

const ITEM_PLAY: usize = 0;
const ITEM_QUIT: usize = 1;

//=== IntroMode ===========================================================

pub struct IntroMode {
    fonts: GameFonts,
    scene: Option<IntroScene>,
}

struct IntroScene {
    graph: SceneGraph,
    root: EntityId,
    menu: Menu,
}

impl IntroMode {
    pub fn new(fonts: GameFonts) -> Self {
        Self { fonts, scene: None }
    }

    fn build(&self, width: i32, height: i32) -> IntroScene {
        let mut graph = SceneGraph::new();
        let root = graph.spawn_container(width, height);

        let title = graph.spawn(Some(Arc::new(self.fonts.title.rasterize("Eggdrop!", TEXT_NORMAL))));
        layout::center_in_width(&mut graph, title, width);
        graph.get_mut(title).y = TITLE_Y;

        let menu = Menu::build(
            &mut graph,
            self.fonts.menu_items(&["Play!", "Quit"]),
            MENU_SPACING,
            Justification::Center,
        );
        layout::center_in_parent(&mut graph, menu.root(), root);
        graph.get_mut(menu.root()).y = MENU_Y;

        graph.add_children(root, &[title, menu.root()]);

        IntroScene { graph, root, menu }
    }
}

impl IntroScene {
    /// Returns `true` when the item asks to leave the game.
    fn activate(&self, item: usize, ctx: &mut ModeContext<Screen>) -> bool {
        match item {
            ITEM_PLAY => {
                ctx.request_mode(Screen::Play);
                false
            }
            ITEM_QUIT => {
                info!(target: "game", "Quit selected");
                true
            }
            _ => false,
        }
    }
}

impl Mode<Screen> for IntroMode {
    fn init(&mut self, ctx: &mut ModeContext<Screen>) -> Result<(), ModeError> {
        self.scene = Some(self.build(ctx.surface_width(), ctx.surface_height()));
        Ok(())
    }

    fn render(&mut self, target: &mut dyn RenderTarget, _ctx: &mut ModeContext<Screen>) {
        target.fill(BACKGROUND);
        if let Some(scene) = &mut self.scene {
            scene.graph.render(scene.root, target);
        }
    }

    fn handle_event(&mut self, event: &InputEvent, ctx: &mut ModeContext<Screen>) -> bool {
        let Some(scene) = &mut self.scene else {
            return false;
        };

        match *event {
            InputEvent::KeyDown { key, .. } => match key {
                KeyCode::Escape => return true,
                KeyCode::ArrowDown => scene.menu.select_next(&mut scene.graph),
                KeyCode::ArrowUp => scene.menu.select_prev(&mut scene.graph),
                KeyCode::Enter => return scene.activate(scene.menu.selected(), ctx),
                _ => {}
            },
            InputEvent::MouseMoved { y, .. } => {
                scene.menu.select_by_pointer_y(&mut scene.graph, y as i32);
            }
            InputEvent::MouseButtonDown {
                button: MouseButton::Left,
                y,
                ..
            } => {
                scene.menu.select_by_pointer_click_y(&scene.graph, y as i32);
                if let Some(item) = scene.menu.clicked() {
                    return scene.activate(item, ctx);
                }
            }
            _ => {}
        }

        false
    }

    fn did_show(&mut self, ctx: &mut ModeContext<Screen>) {
        ctx.set_dispatch_policy(DispatchPolicy::Blocking);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
