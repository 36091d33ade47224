//=========================================================================
// Play Mode
//=========================================================================
//
// The game proper. A chicken walks the top edge laying eggs; the player
// steers the nest with the mouse or the arrow keys to catch them.
//
// Architecture:
//   root (play.ron)
//     ├─ grass
//     ├─ chicken      → Chicken
//     ├─ eggs         → EggPool
//     ├─ nest
//     ├─ score
//     └─ pause shade  → PauseOverlay (built in code, hidden)
//
// Flow (per frame, unpaused):
//   render() → step(frame_delay) → chicken → eggs → catch → score/level
//            → SceneGraph::render()
//
// All gameplay boxes are in root-local coordinates; the root sits at the
// surface origin so they coincide with world coordinates.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

//=== Internal Dependencies ===============================================

use super::{GameFonts, Screen, TEXT_NORMAL};
use crate::assets::{ellipse, solid, stamp, AssetStore, SceneDescription};
use crate::core::aabb::Aabb;
use crate::core::input::{InputEvent, KeyCode};
use crate::core::mode::{DispatchPolicy, Mode, ModeContext, ModeError};
use crate::core::render::{Bitmap, Color, RenderTarget};
use crate::core::scene::{EntityId, SceneGraph};

//=== Module Declarations =================================================

mod chicken;
mod eggs;
mod pause;

use chicken::Chicken;
use eggs::EggPool;
use pause::{PauseAction, PauseOverlay};

//=== Constants ===========================================================

const SCENE_RON: &str = include_str!("../../../assets/play.ron");

const BACKGROUND: Color = Color::rgb(60, 60, 160);

const NEST_KEY_STEP: i32 = 40;
const CATCHES_PER_LEVEL: u32 = 10;
const SCORE_MARGIN: i32 = 10;

//=== PlayMode ============================================================

pub struct PlayMode {
    fonts: GameFonts,
    seed: Option<u64>,
    scene: Option<PlayScene>,
}

impl PlayMode {
    pub fn new(fonts: GameFonts, seed: Option<u64>) -> Self {
        Self {
            fonts,
            seed,
            scene: None,
        }
    }
}

//=== PlayScene ===========================================================

struct PlayScene {
    graph: SceneGraph,
    root: EntityId,
    width: i32,

    chicken: Chicken,
    eggs: EggPool,
    nest: EntityId,
    nest_sweep: Aabb,

    score_label: EntityId,
    score: u32,
    level: i32,

    pause: PauseOverlay,
    paused: bool,

    fonts: GameFonts,
    rng: StdRng,
}

impl PlayScene {
    //--- Construction -----------------------------------------------------

    fn build(fonts: &GameFonts, seed: Option<u64>, width: i32, height: i32) -> Result<Self, ModeError> {
        let store = load_assets(width);
        let mut graph = SceneGraph::new();
        let scene = SceneDescription::from_ron(SCENE_RON)?.instantiate(&mut graph, &store, (width, height))?;
        debug!(target: "game", "Play scene has {} entities", graph.len());

        let chicken = Chicken::new(
            scene.require("chicken")?,
            required(&store, "chicken_left")?,
            required(&store, "chicken_right")?,
        );
        let eggs = EggPool::new(scene.require("eggs")?, required(&store, "egg")?);

        let pause = PauseOverlay::build(&mut graph, fonts, width, height);
        graph.add_child(scene.root, pause.root());

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut play = Self {
            graph,
            root: scene.root,
            width,
            chicken,
            eggs,
            nest: scene.require("nest")?,
            nest_sweep: Aabb::default(),
            score_label: scene.require("score")?,
            score: 0,
            level: 0,
            pause,
            paused: false,
            fonts: fonts.clone(),
            rng,
        };
        play.reset();
        Ok(play)
    }

    /// Fresh round: no eggs, level 0, nest and chicken centered.
    fn reset(&mut self) {
        self.score = 0;
        self.level = 0;
        self.eggs.set_level(0);
        self.eggs.reset(&mut self.graph);
        self.chicken.reset(&mut self.graph, self.width);

        let nest_w = self.graph.get(self.nest).w;
        self.move_nest_to((self.width - nest_w) / 2);
        self.nest_sweep = self.nest_box();

        if self.paused {
            self.pause.close(&mut self.graph);
            self.paused = false;
        }
        self.refresh_score();
    }

    //--- Simulation -------------------------------------------------------

    fn step(&mut self, dt: Duration) {
        self.chicken
            .step(&mut self.graph, &mut self.rng, dt, self.level, self.width);

        let launch_x = self.chicken.launch_x(&self.graph);
        let outcome = self.eggs.step(&mut self.graph, dt, self.level, launch_x);
        if outcome.splatted > 0 {
            debug!(target: "game", "{} egg(s) splatted", outcome.splatted);
        }

        let caught = self.eggs.catch(&mut self.graph, &self.nest_sweep);
        self.nest_sweep = self.nest_box();
        if caught > 0 {
            self.add_catches(caught);
        }
    }

    fn add_catches(&mut self, caught: u32) {
        let before = self.score / CATCHES_PER_LEVEL;
        self.score += caught;
        let after = self.score / CATCHES_PER_LEVEL;

        if after > before {
            self.level = after as i32;
            self.eggs.set_level(self.level);
            info!(target: "game", "Level {} (score {})", self.level, self.score);
        }
        self.refresh_score();
    }

    //--- Nest -------------------------------------------------------------

    fn nest_box(&self) -> Aabb {
        let node = self.graph.get(self.nest);
        Aabb::from_rect(node.x, node.y, node.w, node.h)
    }

    /// Moves the nest, clamped to the field, and widens its sweep.
    fn move_nest_to(&mut self, x: i32) {
        let node = self.graph.get_mut(self.nest);
        let max_x = (self.width - node.w).max(0);
        node.x = x.clamp(0, max_x);
        self.nest_sweep = self.nest_sweep.union(&self.nest_box());
    }

    fn center_nest_on(&mut self, pointer_x: i32) {
        let w = self.graph.get(self.nest).w;
        self.move_nest_to(pointer_x - w / 2);
    }

    //--- Score ------------------------------------------------------------

    fn refresh_score(&mut self) {
        let text = format!("Score {}  Level {}", self.score, self.level);
        let label = Arc::new(self.fonts.menu.rasterize(&text, TEXT_NORMAL));
        self.graph.set_drawable(self.score_label, Some(label));

        let node = self.graph.get_mut(self.score_label);
        node.x = self.width - node.w - SCORE_MARGIN;
        node.y = SCORE_MARGIN;
    }

    //--- Input ------------------------------------------------------------

    fn set_paused(&mut self, paused: bool, ctx: &mut ModeContext<Screen>) {
        if paused == self.paused {
            return;
        }
        if paused {
            self.pause.open(&mut self.graph);
            ctx.set_dispatch_policy(DispatchPolicy::Blocking);
        } else {
            self.pause.close(&mut self.graph);
            ctx.set_dispatch_policy(DispatchPolicy::Poll);
        }
        self.paused = paused;
    }

    fn handle_event_paused(&mut self, event: &InputEvent, ctx: &mut ModeContext<Screen>) {
        match self.pause.handle_event(event, &mut self.graph) {
            PauseAction::None => {}
            PauseAction::Resume => self.set_paused(false, ctx),
            PauseAction::MainMenu => ctx.request_mode(Screen::Intro),
        }
    }

    fn handle_event_playing(&mut self, event: &InputEvent, ctx: &mut ModeContext<Screen>) {
        match *event {
            InputEvent::KeyDown { key, .. } => match key {
                KeyCode::Escape => self.set_paused(true, ctx),
                KeyCode::ArrowLeft => {
                    let x = self.graph.get(self.nest).x;
                    self.move_nest_to(x - NEST_KEY_STEP);
                }
                KeyCode::ArrowRight => {
                    let x = self.graph.get(self.nest).x;
                    self.move_nest_to(x + NEST_KEY_STEP);
                }
                _ => {}
            },
            InputEvent::MouseMoved { x, .. } => self.center_nest_on(x as i32),
            _ => {}
        }
    }
}

//=== Assets ==============================================================

fn required(store: &AssetStore, key: &str) -> Result<Arc<Bitmap>, ModeError> {
    store
        .get(key)
        .cloned()
        .ok_or_else(|| ModeError::setup(format!("missing asset {}", key)))
}

/// Procedural sprites for the play field.
fn load_assets(width: i32) -> AssetStore {
    let mut store = AssetStore::new();

    // Chicken, facing left
    let mut chicken = Bitmap::new(100, 70);
    stamp(&mut chicken, &ellipse(70, 48, Color::WHITE), 24, 18);
    stamp(&mut chicken, &ellipse(34, 32, Color::WHITE), 6, 4);
    stamp(&mut chicken, &solid(8, 5, Color::rgb(255, 160, 0)), 0, 16);
    stamp(&mut chicken, &ellipse(14, 8, Color::rgb(220, 30, 30)), 14, 0);
    stamp(&mut chicken, &ellipse(5, 5, Color::BLACK), 14, 12);
    stamp(&mut chicken, &solid(4, 8, Color::rgb(255, 160, 0)), 50, 62);
    stamp(&mut chicken, &solid(4, 8, Color::rgb(255, 160, 0)), 66, 62);
    store.insert("chicken_left", chicken);
    store.insert_flipped_h("chicken_right", "chicken_left");

    store.insert("egg", ellipse(20, 26, Color::rgb(250, 240, 220)));

    let mut nest = Bitmap::new(120, 40);
    stamp(&mut nest, &ellipse(120, 40, Color::rgb(120, 80, 40)), 0, 0);
    stamp(&mut nest, &ellipse(90, 18, Color::rgb(80, 50, 20)), 15, 4);
    store.insert("nest", nest);

    store.insert("grass", solid(width, 30, Color::rgb(40, 140, 40)));

    store
}

//=== Mode ================================================================

impl Mode<Screen> for PlayMode {
    fn init(&mut self, ctx: &mut ModeContext<Screen>) -> Result<(), ModeError> {
        self.scene = Some(PlayScene::build(
            &self.fonts,
            self.seed,
            ctx.surface_width(),
            ctx.surface_height(),
        )?);
        Ok(())
    }

    fn render(&mut self, target: &mut dyn RenderTarget, ctx: &mut ModeContext<Screen>) {
        target.fill(BACKGROUND);
        if let Some(scene) = &mut self.scene {
            if !scene.paused {
                scene.step(ctx.frame_delay());
            }
            scene.graph.render(scene.root, target);
            if scene.paused {
                scene.pause.mark_rendered(&scene.graph);
            }
        }
    }

    fn handle_event(&mut self, event: &InputEvent, ctx: &mut ModeContext<Screen>) -> bool {
        if let Some(scene) = &mut self.scene {
            if scene.paused {
                scene.handle_event_paused(event, ctx);
            } else {
                scene.handle_event_playing(event, ctx);
            }
        }
        false
    }

    fn will_show(&mut self, ctx: &mut ModeContext<Screen>) {
        if let Some(scene) = &mut self.scene {
            scene.reset();
        }
        ctx.transition_complete();
    }

    fn did_show(&mut self, ctx: &mut ModeContext<Screen>) {
        info!(target: "game", "Round started");
        ctx.set_dispatch_policy(DispatchPolicy::Poll);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::MouseButton;
    use crate::core::mode::ModeCommand;
    use crate::core::render::FrameBuffer;
    use crate::game::{MENU_SPACING, MENU_Y};

    const FRAME: Duration = Duration::from_millis(16);

    fn setup() -> (PlayMode, ModeContext<Screen>) {
        let mut ctx = ModeContext::new(800, 600, FRAME);
        let mut mode = PlayMode::new(GameFonts::block(), Some(42));
        mode.init(&mut ctx).unwrap();
        (mode, ctx)
    }

    fn scene(mode: &mut PlayMode) -> &mut PlayScene {
        mode.scene.as_mut().unwrap()
    }

    fn nest_x(mode: &mut PlayMode) -> i32 {
        let scene = scene(mode);
        scene.graph.get(scene.nest).x
    }

    fn chicken_x(mode: &mut PlayMode) -> i32 {
        let scene = scene(mode);
        scene.graph.get(scene.chicken.entity()).x
    }

    fn pending(ctx: &mut ModeContext<Screen>) -> Vec<ModeCommand<Screen>> {
        let commands = ctx.pending().iter().copied().collect();
        ctx.commands_mut().clear();
        commands
    }

    #[test]
    fn builds_scene_from_description() {
        let (mut mode, _) = setup();
        let scene = scene(&mut mode);

        let nest = scene.graph.get(scene.nest);
        assert_eq!((nest.w, nest.h), (120, 40));
        assert_eq!(nest.x, 340);
        assert_eq!(nest.y, 520);

        let grass = scene.graph.search_by_id(scene.root, "grass").unwrap();
        assert_eq!(scene.graph.get(grass).y, 570);
        assert!(!scene.pause.is_open(&scene.graph));
    }

    #[test]
    fn will_show_completes_and_resets() {
        let (mut mode, mut ctx) = setup();
        scene(&mut mode).add_catches(12);
        assert_eq!(scene(&mut mode).level, 1);

        mode.will_show(&mut ctx);
        assert_eq!(pending(&mut ctx), vec![ModeCommand::TransitionComplete]);
        assert_eq!(scene(&mut mode).score, 0);
        assert_eq!(scene(&mut mode).level, 0);
    }

    #[test]
    fn did_show_requests_poll() {
        let (mut mode, mut ctx) = setup();
        mode.did_show(&mut ctx);
        assert_eq!(
            pending(&mut ctx),
            vec![ModeCommand::SetDispatch(DispatchPolicy::Poll)]
        );
    }

    #[test]
    fn mouse_steers_nest_within_field() {
        let (mut mode, mut ctx) = setup();
        mode.handle_event(&InputEvent::mouse_moved(200.0, 300.0), &mut ctx);
        assert_eq!(nest_x(&mut mode), 140);

        mode.handle_event(&InputEvent::mouse_moved(5.0, 300.0), &mut ctx);
        assert_eq!(nest_x(&mut mode), 0);

        mode.handle_event(&InputEvent::mouse_moved(799.0, 300.0), &mut ctx);
        assert_eq!(nest_x(&mut mode), 680);
    }

    #[test]
    fn arrow_keys_nudge_nest() {
        let (mut mode, mut ctx) = setup();
        mode.handle_event(&InputEvent::key_down(KeyCode::ArrowLeft), &mut ctx);
        assert_eq!(nest_x(&mut mode), 300);
        mode.handle_event(&InputEvent::key_down(KeyCode::ArrowRight), &mut ctx);
        mode.handle_event(&InputEvent::key_down(KeyCode::ArrowRight), &mut ctx);
        assert_eq!(nest_x(&mut mode), 380);
    }

    #[test]
    fn egg_over_nest_is_caught() {
        let (mut mode, _) = setup();
        let scene = scene(&mut mode);

        let egg = scene.eggs.launch(&mut scene.graph, 390);
        scene.graph.get_mut(egg).y = 500;
        scene.step(FRAME);

        assert!(!scene.graph.get(egg).visible);
        assert_eq!(scene.score, 1);
    }

    #[test]
    fn nest_swept_through_egg_catches_it() {
        let (mut mode, mut ctx) = setup();
        {
            let scene = scene(&mut mode);
            let egg = scene.eggs.launch(&mut scene.graph, 300);
            scene.graph.get_mut(egg).y = 510;
        }

        mode.handle_event(&InputEvent::mouse_moved(799.0, 0.0), &mut ctx);
        scene(&mut mode).step(FRAME);
        assert_eq!(scene(&mut mode).score, 0);

        // Nest sweeps across the egg and back within one frame
        mode.handle_event(&InputEvent::mouse_moved(0.0, 0.0), &mut ctx);
        mode.handle_event(&InputEvent::mouse_moved(799.0, 0.0), &mut ctx);
        scene(&mut mode).step(FRAME);

        assert_eq!(nest_x(&mut mode), 680);
        assert_eq!(scene(&mut mode).score, 1);
    }

    #[test]
    fn level_rises_every_ten_catches() {
        let (mut mode, _) = setup();
        let scene = scene(&mut mode);
        scene.add_catches(9);
        assert_eq!(scene.level, 0);
        scene.add_catches(1);
        assert_eq!(scene.level, 1);
        assert_eq!(scene.eggs.launch_delay(), EggPool::launch_delay_for(1));
        scene.add_catches(10);
        assert_eq!(scene.level, 2);
    }

    #[test]
    fn score_label_tracks_score() {
        let (mut mode, _) = setup();
        let scene = scene(&mut mode);
        let before = scene.graph.get(scene.score_label).w;
        scene.add_catches(100);
        let label = scene.graph.get(scene.score_label);
        assert!(label.w > before);
        assert_eq!(label.x + label.w, 800 - SCORE_MARGIN);
    }

    #[test]
    fn escape_pauses_and_freezes_play() {
        let (mut mode, mut ctx) = setup();
        mode.handle_event(&InputEvent::key_down(KeyCode::Escape), &mut ctx);
        assert!(scene(&mut mode).paused);
        assert_eq!(
            pending(&mut ctx),
            vec![ModeCommand::SetDispatch(DispatchPolicy::Blocking)]
        );

        // Gameplay input is bypassed while paused
        let nest_before = nest_x(&mut mode);
        mode.handle_event(&InputEvent::mouse_moved(10.0, 10.0), &mut ctx);
        assert_eq!(nest_x(&mut mode), nest_before);

        let before = chicken_x(&mut mode);
        let mut fb = FrameBuffer::new(800, 600);
        mode.render(&mut fb, &mut ctx);
        assert_eq!(chicken_x(&mut mode), before);
    }

    #[test]
    fn escape_while_paused_resumes() {
        let (mut mode, mut ctx) = setup();
        mode.handle_event(&InputEvent::key_down(KeyCode::Escape), &mut ctx);
        mode.handle_event(&InputEvent::key_down(KeyCode::Escape), &mut ctx);

        assert!(!scene(&mut mode).paused);
        assert_eq!(
            pending(&mut ctx),
            vec![
                ModeCommand::SetDispatch(DispatchPolicy::Blocking),
                ModeCommand::SetDispatch(DispatchPolicy::Poll),
            ]
        );
    }

    #[test]
    fn main_menu_requests_intro() {
        let (mut mode, mut ctx) = setup();
        mode.handle_event(&InputEvent::key_down(KeyCode::Escape), &mut ctx);
        mode.handle_event(&InputEvent::key_down(KeyCode::ArrowDown), &mut ctx);
        pending(&mut ctx);

        assert!(!mode.handle_event(&InputEvent::key_down(KeyCode::Enter), &mut ctx));
        assert_eq!(pending(&mut ctx), vec![ModeCommand::SetMode(Screen::Intro)]);

        // Coming back starts an unpaused round
        mode.will_show(&mut ctx);
        let scene = scene(&mut mode);
        assert!(!scene.paused);
        assert!(!scene.pause.is_open(&scene.graph));
    }

    #[test]
    fn pause_menu_ignores_right_click() {
        let (mut mode, mut ctx) = setup();
        mode.handle_event(&InputEvent::key_down(KeyCode::Escape), &mut ctx);
        mode.render(&mut FrameBuffer::new(800, 600), &mut ctx);
        pending(&mut ctx);

        let event = InputEvent::mouse_down(MouseButton::Right, 400.0, 205.0);
        mode.handle_event(&event, &mut ctx);
        assert!(pending(&mut ctx).is_empty());
        assert!(scene(&mut mode).paused);
    }

    #[test]
    fn click_in_pausing_batch_is_ignored() {
        let (mut mode, mut ctx) = setup();
        mode.handle_event(&InputEvent::key_down(KeyCode::Escape), &mut ctx);
        pending(&mut ctx);

        // Far above the menu; before the first paused render the menu
        // root still sits at the origin
        let click = InputEvent::mouse_down(MouseButton::Left, 400.0, 65.0);
        mode.handle_event(&click, &mut ctx);
        assert!(pending(&mut ctx).is_empty());
        assert!(scene(&mut mode).paused);
    }

    #[test]
    fn click_after_paused_render_hits_menu() {
        let (mut mode, mut ctx) = setup();
        mode.handle_event(&InputEvent::key_down(KeyCode::Escape), &mut ctx);
        mode.render(&mut FrameBuffer::new(800, 600), &mut ctx);
        pending(&mut ctx);

        let miss = InputEvent::mouse_down(MouseButton::Left, 400.0, 65.0);
        mode.handle_event(&miss, &mut ctx);
        assert!(pending(&mut ctx).is_empty());

        let y = (MENU_Y + MENU_SPACING + 5) as f32;
        mode.handle_event(&InputEvent::mouse_down(MouseButton::Left, 400.0, y), &mut ctx);
        assert_eq!(pending(&mut ctx), vec![ModeCommand::SetMode(Screen::Intro)]);
    }

    #[test]
    fn same_seed_same_game() {
        let (mut a, mut ctx_a) = setup();
        let (mut b, mut ctx_b) = setup();
        let mut fb = FrameBuffer::new(800, 600);

        for _ in 0..200 {
            a.render(&mut fb, &mut ctx_a);
            b.render(&mut fb, &mut ctx_b);
        }

        assert_eq!(chicken_x(&mut a), chicken_x(&mut b));
        assert_eq!(scene(&mut a).eggs.capacity(), scene(&mut b).eggs.capacity());
    }

    #[test]
    fn render_paints_background_and_nest() {
        let (mut mode, mut ctx) = setup();
        let mut fb = FrameBuffer::new(800, 600);
        mode.render(&mut fb, &mut ctx);

        assert_eq!(fb.pixel(400, 300), Some(BACKGROUND));
        assert_eq!(fb.pixel(400, 555), Some(Color::rgb(120, 80, 40)));
    }
}
