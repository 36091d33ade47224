//=========================================================================
// Eggs
//=========================================================================
//
// Pool of egg entities under one container. A hidden egg is free and is
// reused before a new one is spawned.
//
// Each moving egg keeps a swept box covering where it was and where it is
// now, so a fast egg cannot jump over the nest between two frames.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;
use std::time::Duration;

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::aabb::Aabb;
use crate::core::render::Bitmap;
use crate::core::scene::{EntityId, SceneGraph};

//=== Constants ===========================================================

pub const START_Y: i32 = 50;
pub const SPLAT_Y: i32 = 570;

const SPEED0: i32 = 250; // px per second
const SPEED_PER_LEVEL: i32 = 100;

const LAUNCH_DELAY0_MS: f64 = 500.0;
const LAUNCH_DELAY_FACTOR: f64 = 0.85; // per level

//=== Egg =================================================================

#[derive(Debug, Clone, Copy)]
struct Egg {
    entity: EntityId,
    sweep: Aabb,
}

//=== StepOutcome =========================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub launched: bool,
    pub splatted: u32,
}

//=== EggPool =============================================================

pub struct EggPool {
    container: EntityId,
    drawable: Arc<Bitmap>,
    eggs: Vec<Egg>,
    since_launch: Duration,
    launch_delay: Duration,
}

impl EggPool {
    pub fn new(container: EntityId, drawable: Arc<Bitmap>) -> Self {
        Self {
            container,
            drawable,
            eggs: Vec::new(),
            since_launch: Duration::ZERO,
            launch_delay: Self::launch_delay_for(0),
        }
    }

    /// Launch interval for `level`.
    pub fn launch_delay_for(level: i32) -> Duration {
        let ms = LAUNCH_DELAY0_MS * LAUNCH_DELAY_FACTOR.powi(level);
        Duration::from_millis(ms.round() as u64)
    }

    pub fn set_level(&mut self, level: i32) {
        self.launch_delay = Self::launch_delay_for(level);
    }

    pub fn launch_delay(&self) -> Duration {
        self.launch_delay
    }

    /// Total eggs ever spawned, free or not.
    pub fn capacity(&self) -> usize {
        self.eggs.len()
    }

    pub fn active(&self, graph: &SceneGraph) -> usize {
        self.eggs.iter().filter(|e| graph.get(e.entity).visible).count()
    }

    /// Hides every egg and restarts the launch timer.
    pub fn reset(&mut self, graph: &mut SceneGraph) {
        for egg in &self.eggs {
            graph.set_visible(egg.entity, false);
        }
        self.since_launch = Duration::ZERO;
    }

    /// Puts a free egg (spawning one if none is free) at `(x, START_Y)`.
    pub fn launch(&mut self, graph: &mut SceneGraph, x: i32) -> EntityId {
        let slot = match self.eggs.iter().position(|e| !graph.get(e.entity).visible) {
            Some(slot) => slot,
            None => {
                let entity = graph.spawn(Some(self.drawable.clone()));
                graph.add_child(self.container, entity);
                self.eggs.push(Egg {
                    entity,
                    sweep: Aabb::default(),
                });
                trace!(target: "game", "Egg pool grew to {}", self.eggs.len());
                self.eggs.len() - 1
            }
        };

        let egg = &mut self.eggs[slot];
        let node = graph.get_mut(egg.entity);
        node.move_to(x, START_Y);
        node.visible = true;
        egg.sweep = Aabb::from_rect(node.x, node.y, node.w, node.h);
        egg.entity
    }

    /// Runs the launch timer and drops every active egg by one step.
    pub fn step(&mut self, graph: &mut SceneGraph, dt: Duration, level: i32, launch_x: i32) -> StepOutcome {
        let mut outcome = StepOutcome::default();

        self.since_launch += dt;
        let launched = if self.since_launch > self.launch_delay {
            self.since_launch = Duration::ZERO;
            Some(self.launch(graph, launch_x))
        } else {
            None
        };
        outcome.launched = launched.is_some();

        let speed = SPEED0 + level * SPEED_PER_LEVEL;
        let dy = speed * dt.as_millis() as i32 / 1000;

        for egg in &mut self.eggs {
            if Some(egg.entity) == launched {
                continue;
            }
            let node = graph.get_mut(egg.entity);
            if !node.visible {
                continue;
            }

            let before = Aabb::from_rect(node.x, node.y, node.w, node.h);
            node.move_to(node.x, node.y + dy);
            egg.sweep = before.union(&Aabb::from_rect(node.x, node.y, node.w, node.h));

            if node.y > SPLAT_Y {
                node.visible = false;
                outcome.splatted += 1;
            }
        }

        outcome
    }

    /// Hides every active egg whose swept box overlaps `catcher` and
    /// returns how many were caught.
    pub fn catch(&self, graph: &mut SceneGraph, catcher: &Aabb) -> u32 {
        let mut caught = 0;
        for egg in &self.eggs {
            if graph.get(egg.entity).visible && egg.sweep.overlaps(catcher) {
                graph.set_visible(egg.entity, false);
                caught += 1;
            }
        }
        caught
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::Color;

    const FRAME: Duration = Duration::from_millis(100);

    fn setup() -> (SceneGraph, EggPool) {
        let mut graph = SceneGraph::new();
        let container = graph.spawn_container(800, 600);
        let pool = EggPool::new(container, Arc::new(Bitmap::filled(20, 26, Color::WHITE)));
        (graph, pool)
    }

    #[test]
    fn launch_delay_shrinks_per_level() {
        assert_eq!(EggPool::launch_delay_for(0), Duration::from_millis(500));
        assert_eq!(EggPool::launch_delay_for(1), Duration::from_millis(425));
        assert!(EggPool::launch_delay_for(5) < EggPool::launch_delay_for(4));
    }

    #[test]
    fn hidden_eggs_are_reused() {
        let (mut graph, mut pool) = setup();
        let first = pool.launch(&mut graph, 10);
        let second = pool.launch(&mut graph, 20);
        assert_ne!(first, second);
        assert_eq!(pool.capacity(), 2);

        graph.set_visible(first, false);
        let third = pool.launch(&mut graph, 30);
        assert_eq!(third, first);
        assert_eq!(pool.capacity(), 2);
        assert_eq!(graph.get(third).x, 30);
        assert_eq!(graph.get(third).y, START_Y);
    }

    #[test]
    fn eggs_are_children_of_container() {
        let (mut graph, mut pool) = setup();
        let egg = pool.launch(&mut graph, 0);
        assert_eq!(graph.get(egg).parent(), Some(pool.container));
    }

    #[test]
    fn launches_after_delay() {
        let (mut graph, mut pool) = setup();
        for _ in 0..5 {
            assert!(!pool.step(&mut graph, FRAME, 0, 100).launched);
        }
        // 600ms > 500ms
        assert!(pool.step(&mut graph, FRAME, 0, 100).launched);
        assert_eq!(pool.active(&graph), 1);
    }

    #[test]
    fn eggs_fall_with_level_speed_and_splat() {
        let (mut graph, mut pool) = setup();
        let egg = pool.launch(&mut graph, 0);

        pool.step(&mut graph, FRAME, 1, 0);
        assert_eq!(graph.get(egg).y, START_Y + 35);

        graph.get_mut(egg).y = SPLAT_Y - 10;
        let outcome = pool.step(&mut graph, FRAME, 0, 0);
        assert_eq!(outcome.splatted, 1);
        assert!(!graph.get(egg).visible);
    }

    #[test]
    fn sweep_covers_both_positions() {
        let (mut graph, mut pool) = setup();
        let egg = pool.launch(&mut graph, 100);
        pool.step(&mut graph, FRAME, 0, 0);

        let sweep = pool.eggs[0].sweep;
        assert_eq!(graph.get(egg).y, START_Y + 25);
        assert_eq!(sweep, Aabb::new(100, START_Y, 120, START_Y + 25 + 26));
    }

    #[test]
    fn fast_egg_is_caught_by_sweep() {
        let (mut graph, mut pool) = setup();
        let egg = pool.launch(&mut graph, 100);
        graph.get_mut(egg).y = 400;

        // One long frame moves the egg from 400 to 525, past a thin catcher
        pool.step(&mut graph, Duration::from_millis(500), 0, 0);
        let catcher = Aabb::from_rect(90, 450, 60, 5);
        assert!(!Aabb::from_rect(100, 525, 20, 26).overlaps(&catcher));

        assert_eq!(pool.catch(&mut graph, &catcher), 1);
        assert!(!graph.get(egg).visible);
    }

    #[test]
    fn hidden_eggs_are_not_caught() {
        let (mut graph, mut pool) = setup();
        let egg = pool.launch(&mut graph, 100);
        graph.set_visible(egg, false);
        assert_eq!(pool.catch(&mut graph, &Aabb::new(0, 0, 800, 600)), 0);
    }

    #[test]
    fn reset_hides_all() {
        let (mut graph, mut pool) = setup();
        pool.launch(&mut graph, 0);
        pool.launch(&mut graph, 50);
        pool.reset(&mut graph);
        assert_eq!(pool.active(&graph), 0);
        assert_eq!(pool.capacity(), 2);
    }
}
