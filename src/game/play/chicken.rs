//=========================================================================
// Chicken
//=========================================================================
//
// Walks back and forth along the top of the playfield, turning at the
// edges and now and then at random. Eggs are laid from its side.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;

//=== Internal Dependencies ===============================================

use crate::core::render::Bitmap;
use crate::core::scene::{layout, EntityId, SceneGraph};

//=== Constants ===========================================================

const SPEED0: i32 = 200; // px per second
const SPEED_PER_LEVEL: i32 = 50;

/// Chance per step of turning around mid-walk.
const TURN_CHANCE: f64 = 0.01;

/// Horizontal offset of the laying point from the chicken's back edge.
pub const LAUNCH_X_OFFSET: i32 = 80;

//=== Facing ==============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    fn sign(self) -> i32 {
        match self {
            Facing::Left => -1,
            Facing::Right => 1,
        }
    }

    fn reversed(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

//=== Chicken =============================================================

pub struct Chicken {
    entity: EntityId,
    facing: Facing,
    left: Arc<Bitmap>,
    right: Arc<Bitmap>,
}

impl Chicken {
    pub fn new(entity: EntityId, left: Arc<Bitmap>, right: Arc<Bitmap>) -> Self {
        Self {
            entity,
            facing: Facing::Right,
            left,
            right,
        }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Centers the chicken facing right.
    pub fn reset(&mut self, graph: &mut SceneGraph, field_width: i32) {
        self.face(graph, Facing::Right);
        layout::center_in_width(graph, self.entity, field_width);
    }

    /// Advances one simulation step of `dt`.
    pub fn step(
        &mut self,
        graph: &mut SceneGraph,
        rng: &mut StdRng,
        dt: Duration,
        level: i32,
        field_width: i32,
    ) {
        let speed = SPEED0 + level * SPEED_PER_LEVEL;
        let dx = speed * dt.as_millis() as i32 / 1000 * self.facing.sign();

        let node = graph.get_mut(self.entity);
        let max_x = (field_width - node.w).max(0);
        node.x += dx;

        if node.x <= 0 {
            node.x = 0;
            self.face(graph, Facing::Right);
        } else if node.x >= max_x {
            node.x = max_x;
            self.face(graph, Facing::Left);
        } else if rng.gen_bool(TURN_CHANCE) {
            self.face(graph, self.facing.reversed());
        }
    }

    /// World x at which a new egg appears.
    pub fn launch_x(&self, graph: &SceneGraph) -> i32 {
        let node = graph.get(self.entity);
        match self.facing {
            Facing::Right => node.x + LAUNCH_X_OFFSET,
            Facing::Left => node.x + node.w - LAUNCH_X_OFFSET,
        }
    }

    fn face(&mut self, graph: &mut SceneGraph, facing: Facing) {
        self.facing = facing;
        let drawable = match facing {
            Facing::Left => self.left.clone(),
            Facing::Right => self.right.clone(),
        };
        graph.set_drawable(self.entity, Some(drawable));
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
