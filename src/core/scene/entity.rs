//=========================================================================
// Entity
//=========================================================================
//
// A single scene-graph node: local transform, computed world transform,
// optional drawable, children handles and visibility.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::ops::Neg;
use std::sync::Arc;

//=== Internal Dependencies ===============================================

use crate::core::render::Bitmap;

//=== EntityId ============================================================

/// Stable handle to an entity inside its owning [`super::SceneGraph`].
///
/// Handles are only meaningful for the graph that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) usize);

impl EntityId {
    /// Arena slot index.
    pub fn index(self) -> usize {
        self.0
    }
}

//=== Offset ==============================================================

/// Translation-only transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Applies the offset to a point.
    pub fn apply(self, x: i32, y: i32) -> (i32, i32) {
        (x + self.x, y + self.y)
    }
}

impl Neg for Offset {
    type Output = Offset;

    fn neg(self) -> Offset {
        Offset { x: -self.x, y: -self.y }
    }
}

//=== Entity ==============================================================

/// Scene-graph node.
///
/// `entity_to_world` and `world_to_entity` are written by the render
/// pass and are only valid for nodes visited by the most recent pass.
#[derive(Debug, Clone)]
pub struct Entity {
    //--- Local Transform --------------------------------------------------
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,

    //--- Flags ------------------------------------------------------------
    pub visible: bool,
    pub id: Option<String>,

    //--- Computed Transform -----------------------------------------------
    pub(crate) entity_to_world: Offset,
    pub(crate) world_to_entity: Offset,

    //--- Structure --------------------------------------------------------
    pub(crate) drawable: Option<Arc<Bitmap>>,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
}

impl Entity {
    pub(crate) fn new(drawable: Option<Arc<Bitmap>>) -> Self {
        const INITIAL_CHILDREN_CAPACITY: usize = 5;

        let (w, h) = drawable
            .as_ref()
            .map_or((0, 0), |bmp| (bmp.width(), bmp.height()));

        Self {
            x: 0,
            y: 0,
            w,
            h,
            visible: true,
            id: None,
            entity_to_world: Offset::ZERO,
            world_to_entity: Offset::ZERO,
            drawable,
            parent: None,
            children: Vec::with_capacity(INITIAL_CHILDREN_CAPACITY),
        }
    }

    /// Absolute surface offset computed by the last render pass.
    pub fn entity_to_world(&self) -> Offset {
        self.entity_to_world
    }

    /// Inverse of [`Entity::entity_to_world`]: converts a world point into
    /// this entity's local frame.
    pub fn world_to_entity(&self) -> Offset {
        self.world_to_entity
    }

    pub fn drawable(&self) -> Option<&Arc<Bitmap>> {
        self.drawable.as_ref()
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    pub fn move_to(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }
}
