//=========================================================================
// Layout Helpers
//=========================================================================
//
// Pure positioning helpers. Horizontal helpers write `x` only; vertical
// helpers write `y` only. None of them touch the computed world
// transform, which is refreshed by the next render pass.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{EntityId, SceneGraph};
use crate::core::render::RenderTarget;

//=== Horizontal Centering ================================================

/// `x = (width - w) / 2`
pub fn center_in_width(graph: &mut SceneGraph, id: EntityId, width: i32) {
    let node = graph.get_mut(id);
    node.x = (width - node.w) / 2;
}

/// Centers `id` within the extent of `parent`.
pub fn center_in_parent(graph: &mut SceneGraph, id: EntityId, parent: EntityId) {
    let width = graph.get(parent).w;
    center_in_width(graph, id, width);
}

pub fn center_in_surface(graph: &mut SceneGraph, id: EntityId, surface: &dyn RenderTarget) {
    center_in_width(graph, id, surface.width());
}

//=== Right Justification =================================================

/// `x = width - w`
pub fn right_justify_in_width(graph: &mut SceneGraph, id: EntityId, width: i32) {
    let node = graph.get_mut(id);
    node.x = width - node.w;
}

pub fn right_justify_in_parent(graph: &mut SceneGraph, id: EntityId, parent: EntityId) {
    let width = graph.get(parent).w;
    right_justify_in_width(graph, id, width);
}

pub fn right_justify_in_surface(graph: &mut SceneGraph, id: EntityId, surface: &dyn RenderTarget) {
    right_justify_in_width(graph, id, surface.width());
}

//=== Vertical ============================================================

/// `y = (height - h) / 2`
pub fn center_vertically_in_height(graph: &mut SceneGraph, id: EntityId, height: i32) {
    let node = graph.get_mut(id);
    node.y = (height - node.h) / 2;
}

/// `y = height - h`
pub fn bottom_justify_in_height(graph: &mut SceneGraph, id: EntityId, height: i32) {
    let node = graph.get_mut(id);
    node.y = height - node.h;
}

//=========================================================================
// Unit Tests
//=========================================================================
