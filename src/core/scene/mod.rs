//=========================================================================
// Scene Graph
//=========================================================================
//
// Retained hierarchical scene: translation-only transform composition,
// painter's-algorithm rendering and visibility pruning.
//
// Architecture:
//   SceneGraph                      (one per mode)
//     └─ nodes: Vec<Entity>
//          ├─ local x/y/w/h
//          ├─ entity_to_world / world_to_entity (written by render)
//          └─ children: Vec<EntityId> (paint order)
//
// Flow:
//   Mode::render() → SceneGraph::render(root, target) → RenderTarget::blit()
//
//=========================================================================

//=== Module Declarations =================================================

mod entity;
mod graph;
pub mod layout;

//=== Public API ==========================================================

pub use entity::{Entity, EntityId, Offset};
pub use graph::SceneGraph;
