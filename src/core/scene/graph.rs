//=========================================================================
// Scene Graph
//=========================================================================
//
// Arena of entities addressed by `EntityId`.
//
// Architecture:
//   SceneGraph
//     └─ nodes: Vec<Entity>   (parent/children stored as handles)
//
// Render pass:
//   render(root) → render_recursive(node, t) → blit → children (in order)
//
// The arena only grows. Entities live as long as the graph, which lives as
// long as the mode that owns it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use log::trace;

//=== Internal Dependencies ===============================================

use super::entity::{Entity, EntityId, Offset};
use crate::core::render::{Bitmap, RenderTarget};

//=== SceneGraph ==========================================================

/// Owns every entity of one scene and performs the paint traversal.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Entity>,
}

impl SceneGraph {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Creates a detached entity.
    ///
    /// With a drawable, `w`/`h` are initialised from its intrinsic size.
    /// Without one the entity is a pure container and starts at `0`×`0`.
    pub fn spawn(&mut self, drawable: Option<Arc<Bitmap>>) -> EntityId {
        let id = EntityId(self.nodes.len());
        self.nodes.push(Entity::new(drawable));
        id
    }

    /// Creates a container entity with an explicit extent.
    pub fn spawn_container(&mut self, w: i32, h: i32) -> EntityId {
        let id = self.spawn(None);
        let node = self.get_mut(id);
        node.w = w;
        node.h = h;
        id
    }

    //--- Structure --------------------------------------------------------

    /// Appends `child` to `parent`'s children.
    ///
    /// # Panics
    ///
    /// Panics if `child` already has a parent, or if the insertion would
    /// create a cycle.
    pub fn add_child(&mut self, parent: EntityId, child: EntityId) {
        assert!(
            self.get(child).parent.is_none(),
            "Entity {:?} already has a parent",
            child
        );
        assert!(
            !self.is_ancestor_or_self(child, parent),
            "Adding {:?} under {:?} would create a cycle",
            child,
            parent
        );

        self.get_mut(child).parent = Some(parent);
        self.get_mut(parent).children.push(child);
    }

    /// Appends several children, preserving their order.
    pub fn add_children(&mut self, parent: EntityId, children: &[EntityId]) {
        for &child in children {
            self.add_child(parent, child);
        }
    }

    /// Returns the `index`-th child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` has no child at `index`.
    pub fn child(&self, parent: EntityId, index: usize) -> EntityId {
        let children = &self.get(parent).children;
        assert!(
            index < children.len(),
            "Entity {:?} has {} children, index {} is out of range",
            parent,
            children.len(),
            index
        );
        children[index]
    }

    //--- Access -----------------------------------------------------------

    /// # Panics
    ///
    /// Panics if `id` was not produced by this graph.
    pub fn get(&self, id: EntityId) -> &Entity {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: EntityId) -> &mut Entity {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Rebinds the drawable of `id`.
    ///
    /// When a drawable is given the entity is resized to it; removing the
    /// drawable keeps the current extent.
    pub fn set_drawable(&mut self, id: EntityId, drawable: Option<Arc<Bitmap>>) {
        let node = self.get_mut(id);
        if let Some(bmp) = &drawable {
            node.w = bmp.width();
            node.h = bmp.height();
        }
        node.drawable = drawable;
    }

    pub fn set_visible(&mut self, id: EntityId, visible: bool) {
        self.get_mut(id).visible = visible;
    }

    //--- Rendering --------------------------------------------------------

    /// Paints the subtree rooted at `root` onto `target`.
    ///
    /// Pre-order traversal starting from the identity offset: parents are
    /// painted before children, children in insertion order. Invisible
    /// subtrees are skipped entirely and keep their previous world
    /// transforms.
    pub fn render(&mut self, root: EntityId, target: &mut dyn RenderTarget) {
        trace!(
            target: "scene",
            "Render pass from {:?} onto {}x{}",
            root,
            target.width(),
            target.height()
        );
        self.render_recursive(root, target, Offset::ZERO);
    }

    fn render_recursive(&mut self, id: EntityId, target: &mut dyn RenderTarget, t: Offset) {
        let node = &mut self.nodes[id.0];

        if !node.visible {
            return;
        }

        let world = Offset::new(node.x + t.x, node.y + t.y);
        node.entity_to_world = world;
        node.world_to_entity = -world;

        if let Some(bmp) = &node.drawable {
            assert_eq!(
                (node.w, node.h),
                (bmp.width(), bmp.height()),
                "Entity {:?} extent does not match its drawable",
                id
            );
            target.blit(bmp, world.x, world.y);
        }

        for i in 0..self.nodes[id.0].children.len() {
            let child = self.nodes[id.0].children[i];
            self.render_recursive(child, target, world);
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Depth-first search for the first entity whose id equals `id`.
    ///
    /// Visits invisible nodes too. O(n); prefer the id map produced by the
    /// scene loader on hot paths.
    pub fn search_by_id(&self, root: EntityId, id: &str) -> Option<EntityId> {
        let node = self.get(root);
        if node.id.as_deref() == Some(id) {
            return Some(root);
        }
        node.children
            .iter()
            .find_map(|&child| self.search_by_id(child, id))
    }

    /// Front-most visible drawable entity under the world point `(x, y)`.
    ///
    /// Uses the transforms of the most recent render pass.
    pub fn hit_test(&self, root: EntityId, x: i32, y: i32) -> Option<EntityId> {
        let node = self.get(root);
        if !node.visible {
            return None;
        }

        // Later children paint over earlier ones, so test them first
        if let Some(hit) = node
            .children
            .iter()
            .rev()
            .find_map(|&child| self.hit_test(child, x, y))
        {
            return Some(hit);
        }

        let (lx, ly) = node.world_to_entity.apply(x, y);
        let inside = lx >= 0 && lx < node.w && ly >= 0 && ly < node.h;

        (node.drawable.is_some() && inside).then_some(root)
    }

    fn is_ancestor_or_self(&self, candidate: EntityId, mut node: EntityId) -> bool {
        loop {
            if node == candidate {
                return true;
            }
            match self.get(node).parent {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::Color;

    //--- Test Helpers -----------------------------------------------------

    /// Records every blit as `(bitmap width, x, y)`.
    struct RecordingTarget {
        blits: Vec<(i32, i32, i32)>,
    }

    impl RecordingTarget {
        fn new() -> Self {
            Self { blits: Vec::new() }
        }
    }

    impl RenderTarget for RecordingTarget {
        fn width(&self) -> i32 {
            800
        }
        fn height(&self) -> i32 {
            600
        }
        fn fill(&mut self, _color: Color) {}
        fn blit(&mut self, bitmap: &Bitmap, x: i32, y: i32) {
            self.blits.push((bitmap.width(), x, y));
        }
    }

    fn bitmap(w: i32, h: i32) -> Option<Arc<Bitmap>> {
        Some(Arc::new(Bitmap::filled(w, h, Color::WHITE)))
    }

    /// root(10,20) → mid(5,5) → leaf(1,2)
    fn chain() -> (SceneGraph, EntityId, EntityId, EntityId) {
        let mut graph = SceneGraph::new();
        let root = graph.spawn(bitmap(100, 100));
        let mid = graph.spawn(None);
        let leaf = graph.spawn(bitmap(3, 3));
        graph.get_mut(root).move_to(10, 20);
        graph.get_mut(mid).move_to(5, 5);
        graph.get_mut(leaf).move_to(1, 2);
        graph.add_child(root, mid);
        graph.add_child(mid, leaf);
        (graph, root, mid, leaf)
    }

    //--- Construction -----------------------------------------------------

    #[test]
    fn spawn_takes_size_from_drawable() {
        let mut graph = SceneGraph::new();
        let id = graph.spawn(bitmap(12, 7));
        assert_eq!((graph.get(id).w, graph.get(id).h), (12, 7));
        assert!(graph.get(id).visible);
    }

    #[test]
    fn container_has_explicit_size() {
        let mut graph = SceneGraph::new();
        let id = graph.spawn_container(800, 600);
        assert_eq!((graph.get(id).w, graph.get(id).h), (800, 600));
        assert!(graph.get(id).drawable().is_none());
    }

    #[test]
    fn add_children_preserves_order() {
        let mut graph = SceneGraph::new();
        let root = graph.spawn(None);
        let a = graph.spawn(None);
        let b = graph.spawn(None);
        let c = graph.spawn(None);
        graph.add_children(root, &[a, b]);
        graph.add_child(root, c);

        assert_eq!(graph.get(root).children(), &[a, b, c]);
        assert_eq!(graph.child(root, 1), b);
        assert_eq!(graph.get(c).parent(), Some(root));
    }

    #[test]
    #[should_panic(expected = "already has a parent")]
    fn reparenting_panics() {
        let mut graph = SceneGraph::new();
        let a = graph.spawn(None);
        let b = graph.spawn(None);
        let child = graph.spawn(None);
        graph.add_child(a, child);
        graph.add_child(b, child);
    }

    #[test]
    #[should_panic(expected = "would create a cycle")]
    fn cycle_panics() {
        let (mut graph, root, _mid, leaf) = chain();
        graph.add_child(leaf, root);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn missing_child_index_panics() {
        let (graph, root, _, _) = chain();
        graph.child(root, 3);
    }

    //--- Transform Composition --------------------------------------------

    #[test]
    fn world_transform_is_sum_of_ancestors() {
        let (mut graph, root, mid, leaf) = chain();
        let mut target = RecordingTarget::new();
        graph.render(root, &mut target);

        assert_eq!(graph.get(root).entity_to_world(), Offset::new(10, 20));
        assert_eq!(graph.get(mid).entity_to_world(), Offset::new(15, 25));
        assert_eq!(graph.get(leaf).entity_to_world(), Offset::new(16, 27));
        assert_eq!(graph.get(leaf).world_to_entity(), Offset::new(-16, -27));
    }

    #[test]
    fn invisible_ancestor_keeps_stale_transform() {
        let (mut graph, root, mid, leaf) = chain();
        let mut target = RecordingTarget::new();
        graph.render(root, &mut target);

        graph.get_mut(leaf).move_to(50, 50);
        graph.set_visible(mid, false);
        graph.render(root, &mut target);

        assert_eq!(graph.get(leaf).entity_to_world(), Offset::new(16, 27));
    }

    #[test]
    fn transform_not_updated_until_render() {
        let (mut graph, root, _mid, leaf) = chain();
        let mut target = RecordingTarget::new();
        graph.render(root, &mut target);

        graph.get_mut(root).move_to(0, 0);
        assert_eq!(graph.get(leaf).entity_to_world(), Offset::new(16, 27));

        graph.render(root, &mut target);
        assert_eq!(graph.get(leaf).entity_to_world(), Offset::new(6, 7));
    }

    //--- Painting ---------------------------------------------------------

    #[test]
    fn paints_parent_before_children_in_order() {
        let mut graph = SceneGraph::new();
        let root = graph.spawn(bitmap(1, 1));
        let a = graph.spawn(bitmap(2, 1));
        let b = graph.spawn(bitmap(3, 1));
        graph.add_children(root, &[a, b]);

        let mut target = RecordingTarget::new();
        graph.render(root, &mut target);

        let widths: Vec<i32> = target.blits.iter().map(|b| b.0).collect();
        assert_eq!(widths, vec![1, 2, 3]);
    }

    #[test]
    fn containers_do_not_paint() {
        let (mut graph, root, _, _) = chain();
        let mut target = RecordingTarget::new();
        graph.render(root, &mut target);

        assert_eq!(target.blits, vec![(100, 10, 20), (3, 16, 27)]);
    }

    #[test]
    fn invisible_subtree_is_not_painted() {
        let (mut graph, root, mid, _) = chain();
        graph.set_visible(mid, false);

        let mut target = RecordingTarget::new();
        graph.render(root, &mut target);

        assert_eq!(target.blits, vec![(100, 10, 20)]);
    }

    #[test]
    fn invisible_root_paints_nothing() {
        let (mut graph, root, _, _) = chain();
        graph.set_visible(root, false);

        let mut target = RecordingTarget::new();
        graph.render(root, &mut target);

        assert!(target.blits.is_empty());
    }

    #[test]
    fn set_drawable_resizes_entity() {
        let mut graph = SceneGraph::new();
        let id = graph.spawn(bitmap(5, 5));
        graph.set_drawable(id, bitmap(20, 8));
        assert_eq!((graph.get(id).w, graph.get(id).h), (20, 8));

        graph.set_drawable(id, None);
        assert_eq!((graph.get(id).w, graph.get(id).h), (20, 8));
        assert!(graph.get(id).drawable().is_none());
    }

    #[test]
    #[should_panic(expected = "extent does not match its drawable")]
    fn render_rejects_resized_drawable() {
        let mut graph = SceneGraph::new();
        let id = graph.spawn(bitmap(10, 10));
        graph.get_mut(id).w = 500;
        graph.get_mut(id).h = 3;

        graph.render(id, &mut RecordingTarget::new());
    }

    //--- Queries ----------------------------------------------------------

    #[test]
    fn search_by_id_finds_first_match_depth_first() {
        let (mut graph, root, mid, leaf) = chain();
        let other = graph.spawn(None);
        graph.add_child(root, other);
        graph.get_mut(leaf).id = Some("target".into());
        graph.get_mut(other).id = Some("target".into());
        graph.set_visible(mid, false);

        assert_eq!(graph.search_by_id(root, "target"), Some(leaf));
        assert_eq!(graph.search_by_id(root, "missing"), None);
    }

    #[test]
    fn hit_test_prefers_front_most() {
        let mut graph = SceneGraph::new();
        let root = graph.spawn_container(100, 100);
        let back = graph.spawn(bitmap(50, 50));
        let front = graph.spawn(bitmap(10, 10));
        graph.get_mut(front).move_to(20, 20);
        graph.add_children(root, &[back, front]);

        let mut target = RecordingTarget::new();
        graph.render(root, &mut target);

        assert_eq!(graph.hit_test(root, 25, 25), Some(front));
        assert_eq!(graph.hit_test(root, 5, 5), Some(back));
        assert_eq!(graph.hit_test(root, 70, 70), None);

        graph.set_visible(front, false);
        assert_eq!(graph.hit_test(root, 25, 25), Some(back));
    }
}
