//=========================================================================
// Menu
//=========================================================================
//
// Vertical text menu built on the scene graph.
//
// Architecture:
//   root (container, w = widest item, h = len * spacing)
//     ├─ child 2i      normal rendering of item i
//     └─ child 2i + 1  highlight rendering of item i
//
// Exactly one entity of each pair is visible: the highlight one for the
// selected item, the normal one for every other item. Input handling
// lives in the owning mode; the menu only exposes selection operations.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::sync::Arc;

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::render::{Bitmap, Color};
use crate::core::scene::{layout, EntityId, SceneGraph};

//=== Font ================================================================

/// Text rasteriser used by menus and labels.
///
/// Implementations produce a fully rasterised bitmap; the core never
/// touches glyph data.
pub trait Font: Send + Sync {
    fn rasterize(&self, text: &str, color: Color) -> Bitmap;
}

//=== MenuItem ============================================================

#[derive(Clone)]
pub struct MenuItem {
    pub font: Arc<dyn Font>,
    pub text: String,
    pub color: Color,
    pub highlight: Color,
}

impl MenuItem {
    pub fn new(font: Arc<dyn Font>, text: impl Into<String>, color: Color, highlight: Color) -> Self {
        Self {
            font,
            text: text.into(),
            color,
            highlight,
        }
    }
}

impl fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("text", &self.text)
            .field("color", &self.color)
            .field("highlight", &self.highlight)
            .finish_non_exhaustive()
    }
}

//=== Justification =======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justification {
    #[default]
    Left,
    Center,
    Right,
}

//=== Menu ================================================================

#[derive(Debug)]
pub struct Menu {
    items: Vec<MenuItem>,
    selected: usize,
    clicked: Option<usize>,
    spacing: i32,
    justification: Justification,
    root: EntityId,
}

impl Menu {
    //--- Construction -----------------------------------------------------

    /// Rasterises every item twice and builds the entity subtree in `graph`.
    ///
    /// The returned menu's root is detached; the caller attaches it where
    /// it belongs.
    pub fn build(
        graph: &mut SceneGraph,
        items: Vec<MenuItem>,
        spacing: i32,
        justification: Justification,
    ) -> Self {
        let root = graph.spawn(None);
        let mut max_w = 0;

        // Pass 1: rasterise and stack
        for (i, item) in items.iter().enumerate() {
            let normal = graph.spawn(Some(Arc::new(item.font.rasterize(&item.text, item.color))));
            let highlight =
                graph.spawn(Some(Arc::new(item.font.rasterize(&item.text, item.highlight))));

            let y = i as i32 * spacing;
            graph.get_mut(normal).y = y;
            graph.get_mut(highlight).y = y;
            graph.get_mut(normal).visible = i != 0;
            graph.get_mut(highlight).visible = i == 0;

            max_w = max_w.max(graph.get(normal).w);
            graph.add_children(root, &[normal, highlight]);
        }

        let root_node = graph.get_mut(root);
        root_node.w = max_w;
        root_node.h = items.len() as i32 * spacing;

        // Pass 2: position now that the widest item is known
        for index in 0..items.len() * 2 {
            let entity = graph.child(root, index);
            match justification {
                Justification::Left => graph.get_mut(entity).x = 0,
                Justification::Center => layout::center_in_parent(graph, entity, root),
                Justification::Right => layout::right_justify_in_parent(graph, entity, root),
            }
        }

        Self {
            items,
            selected: 0,
            clicked: None,
            spacing,
            justification,
            root,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn root(&self) -> EntityId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Item hit by the most recent [`Menu::select_by_pointer_click_y`].
    pub fn clicked(&self) -> Option<usize> {
        self.clicked
    }

    pub fn spacing(&self) -> i32 {
        self.spacing
    }

    pub fn justification(&self) -> Justification {
        self.justification
    }

    //--- Selection --------------------------------------------------------

    /// # Panics
    ///
    /// Panics if `index` is not a valid item index.
    pub fn set_selected(&mut self, graph: &mut SceneGraph, index: usize) {
        assert!(
            index < self.items.len(),
            "Menu index {} out of range for {} items",
            index,
            self.items.len()
        );
        self.selected = index;
        self.refresh(graph);
    }

    /// Moves the selection down, wrapping to the first item.
    pub fn select_next(&mut self, graph: &mut SceneGraph) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.items.len();
        self.refresh(graph);
    }

    /// Moves the selection up, wrapping to the last item.
    pub fn select_prev(&mut self, graph: &mut SceneGraph) {
        if self.items.is_empty() {
            return;
        }
        self.selected = self
            .selected
            .checked_sub(1)
            .unwrap_or(self.items.len() - 1);
        self.refresh(graph);
    }

    /// Selects the item under the world-space pointer `y`.
    ///
    /// Relies on the root transform of the last render pass. A `y` outside
    /// every item leaves the selection unchanged.
    pub fn select_by_pointer_y(&mut self, graph: &mut SceneGraph, y: i32) {
        if let Some(index) = self.item_at(graph, y) {
            self.selected = index;
            self.refresh(graph);
        }
    }

    /// Records the item under the world-space pointer `y` as clicked.
    ///
    /// Does not change the selection or any visuals.
    pub fn select_by_pointer_click_y(&mut self, graph: &SceneGraph, y: i32) {
        self.clicked = self.item_at(graph, y);
    }

    //--- Internals --------------------------------------------------------

    fn item_at(&self, graph: &SceneGraph, y: i32) -> Option<usize> {
        let (_, local_y) = graph.get(self.root).world_to_entity().apply(0, y);

        (0..self.items.len()).find(|&i| {
            let item = graph.get(graph.child(self.root, i * 2));
            local_y >= item.y && local_y <= item.y + item.h
        })
    }

    fn refresh(&self, graph: &mut SceneGraph) {
        trace!(target: "menu", "Selected item {}", self.selected);

        for i in 0..self.items.len() {
            let normal = graph.child(self.root, i * 2);
            let highlight = graph.child(self.root, i * 2 + 1);
            let is_selected = i == self.selected;
            graph.set_visible(normal, !is_selected);
            graph.set_visible(highlight, is_selected);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
