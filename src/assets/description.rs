//=========================================================================
// Scene Descriptions
//=========================================================================
//
// Declarative entity trees loaded from RON.
//
// Architecture:
//   RON text → SceneDescription (serde) → instantiate() → SceneGraph nodes
//                                                       └─ id → EntityId map
//
// Per node, sizes are resolved first (an asset overrides them), then the
// position (which may depend on the size), then the children (which are
// laid out against this node's extent).
//
// Example:
// ```text
// #![enable(implicit_some)]
// (
//     root: (
//         id: "root",
//         w: SurfaceWidth,
//         h: SurfaceHeight,
//         children: [
//             (id: "nest", asset: "nest", x: Center, y: Px(520)),
//         ],
//     ),
// )
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use log::debug;
use serde::Deserialize;

//=== Internal Dependencies ===============================================

use super::DrawableProvider;
use crate::core::scene::{layout, EntityId, SceneGraph};

//=== SceneError ==========================================================

#[derive(Debug)]
pub enum SceneError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),

    /// A node names an asset the provider does not know.
    UnknownAsset { node: String, asset: String },

    /// Two nodes share an id.
    DuplicateId(String),

    /// Code asked for an id the description does not define.
    MissingId(String),
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        SceneError::Io(e)
    }
}

impl From<ron::error::SpannedError> for SceneError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneError::Parse(e)
    }
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Io(e) => write!(f, "IO error: {}", e),
            SceneError::Parse(e) => write!(f, "Parse error: {}", e),
            SceneError::UnknownAsset { node, asset } => {
                write!(f, "{}: unknown asset {}", node, asset)
            }
            SceneError::DuplicateId(id) => write!(f, "Duplicate node id {}", id),
            SceneError::MissingId(id) => write!(f, "Scene has no node with id {}", id),
        }
    }
}

impl std::error::Error for SceneError {}

//=== Schema ==============================================================

/// Node width or height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Dimension {
    Px(i32),
    SurfaceWidth,
    SurfaceHeight,
}

/// Node offset along one axis, relative to the parent's extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum Position {
    Px(i32),
    #[default]
    Start,
    Center,
    /// Flush with the far edge (right for `x`, bottom for `y`).
    End,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NodeDesc {
    pub id: Option<String>,
    pub w: Option<Dimension>,
    pub h: Option<Dimension>,
    pub x: Position,
    pub y: Position,
    pub visible: bool,
    pub asset: Option<String>,
    pub children: Vec<NodeDesc>,
}

impl Default for NodeDesc {
    fn default() -> Self {
        Self {
            id: None,
            w: None,
            h: None,
            x: Position::default(),
            y: Position::default(),
            visible: true,
            asset: None,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SceneDescription {
    pub root: NodeDesc,
}

//=== SceneInstance =======================================================

/// Result of instantiating a description into a graph.
#[derive(Debug, Clone)]
pub struct SceneInstance {
    pub root: EntityId,
    pub ids: HashMap<String, EntityId>,
}

impl SceneInstance {
    pub fn get(&self, id: &str) -> Option<EntityId> {
        self.ids.get(id).copied()
    }

    /// Like [`SceneInstance::get`] but reports a missing id as an error.
    pub fn require(&self, id: &str) -> Result<EntityId, SceneError> {
        self.get(id).ok_or_else(|| SceneError::MissingId(id.to_string()))
    }
}

//=== Loading =============================================================

impl SceneDescription {
    pub fn from_ron(text: &str) -> Result<Self, SceneError> {
        Ok(ron::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let text = fs::read_to_string(path.as_ref())?;
        debug!(target: "assets", "Loaded scene description {}", path.as_ref().display());
        Self::from_ron(&text)
    }

    /// Builds the described tree in `graph`.
    ///
    /// `surface` is `(width, height)` of the output surface; it resolves
    /// the `Surface*` dimensions and acts as the root's parent extent.
    pub fn instantiate(
        &self,
        graph: &mut SceneGraph,
        provider: &dyn DrawableProvider,
        surface: (i32, i32),
    ) -> Result<SceneInstance, SceneError> {
        let mut ids = HashMap::new();
        let root = build_node(&self.root, graph, provider, surface, surface, &mut ids)?;
        Ok(SceneInstance { root, ids })
    }
}

fn build_node(
    desc: &NodeDesc,
    graph: &mut SceneGraph,
    provider: &dyn DrawableProvider,
    surface: (i32, i32),
    parent_extent: (i32, i32),
    ids: &mut HashMap<String, EntityId>,
) -> Result<EntityId, SceneError> {
    let label = desc.id.as_deref().unwrap_or("[no id]");

    let drawable = match &desc.asset {
        Some(key) => Some(provider.drawable(key).ok_or_else(|| SceneError::UnknownAsset {
            node: label.to_string(),
            asset: key.clone(),
        })?),
        None => None,
    };

    let entity = graph.spawn(None);

    // Sizes first; an asset overrides them
    {
        let node = graph.get_mut(entity);
        if let Some(w) = desc.w {
            node.w = resolve_dimension(w, surface);
        }
        if let Some(h) = desc.h {
            node.h = resolve_dimension(h, surface);
        }
    }
    if drawable.is_some() {
        graph.set_drawable(entity, drawable);
    }

    // Then positions, which may depend on the size
    place_x(graph, entity, desc.x, parent_extent.0);
    place_y(graph, entity, desc.y, parent_extent.1);

    let node = graph.get_mut(entity);
    node.visible = desc.visible;
    node.id = desc.id.clone();
    let extent = (node.w, node.h);

    if let Some(id) = &desc.id {
        if ids.insert(id.clone(), entity).is_some() {
            return Err(SceneError::DuplicateId(id.clone()));
        }
    }

    for child in &desc.children {
        let child_id = build_node(child, graph, provider, surface, extent, ids)?;
        graph.add_child(entity, child_id);
    }

    Ok(entity)
}

fn resolve_dimension(dim: Dimension, surface: (i32, i32)) -> i32 {
    match dim {
        Dimension::Px(v) => v,
        Dimension::SurfaceWidth => surface.0,
        Dimension::SurfaceHeight => surface.1,
    }
}

fn place_x(graph: &mut SceneGraph, id: EntityId, pos: Position, width: i32) {
    match pos {
        Position::Px(v) => graph.get_mut(id).x = v,
        Position::Start => graph.get_mut(id).x = 0,
        Position::Center => layout::center_in_width(graph, id, width),
        Position::End => layout::right_justify_in_width(graph, id, width),
    }
}

fn place_y(graph: &mut SceneGraph, id: EntityId, pos: Position, height: i32) {
    match pos {
        Position::Px(v) => graph.get_mut(id).y = v,
        Position::Start => graph.get_mut(id).y = 0,
        Position::Center => layout::center_vertically_in_height(graph, id, height),
        Position::End => layout::bottom_justify_in_height(graph, id, height),
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
