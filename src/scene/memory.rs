//! In-memory scene host with design-tool semantics.
//!
//! Used by the CLI to run the looper over JSON scene documents and by tests as the reference
//! host. See [`crate::scene::graph`] for the coordinate model it implements.

use crate::foundation::core::{Affine, NodeId, Point, Rect, Size};
use crate::foundation::error::{LooperError, LooperResult};
use crate::foundation::math;
use crate::scene::graph::{SceneGraph, ensure_parent_kind};
use crate::scene::node::{NodeKind, ShapeKind};
use crate::style::paint::NodeStyle;
use serde::{Deserialize, Serialize};

/// Smallest width or height a node may be resized to.
pub const MIN_SIZE: f64 = 0.01;

#[derive(Debug, Clone)]
struct Node {
    name: String,
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    // Ignored for groups and the page: their transform is derived.
    transform: Affine,
    size: Size,
    style: NodeStyle,
}

/// Arena-backed scene tree.
#[derive(Debug, Clone)]
pub struct MemoryScene {
    nodes: Vec<Option<Node>>,
    root: NodeId,
    selection: Vec<NodeId>,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryScene {
    /// Empty scene holding only its page.
    pub fn new() -> Self {
        let page = Node {
            name: "Page".to_owned(),
            kind: NodeKind::Page,
            parent: None,
            children: Vec::new(),
            transform: Affine::IDENTITY,
            size: Size::ZERO,
            style: NodeStyle::default(),
        };
        Self {
            nodes: vec![Some(page)],
            root: NodeId(0),
            selection: Vec::new(),
        }
    }

    /// The page node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Add an unrotated shape on top of `parent`'s children.
    pub fn add_shape(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        shape: ShapeKind,
        position: Point,
        size: Size,
    ) -> LooperResult<NodeId> {
        self.add_node(
            parent,
            name.into(),
            NodeKind::Shape(shape),
            Affine::translate(position.to_vec2()),
            size,
        )
    }

    /// Add a container on top of `parent`'s children.
    pub fn add_container(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        position: Point,
        size: Size,
    ) -> LooperResult<NodeId> {
        self.add_node(
            parent,
            name.into(),
            NodeKind::Container,
            Affine::translate(position.to_vec2()),
            size,
        )
    }

    /// Node name.
    pub fn name(&self, id: NodeId) -> LooperResult<&str> {
        Ok(self.node(id)?.name.as_str())
    }

    /// Rename a node.
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> LooperResult<()> {
        self.node_mut(id)?.name = name.into();
        Ok(())
    }

    /// First live node with `name` in depth-first, bottom-to-top order.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        fn walk(scene: &MemoryScene, id: NodeId, name: &str) -> Option<NodeId> {
            let node = scene.node(id).ok()?;
            if node.name == name && node.kind != NodeKind::Page {
                return Some(id);
            }
            node.children.iter().find_map(|c| walk(scene, *c, name))
        }
        walk(self, self.root, name)
    }

    /// Number of live nodes, page included.
    pub fn live_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    fn node(&self, id: NodeId) -> LooperResult<&Node> {
        usize::try_from(id.0)
            .ok()
            .and_then(|i| self.nodes.get(i))
            .and_then(Option::as_ref)
            .ok_or(LooperError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> LooperResult<&mut Node> {
        usize::try_from(id.0)
            .ok()
            .and_then(|i| self.nodes.get_mut(i))
            .and_then(Option::as_mut)
            .ok_or(LooperError::UnknownNode(id))
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u64);
        self.nodes.push(Some(node));
        id
    }

    fn add_node(
        &mut self,
        parent: NodeId,
        name: String,
        kind: NodeKind,
        transform: Affine,
        size: Size,
    ) -> LooperResult<NodeId> {
        ensure_parent_kind(parent, self.node(parent)?.kind)?;
        let id = self.alloc(Node {
            name,
            kind,
            parent: Some(parent),
            children: Vec::new(),
            transform,
            size,
            style: NodeStyle::default(),
        });
        self.node_mut(parent)?.children.push(id);
        Ok(id)
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut id: NodeId) -> LooperResult<bool> {
        loop {
            if id == ancestor {
                return Ok(true);
            }
            match self.node(id)?.parent {
                Some(p) => id = p,
                None => return Ok(false),
            }
        }
    }

    fn detach(&mut self, id: NodeId) -> LooperResult<()> {
        if let Some(parent) = self.node(id)?.parent {
            self.node_mut(parent)?.children.retain(|c| *c != id);
        }
        self.node_mut(id)?.parent = None;
        Ok(())
    }

    fn attach(&mut self, parent: NodeId, index: usize, child: NodeId) -> LooperResult<()> {
        let siblings = &mut self.node_mut(parent)?.children;
        let index = index.min(siblings.len());
        siblings.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Page-space transform of the space `id` is positioned in.
    fn coordinate_space(&self, id: NodeId) -> LooperResult<Affine> {
        let mut parent = self.node(id)?.parent;
        while let Some(p) = parent {
            let node = self.node(p)?;
            if node.kind.owns_coordinate_space() {
                return self.absolute_transform(p);
            }
            parent = node.parent;
        }
        Ok(Affine::IDENTITY)
    }

    /// Bounds in the node's coordinate space.
    fn local_bounds(&self, id: NodeId) -> LooperResult<Rect> {
        let node = self.node(id)?;
        match node.kind {
            NodeKind::Page => Ok(Rect::ZERO),
            NodeKind::Group => {
                let mut bounds: Option<Rect> = None;
                for child in &node.children {
                    let b = self.local_bounds(*child)?;
                    bounds = Some(bounds.map_or(b, |acc| acc.union(b)));
                }
                Ok(bounds.unwrap_or(Rect::ZERO))
            }
            NodeKind::Container | NodeKind::Shape(_) => Ok(node
                .transform
                .transform_rect_bbox(Rect::from_origin_size(Point::ORIGIN, node.size))),
        }
    }

    fn clone_subtree(&mut self, id: NodeId, parent: NodeId, index: usize) -> LooperResult<NodeId> {
        let source = self.node(id)?.clone();
        let copy = self.alloc(Node {
            parent: None,
            children: Vec::new(),
            ..source.clone()
        });
        self.attach(parent, index, copy)?;
        for (i, child) in source.children.iter().enumerate() {
            self.clone_subtree(*child, copy, i)?;
        }
        Ok(copy)
    }

    fn drop_subtree(&mut self, id: NodeId) -> LooperResult<()> {
        let children = std::mem::take(&mut self.node_mut(id)?.children);
        for child in children {
            self.drop_subtree(child)?;
        }
        if let Some(slot) = usize::try_from(id.0).ok().and_then(|i| self.nodes.get_mut(i)) {
            *slot = None;
        }
        Ok(())
    }
}

impl SceneGraph for MemoryScene {
    fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    fn kind(&self, id: NodeId) -> LooperResult<NodeKind> {
        Ok(self.node(id)?.kind)
    }

    fn parent(&self, id: NodeId) -> LooperResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    fn children(&self, id: NodeId) -> LooperResult<Vec<NodeId>> {
        Ok(self.node(id)?.children.clone())
    }

    fn relative_transform(&self, id: NodeId) -> LooperResult<Affine> {
        let node = self.node(id)?;
        match node.kind {
            NodeKind::Page => Ok(Affine::IDENTITY),
            NodeKind::Group => Ok(Affine::translate(self.local_bounds(id)?.origin().to_vec2())),
            NodeKind::Container | NodeKind::Shape(_) => Ok(node.transform),
        }
    }

    fn set_relative_transform(&mut self, id: NodeId, transform: Affine) -> LooperResult<()> {
        match self.node(id)?.kind {
            NodeKind::Page => Err(LooperError::scene("the page cannot be transformed")),
            NodeKind::Group => {
                let delta = transform * self.relative_transform(id)?.inverse();
                for child in self.children(id)? {
                    let t = self.relative_transform(child)?;
                    self.set_relative_transform(child, delta * t)?;
                }
                Ok(())
            }
            NodeKind::Container | NodeKind::Shape(_) => {
                self.node_mut(id)?.transform = transform;
                Ok(())
            }
        }
    }

    fn absolute_transform(&self, id: NodeId) -> LooperResult<Affine> {
        if self.node(id)?.kind == NodeKind::Page {
            return Ok(Affine::IDENTITY);
        }
        Ok(self.coordinate_space(id)? * self.relative_transform(id)?)
    }

    fn size(&self, id: NodeId) -> LooperResult<Size> {
        let node = self.node(id)?;
        match node.kind {
            NodeKind::Group => Ok(self.local_bounds(id)?.size()),
            _ => Ok(node.size),
        }
    }

    fn resize(&mut self, id: NodeId, size: Size) -> LooperResult<()> {
        if !(size.width.is_finite() && size.height.is_finite())
            || size.width < MIN_SIZE
            || size.height < MIN_SIZE
        {
            return Err(LooperError::scene(format!(
                "cannot resize {id} to {}x{}: width and height must be >= {MIN_SIZE}",
                size.width, size.height
            )));
        }

        match self.node(id)?.kind {
            NodeKind::Page => Err(LooperError::scene("the page cannot be resized")),
            NodeKind::Group => {
                let old = self.local_bounds(id)?;
                if old.width() < math::EPSILON || old.height() < math::EPSILON {
                    return Err(LooperError::scene(format!(
                        "cannot resize degenerate group {id}"
                    )));
                }
                let origin = old.origin().to_vec2();
                let scale = Affine::translate(origin)
                    * Affine::scale_non_uniform(size.width / old.width(), size.height / old.height())
                    * Affine::translate(-origin);
                for child in self.children(id)? {
                    let t = self.relative_transform(child)?;
                    self.set_relative_transform(child, scale * t)?;
                }
                Ok(())
            }
            NodeKind::Container | NodeKind::Shape(_) => {
                self.node_mut(id)?.size = size;
                Ok(())
            }
        }
    }

    fn absolute_bounds(&self, id: NodeId) -> LooperResult<Rect> {
        let node = self.node(id)?;
        match node.kind {
            NodeKind::Page => Ok(Rect::ZERO),
            NodeKind::Group => {
                let mut bounds: Option<Rect> = None;
                for child in &node.children {
                    let b = self.absolute_bounds(*child)?;
                    bounds = Some(bounds.map_or(b, |acc| acc.union(b)));
                }
                Ok(bounds.unwrap_or(Rect::ZERO))
            }
            NodeKind::Container | NodeKind::Shape(_) => Ok(self
                .absolute_transform(id)?
                .transform_rect_bbox(Rect::from_origin_size(Point::ORIGIN, node.size))),
        }
    }

    fn style(&self, id: NodeId) -> LooperResult<NodeStyle> {
        Ok(self.node(id)?.style)
    }

    fn set_style(&mut self, id: NodeId, style: NodeStyle) -> LooperResult<()> {
        self.node_mut(id)?.style = style;
        Ok(())
    }

    fn clone_node(&mut self, id: NodeId) -> LooperResult<NodeId> {
        let Some(parent) = self.node(id)?.parent else {
            return Err(LooperError::scene("the page cannot be cloned"));
        };
        let index = self
            .node(parent)?
            .children
            .iter()
            .position(|c| *c == id)
            .map_or(0, |i| i + 1);
        self.clone_subtree(id, parent, index)
    }

    fn group_nodes(
        &mut self,
        nodes: &[NodeId],
        parent: NodeId,
        index: usize,
    ) -> LooperResult<NodeId> {
        if nodes.is_empty() {
            return Err(LooperError::scene("cannot group an empty node list"));
        }
        ensure_parent_kind(parent, self.node(parent)?.kind)?;
        for (i, n) in nodes.iter().enumerate() {
            if self.node(*n)?.kind == NodeKind::Page {
                return Err(LooperError::scene("the page cannot be grouped"));
            }
            if nodes[..i].contains(n) {
                return Err(LooperError::scene(format!("node {n} listed twice")));
            }
            if self.is_ancestor_or_self(*n, parent)? {
                return Err(LooperError::scene(format!(
                    "cannot group {n} into its own descendant {parent}"
                )));
            }
        }

        let placements = nodes
            .iter()
            .map(|n| self.absolute_transform(*n))
            .collect::<LooperResult<Vec<_>>>()?;
        for n in nodes {
            self.detach(*n)?;
        }

        let group = self.alloc(Node {
            name: "Group".to_owned(),
            kind: NodeKind::Group,
            parent: None,
            children: Vec::new(),
            transform: Affine::IDENTITY,
            size: Size::ZERO,
            style: NodeStyle::default(),
        });
        self.attach(parent, index, group)?;

        for (n, absolute) in nodes.iter().zip(placements) {
            let len = self.node(group)?.children.len();
            self.attach(group, len, *n)?;
            let space = self.coordinate_space(*n)?;
            self.set_relative_transform(*n, space.inverse() * absolute)?;
        }
        Ok(group)
    }

    fn create_container(&mut self, parent: NodeId) -> LooperResult<NodeId> {
        self.add_node(
            parent,
            "Container".to_owned(),
            NodeKind::Container,
            Affine::IDENTITY,
            Size::ZERO,
        )
    }

    fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> LooperResult<()> {
        ensure_parent_kind(parent, self.node(parent)?.kind)?;
        if self.node(child)?.kind == NodeKind::Page {
            return Err(LooperError::scene("the page cannot be reparented"));
        }
        if self.is_ancestor_or_self(child, parent)? {
            return Err(LooperError::scene(format!(
                "cannot move {child} into its own descendant {parent}"
            )));
        }
        self.detach(child)?;
        self.attach(parent, index, child)
    }

    fn remove_node(&mut self, id: NodeId) -> LooperResult<()> {
        if self.node(id)?.kind == NodeKind::Page {
            return Err(LooperError::scene("the page cannot be removed"));
        }
        self.detach(id)?;
        self.drop_subtree(id)?;
        let nodes = &self.nodes;
        self.selection
            .retain(|s| nodes.get(s.0 as usize).is_some_and(Option::is_some));
        Ok(())
    }

    fn selection(&self) -> Vec<NodeId> {
        self.selection.clone()
    }

    fn set_selection(&mut self, nodes: Vec<NodeId>) {
        self.selection = nodes;
    }
}

/// JSON document describing a scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDoc {
    /// Top-level nodes, bottom to top.
    #[serde(default)]
    pub children: Vec<NodeDoc>,
    /// Names of selected nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selection: Vec<String>,
}

/// One node of a [`SceneDoc`].
///
/// Positions are in the space of the nearest enclosing container (or the page). Group placement
/// is derived from the children, so `x`/`y`/`width`/`height`/`rotation` are ignored for groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDoc {
    /// Display name.
    pub name: String,
    /// Node kind.
    pub kind: NodeKind,
    /// Local origin x.
    #[serde(default)]
    pub x: f64,
    /// Local origin y.
    #[serde(default)]
    pub y: f64,
    /// Width.
    #[serde(default)]
    pub width: f64,
    /// Height.
    #[serde(default)]
    pub height: f64,
    /// Rotation in degrees about the local origin.
    #[serde(default)]
    pub rotation: f64,
    /// Full transform, present only when it carries scale or skew.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Affine>,
    /// Style.
    #[serde(default)]
    pub style: NodeStyle,
    /// Children, bottom to top.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDoc>,
}

impl MemoryScene {
    /// Build a scene from a document.
    pub fn from_doc(doc: &SceneDoc) -> LooperResult<Self> {
        let mut scene = Self::new();
        let root = scene.root;
        for child in &doc.children {
            scene.import_node(root, child)?;
        }

        let mut selection = Vec::with_capacity(doc.selection.len());
        for name in &doc.selection {
            let id = scene.find_by_name(name).ok_or_else(|| {
                LooperError::validation(format!("selected node \"{name}\" does not exist"))
            })?;
            selection.push(id);
        }
        scene.selection = selection;
        Ok(scene)
    }

    fn import_node(&mut self, parent: NodeId, doc: &NodeDoc) -> LooperResult<()> {
        let transform = doc.transform.unwrap_or_else(|| {
            Affine::translate((doc.x, doc.y)) * math::rotation(doc.rotation)
        });
        let id = self.add_node(
            parent,
            doc.name.clone(),
            doc.kind,
            transform,
            Size::new(doc.width, doc.height),
        )?;
        self.node_mut(id)?.style = doc.style;

        if !doc.children.is_empty() {
            ensure_parent_kind(id, doc.kind)?;
        }
        for child in &doc.children {
            self.import_node(id, child)?;
        }
        Ok(())
    }

    /// Export the live scene as a document.
    pub fn to_doc(&self) -> LooperResult<SceneDoc> {
        let root = self.node(self.root)?;
        let children = root
            .children
            .iter()
            .map(|c| self.export_node(*c))
            .collect::<LooperResult<Vec<_>>>()?;
        let selection = self
            .selection
            .iter()
            .map(|s| self.name(*s).map(str::to_owned))
            .collect::<LooperResult<Vec<_>>>()?;
        Ok(SceneDoc {
            children,
            selection,
        })
    }

    fn export_node(&self, id: NodeId) -> LooperResult<NodeDoc> {
        let node = self.node(id)?;
        let t = self.relative_transform(id)?;
        let size = self.size(id)?;
        let origin = t.translation();
        let rotation = math::rotation_degrees(t);
        let rigid = Affine::translate(origin) * math::rotation(rotation);
        let transform = (!math::affine_approx_eq(rigid, t, math::EPSILON)).then_some(t);

        let children = node
            .children
            .iter()
            .map(|c| self.export_node(*c))
            .collect::<LooperResult<Vec<_>>>()?;

        Ok(NodeDoc {
            name: node.name.clone(),
            kind: node.kind,
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
            rotation,
            transform,
            style: node.style,
            children,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/memory.rs"]
mod tests;
