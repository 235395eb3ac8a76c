//! The scene-graph surface the looper drives.
//!
//! Hosts implement [`SceneGraph`]; everything else in the crate only talks to this trait.
//!
//! Coordinate model:
//! - every node has a *relative* transform mapping its local box `(0,0)..(w,h)` into the space of
//!   its nearest ancestor that owns a coordinate space (a page or a container); groups are
//!   transparent and never own one.
//! - a group's relative transform is derived from its children; setting it moves the children.
//! - [`SceneGraph::insert_child`] keeps the *relative* transform, so moving a node between
//!   coordinate spaces changes where it renders unless the caller compensates
//!   (see [`reparent_keeping_absolute`]).

use crate::foundation::core::{Affine, NodeId, Point, Rect, Size};
use crate::foundation::error::{LooperError, LooperResult};
use crate::foundation::math;
use crate::scene::node::NodeKind;
use crate::style::paint::NodeStyle;

/// Scene mutation and query primitives provided by a host.
pub trait SceneGraph {
    /// Return `true` while the node exists and has not been removed.
    fn is_alive(&self, id: NodeId) -> bool;

    /// Kind of the node.
    fn kind(&self, id: NodeId) -> LooperResult<NodeKind>;

    /// Parent of the node; `None` for the page.
    fn parent(&self, id: NodeId) -> LooperResult<Option<NodeId>>;

    /// Children bottom to top.
    fn children(&self, id: NodeId) -> LooperResult<Vec<NodeId>>;

    /// Transform into the nearest coordinate-owning ancestor's space.
    fn relative_transform(&self, id: NodeId) -> LooperResult<Affine>;

    /// Replace the relative transform. For groups the change is applied to every child.
    fn set_relative_transform(&mut self, id: NodeId, transform: Affine) -> LooperResult<()>;

    /// Transform into page space.
    fn absolute_transform(&self, id: NodeId) -> LooperResult<Affine>;

    /// Local size.
    fn size(&self, id: NodeId) -> LooperResult<Size>;

    /// Resize keeping the local origin fixed.
    fn resize(&mut self, id: NodeId, size: Size) -> LooperResult<()>;

    /// Axis-aligned bounds in page space.
    fn absolute_bounds(&self, id: NodeId) -> LooperResult<Rect>;

    /// Current style.
    fn style(&self, id: NodeId) -> LooperResult<NodeStyle>;

    /// Replace the style.
    fn set_style(&mut self, id: NodeId, style: NodeStyle) -> LooperResult<()>;

    /// Duplicate a node (and its subtree) directly above the original in the same parent.
    fn clone_node(&mut self, id: NodeId) -> LooperResult<NodeId>;

    /// Group `nodes` (bottom to top, in the given order) into a new group inserted into `parent`
    /// at `index`, counted once the nodes have been detached. Nodes keep their on-canvas
    /// placement.
    fn group_nodes(&mut self, nodes: &[NodeId], parent: NodeId, index: usize)
    -> LooperResult<NodeId>;

    /// Create an empty container at the origin of `parent`'s space, on top of its siblings.
    fn create_container(&mut self, parent: NodeId) -> LooperResult<NodeId>;

    /// Move `child` under `parent` at `index` (clamped to the child count), keeping its relative
    /// transform.
    fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> LooperResult<()>;

    /// Remove a node and its subtree.
    fn remove_node(&mut self, id: NodeId) -> LooperResult<()>;

    /// Current selection.
    fn selection(&self) -> Vec<NodeId>;

    /// Replace the selection.
    fn set_selection(&mut self, nodes: Vec<NodeId>);

    /// Move `child` on top of `parent`'s children.
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> LooperResult<()> {
        let len = self.children(parent)?.len();
        self.insert_child(parent, len, child)
    }

    /// Position of the node's sibling slot, `None` for the page.
    fn index_in_parent(&self, id: NodeId) -> LooperResult<Option<usize>> {
        let Some(parent) = self.parent(id)? else {
            return Ok(None);
        };
        let idx = self.children(parent)?.iter().position(|c| *c == id);
        match idx {
            Some(i) => Ok(Some(i)),
            None => Err(LooperError::scene(format!(
                "node {id} is not listed under its parent {parent}"
            ))),
        }
    }

    /// Local origin in the parent coordinate space.
    fn position(&self, id: NodeId) -> LooperResult<Point> {
        Ok(self.relative_transform(id)?.translation().to_point())
    }

    /// Move the local origin, keeping rotation and scale.
    fn set_position(&mut self, id: NodeId, position: Point) -> LooperResult<()> {
        let t = self.relative_transform(id)?;
        self.set_relative_transform(id, t.with_translation(position.to_vec2()))
    }

    /// Rotation in degrees (counter-clockwise on a y-down canvas).
    fn rotation(&self, id: NodeId) -> LooperResult<f64> {
        Ok(math::rotation_degrees(self.relative_transform(id)?))
    }

    /// Rotate about the local origin until the rotation equals `degrees`.
    fn set_rotation(&mut self, id: NodeId, degrees: f64) -> LooperResult<()> {
        let t = self.relative_transform(id)?;
        let delta = degrees - math::rotation_degrees(t);
        let origin = t.translation().to_point();
        self.set_relative_transform(id, math::rotation_about(delta, origin) * t)
    }
}

/// Move `node` under `parent` at `index` without changing where it renders.
///
/// The new relative transform is derived from the difference between the node's absolute and
/// relative transforms once it sits in the new parent.
pub fn reparent_keeping_absolute<S: SceneGraph + ?Sized>(
    scene: &mut S,
    node: NodeId,
    parent: NodeId,
    index: usize,
) -> LooperResult<()> {
    let absolute = scene.absolute_transform(node)?;
    scene.insert_child(parent, index, node)?;

    let space = scene.absolute_transform(node)? * scene.relative_transform(node)?.inverse();
    scene.set_relative_transform(node, space.inverse() * absolute)
}

/// Fail unless `kind` can hold children.
pub(crate) fn ensure_parent_kind(id: NodeId, kind: NodeKind) -> LooperResult<()> {
    if kind.has_children() {
        Ok(())
    } else {
        Err(LooperError::scene(format!("node {id} cannot hold children")))
    }
}
