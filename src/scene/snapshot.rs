use crate::foundation::core::{Affine, NodeId, Point, Size};
use crate::foundation::error::{LooperError, LooperResult};
use crate::scene::graph::SceneGraph;
use crate::scene::node::{Capabilities, NodeKind};
use crate::style::paint::NodeStyle;

/// Immutable read of the base shape, taken once before a loop is generated.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSnapshot {
    /// The captured node.
    pub node: NodeId,
    /// Its kind.
    pub kind: NodeKind,
    /// Relative transform at capture time.
    pub transform: Affine,
    /// Local size.
    pub size: Size,
    /// Style at capture time.
    pub style: NodeStyle,
}

impl ShapeSnapshot {
    /// Read `node` from the scene.
    ///
    /// Fails with [`LooperError::UnsupportedSelection`] when the node lacks the capabilities the
    /// looper needs.
    pub fn capture<S: SceneGraph + ?Sized>(scene: &S, node: NodeId) -> LooperResult<Self> {
        let kind = scene.kind(node)?;
        if !kind.capabilities().contains(Capabilities::LOOPABLE) {
            return Err(LooperError::unsupported_selection(format!(
                "node {node} of kind {kind:?} cannot be looped"
            )));
        }
        Ok(Self {
            node,
            kind,
            transform: scene.relative_transform(node)?,
            size: scene.size(node)?,
            style: scene.style(node)?,
        })
    }

    /// Local origin in the parent space.
    pub fn position(&self) -> Point {
        self.transform.translation().to_point()
    }

    /// Rotation in degrees.
    pub fn rotation(&self) -> f64 {
        crate::foundation::math::rotation_degrees(self.transform)
    }

    /// Capabilities of the captured kind.
    pub fn capabilities(&self) -> Capabilities {
        self.kind.capabilities()
    }
}
