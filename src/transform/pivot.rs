//! Rotation of a node set around an arbitrary pivot.
//!
//! Hosts can only rotate a node about its own origin. To rotate about another point the nodes
//! are grouped, the group is wrapped in a temporary container whose origin sits on the pivot,
//! the container is rotated, and everything is unwound again. Every node ends up back in its
//! recorded parent and sibling slot, keeping its rotated on-canvas placement.

use crate::foundation::core::{Affine, Bounds, NodeId, Vec2};
use crate::foundation::error::{LooperError, LooperResult};
use crate::scene::graph::{SceneGraph, reparent_keeping_absolute};
use serde::{Deserialize, Serialize};

/// How a [`Pivot`] offset is measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PivotUnit {
    /// Fraction of the rotated unit's bounding box.
    Percent,
    /// Canvas units from the bounding box origin.
    Absolute,
}

/// Rotation pivot relative to the top-left of the rotated unit's bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pivot {
    /// Offset from the bounding box origin.
    pub offset: Vec2,
    /// Unit of `offset`.
    pub unit: PivotUnit,
}

impl Pivot {
    /// Bounding box center.
    pub const CENTER: Self = Self {
        offset: Vec2::new(0.5, 0.5),
        unit: PivotUnit::Percent,
    };

    /// Fractional pivot.
    pub fn percent(x: f64, y: f64) -> Self {
        Self {
            offset: Vec2::new(x, y),
            unit: PivotUnit::Percent,
        }
    }

    /// Pivot in canvas units.
    pub fn absolute(x: f64, y: f64) -> Self {
        Self {
            offset: Vec2::new(x, y),
            unit: PivotUnit::Absolute,
        }
    }
}

impl Default for Pivot {
    fn default() -> Self {
        Self::CENTER
    }
}

#[derive(Clone, Copy, Debug)]
struct Placement {
    node: NodeId,
    parent: NodeId,
    index: usize,
}

#[derive(Default)]
struct Temporaries {
    group: Option<NodeId>,
    container: Option<NodeId>,
}

/// Rotate `nodes` as one rigid unit by `angle` degrees around `pivot`.
///
/// Returns the page-space bounds of the rotated unit. On failure the nodes are put back into
/// their recorded parents and slots before the error is returned.
#[tracing::instrument(skip(scene))]
pub fn rotate_around_pivot<S: SceneGraph + ?Sized>(
    scene: &mut S,
    nodes: &[NodeId],
    angle: f64,
    pivot: Pivot,
) -> LooperResult<Bounds> {
    if nodes.is_empty() {
        return Err(LooperError::validation("pivot rotation needs at least one node"));
    }
    if !angle.is_finite() {
        return Err(LooperError::validation("pivot rotation angle must be finite"));
    }

    let placements = record_placements(scene, nodes)?;
    let mut temps = Temporaries::default();

    match rotate_grouped(scene, nodes, &placements, angle, pivot, &mut temps) {
        Ok(bounds) => Ok(bounds),
        Err(err) => {
            tracing::warn!(error = %err, "pivot rotation failed; restoring nodes");
            recover(scene, &placements, &temps);
            Err(err)
        }
    }
}

fn record_placements<S: SceneGraph + ?Sized>(
    scene: &S,
    nodes: &[NodeId],
) -> LooperResult<Vec<Placement>> {
    let mut placements = Vec::with_capacity(nodes.len());
    for &node in nodes {
        let parent = scene
            .parent(node)?
            .ok_or_else(|| LooperError::validation(format!("node {node} has no parent")))?;
        let index = scene.index_in_parent(node)?.unwrap_or(0);
        placements.push(Placement {
            node,
            parent,
            index,
        });
    }
    Ok(placements)
}

fn rotate_grouped<S: SceneGraph + ?Sized>(
    scene: &mut S,
    nodes: &[NodeId],
    placements: &[Placement],
    angle: f64,
    pivot: Pivot,
    temps: &mut Temporaries,
) -> LooperResult<Bounds> {
    let home = placements[0].parent;

    let group = scene.group_nodes(nodes, home, placements[0].index)?;
    temps.group = Some(group);

    // The offset is taken from the group before it is wrapped.
    let size = scene.size(group)?;
    let offset = match pivot.unit {
        PivotUnit::Percent => Vec2::new(size.width * pivot.offset.x, size.height * pivot.offset.y),
        PivotUnit::Absolute => pivot.offset,
    };

    let origin = scene.position(group)?.to_vec2();
    let container = scene.create_container(home)?;
    temps.container = Some(container);
    scene.set_relative_transform(container, Affine::translate(origin))?;
    reparent_keeping_absolute(scene, group, container, 0)?;

    // Container origin on the pivot, group shifted back so nothing moves on canvas.
    scene.set_relative_transform(group, Affine::translate(-offset))?;
    scene.set_relative_transform(container, Affine::translate(origin + offset))?;

    scene.set_rotation(container, angle)?;

    let end = scene.children(home)?.len();
    reparent_keeping_absolute(scene, group, home, end)?;
    scene.remove_node(container)?;
    temps.container = None;
    tracing::debug!(
        position = ?scene.position(group)?,
        rotation = scene.rotation(group)?,
        "rotated unit unwrapped"
    );

    // Re-form the group so its frame no longer reflects the container, then dissolve it.
    let members = scene.children(group)?;
    let slot = scene.index_in_parent(group)?.unwrap_or(end);
    let normalized = scene.group_nodes(&members, home, slot)?;
    scene.remove_node(group)?;
    temps.group = Some(normalized);

    let bounds = Bounds::from(scene.absolute_bounds(normalized)?);

    restore_placements(scene, placements)?;
    scene.remove_node(normalized)?;
    temps.group = None;

    Ok(bounds)
}

/// Put nodes back, lowest recorded index first so each slot is filled after the ones below it.
fn restore_placements<S: SceneGraph + ?Sized>(
    scene: &mut S,
    placements: &[Placement],
) -> LooperResult<()> {
    let mut ordered = placements.to_vec();
    ordered.sort_by_key(|p| p.index);
    for p in ordered {
        reparent_keeping_absolute(scene, p.node, p.parent, p.index)?;
    }
    Ok(())
}

fn recover<S: SceneGraph + ?Sized>(scene: &mut S, placements: &[Placement], temps: &Temporaries) {
    let mut ordered = placements.to_vec();
    ordered.sort_by_key(|p| p.index);

    for p in &ordered {
        if !scene.is_alive(p.node) || !scene.is_alive(p.parent) {
            continue;
        }
        if let Err(e) = reparent_keeping_absolute(scene, p.node, p.parent, p.index) {
            tracing::warn!(node = %p.node, error = %e, "could not restore node");
        }
    }

    for temp in [temps.group, temps.container].into_iter().flatten() {
        if scene.is_alive(temp)
            && let Err(e) = scene.remove_node(temp)
        {
            tracing::warn!(node = %temp, error = %e, "could not remove temporary node");
        }
    }

    // Temporaries may have occupied slots while the nodes were restored.
    for p in &ordered {
        if scene.is_alive(p.node)
            && scene.parent(p.node).ok().flatten() == Some(p.parent)
            && scene.index_in_parent(p.node).ok().flatten() != Some(p.index)
            && let Err(e) = scene.insert_child(p.parent, p.index, p.node)
        {
            tracing::warn!(node = %p.node, error = %e, "could not restore sibling slot");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/pivot.rs"]
mod tests;
