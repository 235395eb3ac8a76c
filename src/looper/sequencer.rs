//! Loop generation and its single-level undo.
//!
//! The group produced by [`generate`] stacks the copies below the base, newest at the bottom:
//! `[copy n-1, ..., copy 1, base]`. Iteration 1 therefore sits directly beneath the base.

use crate::foundation::core::{Bounds, NodeId};
use crate::foundation::error::{LooperError, LooperResult};
use crate::foundation::math;
use crate::looper::config::IterationConfig;
use crate::looper::session::{LoopRecord, Session};
use crate::looper::state::{IterationState, base_style};
use crate::scene::graph::{SceneGraph, reparent_keeping_absolute};
use crate::scene::snapshot::ShapeSnapshot;
use crate::transform::pivot::rotate_around_pivot;

/// Generate `iterations - 1` transformed copies of `base` and group them with it.
///
/// The config is validated before anything is touched. A scene failure part-way through is
/// returned as is; copies created up to that point stay in the scene.
#[tracing::instrument(skip(scene, config), fields(iterations = config.iterations))]
pub fn generate<S: SceneGraph + ?Sized>(
    scene: &mut S,
    base: NodeId,
    config: &IterationConfig,
) -> LooperResult<Session> {
    config.validate()?;

    let snapshot = ShapeSnapshot::capture(scene, base)?;
    let base_parent = scene
        .parent(base)?
        .ok_or_else(|| LooperError::validation(format!("base node {base} has no parent")))?;
    let base_index = scene.index_in_parent(base)?.unwrap_or(0);

    let states: Vec<IterationState> = (1..config.iterations)
        .map(|i| IterationState::compute(&snapshot, config, i))
        .collect();

    scene.set_style(base, base_style(&snapshot, config))?;

    let mut generated = Vec::with_capacity(states.len());
    for state in &states {
        let node = apply_state(scene, base, state).inspect_err(|e| {
            tracing::error!(
                iteration = state.iteration,
                created = generated.len(),
                error = %e,
                "loop generation aborted"
            );
        })?;
        tracing::debug!(iteration = state.iteration, node = %node, "copy placed");
        generated.push(node);
    }

    let members: Vec<NodeId> = generated
        .iter()
        .rev()
        .copied()
        .chain(std::iter::once(base))
        .collect();
    let group = scene.group_nodes(&members, base_parent, base_index)?;
    let focus = Bounds::from(scene.absolute_bounds(group)?);
    scene.set_selection(vec![group]);

    tracing::info!(copies = generated.len(), group = %group, "loop generated");

    Ok(Session::new(LoopRecord {
        base,
        base_parent,
        base_index,
        base_style: snapshot.style,
        generated,
        group,
        focus,
    }))
}

/// Clone the base and give the clone `state` in one pass.
fn apply_state<S: SceneGraph + ?Sized>(
    scene: &mut S,
    base: NodeId,
    state: &IterationState,
) -> LooperResult<NodeId> {
    let node = scene.clone_node(base)?;
    scene.set_relative_transform(node, state.transform)?;

    let size = scene.size(node)?;
    if !math::approx_eq(size.width, state.size.width, math::EPSILON)
        || !math::approx_eq(size.height, state.size.height, math::EPSILON)
    {
        scene.resize(node, state.size)?;
    }

    scene.set_style(node, state.style)?;

    if let Some(angle) = state.rotation_delta {
        rotate_around_pivot(scene, &[node], angle, state.pivot)?;
    }
    Ok(node)
}

/// Undo the generation recorded in `session` and leave the session empty.
///
/// Copies the user already deleted are skipped. The base goes back to its recorded parent and
/// slot if it is still inside the loop group, and gets its previous style back.
#[tracing::instrument(skip(scene, session))]
pub fn revert<S: SceneGraph + ?Sized>(scene: &mut S, session: &mut Session) -> LooperResult<()> {
    let Some(record) = session.take() else {
        tracing::debug!("no live session; nothing to revert");
        return Ok(());
    };

    let mut removed = 0usize;
    for node in &record.generated {
        if scene.is_alive(*node) {
            scene.remove_node(*node)?;
            removed += 1;
        } else {
            tracing::warn!(node = %node, "generated copy already deleted");
        }
    }

    if scene.is_alive(record.base) {
        let in_group =
            scene.is_alive(record.group) && scene.parent(record.base)? == Some(record.group);
        if in_group && scene.is_alive(record.base_parent) {
            reparent_keeping_absolute(scene, record.base, record.base_parent, record.base_index)?;
        }
        scene.set_style(record.base, record.base_style)?;
        scene.set_selection(vec![record.base]);
    } else {
        tracing::warn!(node = %record.base, "base shape already deleted");
    }

    if scene.is_alive(record.group) && scene.children(record.group)?.is_empty() {
        scene.remove_node(record.group)?;
    }

    tracing::info!(removed, "loop reverted");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/looper/sequencer.rs"]
mod tests;
