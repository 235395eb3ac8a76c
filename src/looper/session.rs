use crate::foundation::core::{Bounds, NodeId};
use crate::style::paint::NodeStyle;

/// What one generation left in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopRecord {
    /// The base shape.
    pub base: NodeId,
    /// Parent the base had before generation.
    pub base_parent: NodeId,
    /// Sibling slot the base had before generation.
    pub base_index: usize,
    /// Style the base had before generation.
    pub base_style: NodeStyle,
    /// Generated copies in iteration order.
    pub generated: Vec<NodeId>,
    /// Group holding the base and its copies.
    pub group: NodeId,
    /// Page-space bounds of the group right after generation.
    pub focus: Bounds,
}

/// Undo handle for the most recent generation.
///
/// Either empty or holding one [`LoopRecord`]. Reverting consumes the record, so a second revert
/// is a no-op.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    record: Option<LoopRecord>,
}

impl Session {
    /// Session with nothing to revert.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(record: LoopRecord) -> Self {
        Self {
            record: Some(record),
        }
    }

    /// Return `true` when there is nothing to revert.
    pub fn is_empty(&self) -> bool {
        self.record.is_none()
    }

    /// The live record, if any.
    pub fn record(&self) -> Option<&LoopRecord> {
        self.record.as_ref()
    }

    /// Generated copies in iteration order; empty for an empty session.
    pub fn generated(&self) -> &[NodeId] {
        self.record.as_ref().map_or(&[], |r| r.generated.as_slice())
    }

    /// The loop group, if any.
    pub fn group(&self) -> Option<NodeId> {
        self.record.as_ref().map(|r| r.group)
    }

    pub(crate) fn take(&mut self) -> Option<LoopRecord> {
        self.record.take()
    }
}
