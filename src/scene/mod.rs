pub(crate) mod graph;
pub(crate) mod memory;
pub(crate) mod node;
pub(crate) mod snapshot;
