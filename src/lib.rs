//! Looper generates a sequence of transformed copies of one design-canvas shape.
//!
//! Each copy `i` is offset, scaled and rotated by `i` steps of the configured deltas, and its
//! opacity, fill, stroke and stroke weight are linearly interpolated across the sequence. The
//! copies and the base are grouped so a single undo can remove them.
//!
//! - Describe the loop with an [`IterationConfig`]
//! - Run [`generate`] against any [`SceneGraph`] host and keep the returned [`Session`]
//! - Call [`revert`] to undo, or drive both through a [`LooperEngine`] with panel messages
//!
//! [`MemoryScene`] is the in-crate reference host.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod engine;
mod foundation;
mod looper;
mod scene;
mod style;
mod transform;

pub use crate::foundation::core::{Affine, Bounds, NodeId, Point, Rect, Size, Vec2};
pub use crate::foundation::error::{ConfigErrors, FieldError, LooperError, LooperResult};

pub use crate::animation::ramp::{Ramp, RampValue, value_at};
pub use crate::engine::messages::{EngineMessage, PanelMessage};
pub use crate::engine::store::{CONFIG_KEY, ConfigStore, JsonFileStore, MemoryStore};
pub use crate::engine::{Handled, LooperEngine};
pub use crate::looper::config::{IterationConfig, MAX_ITERATIONS, MIN_SCALE_DELTA};
pub use crate::looper::sequencer::{generate, revert};
pub use crate::looper::session::{LoopRecord, Session};
pub use crate::looper::state::{IterationState, base_style};
pub use crate::scene::graph::{SceneGraph, reparent_keeping_absolute};
pub use crate::scene::memory::{MIN_SIZE, MemoryScene, NodeDoc, SceneDoc};
pub use crate::scene::node::{Capabilities, NodeKind, ShapeKind};
pub use crate::scene::snapshot::ShapeSnapshot;
pub use crate::style::color::{Rgb, hex_to_rgb, parse_hex_input, rgb_to_hex};
pub use crate::style::paint::{NodeStyle, SolidPaint};
pub use crate::transform::pivot::{Pivot, PivotUnit, rotate_around_pivot};
