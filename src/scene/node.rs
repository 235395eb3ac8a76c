use serde::{Deserialize, Serialize};
use std::ops::BitOr;

/// Concrete shape categories a host can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    /// Free-form vector path.
    Vector,
    /// Star primitive.
    Star,
    /// Line primitive.
    Line,
    /// Ellipse primitive.
    Ellipse,
    /// Regular polygon primitive.
    Polygon,
    /// Rectangle primitive.
    Rectangle,
    /// Text layer.
    Text,
}

/// Node categories in a scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "shape", rename_all = "kebab-case")]
pub enum NodeKind {
    /// Scene root. Owns the absolute coordinate space.
    Page,
    /// Frame-like container with its own coordinate space.
    Container,
    /// Transparent group whose frame is derived from its children.
    Group,
    /// Leaf shape.
    Shape(ShapeKind),
}

/// Capability set of a node kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Capabilities(u8);

impl Capabilities {
    /// No capabilities.
    pub const NONE: Self = Self(0);
    /// Has a settable position.
    pub const POSITIONABLE: Self = Self(1 << 0);
    /// Can be resized.
    pub const RESIZABLE: Self = Self(1 << 1);
    /// Can be rotated.
    pub const ROTATABLE: Self = Self(1 << 2);
    /// Carries a fill paint.
    pub const FILLABLE: Self = Self(1 << 3);
    /// Carries a stroke paint and weight.
    pub const STROKEABLE: Self = Self(1 << 4);

    /// What the looper needs from a base shape.
    pub const LOOPABLE: Self =
        Self(Self::POSITIONABLE.0 | Self::RESIZABLE.0 | Self::ROTATABLE.0);

    /// Return `true` when every capability in `other` is present.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl NodeKind {
    /// Capabilities of this kind.
    ///
    /// Containers are only used as temporary pivots here and are never resized by the looper,
    /// so they do not qualify as loopable.
    pub fn capabilities(self) -> Capabilities {
        use Capabilities as C;
        match self {
            Self::Page => C::NONE,
            Self::Container => C::POSITIONABLE | C::ROTATABLE,
            Self::Group => C::LOOPABLE,
            Self::Shape(_) => C::LOOPABLE | C::FILLABLE | C::STROKEABLE,
        }
    }

    /// Return `true` when this kind may hold children.
    pub fn has_children(self) -> bool {
        matches!(self, Self::Page | Self::Container | Self::Group)
    }

    /// Return `true` when this kind establishes its own coordinate space.
    pub fn owns_coordinate_space(self) -> bool {
        matches!(self, Self::Page | Self::Container)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/node.rs"]
mod tests;
