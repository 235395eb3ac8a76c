use crate::foundation::core::NodeId;
use std::fmt;

/// Crate-wide result alias.
pub type LooperResult<T> = Result<T, LooperError>;

/// Errors produced by the looper core, its scene hosts and its persistence layer.
#[derive(thiserror::Error, Debug)]
pub enum LooperError {
    /// Generic invariant violation.
    #[error("validation error: {0}")]
    Validation(String),

    /// An iteration config was rejected before any node was touched.
    #[error("invalid config: {0}")]
    Config(#[from] ConfigErrors),

    /// The selection is empty, ambiguous or of a kind that cannot be looped.
    #[error("unsupported selection: {0}")]
    UnsupportedSelection(String),

    /// The scene host does not know (or no longer holds) this node.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// The scene host rejected a mutation.
    #[error("scene mutation failed: {0}")]
    SceneMutation(String),

    /// Config or scene (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Filesystem access failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LooperError {
    /// Build a [`LooperError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LooperError::UnsupportedSelection`].
    pub fn unsupported_selection(msg: impl Into<String>) -> Self {
        Self::UnsupportedSelection(msg.into())
    }

    /// Build a [`LooperError::SceneMutation`].
    pub fn scene(msg: impl Into<String>) -> Self {
        Self::SceneMutation(msg.into())
    }

    /// Build a [`LooperError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

/// One rejected config field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    /// Serialized field name, e.g. `opacityEnd`.
    pub field: &'static str,
    /// Human readable reason.
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$.{}: {}", self.field, self.message)
    }
}

/// All field errors found while validating one config.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigErrors {
    /// Offending fields in declaration order.
    pub errors: Vec<FieldError>,
}

impl ConfigErrors {
    pub(crate) fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Return `true` when no field was rejected.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Names of the offending fields.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.iter().map(|e| e.field)
    }

    pub(crate) fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigErrors {}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
