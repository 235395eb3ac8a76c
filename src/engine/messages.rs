use crate::looper::config::IterationConfig;
use serde::{Deserialize, Serialize};

/// Requests sent by the settings panel.
///
/// Wire form is a JSON object tagged on `type`; `create` carries the config fields inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PanelMessage {
    /// Generate a loop from the current selection.
    Create(IterationConfig),
    /// Revert the live loop.
    #[serde(alias = "revert")]
    Delete,
    /// Close the engine.
    Cancel,
}

impl PanelMessage {
    /// Wire tag of this message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Delete => "delete",
            Self::Cancel => "cancel",
        }
    }
}

/// Notifications sent to the settings panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EngineMessage {
    /// Whether the current selection can be looped.
    SelectionChange {
        /// `true` iff exactly one loopable node is selected.
        selection: bool,
    },
    /// Last persisted config, sent once at startup.
    LooperConfig {
        /// `None` when nothing was stored yet.
        config: Option<IterationConfig>,
    },
}

#[cfg(test)]
#[path = "../../tests/unit/engine/messages.rs"]
mod tests;
