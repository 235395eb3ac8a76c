//! Message-driven front of the looper, as seen by a settings panel.

pub(crate) mod messages;
pub(crate) mod store;

use crate::foundation::core::{Bounds, NodeId};
use crate::foundation::error::{LooperError, LooperResult};
use crate::looper::sequencer::{generate, revert};
use crate::looper::session::Session;
use crate::scene::graph::SceneGraph;
use crate::scene::node::Capabilities;
use messages::{EngineMessage, PanelMessage};
use store::ConfigStore;

/// What [`LooperEngine::handle`] did with a message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Handled {
    /// A loop was generated.
    Generated {
        /// The loop group, now selected.
        group: NodeId,
        /// Region the host should bring into view.
        focus: Bounds,
    },
    /// The live loop, if any, was reverted.
    Reverted,
    /// Nothing happened: the selection cannot be looped or the engine is closed.
    Ignored,
    /// The engine closed.
    Closed,
}

/// Owns a scene host, a config store and the single live [`Session`].
///
/// Requests are handled one at a time to completion. A new `create` replaces the live session
/// without reverting it.
#[derive(Debug)]
pub struct LooperEngine<S, C> {
    scene: S,
    store: C,
    session: Session,
    open: bool,
}

impl<S: SceneGraph, C: ConfigStore> LooperEngine<S, C> {
    /// Engine over `scene` persisting to `store`.
    pub fn new(scene: S, store: C) -> Self {
        Self {
            scene,
            store,
            session: Session::empty(),
            open: true,
        }
    }

    /// Startup message carrying the last persisted config.
    pub fn start(&self) -> LooperResult<EngineMessage> {
        let config = self.store.load_config()?;
        tracing::debug!(restored = config.is_some(), "engine started");
        Ok(EngineMessage::LooperConfig { config })
    }

    /// The one selected node, if it can be looped.
    pub fn selected_base(&self) -> LooperResult<NodeId> {
        let selection = self.scene.selection();
        let [node] = selection.as_slice() else {
            return Err(LooperError::unsupported_selection(format!(
                "expected exactly one selected node, found {}",
                selection.len()
            )));
        };
        let kind = self.scene.kind(*node)?;
        if !kind.capabilities().contains(Capabilities::LOOPABLE) {
            return Err(LooperError::unsupported_selection(format!(
                "node {node} of kind {kind:?} cannot be looped"
            )));
        }
        Ok(*node)
    }

    /// Selection notification for the panel.
    pub fn selection_message(&self) -> EngineMessage {
        EngineMessage::SelectionChange {
            selection: self.selected_base().is_ok(),
        }
    }

    /// Dispatch one panel message.
    ///
    /// A `create` with an unloopable selection is ignored rather than reported.
    #[tracing::instrument(skip(self, message), fields(message = message.kind()))]
    pub fn handle(&mut self, message: PanelMessage) -> LooperResult<Handled> {
        if !self.open {
            tracing::warn!("engine closed; message dropped");
            return Ok(Handled::Ignored);
        }

        match message {
            PanelMessage::Create(config) => {
                self.store.save_config(&config)?;
                let base = match self.selected_base() {
                    Ok(base) => base,
                    Err(LooperError::UnsupportedSelection(reason)) => {
                        tracing::debug!(%reason, "create ignored");
                        return Ok(Handled::Ignored);
                    }
                    Err(e) => return Err(e),
                };
                let session = generate(&mut self.scene, base, &config)?;
                let handled = match session.record() {
                    Some(record) => Handled::Generated {
                        group: record.group,
                        focus: record.focus,
                    },
                    None => Handled::Ignored,
                };
                self.session = session;
                Ok(handled)
            }
            PanelMessage::Delete => {
                revert(&mut self.scene, &mut self.session)?;
                Ok(Handled::Reverted)
            }
            PanelMessage::Cancel => {
                self.open = false;
                tracing::info!("engine closed");
                Ok(Handled::Closed)
            }
        }
    }

    /// Return `true` until a `cancel` arrives.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The live session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The scene host.
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Mutable access to the scene host, e.g. to change the selection.
    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    /// The config store.
    pub fn store(&self) -> &C {
        &self.store
    }

    /// Take the scene host and store back.
    pub fn into_parts(self) -> (S, C) {
        (self.scene, self.store)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/engine.rs"]
mod tests;
