//! Failure taxonomy for actions and the turn engine.
//!
//! [`ActionError::Impossible`] is the expected, user-facing refusal of an
//! action: it never consumes a turn and never mutates the world. Everything
//! else is an [`EngineError`] and terminates the run.

use specs::Entity;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("entity {entity:?} has no {component} component")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    #[error("entity {0:?} no longer exists")]
    DeadEntity(Entity),

    #[error("floor generation failed: {0}")]
    Generation(String),

    #[error("snapshot is inconsistent: {0}")]
    Snapshot(String),
}

impl EngineError {
    pub fn missing(entity: Entity, component: &'static str) -> Self {
        Self::MissingComponent { entity, component }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// A precondition of the action does not hold. The message is shown to
    /// the player verbatim.
    #[error("{0}")]
    Impossible(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl ActionError {
    pub fn impossible(message: impl Into<String>) -> Self {
        Self::Impossible(message.into())
    }
}

/// Outcome of performing an action: `Ok` means the turn was consumed.
pub type ActionResult = Result<(), ActionError>;
