//! Error types for scene-graph operations

use crate::render::RenderError;
use crate::scene::component::ComponentId;
use crate::scene::entity::EntityId;

/// Result type for scene operations
pub type SceneResult<T> = Result<T, SceneError>;

/// Errors raised by scene bookkeeping and construction
///
/// Everything here is a programmer error or a construction failure; the
/// scene never catches and suppresses these itself.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// A component handle did not resolve to a live component
    #[error("component {0:?} is not registered in this scene")]
    ComponentNotRegistered(ComponentId),

    /// An entity handle did not resolve to a live entity
    #[error("entity {0:?} is not registered in this scene")]
    EntityNotRegistered(EntityId),

    /// The child is already attached to that parent
    #[error("component {child:?} is already a child of {parent:?}")]
    DuplicateChild {
        /// The parent of the attempted attach
        parent: ComponentId,
        /// The child of the attempted attach
        child: ComponentId,
    },

    /// The child is not attached to that parent
    #[error("component {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// The parent of the attempted detach
        parent: ComponentId,
        /// The child of the attempted detach
        child: ComponentId,
    },

    /// Attaching would make the tree cyclic
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCycle {
        /// The parent of the attempted attach
        parent: ComponentId,
        /// The child of the attempted attach
        child: ComponentId,
    },

    /// A required hook was exercised but the type does not implement it
    #[error("`{hook}` is not implemented by component `{component}`")]
    HookNotImplemented {
        /// Name of the missing hook
        hook: &'static str,
        /// Name of the offending component
        component: String,
    },

    /// A typed access did not match the component's concrete type
    #[error("component {id:?} is not a `{expected}`")]
    ComponentTypeMismatch {
        /// The component that was accessed
        id: ComponentId,
        /// The type the caller asked for
        expected: &'static str,
    },

    /// A user `on_spawn` reported a construction failure
    #[error("spawn failed: {0}")]
    Spawn(String),

    /// A rendering failure surfaced through a scene operation
    #[error(transparent)]
    Render(#[from] RenderError),
}
