//! Component traits and handles
//!
//! A component is a positioned node in a scene's object tree. Its state
//! lives in the scene's arena; its behavior lives in a user type
//! implementing [`Component`]. Construction is strictly two-phase: the
//! scene wires position, parent and registration first (Phase A), and
//! only then runs the type's [`Component::on_spawn`] (Phase B). Because
//! the arena node type and every insertion path are private to the scene
//! module, user code cannot construct a half-wired component — the
//! factory methods on [`Scene`] are the only entry points.

use std::any::Any;

use crate::render::{RenderBackend, RenderError};
use crate::scene::error::SceneError;
use crate::scene::scene::Scene;

slotmap::new_key_type! {
    /// Handle to a component owned by a [`Scene`]
    pub struct ComponentId;
}

bitflags::bitflags! {
    /// What per-frame calls a component (or entity) type participates in
    ///
    /// Declared as an associated const on the type, read once at spawn
    /// time to decide registration. A type that does not declare
    /// [`Capabilities::UPDATE`] is never polled, no matter what hooks it
    /// happens to implement.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u8 {
        /// Receives `on_update` every tick
        const UPDATE = 1 << 0;
        /// Receives a direct `on_render` call after the shared batch
        const RENDER = 1 << 1;
    }
}

/// Per-frame and lifecycle hooks of a live component
///
/// All hooks receive the owning [`Scene`] and the component's own handle;
/// the behavior value is temporarily checked out of the arena while a
/// hook runs, so hooks are free to mutate the scene — spawn children,
/// move other components, request destroys (applied at the next phase
/// boundary).
#[allow(unused_variables)]
pub trait ComponentHooks: Any {
    /// Called every tick for types declaring [`Capabilities::UPDATE`]
    fn on_update(&mut self, scene: &mut Scene, me: ComponentId, delta: f32) {}

    /// Called once per frame, after the shared batch, for types
    /// declaring [`Capabilities::RENDER`]
    fn on_render(
        &mut self,
        scene: &mut Scene,
        me: ComponentId,
        backend: &mut dyn RenderBackend,
    ) -> Result<(), RenderError> {
        Ok(())
    }

    /// Called whenever this component's world position is written,
    /// including writes that do not change the value
    fn on_position_change(&mut self, scene: &mut Scene, me: ComponentId) {}

    /// Called when this component transitions between shown and hidden
    ///
    /// The default implementation reports the hook as unimplemented;
    /// components that are toggled at runtime must override it.
    fn on_visibility_change(
        &mut self,
        scene: &mut Scene,
        me: ComponentId,
        visible: bool,
    ) -> Result<(), SceneError> {
        Err(SceneError::HookNotImplemented {
            hook: "on_visibility_change",
            component: scene
                .name_of(me)
                .map(str::to_owned)
                .unwrap_or_else(|_| "<unknown>".to_owned()),
        })
    }

    /// Called right before this component is dropped from the scene
    ///
    /// Children are destroyed before their parent. Free batch primitives
    /// here; the scene handles all registry removal itself.
    fn on_destroy(&mut self, scene: &mut Scene, me: ComponentId) {}
}

/// A spawnable component type
///
/// Implementors define their construction arguments and their Phase-B
/// initializer. `on_spawn` runs with the node fully wired: the position,
/// parent link and scene registration supplied to the spawn call are
/// already in place and readable through `scene`.
pub trait Component: ComponentHooks + Sized {
    /// Arguments consumed by [`Component::on_spawn`]
    type Args;

    /// Per-frame calls this type participates in
    const CAPABILITIES: Capabilities = Capabilities::empty();

    /// The default display name for components of this type
    ///
    /// Used when the spawn call does not supply a name.
    fn type_name() -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Phase-B initializer: build the behavior value
    ///
    /// `me` is already live — `scene.position_of(me)`,
    /// `scene.parent_of(me)` and the batch are all usable, and children
    /// may be spawned under it. Returning an error aborts the spawn and
    /// tears down anything this initializer created.
    fn on_spawn(scene: &mut Scene, me: ComponentId, args: Self::Args) -> Result<Self, SceneError>;
}
