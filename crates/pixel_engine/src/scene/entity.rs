//! Entity traits and handles
//!
//! An entity is a named owner of one component subtree, representing a
//! logical in-game object. Every entity exclusively owns a private root
//! component (named `"Root"`, created with the entity at its spawn
//! position); the entity's position is always the root component's
//! position — no separate state exists to fall out of sync.
//!
//! Entities follow the same sealed two-phase construction as components:
//! [`Scene::spawn_entity`] wires the root component first, then runs the
//! type's [`Entity::on_spawn`].

use std::any::Any;

use crate::input::{KeyCode, KeyModifiers};
use crate::scene::component::Capabilities;
use crate::scene::error::SceneError;
use crate::scene::scene::Scene;

slotmap::new_key_type! {
    /// Handle to an entity owned by a [`Scene`]
    pub struct EntityId;
}

/// Per-frame and lifecycle hooks of a live entity
#[allow(unused_variables)]
pub trait EntityHooks: Any {
    /// Called every tick for types declaring [`Capabilities::UPDATE`]
    fn on_update(&mut self, scene: &mut Scene, me: EntityId, delta: f32) {}

    /// Called every time a key is pressed, for every live entity
    fn on_key_press(
        &mut self,
        scene: &mut Scene,
        me: EntityId,
        key: KeyCode,
        modifiers: KeyModifiers,
    ) {
    }

    /// Called every time a key is released, for every live entity
    fn on_key_release(
        &mut self,
        scene: &mut Scene,
        me: EntityId,
        key: KeyCode,
        modifiers: KeyModifiers,
    ) {
    }

    /// Called right before this entity is dropped from the scene
    ///
    /// Fires before the root component subtree is destroyed.
    fn on_destroy(&mut self, scene: &mut Scene, me: EntityId) {}
}

/// A spawnable entity type
pub trait Entity: EntityHooks + Sized {
    /// Arguments consumed by [`Entity::on_spawn`]
    type Args;

    /// Per-frame calls this type participates in
    ///
    /// Only [`Capabilities::UPDATE`] is meaningful for entities; entities
    /// never render directly — their components do.
    const CAPABILITIES: Capabilities = Capabilities::empty();

    /// The default display name for entities of this type
    fn type_name() -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Phase-B initializer: build the behavior value
    ///
    /// The root component already exists at the spawn position; create
    /// this entity's components with
    /// [`Scene::spawn_entity_component`].
    fn on_spawn(scene: &mut Scene, me: EntityId, args: Self::Args) -> Result<Self, SceneError>;
}
