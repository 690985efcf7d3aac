//! The scene: arena, registries and the per-frame driver
//!
//! A [`Scene`] owns every live component and entity, the camera used to
//! project them and the batch renderer they draw through. It is the only
//! code that mutates the object tree's bookkeeping, which is what keeps
//! the registration invariants intact:
//!
//! - the component arena is the authoritative set of live components;
//! - `renderable` and `updatable` are derived subsets, filled from each
//!   type's declared [`Capabilities`] at spawn time and drained exactly
//!   once at destroy time;
//! - a child's `parent` back-index and its membership in the parent's
//!   child list always agree.
//!
//! A frame is `update(delta)` followed by `render(backend)`. Destroy
//! requests raised from inside hooks are queued and applied at the end of
//! the running phase; spawns apply immediately (hook iteration works on
//! id snapshots, so fresh arena insertions are safe).

use slotmap::SlotMap;
use std::any::Any;

use crate::foundation::math::Vec2;
use crate::input::{KeyCode, KeyModifiers};
use crate::render::{BatchRenderer, Camera, PixelCamera, RenderBackend, RenderError};
use crate::scene::component::{Capabilities, Component, ComponentHooks, ComponentId};
use crate::scene::entity::{Entity, EntityHooks, EntityId};
use crate::scene::error::{SceneError, SceneResult};

/// Default number of batch layers for a new scene
const DEFAULT_BATCH_LAYERS: u8 = 10;

/// Name reserved for every entity's private root component
const ROOT_COMPONENT_NAME: &str = "Root";

/// Arena slot for one component
struct ComponentNode {
    name: String,
    position: Vec2,
    parent: Option<ComponentId>,
    children: Vec<ComponentId>,
    visible: bool,
    hooks: Option<Box<dyn ComponentHooks>>,
}

/// Arena slot for one entity
struct EntityNode {
    name: String,
    root: ComponentId,
    hooks: Option<Box<dyn EntityHooks>>,
}

/// One registered receiver of per-tick updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdateTarget {
    Component(ComponentId),
    Entity(EntityId),
}

/// A destroy request deferred to the next phase boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DestroyRequest {
    Component(ComponentId),
    Entity(EntityId),
}

/// Scene-level lifecycle hooks
///
/// The controller plays the role a scene subclass plays elsewhere: scene
/// setup in `on_load`, scene-wide logic in `on_update` (which fires once
/// per tick, before any registered component or entity).
#[allow(unused_variables)]
pub trait SceneHooks: Any {
    /// Called once when the controller is installed into a scene
    fn on_load(&mut self, scene: &mut Scene) {}

    /// Called first on every tick
    fn on_update(&mut self, scene: &mut Scene, delta: f32) {}
}

/// A registry and per-frame driver for entities and components, plus one
/// camera and one render batch
pub struct Scene {
    name: String,
    components: SlotMap<ComponentId, ComponentNode>,
    entities: SlotMap<EntityId, EntityNode>,
    /// Entity spawn order; drives deterministic key dispatch
    entity_order: Vec<EntityId>,
    /// Components receiving direct render calls, in registration order
    renderable: Vec<ComponentId>,
    /// Update receivers in registration order
    updatable: Vec<UpdateTarget>,
    camera: Box<dyn Camera>,
    batch: BatchRenderer,
    controller: Option<Box<dyn SceneHooks>>,
    pending_destroys: Vec<DestroyRequest>,
    /// True while user hooks are running; destroys defer while set
    hooks_active: bool,
}

impl Scene {
    /// Create a scene with the default camera and batch layer count
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_layers(name, DEFAULT_BATCH_LAYERS)
    }

    /// Create a scene with an explicit batch layer count
    pub fn with_layers(name: impl Into<String>, batch_layers: u8) -> Self {
        let name = name.into();
        log::info!("created scene '{}'", name);
        Self {
            name,
            components: SlotMap::with_key(),
            entities: SlotMap::with_key(),
            entity_order: Vec::new(),
            renderable: Vec::new(),
            updatable: Vec::new(),
            camera: Box::new(PixelCamera::default()),
            batch: BatchRenderer::new(batch_layers),
            controller: None,
            pending_destroys: Vec::new(),
            hooks_active: false,
        }
    }

    /// The scene's display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Install the scene controller and run its `on_load`
    pub fn set_controller(&mut self, controller: Box<dyn SceneHooks>) {
        self.controller = Some(controller);
        let was_active = self.hooks_active;
        self.hooks_active = true;
        if let Some(mut ctrl) = self.controller.take() {
            ctrl.on_load(self);
            if self.controller.is_none() {
                self.controller = Some(ctrl);
            }
        }
        self.hooks_active = was_active;
        if !was_active {
            self.apply_pending_destroys();
        }
    }

    /// Replace the camera used to render this scene
    pub fn use_camera(&mut self, camera: Box<dyn Camera>) {
        self.camera = camera;
    }

    /// The scene's camera
    pub fn camera(&self) -> &dyn Camera {
        self.camera.as_ref()
    }

    /// Mutable access to the scene's camera
    pub fn camera_mut(&mut self) -> &mut dyn Camera {
        self.camera.as_mut()
    }

    /// The scene's shared batch renderer
    pub fn batch(&self) -> &BatchRenderer {
        &self.batch
    }

    /// Mutable access to the scene's shared batch renderer
    pub fn batch_mut(&mut self) -> &mut BatchRenderer {
        &mut self.batch
    }

    // -------------------------------------------------------------------
    // Spawning
    // -------------------------------------------------------------------

    /// Spawn a parentless component at a world position
    ///
    /// Phase A wires the arena node, then `T::on_spawn` runs (Phase B),
    /// then the component is registered according to `T::CAPABILITIES`.
    /// Construction errors propagate; nothing of a failed spawn survives.
    pub fn spawn_component<T: Component>(
        &mut self,
        position: Vec2,
        args: T::Args,
    ) -> SceneResult<ComponentId> {
        self.spawn_inner::<T>(position, None, None, args)
    }

    /// Spawn a component as a child of an existing component
    ///
    /// `position` is in world space, exactly as for parentless spawns;
    /// the local offset follows from the parent's current position.
    pub fn spawn_child<T: Component>(
        &mut self,
        parent: ComponentId,
        position: Vec2,
        args: T::Args,
    ) -> SceneResult<ComponentId> {
        self.spawn_inner::<T>(position, Some(parent), None, args)
    }

    /// Spawn a component under an entity's root component
    pub fn spawn_entity_component<T: Component>(
        &mut self,
        entity: EntityId,
        position: Vec2,
        args: T::Args,
    ) -> SceneResult<ComponentId> {
        let root = self.entity_root(entity)?;
        self.spawn_inner::<T>(position, Some(root), None, args)
    }

    /// Spawn an entity at a world position
    ///
    /// The entity's private root component is created first, so
    /// `T::on_spawn` can immediately hang components off it.
    pub fn spawn_entity<T: Entity>(&mut self, position: Vec2, args: T::Args) -> SceneResult<EntityId> {
        let root = self.components.insert(ComponentNode {
            name: ROOT_COMPONENT_NAME.to_owned(),
            position,
            parent: None,
            children: Vec::new(),
            visible: true,
            hooks: None,
        });
        let id = self.entities.insert(EntityNode {
            name: T::type_name().to_owned(),
            root,
            hooks: None,
        });
        self.entity_order.push(id);

        let was_active = self.hooks_active;
        self.hooks_active = true;
        let spawned = T::on_spawn(self, id, args);
        self.hooks_active = was_active;

        let result = match spawned {
            Ok(behavior) => {
                let Some(node) = self.entities.get_mut(id) else {
                    return Err(SceneError::Spawn(format!(
                        "entity `{}` vanished during its own spawn",
                        T::type_name()
                    )));
                };
                node.hooks = Some(Box::new(behavior));
                if T::CAPABILITIES.contains(Capabilities::UPDATE) {
                    self.updatable.push(UpdateTarget::Entity(id));
                }
                log::debug!(
                    "spawned entity '{}' ({} components)",
                    T::type_name(),
                    self.collect_postorder(root).len()
                );
                Ok(id)
            }
            Err(e) => {
                log::warn!("spawn of entity '{}' failed: {}", T::type_name(), e);
                if self.components.contains_key(root) {
                    self.destroy_component_now(root);
                }
                self.entity_order.retain(|other| *other != id);
                self.entities.remove(id);
                Err(e)
            }
        };
        if !was_active {
            self.apply_pending_destroys();
        }
        result
    }

    fn spawn_inner<T: Component>(
        &mut self,
        position: Vec2,
        parent: Option<ComponentId>,
        name: Option<String>,
        args: T::Args,
    ) -> SceneResult<ComponentId> {
        if let Some(p) = parent {
            if !self.components.contains_key(p) {
                return Err(SceneError::ComponentNotRegistered(p));
            }
        }
        let name = name.unwrap_or_else(|| T::type_name().to_owned());

        // Phase A: the node exists, wired, before any user code runs.
        let id = self.components.insert(ComponentNode {
            name,
            position,
            parent,
            children: Vec::new(),
            visible: true,
            hooks: None,
        });
        if let Some(p) = parent {
            if let Some(parent_node) = self.components.get_mut(p) {
                parent_node.children.push(id);
            }
        }

        // Phase B: the type's own initializer. Destroys requested here
        // defer like any other hook's.
        let was_active = self.hooks_active;
        self.hooks_active = true;
        let spawned = T::on_spawn(self, id, args);
        self.hooks_active = was_active;

        let result = match spawned {
            Ok(behavior) => {
                let Some(node) = self.components.get_mut(id) else {
                    return Err(SceneError::Spawn(format!(
                        "component `{}` vanished during its own spawn",
                        T::type_name()
                    )));
                };
                node.hooks = Some(Box::new(behavior));
                let component_name = node.name.clone();
                if T::CAPABILITIES.contains(Capabilities::RENDER) {
                    self.renderable.push(id);
                }
                if T::CAPABILITIES.contains(Capabilities::UPDATE) {
                    self.updatable.push(UpdateTarget::Component(id));
                }
                log::debug!("spawned component '{}' ({:?})", component_name, id);
                Ok(id)
            }
            Err(e) => {
                log::warn!("spawn of component '{}' failed: {}", T::type_name(), e);
                // Tear down the partial subtree; completed children still
                // get their on_destroy, the failed node has no hooks yet.
                if self.components.contains_key(id) {
                    self.destroy_component_now(id);
                }
                Err(e)
            }
        };
        if !was_active {
            self.apply_pending_destroys();
        }
        result
    }

    // -------------------------------------------------------------------
    // Destruction
    // -------------------------------------------------------------------

    /// Destroy a component and its whole subtree
    ///
    /// `on_destroy` fires leaf-first, then every node is removed from the
    /// registries it was spawned into. Destroying a component that is not
    /// registered is an error. Called from inside a hook, the request is
    /// queued and applied at the end of the running phase.
    pub fn destroy_component(&mut self, id: ComponentId) -> SceneResult<()> {
        if !self.components.contains_key(id) {
            return Err(SceneError::ComponentNotRegistered(id));
        }
        if self.hooks_active {
            self.queue_destroy(DestroyRequest::Component(id));
            return Ok(());
        }
        self.destroy_component_now(id);
        self.apply_pending_destroys();
        Ok(())
    }

    /// Destroy an entity, its root component and all its components
    pub fn destroy_entity(&mut self, id: EntityId) -> SceneResult<()> {
        if !self.entities.contains_key(id) {
            return Err(SceneError::EntityNotRegistered(id));
        }
        if self.hooks_active {
            self.queue_destroy(DestroyRequest::Entity(id));
            return Ok(());
        }
        self.destroy_entity_now(id);
        self.apply_pending_destroys();
        Ok(())
    }

    fn queue_destroy(&mut self, request: DestroyRequest) {
        if !self.pending_destroys.contains(&request) {
            log::trace!("deferring mid-frame destroy of {:?}", request);
            self.pending_destroys.push(request);
        }
    }

    fn destroy_component_now(&mut self, id: ComponentId) {
        let order = self.collect_postorder(id);

        // Leaf-first hooks; nested destroy requests defer.
        let was_active = self.hooks_active;
        self.hooks_active = true;
        for &target in &order {
            let hooks = self.components.get_mut(target).and_then(|n| n.hooks.take());
            if let Some(mut hooks) = hooks {
                hooks.on_destroy(self, target);
            }
        }
        self.hooks_active = was_active;

        // Detach from the parent before the nodes disappear.
        if let Some(parent) = self.components.get(id).and_then(|n| n.parent) {
            if let Some(parent_node) = self.components.get_mut(parent) {
                parent_node.children.retain(|child| *child != id);
            }
        }
        for &target in &order {
            self.unregister_component(target);
            self.components.remove(target);
        }
        log::debug!("destroyed component subtree ({} nodes)", order.len());
    }

    fn destroy_entity_now(&mut self, id: EntityId) {
        let hooks = self.entities.get_mut(id).and_then(|n| n.hooks.take());
        if let Some(mut hooks) = hooks {
            let was_active = self.hooks_active;
            self.hooks_active = true;
            hooks.on_destroy(self, id);
            self.hooks_active = was_active;
        }

        if let Some(root) = self.entities.get(id).map(|n| n.root) {
            if self.components.contains_key(root) {
                self.destroy_component_now(root);
            }
        }
        self.updatable
            .retain(|target| *target != UpdateTarget::Entity(id));
        self.entity_order.retain(|other| *other != id);
        if let Some(node) = self.entities.remove(id) {
            log::debug!("destroyed entity '{}'", node.name);
        }
    }

    fn unregister_component(&mut self, id: ComponentId) {
        self.renderable.retain(|other| *other != id);
        self.updatable
            .retain(|target| *target != UpdateTarget::Component(id));
    }

    fn apply_pending_destroys(&mut self) {
        while !self.pending_destroys.is_empty() {
            let batch: Vec<DestroyRequest> = self.pending_destroys.drain(..).collect();
            for request in batch {
                match request {
                    DestroyRequest::Component(id) => {
                        if self.components.contains_key(id) {
                            self.destroy_component_now(id);
                        }
                    }
                    DestroyRequest::Entity(id) => {
                        if self.entities.contains_key(id) {
                            self.destroy_entity_now(id);
                        }
                    }
                }
            }
        }
    }

    // -------------------------------------------------------------------
    // Frame phases
    // -------------------------------------------------------------------

    /// Run the update phase: controller first, then every registered
    /// updatable in FIFO registration order
    ///
    /// Destroys requested by hooks are applied after the last hook
    /// returns — the post-update, pre-render fixed point.
    pub fn update(&mut self, delta: f32) {
        let was_active = self.hooks_active;
        self.hooks_active = true;

        if let Some(mut ctrl) = self.controller.take() {
            ctrl.on_update(self, delta);
            if self.controller.is_none() {
                self.controller = Some(ctrl);
            }
        }

        let targets = self.updatable.clone();
        for target in targets {
            if self.is_pending_destroy(target) {
                continue;
            }
            match target {
                UpdateTarget::Component(id) => {
                    let hooks = self.components.get_mut(id).and_then(|n| n.hooks.take());
                    if let Some(mut hooks) = hooks {
                        hooks.on_update(self, id, delta);
                        if let Some(node) = self.components.get_mut(id) {
                            if node.hooks.is_none() {
                                node.hooks = Some(hooks);
                            }
                        }
                    }
                }
                UpdateTarget::Entity(id) => {
                    let hooks = self.entities.get_mut(id).and_then(|n| n.hooks.take());
                    if let Some(mut hooks) = hooks {
                        hooks.on_update(self, id, delta);
                        if let Some(node) = self.entities.get_mut(id) {
                            if node.hooks.is_none() {
                                node.hooks = Some(hooks);
                            }
                        }
                    }
                }
            }
        }

        self.hooks_active = was_active;
        if !was_active {
            self.apply_pending_destroys();
        }
    }

    /// Run the render phase: arm the camera, draw the shared batch, then
    /// call `on_render` on every direct-rendering component
    pub fn render(&mut self, backend: &mut dyn RenderBackend) -> Result<(), RenderError> {
        self.camera.arm(backend)?;
        self.batch.render(backend)?;

        let was_active = self.hooks_active;
        self.hooks_active = true;
        let mut result = Ok(());

        let targets = self.renderable.clone();
        for id in targets {
            if self.is_pending_destroy(UpdateTarget::Component(id)) {
                continue;
            }
            let hooks = self.components.get_mut(id).and_then(|n| n.hooks.take());
            if let Some(mut hooks) = hooks {
                let hook_result = hooks.on_render(self, id, backend);
                if let Some(node) = self.components.get_mut(id) {
                    if node.hooks.is_none() {
                        node.hooks = Some(hooks);
                    }
                }
                if let Err(e) = hook_result {
                    result = Err(e);
                    break;
                }
            }
        }

        self.hooks_active = was_active;
        if !was_active {
            self.apply_pending_destroys();
        }
        result
    }

    /// Forward a key press to every live entity
    pub fn dispatch_key_press(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        self.dispatch_key(key, modifiers, true);
    }

    /// Forward a key release to every live entity
    pub fn dispatch_key_release(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        self.dispatch_key(key, modifiers, false);
    }

    fn dispatch_key(&mut self, key: KeyCode, modifiers: KeyModifiers, pressed: bool) {
        let was_active = self.hooks_active;
        self.hooks_active = true;

        for id in self.entity_order.clone() {
            if self.is_pending_destroy(UpdateTarget::Entity(id)) {
                continue;
            }
            let hooks = self.entities.get_mut(id).and_then(|n| n.hooks.take());
            if let Some(mut hooks) = hooks {
                if pressed {
                    hooks.on_key_press(self, id, key, modifiers);
                } else {
                    hooks.on_key_release(self, id, key, modifiers);
                }
                if let Some(node) = self.entities.get_mut(id) {
                    if node.hooks.is_none() {
                        node.hooks = Some(hooks);
                    }
                }
            }
        }

        self.hooks_active = was_active;
        if !was_active {
            self.apply_pending_destroys();
        }
    }

    /// Whether a target already has a queued destroy, directly or through
    /// a pending ancestor / owning entity
    fn is_pending_destroy(&self, target: UpdateTarget) -> bool {
        if self.pending_destroys.is_empty() {
            return false;
        }
        match target {
            UpdateTarget::Entity(id) => self
                .pending_destroys
                .contains(&DestroyRequest::Entity(id)),
            UpdateTarget::Component(id) => {
                let mut cursor = Some(id);
                let mut top = id;
                while let Some(current) = cursor {
                    if self
                        .pending_destroys
                        .contains(&DestroyRequest::Component(current))
                    {
                        return true;
                    }
                    top = current;
                    cursor = self.components.get(current).and_then(|n| n.parent);
                }
                // The subtree root may belong to an entity queued for destroy.
                self.pending_destroys.iter().any(|request| {
                    matches!(request, DestroyRequest::Entity(entity)
                        if self.entities.get(*entity).map(|n| n.root) == Some(top))
                })
            }
        }
    }

    // -------------------------------------------------------------------
    // Tree access and mutation
    // -------------------------------------------------------------------

    /// Get a component's world position
    pub fn position_of(&self, id: ComponentId) -> SceneResult<Vec2> {
        self.node(id).map(|n| n.position)
    }

    /// Get a component's position relative to its subtree root
    pub fn local_position_of(&self, id: ComponentId) -> SceneResult<Vec2> {
        let root = self.root_of(id)?;
        Ok(self.node(id)?.position - self.node(root)?.position)
    }

    /// Get the top-most ancestor of a component
    ///
    /// A parentless component is its own root.
    pub fn root_of(&self, id: ComponentId) -> SceneResult<ComponentId> {
        let mut current = id;
        loop {
            match self.node(current)?.parent {
                Some(parent) => current = parent,
                None => return Ok(current),
            }
        }
    }

    /// Get a component's parent, if any
    pub fn parent_of(&self, id: ComponentId) -> SceneResult<Option<ComponentId>> {
        self.node(id).map(|n| n.parent)
    }

    /// Get a component's children in attach order
    pub fn children_of(&self, id: ComponentId) -> SceneResult<&[ComponentId]> {
        self.node(id).map(|n| n.children.as_slice())
    }

    /// Get a component's display name
    pub fn name_of(&self, id: ComponentId) -> SceneResult<&str> {
        self.node(id).map(|n| n.name.as_str())
    }

    /// Whether a component is currently shown
    pub fn is_visible(&self, id: ComponentId) -> SceneResult<bool> {
        self.node(id).map(|n| n.visible)
    }

    /// Set a component's world position, translating its whole subtree
    ///
    /// Every descendant shifts by the same delta so local offsets are
    /// preserved; each touched node fires its `on_position_change` once.
    /// The write is unconditional — assigning the current position still
    /// fires the hook.
    pub fn set_position(&mut self, id: ComponentId, position: Vec2) -> SceneResult<()> {
        let node = self
            .components
            .get_mut(id)
            .ok_or(SceneError::ComponentNotRegistered(id))?;
        let delta = position - node.position;
        node.position = position;

        // Destroys requested from position hooks wait for the cascade.
        let was_active = self.hooks_active;
        self.hooks_active = true;
        self.fire_position_change(id);
        let children = node_children(&self.components, id);
        for child in children {
            self.translate_applied(child, delta);
        }
        self.hooks_active = was_active;
        if !was_active {
            self.apply_pending_destroys();
        }
        Ok(())
    }

    /// Shift a component and its subtree by a world-space delta
    pub fn translate(&mut self, id: ComponentId, delta: Vec2) -> SceneResult<()> {
        if !self.components.contains_key(id) {
            return Err(SceneError::ComponentNotRegistered(id));
        }
        let was_active = self.hooks_active;
        self.hooks_active = true;
        self.translate_applied(id, delta);
        self.hooks_active = was_active;
        if !was_active {
            self.apply_pending_destroys();
        }
        Ok(())
    }

    fn translate_applied(&mut self, id: ComponentId, delta: Vec2) {
        let Some(node) = self.components.get_mut(id) else {
            return;
        };
        // Descendants are translated directly rather than re-derived from
        // offsets, so repeated moves cannot accumulate float drift.
        node.position += delta;
        self.fire_position_change(id);
        let children = node_children(&self.components, id);
        for child in children {
            self.translate_applied(child, delta);
        }
    }

    fn fire_position_change(&mut self, id: ComponentId) {
        let hooks = self.components.get_mut(id).and_then(|n| n.hooks.take());
        if let Some(mut hooks) = hooks {
            hooks.on_position_change(self, id);
            if let Some(node) = self.components.get_mut(id) {
                if node.hooks.is_none() {
                    node.hooks = Some(hooks);
                }
            }
        }
    }

    /// Attach a component under a new parent, keeping its world position
    ///
    /// Rejects attaches that would duplicate an existing edge or bend the
    /// tree into a cycle. The child keeps its world position; only its
    /// local position changes.
    pub fn add_child(&mut self, parent: ComponentId, child: ComponentId) -> SceneResult<()> {
        if !self.components.contains_key(parent) {
            return Err(SceneError::ComponentNotRegistered(parent));
        }
        let current_parent = self.node(child)?.parent;
        if current_parent == Some(parent) {
            return Err(SceneError::DuplicateChild { parent, child });
        }
        let mut cursor = Some(parent);
        while let Some(ancestor) = cursor {
            if ancestor == child {
                return Err(SceneError::WouldCycle { parent, child });
            }
            cursor = self.components.get(ancestor).and_then(|n| n.parent);
        }

        if let Some(old_parent) = current_parent {
            if let Some(node) = self.components.get_mut(old_parent) {
                node.children.retain(|other| *other != child);
            }
        }
        if let Some(node) = self.components.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.components.get_mut(parent) {
            node.children.push(child);
        }
        Ok(())
    }

    /// Detach a child from its parent, making it a subtree root
    pub fn remove_child(&mut self, parent: ComponentId, child: ComponentId) -> SceneResult<()> {
        if !self.components.contains_key(parent) {
            return Err(SceneError::ComponentNotRegistered(parent));
        }
        if self.node(child)?.parent != Some(parent) {
            return Err(SceneError::NotAChild { parent, child });
        }
        if let Some(node) = self.components.get_mut(parent) {
            node.children.retain(|other| *other != child);
        }
        if let Some(node) = self.components.get_mut(child) {
            node.parent = None;
        }
        Ok(())
    }

    /// Show or hide a component and its whole subtree
    ///
    /// Fires `on_visibility_change` only on actual transitions; a
    /// subtree already in the requested state is left untouched.
    pub fn set_visible(&mut self, id: ComponentId, visible: bool) -> SceneResult<()> {
        if !self.components.contains_key(id) {
            return Err(SceneError::ComponentNotRegistered(id));
        }
        let was_active = self.hooks_active;
        self.hooks_active = true;
        let result = self.set_visible_inner(id, visible);
        self.hooks_active = was_active;
        if !was_active {
            self.apply_pending_destroys();
        }
        result
    }

    fn set_visible_inner(&mut self, id: ComponentId, visible: bool) -> SceneResult<()> {
        let Some(node) = self.components.get_mut(id) else {
            return Ok(());
        };
        if node.visible == visible {
            return Ok(());
        }
        node.visible = visible;

        let hooks = self.components.get_mut(id).and_then(|n| n.hooks.take());
        let mut hook_result = Ok(());
        if let Some(mut hooks) = hooks {
            hook_result = hooks.on_visibility_change(self, id, visible);
            if let Some(node) = self.components.get_mut(id) {
                if node.hooks.is_none() {
                    node.hooks = Some(hooks);
                }
            }
        }
        hook_result?;

        let children = node_children(&self.components, id);
        for child in children {
            self.set_visible_inner(child, visible)?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------
    // Entity access
    // -------------------------------------------------------------------

    /// Get an entity's private root component
    pub fn entity_root(&self, id: EntityId) -> SceneResult<ComponentId> {
        self.entities
            .get(id)
            .map(|n| n.root)
            .ok_or(SceneError::EntityNotRegistered(id))
    }

    /// Get an entity's display name
    pub fn entity_name(&self, id: EntityId) -> SceneResult<&str> {
        self.entities
            .get(id)
            .map(|n| n.name.as_str())
            .ok_or(SceneError::EntityNotRegistered(id))
    }

    /// Get an entity's position (always its root component's position)
    pub fn entity_position(&self, id: EntityId) -> SceneResult<Vec2> {
        let root = self.entity_root(id)?;
        self.position_of(root)
    }

    /// Move an entity, cascading through its component tree
    pub fn set_entity_position(&mut self, id: EntityId, position: Vec2) -> SceneResult<()> {
        let root = self.entity_root(id)?;
        self.set_position(root, position)
    }

    // -------------------------------------------------------------------
    // Typed component access
    // -------------------------------------------------------------------

    /// Borrow a component's behavior as its concrete type
    pub fn component<T: ComponentHooks>(&self, id: ComponentId) -> SceneResult<&T> {
        let node = self.node(id)?;
        node.hooks
            .as_deref()
            .and_then(|hooks| (hooks as &dyn Any).downcast_ref::<T>())
            .ok_or(SceneError::ComponentTypeMismatch {
                id,
                expected: std::any::type_name::<T>(),
            })
    }

    /// Run a closure with a component's concrete type and the scene
    ///
    /// The behavior is checked out of the arena for the duration of the
    /// closure, so the closure may freely use the scene (for example to
    /// rebuild a batch primitive).
    pub fn with_component_mut<T: ComponentHooks, R>(
        &mut self,
        id: ComponentId,
        f: impl FnOnce(&mut T, &mut Scene) -> R,
    ) -> SceneResult<R> {
        let node = self
            .components
            .get_mut(id)
            .ok_or(SceneError::ComponentNotRegistered(id))?;
        let Some(mut hooks) = node.hooks.take() else {
            return Err(SceneError::ComponentTypeMismatch {
                id,
                expected: std::any::type_name::<T>(),
            });
        };
        let was_active = self.hooks_active;
        self.hooks_active = true;
        let result = match (hooks.as_mut() as &mut dyn Any).downcast_mut::<T>() {
            Some(concrete) => Ok(f(concrete, self)),
            None => Err(SceneError::ComponentTypeMismatch {
                id,
                expected: std::any::type_name::<T>(),
            }),
        };
        if let Some(node) = self.components.get_mut(id) {
            if node.hooks.is_none() {
                node.hooks = Some(hooks);
            }
        }
        self.hooks_active = was_active;
        if !was_active {
            self.apply_pending_destroys();
        }
        result
    }

    // -------------------------------------------------------------------
    // Introspection
    // -------------------------------------------------------------------

    /// Number of live components, including entity roots
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of components registered for direct render calls
    pub fn renderable_count(&self) -> usize {
        self.renderable.len()
    }

    /// Number of registered update receivers
    pub fn updatable_count(&self) -> usize {
        self.updatable.len()
    }

    /// Whether a component handle is live in this scene
    pub fn contains_component(&self, id: ComponentId) -> bool {
        self.components.contains_key(id)
    }

    /// Whether an entity handle is live in this scene
    pub fn contains_entity(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Snapshot of all live component ids
    pub fn component_ids(&self) -> Vec<ComponentId> {
        self.components.keys().collect()
    }

    /// Snapshot of all live entity ids, in spawn order
    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.entity_order.clone()
    }

    // -------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------

    fn node(&self, id: ComponentId) -> SceneResult<&ComponentNode> {
        self.components
            .get(id)
            .ok_or(SceneError::ComponentNotRegistered(id))
    }

    /// Collect a subtree leaf-first; `id` itself is last
    fn collect_postorder(&self, id: ComponentId) -> Vec<ComponentId> {
        fn walk(scene: &Scene, id: ComponentId, out: &mut Vec<ComponentId>) {
            if let Some(node) = scene.components.get(id) {
                for &child in &node.children {
                    walk(scene, child, out);
                }
            }
            out.push(id);
        }
        let mut out = Vec::new();
        walk(self, id, &mut out);
        out
    }
}

/// Child list snapshot without holding a borrow on the arena
fn node_children(
    components: &SlotMap<ComponentId, ComponentNode>,
    id: ComponentId,
) -> Vec<ComponentId> {
    components
        .get(id)
        .map(|n| n.children.clone())
        .unwrap_or_default()
}
