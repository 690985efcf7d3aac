//! The game driver
//!
//! [`Game`] ties the pieces together for an embedding application: it
//! owns the render backend, an ordered list of scenes, the held-key
//! state and the frame timer. The embedder owns the window and event
//! loop and calls [`Game::frame`] once per frame, plus the key-event
//! methods as the platform delivers them.

use crate::config::GameConfig;
use crate::foundation::math::Vec2;
use crate::foundation::time::FrameTimer;
use crate::input::{InputState, KeyCode, KeyModifiers};
use crate::render::{PixelCamera, RenderBackend, RenderError};
use crate::scene::Scene;

/// Owns the backend and drives every scene through the frame phases
pub struct Game<B: RenderBackend> {
    config: GameConfig,
    backend: B,
    /// Scenes update and render in this order every frame
    scenes: Vec<Scene>,
    input: InputState,
    timer: FrameTimer,
}

impl<B: RenderBackend> Game<B> {
    /// Create a game driving the given backend
    pub fn new(config: GameConfig, backend: B) -> Self {
        log::info!(
            "initializing game '{}' ({}x{})",
            config.window.title,
            config.window.width,
            config.window.height
        );
        Self {
            config,
            backend,
            scenes: Vec::new(),
            input: InputState::new(),
            timer: FrameTimer::new(),
        }
    }

    /// The active configuration
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The render backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the render backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// The held-key state
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// The frame timer
    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    /// Create a scene configured from this game's settings
    ///
    /// The scene gets its own pixel camera (at the configured zoom) and
    /// batch, and joins the per-frame update/render rotation.
    pub fn create_scene(&mut self, name: impl Into<String>) -> &mut Scene {
        let mut scene = Scene::with_layers(name, self.config.batch_layers);
        scene.use_camera(Box::new(PixelCamera::new(
            Vec2::zeros(),
            self.config.camera_zoom,
        )));
        self.scenes.push(scene);
        let index = self.scenes.len() - 1;
        &mut self.scenes[index]
    }

    /// All scenes in update/render order
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Mutable access to a scene by index
    pub fn scene_mut(&mut self, index: usize) -> Option<&mut Scene> {
        self.scenes.get_mut(index)
    }

    /// Run one frame: tick the timer, update all scenes, render all
    /// scenes
    ///
    /// Returns the frame's delta in seconds.
    pub fn frame(&mut self) -> Result<f32, RenderError> {
        let delta = self.timer.tick();
        self.update_all(delta);
        self.render_all()?;
        Ok(delta)
    }

    /// Update every scene with an explicit delta
    pub fn update_all(&mut self, delta: f32) {
        for scene in &mut self.scenes {
            scene.update(delta);
        }
    }

    /// Render every scene to the backend
    pub fn render_all(&mut self) -> Result<(), RenderError> {
        let Self { scenes, backend, .. } = self;
        for scene in scenes {
            scene.render(backend)?;
        }
        Ok(())
    }

    /// Record a key press and dispatch it to every scene's entities
    pub fn key_pressed(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        self.input.set_key(key, true);
        for scene in &mut self.scenes {
            scene.dispatch_key_press(key, modifiers);
        }
    }

    /// Record a key release and dispatch it to every scene's entities
    pub fn key_released(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        self.input.set_key(key, false);
        for scene in &mut self.scenes {
            scene.dispatch_key_release(key, modifiers);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessBackend;
    use crate::scene::{Capabilities, Entity, EntityHooks, EntityId, SceneError};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Walker {
        ticks: Rc<RefCell<u32>>,
        held: Rc<RefCell<Vec<KeyCode>>>,
    }

    impl EntityHooks for Walker {
        fn on_update(&mut self, _scene: &mut Scene, _me: EntityId, _delta: f32) {
            *self.ticks.borrow_mut() += 1;
        }

        fn on_key_press(
            &mut self,
            _scene: &mut Scene,
            _me: EntityId,
            key: KeyCode,
            _modifiers: KeyModifiers,
        ) {
            self.held.borrow_mut().push(key);
        }
    }

    impl Entity for Walker {
        type Args = (Rc<RefCell<u32>>, Rc<RefCell<Vec<KeyCode>>>);
        const CAPABILITIES: Capabilities = Capabilities::UPDATE;

        fn on_spawn(
            _scene: &mut Scene,
            _me: EntityId,
            (ticks, held): Self::Args,
        ) -> Result<Self, SceneError> {
            Ok(Self { ticks, held })
        }
    }

    #[test]
    fn test_frame_updates_then_renders_every_scene() {
        let config = GameConfig::default();
        let backend = HeadlessBackend::new(config.window.width, config.window.height);
        let mut game = Game::new(config, backend);

        let ticks = Rc::new(RefCell::new(0));
        let held = Rc::new(RefCell::new(Vec::new()));
        let scene = game.create_scene("world");
        scene
            .spawn_entity::<Walker>(Vec2::zeros(), (ticks.clone(), held.clone()))
            .unwrap();
        game.create_scene("hud");

        game.frame().unwrap();
        game.frame().unwrap();

        assert_eq!(*ticks.borrow(), 2);
        // One camera upload per scene; projections are stable afterwards.
        assert_eq!(game.backend().camera_uploads(), 2);
    }

    #[test]
    fn test_key_events_update_state_and_reach_entities() {
        let mut game = Game::new(GameConfig::default(), HeadlessBackend::new(64, 64));
        let ticks = Rc::new(RefCell::new(0));
        let held = Rc::new(RefCell::new(Vec::new()));
        game.create_scene("world")
            .spawn_entity::<Walker>(Vec2::zeros(), (ticks, held.clone()))
            .unwrap();

        game.key_pressed(KeyCode::Right, KeyModifiers::empty());
        assert!(game.input().is_key_down(KeyCode::Right));
        assert_eq!(held.borrow().as_slice(), [KeyCode::Right]);

        game.key_released(KeyCode::Right, KeyModifiers::empty());
        assert!(!game.input().is_key_down(KeyCode::Right));
    }

    #[test]
    fn test_scene_cameras_use_configured_zoom() {
        let config = GameConfig {
            camera_zoom: 4.0,
            ..GameConfig::default()
        };
        let mut game = Game::new(config, HeadlessBackend::new(640, 576));
        game.create_scene("world");
        game.frame().unwrap();

        // 640 wide at 4x zoom spans 160 world units.
        let scene = &game.scenes()[0];
        let ndc = scene
            .camera()
            .projection()
            .transform_point(&nalgebra::Point3::new(80.0, 0.0, 0.0));
        approx::assert_relative_eq!(ndc.x, 1.0, epsilon = 1e-6);
    }
}
