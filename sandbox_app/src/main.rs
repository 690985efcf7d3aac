//! Sandbox demo application
//!
//! Drives the engine against the headless backend: a world scene with a
//! bouncing square, a HUD scene with an FPS probe, and a few simulated
//! key presses. Useful as smoke coverage for the whole stack and as a
//! template for a real platform integration.

use pixel_engine::prelude::*;

/// World-space bounds the bouncer stays inside
const BOUNDS: (f32, f32) = (160.0, 144.0);

/// Frames to simulate before exiting
const FRAMES: u32 = 240;

/// A square entity that bounces around the world bounds
struct Bouncer {
    velocity: Vec2,
}

impl EntityHooks for Bouncer {
    fn on_update(&mut self, scene: &mut Scene, me: EntityId, delta: f32) {
        let Ok(position) = scene.entity_position(me) else {
            return;
        };
        let mut next = position + self.velocity * delta;
        if next.x < 0.0 || next.x > BOUNDS.0 {
            self.velocity.x = -self.velocity.x;
            next.x = next.x.clamp(0.0, BOUNDS.0);
        }
        if next.y < 0.0 || next.y > BOUNDS.1 {
            self.velocity.y = -self.velocity.y;
            next.y = next.y.clamp(0.0, BOUNDS.1);
        }
        if let Err(e) = scene.set_entity_position(me, next) {
            log::warn!("bouncer lost its root component: {}", e);
        }
    }

    fn on_key_press(
        &mut self,
        _scene: &mut Scene,
        _me: EntityId,
        key: KeyCode,
        _modifiers: KeyModifiers,
    ) {
        // Space reverses course, everything else just gets logged.
        if key == KeyCode::Space {
            self.velocity = -self.velocity;
        }
        log::info!("bouncer saw key press: {:?}", key);
    }
}

impl Entity for Bouncer {
    type Args = Vec2;
    const CAPABILITIES: Capabilities = Capabilities::UPDATE;

    fn on_spawn(scene: &mut Scene, me: EntityId, velocity: Vec2) -> Result<Self, SceneError> {
        let position = scene.entity_position(me)?;
        scene.spawn_entity_component::<Shape2D>(
            me,
            position,
            Shape2DArgs::rectangle(Vec2::new(8.0, 8.0), Color::GREEN),
        )?;
        Ok(Self { velocity })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = GameConfig {
        camera_zoom: 4.0,
        ..GameConfig::default()
    };
    let backend = HeadlessBackend::new(config.window.width, config.window.height);
    let mut game = Game::new(config, backend);

    let world = game.create_scene("world");
    world.spawn_entity::<Bouncer>(Vec2::new(80.0, 72.0), Vec2::new(30.0, 18.0))?;

    let hud = game.create_scene("hud");
    hud.use_camera(Box::new(HudCamera::new(1.0)));
    let fps_probe = hud.spawn_component::<FpsDisplay>(Vec2::new(0.0, 0.0), ())?;

    for frame in 0..FRAMES {
        game.frame()?;

        // Poke the input path now and then.
        if frame % 90 == 44 {
            game.key_pressed(KeyCode::Space, KeyModifiers::empty());
            game.key_released(KeyCode::Space, KeyModifiers::empty());
        }
    }

    let fps = game
        .scene_mut(1)
        .and_then(|scene| scene.component::<FpsDisplay>(fps_probe).ok().map(FpsDisplay::fps))
        .unwrap_or(0.0);
    log::info!(
        "sandbox finished: {} frames, ~{:.0} fps, {} draw calls",
        FRAMES,
        fps,
        game.backend().draw_calls()
    );
    Ok(())
}
