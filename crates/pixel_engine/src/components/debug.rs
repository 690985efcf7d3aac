//! Components used for the purpose of debugging

use crate::foundation::math::utils::lerp;
use crate::scene::{Capabilities, Component, ComponentHooks, ComponentId, Scene, SceneError};

/// Exponential smoothing factor for the FPS estimate
const SMOOTHING: f32 = 0.1;

/// Tracks a smoothed frames-per-second estimate
///
/// Purely an updatable probe; pair it with a [`TileText`] on a HUD scene
/// to put the number on screen.
///
/// [`TileText`]: crate::components::TileText
pub struct FpsDisplay {
    smoothed: f32,
}

impl FpsDisplay {
    /// The current smoothed FPS estimate
    pub fn fps(&self) -> f32 {
        self.smoothed
    }
}

impl ComponentHooks for FpsDisplay {
    fn on_update(&mut self, _scene: &mut Scene, _me: ComponentId, delta: f32) {
        if delta <= 0.0 {
            return;
        }
        let instantaneous = 1.0 / delta;
        self.smoothed = if self.smoothed == 0.0 {
            instantaneous
        } else {
            lerp(self.smoothed, instantaneous, SMOOTHING)
        };
        log::trace!("fps: {:.1}", self.smoothed);
    }
}

impl Component for FpsDisplay {
    type Args = ();
    const CAPABILITIES: Capabilities = Capabilities::UPDATE;

    fn on_spawn(_scene: &mut Scene, _me: ComponentId, _args: ()) -> Result<Self, SceneError> {
        Ok(Self { smoothed: 0.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use approx::assert_relative_eq;

    #[test]
    fn test_fps_converges_on_steady_frame_time() {
        let mut scene = Scene::new("debug");
        let id = scene.spawn_component::<FpsDisplay>(Vec2::zeros(), ()).unwrap();

        for _ in 0..200 {
            scene.update(0.02);
        }
        let fps = scene.component::<FpsDisplay>(id).unwrap().fps();
        assert_relative_eq!(fps, 50.0, epsilon = 0.5);
    }

    #[test]
    fn test_zero_delta_is_ignored() {
        let mut scene = Scene::new("debug");
        let id = scene.spawn_component::<FpsDisplay>(Vec2::zeros(), ()).unwrap();

        scene.update(0.0);
        assert_eq!(scene.component::<FpsDisplay>(id).unwrap().fps(), 0.0);
    }
}
