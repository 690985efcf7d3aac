//! Textured sprite component

use crate::assets::ImageHandle;
use crate::foundation::math::Vec2;
use crate::render::{Color, PrimitiveKey, PrimitiveMode, Vertex2D};
use crate::scene::{Component, ComponentHooks, ComponentId, Scene, SceneError};

/// Construction arguments for [`Sprite`]
#[derive(Debug, Clone, Copy)]
pub struct SpriteArgs {
    /// The image to draw
    pub image: ImageHandle,
    /// Uniform scale applied to the image's pixel size
    pub scale: f32,
    /// Batch layer to draw on
    pub layer: u8,
}

impl SpriteArgs {
    /// A sprite at native pixel size on layer 0
    pub fn new(image: ImageHandle) -> Self {
        Self {
            image,
            scale: 1.0,
            layer: 0,
        }
    }

    /// Change the uniform scale
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Move the sprite to a different batch layer
    pub fn with_layer(mut self, layer: u8) -> Self {
        self.layer = layer;
        self
    }
}

/// One textured quad in the scene batch, anchored at its bottom-left
pub struct Sprite {
    key: PrimitiveKey,
    size: Vec2,
    tint: Color,
}

impl Sprite {
    /// The sprite's drawn size in world units
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// The batch primitive backing this sprite
    pub fn primitive_key(&self) -> PrimitiveKey {
        self.key
    }

    fn build_vertices(&self, origin: Vec2) -> Vec<Vertex2D> {
        let (w, h) = (self.size.x, self.size.y);
        vec![
            Vertex2D::textured(origin, [0.0, 0.0], self.tint),
            Vertex2D::textured(origin + Vec2::new(w, 0.0), [1.0, 0.0], self.tint),
            Vertex2D::textured(origin + Vec2::new(w, h), [1.0, 1.0], self.tint),
            Vertex2D::textured(origin + Vec2::new(0.0, h), [0.0, 1.0], self.tint),
        ]
    }
}

impl ComponentHooks for Sprite {
    fn on_position_change(&mut self, scene: &mut Scene, me: ComponentId) {
        let Ok(origin) = scene.position_of(me) else {
            return;
        };
        let vertices = self.build_vertices(origin);
        match scene.batch_mut().primitive_mut(self.key) {
            Ok(primitive) => primitive.set_vertices(vertices),
            Err(e) => log::warn!("sprite reposition lost its primitive: {}", e),
        }
    }

    fn on_visibility_change(
        &mut self,
        scene: &mut Scene,
        _me: ComponentId,
        visible: bool,
    ) -> Result<(), SceneError> {
        scene
            .batch_mut()
            .set_visible(self.key, visible)
            .map_err(SceneError::from)
    }

    fn on_destroy(&mut self, scene: &mut Scene, _me: ComponentId) {
        if let Err(e) = scene.batch_mut().remove(self.key) {
            log::warn!("sprite destroy lost its primitive: {}", e);
        }
    }
}

impl Component for Sprite {
    type Args = SpriteArgs;

    fn on_spawn(scene: &mut Scene, me: ComponentId, args: SpriteArgs) -> Result<Self, SceneError> {
        if args.scale <= 0.0 {
            return Err(SceneError::Spawn(format!(
                "sprite scale must be positive, got {}",
                args.scale
            )));
        }
        let size = Vec2::new(
            args.image.width as f32 * args.scale,
            args.image.height as f32 * args.scale,
        );
        let sprite = Self {
            key: PrimitiveKey::default(),
            size,
            tint: Color::WHITE,
        };
        let origin = scene.position_of(me)?;
        let vertices = sprite.build_vertices(origin);
        let key = scene.batch_mut().add_textured(
            args.layer,
            PrimitiveMode::Triangles,
            vertices,
            vec![0, 1, 2, 0, 2, 3],
            Some(args.image),
        )?;
        Ok(Self { key, ..sprite })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessBackend;

    fn image() -> ImageHandle {
        ImageHandle {
            id: 7,
            width: 16,
            height: 8,
        }
    }

    #[test]
    fn test_sprite_quad_matches_scaled_image_size() {
        let mut scene = Scene::new("sprites");
        let id = scene
            .spawn_component::<Sprite>(Vec2::new(2.0, 3.0), SpriteArgs::new(image()).with_scale(2.0))
            .unwrap();

        let sprite = scene.component::<Sprite>(id).unwrap();
        assert_eq!(sprite.size(), Vec2::new(32.0, 16.0));

        let key = sprite.primitive_key();
        let vertices = scene.batch().primitive(key).unwrap().vertices();
        assert_eq!(vertices[0].position, [2.0, 3.0]);
        assert_eq!(vertices[2].position, [34.0, 19.0]);
    }

    #[test]
    fn test_sprites_of_one_image_share_a_draw_call() {
        let mut scene = Scene::new("sprites");
        for x in 0..3 {
            scene
                .spawn_component::<Sprite>(Vec2::new(x as f32 * 20.0, 0.0), SpriteArgs::new(image()))
                .unwrap();
        }

        let mut backend = HeadlessBackend::new(160, 144);
        scene.render(&mut backend).unwrap();
        assert_eq!(backend.draw_calls(), 1);
        assert_eq!(backend.vertices_submitted(), 12);
    }

    #[test]
    fn test_non_positive_scale_fails_to_spawn() {
        let mut scene = Scene::new("sprites");
        let result =
            scene.spawn_component::<Sprite>(Vec2::zeros(), SpriteArgs::new(image()).with_scale(0.0));
        assert!(matches!(result, Err(SceneError::Spawn(_))));
    }
}
