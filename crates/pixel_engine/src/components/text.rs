//! Fixed-grid text rendered from a tileset atlas

use crate::assets::TilesetHandle;
use crate::foundation::math::Vec2;
use crate::render::{Color, PrimitiveKey, PrimitiveMode, Vertex2D};
use crate::scene::{Component, ComponentHooks, ComponentId, Scene, SceneError};

/// Construction arguments for [`TileText`]
#[derive(Debug, Clone)]
pub struct TileTextArgs {
    /// Glyph atlas; tiles are expected in ASCII order starting at space
    pub tileset: TilesetHandle,
    /// Initial text
    pub text: String,
    /// Uniform scale applied to the glyph pixel size
    pub scale: f32,
    /// Batch layer to draw on
    pub layer: u8,
}

impl TileTextArgs {
    /// Text at native glyph size on layer 0
    pub fn new(tileset: TilesetHandle, text: impl Into<String>) -> Self {
        Self {
            tileset,
            text: text.into(),
            scale: 1.0,
            layer: 0,
        }
    }

    /// Change the uniform scale
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Move the text to a different batch layer
    pub fn with_layer(mut self, layer: u8) -> Self {
        self.layer = layer;
        self
    }
}

/// A single-line run of glyph quads from a tileset
///
/// Glyphs advance left to right by one tile width per character. Only
/// printable ASCII maps to tiles; anything else renders as a blank
/// advance.
pub struct TileText {
    key: Option<PrimitiveKey>,
    tileset: TilesetHandle,
    text: String,
    scale: f32,
    layer: u8,
    origin: Vec2,
}

impl TileText {
    /// The current text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text, rebuilding the glyph quads
    ///
    /// Use through [`Scene::with_component_mut`].
    pub fn set_text(&mut self, scene: &mut Scene, text: impl Into<String>) -> Result<(), SceneError> {
        self.text = text.into();
        self.rebuild(scene)
    }

    /// Map a character to its tile index, ASCII order from space
    fn glyph_index(ch: char) -> Option<u32> {
        if ch.is_ascii_graphic() {
            Some(ch as u32 - 32)
        } else {
            None
        }
    }

    fn build_geometry(&self) -> (Vec<Vertex2D>, Vec<u32>) {
        let glyph_w = self.tileset.tile_width as f32 * self.scale;
        let glyph_h = self.tileset.tile_height as f32 * self.scale;
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for (column, ch) in self.text.chars().enumerate() {
            let Some(index) = Self::glyph_index(ch) else {
                continue;
            };
            let uv = self.tileset.uv_rect(index);
            let corner = self.origin + Vec2::new(column as f32 * glyph_w, 0.0);
            let base = vertices.len() as u32;
            vertices.extend_from_slice(&[
                Vertex2D::textured(corner, [uv.u0, uv.v0], Color::WHITE),
                Vertex2D::textured(corner + Vec2::new(glyph_w, 0.0), [uv.u1, uv.v0], Color::WHITE),
                Vertex2D::textured(corner + Vec2::new(glyph_w, glyph_h), [uv.u1, uv.v1], Color::WHITE),
                Vertex2D::textured(corner + Vec2::new(0.0, glyph_h), [uv.u0, uv.v1], Color::WHITE),
            ]);
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        (vertices, indices)
    }

    fn rebuild(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        if let Some(key) = self.key.take() {
            scene.batch_mut().remove(key)?;
        }
        let (vertices, indices) = self.build_geometry();
        if !vertices.is_empty() {
            let key = scene.batch_mut().add_textured(
                self.layer,
                PrimitiveMode::Triangles,
                vertices,
                indices,
                Some(self.tileset.image),
            )?;
            self.key = Some(key);
        }
        Ok(())
    }
}

impl ComponentHooks for TileText {
    fn on_position_change(&mut self, scene: &mut Scene, me: ComponentId) {
        let Ok(origin) = scene.position_of(me) else {
            return;
        };
        let delta = origin - self.origin;
        self.origin = origin;
        if let Some(key) = self.key {
            match scene.batch_mut().primitive_mut(key) {
                Ok(primitive) => primitive.translate(delta),
                Err(e) => log::warn!("text reposition lost its primitive: {}", e),
            }
        }
    }

    fn on_visibility_change(
        &mut self,
        scene: &mut Scene,
        _me: ComponentId,
        visible: bool,
    ) -> Result<(), SceneError> {
        if let Some(key) = self.key {
            scene
                .batch_mut()
                .set_visible(key, visible)
                .map_err(SceneError::from)?;
        }
        Ok(())
    }

    fn on_destroy(&mut self, scene: &mut Scene, _me: ComponentId) {
        if let Some(key) = self.key.take() {
            if let Err(e) = scene.batch_mut().remove(key) {
                log::warn!("text destroy lost its primitive: {}", e);
            }
        }
    }
}

impl Component for TileText {
    type Args = TileTextArgs;

    fn on_spawn(scene: &mut Scene, me: ComponentId, args: TileTextArgs) -> Result<Self, SceneError> {
        if args.scale <= 0.0 {
            return Err(SceneError::Spawn(format!(
                "text scale must be positive, got {}",
                args.scale
            )));
        }
        let mut text = Self {
            key: None,
            tileset: args.tileset,
            text: args.text,
            scale: args.scale,
            layer: args.layer,
            origin: scene.position_of(me)?,
        };
        text.rebuild(scene)?;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ImageHandle;

    fn font() -> TilesetHandle {
        TilesetHandle {
            image: ImageHandle {
                id: 3,
                width: 128,
                height: 48,
            },
            tile_width: 8,
            tile_height: 8,
            columns: 16,
        }
    }

    #[test]
    fn test_glyph_indices_follow_ascii() {
        assert_eq!(TileText::glyph_index('!'), Some(1));
        assert_eq!(TileText::glyph_index('A'), Some(33));
        assert_eq!(TileText::glyph_index(' '), None);
        assert_eq!(TileText::glyph_index('\n'), None);
    }

    #[test]
    fn test_one_quad_per_printable_character() {
        let mut scene = Scene::new("text");
        let id = scene
            .spawn_component::<TileText>(Vec2::zeros(), TileTextArgs::new(font(), "HP 10"))
            .unwrap();

        // "HP 10" has four printable glyphs; the space only advances.
        let text = scene.component::<TileText>(id).unwrap();
        let key = text.key.unwrap();
        let primitive = scene.batch().primitive(key).unwrap();
        assert_eq!(primitive.vertices().len(), 16);

        // The glyph after the space starts three advances in.
        assert_eq!(primitive.vertices()[8].position, [24.0, 0.0]);
    }

    #[test]
    fn test_set_text_rebuilds_quads() {
        let mut scene = Scene::new("text");
        let id = scene
            .spawn_component::<TileText>(Vec2::zeros(), TileTextArgs::new(font(), "A"))
            .unwrap();

        scene
            .with_component_mut::<TileText, _>(id, |text, scene| text.set_text(scene, "ABC"))
            .unwrap()
            .unwrap();

        let text = scene.component::<TileText>(id).unwrap();
        assert_eq!(text.text(), "ABC");
        let primitive = scene.batch().primitive(text.key.unwrap()).unwrap();
        assert_eq!(primitive.vertices().len(), 12);
    }

    #[test]
    fn test_empty_text_holds_no_primitive() {
        let mut scene = Scene::new("text");
        let id = scene
            .spawn_component::<TileText>(Vec2::zeros(), TileTextArgs::new(font(), ""))
            .unwrap();

        assert!(scene.component::<TileText>(id).unwrap().key.is_none());
        assert_eq!(scene.batch().len(), 0);

        scene
            .with_component_mut::<TileText, _>(id, |text, scene| text.set_text(scene, "hi"))
            .unwrap()
            .unwrap();
        assert_eq!(scene.batch().len(), 1);
    }

    #[test]
    fn test_moving_text_translates_glyphs() {
        let mut scene = Scene::new("text");
        let id = scene
            .spawn_component::<TileText>(Vec2::zeros(), TileTextArgs::new(font(), "A"))
            .unwrap();

        scene.set_position(id, Vec2::new(5.0, 7.0)).unwrap();
        let text = scene.component::<TileText>(id).unwrap();
        let primitive = scene.batch().primitive(text.key.unwrap()).unwrap();
        assert_eq!(primitive.vertices()[0].position, [5.0, 7.0]);
    }
}
