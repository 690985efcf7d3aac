//! Geometric shape components rendered through the scene batch

use crate::foundation::math::Vec2;
use crate::render::{Color, PrimitiveKey, PrimitiveMode, Vertex2D};
use crate::scene::{Component, ComponentHooks, ComponentId, Scene, SceneError};

/// Construction arguments for [`Shape2D`]
#[derive(Debug, Clone)]
pub struct Shape2DArgs {
    /// Shape points as offsets from the component position
    pub points: Vec<Vec2>,
    /// Fill or outline color
    pub color: Color,
    /// Filled polygon when true, outline when false
    pub filled: bool,
    /// For outlines, whether the last point connects back to the first
    pub looped: bool,
    /// Batch layer to draw on
    pub layer: u8,
}

impl Shape2DArgs {
    /// A filled polygon from explicit points
    pub fn polygon(points: Vec<Vec2>, color: Color) -> Self {
        Self {
            points,
            color,
            filled: true,
            looped: true,
            layer: 0,
        }
    }

    /// An outlined polyline from explicit points
    pub fn outline(points: Vec<Vec2>, color: Color, looped: bool) -> Self {
        Self {
            points,
            color,
            filled: false,
            looped,
            layer: 0,
        }
    }

    /// An axis-aligned filled rectangle anchored at the component position
    pub fn rectangle(size: Vec2, color: Color) -> Self {
        Self::polygon(
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(size.x, 0.0),
                Vec2::new(size.x, size.y),
                Vec2::new(0.0, size.y),
            ],
            color,
        )
    }

    /// A filled regular polygon approximating a circle
    pub fn circle(radius: f32, segments: u32, color: Color) -> Self {
        let segments = segments.max(3);
        let points = (0..segments)
            .map(|i| {
                let angle = std::f32::consts::TAU * i as f32 / segments as f32;
                Vec2::new(radius * angle.cos(), radius * angle.sin())
            })
            .collect();
        Self::polygon(points, color)
    }

    /// Move the shape to a different batch layer
    pub fn with_layer(mut self, layer: u8) -> Self {
        self.layer = layer;
        self
    }
}

/// A geometric shape built from points, drawn in the scene batch
///
/// The assembly mode follows from the point count and fill flags: one
/// point draws as a point, two as a line, outlines as strips or loops,
/// and filled shapes as triangles (quads and larger polygons are fanned).
pub struct Shape2D {
    key: PrimitiveKey,
    points: Vec<Vec2>,
    color: Color,
}

impl Shape2D {
    /// The shape's current color
    pub fn color(&self) -> Color {
        self.color
    }

    /// The batch primitive backing this shape
    pub fn primitive_key(&self) -> PrimitiveKey {
        self.key
    }

    /// Recolor the shape in place
    ///
    /// Use through [`Scene::with_component_mut`]; vertex positions are
    /// left untouched.
    pub fn set_color(&mut self, scene: &mut Scene, color: Color) {
        self.color = color;
        let key = self.key;
        match scene.batch_mut().primitive_mut(key) {
            Ok(primitive) => {
                let recolored = primitive
                    .vertices()
                    .iter()
                    .map(|v| Vertex2D {
                        color: color.to_f32(),
                        ..*v
                    })
                    .collect();
                primitive.set_vertices(recolored);
            }
            Err(e) => log::warn!("shape recolor lost its primitive: {}", e),
        }
    }

    fn build_vertices(&self, origin: Vec2) -> Vec<Vertex2D> {
        self.points
            .iter()
            .map(|offset| Vertex2D::colored(origin + offset, self.color))
            .collect()
    }

    fn select_mode(point_count: usize, filled: bool, looped: bool) -> PrimitiveMode {
        match point_count {
            1 => PrimitiveMode::Points,
            2 => PrimitiveMode::Lines,
            _ if !filled => {
                if looped {
                    PrimitiveMode::LineLoop
                } else {
                    PrimitiveMode::LineStrip
                }
            }
            _ => PrimitiveMode::Triangles,
        }
    }

    /// Fan triangulation for convex polygons beyond a triangle
    fn fan_indices(point_count: usize) -> Vec<u32> {
        match point_count {
            0..=3 => Vec::new(),
            4 => vec![0, 1, 2, 0, 2, 3],
            n => (1..n as u32 - 1).flat_map(|i| [0, i, i + 1]).collect(),
        }
    }
}

impl ComponentHooks for Shape2D {
    fn on_position_change(&mut self, scene: &mut Scene, me: ComponentId) {
        let Ok(origin) = scene.position_of(me) else {
            return;
        };
        let vertices = self.build_vertices(origin);
        match scene.batch_mut().primitive_mut(self.key) {
            Ok(primitive) => primitive.set_vertices(vertices),
            Err(e) => log::warn!("shape reposition lost its primitive: {}", e),
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
            log::warn!("shape destroy lost its primitive: {}", e);
        }
    }
}

impl Component for Shape2D {
    type Args = Shape2DArgs;

    fn on_spawn(scene: &mut Scene, me: ComponentId, args: Shape2DArgs) -> Result<Self, SceneError> {
        if args.points.is_empty() {
            return Err(SceneError::Spawn(
                "a shape requires at least one point".to_owned(),
            ));
        }
        let mode = Self::select_mode(args.points.len(), args.filled, args.looped);
        let indices = if mode == PrimitiveMode::Triangles {
            Self::fan_indices(args.points.len())
        } else {
            Vec::new()
        };

        let origin = scene.position_of(me)?;
        let shape = Self {
            // Placeholder key replaced right below; the batch allocation
            // needs the built vertices first.
            key: PrimitiveKey::default(),
            points: args.points,
            color: args.color,
        };
        let vertices = shape.build_vertices(origin);
        let key = scene
            .batch_mut()
            .add(args.layer, mode, vertices, indices)?;
        Ok(Self { key, ..shape })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessBackend;

    #[test]
    fn test_mode_selection_matches_point_count() {
        assert_eq!(Shape2D::select_mode(1, true, true), PrimitiveMode::Points);
        assert_eq!(Shape2D::select_mode(2, true, true), PrimitiveMode::Lines);
        assert_eq!(Shape2D::select_mode(5, false, true), PrimitiveMode::LineLoop);
        assert_eq!(Shape2D::select_mode(5, false, false), PrimitiveMode::LineStrip);
        assert_eq!(Shape2D::select_mode(3, true, true), PrimitiveMode::Triangles);
        assert_eq!(Shape2D::select_mode(4, true, true), PrimitiveMode::Triangles);
    }

    #[test]
    fn test_quad_uses_two_triangles() {
        assert_eq!(Shape2D::fan_indices(4), vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(Shape2D::fan_indices(6).len(), 12);
    }

    #[test]
    fn test_rectangle_tracks_component_position() {
        let mut scene = Scene::new("shapes");
        let id = scene
            .spawn_component::<Shape2D>(
                Vec2::new(10.0, 10.0),
                Shape2DArgs::rectangle(Vec2::new(4.0, 2.0), Color::RED),
            )
            .unwrap();

        let key = scene.component::<Shape2D>(id).unwrap().primitive_key();
        let first = scene.batch().primitive(key).unwrap().vertices()[2].position;
        assert_eq!(first, [14.0, 12.0]);

        scene.set_position(id, Vec2::new(0.0, 0.0)).unwrap();
        let moved = scene.batch().primitive(key).unwrap().vertices()[2].position;
        assert_eq!(moved, [4.0, 2.0]);
    }

    #[test]
    fn test_destroy_frees_the_primitive() {
        let mut scene = Scene::new("shapes");
        let id = scene
            .spawn_component::<Shape2D>(
                Vec2::zeros(),
                Shape2DArgs::circle(5.0, 8, Color::GREEN),
            )
            .unwrap();
        assert_eq!(scene.batch().len(), 1);

        scene.destroy_component(id).unwrap();
        assert_eq!(scene.batch().len(), 0);
    }

    #[test]
    fn test_hidden_shape_skips_drawing() {
        let mut scene = Scene::new("shapes");
        let id = scene
            .spawn_component::<Shape2D>(
                Vec2::zeros(),
                Shape2DArgs::rectangle(Vec2::new(1.0, 1.0), Color::WHITE),
            )
            .unwrap();

        scene.set_visible(id, false).unwrap();
        let mut backend = HeadlessBackend::new(64, 64);
        scene.render(&mut backend).unwrap();
        assert_eq!(backend.draw_calls(), 0);
    }

    #[test]
    fn test_empty_shape_fails_to_spawn() {
        let mut scene = Scene::new("shapes");
        let result = scene.spawn_component::<Shape2D>(
            Vec2::zeros(),
            Shape2DArgs::polygon(Vec::new(), Color::WHITE),
        );
        assert!(matches!(result, Err(SceneError::Spawn(_))));
        assert_eq!(scene.component_count(), 0);
    }
}
