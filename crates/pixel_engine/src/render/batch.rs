//! Layer-batched primitive rendering
//!
//! Scenes draw almost everything through one [`BatchRenderer`]: components
//! allocate primitives on a numbered layer at spawn time and mutate their
//! vertices afterwards; once per frame the batch sorts by layer and merges
//! compatible runs so the backend sees as few submissions as possible.

use slotmap::SlotMap;

use crate::assets::ImageHandle;
use crate::foundation::math::Vec2;
use crate::render::backend::{BackendResult, PrimitiveMode, RenderBackend};
use crate::render::error::RenderError;
use crate::render::vertex::Vertex2D;

slotmap::new_key_type! {
    /// Handle to a primitive owned by a [`BatchRenderer`]
    pub struct PrimitiveKey;
}

/// A run of vertices drawn with a single mode, layer and texture
#[derive(Debug)]
pub struct Primitive {
    layer: u8,
    mode: PrimitiveMode,
    image: Option<ImageHandle>,
    vertices: Vec<Vertex2D>,
    indices: Vec<u32>,
    visible: bool,
}

impl Primitive {
    /// The layer this primitive draws on
    pub fn layer(&self) -> u8 {
        self.layer
    }

    /// The assembly mode of this primitive
    pub fn mode(&self) -> PrimitiveMode {
        self.mode
    }

    /// Whether this primitive is currently drawn
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The current vertices
    pub fn vertices(&self) -> &[Vertex2D] {
        &self.vertices
    }

    /// Replace the vertex data, keeping mode and indices
    pub fn set_vertices(&mut self, vertices: Vec<Vertex2D>) {
        self.vertices = vertices;
    }

    /// Shift every vertex by a world-space delta
    pub fn translate(&mut self, delta: Vec2) {
        for vertex in &mut self.vertices {
            vertex.translate(delta);
        }
    }
}

/// Statistics from the most recent [`BatchRenderer::render`] call
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchStats {
    /// Primitives considered this frame
    pub primitives: usize,
    /// Primitives skipped because they were hidden
    pub hidden_skipped: usize,
    /// Backend submissions issued
    pub draw_calls: usize,
    /// Total vertices submitted
    pub vertices: usize,
}

impl BatchStats {
    /// Average primitives folded into each submission
    pub fn avg_primitives_per_call(&self) -> f32 {
        if self.draw_calls == 0 {
            0.0
        } else {
            (self.primitives - self.hidden_skipped) as f32 / self.draw_calls as f32
        }
    }
}

/// Groups drawable primitives by layer to minimize draw calls
pub struct BatchRenderer {
    layer_count: u8,
    primitives: SlotMap<PrimitiveKey, Primitive>,
    /// Insertion order, the tie-break within a layer
    order: Vec<PrimitiveKey>,
    stats: BatchStats,
}

impl BatchRenderer {
    /// Create a batch with the given number of layers
    ///
    /// Layers draw in ascending order; primitives on the same layer draw
    /// in insertion order.
    pub fn new(layer_count: u8) -> Self {
        log::debug!("created batch renderer with {} layers", layer_count);
        Self {
            layer_count,
            primitives: SlotMap::with_key(),
            order: Vec::new(),
            stats: BatchStats::default(),
        }
    }

    /// Number of layers this batch was created with
    pub fn layer_count(&self) -> u8 {
        self.layer_count
    }

    /// Number of live primitives
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Whether the batch holds no primitives
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Statistics from the most recent render
    pub fn stats(&self) -> &BatchStats {
        &self.stats
    }

    /// Allocate a flat-colored primitive on a layer
    pub fn add(
        &mut self,
        layer: u8,
        mode: PrimitiveMode,
        vertices: Vec<Vertex2D>,
        indices: Vec<u32>,
    ) -> Result<PrimitiveKey, RenderError> {
        self.add_textured(layer, mode, vertices, indices, None)
    }

    /// Allocate a primitive sampling a texture
    pub fn add_textured(
        &mut self,
        layer: u8,
        mode: PrimitiveMode,
        vertices: Vec<Vertex2D>,
        mut indices: Vec<u32>,
        image: Option<ImageHandle>,
    ) -> Result<PrimitiveKey, RenderError> {
        if layer >= self.layer_count {
            return Err(RenderError::InvalidLayer {
                layer,
                layer_count: self.layer_count,
            });
        }
        if vertices.is_empty() {
            return Err(RenderError::EmptyPrimitive);
        }
        // Triangle primitives are always indexed so runs can be merged.
        if mode == PrimitiveMode::Triangles && indices.is_empty() {
            indices = (0..vertices.len() as u32).collect();
        }
        let key = self.primitives.insert(Primitive {
            layer,
            mode,
            image,
            vertices,
            indices,
            visible: true,
        });
        self.order.push(key);
        Ok(key)
    }

    /// Remove a primitive; the handle is invalid afterwards
    pub fn remove(&mut self, key: PrimitiveKey) -> Result<(), RenderError> {
        if self.primitives.remove(key).is_none() {
            return Err(RenderError::UnknownPrimitive(key));
        }
        self.order.retain(|k| *k != key);
        Ok(())
    }

    /// Borrow a primitive
    pub fn primitive(&self, key: PrimitiveKey) -> Result<&Primitive, RenderError> {
        self.primitives
            .get(key)
            .ok_or(RenderError::UnknownPrimitive(key))
    }

    /// Mutably borrow a primitive
    pub fn primitive_mut(&mut self, key: PrimitiveKey) -> Result<&mut Primitive, RenderError> {
        self.primitives
            .get_mut(key)
            .ok_or(RenderError::UnknownPrimitive(key))
    }

    /// Show or hide a primitive without freeing it
    pub fn set_visible(&mut self, key: PrimitiveKey, visible: bool) -> Result<(), RenderError> {
        self.primitive_mut(key)?.visible = visible;
        Ok(())
    }

    /// Submit every visible primitive, layer by layer
    ///
    /// Adjacent primitives sharing `(mode, image)` are merged into one
    /// submission when the mode permits it (strips and loops cannot be
    /// concatenated without joining their geometry).
    pub fn render(&mut self, backend: &mut dyn RenderBackend) -> BackendResult<()> {
        let mut stats = BatchStats {
            primitives: self.order.len(),
            ..BatchStats::default()
        };

        let mut sorted = self.order.clone();
        sorted.sort_by_key(|key| {
            let p = &self.primitives[*key];
            (p.layer, p.mode, p.image.map(|i| i.id))
        });

        let mut run_vertices: Vec<Vertex2D> = Vec::new();
        let mut run_indices: Vec<u32> = Vec::new();
        let mut run_state: Option<(PrimitiveMode, Option<ImageHandle>)> = None;

        for key in sorted {
            let primitive = &self.primitives[key];
            if !primitive.visible {
                stats.hidden_skipped += 1;
                continue;
            }

            let state = (primitive.mode, primitive.image);
            let mergeable = matches!(
                primitive.mode,
                PrimitiveMode::Points | PrimitiveMode::Lines | PrimitiveMode::Triangles
            );

            if run_state != Some(state) || !mergeable {
                Self::flush_run(backend, &mut run_state, &mut run_vertices, &mut run_indices, &mut stats)?;
            }

            if mergeable {
                run_state = Some(state);
                let base = run_vertices.len() as u32;
                run_vertices.extend_from_slice(&primitive.vertices);
                run_indices.extend(primitive.indices.iter().map(|i| i + base));
            } else {
                // Strip/loop primitives go out one by one.
                stats.draw_calls += 1;
                stats.vertices += primitive.vertices.len();
                backend.draw_primitives(
                    primitive.mode,
                    &primitive.vertices,
                    &primitive.indices,
                    primitive.image,
                )?;
            }
        }
        Self::flush_run(backend, &mut run_state, &mut run_vertices, &mut run_indices, &mut stats)?;

        log::trace!(
            "batch render: {} primitives in {} draw calls ({} hidden)",
            stats.primitives - stats.hidden_skipped,
            stats.draw_calls,
            stats.hidden_skipped
        );
        self.stats = stats;
        Ok(())
    }

    fn flush_run(
        backend: &mut dyn RenderBackend,
        run_state: &mut Option<(PrimitiveMode, Option<ImageHandle>)>,
        vertices: &mut Vec<Vertex2D>,
        indices: &mut Vec<u32>,
        stats: &mut BatchStats,
    ) -> BackendResult<()> {
        if let Some((mode, image)) = run_state.take() {
            if !vertices.is_empty() {
                stats.draw_calls += 1;
                stats.vertices += vertices.len();
                backend.draw_primitives(mode, vertices, indices, image)?;
            }
            vertices.clear();
            indices.clear();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backend::HeadlessBackend;
    use crate::render::color::Color;

    fn triangle_at(x: f32) -> Vec<Vertex2D> {
        vec![
            Vertex2D::colored(Vec2::new(x, 0.0), Color::WHITE),
            Vertex2D::colored(Vec2::new(x + 1.0, 0.0), Color::WHITE),
            Vertex2D::colored(Vec2::new(x, 1.0), Color::WHITE),
        ]
    }

    #[test]
    fn test_layer_bounds_checked() {
        let mut batch = BatchRenderer::new(4);
        let result = batch.add(4, PrimitiveMode::Triangles, triangle_at(0.0), vec![]);
        assert!(matches!(result, Err(RenderError::InvalidLayer { layer: 4, layer_count: 4 })));
    }

    #[test]
    fn test_same_layer_triangles_merge_into_one_call() {
        let mut batch = BatchRenderer::new(2);
        batch.add(0, PrimitiveMode::Triangles, triangle_at(0.0), vec![]).unwrap();
        batch.add(0, PrimitiveMode::Triangles, triangle_at(5.0), vec![]).unwrap();

        let mut backend = HeadlessBackend::new(100, 100);
        batch.render(&mut backend).unwrap();
        assert_eq!(backend.draw_calls(), 1);
        assert_eq!(batch.stats().vertices, 6);
    }

    #[test]
    fn test_layers_split_submissions() {
        let mut batch = BatchRenderer::new(2);
        batch.add(1, PrimitiveMode::Triangles, triangle_at(0.0), vec![]).unwrap();
        batch.add(0, PrimitiveMode::Triangles, triangle_at(5.0), vec![]).unwrap();

        let mut backend = HeadlessBackend::new(100, 100);
        batch.render(&mut backend).unwrap();
        // Different layers cannot merge even though state matches.
        assert_eq!(backend.draw_calls(), 2);
    }

    #[test]
    fn test_hidden_primitives_are_skipped() {
        let mut batch = BatchRenderer::new(1);
        let key = batch.add(0, PrimitiveMode::Triangles, triangle_at(0.0), vec![]).unwrap();
        batch.set_visible(key, false).unwrap();

        let mut backend = HeadlessBackend::new(100, 100);
        batch.render(&mut backend).unwrap();
        assert_eq!(backend.draw_calls(), 0);
        assert_eq!(batch.stats().hidden_skipped, 1);
    }

    #[test]
    fn test_merged_indices_are_rebased() {
        let mut batch = BatchRenderer::new(1);
        batch.add(0, PrimitiveMode::Triangles, triangle_at(0.0), vec![]).unwrap();
        batch.add(0, PrimitiveMode::Triangles, triangle_at(5.0), vec![]).unwrap();

        struct IndexCheck(Vec<u32>);
        impl RenderBackend for IndexCheck {
            fn surface_size(&self) -> (u32, u32) {
                (1, 1)
            }
            fn upload_camera(
                &mut self,
                _projection: &crate::foundation::math::Mat4,
                _view: &crate::foundation::math::Mat4,
            ) -> BackendResult<()> {
                Ok(())
            }
            fn draw_primitives(
                &mut self,
                _mode: PrimitiveMode,
                _vertices: &[Vertex2D],
                indices: &[u32],
                _image: Option<ImageHandle>,
            ) -> BackendResult<()> {
                self.0.extend_from_slice(indices);
                Ok(())
            }
        }

        let mut backend = IndexCheck(Vec::new());
        batch.render(&mut backend).unwrap();
        assert_eq!(backend.0, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_remove_unknown_primitive_fails() {
        let mut batch = BatchRenderer::new(1);
        let key = batch.add(0, PrimitiveMode::Points, triangle_at(0.0), vec![]).unwrap();
        batch.remove(key).unwrap();
        assert!(matches!(batch.remove(key), Err(RenderError::UnknownPrimitive(_))));
    }
}
