//! Backend abstraction for the rendering system
//!
//! This module defines the trait a graphics backend must implement to
//! draw for the engine, plus a headless implementation used by tests and
//! non-visual tools. Window creation, swapchains and shader plumbing all
//! live on the other side of this boundary.

use crate::foundation::math::Mat4;
use crate::render::error::RenderError;
use crate::render::vertex::Vertex2D;
use crate::assets::ImageHandle;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// How a run of vertices is assembled into geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrimitiveMode {
    /// Each vertex is an independent point
    Points,
    /// Every pair of vertices is an independent segment
    Lines,
    /// Vertices form a connected polyline
    LineStrip,
    /// Vertices form a closed polyline
    LineLoop,
    /// Indexed triangle list
    Triangles,
}

/// Main rendering backend trait
///
/// The engine's contract with a graphics API: upload one orthographic
/// `(projection, view)` matrix pair that all subsequent primitives
/// sample, and submit runs of vertices sharing draw state. Implementors
/// are expected to translate one `draw_primitives` call into one draw
/// call (or as close to one as the API allows).
pub trait RenderBackend {
    /// Get the current drawable surface size in pixels (width, height)
    fn surface_size(&self) -> (u32, u32);

    /// Upload the camera matrices used by all following draws this frame
    fn upload_camera(&mut self, projection: &Mat4, view: &Mat4) -> BackendResult<()>;

    /// Submit one batch of vertices sharing mode and texture state
    ///
    /// `indices` may be empty for non-indexed modes. `image` is the
    /// texture to sample, or `None` for flat-colored geometry.
    fn draw_primitives(
        &mut self,
        mode: PrimitiveMode,
        vertices: &[Vertex2D],
        indices: &[u32],
        image: Option<ImageHandle>,
    ) -> BackendResult<()>;
}

/// A backend that records submissions without touching a GPU
///
/// Used by the engine's own tests and by headless tools; doubles as the
/// reference for how little a real backend needs to implement.
#[derive(Debug)]
pub struct HeadlessBackend {
    width: u32,
    height: u32,
    camera_uploads: u32,
    last_camera: Option<(Mat4, Mat4)>,
    draw_calls: u32,
    vertices_submitted: u64,
}

impl HeadlessBackend {
    /// Create a headless backend with a fixed surface size
    pub fn new(width: u32, height: u32) -> Self {
        log::debug!("created headless backend ({}x{})", width, height);
        Self {
            width,
            height,
            camera_uploads: 0,
            last_camera: None,
            draw_calls: 0,
            vertices_submitted: 0,
        }
    }

    /// Number of camera uploads received so far
    pub fn camera_uploads(&self) -> u32 {
        self.camera_uploads
    }

    /// The most recently uploaded `(projection, view)` pair
    pub fn last_camera(&self) -> Option<&(Mat4, Mat4)> {
        self.last_camera.as_ref()
    }

    /// Number of `draw_primitives` submissions received so far
    pub fn draw_calls(&self) -> u32 {
        self.draw_calls
    }

    /// Total vertex count across all submissions
    pub fn vertices_submitted(&self) -> u64 {
        self.vertices_submitted
    }

    /// Reset the recorded counters
    pub fn reset_counters(&mut self) {
        self.camera_uploads = 0;
        self.draw_calls = 0;
        self.vertices_submitted = 0;
    }

    /// Change the reported surface size, as a window resize would
    pub fn set_surface_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

impl RenderBackend for HeadlessBackend {
    fn surface_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn upload_camera(&mut self, projection: &Mat4, view: &Mat4) -> BackendResult<()> {
        self.camera_uploads += 1;
        self.last_camera = Some((*projection, *view));
        Ok(())
    }

    fn draw_primitives(
        &mut self,
        mode: PrimitiveMode,
        vertices: &[Vertex2D],
        indices: &[u32],
        image: Option<ImageHandle>,
    ) -> BackendResult<()> {
        if vertices.is_empty() {
            return Err(RenderError::EmptyPrimitive);
        }
        self.draw_calls += 1;
        self.vertices_submitted += vertices.len() as u64;
        log::trace!(
            "headless draw: {:?}, {} vertices, {} indices, image {:?}",
            mode,
            vertices.len(),
            indices.len(),
            image.map(|i| i.id)
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::render::color::Color;

    #[test]
    fn test_headless_counts_submissions() {
        let mut backend = HeadlessBackend::new(160, 144);
        assert_eq!(backend.surface_size(), (160, 144));

        let verts = [Vertex2D::colored(Vec2::zeros(), Color::WHITE); 3];
        backend
            .draw_primitives(PrimitiveMode::Triangles, &verts, &[0, 1, 2], None)
            .unwrap();
        assert_eq!(backend.draw_calls(), 1);
        assert_eq!(backend.vertices_submitted(), 3);
    }

    #[test]
    fn test_headless_rejects_empty_submission() {
        let mut backend = HeadlessBackend::new(64, 64);
        let result = backend.draw_primitives(PrimitiveMode::Points, &[], &[], None);
        assert!(matches!(result, Err(RenderError::EmptyPrimitive)));
    }
}
