//! Camera and projection abstraction
//!
//! A camera turns a focus point and zoom factor into the orthographic
//! `(projection, view)` pair a backend samples for every draw. Two
//! variants exist: [`PixelCamera`] for world-space rendering and
//! [`HudCamera`] for screen-anchored overlays.
//!
//! The projection is a pure function of `(focus, zoom, viewport)` and is
//! recomputed on every [`Camera::arm`]; the upload to the backend is
//! skipped when the pair matches the last one applied, tracked per camera
//! instance.

use crate::foundation::math::{Mat4, Vec2};
use crate::render::backend::{BackendResult, RenderBackend};

/// A camera defining the perspective with which scenes are rendered
pub trait Camera {
    /// The projection matrix computed by the most recent arm
    fn projection(&self) -> &Mat4;

    /// The view matrix computed by the most recent arm
    fn view(&self) -> &Mat4;

    /// Recompute the projection for the backend's current surface and
    /// upload the `(projection, view)` pair if it changed
    fn arm(&mut self, backend: &mut dyn RenderBackend) -> BackendResult<()>;
}

/// Shared upload-elision state for the camera implementations
#[derive(Debug)]
struct Armed {
    projection: Mat4,
    view: Mat4,
    last_applied: Option<(Mat4, Mat4)>,
}

impl Armed {
    fn new() -> Self {
        Self {
            projection: Mat4::identity(),
            view: Mat4::identity(),
            last_applied: None,
        }
    }

    fn apply(&mut self, projection: Mat4, backend: &mut dyn RenderBackend) -> BackendResult<()> {
        self.projection = projection;
        let pair = (self.projection, self.view);
        if self.last_applied != Some(pair) {
            backend.upload_camera(&self.projection, &self.view)?;
            self.last_applied = Some(pair);
        }
        Ok(())
    }
}

/// An orthographic camera using pixels as units, world-relative
///
/// The focus point is the world coordinate mapped to the center of the
/// viewport. The zoom factor scales pixels per world unit; integer zoom
/// values keep rendering pixel-perfect.
#[derive(Debug)]
pub struct PixelCamera {
    focus: Vec2,
    zoom: f32,
    armed: Armed,
}

impl PixelCamera {
    /// Create a camera centered on `focus` with the given zoom
    pub fn new(focus: Vec2, zoom: f32) -> Self {
        let mut camera = Self {
            focus,
            zoom: 1.0,
            armed: Armed::new(),
        };
        camera.set_zoom(zoom);
        camera
    }

    /// The world point currently mapped to the viewport center
    pub fn focus(&self) -> Vec2 {
        self.focus
    }

    /// Move the camera focus; takes effect at the next arm
    pub fn set_focus(&mut self, focus: Vec2) {
        self.focus = focus;
        log::trace!("camera focus updated to ({}, {})", focus.x, focus.y);
    }

    /// The current zoom factor
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom factor; non-positive values are rejected
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom > 0.0 {
            self.zoom = zoom;
        } else {
            log::warn!("ignoring non-positive camera zoom {}", zoom);
        }
    }

    fn compute_projection(&self, width: u32, height: u32) -> Mat4 {
        let half_w = width as f32 / (2.0 * self.zoom);
        let half_h = height as f32 / (2.0 * self.zoom);
        Mat4::new_orthographic(
            self.focus.x - half_w,
            self.focus.x + half_w,
            self.focus.y - half_h,
            self.focus.y + half_h,
            -1.0,
            1.0,
        )
    }
}

impl Default for PixelCamera {
    fn default() -> Self {
        Self::new(Vec2::zeros(), 1.0)
    }
}

impl Camera for PixelCamera {
    fn projection(&self) -> &Mat4 {
        &self.armed.projection
    }

    fn view(&self) -> &Mat4 {
        &self.armed.view
    }

    fn arm(&mut self, backend: &mut dyn RenderBackend) -> BackendResult<()> {
        let (width, height) = backend.surface_size();
        let projection = self.compute_projection(width, height);
        self.armed.apply(projection, backend)
    }
}

/// An orthographic camera anchored to the screen, for HUD rendering
///
/// `(0, 0)` is the bottom-left corner of the viewport regardless of any
/// world camera; coordinates are screen pixels divided by the zoom.
#[derive(Debug)]
pub struct HudCamera {
    zoom: f32,
    armed: Armed,
}

impl HudCamera {
    /// Create a screen-anchored camera with the given zoom
    pub fn new(zoom: f32) -> Self {
        let mut camera = Self {
            zoom: 1.0,
            armed: Armed::new(),
        };
        camera.set_zoom(zoom);
        camera
    }

    /// The current zoom factor
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom factor; non-positive values are rejected
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom > 0.0 {
            self.zoom = zoom;
        } else {
            log::warn!("ignoring non-positive camera zoom {}", zoom);
        }
    }

    fn compute_projection(&self, width: u32, height: u32) -> Mat4 {
        Mat4::new_orthographic(
            0.0,
            width as f32 / self.zoom,
            0.0,
            height as f32 / self.zoom,
            -1.0,
            1.0,
        )
    }
}

impl Default for HudCamera {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Camera for HudCamera {
    fn projection(&self) -> &Mat4 {
        &self.armed.projection
    }

    fn view(&self) -> &Mat4 {
        &self.armed.view
    }

    fn arm(&mut self, backend: &mut dyn RenderBackend) -> BackendResult<()> {
        let (width, height) = backend.surface_size();
        let projection = self.compute_projection(width, height);
        self.armed.apply(projection, backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backend::HeadlessBackend;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn test_focus_maps_to_viewport_center() {
        let mut camera = PixelCamera::new(Vec2::new(10.0, 20.0), 1.0);
        let mut backend = HeadlessBackend::new(160, 144);
        camera.arm(&mut backend).unwrap();

        let ndc = camera
            .projection()
            .transform_point(&Point3::new(10.0, 20.0, 0.0));
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zoom_scales_extents() {
        let mut camera = PixelCamera::new(Vec2::zeros(), 2.0);
        let mut backend = HeadlessBackend::new(160, 144);
        camera.arm(&mut backend).unwrap();

        // At 2x zoom the right edge is 40 world units from center.
        let ndc = camera
            .projection()
            .transform_point(&Point3::new(40.0, 36.0, 0.0));
        assert_relative_eq!(ndc.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(ndc.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_arm_is_pure_and_elides_redundant_uploads() {
        let mut camera = PixelCamera::new(Vec2::new(3.0, 4.0), 1.0);
        let mut backend = HeadlessBackend::new(160, 144);

        camera.arm(&mut backend).unwrap();
        let first = *camera.projection();
        camera.arm(&mut backend).unwrap();
        let second = *camera.projection();

        assert_eq!(first, second);
        assert_eq!(backend.camera_uploads(), 1);

        camera.set_focus(Vec2::new(5.0, 4.0));
        camera.arm(&mut backend).unwrap();
        assert_eq!(backend.camera_uploads(), 2);
    }

    #[test]
    fn test_viewport_change_triggers_upload() {
        let mut camera = PixelCamera::default();
        let mut backend = HeadlessBackend::new(160, 144);
        camera.arm(&mut backend).unwrap();
        backend.set_surface_size(320, 288);
        camera.arm(&mut backend).unwrap();
        assert_eq!(backend.camera_uploads(), 2);
    }

    #[test]
    fn test_hud_camera_origin_is_bottom_left() {
        let mut camera = HudCamera::new(1.0);
        let mut backend = HeadlessBackend::new(160, 144);
        camera.arm(&mut backend).unwrap();

        let ndc = camera
            .projection()
            .transform_point(&Point3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(ndc.x, -1.0, epsilon = 1e-6);
        assert_relative_eq!(ndc.y, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_non_positive_zoom_rejected() {
        let mut camera = PixelCamera::new(Vec2::zeros(), 0.0);
        assert_relative_eq!(camera.zoom(), 1.0);
        camera.set_zoom(-3.0);
        assert_relative_eq!(camera.zoom(), 1.0);
        camera.set_zoom(4.0);
        assert_relative_eq!(camera.zoom(), 4.0);
    }
}
