//! Math utilities and types
//!
//! Provides the fundamental math types for 2D rendering and scene
//! management. All engine code goes through these aliases rather than
//! naming `nalgebra` types directly.

pub use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

/// 2D vector type, used for world positions and offsets
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type, used for projection and view matrices
pub type Mat4 = Matrix4<f32>;

/// Math utility functions
pub mod utils {
    /// Linearly interpolate between `a` and `b` by `t`
    ///
    /// `t` is not clamped; values outside `[0, 1]` extrapolate.
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * std::f32::consts::PI / 180.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lerp_endpoints() {
        assert_relative_eq!(utils::lerp(0.0, 10.0, 0.0), 0.0);
        assert_relative_eq!(utils::lerp(0.0, 10.0, 1.0), 10.0);
        assert_relative_eq!(utils::lerp(2.0, 4.0, 0.5), 3.0);
    }

    #[test]
    fn test_deg_to_rad() {
        assert_relative_eq!(utils::deg_to_rad(180.0), std::f32::consts::PI);
    }

    #[test]
    fn test_vec2_arithmetic() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, -1.0);
        assert_relative_eq!((a + b).x, 4.0);
        assert_relative_eq!((a + b).y, 1.0);
        assert_relative_eq!((b - a).x, 2.0);
    }
}
