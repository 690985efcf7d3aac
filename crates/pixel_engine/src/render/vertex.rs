//! Vertex layout shared between the batch renderer and backends

use crate::foundation::math::Vec2;
use crate::render::color::Color;

/// A single 2D vertex as uploaded to the backend
///
/// Plain-old-data so a backend can hand the whole vertex slice to the GPU
/// as one byte buffer (`bytemuck::cast_slice`).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex2D {
    /// World-space position
    pub position: [f32; 2],
    /// Texture coordinates; ignored for untextured primitives
    pub uv: [f32; 2],
    /// Normalized RGBA color multiplier
    pub color: [f32; 4],
}

impl Vertex2D {
    /// Create an untextured vertex with a flat color
    pub fn colored(position: Vec2, color: Color) -> Self {
        Self {
            position: [position.x, position.y],
            uv: [0.0, 0.0],
            color: color.to_f32(),
        }
    }

    /// Create a textured vertex; the color acts as a tint
    pub fn textured(position: Vec2, uv: [f32; 2], tint: Color) -> Self {
        Self {
            position: [position.x, position.y],
            uv,
            color: tint.to_f32(),
        }
    }

    /// Shift this vertex by a world-space delta
    pub fn translate(&mut self, delta: Vec2) {
        self.position[0] += delta.x;
        self.position[1] += delta.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_pod() {
        let v = Vertex2D::colored(Vec2::new(1.0, 2.0), Color::WHITE);
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), std::mem::size_of::<Vertex2D>());
    }

    #[test]
    fn test_translate() {
        let mut v = Vertex2D::colored(Vec2::new(1.0, 2.0), Color::RED);
        v.translate(Vec2::new(3.0, -1.0));
        assert_eq!(v.position, [4.0, 1.0]);
    }
}
