//! Opaque asset handles
//!
//! Asset loading and decoding live outside the engine; an asset manager
//! hands components already-uploaded resources as opaque handles carrying
//! just the metadata the engine needs for geometry (pixel dimensions,
//! tile grids). The engine never inspects pixel data.

/// Handle to an image already uploaded to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle {
    /// Backend-assigned identifier
    pub id: u64,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

/// A fixed-grid tile atlas over an [`ImageHandle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TilesetHandle {
    /// The backing atlas image
    pub image: ImageHandle,
    /// Width of one tile in pixels
    pub tile_width: u32,
    /// Height of one tile in pixels
    pub tile_height: u32,
    /// Number of tiles per atlas row
    pub columns: u32,
}

/// Normalized texture rectangle of one tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    /// Left edge
    pub u0: f32,
    /// Bottom edge
    pub v0: f32,
    /// Right edge
    pub u1: f32,
    /// Top edge
    pub v1: f32,
}

impl TilesetHandle {
    /// Compute the normalized UV rectangle of the tile at `index`
    ///
    /// Tiles are numbered row-major from the top-left of the atlas.
    pub fn uv_rect(&self, index: u32) -> UvRect {
        let col = index % self.columns;
        let row = index / self.columns;
        let w = self.image.width as f32;
        let h = self.image.height as f32;
        let u0 = (col * self.tile_width) as f32 / w;
        let v1 = 1.0 - (row * self.tile_height) as f32 / h;
        UvRect {
            u0,
            v0: v1 - self.tile_height as f32 / h,
            u1: u0 + self.tile_width as f32 / w,
            v1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tileset() -> TilesetHandle {
        TilesetHandle {
            image: ImageHandle { id: 1, width: 64, height: 32 },
            tile_width: 8,
            tile_height: 8,
            columns: 8,
        }
    }

    #[test]
    fn test_first_tile_is_top_left() {
        let uv = tileset().uv_rect(0);
        assert_relative_eq!(uv.u0, 0.0);
        assert_relative_eq!(uv.u1, 0.125);
        assert_relative_eq!(uv.v1, 1.0);
        assert_relative_eq!(uv.v0, 0.75);
    }

    #[test]
    fn test_tiles_wrap_to_next_row() {
        let uv = tileset().uv_rect(9);
        assert_relative_eq!(uv.u0, 0.125);
        assert_relative_eq!(uv.v1, 0.75);
    }
}
