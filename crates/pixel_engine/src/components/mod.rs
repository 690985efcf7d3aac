//! Built-in components
//!
//! Ready-made component types built on the scene's shared batch: colored
//! shapes, textured sprites, tileset text and a frame-rate probe. They
//! double as the reference for how user components are written — batch
//! primitives allocated in `on_spawn`, kept in sync from the position and
//! visibility hooks, freed in `on_destroy`.

pub mod debug;
pub mod shapes;
pub mod sprite;
pub mod text;

pub use debug::FpsDisplay;
pub use shapes::{Shape2D, Shape2DArgs};
pub use sprite::{Sprite, SpriteArgs};
pub use text::{TileText, TileTextArgs};
