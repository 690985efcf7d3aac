//! Rendering layer: camera projection, layer-batched primitives, and the
//! backend contract
//!
//! The engine never talks to a graphics API directly. Scenes build
//! [`batch::BatchRenderer`] primitives and arm a [`camera::Camera`]; both
//! speak to a [`backend::RenderBackend`] implementation supplied by the
//! embedding application. The only backend shipped in-tree is the
//! headless one used by tests and tools.

pub mod backend;
pub mod batch;
pub mod camera;
pub mod color;
mod error;
pub mod vertex;

pub use backend::{BackendResult, HeadlessBackend, PrimitiveMode, RenderBackend};
pub use batch::{BatchRenderer, BatchStats, Primitive, PrimitiveKey};
pub use camera::{Camera, HudCamera, PixelCamera};
pub use color::Color;
pub use error::RenderError;
pub use vertex::Vertex2D;
