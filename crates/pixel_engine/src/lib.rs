//! # Pixel Engine
//!
//! A 2D scene-graph engine with layer-batched rendering.
//!
//! ## Features
//!
//! - **Scene Graph**: Positioned components composed into entity-owned
//!   trees, with cascading position updates
//! - **Sealed Construction**: Two-phase spawn protocol that wires
//!   position, parent and scene state before user code runs
//! - **Batched Rendering**: One layer-sorted submission per frame for
//!   everything sharing the scene batch
//! - **Pixel Cameras**: World-relative and screen-anchored orthographic
//!   projections with pixel-perfect zoom
//! - **Backend-Agnostic**: All drawing goes through one small trait;
//!   a headless implementation ships for tests and tools
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pixel_engine::prelude::*;
//!
//! struct Square;
//!
//! impl ComponentHooks for Square {}
//!
//! impl Component for Square {
//!     type Args = ();
//!
//!     fn on_spawn(scene: &mut Scene, me: ComponentId, _args: ()) -> Result<Self, SceneError> {
//!         let position = scene.position_of(me)?;
//!         scene.spawn_child::<Shape2D>(
//!             me,
//!             position,
//!             Shape2DArgs::rectangle(Vec2::new(8.0, 8.0), Color::WHITE),
//!         )?;
//!         Ok(Self)
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GameConfig::default();
//!     let backend = HeadlessBackend::new(config.window.width, config.window.height);
//!     let mut game = Game::new(config, backend);
//!
//!     game.create_scene("world")
//!         .spawn_component::<Square>(Vec2::new(10.0, 20.0), ())?;
//!
//!     loop {
//!         game.frame()?;
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod components;
pub mod config;
pub mod foundation;
pub mod input;
pub mod render;
pub mod scene;

mod game;

pub use game::Game;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{ImageHandle, TilesetHandle},
        components::{FpsDisplay, Shape2D, Shape2DArgs, Sprite, SpriteArgs, TileText, TileTextArgs},
        config::{ConfigError, GameConfig, WindowConfig},
        foundation::{
            math::{Mat4, Vec2},
            time::{FrameTimer, Stopwatch},
        },
        input::{InputState, KeyCode, KeyModifiers},
        render::{
            BatchRenderer, Camera, Color, HeadlessBackend, HudCamera, PixelCamera, PrimitiveMode,
            RenderBackend, RenderError, Vertex2D,
        },
        scene::{
            Capabilities, Component, ComponentHooks, ComponentId, Entity, EntityHooks, EntityId,
            Scene, SceneError, SceneHooks, SceneResult,
        },
        Game,
    };
}
