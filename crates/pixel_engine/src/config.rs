//! Game configuration
//!
//! Serde-backed configuration for the game driver, loadable from RON
//! files so window size and rendering knobs live outside the binary.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file could not be parsed as RON
    #[error("config parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Window configuration handed to the embedding platform layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,

    /// Window width in pixels
    pub width: u32,

    /// Window height in pixels
    pub height: u32,

    /// VSync setting
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Pixel Engine".to_owned(),
            // Four times the classic 160x144 handheld screen.
            width: 640,
            height: 576,
            vsync: true,
        }
    }
}

/// Top-level game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Window configuration
    pub window: WindowConfig,

    /// Batch layers allocated per scene
    pub batch_layers: u8,

    /// Default zoom for newly created scene cameras
    pub camera_zoom: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            batch_layers: 10,
            camera_zoom: 1.0,
        }
    }
}

impl GameConfig {
    /// Load a configuration from a RON file
    pub fn from_ron_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sensible() {
        let config = GameConfig::default();
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 576);
        assert_eq!(config.batch_layers, 10);
        assert!(config.camera_zoom > 0.0);
    }

    #[test]
    fn test_partial_ron_fills_in_defaults() {
        let config: GameConfig =
            ron::from_str("(window: (title: \"Demo\", width: 320, height: 288))").unwrap();
        assert_eq!(config.window.title, "Demo");
        assert_eq!(config.window.width, 320);
        // Unspecified fields come from the defaults.
        assert!(config.window.vsync);
        assert_eq!(config.batch_layers, 10);
    }

    #[test]
    fn test_ron_round_trip() {
        let config = GameConfig {
            batch_layers: 4,
            camera_zoom: 2.0,
            ..GameConfig::default()
        };
        let text = ron::to_string(&config).unwrap();
        let parsed: GameConfig = ron::from_str(&text).unwrap();
        assert_eq!(parsed.batch_layers, 4);
        assert_eq!(parsed.camera_zoom, 2.0);
        assert_eq!(parsed.window.title, config.window.title);
    }
}
