//! Tunable game constants.
//!
//! Every field has a default, so a RON file only needs the values it
//! overrides:
//!
//! ```ron
//! (
//!     physics: (gravity: 0.4),
//!     pipes: (gap_size: 200.0),
//! )
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ui::Color;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "flappy.ron";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub physics: PhysicsConfig,
    pub bird: BirdConfig,
    pub pipes: PipeConfig,
    pub assets: AssetConfig,
    pub text: TextConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    pub target_fps: u32,
    /// Upper bound on fixed steps run for a single redraw.
    pub max_steps_per_frame: u32,
    pub background: Color,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Flappy Bird Clone".to_string(),
            width: 800,
            height: 600,
            resizable: false,
            target_fps: 60,
            max_steps_per_frame: 5,
            background: Color::SKY_BLUE,
        }
    }
}

/// Per-step quantities. Physics is frame-coupled, so these are units per
/// fixed step, not per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub flap_strength: f32,
    pub scroll_speed: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            flap_strength: 10.0,
            scroll_speed: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BirdConfig {
    pub x: f32,
    pub start_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for BirdConfig {
    fn default() -> Self {
        Self {
            x: 200.0,
            start_y: 300.0,
            width: 34.0,
            height: 24.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipeConfig {
    pub width: f32,
    pub gap_center: f32,
    pub gap_size: f32,
    /// Distance right of the window edge where pipes spawn and wrap to.
    pub offscreen_offset: f32,
    pub score_per_pipe: f32,
    pub color: Color,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            width: 80.0,
            gap_center: 300.0,
            gap_size: 180.0,
            offscreen_offset: 100.0,
            score_per_pipe: 1.0,
            color: Color::PIPE_GREEN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub bird_sprite: PathBuf,
    pub hit_sound: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            bird_sprite: PathBuf::from("assets/bird.png"),
            hit_sound: PathBuf::from("assets/hit.wav"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub title: String,
    pub start_prompt: String,
    pub game_over: String,
    pub return_prompt: String,
    pub heading_size: f32,
    pub prompt_size: f32,
    pub score_size: f32,
    pub color: Color,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            title: "Welcome to Flappy Bird!".to_string(),
            start_prompt: "Press SPACE to start".to_string(),
            game_over: "Game Over".to_string(),
            return_prompt: "Press SPACE to return to the menu".to_string(),
            heading_size: 48.0,
            prompt_size: 24.0,
            score_size: 36.0,
            color: Color::BLACK,
        }
    }
}

impl GameConfig {
    pub fn from_ron(source: &str) -> Result<Self> {
        ron::from_str(source).context("invalid game config")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_ron(&source)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded game config");
        Ok(config)
    }

    /// An explicit path must exist. Without one, `flappy.ron` in the working
    /// directory is used when present, otherwise the defaults.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::load(fallback)
                } else {
                    tracing::debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn world_width(&self) -> f32 {
        self.window.width as f32
    }

    pub fn world_height(&self) -> f32 {
        self.window.height as f32
    }

    /// Horizontal position pipes spawn at and wrap back to.
    pub fn pipe_reset_x(&self) -> f32 {
        self.world_width() + self.pipes.offscreen_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = GameConfig::from_ron("()").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn default_menu_greets_the_player() {
        let text = TextConfig::default();
        assert_eq!(text.title, "Welcome to Flappy Bird!");
        assert_eq!(text.color, Color::BLACK);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = GameConfig::from_ron(
            "(physics: (gravity: 0.25), window: (title: \"Test\"), pipes: (gap_size: 200.0))",
        )
        .unwrap();
        assert_eq!(config.physics.gravity, 0.25);
        assert_eq!(config.physics.flap_strength, 10.0);
        assert_eq!(config.window.title, "Test");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.pipes.gap_size, 200.0);
        assert_eq!(config.pipes.offscreen_offset, 100.0);
    }

    #[test]
    fn malformed_section_is_an_error() {
        assert!(GameConfig::from_ron("(physics: 3)").is_err());
        assert!(GameConfig::from_ron("(window: (width: \"wide\"))").is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = GameConfig::resolve(Some(PathBuf::from("does/not/exist.ron"))).unwrap_err();
        assert!(format!("{err:#}").contains("does/not/exist.ron"));
    }

    #[test]
    fn reset_x_is_right_of_window() {
        let config = GameConfig::default();
        assert_eq!(config.pipe_reset_x(), 900.0);
    }
}
