pub mod bird;
pub mod collision;
pub mod pipe;
pub mod render;
pub mod state;
pub mod states;
pub mod tick;

use std::path::PathBuf;

pub use bird::Bird;
pub use collision::Aabb;
pub use pipe::Pipe;
pub use render::{render, BIRD_TEXTURE};
pub use state::GameState;
pub use states::Screen;
pub use tick::{handle_activate, tick, CrashCause, GameEvent};

use crate::config::GameConfig;
use crate::ui::{Color, DrawCommand};

/// Sound key the collision cue is registered under.
pub const HIT_SOUND: &str = "hit";

#[derive(Debug, Clone)]
pub struct GameWindowDescriptor {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    pub background: Color,
}

/// Files a game needs loaded before its first frame.
#[derive(Debug, Clone, Default)]
pub struct AssetManifest {
    pub textures: Vec<(String, PathBuf)>,
    pub sounds: Vec<(String, PathBuf)>,
}

/// What the engine drives each frame.
pub trait Game {
    fn name(&self) -> &str;
    fn window_descriptor(&self) -> GameWindowDescriptor;
    fn assets(&self) -> AssetManifest;

    /// Fixed steps per second the engine should call [`Game::update`] at.
    fn target_fps(&self) -> u32 {
        60
    }

    /// One activate input. Returns keys of sounds to play.
    fn activate(&mut self) -> Vec<String>;

    /// One fixed step. Returns keys of sounds to play.
    fn update(&mut self) -> Vec<String>;

    fn draw_commands(&self) -> Vec<DrawCommand>;
}

pub struct FlappyGame {
    config: GameConfig,
    state: GameState,
}

impl FlappyGame {
    pub fn new(config: GameConfig) -> Self {
        let state = GameState::new(&config);
        Self { config, state }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    fn sound_cues(events: &[GameEvent]) -> Vec<String> {
        let mut cues = Vec::new();
        for event in events {
            match event {
                GameEvent::Started => tracing::info!(target: "game", "run started"),
                GameEvent::Flapped => tracing::trace!(target: "game", "flap"),
                GameEvent::Scored { score } => {
                    tracing::debug!(target: "game", score, "pipe passed")
                }
                GameEvent::Crashed { cause } => {
                    tracing::info!(target: "game", ?cause, "bird crashed");
                    cues.push(HIT_SOUND.to_string());
                }
                GameEvent::ReturnedToMenu => tracing::debug!(target: "game", "back to menu"),
            }
        }
        cues
    }
}

impl Game for FlappyGame {
    fn name(&self) -> &str {
        "Flappy"
    }

    fn window_descriptor(&self) -> GameWindowDescriptor {
        let window = &self.config.window;
        GameWindowDescriptor {
            title: window.title.clone(),
            width: window.width,
            height: window.height,
            resizable: window.resizable,
            background: window.background,
        }
    }

    fn assets(&self) -> AssetManifest {
        AssetManifest {
            textures: vec![(
                BIRD_TEXTURE.to_string(),
                self.config.assets.bird_sprite.clone(),
            )],
            sounds: vec![(HIT_SOUND.to_string(), self.config.assets.hit_sound.clone())],
        }
    }

    fn target_fps(&self) -> u32 {
        self.config.window.target_fps
    }

    fn activate(&mut self) -> Vec<String> {
        let events = handle_activate(&mut self.state, &self.config);
        Self::sound_cues(&events)
    }

    fn update(&mut self) -> Vec<String> {
        let events = tick(&mut self.state, &self.config);
        Self::sound_cues(&events)
    }

    fn draw_commands(&self) -> Vec<DrawCommand> {
        render(&self.state, &self.config)
    }
}
