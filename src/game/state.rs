use super::bird::Bird;
use super::pipe::Pipe;
use super::states::Screen;
use crate::config::GameConfig;

/// Everything that changes while the game runs.
///
/// `bird` only carries meaning while `screen` is [`Screen::Playing`], and
/// `pipes` is empty on every other screen.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub screen: Screen,
    pub bird: Bird,
    pub pipes: Vec<Pipe>,
    pub score: f32,
}

impl GameState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            screen: Screen::Menu,
            bird: Bird::spawn(&config.bird),
            pipes: Vec::new(),
            score: 0.0,
        }
    }

    /// Resets everything a fresh run needs.
    pub fn start_run(&mut self, config: &GameConfig) {
        self.screen = Screen::Playing;
        self.score = 0.0;
        self.bird = Bird::spawn(&config.bird);
        self.pipes.clear();
        self.pipes.push(Pipe::spawn(
            config.pipe_reset_x(),
            &config.pipes,
            config.world_height(),
        ));
    }

    /// Score as shown on screen, truncated toward zero.
    pub fn display_score(&self) -> u32 {
        self.score.max(0.0).trunc() as u32
    }
}
