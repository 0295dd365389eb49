//! Projects a [`GameState`] into a draw list. Never mutates the state.

use super::state::GameState;
use super::states::Screen;
use crate::config::GameConfig;
use crate::ui::{Anchor, DrawCommand};

/// Texture key the bird sprite is registered under.
pub const BIRD_TEXTURE: &str = "bird";

pub fn render(state: &GameState, config: &GameConfig) -> Vec<DrawCommand> {
    match state.screen {
        Screen::Menu => centered_pair(config, &config.text.title, &config.text.start_prompt),
        Screen::Playing => playing(state, config),
        Screen::GameOver => {
            centered_pair(config, &config.text.game_over, &config.text.return_prompt)
        }
    }
}

fn centered_pair(config: &GameConfig, heading: &str, prompt: &str) -> Vec<DrawCommand> {
    let text = &config.text;
    let center_x = config.world_width() / 2.0;
    let center_y = config.world_height() / 2.0;
    vec![
        DrawCommand::text(
            heading,
            [center_x, center_y + text.heading_size],
            text.color,
            text.heading_size,
            Anchor::Center,
        ),
        DrawCommand::text(
            prompt,
            [center_x, center_y - text.prompt_size],
            text.color,
            text.prompt_size,
            Anchor::Center,
        ),
    ]
}

fn playing(state: &GameState, config: &GameConfig) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(state.pipes.len() * 2 + 2);
    for pipe in &state.pipes {
        for segment in pipe.segments() {
            if !segment.is_empty() {
                commands.push(DrawCommand::rect(segment.to_rect(), config.pipes.color));
            }
        }
    }
    commands.push(DrawCommand::sprite(
        BIRD_TEXTURE,
        state.bird.bounds().to_rect(),
    ));
    commands.push(DrawCommand::text(
        state.display_score().to_string(),
        [config.world_width() / 2.0, config.world_height() - 20.0],
        config.text.color,
        config.text.score_size,
        Anchor::TopCenter,
    ));
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::handle_activate;
    use crate::ui::TextCommand;

    fn texts(commands: &[DrawCommand]) -> Vec<&TextCommand> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn menu_shows_title_and_prompt_centered() {
        let config = GameConfig::default();
        let state = GameState::new(&config);
        let commands = render(&state, &config);
        let texts = texts(&commands);
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0].content, config.text.title);
        assert_eq!(texts[1].content, config.text.start_prompt);
        assert!(texts.iter().all(|t| t.anchor == Anchor::Center));
        assert!(texts.iter().all(|t| t.position[0] == 400.0));
    }

    #[test]
    fn playing_draws_segments_bird_and_truncated_score() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        handle_activate(&mut state, &config);
        state.score = 2.9;
        let commands = render(&state, &config);
        let rects = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { .. }))
            .count();
        assert_eq!(rects, 2);
        assert!(commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Sprite { texture, .. } if texture == BIRD_TEXTURE)));
        assert_eq!(texts(&commands)[0].content, "2");
    }

    #[test]
    fn game_over_text() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        state.screen = Screen::GameOver;
        let commands = render(&state, &config);
        assert_eq!(texts(&commands)[0].content, "Game Over");
    }

    #[test]
    fn render_leaves_state_untouched() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        handle_activate(&mut state, &config);
        let before = state.clone();
        let _ = render(&state, &config);
        assert_eq!(state, before);
    }
}
