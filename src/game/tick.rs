//! Screen transitions and the fixed-step update.

use super::state::GameState;
use super::states::Screen;
use crate::config::GameConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashCause {
    Pipe,
    Floor,
}

/// Things that happened during a transition or a step, for the host to react
/// to (sound, logging).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Started,
    Flapped,
    Scored { score: f32 },
    Crashed { cause: CrashCause },
    ReturnedToMenu,
}

/// Applies one activate input (key press or click).
pub fn handle_activate(state: &mut GameState, config: &GameConfig) -> Vec<GameEvent> {
    match state.screen {
        Screen::Menu => {
            state.start_run(config);
            vec![GameEvent::Started]
        }
        Screen::Playing => {
            state.bird.flap(config.physics.flap_strength);
            vec![GameEvent::Flapped]
        }
        Screen::GameOver => {
            state.screen = Screen::Menu;
            vec![GameEvent::ReturnedToMenu]
        }
    }
}

/// Advances the game by one fixed step. Does nothing outside
/// [`Screen::Playing`].
pub fn tick(state: &mut GameState, config: &GameConfig) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.screen != Screen::Playing {
        return events;
    }

    state.bird.fall(config.physics.gravity);

    let reset_x = config.pipe_reset_x();
    for pipe in &mut state.pipes {
        pipe.scroll(config.physics.scroll_speed);
        if pipe.is_offscreen_left() {
            pipe.wrap_to(reset_x);
        }
    }

    let bird_box = state.bird.bounds();
    let crash = if state
        .pipes
        .iter()
        .flat_map(|pipe| pipe.hit_boxes())
        .any(|segment| bird_box.overlaps(&segment))
    {
        Some(CrashCause::Pipe)
    } else if state.bird.on_floor() {
        Some(CrashCause::Floor)
    } else {
        None
    };
    if let Some(cause) = crash {
        state.screen = Screen::GameOver;
        events.push(GameEvent::Crashed { cause });
    }

    // Scoring runs on the crash step too.
    let bird_x = state.bird.position.x;
    for pipe in &mut state.pipes {
        if !pipe.scored && pipe.passed(bird_x) {
            pipe.scored = true;
            state.score += config.pipes.score_per_pipe;
            events.push(GameEvent::Scored { score: state.score });
        }
    }

    if state.screen != Screen::Playing {
        state.pipes.clear();
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing() -> (GameState, GameConfig) {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        handle_activate(&mut state, &config);
        (state, config)
    }

    #[test]
    fn menu_starts_run() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        assert_eq!(state.screen, Screen::Menu);
        let events = handle_activate(&mut state, &config);
        assert_eq!(events, vec![GameEvent::Started]);
        assert_eq!(state.screen, Screen::Playing);
        assert_eq!(state.pipes.len(), 1);
        assert_eq!(state.pipes[0].x, 900.0);
    }

    #[test]
    fn tick_ignored_outside_playing() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        let before = state.clone();
        assert!(tick(&mut state, &config).is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn crash_clears_pipes_after_scoring() {
        let (mut state, config) = playing();
        // Pipe just left of scoring, bird inside the bottom segment.
        state.pipes[0].x = 242.0;
        state.bird.position.y = 100.0;
        let events = tick(&mut state, &config);
        assert_eq!(state.screen, Screen::GameOver);
        assert!(events.contains(&GameEvent::Crashed {
            cause: CrashCause::Pipe
        }));
        assert!(events.contains(&GameEvent::Scored { score: 1.0 }));
        assert_eq!(state.score, 1.0);
        assert!(state.pipes.is_empty());
    }

    #[test]
    fn flying_over_the_window_still_hits_pipe() {
        let (mut state, config) = playing();
        state.pipes[0].x = 250.0;
        state.bird.position.y = 700.0;
        state.bird.velocity = 0.0;
        let events = tick(&mut state, &config);
        assert_eq!(state.screen, Screen::GameOver);
        assert!(events.contains(&GameEvent::Crashed {
            cause: CrashCause::Pipe
        }));
    }

    #[test]
    fn game_over_returns_to_menu_without_reset() {
        let (mut state, config) = playing();
        state.score = 3.0;
        state.screen = Screen::GameOver;
        let events = handle_activate(&mut state, &config);
        assert_eq!(events, vec![GameEvent::ReturnedToMenu]);
        assert_eq!(state.screen, Screen::Menu);
        assert_eq!(state.score, 3.0);
    }
}
