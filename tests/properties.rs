use flappy::game::Screen;
use flappy::{handle_activate, tick, GameConfig, GameState};
use proptest::prelude::*;

fn playing(config: &GameConfig) -> GameState {
    let mut state = GameState::new(config);
    handle_activate(&mut state, config);
    state
}

proptest! {
    #[test]
    fn velocity_drops_by_gravity_each_step(
        y in 100.0f32..550.0,
        velocity in -5.0f32..5.0,
        steps in 1usize..40,
    ) {
        let config = GameConfig::default();
        let mut state = playing(&config);
        state.bird.position.y = y;
        state.bird.velocity = velocity;
        state.pipes[0].x = 10_000.0;

        for _ in 0..steps {
            if state.screen != Screen::Playing {
                break;
            }
            let before = state.bird.velocity;
            tick(&mut state, &config);
            prop_assert_eq!(state.bird.velocity, before - config.physics.gravity);
        }
    }

    #[test]
    fn flap_sets_exact_strength(velocity in -100.0f32..100.0) {
        let config = GameConfig::default();
        let mut state = playing(&config);
        state.bird.velocity = velocity;
        handle_activate(&mut state, &config);
        prop_assert_eq!(state.bird.velocity, config.physics.flap_strength);
        prop_assert_eq!(state.screen, Screen::Playing);
    }

    #[test]
    fn offscreen_pipe_wraps_unconditionally(x in -500.0f32..-37.5, scored in any::<bool>()) {
        let config = GameConfig::default();
        let mut state = playing(&config);
        state.pipes[0].x = x;
        state.pipes[0].scored = scored;
        tick(&mut state, &config);
        prop_assert_eq!(state.pipes[0].x, config.pipe_reset_x());
        prop_assert!(!state.pipes[0].scored);
    }

    #[test]
    fn pipe_scores_at_most_once_per_pass(start_x in 205.0f32..300.0, steps in 1usize..15) {
        let config = GameConfig::default();
        let mut state = playing(&config);
        state.pipes[0].x = start_x;
        for _ in 0..steps {
            tick(&mut state, &config);
        }
        prop_assert!(state.score <= config.pipes.score_per_pipe);
    }

    #[test]
    fn starting_a_run_always_resets(
        score in 0.0f32..1000.0,
        y in -50.0f32..700.0,
        velocity in -20.0f32..20.0,
    ) {
        let config = GameConfig::default();
        let mut state = playing(&config);
        state.score = score;
        state.bird.position.y = y;
        state.bird.velocity = velocity;
        state.screen = Screen::Menu;
        state.pipes.clear();

        handle_activate(&mut state, &config);
        prop_assert_eq!(state.score, 0.0);
        prop_assert_eq!(state.bird.position.y, config.bird.start_y);
        prop_assert_eq!(state.bird.velocity, 0.0);
        prop_assert_eq!(state.pipes.len(), 1);
        prop_assert_eq!(state.pipes[0].x, config.pipe_reset_x());
        prop_assert!(!state.pipes[0].scored);
    }
}
