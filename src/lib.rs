//! Flappy - a minimal Flappy Bird clone.
//!
//! - `game`: screen state machine, physics, collision, scoring and the draw
//!   list projection. No window, GPU or audio types.
//! - `engine`: window, renderer, audio and input host that drives a [`game::Game`].
//! - `config`: tunable constants, optionally loaded from RON.
//! - `ui`: draw commands shared by both sides.

pub mod config;
pub mod engine;
pub mod game;
pub mod ui;

pub use config::GameConfig;
pub use game::{handle_activate, render, tick, FlappyGame, GameEvent, GameState, Screen};
