use std::path::PathBuf;

use anyhow::Result;
use flappy::GameConfig;
use flappy::engine::EngineApp;
use flappy::engine::core::EngineConfig;
use flappy::game::FlappyGame;

fn main() -> Result<()> {
    init_tracing();

    let config = GameConfig::resolve(std::env::args_os().nth(1).map(PathBuf::from))?;
    let engine_config = EngineConfig {
        app_name: config.window.title.clone(),
        max_steps_per_frame: config.window.max_steps_per_frame,
    };
    let app = EngineApp::new(engine_config, FlappyGame::new(config))?;
    app.run()
}

fn init_tracing() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already set");
    }
}
