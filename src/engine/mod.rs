pub mod audio;
pub mod core;
pub mod platform;
pub mod renderer;
pub mod resources;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use audio::AudioEngine;
use self::core::{EngineConfig, FixedTimestep, FrameTiming};
use platform::{InputAction, PlatformLayer};
use renderer::Renderer;
use resources::ResourceManager;
use wgpu::SurfaceError;
use winit::{
    dpi::LogicalSize,
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

use crate::game::Game;

pub struct EngineApp {
    config: EngineConfig,
    platform: PlatformLayer,
    resources: ResourceManager,
    audio: AudioEngine,
    timestep: FixedTimestep,
    game: Box<dyn Game>,
    frame_count: u64,
}

impl EngineApp {
    /// Loads every asset the game asks for. A missing or broken file is
    /// fatal here, before any window opens.
    pub fn new(config: EngineConfig, game: impl Game + 'static) -> Result<Self> {
        let resources =
            ResourceManager::load(&game.assets()).context("failed to load game assets")?;
        let mut audio = AudioEngine::new();
        for (key, bytes) in resources.sounds() {
            audio.register(key, bytes.clone())?;
        }
        let timestep =
            FixedTimestep::from_fps(game.target_fps()).with_max_steps(config.max_steps_per_frame);
        Ok(Self {
            platform: PlatformLayer::new(),
            resources,
            audio,
            timestep,
            game: Box::new(game),
            config,
            frame_count: 0,
        })
    }

    pub fn run(self) -> Result<()> {
        tracing::info!(
            target: "engine",
            app = %self.config.app_name,
            game = %self.game.name(),
            "Engine starting"
        );

        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let mut engine = self;
        let window_prefs = engine.game.window_descriptor();
        let world_size = [window_prefs.width as f32, window_prefs.height as f32];

        let window = Arc::new(
            WindowBuilder::new()
                .with_title(window_prefs.title.clone())
                .with_resizable(window_prefs.resizable)
                .with_inner_size(LogicalSize::new(
                    window_prefs.width as f64,
                    window_prefs.height as f64,
                ))
                .build(&event_loop)
                .context("failed to create window")?,
        );
        let mut renderer: Option<Renderer> = None;
        let mut last_frame = Instant::now();
        // Set by the handler before it exits on an unrecoverable error.
        let mut fatal: Option<anyhow::Error> = None;
        let fatal_slot = &mut fatal;

        event_loop
            .run(move |event, target| match event {
                Event::Resumed => {
                    if renderer.is_none() {
                        match pollster::block_on(Renderer::new(
                            window.clone(),
                            world_size,
                            window_prefs.background,
                        )) {
                            Ok(mut new_renderer) => {
                                for (key, image) in engine.resources.textures() {
                                    new_renderer.register_texture(key, image);
                                }
                                tracing::info!(
                                    target: "engine",
                                    textures = engine.resources.texture_count(),
                                    sounds = engine.resources.sound_count(),
                                    muted = engine.audio.is_muted(),
                                    "renderer initialized"
                                );
                                renderer = Some(new_renderer);
                                last_frame = Instant::now();
                            }
                            Err(err) => {
                                tracing::error!(
                                    target: "engine",
                                    err = %format!("{err:#}"),
                                    "failed to initialize renderer"
                                );
                                *fatal_slot = Some(err.context("failed to initialize renderer"));
                                target.exit();
                            }
                        }
                    }
                }
                Event::AboutToWait => {
                    if renderer.is_some() {
                        window.request_redraw();
                    }
                }
                Event::WindowEvent { window_id, event } if window_id == window.id() => {
                    match event {
                        WindowEvent::CloseRequested => {
                            tracing::info!(target: "engine", "window close requested");
                            target.exit();
                        }
                        WindowEvent::Resized(size) => {
                            if let Some(renderer) = renderer.as_mut() {
                                renderer.resize(size);
                            }
                        }
                        WindowEvent::ScaleFactorChanged {
                            mut inner_size_writer,
                            ..
                        } => {
                            let new_size = window.inner_size();
                            let _ = inner_size_writer.request_inner_size(new_size);
                            if let Some(renderer) = renderer.as_mut() {
                                renderer.resize(new_size);
                            }
                        }
                        WindowEvent::RedrawRequested => {
                            if let Some(renderer) = renderer.as_mut() {
                                let now = Instant::now();
                                let delta = now.duration_since(last_frame);
                                last_frame = now;

                                engine.tick(delta);
                                let commands = engine.game.draw_commands();
                                let scale = window.scale_factor() as f32;
                                let Err(err) = renderer.render(&commands, scale) else {
                                    return;
                                };
                                match recover_from(err) {
                                    SurfaceRecovery::Reconfigure => {
                                        renderer.resize(window.inner_size());
                                    }
                                    SurfaceRecovery::Skip => {
                                        tracing::warn!(
                                            target: "engine",
                                            "surface timeout, retrying next frame"
                                        );
                                    }
                                    SurfaceRecovery::Fatal(err) => {
                                        tracing::error!(
                                            target: "engine",
                                            err = %format!("{err:#}"),
                                            "shutting down engine"
                                        );
                                        *fatal_slot = Some(err);
                                        target.exit();
                                    }
                                }
                            }
                        }
                        other => {
                            engine.platform.handle_window_event(&other);
                        }
                    }
                }
                _ => {}
            })
            .map_err(|err| anyhow!(err))?;

        if let Some(err) = fatal {
            return Err(err);
        }
        tracing::info!(target: "engine", "Engine shutdown complete");
        Ok(())
    }

    /// Drains queued input, then runs however many fixed steps `delta` covers.
    fn tick(&mut self, delta: Duration) {
        let timing = FrameTiming::from_delta(delta);
        let mut cues = Vec::new();
        for action in self.platform.pump_events() {
            match action {
                InputAction::Activate => cues.extend(self.game.activate()),
            }
        }
        let steps = self.timestep.steps_for(timing.delta_seconds);
        for _ in 0..steps {
            cues.extend(self.game.update());
        }
        for cue in &cues {
            self.audio.play(cue);
        }

        self.frame_count += 1;
        tracing::trace!(
            target: "engine",
            frame = self.frame_count,
            frame_delta_ms = %delta.as_millis(),
            fps = timing.fps,
            steps,
            uptime_s = self.platform.uptime().as_secs(),
            "frame tick"
        );
    }
}

/// What the frame loop does after a failed present.
#[derive(Debug)]
enum SurfaceRecovery {
    Reconfigure,
    Skip,
    Fatal(anyhow::Error),
}

fn recover_from(err: SurfaceError) -> SurfaceRecovery {
    match err {
        SurfaceError::Lost | SurfaceError::Outdated => SurfaceRecovery::Reconfigure,
        SurfaceError::Timeout => SurfaceRecovery::Skip,
        SurfaceError::OutOfMemory => {
            SurfaceRecovery::Fatal(anyhow!(err).context("GPU out of memory while rendering"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_surface_is_reconfigured() {
        assert!(matches!(
            recover_from(SurfaceError::Lost),
            SurfaceRecovery::Reconfigure
        ));
        assert!(matches!(
            recover_from(SurfaceError::Outdated),
            SurfaceRecovery::Reconfigure
        ));
        assert!(matches!(
            recover_from(SurfaceError::Timeout),
            SurfaceRecovery::Skip
        ));
    }

    #[test]
    fn out_of_memory_carries_an_error() {
        let SurfaceRecovery::Fatal(err) = recover_from(SurfaceError::OutOfMemory) else {
            panic!("out of memory must be fatal");
        };
        assert!(format!("{err:#}").contains("out of memory"));
    }
}
