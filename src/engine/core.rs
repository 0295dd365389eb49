use std::time::Duration;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub app_name: String,
    pub max_steps_per_frame: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            app_name: "Flappy".to_string(),
            max_steps_per_frame: 5,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FrameTiming {
    pub delta_seconds: f32,
    pub fps: f32,
}

impl FrameTiming {
    pub fn from_delta(delta: Duration) -> Self {
        let delta_seconds = delta.as_secs_f32();
        let fps = if delta_seconds > 0.0 {
            1.0 / delta_seconds
        } else {
            0.0
        };
        Self { delta_seconds, fps }
    }
}

/// Turns wall-clock frame deltas into whole fixed steps.
pub struct FixedTimestep {
    frame_duration: f32,
    accumulator: f32,
    max_steps: u32,
}

impl FixedTimestep {
    pub fn from_fps(fps: u32) -> Self {
        let frame_duration = 1.0 / fps.max(1) as f32;
        Self {
            frame_duration,
            accumulator: 0.0,
            max_steps: u32::MAX,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    pub fn accumulate(&mut self, delta: f32) {
        self.accumulator += delta;
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.frame_duration {
            self.accumulator -= self.frame_duration;
            true
        } else {
            false
        }
    }

    /// Accumulates `delta` and returns how many steps to run now. Time beyond
    /// `max_steps` is dropped rather than carried into later frames.
    pub fn steps_for(&mut self, delta: f32) -> u32 {
        self.accumulate(delta);
        let mut steps = 0;
        while steps < self.max_steps && self.should_step() {
            steps += 1;
        }
        if steps == self.max_steps {
            self.accumulator = self.accumulator.min(self.frame_duration);
        }
        steps
    }

    pub fn frame_duration(&self) -> f32 {
        self.frame_duration
    }
}
