use glam::Vec2;

use super::collision::Aabb;
use crate::config::PipeConfig;

/// A top and a bottom segment sharing one horizontal position and one gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipe {
    /// Horizontal center shared by both segments.
    pub x: f32,
    pub width: f32,
    pub gap_center: f32,
    pub gap_size: f32,
    /// Height of the world; the top segment reaches up to it.
    pub ceiling: f32,
    pub scored: bool,
}

impl Pipe {
    pub fn spawn(x: f32, config: &PipeConfig, ceiling: f32) -> Self {
        Self {
            x,
            width: config.width,
            gap_center: config.gap_center,
            gap_size: config.gap_size,
            ceiling,
            scored: false,
        }
    }

    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn gap_bottom(&self) -> f32 {
        self.gap_center - self.gap_size / 2.0
    }

    pub fn gap_top(&self) -> f32 {
        self.gap_center + self.gap_size / 2.0
    }

    pub fn top_segment(&self) -> Aabb {
        Aabb::new(
            Vec2::new(self.left(), self.gap_top()),
            Vec2::new(self.right(), self.ceiling.max(self.gap_top())),
        )
    }

    pub fn bottom_segment(&self) -> Aabb {
        Aabb::new(
            Vec2::new(self.left(), 0.0_f32.min(self.gap_bottom())),
            Vec2::new(self.right(), self.gap_bottom()),
        )
    }

    pub fn segments(&self) -> [Aabb; 2] {
        [self.top_segment(), self.bottom_segment()]
    }

    /// Collision boxes. The top one has no upper bound, so flying over the
    /// window edge still hits the pipe.
    pub fn hit_boxes(&self) -> [Aabb; 2] {
        let mut top = self.top_segment();
        top.max.y = f32::INFINITY;
        [top, self.bottom_segment()]
    }

    pub fn scroll(&mut self, speed: f32) {
        self.x -= speed;
    }

    pub fn is_offscreen_left(&self) -> bool {
        self.right() < 0.0
    }

    /// Moves the pipe back to `reset_x` and makes it scoreable again.
    pub fn wrap_to(&mut self, reset_x: f32) {
        self.x = reset_x;
        self.scored = false;
    }

    /// True once the trailing edge is strictly left of `bird_x`.
    pub fn passed(&self, bird_x: f32) -> bool {
        self.left() < bird_x
    }
}
