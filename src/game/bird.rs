use glam::Vec2;

use super::collision::Aabb;
use crate::config::BirdConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bird {
    /// Center of the sprite. `x` never changes after spawn.
    pub position: Vec2,
    pub velocity: f32,
    pub size: Vec2,
}

impl Bird {
    pub fn spawn(config: &BirdConfig) -> Self {
        Self {
            position: Vec2::new(config.x, config.start_y),
            velocity: 0.0,
            size: Vec2::new(config.width, config.height),
        }
    }

    pub fn fall(&mut self, gravity: f32) {
        self.velocity -= gravity;
        self.position.y += self.velocity;
    }

    pub fn flap(&mut self, strength: f32) {
        self.velocity = strength;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.position, self.size)
    }

    pub fn bottom(&self) -> f32 {
        self.position.y - self.size.y / 2.0
    }

    pub fn on_floor(&self) -> bool {
        self.bottom() <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_at_rest() {
        let bird = Bird::spawn(&BirdConfig::default());
        assert_eq!(bird.position, Vec2::new(200.0, 300.0));
        assert_eq!(bird.velocity, 0.0);
    }

    #[test]
    fn fall_integrates_velocity_first() {
        let mut bird = Bird::spawn(&BirdConfig::default());
        bird.fall(0.5);
        assert_eq!(bird.velocity, -0.5);
        assert_eq!(bird.position.y, 299.5);
    }

    #[test]
    fn floor_contact_uses_bottom_edge() {
        let mut bird = Bird::spawn(&BirdConfig::default());
        bird.position.y = 12.0;
        assert!(bird.on_floor());
        bird.position.y = 12.5;
        assert!(!bird.on_floor());
    }
}
