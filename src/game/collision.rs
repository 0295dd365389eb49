use glam::Vec2;

use crate::ui::Rect;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Boxes that only touch along an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    pub fn to_rect(self) -> Rect {
        let size = self.size();
        Rect {
            x: self.min.x,
            y: self.min.y,
            width: size.x,
            height: size.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_at(x: f32, y: f32) -> Aabb {
        Aabb::from_center(Vec2::new(x, y), Vec2::ONE)
    }

    #[test]
    fn overlapping_boxes() {
        assert!(unit_at(0.0, 0.0).overlaps(&unit_at(0.5, 0.5)));
        assert!(unit_at(0.5, 0.5).overlaps(&unit_at(0.0, 0.0)));
    }

    #[test]
    fn separated_boxes() {
        assert!(!unit_at(0.0, 0.0).overlaps(&unit_at(2.0, 0.0)));
        assert!(!unit_at(0.0, 0.0).overlaps(&unit_at(0.0, -2.0)));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        assert!(!unit_at(0.0, 0.0).overlaps(&unit_at(1.0, 0.0)));
    }

    #[test]
    fn contained_box_overlaps() {
        let outer = Aabb::from_center(Vec2::ZERO, Vec2::splat(10.0));
        assert!(outer.overlaps(&unit_at(1.0, 1.0)));
    }

    #[test]
    fn rect_conversion() {
        let rect = Aabb::new(Vec2::new(1.0, 2.0), Vec2::new(4.0, 8.0)).to_rect();
        assert_eq!(rect.width, 3.0);
        assert_eq!(rect.height, 6.0);
        assert_eq!(rect.top(), 8.0);
    }
}
