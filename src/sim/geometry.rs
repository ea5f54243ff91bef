//! Collision helpers for circles
//!
//! Everything in both games is a circle, so collision is distance against
//! summed radii.

use glam::Vec2;

/// Whether two circles overlap (touching edges do not count)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Whether `point` lies strictly inside the circle
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance(center) < radius
}

/// Whether `candidate` keeps at least `min_distance` from every placed point
pub fn is_clear_of(candidate: Vec2, placed: &[Vec2], min_distance: f32) -> bool {
    placed.iter().all(|p| candidate.distance(*p) >= min_distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(8.0, 0.0), 4.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(9.0, 0.0), 4.0));
        assert!(!circles_overlap(Vec2::ZERO, 1.0, Vec2::new(30.0, 40.0), 1.0));
    }

    #[test]
    fn test_point_in_circle() {
        let c = Vec2::new(10.0, 10.0);
        assert!(point_in_circle(Vec2::new(12.0, 11.0), c, 3.0));
        assert!(!point_in_circle(Vec2::new(13.0, 10.0), c, 3.0));
    }

    #[test]
    fn test_is_clear_of() {
        let placed = [Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0)];
        assert!(is_clear_of(Vec2::new(50.0, 0.0), &placed, 50.0));
        assert!(!is_clear_of(Vec2::new(60.0, 0.0), &placed, 50.0));
        assert!(is_clear_of(Vec2::new(1.0, 1.0), &[], 1000.0));
    }
}
