//! Swept rectangle collision
//!
//! Both rectangles translate at constant velocity over one unit of time.
//! The test is a slab sweep of the origin against their Minkowski difference,
//! Y axis first then X, so X wins when both axes enter at the same time.

use glam::Vec2;

use super::geometry::Rect;
use crate::consts::PHYS_EPSILON;

/// First contact between two moving rectangles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Fraction of the step at which contact occurs, in `[0, 1]`
    pub time: f32,
    /// Axis-aligned unit normal of the entering axis, or zero
    pub normal: Vec2,
}

/// Entry/exit interval narrowed axis by axis
struct Window {
    start: f32,
    end: f32,
    normal: Vec2,
}

impl Window {
    fn narrow(&mut self, enter: f32, exit: f32, normal: Vec2) {
        if enter >= self.start {
            self.start = enter;
            self.normal = normal;
        }
        if exit < self.end {
            self.end = exit;
        }
    }
}

/// Clip one axis of the Minkowski rectangle. Returns false when the axis
/// rules out contact for this step.
fn clip_axis(min: f32, extent: f32, vel: f32, axis: Vec2, window: &mut Window) -> bool {
    let max = min + extent;
    if vel > 0.0 {
        if max < 0.0 {
            return false;
        }
        window.narrow(min / vel, max / vel, axis);
        true
    } else if vel < 0.0 {
        if min > 0.0 {
            return false;
        }
        window.narrow(max / vel, min / vel, -axis);
        true
    } else {
        // Stationary on this axis: must already straddle it
        min < 0.0 && max > 0.0
    }
}

/// Time of impact of rectangle `a` moving by `da` against `b` moving by `db`.
pub fn sweep(a: &Rect, da: Vec2, b: &Rect, db: Vec2) -> Option<Contact> {
    let m = *a * *b;
    let vel = db - da;
    let mut window = Window {
        start: 0.0,
        end: 1.0,
        normal: Vec2::ZERO,
    };

    if !clip_axis(m.y, m.h, vel.y, Vec2::Y, &mut window) {
        return None;
    }
    if !clip_axis(m.x, m.w, vel.x, Vec2::X, &mut window) {
        return None;
    }

    if window.start < window.end + PHYS_EPSILON {
        Some(Contact {
            time: (window.start - PHYS_EPSILON).max(0.0),
            normal: window.normal,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "{a} != {b}");
    }

    #[test]
    fn test_falling_box_hits_at_half_step() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(0.0, -20.0, 10.0, 10.0);
        let contact = sweep(&a, Vec2::ZERO, &b, Vec2::new(0.0, 20.0)).expect("contact");
        assert_close(contact.time, 0.5 - PHYS_EPSILON);
        assert_eq!(contact.normal, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_slow_approach_misses_this_step() {
        // Needs two full steps at this speed
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(0.0, -20.0, 10.0, 10.0);
        assert!(sweep(&a, Vec2::ZERO, &b, Vec2::new(0.0, 5.0)).is_none());
    }

    #[test]
    fn test_mover_against_static_wall() {
        let mover = Rect::new(0.0, 0.0, 8.0, 8.0);
        let wall = Rect::new(12.0, 0.0, 8.0, 8.0);
        let contact = sweep(&mover, Vec2::new(8.0, 0.0), &wall, Vec2::ZERO).expect("contact");
        assert_close(contact.time, 0.5 - PHYS_EPSILON);
        assert_eq!(contact.normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_stationary_axis_requires_strict_straddle() {
        // Sliding along the top face never counts as contact
        let mover = Rect::new(0.0, -8.0, 8.0, 8.0);
        let floor = Rect::new(0.0, 0.0, 64.0, 8.0);
        assert!(sweep(&mover, Vec2::new(4.0, 0.0), &floor, Vec2::ZERO).is_none());
    }

    #[test]
    fn test_moving_away_never_collides() {
        let mover = Rect::new(0.0, 0.0, 8.0, 8.0);
        let wall = Rect::new(12.0, 0.0, 8.0, 8.0);
        assert!(sweep(&mover, Vec2::new(-8.0, 0.0), &wall, Vec2::ZERO).is_none());
    }

    #[test]
    fn test_diagonal_tie_prefers_x_normal() {
        // Both axes enter at the same instant
        let mover = Rect::new(0.0, 0.0, 4.0, 4.0);
        let block = Rect::new(6.0, 6.0, 4.0, 4.0);
        let contact = sweep(&mover, Vec2::new(4.0, 4.0), &block, Vec2::ZERO).expect("contact");
        assert_eq!(contact.normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_overlapping_start_clamps_to_zero() {
        let mover = Rect::new(0.0, 0.0, 8.0, 8.0);
        let wall = Rect::new(4.0, 4.0, 8.0, 8.0);
        let contact = sweep(&mover, Vec2::new(1.0, 1.0), &wall, Vec2::ZERO).expect("contact");
        assert_eq!(contact.time, 0.0);
    }
}
