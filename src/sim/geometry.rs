//! Axis-aligned rectangle primitives
//!
//! `a * b` is the Minkowski difference used by the swept test and `a + b`
//! the bounding union. Overlap and containment are inclusive of edges.

use std::ops::{Add, Mul};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::TILE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle measured in tiles
    pub fn tile_aligned(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self::new(
            x as f32 * TILE_SIZE,
            y as f32 * TILE_SIZE,
            w as f32 * TILE_SIZE,
            h as f32 * TILE_SIZE,
        )
    }

    /// Rectangle of the given size centred on `center`
    pub fn centered(center: Vec2, w: f32, h: f32) -> Self {
        Self::new(center.x - 0.5 * w, center.y - 0.5 * h, w, h)
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Grow by `e` on every side (shrink when negative)
    pub fn expand(&self, e: f32) -> Self {
        Self::new(self.x - e, self.y - e, self.w + 2.0 * e, self.h + 2.0 * e)
    }

    pub fn translate(&self, d: Vec2) -> Self {
        Self::new(self.x + d.x, self.y + d.y, self.w, self.h)
    }

    /// Edge-inclusive overlap test
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && self.y <= other.bottom()
            && other.x <= self.right()
            && other.y <= self.bottom()
    }

    /// Overlap test that ignores touching edges
    pub fn overlaps_strict(&self, other: &Rect) -> bool {
        self.right() > other.x
            && self.bottom() > other.y
            && self.x < other.right()
            && self.y < other.bottom()
    }

    /// Edge-inclusive point containment
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

/// Minkowski difference
impl Mul for Rect {
    type Output = Rect;

    fn mul(self, b: Rect) -> Rect {
        Rect::new(
            self.x - (b.x + b.w),
            self.y - (b.y + b.h),
            self.w + b.w,
            self.h + b.h,
        )
    }
}

/// Bounding union
impl Add for Rect {
    type Output = Rect;

    fn add(self, b: Rect) -> Rect {
        let x = self.x.min(b.x);
        let y = self.y.min(b.y);
        let right = self.right().max(b.right());
        let bottom = self.bottom().max(b.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }
}
