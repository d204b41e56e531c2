//! Collision primitives for hazards
//!
//! Everything the game tests against the player is one of three shapes: an
//! axis-aligned box, a circle, or a thick beam between two endpoints. The
//! beam test works in beam-local space so rotating sweeps and keyframed
//! diagonals share one code path with horizontal beams.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Beams shorter than this never collide
const MIN_BEAM_LENGTH: f32 = 0.001;

/// Axis-aligned box (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
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

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.w / 2.0, self.h / 2.0)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Grow the box by `pad` on every side
    pub fn padded(&self, pad: f32) -> Self {
        Self {
            x: self.x - pad,
            y: self.y - pad,
            w: self.w + pad * 2.0,
            h: self.h + pad * 2.0,
        }
    }
}

/// Circle hit area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub cx: f32,
    pub cy: f32,
    pub r: f32,
}

impl Circle {
    pub const fn new(cx: f32, cy: f32, r: f32) -> Self {
        Self { cx, cy, r }
    }

    /// Circle inscribed in a square of side `size` at (x, y)
    pub fn inscribed(x: f32, y: f32, size: f32) -> Self {
        let half = size / 2.0;
        Self::new(x + half, y + half, half)
    }
}

/// Collision shape of a hazard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Shape {
    Rect(Rect),
    Circle(Circle),
}

impl Shape {
    pub fn overlaps_rect(&self, rect: &Rect) -> bool {
        match self {
            Shape::Rect(r) => rects_overlap(r, rect),
            Shape::Circle(c) => circle_rect_overlap(c, rect),
        }
    }
}

/// AABB overlap. Touching edges do not count.
#[inline]
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// Circle vs AABB: clamp the center into the box and compare squared
/// distance against r² (strict).
pub fn circle_rect_overlap(circle: &Circle, rect: &Rect) -> bool {
    let nearest_x = circle.cx.clamp(rect.x, rect.x + rect.w);
    let nearest_y = circle.cy.clamp(rect.y, rect.y + rect.h);
    let dx = circle.cx - nearest_x;
    let dy = circle.cy - nearest_y;
    dx * dx + dy * dy < circle.r * circle.r
}

/// Check whether a beam of `thickness` between `start` and `end` touches
/// `rect`.
///
/// The rect center is rotated into beam-local space (beam along +x from the
/// origin), then tested against the beam box inflated by the rect's half
/// extents.
pub fn beam_hits_rect(start: Vec2, end: Vec2, thickness: f32, rect: &Rect) -> bool {
    let dir = end - start;
    let len = dir.length();
    if len < MIN_BEAM_LENGTH {
        return false;
    }

    let angle = dir.y.atan2(dir.x);
    let (sin, cos) = (-angle).sin_cos();

    let rel = rect.center() - start;
    let local_x = rel.x * cos - rel.y * sin;
    let local_y = rel.x * sin + rel.y * cos;

    let half = rect.half_extents();
    let half_thick = thickness / 2.0;

    local_x >= -half.x
        && local_x <= len + half.x
        && local_y >= -half_thick - half.y
        && local_y <= half_thick + half.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rects_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(rects_overlap(&a, &b));
        assert!(rects_overlap(&b, &a));
    }

    #[test]
    fn test_touching_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!rects_overlap(&a, &right));
        assert!(!rects_overlap(&a, &below));
    }

    #[test]
    fn test_circle_inside_rect_overlaps() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert!(circle_rect_overlap(&Circle::new(50.0, 25.0, 0.01), &rect));
    }

    #[test]
    fn test_circle_exactly_r_from_edge_misses() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        // Nearest point is (100, 25), distance exactly 5
        assert!(!circle_rect_overlap(&Circle::new(105.0, 25.0, 5.0), &rect));
        assert!(circle_rect_overlap(&Circle::new(104.0, 25.0, 5.0), &rect));
    }

    #[test]
    fn test_circle_corner_uses_euclidean_distance() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        // 3-4-5 triangle from the (10, 10) corner
        assert!(!circle_rect_overlap(&Circle::new(13.0, 14.0, 5.0), &rect));
        assert!(circle_rect_overlap(&Circle::new(13.0, 14.0, 5.1), &rect));
    }

    #[test]
    fn test_horizontal_beam_hits_and_misses() {
        let start = Vec2::new(0.0, 200.0);
        let end = Vec2::new(800.0, 200.0);
        let on_beam = Rect::new(100.0, 190.0, 40.0, 30.0);
        let above = Rect::new(100.0, 100.0, 40.0, 30.0);
        assert!(beam_hits_rect(start, end, 16.0, &on_beam));
        assert!(!beam_hits_rect(start, end, 16.0, &above));
    }

    #[test]
    fn test_beam_respects_thickness_margin() {
        let start = Vec2::new(0.0, 200.0);
        let end = Vec2::new(800.0, 200.0);
        // Player center 30px below the beam: 8 (half beam) + 15 (half player) = 23 < 30
        let below = Rect::new(100.0, 215.0, 40.0, 30.0);
        assert!(!beam_hits_rect(start, end, 16.0, &below));
        // 20px below: inside the inflated band
        let grazing = Rect::new(100.0, 205.0, 40.0, 30.0);
        assert!(beam_hits_rect(start, end, 16.0, &grazing));
    }

    #[test]
    fn test_diagonal_beam() {
        let start = Vec2::new(0.0, 0.0);
        let end = Vec2::new(400.0, 400.0);
        let on_diagonal = Rect::new(180.0, 185.0, 40.0, 30.0);
        let off_diagonal = Rect::new(300.0, 50.0, 40.0, 30.0);
        assert!(beam_hits_rect(start, end, 16.0, &on_diagonal));
        assert!(!beam_hits_rect(start, end, 16.0, &off_diagonal));
    }

    #[test]
    fn test_beam_past_endpoint_misses() {
        let start = Vec2::new(0.0, 200.0);
        let end = Vec2::new(300.0, 200.0);
        let past_end = Rect::new(400.0, 185.0, 40.0, 30.0);
        assert!(!beam_hits_rect(start, end, 16.0, &past_end));
    }

    #[test]
    fn test_degenerate_beam_never_collides() {
        let p = Vec2::new(120.0, 215.0);
        let rect = Rect::new(100.0, 200.0, 40.0, 30.0);
        assert!(!beam_hits_rect(p, p, 16.0, &rect));
        assert!(!beam_hits_rect(p, p + Vec2::new(0.0005, 0.0), 16.0, &rect));
    }

    #[test]
    fn test_shape_dispatch() {
        let player = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(Shape::Rect(Rect::new(5.0, 5.0, 2.0, 2.0)).overlaps_rect(&player));
        assert!(!Shape::Circle(Circle::new(30.0, 30.0, 5.0)).overlaps_rect(&player));
    }

    proptest! {
        #[test]
        fn prop_rects_overlap_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            aw in 0.0f32..200.0, ah in 0.0f32..200.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            bw in 0.0f32..200.0, bh in 0.0f32..200.0,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            prop_assert_eq!(rects_overlap(&a, &b), rects_overlap(&b, &a));
        }

        #[test]
        fn prop_adjacent_rects_never_overlap(
            x in -500.0f32..500.0, y in -500.0f32..500.0,
            w in 1.0f32..200.0, h in 1.0f32..200.0,
        ) {
            let a = Rect::new(x, y, w, h);
            let b = Rect::new(a.x + a.w, y, w, h);
            prop_assert!(!rects_overlap(&a, &b));
        }

        #[test]
        fn prop_circle_centered_inside_overlaps(
            fx in 0.01f32..0.99, fy in 0.01f32..0.99,
            w in 1.0f32..300.0, h in 1.0f32..300.0,
            r in 0.001f32..50.0,
        ) {
            let rect = Rect::new(10.0, 20.0, w, h);
            let circle = Circle::new(rect.x + w * fx, rect.y + h * fy, r);
            prop_assert!(circle_rect_overlap(&circle, &rect));
        }
    }
}
