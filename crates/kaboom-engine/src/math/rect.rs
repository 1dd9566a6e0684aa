//! Axis-aligned rectangles and the collision predicates built on them.
//!
//! `col_rect_rect` is inclusive (touching edges collide) and backs solid
//! contact; `overlap_rect_rect` is strict and backs sensor overlap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Rectangle spanning `p1` (min corner) to `p2` (max corner).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub p1: Vec2,
    pub p2: Vec2,
}

impl Rect {
    pub fn new(p1: Vec2, p2: Vec2) -> Self {
        Self { p1, p2 }
    }

    /// Rectangle with its corners reordered so that `p1 <= p2` componentwise.
    pub fn normalized(self) -> Self {
        Self {
            p1: self.p1.min(self.p2),
            p2: self.p1.max(self.p2),
        }
    }

    pub fn width(&self) -> f32 {
        self.p2.x - self.p1.x
    }

    pub fn height(&self) -> f32 {
        self.p2.y - self.p1.y
    }
}

pub fn col_rect_rect(r1: &Rect, r2: &Rect) -> bool {
    r1.p2.x >= r2.p1.x && r1.p1.x <= r2.p2.x && r1.p2.y >= r2.p1.y && r1.p1.y <= r2.p2.y
}

pub fn overlap_rect_rect(r1: &Rect, r2: &Rect) -> bool {
    r1.p2.x > r2.p1.x && r1.p1.x < r2.p2.x && r1.p2.y > r2.p1.y && r1.p1.y < r2.p2.y
}

/// Point containment; the bottom edge is exclusive.
pub fn col_rect_pt(r: &Rect, pt: Vec2) -> bool {
    pt.x >= r.p1.x && pt.x <= r.p2.x && pt.y >= r.p1.y && pt.y < r.p2.y
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x1: f32, y1: f32, x2: f32, y2: f32) -> Rect {
        Rect::new(Vec2::new(x1, y1), Vec2::new(x2, y2))
    }

    #[test]
    fn touching_edges_collide_but_do_not_overlap() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(10.0, 0.0, 20.0, 10.0);
        assert!(col_rect_rect(&a, &b));
        assert!(!overlap_rect_rect(&a, &b));
    }

    #[test]
    fn predicates_are_symmetric_and_overlap_implies_collide() {
        let rects = [
            rect(0.0, 0.0, 10.0, 10.0),
            rect(5.0, 5.0, 15.0, 15.0),
            rect(10.0, 10.0, 12.0, 12.0),
            rect(-3.0, 2.0, 0.0, 4.0),
            rect(20.0, 20.0, 30.0, 30.0),
        ];
        for a in &rects {
            for b in &rects {
                assert_eq!(col_rect_rect(a, b), col_rect_rect(b, a));
                assert_eq!(overlap_rect_rect(a, b), overlap_rect_rect(b, a));
                if overlap_rect_rect(a, b) {
                    assert!(col_rect_rect(a, b));
                }
            }
        }
    }

    #[test]
    fn normalized_orders_corners() {
        let r = rect(10.0, -2.0, 0.0, 4.0).normalized();
        assert_eq!(r.p1, Vec2::new(0.0, -2.0));
        assert_eq!(r.p2, Vec2::new(10.0, 4.0));
        assert_eq!(r.width(), 10.0);
    }

    #[test]
    fn point_on_bottom_edge_is_outside() {
        let r = rect(0.0, 0.0, 10.0, 10.0);
        assert!(col_rect_pt(&r, Vec2::new(10.0, 0.0)));
        assert!(!col_rect_pt(&r, Vec2::new(5.0, 10.0)));
    }
}
