//! Axis-aligned path segments
//!
//! A segment is one traversable stretch of the maze: a horizontal or
//! vertical line with a fixed cross-axis coordinate and an inclusive
//! extent along its own axis. All containment tests take a symmetric
//! tolerance so movement and turning stay forgiving.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Tiny extent cushion to defeat accumulated float steps at segment ends.
const EXTENT_EPS: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// One axis-aligned traversable stretch of the maze.
///
/// Invariant: `start <= end`, enforced by the constructors. Immutable
/// after network build.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub orientation: Orientation,
    /// Cross-axis coordinate: y for horizontal segments, x for vertical.
    pub fixed: f32,
    /// Extent start along the segment's own axis.
    pub start: f32,
    /// Extent end along the segment's own axis.
    pub end: f32,
}

impl Segment {
    /// Horizontal segment at `y`, spanning `[x0, x1]` in either order.
    pub fn horizontal(y: f32, x0: f32, x1: f32) -> Self {
        Self {
            orientation: Orientation::Horizontal,
            fixed: y,
            start: x0.min(x1),
            end: x0.max(x1),
        }
    }

    /// Vertical segment at `x`, spanning `[y0, y1]` in either order.
    pub fn vertical(x: f32, y0: f32, y1: f32) -> Self {
        Self {
            orientation: Orientation::Vertical,
            fixed: x,
            start: y0.min(y1),
            end: y0.max(y1),
        }
    }

    #[inline]
    pub fn is_horizontal(&self) -> bool {
        self.orientation == Orientation::Horizontal
    }

    /// Extent length along the segment's own axis.
    #[inline]
    pub fn length(&self) -> f32 {
        self.end - self.start
    }

    /// Perpendicular distance from the point to the segment's centerline.
    #[inline]
    pub fn alignment_distance(&self, p: Vec2) -> f32 {
        match self.orientation {
            Orientation::Horizontal => (p.y - self.fixed).abs(),
            Orientation::Vertical => (p.x - self.fixed).abs(),
        }
    }

    /// Whether the point lies on this segment: within the alignment band
    /// and inside the inclusive extent, both widened by `tolerance`.
    pub fn contains(&self, p: Vec2, tolerance: f32) -> bool {
        let (along, across) = match self.orientation {
            Orientation::Horizontal => (p.x, (p.y - self.fixed).abs()),
            Orientation::Vertical => (p.y, (p.x - self.fixed).abs()),
        };
        across <= tolerance
            && along >= self.start - tolerance - EXTENT_EPS
            && along <= self.end + tolerance + EXTENT_EPS
    }

    /// Both endpoints as board points.
    pub fn endpoints(&self) -> [Vec2; 2] {
        match self.orientation {
            Orientation::Horizontal => [
                Vec2::new(self.start, self.fixed),
                Vec2::new(self.end, self.fixed),
            ],
            Orientation::Vertical => [
                Vec2::new(self.fixed, self.start),
                Vec2::new(self.fixed, self.end),
            ],
        }
    }

    /// Whether the point sits within `tolerance` of either endpoint,
    /// measured along the segment's own axis.
    pub fn near_endpoint(&self, p: Vec2, tolerance: f32) -> bool {
        let along = match self.orientation {
            Orientation::Horizontal => p.x,
            Orientation::Vertical => p.y,
        };
        (along - self.start).abs() <= tolerance || (along - self.end).abs() <= tolerance
    }

    /// Snap the point's cross-axis coordinate onto the centerline.
    pub fn align(&self, p: Vec2) -> Vec2 {
        match self.orientation {
            Orientation::Horizontal => Vec2::new(p.x, self.fixed),
            Orientation::Vertical => Vec2::new(self.fixed, p.y),
        }
    }

    /// Board point at the given along-axis coordinate on the centerline.
    pub fn point_at(&self, along: f32) -> Vec2 {
        match self.orientation {
            Orientation::Horizontal => Vec2::new(along, self.fixed),
            Orientation::Vertical => Vec2::new(self.fixed, along),
        }
    }
}

/// Axis-aligned blocked region (buildings on the board art).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_normalizes_extent() {
        let seg = Segment::horizontal(100.0, 200.0, 0.0);
        assert!(seg.start <= seg.end);
        assert_eq!(seg.start, 0.0);
        assert_eq!(seg.end, 200.0);
    }

    #[test]
    fn test_contains_alignment_band() {
        let seg = Segment::horizontal(100.0, 0.0, 200.0);
        assert!(seg.contains(Vec2::new(50.0, 100.0), 12.0));
        assert!(seg.contains(Vec2::new(50.0, 111.0), 12.0));
        assert!(!seg.contains(Vec2::new(50.0, 113.0), 12.0));
    }

    #[test]
    fn test_contains_extent_with_tolerance() {
        let seg = Segment::vertical(100.0, 0.0, 200.0);
        assert!(seg.contains(Vec2::new(100.0, -10.0), 12.0));
        assert!(!seg.contains(Vec2::new(100.0, -15.0), 12.0));
        assert!(seg.contains(Vec2::new(100.0, 210.0), 12.0));
    }

    #[test]
    fn test_near_endpoint() {
        let seg = Segment::horizontal(100.0, 0.0, 200.0);
        assert!(seg.near_endpoint(Vec2::new(5.0, 100.0), 12.0));
        assert!(seg.near_endpoint(Vec2::new(195.0, 100.0), 12.0));
        assert!(!seg.near_endpoint(Vec2::new(100.0, 100.0), 12.0));
    }

    #[test]
    fn test_align_snaps_cross_axis_only() {
        let seg = Segment::vertical(100.0, 0.0, 200.0);
        let snapped = seg.align(Vec2::new(104.0, 50.0));
        assert_eq!(snapped, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(10.0, 10.0, 30.0, 20.0);
        assert!(r.contains(Vec2::new(25.0, 15.0)));
        assert!(!r.contains(Vec2::new(45.0, 15.0)));
    }
}
