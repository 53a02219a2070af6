//! Static path network and its geometric queries
//!
//! The maze is a fixed, authored set of axis-aligned segments. Nothing is
//! searched at runtime; every query is a direct geometric test against the
//! segment list. Intersections between segment pairs are derived lazily
//! and cached.

use std::cell::RefCell;
use std::collections::HashMap;

use glam::Vec2;

use super::segment::{Orientation, Segment};

/// Index into [`PathNetwork::segments`]. Stable for the network's lifetime.
pub type SegmentId = usize;

/// The fixed maze graph: segments plus derived intersections.
#[derive(Debug)]
pub struct PathNetwork {
    segments: Vec<Segment>,
    tolerance: f32,
    /// Crossing-point cache keyed by segment pair (lower id first).
    intersections: RefCell<HashMap<(SegmentId, SegmentId), Option<Vec2>>>,
}

impl PathNetwork {
    /// Build the network from authored segments.
    ///
    /// Canonicalizes ordering (queries become authoring-order independent),
    /// drops duplicate segments, and adds short helper stubs at crossings
    /// whose exact crossing point falls just outside a segment's strict
    /// extent, so turning there stays forgiving.
    pub fn new(authored: Vec<Segment>, tolerance: f32) -> Self {
        let mut segments = authored;
        Self::canonicalize(&mut segments);

        let stubs = Self::intersection_stubs(&segments, tolerance);
        if !stubs.is_empty() {
            log::debug!("adding {} intersection helper stubs", stubs.len());
            segments.extend(stubs);
            Self::canonicalize(&mut segments);
        }

        Self {
            segments,
            tolerance,
            intersections: RefCell::new(HashMap::new()),
        }
    }

    fn canonicalize(segments: &mut Vec<Segment>) {
        segments.sort_by(|a, b| {
            (a.orientation == Orientation::Vertical)
                .cmp(&(b.orientation == Orientation::Vertical))
                .then(a.fixed.total_cmp(&b.fixed))
                .then(a.start.total_cmp(&b.start))
                .then(a.end.total_cmp(&b.end))
        });
        segments.dedup();
    }

    /// Helper stubs for crossings where one axis lacks strict coverage of
    /// the crossing point.
    fn intersection_stubs(segments: &[Segment], tolerance: f32) -> Vec<Segment> {
        let mut stubs = Vec::new();
        for h in segments.iter().filter(|s| s.is_horizontal()) {
            for v in segments.iter().filter(|s| !s.is_horizontal()) {
                let overlaps = v.fixed >= h.start - tolerance
                    && v.fixed <= h.end + tolerance
                    && h.fixed >= v.start - tolerance
                    && v.end + tolerance >= h.fixed;
                if !overlaps {
                    continue;
                }
                // Strict coverage check: the crossing point itself must lie
                // on a segment of each axis, or turning there dead-ends.
                let point = Vec2::new(v.fixed, h.fixed);
                let has_vertical = segments
                    .iter()
                    .any(|s| !s.is_horizontal() && s.contains(point, 0.0));
                let has_horizontal = segments
                    .iter()
                    .any(|s| s.is_horizontal() && s.contains(point, 0.0));
                if !has_vertical {
                    stubs.push(Segment::vertical(
                        point.x,
                        point.y - tolerance * 2.0,
                        point.y + tolerance * 2.0,
                    ));
                }
                if !has_horizontal {
                    stubs.push(Segment::horizontal(
                        point.y,
                        point.x - tolerance * 2.0,
                        point.x + tolerance * 2.0,
                    ));
                }
            }
        }
        stubs
    }

    /// Authored tolerance used by every query.
    #[inline]
    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn segment(&self, id: SegmentId) -> &Segment {
        &self.segments[id]
    }

    /// All segments whose alignment band and extent contain the point.
    /// Empty result means the point is off-network.
    pub fn segments_at(&self, p: Vec2) -> Vec<SegmentId> {
        self.segments_at_with_tolerance(p, self.tolerance)
    }

    /// `segments_at` with an explicit tolerance (movement uses widened
    /// probes near junctions).
    pub fn segments_at_with_tolerance(&self, p: Vec2, tolerance: f32) -> Vec<SegmentId> {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.contains(p, tolerance))
            .map(|(id, _)| id)
            .collect()
    }

    /// Whether the point lies on any segment.
    pub fn is_on_network(&self, p: Vec2) -> bool {
        self.segments.iter().any(|s| s.contains(p, self.tolerance))
    }

    /// Position test with a forgiving 1.5x tolerance, used for direction
    /// probes near junctions.
    pub fn is_valid_position(&self, p: Vec2) -> bool {
        let tolerance = self.tolerance * 1.5;
        self.segments.iter().any(|s| s.contains(p, tolerance))
    }

    /// True iff a horizontal and a vertical segment overlap at the point.
    pub fn is_junction(&self, p: Vec2) -> bool {
        self.is_junction_with_tolerance(p, self.tolerance)
    }

    /// Junction test with a widened tolerance (forgiving turn windows).
    pub fn is_junction_with_tolerance(&self, p: Vec2, tolerance: f32) -> bool {
        let mut horizontal = false;
        let mut vertical = false;
        for s in &self.segments {
            if s.contains(p, tolerance) {
                if s.is_horizontal() {
                    horizontal = true;
                } else {
                    vertical = true;
                }
                if horizontal && vertical {
                    return true;
                }
            }
        }
        false
    }

    /// Crossing point of two segments, if one is horizontal, the other is
    /// vertical, and their ranges overlap within tolerance. Same-orientation
    /// pairs never intersect.
    pub fn intersection_of(&self, a: SegmentId, b: SegmentId) -> Option<Vec2> {
        let key = (a.min(b), a.max(b));
        if let Some(cached) = self.intersections.borrow().get(&key) {
            return *cached;
        }
        let result = self.compute_intersection(a, b);
        self.intersections.borrow_mut().insert(key, result);
        result
    }

    fn compute_intersection(&self, a: SegmentId, b: SegmentId) -> Option<Vec2> {
        let (sa, sb) = (&self.segments[a], &self.segments[b]);
        let (h, v) = match (sa.orientation, sb.orientation) {
            (Orientation::Horizontal, Orientation::Vertical) => (sa, sb),
            (Orientation::Vertical, Orientation::Horizontal) => (sb, sa),
            _ => return None,
        };
        let tolerance = self.tolerance;
        let overlaps = v.fixed >= h.start - tolerance
            && v.fixed <= h.end + tolerance
            && h.fixed >= v.start - tolerance
            && h.fixed <= v.end + tolerance;
        overlaps.then(|| Vec2::new(v.fixed, h.fixed))
    }

    /// Closest anchor (segment endpoint or junction on the segments at `p`)
    /// by Euclidean distance. `None` when the point is off-network.
    ///
    /// Used to recover the player onto the network after an invalid step.
    pub fn nearest_anchor(&self, p: Vec2) -> Option<Vec2> {
        let here = self.segments_at(p);
        if here.is_empty() {
            return None;
        }

        let mut best: Option<(Vec2, f32)> = None;
        let mut consider = |candidate: Vec2| {
            let d = candidate.distance_squared(p);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((candidate, d));
            }
        };

        for &id in &here {
            for endpoint in self.segments[id].endpoints() {
                consider(endpoint);
            }
            for other in 0..self.segments.len() {
                if other == id {
                    continue;
                }
                if let Some(point) = self.intersection_of(id, other) {
                    consider(point);
                }
            }
        }

        best.map(|(point, _)| point)
    }

    /// First segment within tolerance of the point, for off-network
    /// centerline recovery.
    pub fn nearest_segment(&self, p: Vec2) -> Option<SegmentId> {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.contains(p, self.tolerance))
            .min_by(|(_, a), (_, b)| a.alignment_distance(p).total_cmp(&b.alignment_distance(p)))
            .map(|(id, _)| id)
    }

    /// Whether the point sits within tolerance of an endpoint of any
    /// segment it lies on (a plain path end, junction or not).
    pub fn is_at_path_end(&self, p: Vec2) -> bool {
        self.segments_at(p)
            .into_iter()
            .any(|id| self.segments[id].near_endpoint(p, self.tolerance))
    }
}
