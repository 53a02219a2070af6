//! Authored maze layouts
//!
//! Maze lines are authored as metro-style polylines; each axis-aligned leg
//! becomes one [`Segment`]. A diagonal leg is an authoring error and fails
//! construction. The default layout is the metro board shipped with the
//! mini-game: four colored lines over a 340x516 board, with building
//! rectangles as blocked regions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::segment::{Rect, Segment};
use crate::config::ConfigError;

/// One authored metro line: a sequence of waypoints connected by
/// axis-aligned legs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline(pub Vec<Vec2>);

impl Polyline {
    pub fn new(points: impl IntoIterator<Item = (f32, f32)>) -> Self {
        Self(points.into_iter().map(|(x, y)| Vec2::new(x, y)).collect())
    }

    /// Decompose into segments. Zero-length legs (repeated waypoints) are
    /// skipped; a leg moving on both axes is rejected.
    pub fn segments(&self) -> Result<Vec<Segment>, ConfigError> {
        let mut out = Vec::new();
        for pair in self.0.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let dx = b.x - a.x;
            let dy = b.y - a.y;
            if dx == 0.0 && dy == 0.0 {
                continue;
            }
            if dx != 0.0 && dy != 0.0 {
                return Err(ConfigError::DiagonalLeg {
                    from: (a.x, a.y),
                    to: (b.x, b.y),
                });
            }
            if dy == 0.0 {
                out.push(Segment::horizontal(a.y, a.x, b.x));
            } else {
                out.push(Segment::vertical(a.x, a.y, b.y));
            }
        }
        Ok(out)
    }
}

/// Decompose a set of authored polylines into raw segments.
pub fn polylines_to_segments(lines: &[Polyline]) -> Result<Vec<Segment>, ConfigError> {
    let mut segments = Vec::new();
    for line in lines {
        segments.extend(line.segments()?);
    }
    Ok(segments)
}

/// The authored metro map: green, brown, orange and red lines.
pub fn default_metro_lines() -> Vec<Polyline> {
    vec![
        // Green line: central loop with the left spur at y=350
        Polyline::new([
            (190.0, 350.0),
            (12.0, 350.0),
            (190.0, 350.0),
            (256.0, 350.0),
        ]),
        // Brown line: top rail with the vertical drop at x=328
        Polyline::new([
            (128.5, 10.0),
            (328.0, 10.0),
            (328.0, 121.0),
            (259.5, 121.0),
        ]),
        Polyline::new([(208.0, 74.0), (328.0, 74.0)]),
        Polyline::new([(259.5, 236.0), (259.5, 74.0)]),
        Polyline::new([
            (177.0, 130.0),
            (177.0, 89.5),
            (208.0, 89.5),
            (208.0, 11.5),
        ]),
        // Brown line: lower-left loop
        Polyline::new([
            (10.0, 450.5),
            (10.0, 500.0),
            (95.0, 500.0),
            (95.0, 394.0),
            (95.0, 450.5),
            (256.0, 450.5),
            (160.0, 450.5),
            (160.0, 500.0),
            (80.0, 500.0),
            (256.0, 500.0),
            (256.0, 429.0),
            (328.0, 429.0),
            (328.0, 500.0),
        ]),
        // Orange line: left column and middle crossings
        Polyline::new([(10.0, 94.0), (10.0, 269.0)]),
        Polyline::new([(10.0, 162.0), (105.0, 162.0), (105.0, 237.0)]),
        Polyline::new([(64.0, 162.0), (64.0, 269.0)]),
        Polyline::new([
            (105.0, 162.0),
            (105.0, 132.0),
            (214.0, 132.0),
            (214.0, 237.0),
            (214.0, 162.0),
            (328.0, 162.0),
            (328.0, 121.0),
            (328.0, 237.0),
        ]),
        Polyline::new([(326.0, 319.0), (256.0, 319.0), (256.0, 428.0)]),
        // Red line: lower loop and middle rail
        Polyline::new([
            (50.0, 500.0),
            (50.0, 452.0),
            (10.0, 452.0),
            (10.0, 269.0),
            (105.0, 269.0),
            (105.0, 237.0),
        ]),
        Polyline::new([(105.0, 237.0), (328.0, 237.0)]),
        Polyline::new([(328.0, 237.0), (328.0, 429.0)]),
        Polyline::new([
            (105.0, 270.0),
            (105.0, 312.0),
            (190.0, 312.0),
            (190.0, 237.0),
            (190.0, 274.0),
            (328.0, 274.0),
        ]),
        Polyline::new([(10.0, 394.0), (328.0, 394.0), (95.0, 394.0), (95.0, 350.0)]),
    ]
}

/// Building footprints the collectible placement must avoid.
pub fn default_blocked_regions() -> Vec<Rect> {
    vec![
        Rect::new(120.0, 30.0, 50.0, 34.0),
        Rect::new(30.0, 190.0, 26.0, 60.0),
        Rect::new(130.0, 170.0, 44.0, 50.0),
        Rect::new(230.0, 190.0, 60.0, 30.0),
        Rect::new(130.0, 420.0, 24.0, 24.0),
        Rect::new(280.0, 330.0, 40.0, 50.0),
    ]
}

/// Default player start: on the green line's central spur.
pub fn default_start() -> Vec2 {
    Vec2::new(190.0, 350.0)
}
