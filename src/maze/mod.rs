//! Static maze geometry
//!
//! Pure geometric model of the authored path network. No gameplay state
//! lives here; everything is queries over immutable segments.

pub mod layout;
pub mod network;
pub mod segment;

pub use layout::{Polyline, default_blocked_regions, default_metro_lines, default_start};
pub use network::{PathNetwork, SegmentId};
pub use segment::{Orientation, Rect, Segment};
