//! Vector path classification.

use crate::extraction::geometry::BoundingBox;
use crate::ingestion::source::PrimitiveKind;

/// Paths thinner than this on either axis are lines (hairline rules, axes).
const LINE_THICKNESS: f64 = 2.0;

/// Segment make-up of one path object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathShape {
    /// All segments, move-tos included
    pub points: usize,
    pub straight_edges: usize,
    pub bezier_edges: usize,
    pub closed: bool,
}

/// Classify a path by its segments and page-space bounds.
pub fn classify_path(shape: &PathShape, bounds: &BoundingBox) -> PrimitiveKind {
    if shape.bezier_edges > 0 {
        return PrimitiveKind::Curve;
    }
    if shape.points <= 2 || bounds.width() < LINE_THICKNESS || bounds.height() < LINE_THICKNESS {
        return PrimitiveKind::Line;
    }
    if shape.closed && (3..=4).contains(&shape.straight_edges) {
        return PrimitiveKind::Rect;
    }
    PrimitiveKind::Curve
}
