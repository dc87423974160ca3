//! Angle snapping for line gestures and equal-spacing alignment guides.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Result of an angle snap operation.
#[derive(Debug, Clone, Copy)]
pub struct AngleSnapResult {
    /// The snapped endpoint.
    pub point: Point,
    /// The snapped angle in degrees (0-360).
    pub angle_degrees: f64,
    /// Distance from start point (preserved from original).
    pub distance: f64,
}

/// Snap an angle to the nearest increment.
/// Returns the snapped angle in degrees (0-360).
pub fn snap_angle(angle_degrees: f64, increment: f64) -> f64 {
    let snapped = (angle_degrees / increment).round() * increment;
    if snapped < 0.0 {
        snapped + 360.0
    } else if snapped >= 360.0 {
        snapped - 360.0
    } else {
        snapped
    }
}

/// Snap a line endpoint to angle increments from a start point.
/// This snaps the angle while preserving the distance from start.
pub fn snap_line_endpoint(start: Point, end: Point, increment: f64) -> AngleSnapResult {
    let delta = end - start;
    let distance = delta.hypot();

    if distance < 0.001 {
        return AngleSnapResult {
            point: end,
            angle_degrees: 0.0,
            distance: 0.0,
        };
    }

    let angle = delta.y.atan2(delta.x).to_degrees();
    let angle = if angle < 0.0 { angle + 360.0 } else { angle };
    let snapped_angle = snap_angle(angle, increment);
    let radians = snapped_angle.to_radians();

    AngleSnapResult {
        point: Point::new(
            start.x + distance * radians.cos(),
            start.y + distance * radians.sin(),
        ),
        angle_degrees: snapped_angle,
        distance,
    }
}

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideAxis {
    /// Constant y, spans the visible width.
    Horizontal,
    /// Constant x, spans the visible height.
    Vertical,
}

/// A transient dashed alignment hint. Never part of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuideLine {
    pub axis: GuideAxis,
    /// x for vertical guides, y for horizontal ones.
    pub position: f64,
    /// Extent along the line, in scene units.
    pub start: f64,
    pub end: f64,
}

impl GuideLine {
    /// Build a guide spanning `extent` along its own direction.
    pub fn spanning(axis: GuideAxis, position: f64, extent: Rect) -> Self {
        let (start, end) = match axis {
            GuideAxis::Horizontal => (extent.x0, extent.x1),
            GuideAxis::Vertical => (extent.y0, extent.y1),
        };
        Self {
            axis,
            position,
            start,
            end,
        }
    }

    /// Endpoints in scene coordinates.
    pub fn endpoints(&self) -> (Point, Point) {
        match self.axis {
            GuideAxis::Horizontal => (
                Point::new(self.start, self.position),
                Point::new(self.end, self.position),
            ),
            GuideAxis::Vertical => (
                Point::new(self.position, self.start),
                Point::new(self.position, self.end),
            ),
        }
    }
}

/// Outcome of one move-tick evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignmentSnap {
    /// Correction to apply to the moving object.
    pub offset: Vec2,
    pub guides: Vec<GuideLine>,
}

impl AlignmentSnap {
    pub fn is_snapped(&self) -> bool {
        !self.guides.is_empty()
    }
}

/// Axis along which gaps are measured.
#[derive(Debug, Clone, Copy)]
enum GapAxis {
    X,
    Y,
}

impl GapAxis {
    fn span(self, rect: Rect) -> (f64, f64) {
        match self {
            GapAxis::X => (rect.x0, rect.x1),
            GapAxis::Y => (rect.y0, rect.y1),
        }
    }

    fn center(self, rect: Rect) -> f64 {
        let (lo, hi) = self.span(rect);
        (lo + hi) / 2.0
    }

    /// Guides marking spacing along x are vertical lines, and vice versa.
    fn guide_axis(self) -> GuideAxis {
        match self {
            GapAxis::X => GuideAxis::Vertical,
            GapAxis::Y => GuideAxis::Horizontal,
        }
    }
}

/// Which side of a neighbor the moving object sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Before,
    After,
}

/// Edge-to-edge gap between two spans, `None` if they overlap.
fn gap_between(a: (f64, f64), b: (f64, f64)) -> Option<f64> {
    if a.1 <= b.0 {
        Some(b.0 - a.1)
    } else if b.1 <= a.0 {
        Some(a.0 - b.1)
    } else {
        None
    }
}

/// Position of the moving span relative to a neighbor, with the current gap.
fn side_of(moving: (f64, f64), other: (f64, f64)) -> Option<(Side, f64)> {
    if moving.0 >= other.1 {
        Some((Side::After, moving.0 - other.1))
    } else if moving.1 <= other.0 {
        Some((Side::Before, other.0 - moving.1))
    } else {
        None
    }
}

/// Find the first pair whose gap the moving object reproduces. Returns the
/// offset along the axis and the three guide positions.
fn detect_axis(moving: Rect, others: &[Rect], threshold: f64, axis: GapAxis) -> Option<(f64, [f64; 3])> {
    if others.len() < 2 {
        return None;
    }
    let span = axis.span(moving);

    for (i, a) in others.iter().enumerate() {
        for b in &others[i + 1..] {
            let Some(pair_gap) = gap_between(axis.span(*a), axis.span(*b)) else {
                continue;
            };
            for other in others {
                let other_span = axis.span(*other);
                let Some((side, gap)) = side_of(span, other_span) else {
                    continue;
                };
                if (gap - pair_gap).abs() > threshold {
                    continue;
                }
                let offset = match side {
                    Side::After => other_span.1 + pair_gap - span.0,
                    Side::Before => other_span.0 - pair_gap - span.1,
                };
                let moved_center = axis.center(moving) + offset;
                return Some((offset, [axis.center(*a), axis.center(*b), moved_center]));
            }
        }
    }
    None
}

/// Equal-spacing detection for a dragged object.
///
/// `moving` is the dragged object's bounds at the current drag position,
/// `others` the bounds of every non-moving object, `threshold` the snap
/// distance in scene units and `extent` the visible canvas in scene units.
/// Each axis is evaluated independently and the first matching pair wins.
pub fn detect_equal_spacing(moving: Rect, others: &[Rect], threshold: f64, extent: Rect) -> AlignmentSnap {
    let mut snap = AlignmentSnap::default();
    for axis in [GapAxis::X, GapAxis::Y] {
        if let Some((offset, centers)) = detect_axis(moving, others, threshold, axis) {
            match axis {
                GapAxis::X => snap.offset.x = offset,
                GapAxis::Y => snap.offset.y = offset,
            }
            snap.guides.extend(
                centers
                    .iter()
                    .map(|&c| GuideLine::spanning(axis.guide_axis(), c, extent)),
            );
        }
    }
    snap
}
