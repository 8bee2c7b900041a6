//! Ball detection: candidate filtering, close classification, circle fit.
//!
//! Candidates from the sparse grid are coarse boxes. A dense re-scan inside
//! the accepted box collects the ball outline, which feeds the
//! least-squares circle fit; too few outline points fall back to
//! bounding-box geometry rather than failing.

use crate::candidates::ObjectCandidate;
use crate::classify::LookupTable;
use crate::geometry::{fit_circle, Circle, Point2i};
use crate::image::YcbcrImage;
use crate::scanline::ScanDirection;
use crate::segment::closely_classify_scanline;

/// Thresholds for ball candidate filtering and fitting.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BallParams {
    /// Margin (pixels) within which a box counts as touching the image edge.
    pub edge_margin_px: i32,
    /// Accepted aspect band for non-edge candidates.
    pub min_aspect: f32,
    pub max_aspect: f32,
    /// Outline points required before the circle fit is attempted.
    pub min_fit_points: usize,
    /// Physical ball radius, used by the caller for range estimation.
    pub ball_radius_cm: f32,
}

impl Default for BallParams {
    fn default() -> Self {
        Self {
            edge_margin_px: 5,
            min_aspect: 0.5,
            max_aspect: 1.5,
            min_fit_points: 5,
            ball_radius_cm: 3.25,
        }
    }
}

/// Find the ball among the colour candidates.
///
/// Ball-coloured candidates pass an aspect gate (skipped when the box
/// touches the image edge: truncated balls can have any aspect), are
/// densely re-scanned for outline points and circle-fitted. When several
/// candidates produce a defined circle the one with the largest fitted
/// radius wins, so the result does not depend on scan order.
pub fn find_ball(
    candidates: &[ObjectCandidate],
    image: &YcbcrImage,
    table: &LookupTable,
    params: &BallParams,
) -> Circle {
    let mut best = Circle::default();
    for candidate in candidates {
        if !candidate.color.is_ball_colour() {
            continue;
        }
        if !is_correct_check_ratio(candidate, image, params) {
            continue;
        }
        let points = classify_ball_closely(candidate, image, table);
        let circle = if points.len() > params.min_fit_points {
            fit_circle(&points).unwrap_or_else(|| bounding_box_circle(candidate))
        } else {
            bounding_box_circle(candidate)
        };
        if circle.is_defined && (!best.is_defined || circle.radius > best.radius) {
            best = circle;
        }
    }
    best
}

/// Aspect gate. Boxes near the image edge pass unconditionally.
fn is_correct_check_ratio(
    candidate: &ObjectCandidate,
    image: &YcbcrImage,
    params: &BallParams,
) -> bool {
    let m = params.edge_margin_px;
    let inside = candidate.bottom_right.x <= image.width() - m
        && candidate.bottom_right.y <= image.height() - m
        && candidate.top_left.x >= m
        && candidate.top_left.y >= m;
    if !inside {
        return true;
    }
    let aspect = candidate.aspect();
    (aspect > params.min_aspect && aspect < params.max_aspect) || aspect == 0.0
}

/// Collect outline points by dense re-scanning inside the candidate box.
///
/// One vertical line through the horizontal midpoint establishes the true
/// vertical extent; a horizontal line per row between those extremes then
/// contributes its left and right ball-colour edges. Points outside the
/// frame are discarded.
fn classify_ball_closely(
    candidate: &ObjectCandidate,
    image: &YcbcrImage,
    table: &LookupTable,
) -> Vec<Point2i> {
    let mid_x = (candidate.bottom_right.x - candidate.top_left.x) / 2 + candidate.top_left.x;
    let pad = 5;

    let v_start = Point2i::new(mid_x, candidate.top_left.y - pad);
    let v_length = candidate.height() + 2 * pad;
    let v_line = closely_classify_scanline(
        v_start,
        v_length,
        1,
        ScanDirection::Down,
        image,
        table,
    );

    let mut top = i32::MAX;
    let mut bottom = i32::MIN;
    for seg in v_line.segments() {
        if seg.color.is_ball_colour() {
            top = top.min(seg.start.y);
            bottom = bottom.max(seg.end.y);
        }
    }
    if top > bottom {
        // No ball colour on the midline; fall back to the box extent.
        top = candidate.top_left.y;
        bottom = candidate.bottom_right.y;
    }

    let mut points = Vec::new();
    let h_start_x = candidate.top_left.x - pad;
    let h_length = candidate.width() + 2 * pad;
    for y in top..=bottom {
        let h_line = closely_classify_scanline(
            Point2i::new(h_start_x, y),
            h_length,
            1,
            ScanDirection::Right,
            image,
            table,
        );
        for seg in h_line.segments() {
            if !seg.color.is_ball_colour() {
                continue;
            }
            if image.contains(seg.start.x, seg.start.y) {
                points.push(seg.start);
            }
            if image.contains(seg.end.x, seg.end.y) {
                points.push(seg.end);
            }
        }
    }
    points
}

/// Fallback geometry when the outline is too sparse to fit: box midpoint as
/// centre, half the larger side as radius, zero residual.
fn bounding_box_circle(candidate: &ObjectCandidate) -> Circle {
    let centre_x = (candidate.bottom_right.x + candidate.top_left.x) as f32 / 2.0;
    let centre_y = (candidate.bottom_right.y + candidate.top_left.y) as f32 / 2.0;
    let radius = candidate.width().max(candidate.height()) as f32 / 2.0;
    Circle {
        centre_x,
        centre_y,
        radius,
        sd: 0.0,
        is_defined: true,
    }
}
