//! Field-border finding: green search, convex hull, interpolation.
//!
//! The border between green field and everything above it bounds the scan
//! regions for the rest of the frame. A sparse per-column green search runs
//! first; its upper convex hull smooths out occlusions (robots, the ball)
//! and is then interpolated back to per-column resolution for the grid
//! builder, which assumes dense coverage.

use crate::classify::{ColorClass, LookupTable};
use crate::geometry::Point2i;
use crate::horizon::Horizon;
use crate::image::YcbcrImage;

/// Consecutive green pixels required before a column yields a border point.
const GREEN_RUN_LENGTH: i32 = 3;

/// Scan columns below the horizon for the topmost run of green.
///
/// For every `scan_spacing`-th column, walk downward from the (clamped)
/// horizon and emit the point at the top of the first run of
/// [`GREEN_RUN_LENGTH`] consecutive green pixels. Columns that never reach
/// such a run emit nothing: an absent point means "no ground found in this
/// column", and downstream stages tolerate sparse or empty input.
pub fn find_green_border_points(
    image: &YcbcrImage,
    table: &LookupTable,
    scan_spacing: i32,
    horizon: &Horizon,
) -> Vec<Point2i> {
    let mut points = Vec::new();
    let mut x = 0;
    while x < image.width() {
        let mut y_start = horizon.y_at_x(x) as i32;
        if y_start > image.height() {
            x += scan_spacing;
            continue;
        }
        if y_start < 0 {
            y_start = 0;
        }
        let mut consecutive_green = 0;
        for y in y_start..image.height() {
            if table.classify_at(image, x, y) == ColorClass::Green {
                consecutive_green += 1;
            } else {
                consecutive_green = 0;
            }
            if consecutive_green >= GREEN_RUN_LENGTH {
                points.push(Point2i::new(x, y - consecutive_green + 1));
                break;
            }
        }
        x += scan_spacing;
    }
    points
}

/// `true` when `p2` lies strictly left of the directed line `p0 → p1`
/// (image coordinates, y growing downward).
#[inline]
fn left_of(p0: Point2i, p1: Point2i, p2: Point2i) -> bool {
    (p1.x - p0.x) * (-p2.y + p0.y) - (p2.x - p0.x) * (-p1.y + p0.y) > 0
}

/// Upper convex hull of the border points (Andrew's monotone chain).
///
/// Points not strictly left of the (first, last) baseline are skipped,
/// except the final point which is always force-included so the hull spans
/// the full x-range. Input must be ordered by ascending x; the green search
/// produces it that way.
pub fn convex_upper_hull(points: &[Point2i]) -> Vec<Point2i> {
    let mut hull: Vec<Point2i> = Vec::new();
    if points.is_empty() {
        return hull;
    }
    let pmin = points[0];
    let pmax = points[points.len() - 1];
    hull.push(pmin);
    for (i, &pi) in points.iter().enumerate().skip(1) {
        if !left_of(pmin, pmax, pi) && i != points.len() - 1 {
            continue;
        }
        while hull.len() > 1 {
            let p1 = hull[hull.len() - 1];
            let p2 = hull[hull.len() - 2];
            if left_of(p1, p2, pi) {
                break;
            }
            hull.pop();
        }
        hull.push(pi);
    }
    hull
}

/// Interpolate hull points back to one border point per scanned column.
///
/// Walks consecutive hull-point pairs, linearly interpolating y at every x
/// step of `scan_spacing`, clamping y into `[0, image_height - 1]`. The x
/// cursor is shared across pairs so the output stays aligned to the global
/// column grid. Empty input produces empty output.
pub fn interpolate_borders(
    hull: &[Point2i],
    scan_spacing: i32,
    image_height: i32,
) -> Vec<Point2i> {
    let mut interpolated = Vec::new();
    if hull.is_empty() {
        return interpolated;
    }
    let mut x = hull[0].x;
    for pair in hull.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        let delta = next - prev;
        while x <= next.x {
            let mut y = if delta.x != 0 {
                (x - prev.x) * delta.y / delta.x + prev.y
            } else {
                prev.y
            };
            y = y.clamp(0, image_height - 1);
            interpolated.push(Point2i::new(x, y));
            x += scan_spacing;
        }
    }
    interpolated
}
