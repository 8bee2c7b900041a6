//! Goal post detection and ranging.
//!
//! Post candidates come from the same clustering pass as everything else,
//! but posts need extra treatment: vertical grid candidates stop at the
//! field border, so boxes are extended upward with above-horizon candidates
//! and matching horizontal segments before the size gate and the
//! width-based range estimate run.

use nalgebra::{Matrix2, Vector2};
use tracing::debug;

use crate::candidates::ObjectCandidate;
use crate::classify::ColorClass;
use crate::scanline::TransitionSegment;

/// Physical goal dimensions and camera model for ranging, plus the minimum
/// on-image size a post must have to be believed.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GoalParams {
    pub goal_width_cm: f32,
    pub goal_height_cm: f32,
    /// Pinhole focal length in pixels.
    pub focal_length_px: f32,
    /// Posts farther than this are considered noise; together with the
    /// camera model this bounds the minimum accepted pixel size.
    pub max_range_cm: f32,
}

impl Default for GoalParams {
    fn default() -> Self {
        Self {
            goal_width_cm: 11.0,
            goal_height_cm: 80.0,
            focal_length_px: 385.0,
            max_range_cm: 600.0,
        }
    }
}

impl GoalParams {
    /// Minimum believable on-image post width, from the range bound.
    pub fn min_width_px(&self) -> f32 {
        self.focal_length_px * self.goal_width_cm / self.max_range_cm
    }

    /// Minimum believable on-image post height, from the range bound.
    pub fn min_height_px(&self) -> f32 {
        self.focal_length_px * self.goal_height_cm / self.max_range_cm
    }
}

/// A sized goal post: its final bounding box and the range estimate derived
/// from its apparent width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalMeasurement {
    pub candidate: ObjectCandidate,
    pub distance_cm: f32,
}

/// Detect goal posts among the candidates.
///
/// `candidates` are the post-coloured clusters from the vertical grid,
/// `above_horizon` the post-coloured clusters from the horizontal grid, and
/// `horizontal_segments` the raw horizontal transition segments (used both
/// to extend boxes upward and to measure post width for ranging).
///
/// Returns surviving posts sorted largest first; callers wanting a single
/// post take the front.
pub fn find_goal_posts(
    candidates: &[ObjectCandidate],
    above_horizon: &[ObjectCandidate],
    horizontal_segments: &[TransitionSegment],
    params: &GoalParams,
) -> Vec<GoalMeasurement> {
    let mut posts = combine_overlapping(candidates);

    for post in &mut posts {
        extend_above_border(post, above_horizon, horizontal_segments);
    }
    // A distant goal can sit entirely above the field border: above-horizon
    // candidates with no below-border counterpart stand as posts themselves.
    for candidate in above_horizon {
        let absorbed = posts
            .iter()
            .any(|p| p.color == candidate.color && p.overlaps(candidate));
        if !absorbed {
            posts.push(*candidate);
        }
    }
    // Extension can introduce new overlaps.
    let mut posts = combine_overlapping(&posts);

    posts.retain(|p| {
        (p.width() as f32) >= params.min_width_px()
            && (p.height() as f32) >= params.min_height_px()
            && p.height() > p.width()
    });
    posts.sort_by(|a, b| b.area().cmp(&a.area()));

    let measurements: Vec<GoalMeasurement> = posts
        .iter()
        .map(|&candidate| GoalMeasurement {
            candidate,
            distance_cm: estimate_distance(&candidate, horizontal_segments, params),
        })
        .collect();
    debug!(posts = measurements.len(), "goal posts sized");
    measurements
}

/// Cluster goal-coloured horizontal segments into above-horizon candidates.
///
/// The horizontal grid samples rows, so segments belonging to one post
/// overlap in x across nearby rows. A segment joins a box of its colour when
/// their x-ranges overlap and its row lies within `row_gap` of the box.
/// Boxes built from a single row are dropped as noise. Row order is not
/// assumed; the grid emits the sky region bottom-up.
pub fn cluster_horizontal_candidates(
    segments: &[TransitionSegment],
    valid_colors: &[ColorClass],
    row_gap: i32,
) -> Vec<ObjectCandidate> {
    let mut boxes: Vec<(ObjectCandidate, usize)> = Vec::new();
    for seg in segments {
        if !valid_colors.contains(&seg.color) {
            continue;
        }
        let piece = ObjectCandidate::new(seg.start, seg.end, seg.color);
        let hit = boxes.iter_mut().find(|(b, _)| {
            b.color == piece.color
                && b.top_left.x <= piece.bottom_right.x
                && piece.top_left.x <= b.bottom_right.x
                && piece.top_left.y >= b.top_left.y - row_gap
                && piece.top_left.y <= b.bottom_right.y + row_gap
        });
        match hit {
            Some((b, count)) => {
                *b = b.merged_with(&piece);
                *count += 1;
            }
            None => boxes.push((piece, 1)),
        }
    }
    boxes
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(b, _)| b)
        .collect()
}

/// Merge every overlapping same-colour pair until the set is stable.
fn combine_overlapping(candidates: &[ObjectCandidate]) -> Vec<ObjectCandidate> {
    let mut merged: Vec<ObjectCandidate> = Vec::with_capacity(candidates.len());
    for &candidate in candidates {
        let mut current = candidate;
        loop {
            let hit = merged
                .iter()
                .position(|m| m.color == current.color && m.overlaps(&current));
            match hit {
                Some(i) => {
                    current = merged.swap_remove(i).merged_with(&current);
                }
                None => break,
            }
        }
        merged.push(current);
    }
    merged
}

/// Grow a post box upward using above-horizon evidence in its column.
fn extend_above_border(
    post: &mut ObjectCandidate,
    above_horizon: &[ObjectCandidate],
    horizontal_segments: &[TransitionSegment],
) {
    for other in above_horizon {
        if other.color == post.color
            && other.top_left.x <= post.bottom_right.x
            && post.top_left.x <= other.bottom_right.x
        {
            *post = post.merged_with(other);
        }
    }
    for seg in horizontal_segments {
        if seg.color == post.color
            && seg.start.x <= post.bottom_right.x
            && post.top_left.x <= seg.end.x
            && seg.start.y < post.top_left.y
        {
            post.top_left.y = seg.start.y;
        }
    }
}

/// Range a post from its apparent width.
///
/// A least-squares midline `x = a·y + b` is fitted through the midpoints of
/// the horizontal segments inside the box; the apparent width is the mean
/// total distance of the segment endpoints from that line, which is robust
/// to a leaning camera. With fewer than two usable segments the box width
/// stands in.
fn estimate_distance(
    post: &ObjectCandidate,
    horizontal_segments: &[TransitionSegment],
    params: &GoalParams,
) -> f32 {
    // Debounced segments can overshoot the box by a pixel or two, so
    // membership is by overlap, not containment.
    let inside: Vec<&TransitionSegment> = horizontal_segments
        .iter()
        .filter(|seg| {
            seg.color == post.color
                && seg.start.y >= post.top_left.y
                && seg.start.y <= post.bottom_right.y
                && seg.start.x <= post.bottom_right.x
                && post.top_left.x <= seg.end.x
        })
        .collect();

    let width_px = match fit_midline(&inside) {
        Some((a, b)) => {
            let norm = (1.0 + a * a).sqrt();
            let mut total = 0.0f32;
            for seg in &inside {
                let d = |x: i32, y: i32| (a * y as f32 + b - x as f32).abs() / norm;
                total += d(seg.start.x, seg.start.y) + d(seg.end.x, seg.end.y);
            }
            total / inside.len() as f32
        }
        None => post.width() as f32,
    };

    if width_px <= 0.0 {
        return f32::INFINITY;
    }
    params.focal_length_px * params.goal_width_cm / width_px
}

/// Least-squares line `x = a·y + b` through the segment midpoints. Needs at
/// least two segments at distinct rows.
fn fit_midline(segments: &[&TransitionSegment]) -> Option<(f32, f32)> {
    if segments.len() < 2 {
        return None;
    }
    let mut syy = 0.0f32;
    let mut sy = 0.0f32;
    let mut sxy = 0.0f32;
    let mut sx = 0.0f32;
    let n = segments.len() as f32;
    for seg in segments {
        let mx = (seg.start.x + seg.end.x) as f32 / 2.0;
        let my = seg.start.y as f32;
        syy += my * my;
        sy += my;
        sxy += mx * my;
        sx += mx;
    }
    let m = Matrix2::new(syy, sy, sy, n);
    let rhs = Vector2::new(sxy, sx);
    let sol = m.try_inverse()? * rhs;
    Some((sol[0], sol[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ColorClass;
    use crate::geometry::Point2i;

    fn post(x0: i32, y0: i32, x1: i32, y1: i32) -> ObjectCandidate {
        ObjectCandidate::new(Point2i::new(x0, y0), Point2i::new(x1, y1), ColorClass::Yellow)
    }

    fn h_seg(x0: i32, x1: i32, y: i32) -> TransitionSegment {
        TransitionSegment::new(
            Point2i::new(x0, y),
            Point2i::new(x1, y),
            ColorClass::Unclassified,
            ColorClass::Yellow,
            ColorClass::Unclassified,
        )
    }

    #[test]
    fn overlapping_candidates_are_combined() {
        let a = post(10, 40, 22, 120);
        let b = post(18, 30, 26, 100);
        let merged = combine_overlapping(&[a, b]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].top_left, Point2i::new(10, 30));
        assert_eq!(merged[0].bottom_right, Point2i::new(26, 120));
    }

    #[test]
    fn disjoint_posts_stay_separate() {
        let a = post(10, 40, 22, 120);
        let b = post(100, 40, 112, 120);
        assert_eq!(combine_overlapping(&[a, b]).len(), 2);
    }

    #[test]
    fn box_extends_up_to_matching_horizontal_segments() {
        let mut p = post(50, 60, 62, 140);
        let segs = vec![h_seg(50, 62, 20), h_seg(50, 62, 36)];
        extend_above_border(&mut p, &[], &segs);
        assert_eq!(p.top_left.y, 20);
    }

    #[test]
    fn horizontal_segments_cluster_into_row_boxes() {
        let yellow = &[ColorClass::Yellow];
        // Three rows of one post, plus a lone stray row far away.
        let segs = vec![
            h_seg(60, 74, 8),
            h_seg(61, 75, 16),
            h_seg(60, 74, 24),
            h_seg(10, 24, 60),
        ];
        let boxes = cluster_horizontal_candidates(&segs, yellow, 16);
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].top_left, Point2i::new(60, 8));
        assert_eq!(boxes[0].bottom_right, Point2i::new(75, 24));
    }

    #[test]
    fn single_row_boxes_are_noise() {
        let yellow = &[ColorClass::Yellow];
        let segs = vec![h_seg(60, 74, 8)];
        assert!(cluster_horizontal_candidates(&segs, yellow, 16).is_empty());
    }

    #[test]
    fn above_horizon_only_candidate_becomes_a_post() {
        // No vertical-grid candidate at all: the whole post is above the
        // border. Rows every 8 px give it ranging segments too.
        let above = post(50, 0, 65, 38);
        let segs: Vec<TransitionSegment> =
            (0..5).map(|i| h_seg(50, 65, i * 8)).collect();
        let params = GoalParams {
            max_range_cm: 2000.0,
            ..GoalParams::default()
        };
        let out = find_goal_posts(&[], &[above], &segs, &params);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].candidate.top_left, Point2i::new(50, 0));
        assert!(out[0].distance_cm.is_finite());
    }

    #[test]
    fn above_horizon_candidates_merge_into_the_post() {
        let mut p = post(50, 60, 62, 140);
        let above = post(52, 10, 60, 55);
        extend_above_border(&mut p, &[above], &[]);
        assert_eq!(p.top_left.y, 10);
        assert_eq!(p.bottom_right.y, 140);
    }

    #[test]
    fn tiny_candidates_are_filtered_out() {
        // 4 px wide, 20 tall: below both minimum pixel sizes at default range.
        let tiny = post(10, 10, 14, 30);
        let out = find_goal_posts(&[tiny], &[], &[], &GoalParams::default());
        assert!(out.is_empty());
    }

    #[test]
    fn wide_landscape_boxes_are_not_posts() {
        let banner = post(10, 10, 200, 70);
        let out = find_goal_posts(&[banner], &[], &[], &GoalParams::default());
        assert!(out.is_empty());
    }

    #[test]
    fn distance_from_midline_width() {
        // An 11 px wide upright post: distance = 385 * 11 / 11 = 385 cm.
        let p = post(100, 20, 111, 140);
        let segs: Vec<TransitionSegment> =
            (0..6).map(|i| h_seg(100, 111, 30 + i * 16)).collect();
        let out = find_goal_posts(&[p], &[], &segs, &GoalParams::default());
        assert_eq!(out.len(), 1);
        assert!(
            (out[0].distance_cm - 385.0).abs() < 1.0,
            "distance = {}",
            out[0].distance_cm
        );
    }

    #[test]
    fn posts_sorted_largest_first() {
        let small = post(10, 60, 20, 150);
        let big = post(200, 20, 214, 160);
        let out = find_goal_posts(&[small, big], &[], &[], &GoalParams::default());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].candidate.top_left.x, 200);
    }
}
