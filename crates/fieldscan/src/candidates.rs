//! Clustering of transition segments into object candidates.
//!
//! A greedy connected-components pass over the segment list: index adjacency
//! (same column, small vertical gap) and bounded horizontal gaps stand in
//! for true pixel adjacency. The join limits decide exactly what merges and
//! what does not; they are behaviour, not tuning knobs.

use std::collections::VecDeque;

use crate::classify::ColorClass;
use crate::geometry::Point2i;
use crate::scanline::TransitionSegment;

/// A bounding-box grouping of same-coloured segments hypothesized to be one
/// physical object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectCandidate {
    pub top_left: Point2i,
    pub bottom_right: Point2i,
    pub color: ColorClass,
}

impl ObjectCandidate {
    pub fn new(top_left: Point2i, bottom_right: Point2i, color: ColorClass) -> Self {
        Self {
            top_left,
            bottom_right,
            color,
        }
    }

    pub fn width(&self) -> i32 {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> i32 {
        self.bottom_right.y - self.top_left.y
    }

    /// Width over height; 0 when the box has no height.
    pub fn aspect(&self) -> f32 {
        if self.height() == 0 {
            0.0
        } else {
            self.width() as f32 / self.height() as f32
        }
    }

    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    /// `true` when the two boxes intersect (inclusive bounds).
    pub fn overlaps(&self, other: &ObjectCandidate) -> bool {
        self.top_left.x <= other.bottom_right.x
            && other.top_left.x <= self.bottom_right.x
            && self.top_left.y <= other.bottom_right.y
            && other.top_left.y <= self.bottom_right.y
    }

    /// Union of the two boxes.
    pub fn merged_with(&self, other: &ObjectCandidate) -> ObjectCandidate {
        ObjectCandidate::new(
            Point2i::new(
                self.top_left.x.min(other.top_left.x),
                self.top_left.y.min(other.top_left.y),
            ),
            Point2i::new(
                self.bottom_right.x.max(other.bottom_right.x),
                self.bottom_right.y.max(other.bottom_right.y),
            ),
            self.color,
        )
    }
}

/// Join limits and acceptance thresholds for candidate clustering.
///
/// Defaults carry the constants the behaviour was tuned with. Aspect
/// enforcement is off by default; the detectors downstream apply their own
/// shape gates.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClusterParams {
    /// Maximum vertical gap (pixels) joining same-column neighbours.
    pub vert_join_limit: i32,
    /// Horizontal join limit, scaled by `horz_join_scaling`.
    pub horz_join_limit: i32,
    /// Scale factor applied to `horz_join_limit`.
    pub horz_join_scaling: i32,
    /// A cluster must contain strictly more segments than this.
    pub seg_count_threshold: usize,
    /// Minimum accepted aspect when `enforce_aspect` is set.
    pub min_aspect: f32,
    /// Maximum accepted aspect when `enforce_aspect` is set.
    pub max_aspect: f32,
    /// Apply the aspect bounds in the accept test.
    pub enforce_aspect: bool,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            vert_join_limit: 3,
            horz_join_limit: 2,
            horz_join_scaling: 4,
            seg_count_threshold: 3,
            min_aspect: 0.1,
            max_aspect: 2.0,
            enforce_aspect: false,
        }
    }
}

/// Cluster segments of the given colours into bounding-box candidates.
///
/// Segments whose colour is not in `valid_colors` are pre-marked used.
/// Each remaining segment seeds a breadth-first union that pulls in:
/// the previous/next index when in the same column within
/// `vert_join_limit`, and the first y-overlapping segment within
/// `horz_join_limit · horz_join_scaling` scanning right, then left. A
/// drained cluster becomes a candidate iff its box has non-zero width and
/// height and it holds more than `seg_count_threshold` segments.
///
/// The pass is deterministic: the same segment list yields the same
/// candidate list, in the same order.
pub fn classify_candidates(
    segments: &[TransitionSegment],
    valid_colors: &[ColorClass],
    params: &ClusterParams,
) -> Vec<ObjectCandidate> {
    let mut candidates = Vec::new();
    if segments.is_empty() {
        return candidates;
    }

    let horz_limit = params.horz_join_limit * params.horz_join_scaling;
    let mut used = vec![false; segments.len()];
    let mut remaining = 0usize;
    for (i, seg) in segments.iter().enumerate() {
        if valid_colors.contains(&seg.color) {
            remaining += 1;
        } else {
            used[i] = true;
        }
    }

    let mut queue: VecDeque<usize> = VecDeque::new();
    while remaining > 0 {
        // Seed with the first unused segment.
        let Some(seed) = used.iter().position(|&u| !u) else {
            break;
        };
        queue.push_back(seed);
        used[seed] = true;
        remaining -= 1;

        let mut min_x = segments[seed].start.x;
        let mut max_x = segments[seed].start.x;
        let mut min_y = segments[seed].start.y;
        let mut max_y = segments[seed].end.y;
        let mut seg_count = 0usize;
        let color = segments[seed].color;

        while let Some(this) = queue.pop_front() {
            seg_count += 1;
            let seg = &segments[this];
            min_x = min_x.min(seg.start.x);
            max_x = max_x.max(seg.start.x);
            min_y = min_y.min(seg.start.y);
            max_y = max_y.max(seg.end.y);

            // Same column, one index up.
            if this > 0
                && !used[this - 1]
                && segments[this - 1].start.x == seg.start.x
                && seg.start.y - segments[this - 1].end.y < params.vert_join_limit
            {
                queue.push_back(this - 1);
                used[this - 1] = true;
                remaining -= 1;
            }
            // Same column, one index down.
            if this + 1 < segments.len()
                && !used[this + 1]
                && segments[this + 1].start.x == seg.start.x
                && segments[this + 1].start.y - seg.end.y < params.vert_join_limit
            {
                queue.push_back(this + 1);
                used[this + 1] = true;
                remaining -= 1;
            }
            // First y-overlapping segment to the right within the gap limit.
            for that in (this + 1)..segments.len() {
                if used[that] || segments[that].start.x <= seg.start.x {
                    continue;
                }
                if segments[that].start.y <= seg.end.y
                    && seg.start.y <= segments[that].end.y
                    && segments[that].start.x - seg.start.x < horz_limit
                {
                    queue.push_back(that);
                    used[that] = true;
                    remaining -= 1;
                    break;
                }
            }
            // Symmetric leftward search.
            for that in (0..this).rev() {
                if used[that] || segments[that].start.x >= seg.start.x {
                    continue;
                }
                if segments[that].start.y <= seg.end.y
                    && seg.start.y <= segments[that].end.y
                    && seg.start.x - segments[that].start.x < horz_limit
                {
                    queue.push_back(that);
                    used[that] = true;
                    remaining -= 1;
                    break;
                }
            }
        }

        let candidate = ObjectCandidate::new(
            Point2i::new(min_x, min_y),
            Point2i::new(max_x, max_y),
            color,
        );
        let aspect_ok = !params.enforce_aspect
            || (candidate.aspect() > params.min_aspect && candidate.aspect() < params.max_aspect);
        if candidate.width() > 0
            && candidate.height() > 0
            && seg_count > params.seg_count_threshold
            && aspect_ok
        {
            candidates.push(candidate);
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(x: i32, y0: i32, y1: i32, color: ColorClass) -> TransitionSegment {
        TransitionSegment::new(
            Point2i::new(x, y0),
            Point2i::new(x, y1),
            ColorClass::Green,
            color,
            ColorClass::Green,
        )
    }

    const ORANGE_ONLY: &[ColorClass] = &[ColorClass::Orange];

    #[test]
    fn band_of_adjacent_columns_forms_one_candidate() {
        // A 4-wide vertical orange band sampled by four columns.
        let segments = vec![
            seg(10, 20, 30, ColorClass::Orange),
            seg(11, 20, 30, ColorClass::Orange),
            seg(12, 20, 30, ColorClass::Orange),
            seg(13, 20, 30, ColorClass::Orange),
        ];
        let out = classify_candidates(&segments, ORANGE_ONLY, &ClusterParams::default());
        assert_eq!(out.len(), 1);
        let c = out[0];
        assert_eq!(c.top_left, Point2i::new(10, 20));
        assert_eq!(c.bottom_right, Point2i::new(13, 30));
        assert_eq!(c.color, ColorClass::Orange);
    }

    #[test]
    fn vertical_gap_within_limit_merges_and_beyond_splits() {
        // Same column, 1px gap: joined (1 < VERT_JOIN_LIMIT).
        let near = vec![
            seg(8, 10, 20, ColorClass::Orange),
            seg(8, 21, 30, ColorClass::Orange),
            seg(9, 10, 30, ColorClass::Orange),
            seg(10, 10, 30, ColorClass::Orange),
        ];
        let out = classify_candidates(&near, ORANGE_ONLY, &ClusterParams::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].top_left.y, 10);
        assert_eq!(out[0].bottom_right.y, 30);

        // Same layout but a 5px gap in the first column: the split segment
        // stays out of the cluster (and alone it cannot reach the segment
        // count threshold).
        let far = vec![
            seg(8, 10, 20, ColorClass::Orange),
            seg(8, 25, 30, ColorClass::Orange),
            seg(9, 10, 20, ColorClass::Orange),
            seg(10, 10, 20, ColorClass::Orange),
            seg(11, 10, 20, ColorClass::Orange),
        ];
        let out = classify_candidates(&far, ORANGE_ONLY, &ClusterParams::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].bottom_right.y, 20, "far segment must not merge");
    }

    #[test]
    fn horizontal_gap_beyond_limit_splits() {
        // Columns 8 and 16 with default limit 2*4 = 8: gap == 8 is not < 8.
        let segments = vec![
            seg(0, 10, 30, ColorClass::Orange),
            seg(2, 10, 30, ColorClass::Orange),
            seg(4, 10, 30, ColorClass::Orange),
            seg(6, 10, 30, ColorClass::Orange),
            seg(16, 10, 30, ColorClass::Orange),
            seg(18, 10, 30, ColorClass::Orange),
            seg(20, 10, 30, ColorClass::Orange),
            seg(22, 10, 30, ColorClass::Orange),
        ];
        let out = classify_candidates(&segments, ORANGE_ONLY, &ClusterParams::default());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].bottom_right.x, 6);
        assert_eq!(out[1].top_left.x, 16);
    }

    #[test]
    fn invalid_colors_are_excluded() {
        let segments = vec![
            seg(10, 20, 30, ColorClass::Orange),
            seg(11, 20, 30, ColorClass::Yellow),
            seg(12, 20, 30, ColorClass::Orange),
            seg(13, 20, 30, ColorClass::Orange),
            seg(14, 20, 30, ColorClass::Orange),
        ];
        let out = classify_candidates(&segments, ORANGE_ONLY, &ClusterParams::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].color, ColorClass::Orange);
    }

    #[test]
    fn small_clusters_fall_below_segment_threshold() {
        // 3 segments is not > SEG_COUNT_THRESHOLD(3).
        let segments = vec![
            seg(10, 20, 30, ColorClass::Orange),
            seg(11, 20, 30, ColorClass::Orange),
            seg(12, 20, 30, ColorClass::Orange),
        ];
        let out = classify_candidates(&segments, ORANGE_ONLY, &ClusterParams::default());
        assert!(out.is_empty());
    }

    #[test]
    fn clustering_is_idempotent() {
        let segments = vec![
            seg(10, 20, 30, ColorClass::Orange),
            seg(11, 18, 32, ColorClass::Orange),
            seg(12, 20, 30, ColorClass::Orange),
            seg(13, 20, 28, ColorClass::Orange),
            seg(30, 5, 40, ColorClass::Orange),
            seg(32, 5, 40, ColorClass::Orange),
            seg(34, 5, 40, ColorClass::Orange),
            seg(36, 5, 40, ColorClass::Orange),
        ];
        let first = classify_candidates(&segments, ORANGE_ONLY, &ClusterParams::default());
        let second = classify_candidates(&segments, ORANGE_ONLY, &ClusterParams::default());
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn aspect_enforcement_is_opt_in() {
        // A wide flat cluster: aspect = 28/10 = 2.8, outside [0.1, 2.0].
        let segments: Vec<TransitionSegment> = (0..8)
            .map(|i| seg(4 * i, 10, 20, ColorClass::Orange))
            .collect();
        let permissive = classify_candidates(&segments, ORANGE_ONLY, &ClusterParams::default());
        assert_eq!(permissive.len(), 1);

        let strict = ClusterParams {
            enforce_aspect: true,
            ..ClusterParams::default()
        };
        assert!(classify_candidates(&segments, ORANGE_ONLY, &strict).is_empty());
    }
}
