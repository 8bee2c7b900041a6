//! Frame-local scan-grid data model.
//!
//! A [`ClassifiedSection`] owns the scan lines generated for one frame and
//! one direction; segment extraction appends [`TransitionSegment`]s to each
//! line in scan order. Everything here is rebuilt every frame and discarded
//! before the next one begins.

use crate::classify::ColorClass;
use crate::geometry::Point2i;

/// Direction a scan line is walked, from its start point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanDirection {
    Up,
    Down,
    Left,
    Right,
}

impl ScanDirection {
    /// Point reached after walking `steps` pixels from `start`.
    #[inline]
    pub fn step(self, start: Point2i, steps: i32) -> Point2i {
        match self {
            Self::Down => Point2i::new(start.x, start.y + steps),
            Self::Up => Point2i::new(start.x, start.y - steps),
            Self::Right => Point2i::new(start.x + steps, start.y),
            Self::Left => Point2i::new(start.x - steps, start.y),
        }
    }
}

/// A maximal run of one colour class along a scan line, bounded by its
/// neighbouring colours.
///
/// Invariants (enforced by the extractor): `start` precedes `end` along the
/// scan direction, and `color` differs from both `before_color` and
/// `after_color`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionSegment {
    pub start: Point2i,
    pub end: Point2i,
    pub before_color: ColorClass,
    pub color: ColorClass,
    pub after_color: ColorClass,
}

impl TransitionSegment {
    pub fn new(
        start: Point2i,
        end: Point2i,
        before_color: ColorClass,
        color: ColorClass,
        after_color: ColorClass,
    ) -> Self {
        Self {
            start,
            end,
            before_color,
            color,
            after_color,
        }
    }

    /// Length in pixels along the scan direction.
    pub fn size(&self) -> i32 {
        (self.end.x - self.start.x).abs() + (self.end.y - self.start.y).abs()
    }
}

/// One 1-D pixel walk: a start point, a length and the segments found on it.
#[derive(Debug, Clone)]
pub struct ScanLine {
    start: Point2i,
    length: i32,
    segments: Vec<TransitionSegment>,
}

impl ScanLine {
    pub fn new(start: Point2i, length: i32) -> Self {
        Self {
            start,
            length,
            segments: Vec::new(),
        }
    }

    pub fn start(&self) -> Point2i {
        self.start
    }

    pub fn length(&self) -> i32 {
        self.length
    }

    pub fn segments(&self) -> &[TransitionSegment] {
        &self.segments
    }

    pub(crate) fn add_segment(&mut self, segment: TransitionSegment) {
        self.segments.push(segment);
    }
}

/// The scan lines generated for one frame in one direction.
#[derive(Debug, Clone)]
pub struct ClassifiedSection {
    direction: ScanDirection,
    scan_lines: Vec<ScanLine>,
}

impl ClassifiedSection {
    pub fn new(direction: ScanDirection) -> Self {
        Self {
            direction,
            scan_lines: Vec::new(),
        }
    }

    pub fn direction(&self) -> ScanDirection {
        self.direction
    }

    pub fn add_scan_line(&mut self, line: ScanLine) {
        self.scan_lines.push(line);
    }

    pub fn scan_lines(&self) -> &[ScanLine] {
        &self.scan_lines
    }

    pub(crate) fn scan_lines_mut(&mut self) -> &mut [ScanLine] {
        &mut self.scan_lines
    }

    /// All segments across all lines, flattened in line-then-scan order.
    ///
    /// The clusterer relies on this ordering: segments of one column are
    /// contiguous and columns appear left to right.
    pub fn all_segments(&self) -> Vec<TransitionSegment> {
        self.scan_lines
            .iter()
            .flat_map(|l| l.segments().iter().copied())
            .collect()
    }
}
