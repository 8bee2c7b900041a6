//! Scan-grid generation over the interpolated field border.
//!
//! Vertical lines deliberately over-sample near the border and under-sample
//! far below it: field objects cluster at the border, and pixels close to
//! the camera are cheap to cover with short lines. Horizontal lines cover
//! the region above and through the border band; everything below it is
//! already covered by the vertical grid.

use crate::geometry::Point2i;
use crate::image::YcbcrImage;
use crate::scanline::{ClassifiedSection, ScanDirection, ScanLine};

/// Build the vertical scan grid below the interpolated border.
///
/// Every border point contributes four downward lines: a full-length line at
/// the border x, a half-length line at `x − spacing/2` and two quarter-length
/// lines at `x − spacing/2 ∓ spacing/4`. One trailing half/quarter set is
/// appended past the last border point (at `x + spacing/2`) so the right
/// image edge keeps the same staggered coverage.
///
/// An empty border produces an empty section.
pub fn vertical_scan(
    border: &[Point2i],
    scan_spacing: i32,
    image: &YcbcrImage,
) -> ClassifiedSection {
    let mut section = ClassifiedSection::new(ScanDirection::Down);
    if border.is_empty() {
        return section;
    }
    let skip = scan_spacing / 2;
    let mut half_length = 0;
    let mut quarter_length = 0;

    for point in border {
        let (x, y) = (point.x, point.y);

        let full_length = image.height() - y;
        section.add_scan_line(ScanLine::new(Point2i::new(x, y), full_length));

        let mid_x = x - skip;
        half_length = (image.height() - y) / 2;
        section.add_scan_line(ScanLine::new(Point2i::new(mid_x, y), half_length));

        quarter_length = (image.height() - y) / 4;
        section.add_scan_line(ScanLine::new(
            Point2i::new(mid_x - skip / 2, y),
            quarter_length,
        ));
        section.add_scan_line(ScanLine::new(
            Point2i::new(mid_x + skip / 2, y),
            quarter_length,
        ));
    }

    // Trailing half/quarter set past the last border column, reusing the
    // last computed lengths.
    let last = border[border.len() - 1];
    let mid_x = last.x + skip;
    section.add_scan_line(ScanLine::new(Point2i::new(mid_x, last.y), half_length));
    section.add_scan_line(ScanLine::new(
        Point2i::new(mid_x - skip / 2, last.y),
        quarter_length,
    ));
    section.add_scan_line(ScanLine::new(
        Point2i::new(mid_x + skip / 2, last.y),
        quarter_length,
    ));

    section
}

/// Build the horizontal scan grid above and through the border band.
///
/// With no border available the whole image is covered by coarse full-width
/// lines every `2 · scan_spacing` as a fallback. Otherwise the sky region
/// above the border minimum is scanned densely (every `scan_spacing`) and
/// the ambiguous band between border minimum and maximum coarsely (every
/// `2 · scan_spacing`). Nothing is emitted below the border maximum.
pub fn horizontal_scan(
    border: &[Point2i],
    scan_spacing: i32,
    image: &YcbcrImage,
) -> ClassifiedSection {
    let mut section = ClassifiedSection::new(ScanDirection::Right);

    if border.is_empty() {
        let mut y = 0;
        while y < image.height() {
            section.add_scan_line(ScanLine::new(Point2i::new(0, y), image.width()));
            y += scan_spacing * 2;
        }
        return section;
    }

    let mut min_y = image.height();
    let mut max_y = 0;
    for point in border.iter().skip(1) {
        if point.y < min_y {
            min_y = point.y;
        }
        if point.y > max_y {
            max_y = point.y;
        }
    }

    // Sky region above the border minimum: dense coverage.
    let mut y = min_y;
    while y > 0 {
        section.add_scan_line(ScanLine::new(Point2i::new(0, y), image.width()));
        y -= scan_spacing;
    }
    // Ambiguous band between border minimum and maximum: coarse coverage.
    let mut y = min_y;
    while y < max_y {
        section.add_scan_line(ScanLine::new(Point2i::new(0, y), image.width()));
        y += scan_spacing * 2;
    }

    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::field_image;

    #[test]
    fn vertical_grid_staggers_four_lines_per_border_point() {
        let img = field_image(64, 64);
        let border = vec![Point2i::new(16, 20), Point2i::new(32, 24)];
        let section = vertical_scan(&border, 16, &img);
        // 4 per border point + 3 trailing.
        assert_eq!(section.scan_lines().len(), 2 * 4 + 3);

        let lines = section.scan_lines();
        // Full line at the border point, length to image bottom.
        assert_eq!(lines[0].start(), Point2i::new(16, 20));
        assert_eq!(lines[0].length(), 44);
        // Half line at x - spacing/2.
        assert_eq!(lines[1].start(), Point2i::new(8, 20));
        assert_eq!(lines[1].length(), 22);
        // Quarter lines at x - spacing/2 ∓ spacing/4.
        assert_eq!(lines[2].start(), Point2i::new(4, 20));
        assert_eq!(lines[3].start(), Point2i::new(12, 20));
        assert_eq!(lines[2].length(), 11);

        // Trailing set past the last border column.
        assert_eq!(lines[8].start(), Point2i::new(40, 24));
        assert_eq!(lines[8].length(), 20); // half of (64 - 24)
        assert_eq!(lines[9].start(), Point2i::new(36, 24));
        assert_eq!(lines[10].start(), Point2i::new(44, 24));
    }

    #[test]
    fn vertical_grid_empty_border_is_empty() {
        let img = field_image(64, 64);
        assert!(vertical_scan(&[], 16, &img).scan_lines().is_empty());
    }

    #[test]
    fn horizontal_fallback_covers_whole_image_coarsely() {
        let img = field_image(64, 48);
        let section = horizontal_scan(&[], 8, &img);
        let ys: Vec<i32> = section.scan_lines().iter().map(|l| l.start().y).collect();
        assert_eq!(ys, vec![0, 16, 32]);
        for line in section.scan_lines() {
            assert_eq!(line.start().x, 0);
            assert_eq!(line.length(), 64);
        }
    }

    #[test]
    fn horizontal_grid_is_dense_above_and_coarse_within_border_band() {
        let img = field_image(64, 64);
        let border = vec![
            Point2i::new(0, 50), // skipped by the min/max walk
            Point2i::new(16, 24),
            Point2i::new(32, 40),
        ];
        let section = horizontal_scan(&border, 8, &img);
        let ys: Vec<i32> = section.scan_lines().iter().map(|l| l.start().y).collect();
        // Dense upward from min_y = 24; the coarse walk steps 2 * 8 = 16
        // from 24 and stops before max_y = 40, so it emits only row 24.
        assert_eq!(ys, vec![24, 16, 8, 24]);
    }
}
