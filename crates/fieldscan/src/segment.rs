//! Transition-segment extraction along scan lines.
//!
//! Each scan line is walked pixel by pixel through the lookup table. A small
//! circular buffer debounces single-pixel classification noise: a colour
//! change is only committed once two consecutive samples agree. Runs of
//! green or unclassified never produce segments — only "interesting" colours
//! do, which roughly halves the segment volume and is relied upon
//! downstream.

use crate::classify::{ColorClass, LookupTable};
use crate::geometry::Point2i;
use crate::image::YcbcrImage;
use crate::scanline::{ClassifiedSection, ScanDirection, ScanLine, TransitionSegment};

/// Debounce window: samples that must agree before a transition commits.
const BUFFER_SIZE: usize = 2;

#[inline]
fn buffer_uniform(buffer: &[ColorClass; BUFFER_SIZE]) -> bool {
    buffer.iter().all(|&c| c == buffer[0])
}

/// Extract transition segments for every line of a scanned section.
///
/// Lines shorter than the debounce buffer are skipped, as are lines that
/// leave the frame (the staggered grid can place lines past the image edge
/// near x = 0; a missing line is an accepted fallback, not an error).
///
/// At the end of a line the current run is force-closed. A run that extends
/// to the final pixel has no known following colour, so its `after_color`
/// is reported as `Unclassified`.
pub fn classify_scan_area(
    section: &mut ClassifiedSection,
    image: &YcbcrImage,
    table: &LookupTable,
) {
    let direction = section.direction();
    for line in section.scan_lines_mut() {
        scan_one_line(line, direction, image, table);
    }
}

fn scan_one_line(
    line: &mut ScanLine,
    direction: ScanDirection,
    image: &YcbcrImage,
    table: &LookupTable,
) {
    let length = line.length();
    if length < BUFFER_SIZE as i32 {
        return;
    }
    let start = line.start();
    let last = direction.step(start, length - 1);
    if !image.contains(start.x, start.y) || !image.contains(last.x, last.y) {
        return;
    }

    let mut buffer = [ColorClass::Unclassified; BUFFER_SIZE];
    let mut before_color = ColorClass::Unclassified;
    let mut current_color = ColorClass::Unclassified;
    let mut seg_start = start;

    for j in 0..length {
        let point = direction.step(start, j);
        let after_color = table.classify_at(image, point.x, point.y);
        buffer[j as usize % BUFFER_SIZE] = after_color;

        if j == length - 1 {
            // End of line: force-close the current run.
            if !current_color.is_background() {
                let closing = if after_color == current_color {
                    ColorClass::Unclassified
                } else {
                    after_color
                };
                line.add_segment(TransitionSegment::new(
                    seg_start,
                    point,
                    before_color,
                    current_color,
                    closing,
                ));
            }
            continue;
        }

        if buffer_uniform(&buffer) && current_color != after_color {
            // Debounced transition.
            if !current_color.is_background() {
                line.add_segment(TransitionSegment::new(
                    seg_start,
                    point,
                    before_color,
                    current_color,
                    after_color,
                ));
            }
            seg_start = point;
            before_color = current_color;
            current_color = after_color;
        }
    }
}

/// Densely re-scan a single line at the given pixel `spacing`.
///
/// Used by the object fitters to collect precise edge points inside a
/// candidate box after the sparse grid has located it. The walk is clipped
/// to the frame, so callers may pass lines that start slightly outside it.
pub fn closely_classify_scanline(
    start: Point2i,
    length: i32,
    spacing: i32,
    direction: ScanDirection,
    image: &YcbcrImage,
    table: &LookupTable,
) -> ScanLine {
    let mut line = ScanLine::new(start, length);
    let spacing = spacing.max(1);

    let mut buffer = [ColorClass::Unclassified; BUFFER_SIZE];
    let mut before_color = ColorClass::Unclassified;
    let mut current_color = ColorClass::Unclassified;
    let mut seg_start: Option<Point2i> = None;
    let mut slot = 0usize;
    let mut prev_point: Option<Point2i> = None;

    let mut j = 0;
    while j < length {
        let point = direction.step(start, j);
        if image.contains(point.x, point.y) {
            let after_color = table.classify_at(image, point.x, point.y);
            buffer[slot % BUFFER_SIZE] = after_color;
            slot += 1;
            let seg_from = *seg_start.get_or_insert(point);

            let at_end = j + spacing >= length;
            if at_end {
                if !current_color.is_background() {
                    let closing = if after_color == current_color {
                        ColorClass::Unclassified
                    } else {
                        after_color
                    };
                    line.add_segment(TransitionSegment::new(
                        seg_from,
                        point,
                        before_color,
                        current_color,
                        closing,
                    ));
                }
            } else if buffer_uniform(&buffer) && slot >= BUFFER_SIZE && current_color != after_color
            {
                if !current_color.is_background() {
                    line.add_segment(TransitionSegment::new(
                        seg_from,
                        point,
                        before_color,
                        current_color,
                        after_color,
                    ));
                }
                seg_start = Some(point);
                before_color = current_color;
                current_color = after_color;
            }
            prev_point = Some(point);
        } else if let Some(prev) = prev_point {
            // Walk left the frame: close any open interesting run at the
            // last in-bounds point.
            if !current_color.is_background() {
                if let Some(seg_from) = seg_start {
                    line.add_segment(TransitionSegment::new(
                        seg_from,
                        prev,
                        before_color,
                        current_color,
                        ColorClass::Unclassified,
                    ));
                }
            }
            break;
        }
        j += spacing;
    }
    line
}
