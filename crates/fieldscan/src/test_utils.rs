//! Shared test fixtures: canonical colour pixels, a synthetic lookup table
//! and field-scene painters.
//!
//! The table is built once per process (it is a full 16 MiB colour cube) and
//! shared behind a `OnceLock`.

use std::sync::OnceLock;

use crate::classify::{ColorClass, LookupTable};
use crate::image::{Pixel, YcbcrImage};

pub(crate) const GREEN: Pixel = Pixel {
    y: 100,
    cb: 90,
    cr: 90,
};
pub(crate) const ORANGE: Pixel = Pixel {
    y: 120,
    cb: 80,
    cr: 200,
};
pub(crate) const YELLOW: Pixel = Pixel {
    y: 180,
    cb: 60,
    cr: 150,
};
pub(crate) const BLUE: Pixel = Pixel {
    y: 80,
    cb: 200,
    cr: 100,
};
pub(crate) const WHITE: Pixel = Pixel {
    y: 240,
    cb: 128,
    cr: 128,
};

/// A synthetic table with simple chroma rules covering the fixture pixels.
pub(crate) fn test_table() -> &'static LookupTable {
    static TABLE: OnceLock<LookupTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        LookupTable::from_fn(|y, cb, cr| {
            if y >= 220 {
                ColorClass::White
            } else if cr >= 180 {
                ColorClass::Orange
            } else if cb >= 180 {
                ColorClass::Blue
            } else if cb < 100 && cr >= 120 {
                ColorClass::Yellow
            } else if cr < 110 && cb < 130 && y < 200 {
                ColorClass::Green
            } else {
                ColorClass::Unclassified
            }
        })
    })
}

/// An all-green frame.
pub(crate) fn field_image(width: u32, height: u32) -> YcbcrImage {
    YcbcrImage::filled(width, height, 0.0, GREEN)
}

/// Paint an inclusive rectangle, clipped to the frame.
pub(crate) fn paint_rect(img: &mut YcbcrImage, x0: i32, y0: i32, x1: i32, y1: i32, px: Pixel) {
    for y in y0.max(0)..=y1.min(img.height() - 1) {
        for x in x0.max(0)..=x1.min(img.width() - 1) {
            img.set_pixel(x, y, px);
        }
    }
}

/// Paint a filled disc, clipped to the frame.
pub(crate) fn paint_disc(img: &mut YcbcrImage, cx: i32, cy: i32, radius: i32, px: Pixel) {
    for y in (cy - radius).max(0)..=(cy + radius).min(img.height() - 1) {
        for x in (cx - radius).max(0)..=(cx + radius).min(img.width() - 1) {
            let dx = x - cx;
            let dy = y - cy;
            if dx * dx + dy * dy <= radius * radius {
                img.set_pixel(x, y, px);
            }
        }
    }
}
