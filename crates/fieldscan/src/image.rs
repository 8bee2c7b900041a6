//! Raw YCbCr frame buffer.
//!
//! Classification tables are indexed in YCbCr, so the working image type
//! keeps the camera's native colour space. Captures arriving as RGB (the
//! simulator and the desktop visualizer) are converted once at the boundary.

use image::RgbImage;

/// One YCbCr sample. Immutable per capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub y: u8,
    pub cb: u8,
    pub cr: u8,
}

/// A captured frame: row-major YCbCr pixels plus the capture timestamp.
///
/// Vision holds a non-owning reference to one frame at a time; the buffer is
/// owned by the capture subsystem.
#[derive(Debug, Clone)]
pub struct YcbcrImage {
    width: u32,
    height: u32,
    timestamp_ms: f64,
    data: Vec<Pixel>,
}

impl YcbcrImage {
    /// Create a frame filled with a uniform pixel value.
    pub fn filled(width: u32, height: u32, timestamp_ms: f64, fill: Pixel) -> Self {
        Self {
            width,
            height,
            timestamp_ms,
            data: vec![fill; (width * height) as usize],
        }
    }

    /// Convert an RGB capture with BT.601 full-range coefficients.
    pub fn from_rgb(rgb: &RgbImage, timestamp_ms: f64) -> Self {
        let (width, height) = rgb.dimensions();
        let mut data = Vec::with_capacity((width * height) as usize);
        for px in rgb.pixels() {
            let [r, g, b] = px.0;
            let (r, g, b) = (r as f32, g as f32, b as f32);
            let y = 0.299 * r + 0.587 * g + 0.114 * b;
            let cb = 128.0 - 0.168_736 * r - 0.331_264 * g + 0.5 * b;
            let cr = 128.0 + 0.5 * r - 0.418_688 * g - 0.081_312 * b;
            data.push(Pixel {
                y: y.clamp(0.0, 255.0) as u8,
                cb: cb.clamp(0.0, 255.0) as u8,
                cr: cr.clamp(0.0, 255.0) as u8,
            });
        }
        Self {
            width,
            height,
            timestamp_ms,
            data,
        }
    }

    pub fn width(&self) -> i32 {
        self.width as i32
    }

    pub fn height(&self) -> i32 {
        self.height as i32
    }

    pub fn timestamp_ms(&self) -> f64 {
        self.timestamp_ms
    }

    /// Pixel at `(x, y)`. Coordinates must be in bounds; scan generators are
    /// responsible for clipping their lines to the frame.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Pixel {
        debug_assert!(self.contains(x, y), "pixel access out of bounds: ({x}, {y})");
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Mutable access, used by test fixtures and the capture subsystem.
    pub fn set_pixel(&mut self, x: i32, y: i32, px: Pixel) {
        debug_assert!(self.contains(x, y));
        self.data[y as usize * self.width as usize + x as usize] = px;
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_conversion_maps_gray_to_neutral_chroma() {
        let mut rgb = RgbImage::new(4, 2);
        for px in rgb.pixels_mut() {
            px.0 = [100, 100, 100];
        }
        let img = YcbcrImage::from_rgb(&rgb, 0.0);
        let p = img.pixel(0, 0);
        assert_eq!(p.y, 100); // 0.299 + 0.587 + 0.114 == 1.0 exactly
        assert_eq!(p.cb, 128);
        assert_eq!(p.cr, 128);
    }

    #[test]
    fn pixel_roundtrip() {
        let mut img = YcbcrImage::filled(8, 8, 1.0, Pixel { y: 0, cb: 0, cr: 0 });
        img.set_pixel(3, 5, Pixel { y: 10, cb: 20, cr: 30 });
        assert_eq!(img.pixel(3, 5), Pixel { y: 10, cb: 20, cr: 30 });
        assert_eq!(img.pixel(3, 4), Pixel { y: 0, cb: 0, cr: 0 });
    }
}
