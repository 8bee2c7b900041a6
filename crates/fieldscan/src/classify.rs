//! Lookup-table pixel classification.
//!
//! A pixel is classified by one table read indexed with the packed
//! `(Y << 16) | (Cb << 8) | Cr` value. No range branching happens at
//! classification time; all colour knowledge lives in the table, which is
//! built and edited offline.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::image::{Pixel, YcbcrImage};

/// Discrete colour classes produced by table lookup.
///
/// Discriminants are the byte values stored in table files and must stay
/// stable for bit-exact interop with existing tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ColorClass {
    Unclassified = 0,
    White = 1,
    Green = 2,
    Shadowed = 3,
    RedOrange = 4,
    Orange = 5,
    YellowOrange = 6,
    Yellow = 7,
    Blue = 8,
    ShadowBlue = 9,
    Red = 10,
}

impl ColorClass {
    /// Decode a table byte. Bytes outside the known range classify as
    /// `Unclassified` rather than failing; stale tables may carry them.
    pub fn from_byte(b: u8) -> Self {
        match b {
            1 => Self::White,
            2 => Self::Green,
            3 => Self::Shadowed,
            4 => Self::RedOrange,
            5 => Self::Orange,
            6 => Self::YellowOrange,
            7 => Self::Yellow,
            8 => Self::Blue,
            9 => Self::ShadowBlue,
            10 => Self::Red,
            _ => Self::Unclassified,
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Ball colours: the orange family.
    pub fn is_ball_colour(self) -> bool {
        matches!(self, Self::Orange | Self::RedOrange | Self::YellowOrange)
    }

    /// Colours that never produce transition segments.
    pub(crate) fn is_background(self) -> bool {
        matches!(self, Self::Green | Self::Unclassified)
    }
}

/// Number of entries in a full-resolution table: one byte per (Y, Cb, Cr).
pub const TABLE_LEN: usize = 1 << 24;

/// Flat byte array mapping packed (Y, Cb, Cr) to a colour class.
///
/// Loaded and saved verbatim so tables produced by external editing tools
/// classify identically here. Read-only during classification.
pub struct LookupTable {
    entries: Vec<u8>,
}

// The entries array is 16 MiB; print its length, not its contents.
impl fmt::Debug for LookupTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupTable")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl LookupTable {
    /// An all-`Unclassified` table.
    pub fn empty() -> Self {
        Self {
            entries: vec![0u8; TABLE_LEN],
        }
    }

    /// Build a table by evaluating `f` over the full colour cube.
    ///
    /// Intended for tests and synthetic fixtures; real tables are trained
    /// offline and loaded from file.
    pub fn from_fn(f: impl Fn(u8, u8, u8) -> ColorClass) -> Self {
        let mut entries = vec![0u8; TABLE_LEN];
        for y in 0..=255u8 {
            for cb in 0..=255u8 {
                let base = ((y as usize) << 16) | ((cb as usize) << 8);
                for cr in 0..=255u8 {
                    entries[base | cr as usize] = f(y, cb, cr).as_byte();
                }
            }
        }
        Self { entries }
    }

    /// Load a table file: the raw byte array, verbatim.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let entries = fs::read(path)?;
        if entries.len() != TABLE_LEN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "lookup table is {} bytes, expected {}",
                    entries.len(),
                    TABLE_LEN
                ),
            ));
        }
        Ok(Self { entries })
    }

    /// Save the raw byte array, verbatim.
    pub fn to_file(&self, path: &Path) -> io::Result<()> {
        fs::write(path, &self.entries)
    }

    /// Classify one pixel value. Pure table read.
    #[inline]
    pub fn classify(&self, px: Pixel) -> ColorClass {
        let idx = ((px.y as usize) << 16) | ((px.cb as usize) << 8) | px.cr as usize;
        ColorClass::from_byte(self.entries[idx])
    }

    /// Classify the pixel at `(x, y)`. Callers must bounds-check; see
    /// [`YcbcrImage::pixel`].
    #[inline]
    pub fn classify_at(&self, image: &YcbcrImage, x: i32, y: i32) -> ColorClass {
        self.classify(image.pixel(x, y))
    }
}
