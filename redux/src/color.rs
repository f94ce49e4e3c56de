//! Color and pixel model.

use std::fmt;

/// Per-channel tolerance below which two colors are considered equal.
pub const TOLERANCE: f64 = 1.0;

/// An RGB color. Channels are nominally in `0..=255` but are never clamped, and are kept as
/// floating point so that centroids can be averaged without accumulating rounding errors.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn from_array(array: [f64; 3]) -> Self {
        Self {
            r: array[0],
            g: array[1],
            b: array[2],
        }
    }

    pub fn distance_squared(self, other: Color) -> f64 {
        let dr = other.r - self.r;
        let dg = other.g - self.g;
        let db = other.b - self.b;
        dr * dr + dg * dg + db * db
    }

    /// Euclidean distance in RGB space. No channel weighting.
    pub fn distance(self, other: Color) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Returns whether every channel of `self` is within [`TOLERANCE`] of the corresponding
    /// channel of `other`.
    ///
    /// This is deliberately not a distance threshold: a large difference in a single channel
    /// must not be hidden by the other two channels being close.
    pub fn approx_eq(self, other: Color) -> bool {
        (self.r - other.r).abs() <= TOLERANCE
            && (self.g - other.g).abs() <= TOLERANCE
            && (self.b - other.b).abs() <= TOLERANCE
    }

    /// Truncates every channel toward zero. Adding `0.0` turns `-0.0` into `0.0`, so negative
    /// means close to zero are written out as `0`.
    pub fn trunc(self) -> Self {
        Self {
            r: self.r.trunc() + 0.0,
            g: self.g.trunc() + 0.0,
            b: self.b.trunc() + 0.0,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.r, self.g, self.b)
    }
}

/// A single image sample together with its position in the row-major pixel buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pixel {
    pub color: Color,
    pub index: usize,
}

impl Pixel {
    pub fn new(color: Color, index: usize) -> Self {
        Self { color, index }
    }
}
