use serde::Deserialize;

use crate::bitmap::Bitmap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const BLACK: Rgb = Rgb([0, 0, 0]);
    pub const WHITE: Rgb = Rgb([255, 255, 255]);

    /// Scales every channel by `factor` (expected in `[0, 1]`), truncating.
    #[inline]
    pub fn shaded(self, factor: f64) -> Rgb {
        let [r, g, b] = self.0;
        let f = |c: u8| (factor * c as f64) as u8;
        Rgb([f(r), f(g), f(b)])
    }
}

/// Depth value of a pixel nothing has been drawn to.
pub const EMPTY_DEPTH: f64 = f64::MIN;

/// One depth-buffered color sample. Larger depth is nearer to the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pixel {
    pub depth: f64,
    pub color: Rgb,
}

impl Pixel {
    pub fn background(color: Rgb) -> Self {
        Self { depth: EMPTY_DEPTH, color }
    }

    /// Nearest-fragment merge. `other` replaces `self` only when strictly nearer,
    /// so ties keep `self`.
    #[inline]
    pub fn merge(&mut self, other: &Pixel) {
        if other.depth > self.depth {
            *self = *other;
        }
    }

    /// Depth-tested write used by the rasterizers.
    #[inline]
    pub fn write_if_nearer(&mut self, depth: f64, color: Rgb) -> bool {
        if depth > self.depth {
            self.depth = depth;
            self.color = color;
            true
        } else {
            false
        }
    }
}

pub type Canvas = Bitmap<Pixel>;

impl Canvas {
    pub fn blank(w: usize, h: usize, background: Rgb) -> Self {
        Bitmap::filled(w, h, Pixel::background(background))
    }

    /// Merges `other` into `self` pixel by pixel.
    pub fn merge_from(&mut self, other: &[Pixel]) {
        debug_assert_eq!(self.arr.len(), other.len());
        for (a, b) in self.arr.iter_mut().zip(other) {
            a.merge(b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_nearest_and_first_on_tie() {
        let red = Rgb([255, 0, 0]);
        let blue = Rgb([0, 0, 255]);

        let mut a = Pixel { depth: -1.0, color: red };
        a.merge(&Pixel { depth: -2.0, color: blue });
        assert_eq!(a.color, red);

        a.merge(&Pixel { depth: -1.0, color: blue });
        assert_eq!(a.color, red, "tie keeps the first operand");

        a.merge(&Pixel { depth: -0.5, color: blue });
        assert_eq!(a, Pixel { depth: -0.5, color: blue });
    }

    #[test]
    fn shaded_truncates() {
        assert_eq!(Rgb([255, 100, 3]).shaded(0.5), Rgb([127, 50, 1]));
        assert_eq!(Rgb::WHITE.shaded(1.0), Rgb::WHITE);
    }
}
