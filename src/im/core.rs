use crate::canvas::{Canvas, EMPTY_DEPTH};

/// Packed interleaved image, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct Im<T, const N_CH: usize> {
    pub w: usize,
    pub h: usize,
    pub s: usize, // stride in elements (w * N_CH)
    pub arr: Vec<T>,
}

// Constructor
// -----------------------------------------------------------------------------
impl<T: Copy + Default, const N_CH: usize> Im<T, N_CH> {
    pub fn new(w: usize, h: usize) -> Self {
        let s = w * N_CH;
        let arr = vec![T::default(); s * h];
        Self { w, h, s, arr }
    }
}

pub type RgbIm = Im<u8, 3>;
pub type Lum8Im = Im<u8, 1>;

// Canvas conversions
// -----------------------------------------------------------------------------

impl RgbIm {
    /// Color plane of a canvas. Canvas row 0 is the bottom of the picture, so
    /// rows are flipped on the way out.
    pub fn from_canvas(canvas: &Canvas) -> Self {
        let mut im = RgbIm::new(canvas.w, canvas.h);
        for j in 0..canvas.h {
            let dst_row = canvas.h - j - 1;
            for (i, px) in canvas.row(j).iter().enumerate() {
                let base = dst_row * im.s + i * 3;
                im.arr[base..base + 3].copy_from_slice(&px.color.0);
            }
        }
        im
    }
}

impl Lum8Im {
    /// Depth plane of a canvas as gray levels: nearest drawn pixel is white,
    /// farthest drawn pixel is dark gray, undrawn pixels are black.
    pub fn depth_from_canvas(canvas: &Canvas) -> Self {
        let drawn = || canvas.arr.iter().map(|p| p.depth).filter(|d| *d > EMPTY_DEPTH);
        let lo = drawn().fold(f64::INFINITY, f64::min);
        let hi = drawn().fold(f64::NEG_INFINITY, f64::max);
        let span = (hi - lo).max(f64::MIN_POSITIVE);

        let mut im = Lum8Im::new(canvas.w, canvas.h);
        for j in 0..canvas.h {
            let dst_row = canvas.h - j - 1;
            for (i, px) in canvas.row(j).iter().enumerate() {
                let v = if px.depth > EMPTY_DEPTH {
                    (64.0 + 191.0 * (px.depth - lo) / span).clamp(0.0, 255.0) as u8
                } else {
                    0
                };
                im.arr[dst_row * im.s + i] = v;
            }
        }
        im
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Pixel, Rgb};

    #[test]
    fn from_canvas_flips_rows() {
        let mut canvas = Canvas::blank(2, 2, Rgb::BLACK);
        *canvas.get_mut(1, 0).unwrap() = Pixel { depth: 0.0, color: Rgb([1, 2, 3]) };

        let im = RgbIm::from_canvas(&canvas);
        // Bottom-right canvas pixel lands in the last image row.
        assert_eq!(&im.arr[9..12], &[1, 2, 3]);
        assert!(im.arr[..9].iter().all(|&v| v == 0));
    }

    #[test]
    fn depth_view_spans_drawn_range() {
        let mut canvas = Canvas::blank(3, 1, Rgb::BLACK);
        canvas.arr[0].depth = -2.0;
        canvas.arr[1].depth = -1.0;
        let im = Lum8Im::depth_from_canvas(&canvas);
        assert_eq!(im.arr, vec![64, 255, 0]);
    }
}
