/// Row-major 2D grid of arbitrary cells. Row 0 is the bottom row when a bitmap
/// is used as a render target.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap<T> {
    pub w: usize,
    pub h: usize,
    pub s: usize, // stride: elements per row
    pub arr: Vec<T>,
}

impl<T: Clone> Bitmap<T> {
    pub fn filled(w: usize, h: usize, value: T) -> Self {
        let s = w;
        let arr = vec![value; s * h];
        Self { w, h, s, arr }
    }

    /// Wraps an existing buffer. Returns `None` if `arr` is not exactly `w * h` long.
    pub fn from_vec(w: usize, h: usize, arr: Vec<T>) -> Option<Self> {
        (arr.len() == w * h).then_some(Self { w, h, s: w, arr })
    }
}

impl<T> Bitmap<T> {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x < self.w && y < self.h {
            self.arr.get(y * self.s + x)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x < self.w && y < self.h {
            self.arr.get_mut(y * self.s + x)
        } else {
            None
        }
    }

    pub fn row(&self, y: usize) -> &[T] {
        &self.arr[y * self.s..y * self.s + self.w]
    }
}
