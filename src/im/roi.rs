/// Axis-aligned pixel box. `l`/`t` are the smallest column/row indices; `r`/`b`
/// are exclusive upper bounds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ROI {
    pub l: usize,
    pub t: usize,
    /// Exclusive right bound.
    pub r: usize,
    /// Exclusive bottom bound.
    pub b: usize,
}

impl ROI {
    /// Pixels whose index lies in `[floor(lo - pad), floor(hi + pad)]` on each
    /// axis, clamped to a `max_w` x `max_h` raster.
    ///
    /// Returns `None` when the box misses the raster or the bounds are not finite.
    pub fn covering(lo: [f64; 2], hi: [f64; 2], pad: f64, max_w: usize, max_h: usize) -> Option<ROI> {
        fn span(lo: f64, hi: f64, pad: f64, max: usize) -> Option<(usize, usize)> {
            let a = (lo - pad).floor();
            let b = (hi + pad).floor();
            if !(a.is_finite() && b.is_finite()) || b < 0.0 || a >= max as f64 || max == 0 {
                return None;
            }
            let a = a.max(0.0) as usize;
            let b = (b as usize).min(max - 1);
            (a <= b).then_some((a, b + 1))
        }

        let (l, r) = span(lo[0], hi[0], pad, max_w)?;
        let (t, b) = span(lo[1], hi[1], pad, max_h)?;
        Some(ROI { l, t, r, b })
    }
}
