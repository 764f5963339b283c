//! Pencil domain decomposition.
//!
//! A global 3D array is split over a 2D grid of processes. The pencil axis is
//! kept whole on every process, and the two remaining axes are each split
//! across one dimension of the process grid.

use serde::Deserialize;

use crate::error::DecompError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pencil {
    #[default]
    X,
    Y,
    Z,
}

impl Pencil {
    /// The two axes split across the process grid, in grid-dimension order.
    pub fn split_axes(self) -> [Axis; 2] {
        match self {
            Pencil::X => [Axis::Y, Axis::Z],
            Pencil::Y => [Axis::X, Axis::Z],
            Pencil::Z => [Axis::X, Axis::Y],
        }
    }
}

/// Partition queries. Sizes and offsets are in grid points along one axis.
pub trait Decomposition {
    fn nprocs(&self, pencil: Pencil, axis: Axis) -> usize;
    fn myrank(&self, pencil: Pencil, axis: Axis) -> usize;
    fn mysize(&self, pencil: Pencil, axis: Axis, glsize: usize) -> Result<usize, DecompError>;
    fn offset(&self, pencil: Pencil, axis: Axis, glsize: usize) -> Result<usize, DecompError>;
    /// Transport ranks of the `[negative, positive]` neighbours along `axis`.
    /// `None` where a non-periodic axis ends.
    fn neighbours(&self, pencil: Pencil, axis: Axis) -> [Option<usize>; 2];
}

/// Balanced split of `glsize` points: the first `glsize % nprocs` parts get one extra.
pub fn balanced_size(glsize: usize, nprocs: usize, rank: usize) -> usize {
    glsize / nprocs + usize::from(rank < glsize % nprocs)
}

pub fn balanced_offset(glsize: usize, nprocs: usize, rank: usize) -> usize {
    rank * (glsize / nprocs) + rank.min(glsize % nprocs)
}

// Process grid
// -----------------------------------------------------------------------------

/// Reference `Decomposition`: `dims[0] * dims[1]` processes, rank numbering
/// with the first grid dimension varying fastest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessGrid {
    pub dims: [usize; 2],
    pub periodic: [bool; 3],
    pub rank: usize,
}

impl ProcessGrid {
    pub fn new(dims: [usize; 2], periodic: [bool; 3], rank: usize) -> Result<Self, DecompError> {
        let nprocs = dims[0] * dims[1];
        if nprocs == 0 {
            return Err(DecompError::GridMismatch { dims, nprocs });
        }
        if rank >= nprocs {
            return Err(DecompError::RankOutOfRange { rank, nprocs });
        }
        Ok(Self { dims, periodic, rank })
    }

    /// Near-square grid for `nprocs` processes (`dims[0] <= dims[1]`).
    pub fn balanced(nprocs: usize, periodic: [bool; 3], rank: usize) -> Result<Self, DecompError> {
        let nprocs = nprocs.max(1);
        let mut d0 = (nprocs as f64).sqrt() as usize;
        while d0 > 1 && nprocs % d0 != 0 {
            d0 -= 1;
        }
        let d0 = d0.max(1);
        Self::new([d0, nprocs / d0], periodic, rank)
    }

    /// Grid given explicitly, where zeros mean "pick for me".
    pub fn with_dims(dims: [usize; 2], nprocs: usize, periodic: [bool; 3], rank: usize) -> Result<Self, DecompError> {
        match dims {
            [0, 0] => Self::balanced(nprocs, periodic, rank),
            [0, d1] | [d1, 0] if d1 > 0 && nprocs % d1 == 0 => {
                let other = nprocs / d1;
                let dims = if dims[0] == 0 { [other, d1] } else { [d1, other] };
                Self::new(dims, periodic, rank)
            }
            _ if dims[0] * dims[1] == nprocs => Self::new(dims, periodic, rank),
            _ => Err(DecompError::GridMismatch { dims, nprocs }),
        }
    }

    pub fn size(&self) -> usize {
        self.dims[0] * self.dims[1]
    }

    fn coords(&self) -> [usize; 2] {
        [self.rank % self.dims[0], self.rank / self.dims[0]]
    }

    fn rank_at(&self, coords: [usize; 2]) -> usize {
        coords[1] * self.dims[0] + coords[0]
    }

    /// Which grid dimension splits `axis` under `pencil`, if any.
    fn grid_dim(pencil: Pencil, axis: Axis) -> Option<usize> {
        pencil.split_axes().iter().position(|a| *a == axis)
    }

    fn check(&self, pencil: Pencil, axis: Axis, glsize: usize) -> Result<(usize, usize), DecompError> {
        let np = self.nprocs(pencil, axis);
        if glsize < np {
            return Err(DecompError::TooFewPoints { axis, glsize, nprocs: np });
        }
        Ok((np, self.myrank(pencil, axis)))
    }
}

impl Decomposition for ProcessGrid {
    fn nprocs(&self, pencil: Pencil, axis: Axis) -> usize {
        Self::grid_dim(pencil, axis).map_or(1, |d| self.dims[d])
    }

    fn myrank(&self, pencil: Pencil, axis: Axis) -> usize {
        Self::grid_dim(pencil, axis).map_or(0, |d| self.coords()[d])
    }

    fn mysize(&self, pencil: Pencil, axis: Axis, glsize: usize) -> Result<usize, DecompError> {
        let (np, r) = self.check(pencil, axis, glsize)?;
        Ok(balanced_size(glsize, np, r))
    }

    fn offset(&self, pencil: Pencil, axis: Axis, glsize: usize) -> Result<usize, DecompError> {
        let (np, r) = self.check(pencil, axis, glsize)?;
        Ok(balanced_offset(glsize, np, r))
    }

    fn neighbours(&self, pencil: Pencil, axis: Axis) -> [Option<usize>; 2] {
        let periodic = self.periodic[axis.index()];
        let Some(d) = Self::grid_dim(pencil, axis) else {
            // Axis not split: only a periodic wrap onto ourselves.
            let me = periodic.then_some(self.rank);
            return [me, me];
        };

        let n = self.dims[d];
        let c = self.coords();
        let step = |forward: bool| -> Option<usize> {
            let pos = c[d];
            let next = match (forward, pos) {
                (false, 0) => periodic.then(|| n - 1)?,
                (false, p) => p - 1,
                (true, p) if p + 1 == n => periodic.then_some(0)?,
                (true, p) => p + 1,
            };
            let mut nc = c;
            nc[d] = next;
            Some(self.rank_at(nc))
        };
        [step(false), step(true)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_split_covers_everything_once() {
        let glsize = 10;
        let np = 4;
        let sizes: Vec<usize> = (0..np).map(|r| balanced_size(glsize, np, r)).collect();
        let offsets: Vec<usize> = (0..np).map(|r| balanced_offset(glsize, np, r)).collect();
        assert_eq!(sizes, vec![3, 3, 2, 2]);
        assert_eq!(offsets, vec![0, 3, 6, 8]);
    }

    #[test]
    fn pencil_axis_is_never_split() {
        let g = ProcessGrid::new([2, 3], [false; 3], 5).unwrap();
        assert_eq!(g.nprocs(Pencil::X, Axis::X), 1);
        assert_eq!(g.nprocs(Pencil::X, Axis::Y), 2);
        assert_eq!(g.nprocs(Pencil::X, Axis::Z), 3);
        assert_eq!(g.myrank(Pencil::X, Axis::Y), 1);
        assert_eq!(g.myrank(Pencil::X, Axis::Z), 2);
        assert_eq!(g.mysize(Pencil::X, Axis::X, 7).unwrap(), 7);
    }

    #[test]
    fn neighbours_respect_periodicity() {
        // 3 x 1 grid, pencil Y: x is split three ways.
        let open = ProcessGrid::new([3, 1], [false; 3], 0).unwrap();
        assert_eq!(open.neighbours(Pencil::Y, Axis::X), [None, Some(1)]);

        let wrap = ProcessGrid::new([3, 1], [true, false, false], 0).unwrap();
        assert_eq!(wrap.neighbours(Pencil::Y, Axis::X), [Some(2), Some(1)]);

        let last = ProcessGrid::new([3, 1], [true, false, false], 2).unwrap();
        assert_eq!(last.neighbours(Pencil::Y, Axis::X), [Some(1), Some(0)]);

        // Unsplit periodic axis wraps onto ourselves.
        assert_eq!(last.neighbours(Pencil::X, Axis::X), [None, None]);
        let self_wrap = ProcessGrid::new([3, 1], [true; 3], 2).unwrap();
        assert_eq!(self_wrap.neighbours(Pencil::X, Axis::X), [Some(2), Some(2)]);
    }

    #[test]
    fn too_few_points_is_an_error() {
        let g = ProcessGrid::new([4, 1], [false; 3], 0).unwrap();
        assert!(g.mysize(Pencil::Z, Axis::X, 3).is_err());
    }

    #[test]
    fn balanced_grid_shapes() {
        assert_eq!(ProcessGrid::balanced(6, [false; 3], 0).unwrap().dims, [2, 3]);
        assert_eq!(ProcessGrid::balanced(7, [false; 3], 0).unwrap().dims, [1, 7]);
        assert_eq!(ProcessGrid::with_dims([0, 2], 6, [false; 3], 0).unwrap().dims, [3, 2]);
        assert!(ProcessGrid::with_dims([4, 4], 6, [false; 3], 0).is_err());
    }
}
