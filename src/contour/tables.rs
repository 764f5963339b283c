//! Static tables for marching tetrahedra and vertex-normal smoothing.
//!
//! # Cube topology
//!
//! ```text
//!   lower floor (z=0) | upper floor (z=1)
//!       2───3         |     6───7
//!       │   │         |     │   │
//!       0───1         |     4───5
//!
//! corner bits: bit 0 = +x, bit 1 = +y, bit 2 = +z
//! ```
//!
//! # Cube edges
//!
//! Every tetrahedron edge lies on one of 19 cube edges:
//!
//! ```text
//!  0..=3   x edges  [0,1] [2,3] [4,5] [6,7]
//!  4..=7   y edges  [0,2] [1,3] [4,6] [5,7]
//!  8..=11  z edges  [0,4] [1,5] [2,6] [3,7]
//! 12..=13  x-face diagonals  [0,6] (x=0)  [1,7] (x=1)
//! 14..=15  y-face diagonals  [0,5] (y=0)  [2,7] (y=1)
//! 16..=17  z-face diagonals  [0,3] (z=0)  [4,7] (z=1)
//! 18       body diagonal     [0,7]
//! ```
//!
//! Every lattice is split along the same body diagonal, so a face diagonal is
//! shared with exactly one neighbouring lattice.

/// Number of distinct cube edges.
pub const NUM_CUBE_EDGES: usize = 19;

/// Marker for corner pairs that are not joined by any tetrahedron edge.
pub const NO_EDGE: u8 = u8::MAX;

const N: u8 = NO_EDGE;

/// `EDGE_TABLE[tail][head]`: cube edge joining two cube corners.
#[rustfmt::skip]
pub static EDGE_TABLE: [[u8; 8]; 8] = [
    [ N,  0,  4, 16,  8, 14, 12, 18],
    [ 0,  N,  N,  5,  N,  9,  N, 13],
    [ 4,  N,  N,  1,  N,  N, 10, 15],
    [16,  5,  1,  N,  N,  N,  N, 11],
    [ 8,  N,  N,  N,  N,  2,  6, 17],
    [14,  9,  N,  N,  2,  N,  N,  7],
    [12,  N, 10,  N,  6,  N,  N,  3],
    [18, 13, 15, 11, 17,  7,  3,  N],
];

/// Cube corners of the six tetrahedra, all sharing the 0-7 body diagonal.
pub static TETRAHEDRA: [[usize; 4]; 6] = [
    [0, 7, 3, 1],
    [0, 7, 1, 5],
    [0, 7, 5, 4],
    [0, 7, 4, 6],
    [0, 7, 6, 2],
    [0, 7, 2, 3],
];

/// One tetrahedron edge, as `(tail, head)` tetrahedron-local corner indices.
pub type TetEdge = (usize, usize);

/// Triangles for each reduced 4-bit mask (`1..=7`), as three tetrahedron edges
/// each. Winding makes the normal point away from the set corners; the caller
/// reverses it when the mask was complemented.
#[rustfmt::skip]
pub static CASES: [&[[TetEdge; 3]]; 8] = [
    &[],
    &[[(0, 1), (0, 3), (0, 2)]],
    &[[(1, 0), (1, 2), (1, 3)]],
    &[[(0, 2), (1, 3), (0, 3)], [(0, 2), (1, 2), (1, 3)]],
    &[[(2, 0), (2, 3), (2, 1)]],
    &[[(2, 1), (0, 3), (2, 3)], [(2, 1), (0, 1), (0, 3)]],
    &[[(0, 2), (2, 3), (1, 3)], [(0, 2), (1, 3), (0, 1)]],
    &[[(3, 0), (3, 2), (3, 1)]],
];

/// A lattice sharing a cube edge: `(dz, dj, di, edge in that lattice)`.
/// `dz` is relative to the middle of three slices.
pub type Neighbour = (isize, isize, isize, u8);

/// `NEIGHBOURS[e]`: every lattice (the current one included) whose triangles
/// may have a vertex on cube edge `e` of the current lattice.
#[rustfmt::skip]
pub static NEIGHBOURS: [&[Neighbour]; NUM_CUBE_EDGES] = [
    // x edges
    &[(-1, -1,  0,  3), (-1,  0,  0,  2), ( 0, -1,  0,  1), ( 0,  0,  0,  0)],
    &[(-1,  0,  0,  3), (-1,  1,  0,  2), ( 0,  0,  0,  1), ( 0,  1,  0,  0)],
    &[( 0, -1,  0,  3), ( 0,  0,  0,  2), ( 1, -1,  0,  1), ( 1,  0,  0,  0)],
    &[( 0,  0,  0,  3), ( 0,  1,  0,  2), ( 1,  0,  0,  1), ( 1,  1,  0,  0)],
    // y edges
    &[(-1,  0, -1,  7), (-1,  0,  0,  6), ( 0,  0, -1,  5), ( 0,  0,  0,  4)],
    &[(-1,  0,  0,  7), (-1,  0,  1,  6), ( 0,  0,  0,  5), ( 0,  0,  1,  4)],
    &[( 0,  0, -1,  7), ( 0,  0,  0,  6), ( 1,  0, -1,  5), ( 1,  0,  0,  4)],
    &[( 0,  0,  0,  7), ( 0,  0,  1,  6), ( 1,  0,  0,  5), ( 1,  0,  1,  4)],
    // z edges
    &[( 0, -1, -1, 11), ( 0, -1,  0, 10), ( 0,  0, -1,  9), ( 0,  0,  0,  8)],
    &[( 0, -1,  0, 11), ( 0, -1,  1, 10), ( 0,  0,  0,  9), ( 0,  0,  1,  8)],
    &[( 0,  0, -1, 11), ( 0,  0,  0, 10), ( 0,  1, -1,  9), ( 0,  1,  0,  8)],
    &[( 0,  0,  0, 11), ( 0,  0,  1, 10), ( 0,  1,  0,  9), ( 0,  1,  1,  8)],
    // face diagonals
    &[( 0,  0, -1, 13), ( 0,  0,  0, 12)],
    &[( 0,  0,  0, 13), ( 0,  0,  1, 12)],
    &[( 0, -1,  0, 15), ( 0,  0,  0, 14)],
    &[( 0,  0,  0, 15), ( 0,  1,  0, 14)],
    &[(-1,  0,  0, 17), ( 0,  0,  0, 16)],
    &[( 0,  0,  0, 17), ( 1,  0,  0, 16)],
    // body diagonal
    &[( 0,  0,  0, 18)],
];

/// Integer position of a cube corner inside its lattice.
#[inline]
pub fn corner_offset(corner: usize) -> [usize; 3] {
    [corner & 1, (corner >> 1) & 1, (corner >> 2) & 1]
}
