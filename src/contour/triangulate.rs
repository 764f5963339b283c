use rayon::prelude::*;

use super::tables::{CASES, EDGE_TABLE, NO_EDGE, TETRAHEDRA, TetEdge, corner_offset};
use super::{Lattice, Triangle};
use crate::error::{RenderError, Result};
use crate::mapping::CoordinateMap;
use crate::vec3::V3;

/// Endpoint values closer than this are treated as equal.
const INTERP_EPS: f64 = 1e-8;

/// Point on the segment `p0`-`p1` where the linear interpolant of `v0`-`v1`
/// equals `threshold`. Falls back to `p0` when the values are nearly equal.
#[inline]
fn interpolate(threshold: f64, p0: V3, v0: f64, p1: V3, v1: f64) -> V3 {
    if (v1 - v0).abs() < INTERP_EPS {
        p0
    } else {
        p0.lerp(p1, (threshold - v0) / (v1 - v0))
    }
}

/// Cartesian corners and scalar values of one lattice.
struct Cell {
    positions: [V3; 8],
    values: [f64; 8],
}

fn triangle_for(
    reverse: bool,
    threshold: f64,
    tet: &[usize; 4],
    edges: &[TetEdge; 3],
    cell: &Cell,
) -> Result<Triangle> {
    let order = if reverse { [2, 1, 0] } else { [0, 1, 2] };
    let mut tri = Triangle::default();
    for (slot, &e) in order.iter().enumerate() {
        let (tail, head) = edges[e];
        let (ct, ch) = (tet[tail], tet[head]);
        tri.vertices[slot] = interpolate(
            threshold,
            cell.positions[ct],
            cell.values[ct],
            cell.positions[ch],
            cell.values[ch],
        );
        let cube_edge = EDGE_TABLE[ct][ch];
        if cube_edge == NO_EDGE {
            return Err(RenderError::UnreachableCubeEdge { tail: ct, head: ch });
        }
        tri.cube_edges[slot] = cube_edge;
    }

    let [v0, v1, v2] = tri.vertices;
    let n = (v1 - v0).cross(v2 - v0);
    tri.area = n.norm();
    tri.face_normal = n.normalized_or_zero();
    Ok(tri)
}

fn triangulate_tetrahedron(tet: &[usize; 4], threshold: f64, cell: &Cell, out: &mut Lattice) -> Result<()> {
    let mut mask = 0u8;
    for (bit, &corner) in tet.iter().enumerate() {
        if cell.values[corner] > threshold {
            mask |= 1 << bit;
        }
    }
    // Complementary masks share a case with the winding flipped.
    let reverse = mask >= 8;
    if reverse {
        mask = 15 - mask;
    }
    let case = CASES.get(mask as usize).ok_or(RenderError::UnreachableMask(mask))?;
    for edges in case.iter() {
        out.push(triangle_for(reverse, threshold, tet, edges, cell)?);
    }
    Ok(())
}

/// Triangulates one lattice from its 8 corners.
pub fn triangulate_cell(positions: [V3; 8], values: [f64; 8], threshold: f64, out: &mut Lattice) -> Result<()> {
    let cell = Cell { positions, values };
    out.clear();
    for tet in &TETRAHEDRA {
        triangulate_tetrahedron(tet, threshold, &cell, out)?;
    }
    Ok(())
}

/// Triangulates every lattice between two adjacent grid planes.
///
/// `sizes` are the point counts `[nx, ny]` of a plane, `grids` the x, y and
/// the two z coordinates, `values` the `2 * nx * ny` scalars of both planes.
/// `lattices` receives `(nx - 1) * (ny - 1)` cells, x fastest. Returns the
/// number of triangles produced.
pub fn triangulate_slice(
    sizes: [usize; 2],
    grids: [&[f64]; 3],
    map: &dyn CoordinateMap,
    values: &[f64],
    threshold: f64,
    lattices: &mut [Lattice],
) -> Result<usize> {
    let [nx, ny] = sizes;
    let imax = nx.saturating_sub(1);
    if imax == 0 || ny < 2 {
        return Ok(0);
    }
    debug_assert_eq!(lattices.len(), imax * (ny - 1));
    debug_assert!(values.len() >= 2 * nx * ny);
    let [xs, ys, zs] = grids;
    let at = |i: usize, j: usize, k: usize| values[(k * ny + j) * nx + i];

    lattices
        .par_chunks_mut(imax)
        .enumerate()
        .map(|(j, row)| -> Result<usize> {
            let mut count = 0;
            for (i, lattice) in row.iter_mut().enumerate() {
                let mut positions = [V3::ZERO; 8];
                let mut corner_values = [0.0; 8];
                for c in 0..8 {
                    let [di, dj, dk] = corner_offset(c);
                    positions[c] = map.to_cartesian(V3::new(xs[i + di], ys[j + dj], zs[dk]));
                    corner_values[c] = at(i + di, j + dj, dk);
                }
                triangulate_cell(positions, corner_values, threshold, lattice)?;
                count += lattice.triangles().len();
            }
            Ok(count)
        })
        .try_reduce(|| 0, |a, b| Ok(a + b))
}
