use super::tables::NEIGHBOURS;
use super::{Lattice, MAX_TRIANGLES};
use crate::vec3::V3;

/// Area-weighted face normals of every triangle that has a vertex on `edge`
/// of lattice `(i, j)` of the middle slice.
fn vertex_normal(slices: &[&[Lattice]; 3], imax: usize, i: usize, j: usize, edge: u8) -> V3 {
    let mut sum = V3::ZERO;
    for &(dz, dj, di, other) in NEIGHBOURS[edge as usize] {
        let slice = slices[(dz + 1) as usize];
        let idx = (j as isize + dj) as usize * imax + (i as isize + di) as usize;
        for t in slice[idx].triangles() {
            if t.cube_edges.contains(&other) {
                sum += t.face_normal * t.area;
            }
        }
    }
    sum.normalized_or_zero()
}

/// Sets the vertex normals of every interior lattice in `middle`.
///
/// `sizes` are the grid points `[nx, ny]` of a plane; each slice holds
/// `(nx - 1) * (ny - 1)` lattices. Lattices on the rim of the slice have
/// incomplete neighbourhoods and are left untouched.
pub fn smooth_slice(sizes: [usize; 2], below: &[Lattice], middle: &mut [Lattice], above: &[Lattice]) {
    let imax = sizes[0].saturating_sub(1);
    let jmax = sizes[1].saturating_sub(1);
    for j in 1..jmax.saturating_sub(1) {
        for i in 1..imax.saturating_sub(1) {
            let idx = j * imax + i;
            // Neighbours in the middle slice are read while this lattice is
            // written, so collect first.
            let mut normals = [[V3::ZERO; 3]; MAX_TRIANGLES];
            {
                let slices = [below, &*middle, above];
                for (n, tri) in middle[idx].triangles().iter().enumerate() {
                    for (m, &edge) in tri.cube_edges.iter().enumerate() {
                        normals[n][m] = vertex_normal(&slices, imax, i, j, edge);
                    }
                }
            }
            for (tri, n) in middle[idx].triangles_mut().iter_mut().zip(normals) {
                tri.vertex_normals = n;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::triangulate::triangulate_slice;
    use crate::mapping::Identity;
    use crate::test_helpers::sphere_block;

    const N: usize = 12;
    const RADIUS: f64 = 0.3;

    fn smoothed_middle(mid: usize) -> Vec<Lattice> {
        let (grid, values) = sphere_block(N, RADIUS);
        let plane = N * N;
        let per_slice = (N - 1) * (N - 1);
        let mut slices: Vec<Vec<Lattice>> = Vec::new();
        for z in mid - 1..=mid + 1 {
            let mut lattices = vec![Lattice::default(); per_slice];
            triangulate_slice(
                [N, N],
                [&grid[..], &grid[..], &grid[z..z + 2]],
                &Identity,
                &values[z * plane..(z + 2) * plane],
                0.0,
                &mut lattices,
            )
            .unwrap();
            slices.push(lattices);
        }
        let above = slices.pop().unwrap();
        let mut middle = slices.pop().unwrap();
        let below = slices.pop().unwrap();
        smooth_slice([N, N], &below, &mut middle, &above);
        middle
    }

    #[test]
    fn interior_vertex_normals_are_unit_and_point_inward() {
        let mid = N / 2 - 1;
        let middle = smoothed_middle(mid);
        let imax = N - 1;
        let mut checked = 0;
        for j in 1..imax - 1 {
            for i in 1..imax - 1 {
                for tri in middle[j * imax + i].triangles() {
                    for (v, n) in tri.vertices.iter().zip(tri.vertex_normals) {
                        assert!((n.norm() - 1.0).abs() < 1e-6, "lattice ({i},{j}): {n:?}");
                        // The field grows outward, so normals face the centre.
                        assert!(n.dot(-v.normalized()) > 0.5, "lattice ({i},{j}): {n:?} at {v:?}");
                        checked += 1;
                    }
                }
            }
        }
        assert!(checked > 0);
    }

    #[test]
    fn rim_lattices_are_left_alone() {
        let middle = smoothed_middle(N / 2 - 1);
        let imax = N - 1;
        for idx in (0..imax).chain((0..imax).map(|j| j * imax)) {
            for tri in middle[idx].triangles() {
                assert_eq!(tri.vertex_normals, [V3::ZERO; 3]);
            }
        }
    }
}
