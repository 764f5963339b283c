//! Iso-surface extraction and rendering for one scalar field.
//!
//! A contour object is processed slab by slab: the partition is extended with
//! ghost layers, each lattice layer along z is triangulated into a three-slot
//! ring, and once a layer has both neighbours its vertex normals are smoothed
//! and its triangles are rasterized.

use log::debug;

use crate::canvas::{Canvas, Rgb};
use crate::comm::Transport;
use crate::decomp::{Decomposition, Pencil};
use crate::error::{RenderError, Result};
use crate::mapping::CoordinateMap;
use crate::memory::Ledger;
use crate::render::View;
use crate::vec3::V3;

pub mod extend;
pub mod normal;
pub mod render;
pub mod tables;
pub mod triangulate;

pub use extend::{ExtendedArray, GHOST_WIDTH, GhostedArray, exchange_ghosts, extend_domain};

/// A scalar field partition to contour at one threshold.
///
/// `array` holds this rank's block, x fastest. `grids` are the global
/// rectilinear coordinates of every axis.
#[derive(Clone, Copy)]
pub struct ContourObject<'a> {
    pub pencil: Pencil,
    pub glsizes: [usize; 3],
    pub grids: [&'a [f64]; 3],
    pub map: &'a dyn CoordinateMap,
    pub threshold: f64,
    pub color: Rgb,
    pub array: &'a [f64],
}

/// Six tetrahedra with at most two triangles each.
pub const MAX_TRIANGLES: usize = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Triangle {
    pub vertices: [V3; 3],
    pub face_normal: V3,
    /// Length of the unnormalized face normal; the smoothing weight.
    pub area: f64,
    /// Zero until smoothed.
    pub vertex_normals: [V3; 3],
    /// Cube edge (see `tables`) each vertex lies on.
    pub cube_edges: [u8; 3],
}

/// Triangles of one lattice cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lattice {
    len: u8,
    triangles: [Triangle; MAX_TRIANGLES],
}

impl Lattice {
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles[..self.len as usize]
    }

    #[inline]
    pub fn triangles_mut(&mut self) -> &mut [Triangle] {
        &mut self.triangles[..self.len as usize]
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn push(&mut self, tri: Triangle) {
        debug_assert!((self.len as usize) < MAX_TRIANGLES);
        self.triangles[self.len as usize] = tri;
        self.len += 1;
    }
}

// Slice ring
// -----------------------------------------------------------------------------

/// Three triangulated lattice layers, layer `z` living in slot `z % 3`.
pub struct SliceRing {
    slots: [Vec<Lattice>; 3],
}

impl SliceRing {
    pub fn new(ledger: &Ledger, lattices_per_slice: usize) -> Result<Self> {
        Ok(Self {
            slots: [
                ledger.alloc(lattices_per_slice, Lattice::default())?,
                ledger.alloc(lattices_per_slice, Lattice::default())?,
                ledger.alloc(lattices_per_slice, Lattice::default())?,
            ],
        })
    }

    pub fn slot_mut(&mut self, z: usize) -> &mut [Lattice] {
        &mut self.slots[z % 3]
    }

    /// Layers `mid - 1`, `mid` and `mid + 1`, the middle one mutable.
    pub fn around(&mut self, mid: usize) -> (&[Lattice], &mut [Lattice], &[Lattice]) {
        let [s0, s1, s2] = &mut self.slots;
        match mid % 3 {
            0 => (&s2[..], &mut s0[..], &s1[..]),
            1 => (&s0[..], &mut s1[..], &s2[..]),
            _ => (&s1[..], &mut s2[..], &s0[..]),
        }
    }
}

// Driver
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContourStats {
    pub triangles: usize,
    pub pixels: usize,
}

fn check_object(obj: &ContourObject) -> Result<()> {
    for (axis, (grid, &n)) in obj.grids.iter().zip(&obj.glsizes).enumerate() {
        if grid.len() != n {
            return Err(RenderError::InvalidInput(format!(
                "grid {axis} has {} points, expected {n}",
                grid.len()
            )));
        }
    }
    Ok(())
}

/// Extends, triangulates, smooths and rasterizes one contour object into `canvas`.
pub fn process_contour(
    decomp: &dyn Decomposition,
    transport: &dyn Transport,
    view: &View,
    obj: &ContourObject,
    ledger: &Ledger,
    canvas: &mut Canvas,
) -> Result<ContourStats> {
    process_contour_inspect(decomp, transport, view, obj, ledger, canvas, |_, _| {})
}

/// `process_contour`, handing every freshly triangulated layer (extended `z`,
/// lattices x fastest) to `inspect`.
fn process_contour_inspect(
    decomp: &dyn Decomposition,
    transport: &dyn Transport,
    view: &View,
    obj: &ContourObject,
    ledger: &Ledger,
    canvas: &mut Canvas,
    mut inspect: impl FnMut(usize, &[Lattice]),
) -> Result<ContourStats> {
    check_object(obj)?;
    let ext = extend_domain(decomp, transport, obj.pencil, obj.glsizes, obj.array, ledger)?;

    let [nx, ny, nz] = ext.sizes;
    let mut stats = ContourStats::default();
    if nx < 2 || ny < 2 || nz < 2 {
        return Ok(stats);
    }

    let imax = nx - 1;
    let jmax = ny - 1;
    let layers = nz - 1;
    let plane = nx * ny;
    let [ox, oy, oz] = ext.offsets;
    let xs = &obj.grids[0][ox..ox + nx];
    let ys = &obj.grids[1][oy..oy + ny];

    let mut ring = SliceRing::new(ledger, imax * jmax)?;

    for z in 0..layers {
        let values = &ext.data[z * plane..(z + 2) * plane];
        let zs = &obj.grids[2][oz + z..oz + z + 2];
        stats.triangles += triangulate::triangulate_slice(
            [nx, ny],
            [xs, ys, zs],
            obj.map,
            values,
            obj.threshold,
            ring.slot_mut(z),
        )?;
        inspect(z, ring.slot_mut(z));

        if z < 2 {
            continue;
        }
        let (below, middle, above) = ring.around(z - 1);
        normal::smooth_slice([nx, ny], below, middle, above);

        for j in 1..jmax.saturating_sub(1) {
            for i in 1..imax.saturating_sub(1) {
                for tri in middle[j * imax + i].triangles() {
                    stats.pixels += render::draw_triangle(view, obj.color, tri, canvas);
                }
            }
        }
    }

    debug!(
        "contour {:+.3}: extended {:?} at {:?}, {} triangles, {} pixels written",
        obj.threshold, ext.sizes, ext.offsets, stats.triangles, stats.pixels
    );
    Ok(stats)
}
