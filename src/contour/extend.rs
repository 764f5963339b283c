use log::trace;

use crate::comm::Transport;
use crate::decomp::{Axis, Decomposition, Pencil};
use crate::error::{DecompError, RenderError, Result};
use crate::memory::Ledger;

/// Ghost layers added on each side of every axis.
pub const GHOST_WIDTH: usize = 2;

/// A partition with a full ghost shell on every side, as exchanged.
///
/// Ghosts facing a non-periodic domain edge are left at zero. On periodic
/// axes they hold the wrapped values from the opposite end of the domain.
#[derive(Debug, Clone)]
pub struct GhostedArray {
    /// `local_sizes + 2 * GHOST_WIDTH`.
    pub sizes: [usize; 3],
    pub local_sizes: [usize; 3],
    /// Global index of the first interior point.
    pub offsets: [usize; 3],
    pub data: Vec<f64>,
}

impl GhostedArray {
    /// Value at interior-relative position `(i, j, k)`; the ghosts sit at
    /// `-GHOST_WIDTH..0` and `local..local + GHOST_WIDTH`.
    pub fn at(&self, i: isize, j: isize, k: isize) -> f64 {
        let g = GHOST_WIDTH as isize;
        let [nx, ny, _] = self.sizes;
        let idx = ((k + g) as usize * ny + (j + g) as usize) * nx + (i + g) as usize;
        self.data[idx]
    }
}

/// A partition extended by the ghost layers that lie inside the global domain.
#[derive(Debug, Clone)]
pub struct ExtendedArray {
    pub sizes: [usize; 3],
    /// Global index of the first point.
    pub offsets: [usize; 3],
    /// `[negative, positive]` ghost layer dropped at a global domain edge.
    pub clipped: [[bool; 2]; 3],
    pub data: Vec<f64>,
}

/// Flat indices of a `width`-thick slab starting at `start` along `axis`,
/// spanning the full extent of the other two axes. x fastest.
fn slab_indices(sizes: [usize; 3], axis: Axis, start: usize, width: usize) -> impl Iterator<Item = usize> {
    let a = axis.index();
    let mut lo = [0; 3];
    let mut hi = sizes;
    lo[a] = start;
    hi[a] = start + width;
    let [nx, ny, _] = sizes;
    (lo[2]..hi[2]).flat_map(move |k| {
        (lo[1]..hi[1]).flat_map(move |j| (lo[0]..hi[0]).map(move |i| (k * ny + j) * nx + i))
    })
}

fn pack(data: &[f64], sizes: [usize; 3], axis: Axis, start: usize, out: &mut [f64]) {
    for (dst, src) in out.iter_mut().zip(slab_indices(sizes, axis, start, GHOST_WIDTH)) {
        *dst = data[src];
    }
}

fn unpack(data: &mut [f64], sizes: [usize; 3], axis: Axis, start: usize, slab: &[f64]) {
    for (src, dst) in slab.iter().zip(slab_indices(sizes, axis, start, GHOST_WIDTH)) {
        data[dst] = *src;
    }
}

/// Copies a `[nx, ny, nz]` box at `from` in `src` to the origin of `dst`.
fn copy_box(src: &[f64], src_sizes: [usize; 3], from: [usize; 3], dst: &mut [f64], dst_sizes: [usize; 3]) {
    let [nx, ny, nz] = dst_sizes;
    let [sx, sy, _] = src_sizes;
    for k in 0..nz {
        for j in 0..ny {
            let s = ((k + from[2]) * sy + j + from[1]) * sx + from[0];
            let d = (k * ny + j) * nx;
            dst[d..d + nx].copy_from_slice(&src[s..s + nx]);
        }
    }
}

/// Fills the ghost shell of this rank's block from its axis neighbours.
///
/// Every rank must call this with the same `pencil` and `glsizes`. Axes are
/// exchanged x, then y, then z, each slab spanning the ghosted extent of the
/// other two, so edge and corner ghosts arrive by the end of the z pass.
pub fn exchange_ghosts(
    decomp: &dyn Decomposition,
    transport: &dyn Transport,
    pencil: Pencil,
    glsizes: [usize; 3],
    array: &[f64],
    ledger: &Ledger,
) -> Result<GhostedArray> {
    let g = GHOST_WIDTH;
    let mut local_sizes = [0; 3];
    let mut offsets = [0; 3];
    for axis in Axis::ALL {
        let a = axis.index();
        local_sizes[a] = decomp.mysize(pencil, axis, glsizes[a])?;
        offsets[a] = decomp.offset(pencil, axis, glsizes[a])?;
        if local_sizes[a] < g {
            return Err(DecompError::NarrowPartition {
                axis,
                size: local_sizes[a],
                ghost: g,
            }
            .into());
        }
    }
    let expected: usize = local_sizes.iter().product();
    if array.len() != expected {
        return Err(RenderError::InvalidInput(format!(
            "local array has {} values, partition {local_sizes:?} needs {expected}",
            array.len()
        )));
    }

    let sizes = local_sizes.map(|n| n + 2 * g);
    let mut data = ledger.alloc(sizes.iter().product(), 0.0)?;
    {
        let [lx, ly, lz] = local_sizes;
        let [nx, ny, _] = sizes;
        for k in 0..lz {
            for j in 0..ly {
                let s = (k * ly + j) * lx;
                let d = ((k + g) * ny + j + g) * nx + g;
                data[d..d + lx].copy_from_slice(&array[s..s + lx]);
            }
        }
    }

    for axis in Axis::ALL {
        let a = axis.index();
        let n = sizes[a];
        let [neg, pos] = decomp.neighbours(pencil, axis);
        let slab_len = g * sizes.iter().product::<usize>() / n;
        let mut send = ledger.alloc(slab_len, 0.0)?;
        let mut recv = ledger.alloc(slab_len, 0.0)?;

        // Last interior layers go up, the negative ghosts come from below.
        pack(&data, sizes, axis, n - 2 * g, &mut send);
        transport.sendrecv(&send, pos, &mut recv, neg)?;
        if neg.is_some() {
            unpack(&mut data, sizes, axis, 0, &recv);
        }

        // First interior layers go down, the positive ghosts come from above.
        pack(&data, sizes, axis, g, &mut send);
        transport.sendrecv(&send, neg, &mut recv, pos)?;
        if pos.is_some() {
            unpack(&mut data, sizes, axis, n - g, &recv);
        }
        trace!(
            "rank {}: {axis:?} ghosts exchanged, neighbours {neg:?} / {pos:?}",
            transport.rank()
        );
    }

    Ok(GhostedArray {
        sizes,
        local_sizes,
        offsets,
        data,
    })
}

/// Ghost exchange followed by clipping at the global domain edges.
///
/// A rank first along an axis drops its negative ghost layer, a rank last
/// along an axis drops its positive one. An unsplit axis is both first and
/// last, so only ranks in the interior of the process grid keep ghosts.
pub fn extend_domain(
    decomp: &dyn Decomposition,
    transport: &dyn Transport,
    pencil: Pencil,
    glsizes: [usize; 3],
    array: &[f64],
    ledger: &Ledger,
) -> Result<ExtendedArray> {
    let g = GHOST_WIDTH;
    let ghosted = exchange_ghosts(decomp, transport, pencil, glsizes, array, ledger)?;

    let mut sizes = ghosted.sizes;
    let mut offsets = ghosted.offsets;
    let mut start = [0; 3];
    let mut clipped = [[false; 2]; 3];
    for axis in Axis::ALL {
        let a = axis.index();
        let me = decomp.myrank(pencil, axis);
        let last = decomp.nprocs(pencil, axis) - 1;
        if me == 0 {
            clipped[a][0] = true;
            sizes[a] -= g;
            start[a] = g;
        } else {
            offsets[a] -= g;
        }
        if me == last {
            clipped[a][1] = true;
            sizes[a] -= g;
        }
    }

    let mut data = ledger.alloc(sizes.iter().product(), 0.0)?;
    copy_box(&ghosted.data, ghosted.sizes, start, &mut data, sizes);
    Ok(ExtendedArray {
        sizes,
        offsets,
        clipped,
        data,
    })
}
