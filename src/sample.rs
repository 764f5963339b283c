//! Synthetic scalar fields on `[-0.5, 0.5]^3` for demos and tests.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::decomp::{Axis, Decomposition, Pencil};
use crate::error::{RenderError, Result};

/// A whole field held by every rank; each rank cuts out its own block.
#[derive(Debug, Clone)]
pub struct SampleField {
    pub glsizes: [usize; 3],
    pub grids: [Vec<f64>; 3],
    /// x fastest.
    pub values: Vec<f64>,
}

/// Cell-centred uniform grid.
pub fn uniform_grid(n: usize) -> Vec<f64> {
    (0..n).map(|i| -0.5 + (2 * i + 1) as f64 / (2 * n) as f64).collect()
}

/// Chebyshev-Gauss points, clustered toward both ends.
pub fn chebyshev_grid(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| -0.5 + 0.5 * (1.0 + (PI - PI * (i as f64 + 0.5) / n as f64).cos()))
        .collect()
}

impl SampleField {
    fn from_fn(glsizes: [usize; 3], grids: [Vec<f64>; 3], f: impl Fn(f64, f64, f64) -> f64) -> Self {
        let [xs, ys, zs] = &grids;
        let mut values = Vec::with_capacity(glsizes.iter().product());
        for &z in zs {
            for &y in ys {
                for &x in xs {
                    values.push(f(x, y, z));
                }
            }
        }
        Self { glsizes, grids, values }
    }

    pub fn grid_refs(&self) -> [&[f64]; 3] {
        [&self.grids[0], &self.grids[1], &self.grids[2]]
    }

    /// This rank's block of the field under `pencil`.
    pub fn local_block(&self, decomp: &dyn Decomposition, pencil: Pencil) -> Result<Vec<f64>> {
        let mut sizes = [0; 3];
        let mut offsets = [0; 3];
        for axis in Axis::ALL {
            let a = axis.index();
            sizes[a] = decomp.mysize(pencil, axis, self.glsizes[a])?;
            offsets[a] = decomp.offset(pencil, axis, self.glsizes[a])?;
        }
        let [gx, gy, _] = self.glsizes;
        let [lx, ly, lz] = sizes;
        let mut block = Vec::with_capacity(lx * ly * lz);
        for k in 0..lz {
            for j in 0..ly {
                let s = ((k + offsets[2]) * gy + j + offsets[1]) * gx + offsets[0];
                block.extend_from_slice(&self.values[s..s + lx]);
            }
        }
        Ok(block)
    }
}

/// Sum of 64 sinusoidal modes with seeded random phases, rescaled to `[-1, 1]`.
pub fn sinusoid_field(glsizes: [usize; 3], seed: u64) -> Result<SampleField> {
    if glsizes.iter().any(|&n| n == 0) {
        return Err(RenderError::InvalidInput(format!("empty field {glsizes:?}")));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut modes = Vec::with_capacity(64);
    for kz in 1..5 {
        for ky in 1..5 {
            for kx in 1..5 {
                let yphase = 2.0 * PI * rng.random::<f64>();
                let zphase = 2.0 * PI * rng.random::<f64>();
                modes.push(([kx as f64, ky as f64, kz as f64], yphase, zphase));
            }
        }
    }

    let grids = [chebyshev_grid(glsizes[0]), uniform_grid(glsizes[1]), uniform_grid(glsizes[2])];
    let mut field = SampleField::from_fn(glsizes, grids, |x, y, z| {
        modes
            .iter()
            .map(|&([kx, ky, kz], py, pz)| {
                (2.0 * PI * kx * x).sin() * (2.0 * PI * ky * y + py).sin() * (2.0 * PI * kz * z + pz).sin()
            })
            .sum()
    });

    let lo = field.values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = field.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;
    if span > 0.0 {
        for v in field.values.iter_mut() {
            *v = (*v - lo) / span * 2.0 - 1.0;
        }
    }
    Ok(field)
}

/// Distance from the origin minus `radius`: negative inside the sphere.
pub fn sphere_field(glsizes: [usize; 3], radius: f64) -> SampleField {
    let grids = glsizes.map(uniform_grid);
    SampleField::from_fn(glsizes, grids, |x, y, z| (x * x + y * y + z * z).sqrt() - radius)
}
