use isoraster::comm::{LocalGroup, Transport};
use isoraster::contour::{GHOST_WIDTH, exchange_ghosts, extend_domain};
use isoraster::decomp::{Axis, Decomposition, Pencil, ProcessGrid};
use isoraster::memory::Ledger;

const GLSIZES: [usize; 3] = [9, 8, 10];

/// Smooth analytic field, distinct at every grid point.
fn global_value(i: usize, j: usize, k: usize) -> f64 {
    (0.3 * i as f64).sin() + 10.0 * (0.2 * j as f64).cos() + 100.0 * k as f64
}

fn local_block(grid: &ProcessGrid, pencil: Pencil) -> (Vec<f64>, [usize; 3], [usize; 3]) {
    let mut sizes = [0; 3];
    let mut offsets = [0; 3];
    for axis in Axis::ALL {
        let a = axis.index();
        sizes[a] = grid.mysize(pencil, axis, GLSIZES[a]).unwrap();
        offsets[a] = grid.offset(pencil, axis, GLSIZES[a]).unwrap();
    }
    let mut block = Vec::new();
    for k in 0..sizes[2] {
        for j in 0..sizes[1] {
            for i in 0..sizes[0] {
                block.push(global_value(i + offsets[0], j + offsets[1], k + offsets[2]));
            }
        }
    }
    (block, sizes, offsets)
}

/// Splits one axis over `n` ranks and checks every ghost against the wrapped
/// global field.
fn check_periodic_split(n: usize, pencil: Pencil, dims: [usize; 2]) {
    let failures = LocalGroup::run(n, |t| {
        let grid = ProcessGrid::new(dims, [true; 3], t.rank()).unwrap();
        let (block, sizes, offsets) = local_block(&grid, pencil);
        let ledger = Ledger::new("ghost test");
        let gh = exchange_ghosts(&grid, &t, pencil, GLSIZES, &block, &ledger).unwrap();
        assert_eq!(gh.local_sizes, sizes);

        let g = GHOST_WIDTH as isize;
        let wrap = |v: isize, a: usize| v.rem_euclid(GLSIZES[a] as isize) as usize;
        let mut bad = 0;
        for k in -g..sizes[2] as isize + g {
            for j in -g..sizes[1] as isize + g {
                for i in -g..sizes[0] as isize + g {
                    let want = global_value(
                        wrap(i + offsets[0] as isize, 0),
                        wrap(j + offsets[1] as isize, 1),
                        wrap(k + offsets[2] as isize, 2),
                    );
                    if gh.at(i, j, k) != want {
                        bad += 1;
                    }
                }
            }
        }
        bad
    });
    assert!(
        failures.iter().all(|&b| b == 0),
        "n={n} pencil={pencil:?} dims={dims:?}: mismatches per rank {failures:?}"
    );
}

#[test]
fn periodic_ghosts_wrap_for_every_split_axis() {
    for n in [2, 3, 4] {
        for pencil in [Pencil::X, Pencil::Y, Pencil::Z] {
            check_periodic_split(n, pencil, [n, 1]);
            check_periodic_split(n, pencil, [1, n]);
        }
    }
}

#[test]
fn periodic_ghosts_wrap_on_a_two_by_two_grid() {
    check_periodic_split(4, Pencil::X, [2, 2]);
    check_periodic_split(4, Pencil::Z, [2, 2]);
}

#[test]
fn extended_blocks_clip_only_at_global_edges() {
    let n = 3;
    let results = LocalGroup::run(n, |t| {
        let grid = ProcessGrid::new([1, n], [true; 3], t.rank()).unwrap();
        let (block, _, _) = local_block(&grid, Pencil::X);
        let ledger = Ledger::new("extend test");
        extend_domain(&grid, &t, Pencil::X, GLSIZES, &block, &ledger).unwrap()
    });

    // Z is split 4, 3, 3.
    let clipped: Vec<[bool; 2]> = results.iter().map(|e| e.clipped[2]).collect();
    assert_eq!(clipped, vec![[true, false], [false, false], [false, true]]);
    let z_ranges: Vec<(usize, usize)> = results.iter().map(|e| (e.offsets[2], e.sizes[2])).collect();
    assert_eq!(z_ranges, vec![(0, 6), (2, 7), (5, 5)]);

    for ext in &results {
        // Unsplit axes are clipped back to the whole domain.
        assert_eq!(&ext.sizes[..2], &GLSIZES[..2]);
        let [nx, ny, _] = ext.sizes;
        for k in 0..ext.sizes[2] {
            for j in 0..ny {
                for i in 0..nx {
                    let got = ext.data[(k * ny + j) * nx + i];
                    assert_eq!(got, global_value(i, j, k + ext.offsets[2]));
                }
            }
        }
    }
}
