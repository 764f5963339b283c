//! Depth-compositing reduction of per-rank canvases.

use log::debug;

use crate::canvas::{Canvas, Pixel, Rgb};
use crate::comm::Transport;
use crate::error::Result;
use crate::memory::Ledger;

/// Rank that ends up holding the merged canvas.
pub const ROOT: usize = 0;

/// Merges every rank's canvas into `ROOT` over a binomial tree.
///
/// Collective: every rank of `transport` must call it with a canvas of the
/// same size. At step `s` a rank `r` with `r % 2s == s` hands its canvas to
/// `r - s` and leaves; the receiver keeps its own pixel on equal depth, so the
/// lower rank wins ties. Returns the merged canvas on `ROOT`, `None` elsewhere.
pub fn reduce(transport: &dyn Transport, mut canvas: Canvas, ledger: &Ledger) -> Result<Option<Canvas>> {
    let n = transport.size();
    let me = transport.rank();
    let mut incoming: Vec<Pixel> = Vec::new();

    let mut step = 1;
    while step < n {
        if me % (2 * step) == step {
            transport.send_pixels(&canvas.arr, me - step)?;
            debug!("rank {me}: canvas sent to {} at step {step}", me - step);
            return Ok(None);
        }
        if me % (2 * step) == 0 && me + step < n {
            if incoming.is_empty() {
                incoming = ledger.alloc(canvas.arr.len(), Pixel::background(Rgb::BLACK))?;
            }
            transport.recv_pixels(me + step, &mut incoming)?;
            canvas.merge_from(&incoming);
            debug!("rank {me}: merged canvas of {} at step {step}", me + step);
        }
        step *= 2;
    }
    Ok((me == ROOT).then_some(canvas))
}
