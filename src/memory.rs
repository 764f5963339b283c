use std::cell::Cell;

use log::{debug, error, trace};

use crate::error::{RenderError, Result};

/// Accounting for the buffers one render call allocates.
///
/// Buffers are plain `Vec`s owned by whoever asked for them, so they are
/// released on every exit path by ordinary scope rules. The ledger only checks
/// sizes up front, makes the reservation fallible and reports totals when it
/// goes out of scope.
#[derive(Debug)]
pub struct Ledger {
    label: &'static str,
    buffers: Cell<usize>,
    bytes: Cell<usize>,
}

impl Ledger {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            buffers: Cell::new(0),
            bytes: Cell::new(0),
        }
    }

    /// Allocates `nitems` copies of `fill`.
    pub fn alloc<T: Clone>(&self, nitems: usize, fill: T) -> Result<Vec<T>> {
        let size = size_of::<T>();
        let bytes = nitems.checked_mul(size).ok_or_else(|| {
            error!("{}: {nitems} items of {size} bytes overflows", self.label);
            RenderError::AllocOverflow { nitems, size }
        })?;

        let mut v = Vec::new();
        v.try_reserve_exact(nitems).map_err(|_| {
            error!("{}: failed to allocate {bytes} bytes", self.label);
            RenderError::Alloc { bytes }
        })?;
        v.resize(nitems, fill);

        self.buffers.set(self.buffers.get() + 1);
        self.bytes.set(self.bytes.get() + bytes);
        trace!("{}: +{bytes} bytes", self.label);
        Ok(v)
    }

    pub fn buffers(&self) -> usize {
        self.buffers.get()
    }

    pub fn bytes(&self) -> usize {
        self.bytes.get()
    }
}

impl Drop for Ledger {
    fn drop(&mut self) {
        debug!(
            "{}: {} buffers ({} bytes) released",
            self.label,
            self.buffers.get(),
            self.bytes.get()
        );
    }
}
