//! Message passing between the ranks of one render.
//!
//! The renderer needs two things from its transport: pairwise slab exchange
//! for the ghost layers, and point-to-point canvas transfer for the depth
//! reduction. Everything else (collectives, topology) is built on top.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::canvas::Pixel;
use crate::error::CommError;

pub mod local;
pub use local::{LocalGroup, LocalTransport};

pub trait Transport {
    fn rank(&self) -> usize;
    fn size(&self) -> usize;

    /// Sends `send` to `dest` and fills `recv` from `source`. Either side may
    /// be absent. Sends never block on the matching receive.
    fn sendrecv(
        &self,
        send: &[f64],
        dest: Option<usize>,
        recv: &mut [f64],
        source: Option<usize>,
    ) -> Result<(), CommError>;

    fn send_pixels(&self, pixels: &[Pixel], dest: usize) -> Result<(), CommError>;

    /// Blocks until `out.len()` pixels arrive from `source`.
    fn recv_pixels(&self, source: usize, out: &mut [Pixel]) -> Result<(), CommError>;
}

#[derive(Debug, Clone)]
pub(crate) enum Packet {
    Scalars(Vec<f64>),
    Pixels(Vec<Pixel>),
}

pub(crate) fn unpack_scalars(packet: Packet, peer: usize, out: &mut [f64]) -> Result<(), CommError> {
    match packet {
        Packet::Scalars(v) if v.len() == out.len() => {
            out.copy_from_slice(&v);
            Ok(())
        }
        Packet::Scalars(v) => Err(CommError::SizeMismatch {
            peer,
            expected: out.len(),
            got: v.len(),
        }),
        Packet::Pixels(_) => Err(CommError::WrongKind { peer }),
    }
}

pub(crate) fn unpack_pixels(packet: Packet, peer: usize, out: &mut [Pixel]) -> Result<(), CommError> {
    match packet {
        Packet::Pixels(v) if v.len() == out.len() => {
            out.copy_from_slice(&v);
            Ok(())
        }
        Packet::Pixels(v) => Err(CommError::SizeMismatch {
            peer,
            expected: out.len(),
            got: v.len(),
        }),
        Packet::Scalars(_) => Err(CommError::WrongKind { peer }),
    }
}

// Single process
// -----------------------------------------------------------------------------

/// A group of one. Messages to self (periodic wrap on an unsplit axis) go
/// through a local mailbox.
#[derive(Debug, Default)]
pub struct SingleProcess {
    mailbox: RefCell<VecDeque<Packet>>,
}

impl SingleProcess {
    pub fn new() -> Self {
        Self::default()
    }

    fn check(peer: usize) -> Result<(), CommError> {
        if peer == 0 {
            Ok(())
        } else {
            Err(CommError::NoSuchRank { peer, size: 1 })
        }
    }

    fn pop(&self) -> Result<Packet, CommError> {
        // Nobody else can ever post, so an empty mailbox would block forever.
        self.mailbox
            .borrow_mut()
            .pop_front()
            .ok_or(CommError::Disconnected { peer: 0 })
    }
}

impl Transport for SingleProcess {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn sendrecv(
        &self,
        send: &[f64],
        dest: Option<usize>,
        recv: &mut [f64],
        source: Option<usize>,
    ) -> Result<(), CommError> {
        if let Some(dest) = dest {
            Self::check(dest)?;
            self.mailbox.borrow_mut().push_back(Packet::Scalars(send.to_vec()));
        }
        if let Some(source) = source {
            Self::check(source)?;
            unpack_scalars(self.pop()?, source, recv)?;
        }
        Ok(())
    }

    fn send_pixels(&self, pixels: &[Pixel], dest: usize) -> Result<(), CommError> {
        Self::check(dest)?;
        self.mailbox.borrow_mut().push_back(Packet::Pixels(pixels.to_vec()));
        Ok(())
    }

    fn recv_pixels(&self, source: usize, out: &mut [Pixel]) -> Result<(), CommError> {
        Self::check(source)?;
        unpack_pixels(self.pop()?, source, out)
    }
}
