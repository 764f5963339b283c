use std::path::PathBuf;

use crate::decomp::Axis;

/// Failures reported by a `Decomposition`.
#[derive(Debug, thiserror::Error)]
pub enum DecompError {
    #[error("axis {axis:?}: {glsize} points cannot be split over {nprocs} processes")]
    TooFewPoints {
        axis: Axis,
        glsize: usize,
        nprocs: usize,
    },
    #[error("rank {rank} is outside a process grid of {nprocs}")]
    RankOutOfRange { rank: usize, nprocs: usize },
    #[error("process grid {dims:?} does not match {nprocs} processes")]
    GridMismatch { dims: [usize; 2], nprocs: usize },
    #[error("axis {axis:?}: local extent {size} is narrower than the ghost width {ghost}")]
    NarrowPartition { axis: Axis, size: usize, ghost: usize },
}

/// Failures reported by a `Transport`.
#[derive(Debug, thiserror::Error)]
pub enum CommError {
    #[error("rank {peer} is not part of a group of {size}")]
    NoSuchRank { peer: usize, size: usize },
    #[error("rank {peer} hung up")]
    Disconnected { peer: usize },
    #[error("expected {expected} items from rank {peer}, received {got}")]
    SizeMismatch {
        peer: usize,
        expected: usize,
        got: usize,
    },
    #[error("unexpected message kind from rank {peer}")]
    WrongKind { peer: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("allocation of {bytes} bytes failed")]
    Alloc { bytes: usize },
    #[error("allocation size overflows: {nitems} items of {size} bytes")]
    AllocOverflow { nitems: usize, size: usize },
    #[error("decomposition: {0}")]
    Decomposition(#[from] DecompError),
    #[error("communication: {0}")]
    Comm(#[from] CommError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("tetrahedron mask {0} has no triangulation case")]
    UnreachableMask(u8),
    #[error("cube corners {tail} and {head} do not share an edge")]
    UnreachableCubeEdge { tail: usize, head: usize },
    #[error("writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[cfg(feature = "im-io")]
    #[error("encoding image: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T, E = RenderError> = std::result::Result<T, E>;
