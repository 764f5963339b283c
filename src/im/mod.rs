pub mod core;
pub use core::{Im, Lum8Im, RgbIm};

pub mod ppm;

pub mod roi;
pub use roi::ROI;

// Optional extras
// -----------------------------------------------------------------------------

#[cfg(feature = "im-io")]
pub mod io;

// Debug UI window
// -----------------------------------------------------------------------------

#[cfg(feature = "debug_ui")]
pub mod debug_ui;
