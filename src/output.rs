//! Image emission for a finished canvas.

use std::path::Path;

use log::info;

use crate::canvas::Canvas;
use crate::error::Result;
use crate::im::RgbIm;
#[cfg(feature = "im-io")]
use crate::im::Lum8Im;

fn is_png(path: &Path) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

/// Writes the color plane of `canvas`: PNG when the path ends in `.png` (and
/// the `im-io` feature is on), binary PPM otherwise.
pub fn write_canvas(canvas: &Canvas, path: &Path) -> Result<()> {
    let im = RgbIm::from_canvas(canvas);
    if is_png(path) {
        #[cfg(feature = "im-io")]
        {
            im.save_png(path)?;
            info!("wrote {}x{} PNG to {}", im.w, im.h, path.display());
            return Ok(());
        }
        #[cfg(not(feature = "im-io"))]
        log::warn!("built without im-io, writing PPM data to {}", path.display());
    }
    im.save_ppm(path)?;
    info!("wrote {}x{} PPM to {}", im.w, im.h, path.display());
    Ok(())
}

/// Writes the depth plane of `canvas` as a gray PNG.
#[cfg(feature = "im-io")]
pub fn write_depth_png(canvas: &Canvas, path: &Path) -> Result<()> {
    Lum8Im::depth_from_canvas(canvas).save_png(path)?;
    info!("wrote depth view to {}", path.display());
    Ok(())
}
