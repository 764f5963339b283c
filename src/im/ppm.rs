use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::core::RgbIm;
use crate::error::{RenderError, Result};

// Binary PPM (P6)
// -----------------------------------------------------------------------------
impl RgbIm {
    /// Writes `P6\n{w} {h}\n255\n` followed by the packed RGB rows, top row first.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.w, self.h)?;
        for y in 0..self.h {
            let row0 = y * self.s;
            out.write_all(&self.arr[row0..row0 + self.w * 3])?;
        }
        Ok(())
    }

    pub fn save_ppm<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let io_err = |source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(io_err)?;
        let mut out = BufWriter::new(file);
        self.write_ppm(&mut out).map_err(io_err)?;
        out.flush().map_err(io_err)
    }
}
