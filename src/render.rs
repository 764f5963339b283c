//! Render entry points: every rank rasterizes its share of the scene into a
//! local canvas, the canvases are depth-composited on the coordinator, and
//! the coordinator writes the image.

use std::path::Path;

use log::{error, info};
use serde::Deserialize;

use crate::camera::{Camera, Screen, ScreenDesc};
use crate::canvas::{Canvas, Pixel, Rgb};
use crate::comm::Transport;
use crate::composite;
use crate::contour::{ContourObject, ContourStats, process_contour};
use crate::decomp::Decomposition;
use crate::error::{RenderError, Result};
use crate::line::{LineObject, draw_line};
use crate::memory::Ledger;
use crate::output;
use crate::vec3::V3;

/// Rasterizer tunables.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Barycentric weights down to this (negative) value still count as
    /// inside, so shared triangle edges leave no gaps.
    pub seam_tolerance: f64,
    /// Lowest shading factor a lit fragment gets.
    pub shading_floor: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            seam_tolerance: -1e-8,
            shading_floor: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    pub camera: Camera,
    pub screen: ScreenDesc,
    /// `[width, height]` in pixels.
    pub resolution: [usize; 2],
    /// Direction of the light; normalized by `View::new`.
    pub light: V3,
    pub background: Rgb,
    pub options: RenderOptions,
}

/// Everything the rasterizers need to know about the viewer.
#[derive(Debug, Clone, Copy)]
pub struct View {
    pub camera: V3,
    pub screen: Screen,
    /// Unit light direction.
    pub light: V3,
    pub options: RenderOptions,
}

impl View {
    pub fn new(params: &RenderParams) -> Result<Self> {
        let norm = params.light.norm();
        if !(norm > 0.0 && norm.is_finite()) {
            return Err(RenderError::InvalidInput(format!(
                "light direction {:?} cannot be normalized",
                params.light
            )));
        }
        Ok(Self {
            camera: params.camera.position,
            screen: Screen::new(&params.screen, params.resolution)?,
            light: params.light * (1.0 / norm),
            options: params.options,
        })
    }
}

/// Per-rank totals of one render call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub triangles: usize,
    pub contour_pixels: usize,
    pub line_pixels: usize,
}

fn render_local(
    decomp: &dyn Decomposition,
    transport: &dyn Transport,
    params: &RenderParams,
    contours: &[ContourObject],
    lines: &[LineObject],
    ledger: &Ledger,
) -> Result<(Canvas, RenderStats)> {
    let view = View::new(params)?;
    let [w, h] = params.resolution;
    let npix = w
        .checked_mul(h)
        .ok_or_else(|| RenderError::InvalidInput(format!("canvas {w}x{h} has too many pixels")))?;
    let pixels = ledger.alloc(npix, Pixel::background(params.background))?;
    let mut canvas = Canvas::from_vec(w, h, pixels)
        .ok_or_else(|| RenderError::InvalidInput(format!("canvas {w}x{h} does not fit its buffer")))?;

    let mut stats = RenderStats::default();
    for obj in contours {
        let ContourStats { triangles, pixels } = process_contour(decomp, transport, &view, obj, ledger, &mut canvas)?;
        stats.triangles += triangles;
        stats.contour_pixels += pixels;
    }
    for line in lines {
        stats.line_pixels += draw_line(&view, line, &mut canvas)?;
    }
    Ok((canvas, stats))
}

/// Renders the scene and composites it onto the coordinating rank.
///
/// Collective: every rank calls this with the same parameters and its own
/// partitions. Returns the merged canvas on `composite::ROOT`, `None` on every
/// other rank. On error nothing has been composited and every buffer this call
/// allocated has been released.
pub fn render_canvas(
    decomp: &dyn Decomposition,
    transport: &dyn Transport,
    params: &RenderParams,
    contours: &[ContourObject],
    lines: &[LineObject],
) -> Result<Option<Canvas>> {
    let rank = transport.rank();
    let ledger = Ledger::new("render");
    let (canvas, stats) = render_local(decomp, transport, params, contours, lines, &ledger)
        .inspect_err(|e| error!("rank {rank}: render failed: {e}"))?;
    info!(
        "rank {rank}: {} contours, {} lines, {} triangles, {} contour pixels, {} line pixels",
        contours.len(),
        lines.len(),
        stats.triangles,
        stats.contour_pixels,
        stats.line_pixels
    );
    composite::reduce(transport, canvas, &ledger).inspect_err(|e| error!("rank {rank}: compositing failed: {e}"))
}

/// `render_canvas` followed by writing the image on the coordinating rank.
pub fn render(
    decomp: &dyn Decomposition,
    transport: &dyn Transport,
    params: &RenderParams,
    contours: &[ContourObject],
    lines: &[LineObject],
    path: &Path,
) -> Result<()> {
    if let Some(canvas) = render_canvas(decomp, transport, params, contours, lines)? {
        output::write_canvas(&canvas, path).inspect_err(|e| error!("{e}"))?;
    }
    Ok(())
}
