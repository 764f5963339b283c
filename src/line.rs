//! Depth-tested thick line segments, used for domain edges and guides.

use crate::canvas::{Canvas, Rgb};
use crate::error::{RenderError, Result};
use crate::im::ROI;
use crate::mapping::CoordinateMap;
use crate::project::project;
use crate::render::View;
use crate::vec3::V3;

/// A straight line in logical coordinates, drawn as `nitems - 1` segments so
/// that curvilinear maps bend it.
#[derive(Clone, Copy)]
pub struct LineObject<'a> {
    pub endpoints: [V3; 2],
    pub nitems: usize,
    pub map: &'a dyn CoordinateMap,
    pub color: Rgb,
    /// Full width in pixels.
    pub width: f64,
}

/// A projected endpoint in pixel units.
#[derive(Debug, Clone, Copy)]
struct PixelPoint {
    x: f64,
    y: f64,
    depth: f64,
}

fn to_pixels(view: &View, map: &dyn CoordinateMap, logical: V3, w: f64, h: f64) -> Option<PixelPoint> {
    let p = project(view.camera, &view.screen, map.to_cartesian(logical))?;
    Some(PixelPoint {
        x: (0.5 + p.x) * w,
        y: (0.5 + p.y) * h,
        depth: p.depth,
    })
}

fn draw_segment(p0: PixelPoint, p1: PixelPoint, color: Rgb, width: f64, canvas: &mut Canvas) -> usize {
    // Line through both points: a x + b y + c = 0.
    let a = p1.y - p0.y;
    let b = p0.x - p1.x;
    let c = (p1.x - p0.x) * p0.y - (p1.y - p0.y) * p0.x;
    let len_sq = a * a + b * b;
    if len_sq == 0.0 {
        return 0;
    }

    let lo = [p0.x.min(p1.x), p0.y.min(p1.y)];
    let hi = [p0.x.max(p1.x), p0.y.max(p1.y)];
    let Some(roi) = ROI::covering(lo, hi, 1.0, canvas.w, canvas.h) else {
        return 0;
    };

    let half_sq = (0.5 * width).powi(2);
    let mut written = 0;
    for j in roi.t..roi.b {
        let y = j as f64;
        for i in roi.l..roi.r {
            let x = i as f64;
            if (a * x + b * y + c).powi(2) / len_sq > half_sq {
                continue;
            }
            let t = (-((p1.x - p0.x) * (p0.x - x) + (p1.y - p0.y) * (p0.y - y)) / len_sq).clamp(0.0, 1.0);
            let depth = 1.0 / (t / p1.depth + (1.0 - t) / p0.depth);
            if let Some(px) = canvas.get_mut(i, j)
                && px.write_if_nearer(depth, color)
            {
                written += 1;
            }
        }
    }
    written
}

/// Draws `line` into `canvas`. Segments with an endpoint that does not
/// project are skipped. Returns the number of pixels written.
pub fn draw_line(view: &View, line: &LineObject, canvas: &mut Canvas) -> Result<usize> {
    if line.nitems < 2 {
        return Err(RenderError::InvalidInput(format!(
            "a line needs at least 2 points, got {}",
            line.nitems
        )));
    }
    let (w, h) = (canvas.w as f64, canvas.h as f64);
    let [start, end] = line.endpoints;
    let step = (end - start) * (1.0 / (line.nitems - 1) as f64);

    let mut written = 0;
    let mut prev = to_pixels(view, line.map, start, w, h);
    for n in 1..line.nitems {
        let next = to_pixels(view, line.map, start + step * n as f64, w, h);
        if let (Some(p0), Some(p1)) = (prev, next) {
            written += draw_segment(p0, p1, line.color, line.width, canvas);
        }
        prev = next;
    }
    Ok(written)
}

/// The 12 edges of the logical box `[lo, hi]`: four along x, then y, then z.
pub fn box_edges<'a>(
    lo: V3,
    hi: V3,
    nitems: usize,
    map: &'a dyn CoordinateMap,
    color: Rgb,
    width: f64,
) -> Vec<LineObject<'a>> {
    let (xs, ys, zs) = ([lo.x, hi.x], [lo.y, hi.y], [lo.z, hi.z]);
    let mut edges = Vec::with_capacity(12);
    for n in 0..4 {
        let (y, z) = (ys[n % 2], zs[n / 2]);
        edges.push([V3::new(xs[0], y, z), V3::new(xs[1], y, z)]);
    }
    for n in 0..4 {
        let (x, z) = (xs[n / 2], zs[n % 2]);
        edges.push([V3::new(x, ys[0], z), V3::new(x, ys[1], z)]);
    }
    for n in 0..4 {
        let (x, y) = (xs[n % 2], ys[n / 2]);
        edges.push([V3::new(x, y, zs[0]), V3::new(x, y, zs[1])]);
    }
    edges
        .into_iter()
        .map(|endpoints| LineObject {
            endpoints,
            nitems,
            map,
            color,
            width,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::EMPTY_DEPTH;
    use crate::mapping::Identity;
    use crate::test_helpers::{canvas_to_ascii, top_down_view};

    fn horizontal(nitems: usize, width: f64) -> LineObject<'static> {
        // Screen y = 0 is the middle of the raster; world is twice screen.
        LineObject {
            endpoints: [V3::new(-0.75, 0.0, 0.0), V3::new(0.75, 0.0, 0.0)],
            nitems,
            map: &Identity,
            color: Rgb::WHITE,
            width,
        }
    }

    #[test]
    fn line_stays_within_its_width() {
        let view = top_down_view(8, 8);
        let mut canvas = Canvas::blank(8, 8, Rgb::BLACK);
        let n = draw_line(&view, &horizontal(4, 2.0), &mut canvas).unwrap();
        assert!(n > 0);
        // Rows 3..=5 lie within one pixel of the line at y = 4; the distance
        // test is against the infinite line, so the padded ends fill in too.
        assert_eq!(
            canvas_to_ascii(&canvas),
            "\
........
........
########
########
########
........
........
........
"
        );
    }

    #[test]
    fn line_depth_blends_between_endpoints() {
        let view = top_down_view(8, 8);
        let mut canvas = Canvas::blank(8, 8, Rgb::BLACK);
        let tilted = LineObject {
            endpoints: [V3::new(-0.75, 0.0, 0.0), V3::new(0.75, 0.0, 0.5)],
            ..horizontal(2, 1.0)
        };
        draw_line(&view, &tilted, &mut canvas).unwrap();
        let d_left = canvas.get(2, 4).unwrap().depth;
        let d_right = canvas.get(5, 4).unwrap().depth;
        assert!(d_left > EMPTY_DEPTH && d_right > EMPTY_DEPTH);
        // The right end is nearer the camera.
        assert!(d_right > d_left);
        assert!((-2.0..=-1.5).contains(&d_left));
        assert!((-2.0..=-1.5).contains(&d_right));
    }

    #[test]
    fn too_few_points_is_rejected() {
        let view = top_down_view(4, 4);
        let mut canvas = Canvas::blank(4, 4, Rgb::BLACK);
        let err = draw_line(&view, &horizontal(1, 1.0), &mut canvas).unwrap_err();
        assert!(matches!(err, RenderError::InvalidInput(_)));
    }

    #[test]
    fn degenerate_and_unprojectable_segments_draw_nothing() {
        let view = top_down_view(4, 4);
        let mut canvas = Canvas::blank(4, 4, Rgb::BLACK);
        let dot = LineObject {
            endpoints: [V3::ZERO, V3::ZERO],
            ..horizontal(3, 4.0)
        };
        assert_eq!(draw_line(&view, &dot, &mut canvas).unwrap(), 0);
        let behind = LineObject {
            endpoints: [V3::new(-0.5, 0.0, 5.0), V3::new(0.5, 0.0, 5.0)],
            ..horizontal(3, 4.0)
        };
        assert_eq!(draw_line(&view, &behind, &mut canvas).unwrap(), 0);
        assert!(canvas.arr.iter().all(|p| p.depth == EMPTY_DEPTH));
    }

    #[test]
    fn box_has_twelve_axis_aligned_edges() {
        let edges = box_edges(V3::new(-1.0, -2.0, -3.0), V3::new(1.0, 2.0, 3.0), 8, &Identity, Rgb::WHITE, 1.0);
        assert_eq!(edges.len(), 12);
        for (n, e) in edges.iter().enumerate() {
            let d = e.endpoints[1] - e.endpoints[0];
            let along = match n / 4 {
                0 => V3::new(2.0, 0.0, 0.0),
                1 => V3::new(0.0, 4.0, 0.0),
                _ => V3::new(0.0, 0.0, 6.0),
            };
            assert_eq!(d, along, "edge {n}");
        }
        // Every corner is shared by exactly three edges.
        let mut ends: Vec<[i64; 3]> = edges
            .iter()
            .flat_map(|e| e.endpoints)
            .map(|p| p.to_array().map(|c| c as i64))
            .collect();
        ends.sort();
        ends.dedup();
        assert_eq!(ends.len(), 8);
    }
}
