use super::Triangle;
use crate::canvas::{Canvas, Rgb};
use crate::im::ROI;
use crate::project::{Projected, project};
use crate::render::View;
use crate::vec3::V3;

/// Smallest magnitude allowed for a projected triangle's doubled area.
const AREA_EPS: f64 = 1e-12;

/// Guard added under the square root when normalizing a blended normal.
const NORMAL_EPS: f64 = 1e-8;

/// Signed doubled area of `(a, b, c)` in screen space.
#[inline]
fn edge(a: &Projected, b: &Projected, cx: f64, cy: f64) -> f64 {
    (cx - a.x) * (b.y - a.y) - (cy - a.y) * (b.x - a.x)
}

/// Lambert-like factor of a blended normal, floored so back-lit and
/// unsmoothed fragments stay visible.
#[inline]
pub(crate) fn shading_factor(normal: V3, light: V3, floor: f64) -> f64 {
    let inv = 1.0 / (normal.norm_sq() + NORMAL_EPS).sqrt();
    (normal.dot(light) * inv).abs().max(floor)
}

/// Rasterizes one smoothed triangle into `canvas` with a depth test.
///
/// Returns the number of pixels written. A triangle with any vertex that does
/// not project is skipped.
pub fn draw_triangle(view: &View, color: Rgb, tri: &Triangle, canvas: &mut Canvas) -> usize {
    let [Some(p0), Some(p1), Some(p2)] = tri.vertices.map(|v| project(view.camera, &view.screen, v)) else {
        return 0;
    };

    let (w, h) = (canvas.w as f64, canvas.h as f64);
    let lo = [
        (0.5 + p0.x.min(p1.x).min(p2.x)) * w,
        (0.5 + p0.y.min(p1.y).min(p2.y)) * h,
    ];
    let hi = [
        (0.5 + p0.x.max(p1.x).max(p2.x)) * w,
        (0.5 + p0.y.max(p1.y).max(p2.y)) * h,
    ];
    let Some(roi) = ROI::covering(lo, hi, 1.0, canvas.w, canvas.h) else {
        return 0;
    };

    let mut area = edge(&p0, &p1, p2.x, p2.y);
    if area.abs() < AREA_EPS {
        area = AREA_EPS.copysign(area);
    }
    let ainv = 1.0 / area;
    let tol = view.options.seam_tolerance;

    let mut written = 0;
    for j in roi.t..roi.b {
        let cy = (j as f64 + 0.5) / h - 0.5;
        for i in roi.l..roi.r {
            let cx = (i as f64 + 0.5) / w - 0.5;
            let w0 = ainv * edge(&p1, &p2, cx, cy);
            if w0 < tol {
                continue;
            }
            let w1 = ainv * edge(&p2, &p0, cx, cy);
            if w1 < tol {
                continue;
            }
            let w2 = ainv * edge(&p0, &p1, cx, cy);
            if w2 < tol {
                continue;
            }

            let depth = 1.0 / (w0 / p0.depth + w1 / p1.depth + w2 / p2.depth);
            let Some(px) = canvas.get_mut(i, j) else {
                continue;
            };
            if depth <= px.depth {
                continue;
            }
            let [n0, n1, n2] = tri.vertex_normals;
            let normal = n0 * w0 + n1 * w1 + n2 * w2;
            let factor = shading_factor(normal, view.light, view.options.shading_floor);
            if px.write_if_nearer(depth, color.shaded(factor)) {
                written += 1;
            }
        }
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::EMPTY_DEPTH;
    use crate::test_helpers::top_down_view;

    const BASE: Rgb = Rgb([200, 100, 40]);
    /// `BASE` facing the light; the normalization guard keeps the factor just under 1.
    const LIT: Rgb = Rgb([199, 99, 39]);

    fn flat(vertices: [V3; 3], normal: V3) -> Triangle {
        Triangle {
            vertices,
            vertex_normals: [normal; 3],
            ..Default::default()
        }
    }

    #[test]
    fn covering_triangle_lights_the_pixel_within_the_floor() {
        let view = top_down_view(1, 1);
        let mut canvas = Canvas::blank(1, 1, Rgb::BLACK);
        let verts = [V3::new(-1.0, -1.0, 0.0), V3::new(3.0, -1.0, 0.0), V3::new(-1.0, 3.0, 0.0)];

        // Facing the light head on.
        assert_eq!(draw_triangle(&view, BASE, &flat(verts, V3::EZ), &mut canvas), 1);
        assert_eq!(canvas.arr[0].color, LIT);
        assert_eq!(canvas.arr[0].depth, -2.0);

        // Edge-on and unsmoothed fragments both fall back to the floor.
        for normal in [V3::EX, V3::ZERO] {
            let mut canvas = Canvas::blank(1, 1, Rgb::BLACK);
            draw_triangle(&view, BASE, &flat(verts, normal), &mut canvas);
            assert_eq!(canvas.arr[0].color, BASE.shaded(0.25));
        }

        // Anything in between stays within [floor, 1].
        let mut canvas = Canvas::blank(1, 1, Rgb::BLACK);
        draw_triangle(&view, BASE, &flat(verts, V3::new(1.0, 0.0, 1.0)), &mut canvas);
        let got = canvas.arr[0].color.0;
        for ((g, lo), hi) in got.iter().zip(BASE.shaded(0.25).0).zip(BASE.0) {
            assert!(lo <= *g && *g <= hi, "{got:?}");
        }
    }

    #[test]
    fn pixels_outside_the_triangle_are_untouched() {
        let view = top_down_view(4, 4);
        let mut canvas = Canvas::blank(4, 4, Rgb::WHITE);
        // Covers only the centre of pixel (0, 0).
        let tri = flat(
            [V3::new(-1.0, -1.0, 0.0), V3::new(-0.4, -1.0, 0.0), V3::new(-1.0, -0.4, 0.0)],
            V3::EZ,
        );
        assert_eq!(draw_triangle(&view, BASE, &tri, &mut canvas), 1);
        assert_eq!(canvas.get(0, 0).unwrap().color, LIT);
        for (idx, px) in canvas.arr.iter().enumerate().skip(1) {
            assert_eq!(px.color, Rgb::WHITE, "pixel {idx}");
            assert_eq!(px.depth, EMPTY_DEPTH, "pixel {idx}");
        }
    }

    #[test]
    fn equal_depth_does_not_overwrite() {
        let view = top_down_view(2, 2);
        let mut canvas = Canvas::blank(2, 2, Rgb::BLACK);
        let verts = [V3::new(-2.0, -2.0, 0.0), V3::new(4.0, -2.0, 0.0), V3::new(-2.0, 4.0, 0.0)];
        assert_eq!(draw_triangle(&view, BASE, &flat(verts, V3::EZ), &mut canvas), 4);
        assert_eq!(draw_triangle(&view, Rgb::WHITE, &flat(verts, V3::EZ), &mut canvas), 0);
        assert!(canvas.arr.iter().all(|p| p.color == LIT));
    }

    #[test]
    fn nearer_triangle_wins() {
        let view = top_down_view(1, 1);
        let mut canvas = Canvas::blank(1, 1, Rgb::BLACK);
        let at = |z: f64| [V3::new(-1.0, -1.0, z), V3::new(3.0, -1.0, z), V3::new(-1.0, 3.0, z)];
        draw_triangle(&view, BASE, &flat(at(0.5), V3::EZ), &mut canvas);
        draw_triangle(&view, Rgb::WHITE, &flat(at(0.0), V3::EZ), &mut canvas);
        assert_eq!(canvas.arr[0].color, LIT);
    }

    #[test]
    fn triangle_behind_the_camera_is_skipped() {
        let view = top_down_view(1, 1);
        let mut canvas = Canvas::blank(1, 1, Rgb::BLACK);
        let verts = [V3::new(-1.0, -1.0, 3.0), V3::new(3.0, -1.0, 3.0), V3::new(-1.0, 3.0, 3.0)];
        assert_eq!(draw_triangle(&view, BASE, &flat(verts, V3::EZ), &mut canvas), 0);
        assert_eq!(canvas.arr[0].depth, EMPTY_DEPTH);
    }
}
