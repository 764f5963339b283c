use crate::camera::{Camera, ScreenDesc};
use crate::canvas::{Canvas, EMPTY_DEPTH, Rgb};
use crate::render::{RenderOptions, RenderParams, View};
use crate::vec3::V3;

/// Camera at `z = 2` looking down at the `z = 0` plane through a unit screen
/// at `z = 1`: a world point `(x, y, 0)` lands on screen `(x / 2, y / 2)`
/// with depth `-2`.
pub fn top_down_params(w: usize, h: usize) -> RenderParams {
    RenderParams {
        camera: Camera {
            position: V3::new(0.0, 0.0, 2.0),
            look_at: V3::ZERO,
        },
        screen: ScreenDesc {
            center: V3::new(0.0, 0.0, 1.0),
            local_x: V3::EX,
            local_y: V3::EY,
        },
        resolution: [w, h],
        light: V3::EZ,
        background: Rgb::BLACK,
        options: RenderOptions::default(),
    }
}

pub fn top_down_view(w: usize, h: usize) -> View {
    View::new(&top_down_params(w, h)).unwrap()
}

/// `#` for drawn pixels, `.` for untouched ones; top image row first.
pub fn canvas_to_ascii(canvas: &Canvas) -> String {
    let mut out = String::new();
    for j in (0..canvas.h).rev() {
        for px in canvas.row(j) {
            out.push(if px.depth > EMPTY_DEPTH { '#' } else { '.' });
        }
        out.push('\n');
    }
    out
}

/// `n^3` samples of `|p| - radius` on a node grid spanning `[-0.5, 0.5]`.
/// Returns the grid and the values, x fastest.
pub fn sphere_block(n: usize, radius: f64) -> (Vec<f64>, Vec<f64>) {
    let grid: Vec<f64> = (0..n).map(|i| -0.5 + i as f64 / (n - 1) as f64).collect();
    let mut values = Vec::with_capacity(n * n * n);
    for &z in &grid {
        for &y in &grid {
            for &x in &grid {
                values.push((x * x + y * y + z * z).sqrt() - radius);
            }
        }
    }
    (grid, values)
}
