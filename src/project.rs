use crate::camera::Screen;
use crate::vec3::V3;

/// `|n . ray|` below this means the ray runs parallel to the screen plane.
const PARALLEL_EPS: f64 = 1e-12;

/// A point mapped onto the screen.
///
/// `x` and `y` are in screen units, `[-0.5, 0.5]` across the visible area.
/// `depth` is signed along the screen normal: larger is nearer the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub x: f64,
    pub y: f64,
    pub depth: f64,
}

/// Intersects the camera-to-`p` ray with the screen plane.
///
/// Returns `None` when the ray is parallel to the screen, when `p` is behind
/// the camera, or when `p` lies between the camera and the screen (the
/// intersection parameter must be strictly inside `(0, 1)`).
pub fn project(camera: V3, screen: &Screen, p: V3) -> Option<Projected> {
    let ray = p - camera;
    let denom = screen.normal.dot(ray);
    if denom.abs() < PARALLEL_EPS {
        return None;
    }
    let t = (screen.intercept - screen.normal.dot(camera)) / denom;
    if t <= 0.0 || t >= 1.0 {
        return None;
    }

    let delta = camera + ray * t - screen.center;
    Some(Projected {
        x: delta.dot(screen.local_x) * screen.inv_len_sq[0],
        y: delta.dot(screen.local_y) * screen.inv_len_sq[1],
        depth: denom,
    })
}
