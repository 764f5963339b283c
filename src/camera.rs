use serde::Deserialize;

use crate::error::{RenderError, Result};
use crate::mat3::Mat3;
use crate::vec3::V3;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Camera {
    pub position: V3,
    /// Informational only; projection uses the camera position and the screen plane.
    #[serde(default)]
    pub look_at: V3,
}

/// Raw screen description as the caller provides it.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScreenDesc {
    pub center: V3,
    pub local_x: V3,
    pub local_y: V3,
}

/// A screen plane with the derived quantities the projector needs.
///
/// `local_x`/`local_y` are not normalized: their lengths span the full image
/// and the projector divides by their squared lengths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Screen {
    pub center: V3,
    pub local_x: V3,
    pub local_y: V3,
    pub inv_len_sq: [f64; 2],
    pub normal: V3,
    pub intercept: f64,
    pub width: usize,
    pub height: usize,
}

impl Screen {
    pub fn new(desc: &ScreenDesc, resolution: [usize; 2]) -> Result<Self> {
        let [width, height] = resolution;
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidInput(format!(
                "screen resolution {width}x{height} is empty"
            )));
        }

        let cross = desc.local_x.cross(desc.local_y);
        let n = cross.norm();
        if !(n > 0.0 && n.is_finite()) {
            return Err(RenderError::InvalidInput(
                "screen basis vectors are parallel or zero".to_owned(),
            ));
        }
        let normal = cross * (1.0 / n);

        Ok(Self {
            center: desc.center,
            local_x: desc.local_x,
            local_y: desc.local_y,
            inv_len_sq: [1.0 / desc.local_x.norm_sq(), 1.0 / desc.local_y.norm_sq()],
            normal,
            intercept: normal.dot(desc.center),
            width,
            height,
        })
    }
}

// Camera rig
// -----------------------------------------------------------------------------

/// Orbit-style camera placement: angles in degrees, the scene centered on the
/// origin.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CameraRig {
    pub elevation: f64,
    pub azimuth: f64,
    #[serde(default)]
    pub roll: f64,
    pub camera_distance: f64,
    pub screen_distance: f64,
    /// Physical `[width, height]` of the screen rectangle.
    pub screen_size: [f64; 2],
}

impl CameraRig {
    /// Returns the camera and screen this rig describes.
    pub fn place(&self) -> (Camera, ScreenDesc) {
        let elevation = Mat3::rotation(V3::EX, self.elevation.to_radians());
        let azimuth = Mat3::rotation(V3::EZ, self.azimuth.to_radians());
        let orbit = azimuth.mul(&elevation);

        let position = orbit.transform(V3::new(0.0, 0.0, self.camera_distance));

        let local_x = orbit.transform(V3::new(self.screen_size[0], 0.0, 0.0));
        let local_y = orbit.transform(V3::new(0.0, self.screen_size[1], 0.0));
        let axis = local_x.cross(local_y).normalized_or_zero();
        let roll = Mat3::rotation(axis, self.roll.to_radians());

        let center = position * (self.screen_distance / self.camera_distance);

        (
            Camera { position, look_at: V3::ZERO },
            ScreenDesc {
                center,
                local_x: roll.transform(local_x),
                local_y: roll.transform(local_y),
            },
        )
    }
}
