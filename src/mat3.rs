use crate::vec3::V3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat3 {
    // Row-major 3x3 matrix.
    m: [[f64; 3]; 3],
}

impl Mat3 {
    pub const fn identity() -> Self {
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Rotation by `angle` radians about `axis` (Rodrigues' formula).
    ///
    /// The axis does not need to be normalized; a zero axis yields the identity.
    pub fn rotation(axis: V3, angle: f64) -> Self {
        let n = axis.norm();
        if n == 0.0 {
            return Self::identity();
        }
        let k = axis * (1.0 / n);
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        Self {
            m: [
                [t * k.x * k.x + c, t * k.x * k.y - s * k.z, t * k.x * k.z + s * k.y],
                [t * k.x * k.y + s * k.z, t * k.y * k.y + c, t * k.y * k.z - s * k.x],
                [t * k.x * k.z - s * k.y, t * k.y * k.z + s * k.x, t * k.z * k.z + c],
            ],
        }
    }

    #[inline]
    pub fn transform(&self, v: V3) -> V3 {
        let m = &self.m;
        V3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Returns `self * rhs`, i.e. a transform that applies `rhs` first.
    pub fn mul(&self, rhs: &Mat3) -> Mat3 {
        let mut out = [[0.0; 3]; 3];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, v) in row.iter_mut().enumerate() {
                *v = (0..3).map(|k| self.m[r][k] * rhs.m[k][c]).sum();
            }
        }
        Mat3 { m: out }
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn assert_close(a: V3, b: V3) {
        assert!((a - b).norm() < 1e-12, "{a:?} != {b:?}");
    }

    #[test]
    fn quarter_turn_about_z_maps_x_to_y() {
        let r = Mat3::rotation(V3::EZ, FRAC_PI_2);
        assert_close(r.transform(V3::EX), V3::EY);
        assert_close(r.transform(V3::EZ), V3::EZ);
    }

    #[test]
    fn composition_applies_right_operand_first() {
        let rx = Mat3::rotation(V3::EX, FRAC_PI_2);
        let rz = Mat3::rotation(V3::EZ, FRAC_PI_2);
        // EZ -> (x-rot) -> -EY -> (z-rot) -> EX
        assert_close(rz.mul(&rx).transform(V3::EZ), V3::EX);
    }
}
