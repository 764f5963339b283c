//! Logical-to-Cartesian coordinate maps.
//!
//! Contour and line objects are described on a logical rectilinear grid. A
//! `CoordinateMap` places that grid in the Cartesian space the camera sees,
//! which lets curvilinear domains (e.g. cylinders) render without special
//! cases in the rasterizers.

use serde::Deserialize;

use crate::mat3::Mat3;
use crate::vec3::V3;

pub trait CoordinateMap: Sync {
    fn to_cartesian(&self, logical: V3) -> V3;
}

impl<F> CoordinateMap for F
where
    F: Fn(V3) -> V3 + Sync,
{
    fn to_cartesian(&self, logical: V3) -> V3 {
        self(logical)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl CoordinateMap for Identity {
    fn to_cartesian(&self, logical: V3) -> V3 {
        logical
    }
}

/// Rotation followed by translation.
#[derive(Debug, Clone, Copy)]
pub struct Rotated {
    pub rotation: Mat3,
    pub translation: V3,
}

impl CoordinateMap for Rotated {
    fn to_cartesian(&self, logical: V3) -> V3 {
        self.rotation.transform(logical) + self.translation
    }
}

/// Logical `(r, theta, z)` to Cartesian `(r cos theta, r sin theta, z)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cylindrical;

impl CoordinateMap for Cylindrical {
    fn to_cartesian(&self, logical: V3) -> V3 {
        let (s, c) = logical.y.sin_cos();
        V3::new(logical.x * c, logical.x * s, logical.z)
    }
}

/// Scene-level choice of map, e.g. `{ "kind": "rotated", "axis": [0, 0, 1], "degrees": 90 }`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MapDesc {
    #[default]
    Identity,
    Rotated {
        axis: V3,
        degrees: f64,
        #[serde(default)]
        translation: V3,
    },
    Cylindrical,
}

impl MapDesc {
    pub fn build(&self) -> Box<dyn CoordinateMap> {
        match *self {
            MapDesc::Identity => Box::new(Identity),
            MapDesc::Rotated {
                axis,
                degrees,
                translation,
            } => Box::new(Rotated {
                rotation: Mat3::rotation(axis, degrees.to_radians()),
                translation,
            }),
            MapDesc::Cylindrical => Box::new(Cylindrical),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn closures_are_maps() {
        let shift = |p: V3| p + V3::EX;
        assert_eq!(shift.to_cartesian(V3::ZERO), V3::EX);
    }

    #[test]
    fn cylindrical_quarter_turn() {
        let p = Cylindrical.to_cartesian(V3::new(2.0, FRAC_PI_2, 0.5));
        assert!((p - V3::new(0.0, 2.0, 0.5)).norm() < 1e-12);
    }

    #[test]
    fn rotated_applies_translation_after_rotation() {
        let m = Rotated {
            rotation: Mat3::rotation(V3::EZ, FRAC_PI_2),
            translation: V3::EZ,
        };
        let p = m.to_cartesian(V3::EX);
        assert!((p - V3::new(0.0, 1.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn map_desc_builds_each_kind() {
        let rotated: MapDesc =
            serde_json::from_str(r#"{ "kind": "rotated", "axis": [0, 0, 1], "degrees": 90, "translation": [0, 0, 1] }"#)
                .unwrap();
        let p = rotated.build().to_cartesian(V3::EX);
        assert!((p - V3::new(0.0, 1.0, 1.0)).norm() < 1e-12);

        let cyl: MapDesc = serde_json::from_str(r#"{ "kind": "cylindrical" }"#).unwrap();
        let p = cyl.build().to_cartesian(V3::new(2.0, FRAC_PI_2, 0.5));
        assert!((p - V3::new(0.0, 2.0, 0.5)).norm() < 1e-12);

        assert_eq!(MapDesc::default().build().to_cartesian(V3::EY), V3::EY);
        assert!(serde_json::from_str::<MapDesc>(r#"{ "kind": "spherical" }"#).is_err());
    }
}
