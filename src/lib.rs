// Library crate root.
//
// The `isoraster` binary (src/main.rs) is a thin driver over these modules.

pub mod bitmap;
pub mod camera;
pub mod canvas;
pub mod comm;
pub mod composite;
pub mod contour;
pub mod decomp;
pub mod error;
pub mod im;
pub mod line;
pub mod mapping;
pub mod mat3;
pub mod memory;
pub mod output;
pub mod project;
pub mod render;
pub mod sample;
pub mod scene;
pub mod vec3;

#[cfg(test)]
pub mod test_helpers;
