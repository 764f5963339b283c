//! JSON scene descriptions and the per-rank driver that renders them.

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

use crate::camera::{Camera, CameraRig, ScreenDesc};
use crate::canvas::{Canvas, Rgb};
use crate::comm::Transport;
use crate::contour::ContourObject;
use crate::decomp::{Decomposition, Pencil};
use crate::error::Result;
use crate::line::box_edges;
use crate::mapping::MapDesc;
use crate::render::{RenderOptions, RenderParams, render_canvas};
use crate::sample::{SampleField, sinusoid_field, sphere_field};
use crate::vec3::V3;

/// The built-in demo: two contours of a sinusoidal field inside the domain box.
pub const DEMO_SCENE_JSON: &str = include_str!("../scenes/demo.json");

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldDesc {
    pub glsizes: [usize; 3],
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub pencil: Pencil,
    /// Render a sphere of this radius instead of the sinusoid field.
    #[serde(default)]
    pub sphere_radius: Option<f64>,
}

impl FieldDesc {
    pub fn generate(&self) -> Result<SampleField> {
        match self.sphere_radius {
            Some(r) => Ok(sphere_field(self.glsizes, r)),
            None => sinusoid_field(self.glsizes, self.seed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ContourDesc {
    pub threshold: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct EdgesDesc {
    #[serde(default = "default_edge_color")]
    pub color: Rgb,
    #[serde(default = "default_edge_width")]
    pub width: f64,
    /// Points per edge; the x grid size when absent.
    #[serde(default)]
    pub nitems: Option<usize>,
}

fn default_edge_color() -> Rgb {
    Rgb::WHITE
}

fn default_edge_width() -> f64 {
    4.0
}

fn default_output() -> PathBuf {
    PathBuf::from("output.ppm")
}

fn default_periodic() -> [bool; 3] {
    [true; 3]
}

/// A fully resolved scene.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "SceneDescRaw")]
pub struct SceneDesc {
    pub output: PathBuf,
    pub params: RenderParams,
    pub field: FieldDesc,
    pub periodic: [bool; 3],
    /// Process grid dims; zeros are picked from the rank count.
    pub process_grid: [usize; 2],
    pub contours: Vec<ContourDesc>,
    pub edges: Option<EdgesDesc>,
    /// Places the logical `[-0.5, 0.5]^3` domain in world space.
    pub mapping: MapDesc,
}

#[derive(Debug, Clone, Deserialize)]
struct SceneDescRaw {
    #[serde(default = "default_output")]
    output: PathBuf,
    resolution: [usize; 2],
    #[serde(default)]
    camera: Option<Camera>,
    #[serde(default)]
    screen: Option<ScreenDesc>,
    #[serde(default)]
    rig: Option<CameraRig>,
    light: V3,
    #[serde(default)]
    background: Rgb,
    field: FieldDesc,
    #[serde(default = "default_periodic")]
    periodic: [bool; 3],
    #[serde(default)]
    process_grid: [usize; 2],
    #[serde(default)]
    contours: Vec<ContourDesc>,
    #[serde(default)]
    edges: Option<EdgesDesc>,
    #[serde(default)]
    options: RenderOptions,
    #[serde(default)]
    mapping: MapDesc,
}

impl TryFrom<SceneDescRaw> for SceneDesc {
    type Error = String;

    fn try_from(raw: SceneDescRaw) -> Result<Self, Self::Error> {
        let (camera, screen) = match (raw.rig, raw.camera, raw.screen) {
            (Some(rig), _, _) => rig.place(),
            (None, Some(camera), Some(screen)) => (camera, screen),
            _ => return Err("scene needs either `rig` or both `camera` and `screen`".to_owned()),
        };
        Ok(Self {
            output: raw.output,
            params: RenderParams {
                camera,
                screen,
                resolution: raw.resolution,
                light: raw.light,
                background: raw.background,
                options: raw.options,
            },
            field: raw.field,
            periodic: raw.periodic,
            process_grid: raw.process_grid,
            contours: raw.contours,
            edges: raw.edges,
            mapping: raw.mapping,
        })
    }
}

pub fn parse_scene_json(json_text: &str) -> Result<SceneDesc, serde_json::Error> {
    serde_json::from_str(json_text)
}

impl SceneDesc {
    pub fn demo() -> Result<Self, serde_json::Error> {
        parse_scene_json(DEMO_SCENE_JSON)
    }

    /// Renders this scene for one rank. `field` must come from
    /// `self.field.generate()`; every rank holds the same copy.
    pub fn render_canvas(
        &self,
        field: &SampleField,
        decomp: &dyn Decomposition,
        transport: &dyn Transport,
    ) -> Result<Option<Canvas>> {
        let pencil = self.field.pencil;
        let block = field.local_block(decomp, pencil)?;
        let map = self.mapping.build();
        let contours: Vec<ContourObject> = self
            .contours
            .iter()
            .map(|c| ContourObject {
                pencil,
                glsizes: field.glsizes,
                grids: field.grid_refs(),
                map: map.as_ref(),
                threshold: c.threshold,
                color: c.color,
                array: &block,
            })
            .collect();
        let lines = match self.edges {
            Some(e) => box_edges(
                V3::new(-0.5, -0.5, -0.5),
                V3::new(0.5, 0.5, 0.5),
                e.nitems.unwrap_or(field.glsizes[0]),
                map.as_ref(),
                e.color,
                e.width,
            ),
            None => Vec::new(),
        };
        render_canvas(decomp, transport, &self.params, &contours, &lines)
    }

    /// `render_canvas` plus writing the image on the coordinating rank.
    pub fn render(
        &self,
        field: &SampleField,
        decomp: &dyn Decomposition,
        transport: &dyn Transport,
        path: &Path,
    ) -> Result<()> {
        if let Some(canvas) = self.render_canvas(field, decomp, transport)? {
            crate::output::write_canvas(&canvas, path)?;
            info!("scene rendered to {}", path.display());
        }
        Ok(())
    }
}
