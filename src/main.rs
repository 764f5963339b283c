//! `isoraster`: renders the iso-surfaces of a scene, optionally over several
//! in-process ranks, and writes the composited image.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use isoraster::canvas::Canvas;
use isoraster::comm::{LocalGroup, SingleProcess, Transport};
use isoraster::decomp::ProcessGrid;
use isoraster::error::RenderError;
use isoraster::output;
use isoraster::sample::SampleField;
use isoraster::scene::{SceneDesc, parse_scene_json};

#[derive(Parser, Debug)]
#[command(name = "isoraster")]
#[command(about = "Distributed iso-surface rasterizer", long_about = None)]
struct Args {
    /// JSON scene file; the built-in demo scene when absent
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Number of in-process ranks
    #[arg(short, long, default_value = "1")]
    ranks: usize,

    /// Output image (.ppm, or .png); overrides the scene's `output`
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the depth buffer as a grayscale PNG
    #[cfg(feature = "im-io")]
    #[arg(long)]
    depth: Option<PathBuf>,

    /// Open the composited canvas in a viewer window
    #[cfg(feature = "debug_ui")]
    #[arg(long)]
    show: bool,
}

fn load_scene(path: Option<&PathBuf>) -> Result<SceneDesc> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading scene {}", path.display()))?;
            parse_scene_json(&text).with_context(|| format!("parsing scene {}", path.display()))
        }
        None => SceneDesc::demo().context("parsing built-in demo scene"),
    }
}

fn render_rank(
    scene: &SceneDesc,
    field: &SampleField,
    nranks: usize,
    transport: &dyn Transport,
) -> Result<Option<Canvas>, RenderError> {
    let grid = ProcessGrid::with_dims(scene.process_grid, nranks, scene.periodic, transport.rank())?;
    scene.render_canvas(field, &grid, transport)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let scene = load_scene(args.scene.as_ref())?;
    let nranks = args.ranks.max(1);
    let path = args.output.clone().unwrap_or_else(|| scene.output.clone());

    let field = scene.field.generate().context("generating field")?;
    info!(
        "field {:?}, {} contours, {} ranks",
        field.glsizes,
        scene.contours.len(),
        nranks
    );

    let canvas = if nranks == 1 {
        render_rank(&scene, &field, 1, &SingleProcess::new())?
    } else {
        let results = LocalGroup::run(nranks, |t| render_rank(&scene, &field, nranks, &t));
        let mut root = None;
        for (rank, result) in results.into_iter().enumerate() {
            if let Some(canvas) = result.with_context(|| format!("rank {rank}"))? {
                root = Some(canvas);
            }
        }
        root
    };
    let canvas = canvas.context("no rank returned the composited canvas")?;

    output::write_canvas(&canvas, &path)?;
    info!("wrote {}", path.display());

    #[cfg(feature = "im-io")]
    if let Some(depth) = &args.depth {
        output::write_depth_png(&canvas, depth)?;
        info!("wrote depth {}", depth.display());
    }

    #[cfg(feature = "debug_ui")]
    if args.show {
        isoraster::im::debug_ui::show_canvas(&canvas, "isoraster")
            .map_err(anyhow::Error::msg)
            .context("canvas viewer")?;
    }

    Ok(())
}
