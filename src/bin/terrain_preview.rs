//! Render a single-tile terrain preview to a PNG
//!
//! Usage: terrain_preview [config.toml|-] [noise|color|mesh|falloff|clouds] [out.png] [lod]

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use terrain_engine::renderer::preview::{self, DrawMode, Preview};
use terrain_engine::TerrainConfig;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    if let Err(e) = run() {
        log::error!("Preview failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);

    let config = match args.next() {
        Some(path) if path != "-" => {
            TerrainConfig::load(&path).with_context(|| format!("loading {}", path))?
        }
        _ => TerrainConfig::default(),
    };
    config.validate().context("invalid terrain config")?;

    let mode: DrawMode = match args.next() {
        Some(mode) => mode.parse().map_err(|e: String| anyhow!(e))?,
        None => DrawMode::ColorMap,
    };
    let output = PathBuf::from(args.next().unwrap_or_else(|| "terrain_preview.png".to_string()));
    let level_of_detail: u32 = match args.next() {
        Some(lod) => lod.parse().context("level of detail must be a number")?,
        None => 0,
    };

    let preview = preview::render(&config, mode, level_of_detail);

    if let Preview::Mesh { terrain, water, .. } = &preview {
        println!(
            "terrain: {} vertices, {} triangles",
            terrain.vertex_count(),
            terrain.triangle_count()
        );
        if let Some(water) = water {
            println!(
                "water: {} vertices, {} triangles",
                water.vertex_count(),
                water.triangle_count()
            );
        }
    }

    preview
        .texture()
        .to_rgba_image()
        .save(&output)
        .with_context(|| format!("writing {}", output.display()))?;

    log::info!("Wrote {:?} preview to {}", mode, output.display());
    Ok(())
}
