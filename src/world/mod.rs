//! World data: tile coordinates, colors and height-field generation

mod color;
pub mod generation;
mod position;

pub use color::Color;
pub use generation::{HeightField, HeightFieldBuilder, HeightMap, NoiseField};
pub use position::{TileBounds, TileCoord};
