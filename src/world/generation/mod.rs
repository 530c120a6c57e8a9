//! CPU world generation
//!
//! Turns noise parameters into tile height fields. Every function here is
//! pure over its inputs so tiles can be generated on any worker thread.

mod clouds;
mod falloff;
mod height_field;
mod height_map;
mod noise_field;

#[cfg(test)]
mod tests;

pub use clouds::build_cloud_field;
pub use falloff::generate_falloff_map;
pub use height_field::{build_height_field, classify_height, HeightField, HeightFieldBuilder};
pub use height_map::HeightMap;
pub use noise_field::{generate_noise_map, NoiseField};
