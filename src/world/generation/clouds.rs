//! Cloud layer: a border-less noise field painted one flat color

use cgmath::Vector2;

use super::{HeightField, NoiseField};
use crate::config::CloudSettings;

/// Build a cloud field centred at `centre`.
///
/// Clouds are never stitched, so the field has no border ring and every
/// color sample is the configured cloud color.
pub fn build_cloud_field(settings: &CloudSettings, centre: Vector2<f32>) -> HeightField {
    assert!(settings.size > 0, "cloud field size must be positive");
    let [offset_x, offset_y] = settings.noise.offset;
    let offset = centre + Vector2::new(offset_x, offset_y);

    let heights = NoiseField::new(&settings.noise.sanitized()).sample(settings.size, settings.size, offset);
    let colors = vec![settings.color; settings.size * settings.size];

    log::debug!(
        "[clouds::build_cloud_field] Built {}x{} cloud field",
        settings.size,
        settings.size
    );

    HeightField::new(heights, colors)
}
