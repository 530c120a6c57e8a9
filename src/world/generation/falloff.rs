//! Radial falloff used to carve island shapes out of a height field

use super::HeightMap;
use crate::constants::falloff::{CURVE_A, CURVE_B};

/// Generate a `size x size` falloff grid: ~0 at the centre, ~1 at the edges.
///
/// Pure function of `size`; callers cache the result per bordered tile size.
pub fn generate_falloff_map(size: usize) -> HeightMap {
    let mut map = HeightMap::new(size, size);
    for y in 0..size {
        for x in 0..size {
            let u = axis_coordinate(x, size);
            let v = axis_coordinate(y, size);
            map.set(x, y, evaluate(u.abs().max(v.abs())));
        }
    }
    map
}

/// Map a cell index onto [-1, 1]. The integer numerator negates exactly
/// under reflection, keeping the grid symmetric to the last bit.
#[inline]
fn axis_coordinate(i: usize, size: usize) -> f32 {
    if size <= 1 {
        return 0.0;
    }
    let last = (size - 1) as i64;
    (2 * i as i64 - last) as f32 / last as f32
}

#[inline]
fn evaluate(value: f32) -> f32 {
    let rising = value.powf(CURVE_A);
    rising / (rising + (CURVE_B - CURVE_B * value).powf(CURVE_A))
}
