use cgmath::Vector2;
use serde::{Deserialize, Serialize};

/// Position of a tile on the streaming grid (tile coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Tile containing a (scaled) viewer position, rounding to the nearest tile centre
    pub fn from_viewer(viewer: Vector2<f32>, tile_world_size: f32) -> Self {
        Self::new(
            (viewer.x / tile_world_size).round() as i32,
            (viewer.y / tile_world_size).round() as i32,
        )
    }

    /// Convert to the tile's centre in world units
    pub fn to_world_pos(&self, tile_world_size: f32) -> Vector2<f32> {
        Vector2::new(
            self.x as f32 * tile_world_size,
            self.y as f32 * tile_world_size,
        )
    }

    /// Create a new tile coordinate offset by the given amounts
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Axis-aligned square footprint of a tile in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileBounds {
    pub centre: Vector2<f32>,
    pub half_extent: f32,
}

impl TileBounds {
    pub fn new(centre: Vector2<f32>, size: f32) -> Self {
        Self {
            centre,
            half_extent: size / 2.0,
        }
    }

    /// Squared distance from `point` to the nearest point of the bounds (0 inside)
    pub fn sqr_distance(&self, point: Vector2<f32>) -> f32 {
        let dx = ((point.x - self.centre.x).abs() - self.half_extent).max(0.0);
        let dy = ((point.y - self.centre.y).abs() - self.half_extent).max(0.0);
        dx * dx + dy * dy
    }

    pub fn distance(&self, point: Vector2<f32>) -> f32 {
        self.sqr_distance(point).sqrt()
    }
}
