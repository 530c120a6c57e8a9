// Terrain Engine Constants - SINGLE SOURCE OF TRUTH
//
// Every tunable number the generation core depends on lives here.
// Do NOT scatter magic numbers through the builders.

/// Tile dimensions
pub mod tile {
    /// Interior tile size for smooth-shaded meshes.
    /// 241 bordered vertices per side keeps a tile under the 65k vertex ceiling,
    /// and 240 divides evenly by every simplification step up to LOD 6.
    pub const CHUNK_SIZE: usize = 239;

    /// Interior tile size when flat shading is requested (flat shading triples vertex count)
    pub const FLAT_SHADED_CHUNK_SIZE: usize = 95;

    /// Cells of padding on each side of a height field
    pub const BORDER: usize = 1;

    /// Largest level of detail the presets use
    pub const MAX_LEVEL_OF_DETAIL: u32 = 6;
}

/// Noise sampling
pub mod noise {
    /// Per-octave random offsets are drawn from [-OCTAVE_OFFSET_RANGE, OCTAVE_OFFSET_RANGE)
    pub const OCTAVE_OFFSET_RANGE: i32 = 100_000;

    /// Scale is clamped to this before dividing
    pub const MIN_SCALE: f32 = 1e-4;

    /// Empirical divisor applied to the theoretical maximum in global normalization.
    /// Peaks above 1.0 are expected; height curves are authored for it.
    pub const GLOBAL_NORMALIZATION_ESTIMATE: f32 = 1.457;

    /// Seed of the underlying gradient table. Terrain variety comes from the
    /// per-octave offsets, never from this value.
    pub const PERLIN_SEED: u32 = 0;
}

/// Island falloff curve `v^A / (v^A + (B - B*v)^A)`
pub mod falloff {
    pub const CURVE_A: f32 = 3.0;
    pub const CURVE_B: f32 = 2.2;
}

/// Water plane
pub mod water {
    /// Constant elevation of the water plane in mesh units
    pub const WATER_LEVEL: f32 = 6.34;
}

/// Cloud layer
pub mod clouds {
    /// Clouds have no border ring
    pub const CLOUD_CHUNK_SIZE: usize = 239;

    /// Elevation of the cloud layer's base in mesh units
    pub const CLOUD_START_HEIGHT: f32 = 60.0;

    pub const CLOUD_HEIGHT_MULTIPLIER: f32 = 10.0;
}

/// Tile streaming
pub mod streaming {
    /// Viewer positions are divided by this before any tile math
    pub const WORLD_SCALE: f32 = 5.0;

    /// Visibility is only refreshed after the viewer moves this far (scaled units)
    pub const VIEWER_MOVE_THRESHOLD: f32 = 25.0;
    pub const SQR_VIEWER_MOVE_THRESHOLD: f32 = VIEWER_MOVE_THRESHOLD * VIEWER_MOVE_THRESHOLD;
}

/// Worker threads
pub mod workers {
    /// Stack size for generation workers (in bytes)
    pub const WORKER_STACK_SIZE: usize = 4 * 1024 * 1024;

    /// Cores left free for the driver thread
    pub const RESERVED_CORES: usize = 1;
}
