// Tile streaming around a moving viewer
//
// Requests go out through the TileGenerator onto worker threads; results
// come back through one FIFO queue per request kind and are consumed by the
// TileStreamer once per driver tick.

mod display;
mod result_queue;
mod tile;
mod tile_generator;
mod tile_streamer;

pub use display::TileDisplay;
pub use result_queue::ResultQueue;
pub use tile::select_lod_index;
pub use tile_generator::{DeliveredCounts, HeightResult, MeshResult, QueueDepths, TileGenerator};
pub use tile_streamer::{StreamerStats, TileStreamer};
