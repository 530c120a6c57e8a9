// Worker spawning for tile generation
mod spawner;

pub use spawner::{InlineSpawner, Job, RayonSpawner, SpawnerStats, TaskSpawner, WorkerPoolError};
