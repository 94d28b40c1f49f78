// Domain layer: entity catalog models and ports (interfaces).
// Depends only on std/serde/chrono plus async-trait for the executor seam.

pub mod model;
pub mod ports;
