//! A software model of a fixed-width, masked SIMD execution unit.
//!
//! Kernels are written exclusively with width-parallel instructions issued on
//! an [`Engine`](simd::Engine); divergence inside a chunk is expressed with
//! masks, never with per-lane branches. Every instruction is tallied so the
//! vector utilization of a kernel can be reported.

pub mod error;
pub mod simd;
pub mod utils;

pub use simd::traits::{ArraySum, ClampedExp, SimdAbs};

/// Lane width used by the slice traits and the driver's default run.
pub const VECTOR_WIDTH: usize = 4;

/// Upper bound of the clamped exponentiation.
pub const CLAMP_CEILING: f32 = 9.999999;

/// Exponents generated by the driver lie in `0..EXP_MAX`.
pub const EXP_MAX: i32 = 10;

/// Chunks per rayon block in the parallel kernels.
pub const PARALLEL_CHUNK_LANES: usize = 256;
