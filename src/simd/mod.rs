//! Masked vector-instruction simulator and the kernels built on it.
//!
//! - [`mask`], [`register`]: the W-lane value types.
//! - [`engine`]: the instruction set, with merge-semantics predication.
//! - [`logger`]: per-engine execution trace and utilization tally.
//! - [`clamped_exp`], [`array_sum`], [`abs`]: kernels with their scalar
//!   references and rayon-parallel variants.
//! - [`slice`]: the `scalar_* / simd_* / par_simd_*` traits for `&[f32]`.

pub mod abs;
pub mod array_sum;
pub mod clamped_exp;
pub mod engine;
pub mod logger;
pub mod mask;
pub mod register;
pub mod slice;
pub mod traits;

pub use engine::Engine;
pub use logger::{Instruction, LogEntry, Logger, Stats};
pub use mask::Mask;
pub use register::{VecFloat, VecInt, VecReg};
