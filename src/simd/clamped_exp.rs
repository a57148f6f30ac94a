//! Clamped exponentiation on the simulated vector unit.
//!
//! For every element `i`, `values[i]` is raised to the non-negative integer
//! `exponents[i]` by repeated multiplication and the result is capped at
//! [`CLAMP_CEILING`]. An exponent of zero yields `1.0`.
//!
//! # Algorithm
//!
//! The workload is cut into chunks of W lanes. Each chunk starts from an
//! accumulator of ones and iterates while any lane still has a non-zero
//! exponent:
//!
//! 1. **Activity mask**: `is_zero = (exponent == 0)` over every lane; the chunk
//!    is done once all W lanes are zero.
//! 2. **Step**: under `!is_zero` only, decrement the exponent and multiply the
//!    accumulator by the value.
//! 3. **Clamp and continue**: lanes whose accumulator exceeds the ceiling are
//!    reset to it right away, so lanes with large exponents stay finite while
//!    their neighbours keep iterating.
//!
//! The final partial chunk runs under `Mask::ones(n % W)` for its loads and
//! its store. Lanes past `n` keep a zero exponent, never multiply, and are
//! never written back.
//!
//! # Range
//!
//! Clamping inside the loop matches the scalar reference, which clamps once at
//! the end, whenever the running product cannot leave and re-enter the
//! ceiling: for values `>= -1.0`, which covers the driver's data range. A base
//! below `-1.0` may be clamped at an even power and then change sign.

use rayon::prelude::*;

use crate::{
    error::{ensure_len, validation_error, Result},
    simd::{
        engine::Engine,
        logger::Logger,
        mask::Mask,
        register::{VecFloat, VecInt},
    },
    CLAMP_CEILING, PARALLEL_CHUNK_LANES,
};

/// Scalar reference for a single element.
///
/// Uses `exponent - 1` multiplications on purpose, mirroring the vector
/// kernel's decrement-until-zero loop.
#[inline(always)]
pub fn clamped_exp_scalar(value: f32, exponent: i32) -> f32 {
    if exponent == 0 {
        return 1.0;
    }

    let mut result = value;
    let mut count = exponent - 1;
    while count > 0 {
        result *= value;
        count -= 1;
    }

    if result > CLAMP_CEILING {
        CLAMP_CEILING
    } else {
        result
    }
}

/// Scalar reference over the first `n` elements.
///
/// # Errors
///
/// Returns a validation error if any slice holds fewer than `n` elements or
/// if one of the first `n` exponents is negative.
pub fn clamped_exp_serial(
    values: &[f32],
    exponents: &[i32],
    output: &mut [f32],
    n: usize,
) -> Result<()> {
    validate(values, exponents, output, n)?;

    for ((out, &value), &exponent) in output[..n]
        .iter_mut()
        .zip(&values[..n])
        .zip(&exponents[..n])
    {
        *out = clamped_exp_scalar(value, exponent);
    }

    Ok(())
}

/// Vectorized clamped exponentiation of the first `n` elements.
///
/// Every instruction goes through `engine` and is recorded in its logger.
/// Slices may be longer than `n` (padding); nothing at or beyond index `n` is
/// read or written.
///
/// # Arguments
///
/// * `engine` - The vector unit to issue instructions on
/// * `values` - Bases
/// * `exponents` - Non-negative integer exponents
/// * `output` - Destination for the clamped powers
/// * `n` - Number of logical elements
///
/// # Errors
///
/// Same conditions as [`clamped_exp_serial`]; nothing is issued on error.
pub fn clamped_exp_vector<const W: usize>(
    engine: &mut Engine<W>,
    values: &[f32],
    exponents: &[i32],
    output: &mut [f32],
    n: usize,
) -> Result<()> {
    validate(values, exponents, output, n)?;

    let chunks = n.div_ceil(W);
    tracing::debug!(n, width = W, chunks, "clamped exponent");

    let all = Mask::<W>::all_ones();
    let zeros: VecInt<W> = engine.vsplat(0);
    let ones: VecInt<W> = engine.vsplat(1);
    let ceiling: VecFloat<W> = engine.vsplat(CLAMP_CEILING);

    for chunk in 0..chunks {
        let start = chunk * W;
        // full for interior chunks, ones(n % W) for a partial tail
        let live = Mask::<W>::ones(n - start);

        let mut x = VecFloat::<W>::new();
        let mut y = VecInt::<W>::new();
        let mut acc = VecFloat::<W>::new();

        engine.vset(&mut y, 0, all);
        engine.vset(&mut acc, 1.0, all);
        engine.vload(&mut x, &values[start..], live);
        engine.vload(&mut y, &exponents[start..], live);

        loop {
            let is_zero = engine.veq(&y, &zeros, all);
            if engine.cntbits(is_zero) == W {
                break;
            }
            let is_not_zero = engine.mask_not(is_zero);

            let remaining = y;
            engine.vsub(&mut y, &remaining, &ones, is_not_zero);

            let product = acc;
            engine.vmult(&mut acc, &product, &x, is_not_zero);

            let over = engine.vgt(&acc, &ceiling, all);
            engine.vset(&mut acc, CLAMP_CEILING, over);
        }

        engine.vstore(&mut output[start..], &acc, live);
    }

    Ok(())
}

/// Vectorized clamped exponentiation split across the rayon pool.
///
/// The workload is cut into blocks of `PARALLEL_CHUNK_LANES * W` elements,
/// so every block but the last is a whole number of chunks. Each block runs
/// [`clamped_exp_vector`] on its own engine; the returned logger holds the
/// per-block tallies merged in block order.
///
/// The output is identical to the sequential kernel. The tally is not: each
/// block issues its own constant broadcasts.
///
/// # Errors
///
/// Same conditions as [`clamped_exp_serial`].
pub fn par_clamped_exp_vector<const W: usize>(
    values: &[f32],
    exponents: &[i32],
    output: &mut [f32],
    n: usize,
    trace: bool,
) -> Result<Logger<W>> {
    validate(values, exponents, output, n)?;

    let block = PARALLEL_CHUNK_LANES * W;

    let loggers = output[..n]
        .par_chunks_mut(block)
        .zip(values[..n].par_chunks(block))
        .zip(exponents[..n].par_chunks(block))
        .map(|((out, vals), exps)| {
            let mut engine = Engine::<W>::with_logger(Logger::with_trace(trace));
            clamped_exp_vector(&mut engine, vals, exps, out, out.len())?;
            Ok(engine.into_logger())
        })
        .collect::<Result<Vec<_>>>()?;

    let mut merged = Logger::with_trace(trace);
    for logger in loggers {
        merged.merge(logger);
    }

    Ok(merged)
}

fn validate(values: &[f32], exponents: &[i32], output: &[f32], n: usize) -> Result<()> {
    ensure_len("values", values, n)?;
    ensure_len("exponents", exponents, n)?;
    ensure_len("output", output, n)?;

    if let Some(i) = exponents[..n].iter().position(|&e| e < 0) {
        return Err(validation_error(format!(
            "exponent at index {i} is negative ({})",
            exponents[i]
        )));
    }

    Ok(())
}
