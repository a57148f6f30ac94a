//! Absolute value, written as a masked if/else.
//!
//! `x < 0` selects the lanes that take `0 - x`; its complement reloads `x`
//! unchanged. The two instructions never touch the same lane. On the final
//! partial chunk every memory instruction is restricted to the live lanes, so
//! the kernel is correct for any `n`.

use rayon::prelude::*;

use crate::{
    error::{ensure_len, Result},
    simd::{engine::Engine, logger::Logger, mask::Mask, register::VecFloat},
    PARALLEL_CHUNK_LANES,
};

pub fn abs_serial(values: &[f32], output: &mut [f32], n: usize) -> Result<()> {
    ensure_len("values", values, n)?;
    ensure_len("output", output, n)?;

    for (out, &x) in output[..n].iter_mut().zip(&values[..n]) {
        *out = if x < 0.0 { -x } else { x };
    }

    Ok(())
}

pub fn abs_vector<const W: usize>(
    engine: &mut Engine<W>,
    values: &[f32],
    output: &mut [f32],
    n: usize,
) -> Result<()> {
    ensure_len("values", values, n)?;
    ensure_len("output", output, n)?;

    let zero: VecFloat<W> = engine.vsplat(0.0);

    for start in (0..n).step_by(W) {
        let live = Mask::<W>::ones(n - start);

        let mut x = VecFloat::<W>::new();
        let mut result = VecFloat::<W>::new();

        engine.vload(&mut x, &values[start..], live);

        let negative = engine.vlt(&x, &zero, live);
        engine.vsub(&mut result, &zero, &x, negative);

        // the complement also covers the dead tail lanes
        let not_negative = engine.mask_not(negative);
        let not_negative = engine.mask_and(not_negative, live);
        engine.vload(&mut result, &values[start..], not_negative);

        engine.vstore(&mut output[start..], &result, live);
    }

    Ok(())
}

/// [`abs_vector`] over blocks of `PARALLEL_CHUNK_LANES * W` elements on the
/// rayon pool, with the per-block loggers merged in order.
pub fn par_abs_vector<const W: usize>(
    values: &[f32],
    output: &mut [f32],
    n: usize,
    trace: bool,
) -> Result<Logger<W>> {
    ensure_len("values", values, n)?;
    ensure_len("output", output, n)?;

    let block = PARALLEL_CHUNK_LANES * W;

    let loggers = output[..n]
        .par_chunks_mut(block)
        .zip(values[..n].par_chunks(block))
        .map(|(out, vals)| {
            let mut engine = Engine::<W>::with_logger(Logger::with_trace(trace));
            abs_vector(&mut engine, vals, out, out.len())?;
            Ok(engine.into_logger())
        })
        .collect::<Result<Vec<_>>>()?;

    let mut merged = Logger::with_trace(trace);
    for logger in loggers {
        merged.merge(logger);
    }

    Ok(merged)
}
