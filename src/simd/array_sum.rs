//! Tree-reduction sum on the simulated vector unit.
//!
//! Each W-lane chunk is folded with `log2(W)` rounds of `hadd` followed by
//! `interleave`. After round `r` the register holds `W / 2^r` distinct partial
//! sums, each duplicated, so after the last round lane 0 holds the chunk
//! total:
//!
//! ```text
//! [a b c d] --hadd--> [ab ab cd cd] --interleave--> [ab cd ab cd]
//!           --hadd--> [abcd abcd abcd abcd]
//! ```
//!
//! The chunk totals form a new array of `n / W` elements, reduced the same way
//! while its length is a non-zero multiple of W. Anything else (fewer than W
//! partials, or a count that does not divide into chunks) is finished with the
//! scalar reference.

use rayon::prelude::*;

use crate::{
    error::{ensure_len, validation_error, Result},
    simd::{engine::Engine, logger::Logger, mask::Mask, register::VecFloat},
    PARALLEL_CHUNK_LANES,
};

/// Scalar reference: left-to-right sum of the first `n` elements.
pub fn array_sum_serial(values: &[f32], n: usize) -> Result<f32> {
    ensure_len("values", values, n)?;
    Ok(values[..n].iter().sum())
}

/// Sum of the first `n` elements by tree reduction.
///
/// # Errors
///
/// Returns a validation error if `values` holds fewer than `n` elements or if
/// `n` is not a multiple of W. Callers with a ragged workload reduce the
/// largest multiple-of-W prefix here and add the tail with
/// [`array_sum_serial`].
pub fn array_sum_vector<const W: usize>(
    engine: &mut Engine<W>,
    values: &[f32],
    n: usize,
) -> Result<f32> {
    ensure_len("values", values, n)?;
    ensure_whole_chunks::<W>(n)?;

    Ok(tree_sum(engine, &values[..n], 0))
}

/// Tree reduction with the first level split across the rayon pool.
///
/// Blocks of `PARALLEL_CHUNK_LANES * W` elements produce their chunk totals on
/// separate engines; the totals are gathered in order and reduced on one
/// engine that continues the merged tally.
pub fn par_array_sum_vector<const W: usize>(
    values: &[f32],
    n: usize,
    trace: bool,
) -> Result<(f32, Logger<W>)> {
    ensure_len("values", values, n)?;
    ensure_whole_chunks::<W>(n)?;

    let block = PARALLEL_CHUNK_LANES * W;

    let blocks: Vec<(Vec<f32>, Logger<W>)> = values[..n]
        .par_chunks(block)
        .map(|chunk| {
            let mut engine = Engine::<W>::with_logger(Logger::with_trace(trace));
            let totals = chunk_totals(&mut engine, chunk);
            (totals, engine.into_logger())
        })
        .collect();

    let mut merged = Logger::with_trace(trace);
    let mut totals = Vec::with_capacity(n / W);
    for (partials, logger) in blocks {
        totals.extend(partials);
        merged.merge(logger);
    }

    let mut engine = Engine::with_logger(merged);
    let sum = reduce_partials(&mut engine, totals, 1);

    Ok((sum, engine.into_logger()))
}

fn ensure_whole_chunks<const W: usize>(n: usize) -> Result<()> {
    if n % W != 0 {
        return Err(validation_error(format!(
            "workload size {n} is not a multiple of the lane width {W}"
        )));
    }
    Ok(())
}

fn tree_sum<const W: usize>(engine: &mut Engine<W>, values: &[f32], depth: usize) -> f32 {
    let totals = chunk_totals(engine, values);
    reduce_partials(engine, totals, depth)
}

fn reduce_partials<const W: usize>(engine: &mut Engine<W>, totals: Vec<f32>, depth: usize) -> f32 {
    tracing::debug!(depth, partials = totals.len(), width = W, "tree reduction level");

    // W == 1 never shrinks the array
    if W > 1 && totals.len() >= W && totals.len() % W == 0 {
        tree_sum(engine, &totals, depth + 1)
    } else {
        totals.iter().sum()
    }
}

/// One total per W-lane chunk of `values`, whose length is a multiple of W.
fn chunk_totals<const W: usize>(engine: &mut Engine<W>, values: &[f32]) -> Vec<f32> {
    let all = Mask::<W>::all_ones();
    let rounds = W.trailing_zeros();

    let mut partials = VecFloat::<W>::new();
    let mut folded = VecFloat::<W>::new();

    values
        .chunks_exact(W)
        .map(|chunk| {
            engine.vload(&mut partials, chunk, all);
            for _ in 0..rounds {
                engine.hadd(&mut folded, &partials);
                engine.interleave(&mut partials, &folded);
            }
            partials[0]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_chunk_folds_into_lane_zero() {
        let mut engine = Engine::<8>::new();
        let values: Vec<f32> = (1..=8).map(|i| i as f32).collect();
        assert_eq!(chunk_totals(&mut engine, &values), vec![36.0]);

        // vload + 3 rounds of hadd/interleave
        assert_eq!(engine.logger().stats().total_instructions, 7);
    }

    #[test]
    fn ragged_workload_is_rejected() {
        let mut engine = Engine::<4>::new();
        let error = array_sum_vector(&mut engine, &[1.0; 6], 6).unwrap_err();
        assert!(error.to_string().contains("not a multiple of the lane width 4"));
    }

    #[test]
    fn width_one_reduces_without_recursing_forever() {
        let mut engine = Engine::<1>::new();
        let values = [1.0f32, 2.0, 3.0];
        assert_eq!(array_sum_vector(&mut engine, &values, 3).unwrap(), 6.0);
    }

    #[test]
    fn empty_workload_sums_to_zero() {
        let mut engine = Engine::<4>::new();
        assert_eq!(array_sum_vector(&mut engine, &[], 0).unwrap(), 0.0);
        assert_eq!(engine.logger().stats().total_instructions, 0);
    }
}
