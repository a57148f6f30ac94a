//! Tree-reduction sum against the scalar reference.

use lanesim::simd::array_sum::{array_sum_serial, array_sum_vector, par_array_sum_vector};
use lanesim::simd::{Engine, Instruction};
use lanesim::{ArraySum, PARALLEL_CHUNK_LANES};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn generate(n: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.random_range(0.0..1.0)).collect()
}

fn assert_close(actual: f32, expected: f32, context: &str) {
    let tolerance = 1e-4 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "{context}: got {actual}, expected {expected}"
    );
}

fn check_against_reference<const W: usize>(chunks: usize, seed: u64) {
    let n = chunks * W;
    let values = generate(n, seed);

    let gold = array_sum_serial(&values, n).unwrap();
    let mut engine = Engine::<W>::new();
    let sum = array_sum_vector(&mut engine, &values, n).unwrap();

    assert_close(sum, gold, &format!("W={W}, n={n}"));
}

#[test]
fn test_all_ones_width_four() {
    let values = [1.0f32; 8];
    let mut engine = Engine::<4>::new();
    assert_eq!(array_sum_vector(&mut engine, &values, 8).unwrap(), 8.0);

    // two chunks of vload + 2 rounds; two partials finish on the scalar path
    let stats = engine.logger().stats();
    assert_eq!(stats.total_instructions, 10);
    assert_eq!(stats.utilized_lanes, stats.total_lanes);
}

#[test]
fn test_matches_reference_across_widths() {
    for chunks in [0usize, 1, 2, 3, 7, 16, 33, 100] {
        let seed = chunks as u64;
        check_against_reference::<1>(chunks, seed);
        check_against_reference::<2>(chunks, seed);
        check_against_reference::<4>(chunks, seed);
        check_against_reference::<8>(chunks, seed);
        check_against_reference::<16>(chunks, seed);
        check_against_reference::<32>(chunks, seed);
    }
}

#[test]
fn test_partials_are_reduced_recursively() {
    // 64 -> 16 -> 4 -> 1
    let values: Vec<f32> = (0..64).map(|i| i as f32).collect();
    let mut engine = Engine::<4>::new();
    let sum = array_sum_vector(&mut engine, &values, 64).unwrap();
    assert_eq!(sum, 2016.0);

    let loads = engine
        .logger()
        .entries()
        .iter()
        .filter(|entry| entry.instruction == Instruction::Load)
        .count();
    assert_eq!(loads, 16 + 4 + 1);
    assert_eq!(engine.logger().stats().total_instructions, 21 * 5);
}

#[test]
fn test_ragged_workload_is_an_error() {
    let values = generate(10, 3);
    let mut engine = Engine::<4>::new();

    let error = array_sum_vector(&mut engine, &values, 10).unwrap_err();
    assert!(error.to_string().contains("not a multiple"));
    assert!(par_array_sum_vector::<4>(&values, 10, false).is_err());
    assert!(array_sum_vector(&mut engine, &values, 12).is_err());
    assert_eq!(engine.logger().stats().total_instructions, 0);
}

#[test]
fn test_parallel_matches_sequential_exactly() {
    let n = PARALLEL_CHUNK_LANES * 8 * 3 + 8 * 5;
    let values = generate(n, 99);

    let mut engine = Engine::<8>::new();
    let sequential = array_sum_vector(&mut engine, &values, n).unwrap();
    let (parallel, logger) = par_array_sum_vector::<8>(&values, n, true).unwrap();

    // same chunk totals reduced in the same order
    assert_eq!(sequential.to_bits(), parallel.to_bits());
    assert_eq!(&logger, engine.logger());
}

#[test]
fn test_slice_sum_handles_any_length() {
    let ones = vec![1.0f32; 10];
    assert_eq!(ones.as_slice().simd_sum().unwrap(), 10.0);
    assert_eq!(ones.as_slice().par_simd_sum().unwrap(), 10.0);
    assert_eq!(ones.as_slice().scalar_sum().unwrap(), 10.0);

    for n in [0usize, 1, 3, 4, 5, 1_001, 4_099] {
        let values = generate(n, 1_000 + n as u64);
        let gold = values.as_slice().scalar_sum().unwrap();
        assert_close(values.as_slice().simd_sum().unwrap(), gold, &format!("simd n={n}"));
        assert_close(
            values.as_slice().par_simd_sum().unwrap(),
            gold,
            &format!("par n={n}"),
        );
    }
}
