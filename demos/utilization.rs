//! Vector Utilization Demonstration
//!
//! Runs the clamped exponent kernel on the same data at every supported lane
//! width and prints how the utilization drops as wider registers wait on
//! their slowest lane. The last section shows the per-instruction trace of a
//! tiny workload.

use lanesim::simd::clamped_exp::clamped_exp_vector;
use lanesim::simd::{Engine, Logger};
use lanesim::{error::LanesimError, ClampedExp, EXP_MAX};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn utilization_at<const W: usize>(values: &[f32], exponents: &[i32]) -> Result<(), LanesimError> {
    let mut output = vec![0.0f32; values.len()];
    let mut engine = Engine::<W>::with_logger(Logger::with_trace(false));
    clamped_exp_vector(&mut engine, values, exponents, &mut output, values.len())?;

    let stats = engine.logger().stats();
    println!(
        "   W={:>2}: {:>7} instructions, {:>5.1}% utilization",
        W,
        stats.total_instructions,
        stats.utilization() * 100.0
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Lane utilization of the clamped exponent kernel\n");

    let mut rng = StdRng::seed_from_u64(7);
    let n = 10_000;
    let values: Vec<f32> = (0..n).map(|_| rng.random_range(-1.0..=3.0)).collect();
    let exponents: Vec<i32> = (0..n).map(|_| rng.random_range(0..EXP_MAX)).collect();

    utilization_at::<1>(&values, &exponents)?;
    utilization_at::<2>(&values, &exponents)?;
    utilization_at::<4>(&values, &exponents)?;
    utilization_at::<8>(&values, &exponents)?;
    utilization_at::<16>(&values, &exponents)?;
    utilization_at::<32>(&values, &exponents)?;
    println!();

    println!("Uniform exponents keep every lane busy");
    let uniform = vec![5; n];
    utilization_at::<8>(&values, &uniform)?;
    println!();

    println!("Trace of a 6-element workload at W=4");
    let values = [2.0f32, 3.0, -1.0, 4.0, 5.0, 2.0];
    let exponents = [3, 0, 2, 1, 10, 0];
    let mut output = [0.0f32; 6];
    let mut engine = Engine::<4>::new();
    clamped_exp_vector(&mut engine, &values, &exponents, &mut output, 6)?;
    engine.logger().print_log()?;
    engine.logger().print_stats()?;
    println!("   Output: {output:?}\n");

    println!("Invalid input is reported, not panicked on");
    match values.as_slice().simd_clamped_exp(&exponents[..4]) {
        Ok(result) => println!("   Unexpected success: {result:?}"),
        Err(e) => println!("   Error caught: {e}"),
    }

    Ok(())
}
