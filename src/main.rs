use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lanesim::simd::array_sum::{array_sum_serial, array_sum_vector, par_array_sum_vector};
use lanesim::simd::clamped_exp::{clamped_exp_serial, clamped_exp_vector, par_clamped_exp_vector};
use lanesim::simd::{Engine, Logger};
use lanesim::utils::{first_mismatch, padded_vec};
use lanesim::EXP_MAX;

mod cli;

use cli::{Cli, RunConfig};

const CLAMPED_EPSILON: f32 = 0.00001;
const SUM_EPSILON: f32 = 0.1;

/// Inputs of one run, sized `n + W` so the padding lanes are checked too.
struct Workload {
    values: Vec<f32>,
    exponents: Vec<i32>,
}

impl Workload {
    fn generate(n: usize, width: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut values = padded_vec::<f32>(n, width);
        let mut exponents = padded_vec::<i32>(n, width);
        for (value, exponent) in values.iter_mut().zip(exponents.iter_mut()) {
            *value = rng.random_range(-1.0..=3.0);
            *exponent = rng.random_range(0..EXP_MAX);
        }

        Self { values, exponents }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = match RunConfig::try_from(Cli::parse()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let outcome = match config.width {
        1 => run::<1>(&config),
        2 => run::<2>(&config),
        4 => run::<4>(&config),
        8 => run::<8>(&config),
        16 => run::<16>(&config),
        32 => run::<32>(&config),
        other => Err(format!("no engine for lane width {other}").into()),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run<const W: usize>(config: &RunConfig) -> Result<bool, Box<dyn Error>> {
    let n = config.size;
    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    tracing::info!(n, width = W, seed, parallel = config.parallel, "generating workload");

    let workload = Workload::generate(n, W, seed);
    let mut output = padded_vec::<f32>(n, W);
    let mut gold = padded_vec::<f32>(n, W);

    clamped_exp_serial(&workload.values, &workload.exponents, &mut gold, n)?;

    let logger = if config.parallel {
        par_clamped_exp_vector::<W>(
            &workload.values,
            &workload.exponents,
            &mut output,
            n,
            config.print_log,
        )?
    } else {
        let mut engine = Engine::<W>::with_logger(Logger::with_trace(config.print_log));
        clamped_exp_vector(
            &mut engine,
            &workload.values,
            &workload.exponents,
            &mut output,
            n,
        )?;
        engine.into_logger()
    };

    println!("\x1b[1;31mCLAMPED EXPONENT\x1b[0m (required) ");
    let clamped_correct = verify_result(&workload, &output, &gold, n);
    if config.print_log {
        logger.print_log()?;
    }
    logger.print_stats()?;

    println!("************************ Result Verification *************************");
    if clamped_correct {
        println!("Passed!!!");
    } else {
        println!("@@@ Failed!!!");
    }

    println!("\n\x1b[1;31mARRAY SUM\x1b[0m (bonus) ");
    let sum_correct = if n % W == 0 {
        let expected = array_sum_serial(&workload.values, n)?;
        let actual = if config.parallel {
            par_array_sum_vector::<W>(&workload.values, n, false)?.0
        } else {
            let mut engine = Engine::<W>::with_logger(Logger::with_trace(false));
            array_sum_vector(&mut engine, &workload.values, n)?
        };

        let correct = (expected - actual).abs() < SUM_EPSILON * 2.0;
        if correct {
            println!("Passed!!!");
        } else {
            println!("Expected {expected:.6}, got {actual:.6}\n.");
            println!("@@@ Failed!!!");
        }
        correct
    } else {
        println!("Must have N % VECTOR_WIDTH == 0 for this problem (VECTOR_WIDTH is {W})");
        true
    };

    Ok(clamped_correct && sum_correct)
}

/// Compares the whole buffers, padding included, and dumps the workload on
/// the first mismatch.
fn verify_result(workload: &Workload, output: &[f32], gold: &[f32], n: usize) -> bool {
    let Some(incorrect) = first_mismatch(output, gold, CLAMPED_EPSILON) else {
        println!("Results matched with answer!");
        return true;
    };

    tracing::warn!(index = incorrect, n, "clamped exponent mismatch");
    if incorrect >= n {
        println!("You have written to out of bound value!");
    }
    println!("Wrong calculation at value[{incorrect}]!");

    let values: String = workload.values[..n].iter().map(|v| format!("{v: >9.6} ")).collect();
    let exponents: String = workload.exponents[..n].iter().map(|e| format!("{e: >9} ")).collect();
    let outputs: String = output[..n].iter().map(|v| format!("{v: >9.6} ")).collect();
    let golds: String = gold[..n].iter().map(|v| format!("{v: >9.6} ")).collect();

    println!("value  = {values}");
    println!("exp    = {exponents}");
    println!("output = {outputs}");
    println!("gold   = {golds}");

    false
}
