use clap::Parser;

use lanesim::error::{config_error, LanesimError};

/// Lane widths the driver has a monomorphized engine for.
pub const SUPPORTED_WIDTHS: [usize; 6] = [1, 2, 4, 8, 16, 32];

#[derive(Parser, Debug)]
#[command(name = "lanesim")]
#[command(
    author,
    version,
    about = "Run clamped exponentiation and array sum on a simulated masked vector unit"
)]
pub struct Cli {
    /// Use workload size N
    #[arg(short, long, default_value_t = 16, env = "LANESIM_SIZE")]
    pub size: usize,

    /// Lane width of the simulated unit (1, 2, 4, 8, 16 or 32)
    #[arg(short, long, default_value_t = lanesim::VECTOR_WIDTH, env = "LANESIM_WIDTH")]
    pub width: usize,

    /// Print the vector unit execution log
    #[arg(short, long)]
    pub log: bool,

    /// Seed for the generated workload (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Split the kernels across the rayon thread pool
    #[arg(long)]
    pub parallel: bool,
}

/// A validated run of the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub size: usize,
    pub width: usize,
    pub print_log: bool,
    pub seed: Option<u64>,
    pub parallel: bool,
}

impl TryFrom<Cli> for RunConfig {
    type Error = LanesimError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        if cli.size == 0 {
            return Err(config_error("size", "workload size must be at least 1"));
        }
        if !SUPPORTED_WIDTHS.contains(&cli.width) {
            return Err(config_error(
                "width",
                format!(
                    "{} is not one of the supported lane widths {:?}",
                    cli.width, SUPPORTED_WIDTHS
                ),
            ));
        }

        Ok(Self {
            size: cli.size,
            width: cli.width,
            print_log: cli.log,
            seed: cli.seed,
            parallel: cli.parallel,
        })
    }
}
