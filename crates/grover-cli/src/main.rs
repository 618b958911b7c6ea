//! Grover Command-Line Interface
//!
//! Runs Grover searches on the local simulator, either noiseless or against
//! a named noisy device profile.
//!
//! ```text
//! grover sweep                         n = 1..=4, random targets, 1000 trials
//! grover sweep --noisy --trials 200    same on the 19q-acorn noise model
//! grover run --qubits 3 --target 5     one search, full report
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{devices, run, sweep, version};

/// Grover - amplitude amplification on a simulated quantum device
#[derive(Parser, Debug)]
#[command(name = "grover")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (YAML, or JSON with a .json extension)
    #[arg(short, long, global = true, env = "GROVER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every search command.
#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Trials per search (overrides the configuration)
    #[arg(short, long)]
    pub trials: Option<u32>,

    /// Run on a noisy device model, polling the job until it finishes
    #[arg(long)]
    pub noisy: bool,

    /// Device profile for noisy runs (overrides the configuration)
    #[arg(short, long)]
    pub device: Option<String>,

    /// Sampler seed (overrides the configuration)
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search for a random target at every qubit count in a range
    Sweep {
        /// Smallest number of data qubits
        #[arg(long, default_value = "1")]
        from: u32,

        /// Largest number of data qubits
        #[arg(long, default_value = "4")]
        to: u32,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Search for one target
    Run {
        /// Number of data qubits
        #[arg(short = 'n', long)]
        qubits: u32,

        /// Marked index, in [0, 2^qubits)
        #[arg(short = 's', long)]
        target: u64,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// List device profiles
    Devices,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Sweep { from, to, search } => sweep::execute(config, from, to, &search).await,
        Commands::Run {
            qubits,
            target,
            format,
            search,
        } => run::execute(config, qubits, target, &format, &search).await,
        Commands::Devices => devices::execute().await,
        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
