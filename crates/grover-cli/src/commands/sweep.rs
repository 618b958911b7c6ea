//! Sweep command implementation.

use std::path::Path;

use anyhow::{Result, bail};
use console::style;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

use grover_core::GroverSearch;

use super::common::{create_allocator, create_backend, execution_mode, load_config};
use crate::SearchArgs;

/// Execute the sweep command.
pub async fn execute(config_path: Option<&Path>, from: u32, to: u32, args: &SearchArgs) -> Result<()> {
    if from > to {
        bail!("Empty range: --from {from} is greater than --to {to}");
    }

    let config = load_config(config_path, args)?;
    let mode = execution_mode(args);
    let backend = create_backend(&config, mode)?;

    println!(
        "{} Sweeping n = {from}..={to} ({mode}, {} trials each)",
        style("→").cyan().bold(),
        config.trials
    );

    // Targets are drawn from their own stream so a seed fixes both the
    // targets and the sampled outcomes.
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut search = GroverSearch::new(create_allocator(&config), &backend)
        .with_trials(config.trials)
        .with_policy(config.poll_policy());

    let mut failures = 0usize;
    for n in from..=to {
        let s = rng.gen_range(0..target_bound(n));
        match search.run(n, s, mode).await {
            Ok(report) => println!(
                "  n={:<2} s={:<4} repeats={:<3} accuracy {}",
                n,
                s,
                report.repeats,
                style(report.accuracy).green()
            ),
            Err(e) => {
                warn!(n, s, error = %e, "search failed");
                failures += 1;
                println!("  n={n:<2} s={s:<4} {} {e}", style("failed:").red());
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} searches failed", to - from + 1);
    }

    println!("{} Sweep complete", style("✓").green().bold());
    Ok(())
}

/// Exclusive upper bound for a random target among `2^n` items.
fn target_bound(n: u32) -> u64 {
    1u64.checked_shl(n).unwrap_or(u64::MAX)
}
