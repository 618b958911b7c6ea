//! Run command implementation.

use std::path::Path;

use anyhow::{Context, Result, bail};
use console::style;

use grover_core::{GroverSearch, SearchReport};
use grover_ir::render_ids;

use super::common::{create_allocator, create_backend, execution_mode, load_config};
use crate::SearchArgs;

/// Execute the run command.
pub async fn execute(
    config_path: Option<&Path>,
    qubits: u32,
    target: u64,
    format: &str,
    args: &SearchArgs,
) -> Result<()> {
    let json = match format.to_lowercase().as_str() {
        "text" => false,
        "json" => true,
        other => bail!("Unknown output format: '{other}'. Available: text, json"),
    };

    let config = load_config(config_path, args)?;
    let mode = execution_mode(args);
    let backend = create_backend(&config, mode)?;

    let mut search = GroverSearch::new(create_allocator(&config), &backend)
        .with_trials(config.trials)
        .with_policy(config.poll_policy());

    let report = search
        .run(qubits, target, mode)
        .await
        .with_context(|| format!("Search for s={target} over n={qubits} qubits failed"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &SearchReport) {
    println!(
        "{} Grover search: n={}, s={}",
        style("→").cyan().bold(),
        report.qubits,
        report.marked
    );
    println!("  Mode:            {}", report.mode);
    println!("  Physical qubits: {}", render_ids(&report.physical_qubits));
    println!("  Repeats:         {}", report.repeats);
    println!("  Trials:          {}", report.trials);
    if let Some(top) = report.most_frequent {
        println!("  Most frequent:   {top}");
    }
    println!(
        "{} Accuracy: {}",
        style("✓").green().bold(),
        style(report.accuracy).bold()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_text_and_json() {
        let args = SearchArgs {
            trials: Some(100),
            seed: Some(3),
            ..SearchArgs::default()
        };
        execute(None, 2, 3, "text", &args).await.unwrap();
        execute(None, 2, 3, "JSON", &args).await.unwrap();
    }

    #[tokio::test]
    async fn test_run_unknown_format() {
        let err = execute(None, 2, 3, "xml", &SearchArgs::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("xml"));
    }

    #[tokio::test]
    async fn test_run_marked_index_out_of_range() {
        let args = SearchArgs {
            trials: Some(10),
            ..SearchArgs::default()
        };
        let err = execute(None, 2, 4, "text", &args).await.unwrap_err();
        assert!(format!("{err:#}").contains("s=4"));
    }
}
