//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - Grover search on simulated quantum devices",
        style("Grover").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  grover-ir           Circuit intermediate representation");
    println!("  grover-hal          Backend contract, device profiles and results");
    println!("  grover-core         Operators, assembly, execution and decoding");
    println!("  grover-adapter-sim  Statevector simulator backend");
    println!("  grover-cli          Command-line interface");
    println!();
    println!("License: {}", style("Apache-2.0").dim());
}
