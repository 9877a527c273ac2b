//! Colored console output for the genesis builder.
//!
//! Replaces raw `println!` calls with structured, colored output.
//! Color scheme: blue+bold headers, cyan values, green success,
//! yellow for intentional skips, dimmed secondary text.

use crate::genesis::BuildReport;
use colored::Colorize;
use std::path::Path;

/// Print the startup banner with the deployment context.
pub fn print_banner(context: &str) {
    println!();
    println!("{}", "=== Meridian Genesis Builder ===".blue().bold());
    println!("  Deployment:   {}", context.cyan());
}

/// Print where each external input came from.
pub fn print_inputs(deploy_config: &Path, l1_deployments: &Path, artifacts: &Path) {
    println!("  Deploy config: {}", deploy_config.display().to_string().dimmed());
    println!("  L1 registry:   {}", l1_deployments.display().to_string().dimmed());
    println!("  Artifacts:     {}", artifacts.display().to_string().dimmed());
}

/// Print what the build pass produced, including intentional skips.
pub fn print_report(report: &BuildReport) {
    println!(
        "  {} Precompiles funded:      {}",
        "OK".green().bold(),
        report.precompiles_funded.to_string().cyan()
    );
    println!(
        "  {} Proxies installed:       {}",
        "OK".green().bold(),
        report.proxies_installed.to_string().cyan()
    );
    println!(
        "  {} Implementations placed:  {}",
        "OK".green().bold(),
        report.implementations_placed.to_string().cyan()
    );
    println!(
        "  {} Contracts initialized:   {}",
        "OK".green().bold(),
        report.contracts_initialized.to_string().cyan()
    );
    if !report.governance_deployed {
        println!("  {} Governance token (disabled by config)", "SKIP".yellow().bold());
    }
    match report.dev_accounts_funded {
        Some(count) => println!(
            "  {} Dev accounts funded:     {}",
            "OK".green().bold(),
            count.to_string().cyan()
        ),
        None => println!("  {} Dev account funding (disabled by config)", "SKIP".yellow().bold()),
    }
}

/// Print the snapshot location and size.
pub fn print_written(path: &Path, accounts: usize) {
    println!(
        "  {} Snapshot written: {} ({} accounts)",
        "OK".green().bold(),
        path.display().to_string().cyan(),
        accounts.to_string().cyan()
    );
    println!();
}
