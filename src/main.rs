use meridian_genesis::artifacts::ArtifactSet;
use meridian_genesis::cli::Cli;
use meridian_genesis::config::DeployConfig;
use meridian_genesis::genesis;
use meridian_genesis::output;
use meridian_genesis::registry::AddressRegistry;
use meridian_genesis::snapshot;

use clap::Parser;

/// Main entry point for the genesis builder.
///
/// One-shot, fully sequential: load the three external inputs, run the
/// build pass, write the canonical snapshot. Any failure is fatal and
/// leaves no partial output behind.
fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    output::print_banner(&cli.network);
    output::print_inputs(&cli.deploy_config, &cli.l1_deployments, &cli.artifacts);

    let config = DeployConfig::load(&cli.deploy_config, &cli.network)?;
    let registry = AddressRegistry::load(&cli.l1_deployments)?;
    let artifacts = ArtifactSet::load(&cli.artifacts)?;

    let (state, report) = genesis::build_genesis(&config, &registry, &artifacts)?;
    output::print_report(&report);

    snapshot::write_snapshot_file(&state, &cli.outfile)?;
    output::print_written(&cli.outfile, state.len());

    Ok(())
}
