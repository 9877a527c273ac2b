use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the genesis builder
#[derive(Parser, Debug)]
#[command(name = "meridian-genesis", about = "Meridian L2 genesis state builder")]
pub struct Cli {
    /// Directory holding the deploy-config JSON files, one per
    /// deployment context.
    #[arg(long, default_value = "deploy-config")]
    pub deploy_config: PathBuf,

    /// Deployment context name; selects `<deploy-config>/<network>.json`.
    #[arg(long, default_value = "devnet")]
    pub network: String,

    /// JSON file mapping logical L1 contract names to their deployed
    /// addresses, produced by the L1 deployment phase.
    #[arg(long, default_value = "deployments/l1.json")]
    pub l1_deployments: PathBuf,

    /// JSON file of compiled contract artifacts keyed by name.
    #[arg(long, default_value = "artifacts/contracts.json")]
    pub artifacts: PathBuf,

    /// Path the canonical genesis snapshot is written to.
    #[arg(long, default_value = "genesis-l2.json")]
    pub outfile: PathBuf,
}
