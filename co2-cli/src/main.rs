//! CO2 CLI - clean the OWID CO2 dataset and render dashboard view-models.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "co2-cli",
    version,
    about = "Global CO2 & Energy dashboard toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: co2_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    co2_cmd::run(cli.command)
}
