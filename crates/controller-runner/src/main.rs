//! Composition root binary for the GNS3 controller/compute orchestration
//! core.

mod cli;
mod run;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    run::run(cli).await
}
