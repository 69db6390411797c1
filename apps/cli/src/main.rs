//! domainqa CLI: domain-aware question answering.
//!
//! Routes questions to domain adapters, prints prompts and suggestions, and
//! reviews draft answers through the full pipeline.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
