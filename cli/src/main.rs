//! Entry-point for the `roster` binary.
use clap::Parser;
use roster_cli::Cli;
use roster_cli::run_main;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run_main(Cli::parse()).await
}
