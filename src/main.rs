use anyhow::Result;
use clap::Parser;
use monefy::cli::Cli;
use monefy::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    cli.run().await
}
