use anyhow::Result;
use buddysplit::cli::Cli;
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logging();
    cli.run()
}
