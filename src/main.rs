use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = apikey_gen::cli::Cli::parse();
    cli.run()
}
