use crate::cli::CliContext;
use crate::core::keygen::{self, Mapping};
use crate::core::updater::{self, UpdateRequest};
use crate::models::config::WriteMode;
use anyhow::{Context, Result};
use clap::Args;

fn parse_length(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if n == 0 {
        return Err("length must be at least 1".into());
    }
    Ok(n)
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Key length (default: 32, or `length` from the config file)
    #[arg(long, value_parser = parse_length, env = "APIKEY_GEN_LENGTH")]
    pub length: Option<usize>,

    /// Write through a temp file and rename instead of rewriting in place
    #[arg(long)]
    pub atomic: bool,

    /// Hold an exclusive lock on <file>.lock during the update
    #[arg(long)]
    pub lock: bool,

    /// Use rejection sampling for a uniform key distribution
    #[arg(long)]
    pub unbiased: bool,

    /// Print a key without modifying any file
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(ctx: &CliContext, args: GenerateArgs) -> Result<()> {
    let length = args.length.unwrap_or(ctx.config.length);
    let mapping = Mapping::from_unbiased(args.unbiased || ctx.config.unbiased);
    let token = keygen::generate(length, mapping).context("generate API key")?;

    println!("Generated API Key: {}", token.as_str());

    if args.dry_run {
        println!("Dry run: {} not modified", ctx.paths.properties.display());
        return Ok(());
    }

    let write_mode = if args.atomic {
        WriteMode::Atomic
    } else {
        ctx.config.write_mode
    };
    let request = UpdateRequest::new(&ctx.paths.properties)
        .property(ctx.property.as_str())
        .write_mode(write_mode)
        .locked(args.lock || ctx.config.lock);

    let report = updater::append_key(&request, &token)
        .with_context(|| format!("add API key to {}", ctx.paths.properties.display()))?;

    println!(
        "API Key successfully added to {} (line {}, {} keys accepted)",
        report.path.display(),
        report.change.index() + 1,
        report.key_count
    );
    Ok(())
}
