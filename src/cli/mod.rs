//! CLI routing and command dispatch.

use crate::core::paths::TargetPaths;
use crate::core::settings;
use crate::models::config::KeygenSection;
use crate::util::logging;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod check;
pub mod doctor;
pub mod generate;
pub mod list;

/// Shared context passed to all command handlers.
pub struct CliContext {
    pub paths: TargetPaths,
    /// Property holding the accepted keys.
    pub property: String,
    pub config: KeygenSection,
    pub config_path: PathBuf,
}

fn parse_property(s: &str) -> Result<String, String> {
    settings::validate_property(s)?;
    Ok(s.to_string())
}

#[derive(Parser, Debug)]
#[command(
    name = "apikey-gen",
    version,
    about = "Generate API keys and register them in a Spring application.properties file"
)]
pub struct Cli {
    /// Properties file to operate on
    #[arg(long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Configuration file (default: ./apikey-gen.toml if present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Property holding the comma-separated accepted keys
    #[arg(long, global = true, value_name = "KEY", value_parser = parse_property)]
    pub property: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        logging::init(if self.verbose {
            logging::VERBOSE_FILTER
        } else {
            logging::DEFAULT_FILTER
        });

        let (config_path, required) = settings::locate(self.config);
        let config = settings::load(&config_path, required)
            .with_context(|| format!("load configuration {}", config_path.display()))?
            .keygen;

        let property = self.property.unwrap_or_else(|| config.property.clone());
        let paths = TargetPaths::resolve(self.file, config.properties_path.clone());
        tracing::debug!(target_file = %paths, %property, "resolved target");

        let ctx = CliContext {
            paths,
            property,
            config,
            config_path,
        };

        match self.command {
            Commands::Generate(args) => generate::run(&ctx, args),
            Commands::List(args) => list::run(&ctx, args),
            Commands::Check(args) => check::run(&ctx, args),
            Commands::Doctor(args) => doctor::run(&ctx, args),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new API key and append it to the properties file
    Generate(generate::GenerateArgs),
    /// List the API keys currently accepted
    List(list::ListArgs),
    /// Check whether an API key is accepted
    Check(check::CheckArgs),
    /// Diagnose the properties file and entropy source (read-only)
    Doctor(doctor::DoctorArgs),
}
