use crate::cli::CliContext;
use crate::core::updater;
use anyhow::{bail, Context, Result};
use clap::Args;
use std::io::Read;
use zeroize::Zeroizing;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Key to look up (prefer --from-stdin to keep it out of shell history)
    #[arg(required_unless_present = "from_stdin", conflicts_with = "from_stdin")]
    pub key: Option<String>,

    /// Read the key from stdin
    #[arg(long)]
    pub from_stdin: bool,
}

/// Whether `candidate` is in `accepted`, comparing trimmed values.
pub fn is_accepted(accepted: &[String], candidate: &str) -> bool {
    let candidate = candidate.trim();
    !candidate.is_empty() && accepted.iter().any(|k| k == candidate)
}

pub fn run(ctx: &CliContext, args: CheckArgs) -> Result<()> {
    let candidate = match args.key {
        Some(key) => Zeroizing::new(key),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read key from stdin")?;
            Zeroizing::new(buf)
        }
    };

    let path = &ctx.paths.properties;
    let doc = updater::read_document(path)
        .with_context(|| format!("check API key against {}", path.display()))?;
    let accepted = Zeroizing::new(doc.key_values(&ctx.property));

    if !is_accepted(&accepted, &candidate) {
        bail!("key is not accepted by {} in {}", ctx.property, path.display());
    }
    println!("Key accepted by {}", ctx.property);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_accepted_trims() {
        let accepted = vec!["abc".to_string(), "xyz".to_string()];
        assert!(is_accepted(&accepted, "xyz"));
        assert!(is_accepted(&accepted, " abc\n"));
        assert!(!is_accepted(&accepted, "ab"));
        assert!(!is_accepted(&accepted, ""));
        assert!(!is_accepted(&accepted, "   "));
    }
}
