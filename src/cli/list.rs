use crate::cli::CliContext;
use crate::constants::MASK_VISIBLE_CHARS;
use crate::core::keygen::is_alphabet_key;
use crate::core::updater;
use anyhow::{bail, Context, Result};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Table};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output format: table|json
    #[arg(long, default_value = "table")]
    pub format: String,

    /// Show full keys instead of masked prefixes
    #[arg(long)]
    pub reveal: bool,
}

#[derive(Serialize)]
struct ListItem {
    position: usize,
    key: String,
    length: usize,
    alphabet: bool,
}

/// Keep the first few characters of a key and hide the rest.
pub fn mask(key: &str) -> String {
    let count = key.chars().count();
    if count <= MASK_VISIBLE_CHARS {
        return "*".repeat(count);
    }
    let prefix: String = key.chars().take(MASK_VISIBLE_CHARS).collect();
    format!("{}…", prefix)
}

pub fn run(ctx: &CliContext, args: ListArgs) -> Result<()> {
    if args.format != "table" && args.format != "json" {
        bail!("invalid format: {} (use table|json)", args.format);
    }

    let path = &ctx.paths.properties;
    let doc = updater::read_document(path)
        .with_context(|| format!("list API keys in {}", path.display()))?;

    let items: Vec<ListItem> = doc
        .key_values(&ctx.property)
        .into_iter()
        .enumerate()
        .map(|(i, key)| ListItem {
            position: i + 1,
            length: key.chars().count(),
            alphabet: is_alphabet_key(&key),
            key: if args.reveal { key } else { mask(&key) },
        })
        .collect();

    if args.format == "json" {
        let json = serde_json::to_string_pretty(&items).context("serialize list")?;
        println!("{}", json);
        return Ok(());
    }

    if items.is_empty() {
        println!("No API keys found for {} in {}", ctx.property, path.display());
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Key").add_attribute(Attribute::Bold),
        Cell::new("Length").add_attribute(Attribute::Bold),
        Cell::new("Alphabet").add_attribute(Attribute::Bold),
    ]);

    for item in &items {
        table.add_row(vec![
            item.position.to_string(),
            item.key.clone(),
            item.length.to_string(),
            if item.alphabet { "yes" } else { "no" }.to_string(),
        ]);
    }

    println!("{}", table);
    println!("\n{} keys accepted by {}.", items.len(), ctx.property);
    Ok(())
}
