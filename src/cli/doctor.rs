//! Diagnostics for the properties file and entropy source.

use crate::cli::CliContext;
use crate::core::file_lock::FileLock;
use crate::core::keygen::{self, is_alphabet_key, Mapping};
use crate::core::updater;
use crate::util::fs as keygen_fs;
use anyhow::{bail, Result};
use clap::Args;

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Also report whether another run currently holds the update lock
    #[arg(long)]
    pub lock: bool,
}

#[derive(Default)]
struct Tally {
    ok: u32,
    warn: u32,
    fail: u32,
}

impl Tally {
    fn pass(&mut self, msg: impl AsRef<str>) {
        println!("  [PASS] {}", msg.as_ref());
        self.ok += 1;
    }

    fn warn(&mut self, msg: impl AsRef<str>) {
        println!("  [WARN] {}", msg.as_ref());
        self.warn += 1;
    }

    fn fail(&mut self, msg: impl AsRef<str>) {
        println!("  [FAIL] {}", msg.as_ref());
        self.fail += 1;
    }
}

pub fn run(ctx: &CliContext, args: DoctorArgs) -> Result<()> {
    let paths = &ctx.paths;
    let property = ctx.property.as_str();
    let mut tally = Tally::default();

    println!("Doctor: {}", paths);
    if ctx.config_path.is_file() {
        println!("  [INFO] configuration: {}", ctx.config_path.display());
    }

    match keygen::generate(1, Mapping::Modulo) {
        Ok(_) => tally.pass("entropy source readable"),
        Err(e) => tally.fail(format!("{:#}", anyhow::Error::from(e))),
    }

    if !paths.properties.is_file() {
        tally.fail(format!("properties file missing: {}", paths.properties.display()));
        return summary(&tally);
    }
    tally.pass(format!("properties file exists: {}", paths.properties.display()));

    let doc = match updater::read_document(&paths.properties) {
        Ok(doc) => {
            tally.pass("properties file readable");
            doc
        }
        Err(e) => {
            tally.fail(format!("{:#}", anyhow::Error::from(e)));
            return summary(&tally);
        }
    };

    if keygen_fs::is_writable(&paths.properties) {
        tally.pass("properties file writable");
    } else {
        tally.fail("properties file not writable (generate will fail)");
    }

    match doc.count_key_lines(property) {
        0 => tally.warn(format!(
            "{} not present (generate will append a new line)",
            property
        )),
        1 => tally.pass(format!("{} present", property)),
        n => tally.warn(format!(
            "{} appears on {} lines; only the first is updated",
            property, n
        )),
    }

    let keys = doc.key_values(property);
    if keys.is_empty() {
        tally.warn(format!("{} accepts no keys", property));
    } else {
        tally.pass(format!("{} accepts {} keys", property, keys.len()));
    }
    let odd = keys.iter().filter(|k| !is_alphabet_key(k)).count();
    if odd > 0 {
        tally.warn(format!("{} keys use characters outside A-Za-z0-9", odd));
    }

    if args.lock {
        if !paths.lock.exists() {
            println!("  [INFO] no lock file: {}", paths.lock.display());
        } else {
            match FileLock::try_exclusive(&paths.lock) {
                Ok(Some(_)) => tally.pass(format!("lock free: {}", paths.lock.display())),
                Ok(None) => tally.warn(format!(
                    "lock held by another run: {}",
                    paths.lock.display()
                )),
                Err(e) => tally.warn(format!("{:#}", anyhow::Error::from(e))),
            }
        }
    }

    summary(&tally)
}

fn summary(tally: &Tally) -> Result<()> {
    println!();
    println!(
        "Doctor summary: {} pass, {} warn, {} fail",
        tally.ok, tally.warn, tally.fail
    );
    if tally.fail > 0 {
        bail!("doctor found {} failing checks", tally.fail);
    }
    Ok(())
}
