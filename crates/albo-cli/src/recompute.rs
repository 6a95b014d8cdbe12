//! Document expiry sweep subcommand.
//!
//! Replays a fixture register, flips every lapsed document to
//! `EXPIRED`, and reports how many records changed. The fixture file
//! itself is only rewritten with `--write`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use albo_registry::RegistryFixture;

/// Arguments for the `recompute` subcommand.
#[derive(Args, Debug)]
pub struct RecomputeArgs {
    /// Fixture file holding the register (JSON or YAML by extension).
    #[arg(long, value_name = "FILE")]
    pub fixture: PathBuf,

    /// Sweep date (YYYY-MM-DD). Documents expiring strictly before it
    /// are flipped. Defaults to today.
    #[arg(long, value_name = "DATE")]
    pub as_of: Option<String>,

    /// Write the updated register back to the fixture file.
    #[arg(long)]
    pub write: bool,
}

/// Execute the recompute subcommand.
pub fn run_recompute(args: &RecomputeArgs) -> Result<u8> {
    let mut registry = crate::load_registry(&args.fixture)?;
    let as_of = crate::resolve_as_of(args.as_of.as_deref())?;

    let updated = registry.recompute_expired_statuses(as_of);
    println!("{updated} document(s) flipped to EXPIRED as of {as_of}");

    if args.write {
        RegistryFixture::from_registry(&registry)
            .save_path(&args.fixture)
            .with_context(|| format!("writing fixture {}", args.fixture.display()))?;
        println!("Register written back to {}", args.fixture.display());
    } else if updated > 0 {
        println!("Dry run, pass --write to persist the change.");
    }

    Ok(0)
}
