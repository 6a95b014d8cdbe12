//! # albo-cli — CLI Tool for the Albo Platform
//!
//! Provides the `albo` command-line interface for working with vendor
//! register fixtures offline: compliance evaluation, dashboard
//! aggregation, expiry sweeps, and catalog inspection.
//!
//! ## Subcommands
//!
//! - `albo evaluate` — Compliance report for a single vendor.
//! - `albo dashboard` — Grouped counts and headline summaries.
//! - `albo recompute` — Flip lapsed documents to `EXPIRED`.
//! - `albo catalog` — Inspect the standard catalogs.
//!
//! Fixture files are the same JSON/YAML snapshots the API can export,
//! so a production register can be inspected from a shell:
//!
//! ```bash
//! albo evaluate --fixture register.yaml --vendor FRN-2025-001
//! albo dashboard --fixture register.yaml --dimensions region,category
//! albo recompute --fixture register.yaml --as-of 2025-06-01 --write
//! ```

pub mod catalog;
pub mod dashboard;
pub mod evaluate;
pub mod recompute;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use albo_registry::{Registry, RegistryFixture};

/// Parse an optional `--as-of` argument, defaulting to today.
pub fn resolve_as_of(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        None => Ok(chrono::Utc::now().date_naive()),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("invalid --as-of date '{raw}', expected YYYY-MM-DD")),
    }
}

/// Load a fixture file and replay it into a register.
pub fn load_registry(path: &Path) -> Result<Registry> {
    let fixture = RegistryFixture::load_path(path)
        .with_context(|| format!("loading fixture {}", path.display()))?;
    fixture
        .into_registry()
        .with_context(|| format!("replaying fixture {}", path.display()))
}
