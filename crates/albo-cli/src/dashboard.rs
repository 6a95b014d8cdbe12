//! Dashboard aggregation subcommand.
//!
//! Loads a fixture register and prints one JSON document holding the
//! headline vendor counters, the document counters, and the grouped
//! counts for the requested dimensions.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use albo_engine::{aggregate, document_summary, parse_dimensions, summarize, DashboardInput};

/// Arguments for the `dashboard` subcommand.
#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Fixture file holding the register (JSON or YAML by extension).
    #[arg(long, value_name = "FILE")]
    pub fixture: PathBuf,

    /// Comma-separated dimension list, e.g. region,category. All
    /// dimensions when omitted.
    #[arg(long, value_name = "LIST")]
    pub dimensions: Option<String>,

    /// Reference date for expiry-sensitive counters (YYYY-MM-DD).
    /// Defaults to today.
    #[arg(long, value_name = "DATE")]
    pub as_of: Option<String>,
}

/// Execute the dashboard subcommand.
///
/// Returns `0` on success and `1` when the dimension list names an
/// unknown dimension.
pub fn run_dashboard(args: &DashboardArgs) -> Result<u8> {
    let registry = crate::load_registry(&args.fixture)?;
    let as_of = crate::resolve_as_of(args.as_of.as_deref())?;

    let dimensions = match parse_dimensions(args.dimensions.as_deref().unwrap_or("")) {
        Ok(dimensions) => dimensions,
        Err(e) => {
            println!("ERROR: {e}");
            return Ok(1);
        }
    };

    let input = DashboardInput::from_registry(&registry);
    let stats = aggregate(&input, &dimensions);
    let vendors = summarize(&input, as_of);
    let documents = document_summary(&registry, as_of);

    let mut stats_json = serde_json::Map::new();
    for (dimension, buckets) in &stats {
        stats_json.insert(
            dimension.as_str().to_string(),
            serde_json::to_value(buckets).context("encoding bucket counts")?,
        );
    }
    let output = serde_json::json!({
        "as_of": as_of,
        "vendors": vendors,
        "documents": documents,
        "stats": stats_json,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("encoding the dashboard")?
    );

    Ok(0)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use albo_registry::{Registry, RegistryFixture, Vendor};

    use super::*;

    fn write_fixture(path: &Path, registry: &Registry) {
        RegistryFixture::from_registry(registry)
            .save_path(path)
            .unwrap();
    }

    fn seeded_path(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("register.json");
        let mut registry = Registry::new();
        registry
            .add_vendor(Vendor::new("Rossi Impianti S.r.l.").with_region("Lombardia"))
            .unwrap();
        registry
            .add_vendor(Vendor::new("Bianchi Costruzioni S.p.A.").with_region("Lombardia"))
            .unwrap();
        registry
            .add_vendor(Vendor::new("Verdi Servizi S.r.l."))
            .unwrap();
        write_fixture(&path, &registry);
        path
    }

    fn args(path: &Path, dimensions: Option<&str>) -> DashboardArgs {
        DashboardArgs {
            fixture: path.to_path_buf(),
            dimensions: dimensions.map(str::to_string),
            as_of: Some("2025-06-01".to_string()),
        }
    }

    #[test]
    fn all_dimensions_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = seeded_path(&dir);
        assert_eq!(run_dashboard(&args(&path, None)).unwrap(), 0);
    }

    #[test]
    fn explicit_dimension_list_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = seeded_path(&dir);
        assert_eq!(run_dashboard(&args(&path, Some("region,category"))).unwrap(), 0);
    }

    #[test]
    fn unknown_dimension_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = seeded_path(&dir);
        assert_eq!(run_dashboard(&args(&path, Some("shoe_size"))).unwrap(), 1);
    }

    #[test]
    fn missing_fixture_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        let err = run_dashboard(&args(&path, None)).unwrap_err();
        assert!(err.to_string().contains("absent.yaml"));
    }
}
