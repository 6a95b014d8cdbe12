//! # albo CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Every subcommand works on fixture files, so the binary never needs a
//! database or a running API to answer questions about a register.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use albo_cli::catalog::{run_catalog, CatalogArgs};
use albo_cli::dashboard::{run_dashboard, DashboardArgs};
use albo_cli::evaluate::{run_evaluate, EvaluateArgs};
use albo_cli::recompute::{run_recompute, RecomputeArgs};

/// Albo Platform CLI
///
/// Offline toolchain for vendor qualification registers. Evaluates
/// vendor compliance, aggregates dashboard counts, runs the document
/// expiry sweep, and inspects the standard catalogs.
#[derive(Parser, Debug)]
#[command(name = "albo", version = "0.3.7", about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a single vendor's compliance against a fixture register.
    Evaluate(EvaluateArgs),

    /// Aggregate a fixture register into dashboard counts and summaries.
    Dashboard(DashboardArgs),

    /// Flip lapsed documents to EXPIRED in a fixture register.
    Recompute(RecomputeArgs),

    /// Inspect the standard competence and document-type catalogs.
    Catalog(CatalogArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!("albo CLI starting");

    let result = match cli.command {
        Commands::Evaluate(args) => run_evaluate(&args),
        Commands::Dashboard(args) => run_dashboard(&args),
        Commands::Recompute(args) => run_recompute(&args),
        Commands::Catalog(args) => run_catalog(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn cli_parse_evaluate_basic() {
        let cli = Cli::try_parse_from([
            "albo",
            "evaluate",
            "--fixture",
            "register.json",
            "--vendor",
            "FRN-2025-001",
        ])
        .unwrap();
        if let Commands::Evaluate(args) = cli.command {
            assert_eq!(args.fixture, PathBuf::from("register.json"));
            assert_eq!(args.vendor, "FRN-2025-001");
            assert!(args.as_of.is_none());
            assert!(!args.summary);
        } else {
            panic!("expected evaluate subcommand");
        }
    }

    #[test]
    fn cli_parse_evaluate_with_all_options() {
        let cli = Cli::try_parse_from([
            "albo",
            "evaluate",
            "--fixture",
            "register.yaml",
            "--vendor",
            "FRN-2025-002",
            "--as-of",
            "2025-06-01",
            "--summary",
        ])
        .unwrap();
        if let Commands::Evaluate(args) = cli.command {
            assert_eq!(args.as_of, Some("2025-06-01".to_string()));
            assert!(args.summary);
        }
    }

    #[test]
    fn cli_parse_evaluate_requires_vendor() {
        let result = Cli::try_parse_from(["albo", "evaluate", "--fixture", "register.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_dashboard_basic() {
        let cli =
            Cli::try_parse_from(["albo", "dashboard", "--fixture", "register.json"]).unwrap();
        if let Commands::Dashboard(args) = cli.command {
            assert_eq!(args.fixture, PathBuf::from("register.json"));
            assert!(args.dimensions.is_none());
        }
    }

    #[test]
    fn cli_parse_dashboard_with_dimensions() {
        let cli = Cli::try_parse_from([
            "albo",
            "dashboard",
            "--fixture",
            "register.json",
            "--dimensions",
            "region,category",
        ])
        .unwrap();
        if let Commands::Dashboard(args) = cli.command {
            assert_eq!(args.dimensions, Some("region,category".to_string()));
        }
    }

    #[test]
    fn cli_parse_recompute_dry_run() {
        let cli =
            Cli::try_parse_from(["albo", "recompute", "--fixture", "register.json"]).unwrap();
        if let Commands::Recompute(args) = cli.command {
            assert!(!args.write);
        }
    }

    #[test]
    fn cli_parse_recompute_with_write() {
        let cli = Cli::try_parse_from([
            "albo",
            "recompute",
            "--fixture",
            "register.yaml",
            "--as-of",
            "2025-06-01",
            "--write",
        ])
        .unwrap();
        if let Commands::Recompute(args) = cli.command {
            assert_eq!(args.as_of, Some("2025-06-01".to_string()));
            assert!(args.write);
        }
    }

    #[test]
    fn cli_parse_catalog_defaults() {
        let cli = Cli::try_parse_from(["albo", "catalog"]).unwrap();
        if let Commands::Catalog(args) = cli.command {
            assert!(!args.documents);
            assert!(!args.competences);
            assert!(!args.mandatory_only);
        }
    }

    #[test]
    fn cli_parse_catalog_documents_only() {
        let cli = Cli::try_parse_from(["albo", "catalog", "--documents", "--mandatory-only"])
            .unwrap();
        if let Commands::Catalog(args) = cli.command {
            assert!(args.documents);
            assert!(args.mandatory_only);
        }
    }

    #[test]
    fn cli_parse_catalog_refuses_both_filters() {
        let result = Cli::try_parse_from(["albo", "catalog", "--documents", "--competences"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_verbose_levels() {
        let cli0 = Cli::try_parse_from(["albo", "catalog"]).unwrap();
        assert_eq!(cli0.verbose, 0);

        let cli1 = Cli::try_parse_from(["albo", "-v", "catalog"]).unwrap();
        assert_eq!(cli1.verbose, 1);

        let cli2 = Cli::try_parse_from(["albo", "-vv", "catalog"]).unwrap();
        assert_eq!(cli2.verbose, 2);

        let cli3 = Cli::try_parse_from(["albo", "-vvv", "catalog"]).unwrap();
        assert_eq!(cli3.verbose, 3);
    }

    #[test]
    fn cli_parse_no_subcommand_errors() {
        let result = Cli::try_parse_from(["albo"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_invalid_subcommand_errors() {
        let result = Cli::try_parse_from(["albo", "nonexistent"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_debug_impl() {
        let cli = Cli::try_parse_from(["albo", "catalog"]).unwrap();
        let debug = format!("{cli:?}");
        assert!(debug.contains("Cli"));
    }

    #[test]
    fn commands_debug_impl() {
        let cli = Cli::try_parse_from(["albo", "catalog"]).unwrap();
        let debug = format!("{:?}", cli.command);
        assert!(debug.contains("Catalog"));
    }
}
