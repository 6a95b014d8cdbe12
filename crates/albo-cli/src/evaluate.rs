//! Vendor compliance evaluation subcommand.
//!
//! Loads a fixture register, resolves the named vendor's requirements,
//! and prints the resulting report as pretty JSON or, with `--summary`,
//! as a short human-readable gap list.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use albo_engine::{evaluate, ComplianceReport, RequirementRef, RequirementResolver, VendorSnapshot};

/// Arguments for the `evaluate` subcommand.
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Fixture file holding the register (JSON or YAML by extension).
    #[arg(long, value_name = "FILE")]
    pub fixture: PathBuf,

    /// Vendor code to evaluate, e.g. FRN-2025-001.
    #[arg(long, value_name = "CODE")]
    pub vendor: String,

    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_name = "DATE")]
    pub as_of: Option<String>,

    /// Print a human-readable gap list instead of JSON.
    #[arg(long)]
    pub summary: bool,
}

/// Execute the evaluate subcommand.
///
/// Returns the process exit code: `0` when the vendor is fully
/// compliant at the evaluation date, `1` when gaps remain or the
/// vendor code is unknown.
pub fn run_evaluate(args: &EvaluateArgs) -> Result<u8> {
    let registry = crate::load_registry(&args.fixture)?;
    let as_of = crate::resolve_as_of(args.as_of.as_deref())?;

    let Some(vendor) = registry.vendor_by_code(&args.vendor) else {
        println!(
            "ERROR: no vendor with code {} in {}",
            args.vendor,
            args.fixture.display()
        );
        return Ok(1);
    };
    let vendor_id = vendor.id;
    let company_name = vendor.company_name.clone();

    let resolver = RequirementResolver::from_registry(&registry);
    let snapshot = VendorSnapshot::from_registry(&registry, vendor_id)
        .context("collecting the vendor's records")?;
    let report = evaluate(&resolver, &snapshot, as_of).context("evaluating compliance")?;

    if args.summary {
        print_summary(&report, &company_name);
    } else {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("encoding the report")?
        );
    }

    Ok(if report.is_fully_compliant { 0 } else { 1 })
}

fn print_summary(report: &ComplianceReport, company_name: &str) {
    println!("Vendor {} — {}", report.vendor_code, company_name);
    let verdict = if report.is_fully_compliant {
        "COMPLIANT"
    } else {
        "NOT COMPLIANT"
    };
    println!("As of {}: {}", report.as_of, verdict);

    let gaps = report.missing_competences.len()
        + report.missing_documents.len()
        + report.expired_competences.len()
        + report.expired_documents.len()
        + report.expiring_competences.len()
        + report.expiring_documents.len();
    if gaps == 0 {
        println!("  No gaps.");
        return;
    }

    print_bucket("MISSING ", "competence", &report.missing_competences);
    print_bucket("MISSING ", "document  ", &report.missing_documents);
    print_bucket("EXPIRED ", "competence", &report.expired_competences);
    print_bucket("EXPIRED ", "document  ", &report.expired_documents);
    print_bucket("EXPIRING", "competence", &report.expiring_competences);
    print_bucket("EXPIRING", "document  ", &report.expiring_documents);
}

fn print_bucket(label: &str, kind: &str, entries: &[RequirementRef]) {
    for entry in entries {
        println!("  {} {} {} — {}", label, kind, entry.code, entry.name);
    }
}
