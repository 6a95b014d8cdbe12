//! Standard catalog inspection subcommand.
//!
//! Prints the built-in competence and document-type catalogs, one line
//! per entry, sorted by code. Works without a fixture: the catalogs
//! ship with the register itself.

use anyhow::Result;
use clap::Args;

use albo_registry::Registry;

/// Arguments for the `catalog` subcommand.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Show only the document-type catalog.
    #[arg(long, conflicts_with = "competences")]
    pub documents: bool,

    /// Show only the competence catalog.
    #[arg(long)]
    pub competences: bool,

    /// Keep only entries the catalogs mark mandatory.
    #[arg(long)]
    pub mandatory_only: bool,
}

/// Execute the catalog subcommand. Prints both catalogs unless one of
/// the `--documents` / `--competences` filters narrows the output.
pub fn run_catalog(args: &CatalogArgs) -> Result<u8> {
    let registry = Registry::with_standard_catalogs();
    let both = !args.documents && !args.competences;

    if both || args.competences {
        print_competences(&registry, args.mandatory_only);
    }
    if both {
        println!();
    }
    if both || args.documents {
        print_document_types(&registry, args.mandatory_only);
    }

    Ok(0)
}

fn print_competences(registry: &Registry, mandatory_only: bool) {
    let mut entries = registry.competences().sorted_by_code();
    if mandatory_only {
        entries.retain(|def| def.mandatory);
    }

    println!("Competences: {}", entries.len());
    for def in entries {
        let mandatory = if def.mandatory { "  [mandatory]" } else { "" };
        let renewal = match def.renewal_period_months {
            Some(months) => format!("  (renews every {months} months)"),
            None => String::new(),
        };
        println!(
            "  {:<20} {:<12} {}{}{}",
            def.code,
            def.domain.as_str(),
            def.name,
            mandatory,
            renewal
        );
    }
}

fn print_document_types(registry: &Registry, mandatory_only: bool) {
    let mut entries = registry.document_types().sorted_by_code();
    if mandatory_only {
        entries.retain(|def| def.mandatory);
    }

    println!("Document types: {}", entries.len());
    for def in entries {
        let mandatory = if def.mandatory { "  [mandatory]" } else { "" };
        let validity = match def.default_validity_days {
            Some(days) => format!("  (valid {days} days)"),
            None => String::new(),
        };
        println!(
            "  {:<20} {:<12} {}{}{}",
            def.code,
            def.domain.as_str(),
            def.name,
            mandatory,
            validity
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(documents: bool, competences: bool, mandatory_only: bool) -> CatalogArgs {
        CatalogArgs {
            documents,
            competences,
            mandatory_only,
        }
    }

    #[test]
    fn both_catalogs_by_default() {
        assert_eq!(run_catalog(&args(false, false, false)).unwrap(), 0);
    }

    #[test]
    fn documents_only() {
        assert_eq!(run_catalog(&args(true, false, false)).unwrap(), 0);
    }

    #[test]
    fn competences_only_mandatory() {
        assert_eq!(run_catalog(&args(false, true, true)).unwrap(), 0);
    }

    #[test]
    fn standard_catalogs_are_not_empty() {
        let registry = Registry::with_standard_catalogs();
        assert!(!registry.competences().is_empty());
        assert!(!registry.document_types().is_empty());
    }

    #[test]
    fn mandatory_filter_narrows_the_list() {
        let registry = Registry::with_standard_catalogs();
        let all = registry.document_types().sorted_by_code().len();
        let mandatory = registry
            .document_types()
            .sorted_by_code()
            .into_iter()
            .filter(|def| def.mandatory)
            .count();
        assert!(mandatory < all);
        assert!(mandatory > 0);
    }
}
