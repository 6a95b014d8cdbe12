//! # Catalog Domains
//!
//! Closed enums classifying catalog entries. Every competence definition
//! belongs to exactly one [`CompetenceDomain`] and every document type to
//! exactly one [`DocumentDomain`]; dashboards group by these, so the sets
//! are fixed at compile time rather than free-form strings.

use serde::{Deserialize, Serialize};

/// Domain of a competence definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetenceDomain {
    /// Workplace safety roles and training.
    Safety,
    /// Trade and plant qualifications.
    Technical,
    /// Energy services and efficiency.
    Energy,
    /// Quality management.
    Quality,
    /// Auditor qualifications.
    Audit,
}

impl CompetenceDomain {
    /// Number of competence domains.
    pub const COUNT: usize = 5;

    /// All competence domains, in display order.
    pub fn all() -> [CompetenceDomain; Self::COUNT] {
        [
            Self::Safety,
            Self::Technical,
            Self::Energy,
            Self::Quality,
            Self::Audit,
        ]
    }

    /// Return the string representation of this domain.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safety => "safety",
            Self::Technical => "technical",
            Self::Energy => "energy",
            Self::Quality => "quality",
            Self::Audit => "audit",
        }
    }
}

impl std::fmt::Display for CompetenceDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain of a document type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentDomain {
    /// Company registry and legal standing.
    Legal,
    /// Balance sheets and bank references.
    Financial,
    /// Liability and insurance cover.
    Insurance,
    /// Safety plans and risk assessments.
    Safety,
    /// Management-system certifications.
    Certification,
    /// Technical capability evidence.
    Technical,
}

impl DocumentDomain {
    /// Number of document domains.
    pub const COUNT: usize = 6;

    /// All document domains, in display order.
    pub fn all() -> [DocumentDomain; Self::COUNT] {
        [
            Self::Legal,
            Self::Financial,
            Self::Insurance,
            Self::Safety,
            Self::Certification,
            Self::Technical,
        ]
    }

    /// Return the string representation of this domain.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legal => "legal",
            Self::Financial => "financial",
            Self::Insurance => "insurance",
            Self::Safety => "safety",
            Self::Certification => "certification",
            Self::Technical => "technical",
        }
    }
}

impl std::fmt::Display for DocumentDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn competence_domains_are_distinct() {
        let set: HashSet<_> = CompetenceDomain::all().into_iter().collect();
        assert_eq!(set.len(), CompetenceDomain::COUNT);
    }

    #[test]
    fn document_domains_are_distinct() {
        let set: HashSet<_> = DocumentDomain::all().into_iter().collect();
        assert_eq!(set.len(), DocumentDomain::COUNT);
    }

    #[test]
    fn serde_roundtrip() {
        for domain in CompetenceDomain::all() {
            let json = serde_json::to_string(&domain).unwrap();
            let back: CompetenceDomain = serde_json::from_str(&json).unwrap();
            assert_eq!(back, domain);
        }
        for domain in DocumentDomain::all() {
            let json = serde_json::to_string(&domain).unwrap();
            let back: DocumentDomain = serde_json::from_str(&json).unwrap();
            assert_eq!(back, domain);
        }
    }

    #[test]
    fn serde_names_are_snake_case() {
        assert_eq!(
            serde_json::to_string(&DocumentDomain::Certification).unwrap(),
            "\"certification\""
        );
        assert_eq!(
            serde_json::to_string(&CompetenceDomain::Energy).unwrap(),
            "\"energy\""
        );
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", CompetenceDomain::Audit), "audit");
        assert_eq!(format!("{}", DocumentDomain::Insurance), "insurance");
    }
}
