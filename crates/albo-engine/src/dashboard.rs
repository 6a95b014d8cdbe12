//! # Dashboard Aggregation
//!
//! Groups the vendor base along the reporting dimensions and produces
//! the headline counters the dashboard endpoints serve. All functions
//! here are pure folds over borrowed register state.
//!
//! Vendors with no value for a grouping dimension land in the
//! [`UNSPECIFIED_KEY`] bucket instead of disappearing from the totals.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use albo_core::{DocumentStatus, QualificationStatus, RiskLevel, ValidationError};
use albo_registry::hierarchy::CategoryArena;
use albo_registry::{CompetenceAssignment, CompetenceCatalog, Registry, Vendor};

use crate::expiry::{classify, ExpiryStatus};

/// Bucket key for vendors missing a value on the grouped dimension.
pub const UNSPECIFIED_KEY: &str = "Non specificato";

const QUALITY_BUCKETS: [&str; 5] = ["0-1", "1-2", "2-3", "3-4", "4-5"];
const FULFILLMENT_BUCKETS: [&str; 5] = ["0-20%", "20-40%", "40-60%", "60-80%", "80-100%"];

/// The dimensions the dashboard can group vendors by.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Category name from the hierarchy.
    Category,
    /// Free-text region on the vendor record.
    Region,
    /// Assessed risk level.
    Risk,
    /// Average quality rating, in unit-wide buckets.
    Quality,
    /// Order fulfillment rate, in 20-point buckets.
    Fulfillment,
    /// Claimed competences, one bucket per catalog entry.
    Competence,
    /// Certified competences, one bucket per catalog entry.
    Certification,
    /// Legal form of the vendor.
    VendorType,
    /// Free-text service type on the vendor record.
    ServiceType,
}

impl Dimension {
    /// The number of reporting dimensions.
    pub const COUNT: usize = 9;

    /// All dimensions, in report order.
    pub fn all() -> [Dimension; Self::COUNT] {
        [
            Self::Category,
            Self::Region,
            Self::Risk,
            Self::Quality,
            Self::Fulfillment,
            Self::Competence,
            Self::Certification,
            Self::VendorType,
            Self::ServiceType,
        ]
    }

    /// Return the string representation of this dimension.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Region => "region",
            Self::Risk => "risk",
            Self::Quality => "quality",
            Self::Fulfillment => "fulfillment",
            Self::Competence => "competence",
            Self::Certification => "certification",
            Self::VendorType => "vendor_type",
            Self::ServiceType => "service_type",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Dimension {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "category" => Ok(Self::Category),
            "region" => Ok(Self::Region),
            "risk" => Ok(Self::Risk),
            "quality" => Ok(Self::Quality),
            "fulfillment" => Ok(Self::Fulfillment),
            "competence" => Ok(Self::Competence),
            "certification" => Ok(Self::Certification),
            "vendor_type" => Ok(Self::VendorType),
            "service_type" => Ok(Self::ServiceType),
            other => Err(ValidationError::UnknownDimension(other.to_string())),
        }
    }
}

/// Parse a comma-separated dimension list, as passed on query strings
/// and command lines. Blank segments are skipped; a list with no
/// usable segment selects every dimension.
pub fn parse_dimensions(raw: &str) -> Result<Vec<Dimension>, ValidationError> {
    let mut dimensions = Vec::new();
    for segment in raw.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        dimensions.push(segment.parse()?);
    }
    if dimensions.is_empty() {
        dimensions.extend(Dimension::all());
    }
    Ok(dimensions)
}

/// One bucket of a grouped count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCount {
    /// Bucket label.
    pub key: String,
    /// Number of vendors (or claims) in the bucket.
    pub count: usize,
}

/// Borrowed view of the register slices the dashboard reads.
pub struct DashboardInput<'a> {
    /// All vendor records.
    pub vendors: Vec<&'a Vendor>,
    /// All competence assignments.
    pub assignments: Vec<&'a CompetenceAssignment>,
    /// The competence catalog, for bucket labels.
    pub competences: &'a CompetenceCatalog,
    /// The category hierarchy, for bucket labels.
    pub categories: &'a CategoryArena,
}

impl<'a> DashboardInput<'a> {
    /// Collect the dashboard slices from the register.
    pub fn from_registry(registry: &'a Registry) -> Self {
        Self {
            vendors: registry.vendors().collect(),
            assignments: registry.assignments().collect(),
            competences: registry.competences(),
            categories: registry.arena(),
        }
    }
}

/// Headline vendor counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorSummary {
    /// All vendor records.
    pub total: usize,
    /// Vendors flagged active.
    pub active: usize,
    /// Vendors with an approved qualification.
    pub approved: usize,
    /// Vendors still awaiting qualification.
    pub pending_qualification: usize,
    /// Vendors assessed high risk.
    pub high_risk: usize,
    /// Vendors approved with an unexpired qualification at the
    /// reporting date.
    pub qualified: usize,
    /// Vendors whose next audit date has passed.
    pub audit_overdue: usize,
}

/// Headline document counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Documents waiting on a review decision.
    pub pending_review: usize,
    /// Possessed documents inside their alert window at the reporting
    /// date.
    pub expiring_soon: usize,
    /// All documents, counted per stored status.
    pub by_status: BTreeMap<String, usize>,
}

/// Group the vendor base along the requested dimensions.
///
/// Buckets are ordered by descending count, ties broken by key, except
/// for [`Dimension::Quality`] and [`Dimension::Fulfillment`] which keep
/// their natural ascending bucket order. Empty buckets are omitted and
/// the unspecified bucket always sorts last on the fixed-order
/// dimensions.
pub fn aggregate(
    input: &DashboardInput<'_>,
    dimensions: &[Dimension],
) -> BTreeMap<Dimension, Vec<BucketCount>> {
    let mut report = BTreeMap::new();
    for &dimension in dimensions {
        let buckets = match dimension {
            Dimension::Category => vendor_buckets(input, |v| {
                v.category
                    .and_then(|id| input.categories.get(id))
                    .map(|c| c.name.clone())
            }),
            Dimension::Region => vendor_buckets(input, |v| text_value(v.region.as_deref())),
            Dimension::Risk => {
                vendor_buckets(input, |v| Some(v.risk_level.as_str().to_string()))
            }
            Dimension::Quality => fixed_order_buckets(input, &QUALITY_BUCKETS, |v| {
                v.quality_rating_avg.map(quality_bucket)
            }),
            Dimension::Fulfillment => fixed_order_buckets(input, &FULFILLMENT_BUCKETS, |v| {
                v.fulfillment_rate.map(fulfillment_bucket)
            }),
            Dimension::Competence => claim_buckets(input, |a| a.has_competence),
            Dimension::Certification => claim_buckets(input, |a| a.has_certification),
            Dimension::VendorType => vendor_buckets(input, |v| {
                v.vendor_type.map(|t| t.as_str().to_string())
            }),
            Dimension::ServiceType => {
                vendor_buckets(input, |v| text_value(v.service_type.as_deref()))
            }
        };
        report.insert(dimension, buckets);
    }
    report
}

/// Compute the headline vendor counters at `as_of`.
pub fn summarize(input: &DashboardInput<'_>, as_of: NaiveDate) -> VendorSummary {
    let mut summary = VendorSummary {
        total: 0,
        active: 0,
        approved: 0,
        pending_qualification: 0,
        high_risk: 0,
        qualified: 0,
        audit_overdue: 0,
    };
    for vendor in &input.vendors {
        summary.total += 1;
        if vendor.active {
            summary.active += 1;
        }
        match vendor.qualification_status {
            QualificationStatus::Approved => summary.approved += 1,
            QualificationStatus::Pending => summary.pending_qualification += 1,
            QualificationStatus::Rejected => {}
        }
        if vendor.risk_level == RiskLevel::High {
            summary.high_risk += 1;
        }
        if vendor.is_qualified(as_of) {
            summary.qualified += 1;
        }
        if vendor.audit_overdue(as_of) {
            summary.audit_overdue += 1;
        }
    }
    summary
}

/// Compute the headline document counters at `as_of`.
pub fn document_summary(registry: &Registry, as_of: NaiveDate) -> DocumentSummary {
    let mut by_status: BTreeMap<String, usize> = BTreeMap::new();
    let mut pending_review = 0;
    let mut expiring_soon = 0;
    for document in registry.documents() {
        *by_status
            .entry(document.status.as_str().to_string())
            .or_default() += 1;
        if matches!(
            document.status,
            DocumentStatus::Submitted | DocumentStatus::UnderReview
        ) {
            pending_review += 1;
        }
        if document.status.is_possessed() {
            if let Some(def) = registry.document_types().get(document.document_type_id) {
                let status = classify(document.expiry_date, def.alert_days_before_expiry, as_of);
                if status == ExpiryStatus::ExpiringSoon {
                    expiring_soon += 1;
                }
            }
        }
    }
    DocumentSummary {
        pending_review,
        expiring_soon,
        by_status,
    }
}

fn text_value(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Quality ratings live on a 0 to 5 scale; buckets are half open with
/// the top bucket closed at 5.
fn quality_bucket(value: f64) -> &'static str {
    if value < 1.0 {
        "0-1"
    } else if value < 2.0 {
        "1-2"
    } else if value < 3.0 {
        "2-3"
    } else if value < 4.0 {
        "3-4"
    } else {
        "4-5"
    }
}

/// Fulfillment rates live on a 0 to 100 scale; buckets are half open
/// with the top bucket closed at 100.
fn fulfillment_bucket(value: f64) -> &'static str {
    if value < 20.0 {
        "0-20%"
    } else if value < 40.0 {
        "20-40%"
    } else if value < 60.0 {
        "40-60%"
    } else if value < 80.0 {
        "60-80%"
    } else {
        "80-100%"
    }
}

fn vendor_buckets(
    input: &DashboardInput<'_>,
    key_of: impl Fn(&Vendor) -> Option<String>,
) -> Vec<BucketCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for vendor in &input.vendors {
        let key = key_of(vendor).unwrap_or_else(|| UNSPECIFIED_KEY.to_string());
        *counts.entry(key).or_default() += 1;
    }
    let mut buckets: Vec<BucketCount> = counts
        .into_iter()
        .map(|(key, count)| BucketCount { key, count })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    buckets
}

fn fixed_order_buckets(
    input: &DashboardInput<'_>,
    order: &[&'static str],
    key_of: impl Fn(&Vendor) -> Option<&'static str>,
) -> Vec<BucketCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut unspecified = 0;
    for vendor in &input.vendors {
        match key_of(vendor) {
            Some(key) => *counts.entry(key).or_default() += 1,
            None => unspecified += 1,
        }
    }
    let mut buckets = Vec::new();
    for &key in order {
        if let Some(count) = counts.remove(key) {
            buckets.push(BucketCount {
                key: key.to_string(),
                count,
            });
        }
    }
    if unspecified > 0 {
        buckets.push(BucketCount {
            key: UNSPECIFIED_KEY.to_string(),
            count: unspecified,
        });
    }
    buckets
}

/// One bucket per catalog entry, counting assignments that pass the
/// filter. Assignments pointing at entries no longer in the catalog
/// are skipped.
fn claim_buckets(
    input: &DashboardInput<'_>,
    keep: impl Fn(&CompetenceAssignment) -> bool,
) -> Vec<BucketCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for assignment in &input.assignments {
        if !keep(assignment) {
            continue;
        }
        let Some(def) = input.competences.get(assignment.competence_id) else {
            continue;
        };
        *counts.entry(def.name.clone()).or_default() += 1;
    }
    let mut buckets: Vec<BucketCount> = counts
        .into_iter()
        .map(|(key, count)| BucketCount { key, count })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    buckets
}
