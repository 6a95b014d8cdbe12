//! # Entity Identifiers
//!
//! Newtypes for every entity class in the stack. Record and catalog
//! identifiers are UUID-based and always valid by construction; the
//! human-facing [`VendorCode`] is validated at construction time.
//!
//! ## Validation
//!
//! [`VendorCode`] must be exactly 10 uppercase alphanumeric characters.
//! `Deserialize` routes through [`VendorCode::new`], so a malformed code
//! can never enter the system through a fixture or an API payload.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an identifier from an existing UUID.
            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

uuid_id! {
    /// Unique identifier of a vendor record.
    VendorId
}

uuid_id! {
    /// Unique identifier of a category node in the hierarchy.
    CategoryId
}

uuid_id! {
    /// Unique identifier of a competence catalog entry.
    CompetenceId
}

uuid_id! {
    /// Unique identifier of a document-type catalog entry.
    DocumentTypeId
}

uuid_id! {
    /// Unique identifier of a vendor document record.
    DocumentId
}

uuid_id! {
    /// Unique identifier of a vendor-competence assignment.
    AssignmentId
}

// -- VendorCode ---------------------------------------------------------------

/// The number of characters in a vendor code.
pub const VENDOR_CODE_LEN: usize = 10;

/// Human-facing vendor code: exactly 10 uppercase alphanumeric characters,
/// unique per vendor and immutable once generated.
///
/// Codes are generated from a fresh UUID's hex form, so collisions are
/// practically impossible; uniqueness is still enforced by the store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct VendorCode(String);

impl VendorCode {
    /// Create a vendor code from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidVendorCode`] unless the input is
    /// exactly 10 uppercase alphanumeric characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let valid = value.len() == VENDOR_CODE_LEN
            && value
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
        if !valid {
            return Err(ValidationError::InvalidVendorCode(value));
        }
        Ok(Self(value))
    }

    /// Generate a fresh vendor code from a random UUID.
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string().to_uppercase();
        Self(hex[..VENDOR_CODE_LEN].to_string())
    }

    /// Access the code string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for VendorCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for VendorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// -- EntityKind ---------------------------------------------------------------

/// The entity classes the store manages, used in error reporting so a
/// `NotFound` names what was being looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A vendor record.
    Vendor,
    /// A category node.
    Category,
    /// A competence catalog entry.
    Competence,
    /// A document-type catalog entry.
    DocumentType,
    /// A vendor document record.
    Document,
    /// A vendor-competence assignment.
    Assignment,
}

impl EntityKind {
    /// Return the string representation of this entity kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vendor => "vendor",
            Self::Category => "category",
            Self::Competence => "competence",
            Self::DocumentType => "document_type",
            Self::Document => "document",
            Self::Assignment => "assignment",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
