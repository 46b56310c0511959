//! # Core Type Definitions
//!
//! This module contains the shared vocabulary of the variant specification engine:
//! - The flat assignment record (`Assignment`)
//! - Specification kind and source tags (`VariantSpecificationType`, `VariantSpecificationSource`)
//! - Error types (`VarspecError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Are plain owned data (`Send + Sync`), no interior mutability
//! - Preserve the order in which they were built; nothing is re-sorted behind the caller

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// ASSIGNMENT
// =============================================================================

/// One configured option: a variable code paired with one of its value codes.
///
/// A multi-valued variable appears as several assignments sharing the same
/// `variable_code`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// The variable (feature family) code, e.g. `C5X1`.
    pub variable_code: String,
    /// The selected value code, e.g. `0AW`.
    pub value_code: String,
}

impl Assignment {
    /// Create a new assignment.
    #[must_use]
    pub fn new(variable_code: impl Into<String>, value_code: impl Into<String>) -> Self {
        Self {
            variable_code: variable_code.into(),
            value_code: value_code.into(),
        }
    }
}

// =============================================================================
// SPECIFICATION TYPE
// =============================================================================

/// The flavour of variant specification requested from the authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantSpecificationType {
    /// Simplified form that can be downloaded to a vehicle.
    Downloadable,
    /// Full standard configuration.
    #[default]
    Standard,
}

impl VariantSpecificationType {
    /// Human readable name.
    #[must_use]
    pub const fn friendly_string(self) -> &'static str {
        match self {
            Self::Downloadable => "downloadable",
            Self::Standard => "standard",
        }
    }

    /// Path segment used in authority URIs.
    #[must_use]
    pub fn uri_path(self) -> String {
        self.friendly_string().to_lowercase()
    }
}

impl fmt::Display for VariantSpecificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.friendly_string())
    }
}

impl FromStr for VariantSpecificationType {
    type Err = VarspecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "downloadable" => Ok(Self::Downloadable),
            "standard" => Ok(Self::Standard),
            other => Err(VarspecError::ArgumentInvalid(format!(
                "unknown variant specification type '{other}'"
            ))),
        }
    }
}

// =============================================================================
// SPECIFICATION SOURCE
// =============================================================================

/// Where a variant specification version came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantSpecificationSource {
    /// The KDP configuration authority.
    #[default]
    Kdp,
    /// The alternate (OVP/PRINS) authority.
    Ovp,
    /// A frozen snapshot taken from another version.
    Snapshot,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the variant specification engine.
///
/// - No silent failures
/// - Use `Result<T, VarspecError>` for fallible operations
/// - The engine never panics; every error is returned to the caller, which
///   decides whether it is a user error or a data-integrity fault
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VarspecError {
    /// A required input was absent or unusable.
    #[error("Invalid argument: {0}")]
    ArgumentInvalid(String),

    /// The input exists but does not satisfy the operation's precondition.
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// No version in the collection satisfied the selection rule.
    #[error("No {collection} version available for order {order_id}")]
    NoMatchingVersion {
        /// The order whose collection was inspected.
        order_id: String,
        /// Which collection was empty.
        collection: &'static str,
    },

    /// Grouped or flat assignment data is malformed.
    #[error("Assignment data is malformed: {0}")]
    CodecIntegrity(String),

    /// A field failed validation.
    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        /// Field name as it appears on the wire.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specification_type_uri_path() {
        assert_eq!(VariantSpecificationType::Standard.uri_path(), "standard");
        assert_eq!(
            VariantSpecificationType::Downloadable.uri_path(),
            "downloadable"
        );
    }

    #[test]
    fn specification_type_parses_case_insensitively() {
        assert_eq!(
            "Downloadable".parse::<VariantSpecificationType>(),
            Ok(VariantSpecificationType::Downloadable)
        );
        assert!(matches!(
            "bogus".parse::<VariantSpecificationType>(),
            Err(VarspecError::ArgumentInvalid(_))
        ));
    }

    #[test]
    fn source_serializes_lowercase() {
        let json = serde_json::to_string(&VariantSpecificationSource::Snapshot).expect("json");
        assert_eq!(json, "\"snapshot\"");
    }

    #[test]
    fn assignment_wire_names() {
        let json = serde_json::to_value(Assignment::new("C5X1", "0AW")).expect("json");
        assert_eq!(json["variableCode"], "C5X1");
        assert_eq!(json["valueCode"], "0AW");
    }
}
