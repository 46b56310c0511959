//! Legacy fixed-field specifications.

use crate::primitives::DEFAULT_VERSION_DESCRIPTION;
use crate::version::Versioned;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One legacy record: a two-character family plus a two-character number.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyVariantSpecification {
    pub id: Uuid,
    pub test_object_order_id: String,
    pub variant_family: String,
    pub variant_number: String,
    pub variant_designation: String,
}

impl LegacyVariantSpecification {
    #[must_use]
    pub fn new(
        variant_family: impl Into<String>,
        variant_number: impl Into<String>,
        variant_designation: impl Into<String>,
    ) -> Self {
        Self {
            variant_family: variant_family.into(),
            variant_number: variant_number.into(),
            variant_designation: variant_designation.into(),
            ..Self::default()
        }
    }

    /// Compound variant code: family followed by number.
    #[must_use]
    pub fn variant_code(&self) -> String {
        format!("{}{}", self.variant_family, self.variant_number)
    }
}

/// One version of an order's legacy specification list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyVariantSpecificationVersion {
    #[serde(default)]
    pub id: Uuid,
    #[serde(default)]
    pub test_object_order_id: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default = "default_used")]
    pub used: bool,
    #[serde(default)]
    pub structure_week: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    pub created_on: DateTime<Utc>,
    #[serde(default)]
    pub legacy_variant_specifications: Vec<LegacyVariantSpecification>,
}

fn default_description() -> String {
    DEFAULT_VERSION_DESCRIPTION.to_string()
}

const fn default_used() -> bool {
    true
}

impl LegacyVariantSpecificationVersion {
    /// Create a used legacy version for `test_object_order_id` created now.
    #[must_use]
    pub fn new(
        test_object_order_id: impl Into<String>,
        records: Vec<LegacyVariantSpecification>,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            test_object_order_id: test_object_order_id.into(),
            user: None,
            description: default_description(),
            used: true,
            structure_week: None,
            version: None,
            created_on: Utc::now(),
            legacy_variant_specifications: records,
        }
    }

    /// Compound variant codes of every record, in order.
    #[must_use]
    pub fn variant_codes(&self) -> Vec<String> {
        self.legacy_variant_specifications
            .iter()
            .map(LegacyVariantSpecification::variant_code)
            .collect()
    }
}

impl Versioned for LegacyVariantSpecificationVersion {
    fn created_on(&self) -> DateTime<Utc> {
        self.created_on
    }

    fn is_current(&self) -> bool {
        self.used
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_code_concatenates_family_and_number() {
        let record = LegacyVariantSpecification::new("AB", "12", "SEDAN");
        assert_eq!(record.variant_code(), "AB12");
    }

    #[test]
    fn version_defaults_to_used() {
        let json = r#"{"testObjectOrderId":"AB123456","createdOn":"2024-01-01T00:00:00Z"}"#;
        let version: LegacyVariantSpecificationVersion = serde_json::from_str(json).expect("parse");
        assert!(version.used);
        assert_eq!(version.description, DEFAULT_VERSION_DESCRIPTION);
        assert!(version.legacy_variant_specifications.is_empty());
    }

    #[test]
    fn variant_codes_keep_record_order() {
        let version = LegacyVariantSpecificationVersion::new(
            "AB123456",
            vec![
                LegacyVariantSpecification::new("ZZ", "01", "X"),
                LegacyVariantSpecification::new("AA", "02", "Y"),
            ],
        );
        assert_eq!(version.variant_codes(), vec!["ZZ01".to_string(), "AA02".to_string()]);
    }
}
