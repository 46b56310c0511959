//! Internal flat specification and its version wrapper.

use crate::codec;
use crate::primitives::{
    DEFAULT_CONSUMER_SOFTWARE_VERSION, DEFAULT_PACKAGE_IDENTIFIER, DEFAULT_VCD_SPEC_ISSUE,
    DEFAULT_VCD_SPEC_NUMBER, DEFAULT_VERSION_DESCRIPTION, VCU_V2_VALUE_CODE, VCU_VARIABLE_CODE,
};
use crate::version::Versioned;
use crate::{Assignment, VariantSpecificationSource, VarspecError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// VARIANT SPECIFICATION
// =============================================================================

/// A variant specification in the internal flat dialect.
///
/// Assignments are kept in ingestion order. Descriptor fields that were never
/// supplied hold their sentinel values (see [`crate::primitives`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VariantSpecification {
    pub id: Uuid,
    pub code: Option<String>,
    pub configuration_type: Option<String>,
    pub configuration_id: Option<String>,
    pub description: Option<String>,
    pub is_deleted: bool,
    pub maturity_state: Option<String>,
    pub variability_model_code: Option<String>,
    pub variability_model_state: Option<String>,
    pub configuration_date: Option<String>,
    pub configured_on: Option<String>,
    pub package_identifier: String,
    pub consumer_software_version: String,
    pub vcd_spec_number: String,
    pub vcd_spec_issue: String,
    pub is_complete: bool,
    pub is_valid: bool,
    pub is_immobilizer_enabled: bool,
    #[serde(rename = "variantSpecificationAssignments")]
    pub assignments: Vec<Assignment>,
    pub variant_specification_version_id: Uuid,
}

impl Default for VariantSpecification {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            code: None,
            configuration_type: None,
            configuration_id: None,
            description: None,
            is_deleted: false,
            maturity_state: None,
            variability_model_code: None,
            variability_model_state: None,
            configuration_date: None,
            configured_on: None,
            package_identifier: DEFAULT_PACKAGE_IDENTIFIER.to_string(),
            consumer_software_version: DEFAULT_CONSUMER_SOFTWARE_VERSION.to_string(),
            vcd_spec_number: DEFAULT_VCD_SPEC_NUMBER.to_string(),
            vcd_spec_issue: DEFAULT_VCD_SPEC_ISSUE.to_string(),
            is_complete: false,
            is_valid: false,
            is_immobilizer_enabled: true,
            assignments: Vec::new(),
            variant_specification_version_id: Uuid::nil(),
        }
    }
}

impl VariantSpecification {
    /// Structural copy with every identity field reset to the nil UUID.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self {
            id: Uuid::nil(),
            variant_specification_version_id: Uuid::nil(),
            ..self.clone()
        }
    }

    /// Compact JSON summary of the assignments, `{}` when there are none.
    pub fn compact_assignments(&self) -> Result<String, VarspecError> {
        codec::compact_assignments(self.assignments.as_slice())
    }

    /// True if at least one assignment is present.
    #[must_use]
    pub fn has_assignments(&self) -> bool {
        !self.assignments.is_empty()
    }

    /// True if the exact `(variable, value)` pair is assigned.
    #[must_use]
    pub fn has_assignment(&self, variable_code: &str, value_code: &str) -> bool {
        self.assignments
            .iter()
            .any(|a| a.variable_code == variable_code && a.value_code == value_code)
    }
}

// =============================================================================
// VARIANT SPECIFICATION VERSION
// =============================================================================

/// One version of an order's variant specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSpecificationVersion {
    #[serde(default)]
    pub id: Uuid,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default = "default_description")]
    pub description: String,
    pub created_on: DateTime<Utc>,
    #[serde(default)]
    pub structure_week: Option<String>,
    #[serde(default)]
    pub version: i32,
    #[serde(default)]
    pub source: VariantSpecificationSource,
    #[serde(default)]
    pub used: bool,
    #[serde(default)]
    pub variant_specification: Option<VariantSpecification>,
    #[serde(default)]
    pub test_object_order_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_legacy_version_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_version_id: Option<Uuid>,
}

fn default_description() -> String {
    DEFAULT_VERSION_DESCRIPTION.to_string()
}

impl VariantSpecificationVersion {
    /// Create an empty version for `test_object_order_id` created now.
    #[must_use]
    pub fn new(test_object_order_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::nil(),
            user: None,
            description: default_description(),
            created_on: Utc::now(),
            structure_week: None,
            version: 0,
            source: VariantSpecificationSource::default(),
            used: false,
            variant_specification: None,
            test_object_order_id: test_object_order_id.into(),
            parent_legacy_version_id: None,
            parent_version_id: None,
        }
    }

    /// Copy this version as a fresh, unused child of itself.
    ///
    /// Identity fields are nil, the creation time is now and the parent
    /// reference points back at this version.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self {
            id: Uuid::nil(),
            user: None,
            description: default_description(),
            created_on: Utc::now(),
            structure_week: self.structure_week.clone(),
            version: 0,
            source: self.source,
            used: false,
            variant_specification: self.variant_specification.as_ref().map(VariantSpecification::fork),
            test_object_order_id: self.test_object_order_id.clone(),
            parent_legacy_version_id: self.parent_legacy_version_id,
            parent_version_id: Some(self.id),
        }
    }

    /// Whether the specification marks a second generation VCU.
    ///
    /// `None` when the version carries no specification.
    #[must_use]
    pub fn is_vcu_v2(&self) -> Option<bool> {
        self.variant_specification
            .as_ref()
            .map(|spec| spec.has_assignment(VCU_VARIABLE_CODE, VCU_V2_VALUE_CODE))
    }

    /// One-line summary: version number, creation date and description.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Version: {}, Created On: {}, Description: {}",
            self.version,
            self.created_on.date_naive(),
            self.description
        )
    }

    /// `"<version> - <description>"`.
    #[must_use]
    pub fn version_with_description(&self) -> String {
        format!("{} - {}", self.version, self.description)
    }
}

impl Versioned for VariantSpecificationVersion {
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
    use chrono::TimeZone;

    fn spec_with(assignments: Vec<Assignment>) -> VariantSpecification {
        VariantSpecification {
            id: Uuid::new_v4(),
            variant_specification_version_id: Uuid::new_v4(),
            code: Some("SPEC01".to_string()),
            assignments,
            ..VariantSpecification::default()
        }
    }

    #[test]
    fn defaults_carry_sentinels() {
        let spec = VariantSpecification::default();
        assert_eq!(spec.package_identifier, DEFAULT_PACKAGE_IDENTIFIER);
        assert_eq!(spec.vcd_spec_issue, DEFAULT_VCD_SPEC_ISSUE);
        assert!(spec.is_immobilizer_enabled);
    }

    #[test]
    fn deserialize_missing_fields_uses_defaults() {
        let spec: VariantSpecification =
            serde_json::from_str(r#"{"maturityState":"PROD","variantSpecificationAssignments":[{"variableCode":"A","valueCode":"1"}]}"#)
                .expect("parse");
        assert_eq!(spec.consumer_software_version, DEFAULT_CONSUMER_SOFTWARE_VERSION);
        assert!(spec.is_immobilizer_enabled);
        assert_eq!(spec.assignments, vec![Assignment::new("A", "1")]);
    }

    #[test]
    fn fork_resets_identity_only() {
        let spec = spec_with(vec![Assignment::new("A", "1")]);
        let forked = spec.fork();
        assert!(forked.id.is_nil());
        assert!(forked.variant_specification_version_id.is_nil());
        assert_eq!(forked.code, spec.code);
        assert_eq!(forked.assignments, spec.assignments);
    }

    #[test]
    fn compact_assignments_of_empty_spec() {
        let spec = VariantSpecification::default();
        assert_eq!(spec.compact_assignments().expect("compact"), "{}");
        assert!(!spec.has_assignments());
    }

    #[test]
    fn vcu_v2_detection_is_exact() {
        let mut version = VariantSpecificationVersion::new("AB123456");
        assert_eq!(version.is_vcu_v2(), None);

        version.variant_specification = Some(spec_with(vec![Assignment::new("C5X1", "0aw")]));
        assert_eq!(version.is_vcu_v2(), Some(false));

        version.variant_specification = Some(spec_with(vec![Assignment::new("C5X1", "0AW")]));
        assert_eq!(version.is_vcu_v2(), Some(true));
    }

    #[test]
    fn version_fork_links_parent() {
        let mut version = VariantSpecificationVersion::new("AB123456");
        version.id = Uuid::new_v4();
        version.used = true;
        version.version = 4;
        version.variant_specification = Some(spec_with(vec![Assignment::new("A", "1")]));

        let forked = version.fork();
        assert!(forked.id.is_nil());
        assert!(!forked.used);
        assert_eq!(forked.parent_version_id, Some(version.id));
        assert_eq!(forked.description, DEFAULT_VERSION_DESCRIPTION);
        let spec = forked.variant_specification.expect("spec");
        assert!(spec.id.is_nil());
        assert_eq!(spec.assignments, vec![Assignment::new("A", "1")]);
    }

    #[test]
    fn summary_formats() {
        let mut version = VariantSpecificationVersion::new("AB123456");
        version.version = 3;
        version.description = "Rework".to_string();
        version.created_on = Utc.with_ymd_and_hms(2024, 5, 17, 10, 0, 0).single().expect("date");
        assert_eq!(version.summary(), "Version: 3, Created On: 2024-05-17, Description: Rework");
        assert_eq!(version.version_with_description(), "3 - Rework");
    }
}
