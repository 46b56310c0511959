//! KDP (external authority) dialect.
//!
//! Field names follow the authority's JSON contract and must not change.

use crate::Assignment;
use crate::codec::{self, AssignmentGroups};
use crate::model::{LegacyVariantSpecification, TestObjectOrder, VariantSpecification};
use crate::primitives::{
    DEFAULT_CONSUMER_SOFTWARE_VERSION, DEFAULT_PACKAGE_IDENTIFIER, DEFAULT_VCD_SPEC_ISSUE,
    DEFAULT_VCD_SPEC_NUMBER, TYPE_CODE_LENGTH,
};
use crate::query::present;
use serde::{Deserialize, Serialize};

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Timestamps reported by the authority for a configured vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KdpDynamicVehicleData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configured_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration_date: Option<String>,
}

/// One grouped assignment: a variable and all of its value codes.
///
/// A `null` value list is accepted on input and treated as empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KdpAssignment {
    pub variable_code: String,
    pub value_code: Option<Vec<String>>,
}

/// The grouped assignment list of a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KdpConfiguration {
    pub assignments: Vec<KdpAssignment>,
}

impl KdpConfiguration {
    /// View as an ordered grouping.
    #[must_use]
    pub fn to_groups(&self) -> AssignmentGroups {
        self.assignments
            .iter()
            .map(|a| (a.variable_code.clone(), a.value_code.clone().unwrap_or_default()))
            .collect()
    }

    /// Build from a grouping, keeping its order.
    #[must_use]
    pub fn from_groups(groups: &AssignmentGroups) -> Self {
        Self {
            assignments: groups
                .iter()
                .map(|(variable, values)| KdpAssignment {
                    variable_code: variable.to_string(),
                    value_code: Some(values.to_vec()),
                })
                .collect(),
        }
    }
}

/// Vehicle identification sent when asking the authority to solve a specification.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KdpVehicle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_number12: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure_week: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upholstery_code: Option<String>,
    pub option_codes: Vec<String>,
}

/// A variant specification as exchanged with KDP.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KdpVariantSpecification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maturity_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_vehicle_data: Option<KdpDynamicVehicleData>,
    pub is_complete: bool,
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard_configuration: Option<KdpConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_immobilizer_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumer_software_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcd_spec_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcd_spec_issue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<KdpVehicle>,
}

// =============================================================================
// STANDARD CONFIGURATION
// =============================================================================

impl KdpVariantSpecification {
    /// Grouped assignments, empty when there is no configuration.
    #[must_use]
    pub fn assignment_groups(&self) -> AssignmentGroups {
        self.standard_configuration
            .as_ref()
            .map(KdpConfiguration::to_groups)
            .unwrap_or_default()
    }

    /// Name of the first descriptor holding a non-default value, if any.
    #[must_use]
    pub fn non_standard_descriptor(&self) -> Option<&'static str> {
        if present(self.maturity_state.as_deref()).is_some() {
            return Some("maturityState");
        }

        let descriptors = [
            ("packageIdentifier", &self.package_identifier, DEFAULT_PACKAGE_IDENTIFIER),
            ("consumerSoftwareVersion", &self.consumer_software_version, DEFAULT_CONSUMER_SOFTWARE_VERSION),
            ("vcdSpecNumber", &self.vcd_spec_number, DEFAULT_VCD_SPEC_NUMBER),
            ("vcdSpecIssue", &self.vcd_spec_issue, DEFAULT_VCD_SPEC_ISSUE),
        ];

        descriptors
            .into_iter()
            .find(|(_, value, sentinel)| {
                present(value.as_deref()).is_some_and(|v| v != *sentinel)
            })
            .map(|(name, _, _)| name)
    }

    /// True if every descriptor holds its default or is blank.
    #[must_use]
    pub fn is_standard_configuration(&self) -> bool {
        self.non_standard_descriptor().is_none()
    }

    // =========================================================================
    // REQUEST SEEDS
    // =========================================================================

    /// Request body asking KDP to solve the specification of `order`.
    ///
    /// Option codes are the variant codes of the order's latest legacy version.
    #[must_use]
    pub fn seed_for_order(order: &TestObjectOrder) -> Self {
        let option_codes = order
            .latest_legacy_version()
            .map(|v| v.variant_codes())
            .unwrap_or_default();
        Self::seed(order, option_codes, order.structure_week.clone())
    }

    /// Request body built from explicit legacy records and structure week.
    ///
    /// A missing structure week falls back to the order's own.
    #[must_use]
    pub fn seed_for_legacy(
        order: &TestObjectOrder,
        records: &[LegacyVariantSpecification],
        structure_week: Option<&str>,
    ) -> Self {
        let option_codes = records.iter().map(LegacyVariantSpecification::variant_code).collect();
        let week = structure_week
            .map(str::to_string)
            .or_else(|| order.structure_week.clone());
        Self::seed(order, option_codes, week)
    }

    fn seed(order: &TestObjectOrder, option_codes: Vec<String>, structure_week: Option<String>) -> Self {
        Self {
            vehicle: Some(KdpVehicle {
                product_number12: order.pno12.clone(),
                structure_week,
                plant_code: order.build_plant.clone(),
                color_code: order.exterior.clone(),
                upholstery_code: order.interior.clone(),
                option_codes,
            }),
            ..Self::default()
        }
    }

    // =========================================================================
    // DECORATIONS
    // =========================================================================

    /// Derive the type code from the order's PNO12.
    ///
    /// No-op when a type code is already set or the PNO12 is blank.
    #[must_use]
    pub fn with_type_code_from(mut self, order: &TestObjectOrder) -> Self {
        if self.type_code.is_some() {
            return self;
        }
        if let Some(pno12) = present(order.pno12.as_deref()) {
            let code: String = pno12.trim().chars().take(TYPE_CODE_LENGTH).collect();
            self.type_code = Some(code.to_uppercase());
        }
        self
    }

    /// Copy the immobilizer flag from an internal specification.
    ///
    /// No-op when the flag is already set.
    #[must_use]
    pub fn with_immobilizer_from(mut self, spec: Option<&VariantSpecification>) -> Self {
        if self.is_immobilizer_enabled.is_none() {
            self.is_immobilizer_enabled = spec.map(|s| s.is_immobilizer_enabled);
        }
        self
    }

    /// Flat assignments carried by this specification.
    #[must_use]
    pub fn flat_assignments(&self) -> Vec<Assignment> {
        codec::flatten(&self.assignment_groups())
    }
}
