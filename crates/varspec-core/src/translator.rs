//! # Translator Module
//!
//! Conversions between the specification dialects.
//!
//! Every dialect exposes its assignments and scalar fields through
//! [`SpecificationSource`], so the translation into the internal flat form is
//! written once in [`to_internal`]. Dialects differ only in how missing
//! descriptor fields are filled:
//!
//! - KDP: missing descriptors take their sentinel defaults
//! - PRINS and legacy: descriptors are empty strings

use crate::codec;
use crate::formats::{KdpConfiguration, KdpDynamicVehicleData, KdpVariantSpecification, PrinsVariantSpecification};
use crate::model::{LegacyVariantSpecificationVersion, VariantSpecification};
use crate::primitives::{
    DEFAULT_CONSUMER_SOFTWARE_VERSION, DEFAULT_PACKAGE_IDENTIFIER, DEFAULT_VCD_SPEC_ISSUE,
    DEFAULT_VCD_SPEC_NUMBER,
};
use crate::query::present;
use crate::{Assignment, VarspecError};

// =============================================================================
// SOURCE ABSTRACTION
// =============================================================================

/// How a dialect fills descriptor fields it does not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorPolicy {
    /// Blank or missing descriptors take the sentinel defaults.
    SentinelDefaults,
    /// Missing descriptors become empty strings.
    Blank,
}

/// Scalar fields of a specification, borrowed from its dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scalars<'a> {
    pub maturity_state: Option<&'a str>,
    pub configured_on: Option<&'a str>,
    pub configuration_date: Option<&'a str>,
    pub is_complete: bool,
    pub is_valid: bool,
    pub is_immobilizer_enabled: Option<bool>,
    pub package_identifier: Option<&'a str>,
    pub consumer_software_version: Option<&'a str>,
    pub vcd_spec_number: Option<&'a str>,
    pub vcd_spec_issue: Option<&'a str>,
}

/// A dialect that can be translated into the internal flat specification.
pub trait SpecificationSource {
    /// Fill rule for descriptors this dialect leaves unset.
    const DESCRIPTOR_POLICY: DescriptorPolicy;

    /// Flat assignments in dialect order.
    fn assignments(&self) -> Vec<Assignment>;

    /// Scalar fields.
    fn scalars(&self) -> Scalars<'_>;
}

impl SpecificationSource for KdpVariantSpecification {
    const DESCRIPTOR_POLICY: DescriptorPolicy = DescriptorPolicy::SentinelDefaults;

    fn assignments(&self) -> Vec<Assignment> {
        self.flat_assignments()
    }

    fn scalars(&self) -> Scalars<'_> {
        let dynamic = self.dynamic_vehicle_data.as_ref();
        Scalars {
            maturity_state: self.maturity_state.as_deref(),
            configured_on: dynamic.and_then(|d| d.configured_on.as_deref()),
            configuration_date: dynamic.and_then(|d| d.configuration_date.as_deref()),
            is_complete: self.is_complete,
            is_valid: self.is_valid,
            is_immobilizer_enabled: self.is_immobilizer_enabled,
            package_identifier: self.package_identifier.as_deref(),
            consumer_software_version: self.consumer_software_version.as_deref(),
            vcd_spec_number: self.vcd_spec_number.as_deref(),
            vcd_spec_issue: self.vcd_spec_issue.as_deref(),
        }
    }
}

impl SpecificationSource for PrinsVariantSpecification {
    const DESCRIPTOR_POLICY: DescriptorPolicy = DescriptorPolicy::Blank;

    fn assignments(&self) -> Vec<Assignment> {
        codec::flatten(&self.assignments)
    }

    fn scalars(&self) -> Scalars<'_> {
        Scalars {
            maturity_state: self.based_on_maturity_state.as_deref(),
            configured_on: self.configured_on.as_deref(),
            configuration_date: self.configuration_date.as_deref(),
            is_complete: self.is_complete,
            is_valid: self.is_valid,
            ..Scalars::default()
        }
    }
}

impl SpecificationSource for LegacyVariantSpecificationVersion {
    const DESCRIPTOR_POLICY: DescriptorPolicy = DescriptorPolicy::Blank;

    /// One assignment per record: family as variable, number as value.
    fn assignments(&self) -> Vec<Assignment> {
        self.legacy_variant_specifications
            .iter()
            .map(|r| Assignment::new(r.variant_family.as_str(), r.variant_number.as_str()))
            .collect()
    }

    fn scalars(&self) -> Scalars<'_> {
        Scalars::default()
    }
}

// =============================================================================
// INTO THE INTERNAL DIALECT
// =============================================================================

fn descriptor(value: Option<&str>, sentinel: &str, policy: DescriptorPolicy) -> String {
    match policy {
        DescriptorPolicy::SentinelDefaults => present(value).unwrap_or(sentinel).to_string(),
        DescriptorPolicy::Blank => value.unwrap_or_default().to_string(),
    }
}

/// Translate any dialect into a fresh internal specification.
#[must_use]
pub fn to_internal<S: SpecificationSource>(source: &S) -> VariantSpecification {
    let scalars = source.scalars();
    let policy = S::DESCRIPTOR_POLICY;

    VariantSpecification {
        maturity_state: scalars.maturity_state.map(str::to_string),
        configured_on: scalars.configured_on.map(str::to_string),
        configuration_date: scalars.configuration_date.map(str::to_string),
        is_complete: scalars.is_complete,
        is_valid: scalars.is_valid,
        is_immobilizer_enabled: scalars.is_immobilizer_enabled.unwrap_or(true),
        package_identifier: descriptor(scalars.package_identifier, DEFAULT_PACKAGE_IDENTIFIER, policy),
        consumer_software_version: descriptor(
            scalars.consumer_software_version,
            DEFAULT_CONSUMER_SOFTWARE_VERSION,
            policy,
        ),
        vcd_spec_number: descriptor(scalars.vcd_spec_number, DEFAULT_VCD_SPEC_NUMBER, policy),
        vcd_spec_issue: descriptor(scalars.vcd_spec_issue, DEFAULT_VCD_SPEC_ISSUE, policy),
        assignments: source.assignments(),
        ..VariantSpecification::default()
    }
}

/// KDP -> internal.
#[must_use]
pub fn from_external(external: &KdpVariantSpecification) -> VariantSpecification {
    to_internal(external)
}

/// PRINS -> internal. Descriptors come out as empty strings.
#[must_use]
pub fn from_alternate(alternate: &PrinsVariantSpecification) -> VariantSpecification {
    to_internal(alternate)
}

/// Legacy version -> internal.
#[must_use]
pub fn from_legacy(legacy: &LegacyVariantSpecificationVersion) -> VariantSpecification {
    to_internal(legacy)
}

// =============================================================================
// OUT OF THE INTERNAL DIALECT
// =============================================================================

/// Internal -> KDP.
///
/// Assignments are regrouped by variable code. Blank descriptors are omitted.
/// Type code and immobilizer flag are left for the decorations.
#[must_use]
pub fn to_external(internal: &VariantSpecification) -> KdpVariantSpecification {
    let non_blank = |value: &str| present(Some(value)).map(str::to_string);
    let groups = codec::group(internal.assignments.as_slice());

    KdpVariantSpecification {
        maturity_state: internal.maturity_state.clone(),
        dynamic_vehicle_data: Some(KdpDynamicVehicleData {
            configured_on: internal.configured_on.clone(),
            configuration_date: internal.configuration_date.clone(),
        }),
        is_complete: internal.is_complete,
        is_valid: internal.is_valid,
        standard_configuration: Some(KdpConfiguration::from_groups(&groups)),
        package_identifier: non_blank(&internal.package_identifier),
        consumer_software_version: non_blank(&internal.consumer_software_version),
        vcd_spec_number: non_blank(&internal.vcd_spec_number),
        vcd_spec_issue: non_blank(&internal.vcd_spec_issue),
        ..KdpVariantSpecification::default()
    }
}

/// Check that `spec` may be downgraded to the downloadable form.
///
/// Absent input is `ArgumentInvalid`; a non-standard specification is
/// `PreconditionFailed`.
pub fn ensure_downgradable(
    spec: Option<&KdpVariantSpecification>,
) -> Result<&KdpVariantSpecification, VarspecError> {
    let spec = spec.ok_or_else(|| {
        VarspecError::ArgumentInvalid("standard variant specification cannot be absent".to_string())
    })?;

    match spec.non_standard_descriptor() {
        Some(field) => Err(VarspecError::PreconditionFailed(format!(
            "variant specification is not standard configuration ({field} is set)"
        ))),
        None => Ok(spec),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::AssignmentGroups;
    use crate::model::LegacyVariantSpecification;

    fn kdp_with(assignments: &[(&str, Vec<&str>)]) -> KdpVariantSpecification {
        let groups: AssignmentGroups = assignments
            .iter()
            .map(|(k, vs)| ((*k).to_string(), vs.iter().map(|v| (*v).to_string()).collect()))
            .collect();
        KdpVariantSpecification {
            maturity_state: Some("PROD".to_string()),
            dynamic_vehicle_data: Some(KdpDynamicVehicleData {
                configured_on: Some("2024-03-01T10:00:00".to_string()),
                configuration_date: Some("2024-03-01".to_string()),
            }),
            is_complete: true,
            is_valid: true,
            standard_configuration: Some(KdpConfiguration::from_groups(&groups)),
            ..KdpVariantSpecification::default()
        }
    }

    #[test]
    fn from_external_fills_sentinels() {
        let internal = from_external(&kdp_with(&[("C5X1", vec!["0AW"])]));
        assert_eq!(internal.package_identifier, DEFAULT_PACKAGE_IDENTIFIER);
        assert_eq!(internal.consumer_software_version, DEFAULT_CONSUMER_SOFTWARE_VERSION);
        assert_eq!(internal.vcd_spec_number, DEFAULT_VCD_SPEC_NUMBER);
        assert_eq!(internal.vcd_spec_issue, DEFAULT_VCD_SPEC_ISSUE);
        assert_eq!(internal.maturity_state.as_deref(), Some("PROD"));
        assert_eq!(internal.configured_on.as_deref(), Some("2024-03-01T10:00:00"));
        assert!(internal.is_complete);
        assert!(internal.is_immobilizer_enabled);
    }

    #[test]
    fn from_external_keeps_supplied_descriptors() {
        let mut external = kdp_with(&[]);
        external.package_identifier = Some("PKG".to_string());
        external.vcd_spec_issue = Some(" ".to_string());
        let internal = from_external(&external);
        assert_eq!(internal.package_identifier, "PKG");
        assert_eq!(internal.vcd_spec_issue, DEFAULT_VCD_SPEC_ISSUE);
    }

    #[test]
    fn from_alternate_blanks_descriptors() {
        let alternate = PrinsVariantSpecification {
            based_on_maturity_state: Some("PROD".to_string()),
            assignments: [("A".to_string(), vec!["1".to_string(), "2".to_string()])]
                .into_iter()
                .collect(),
            ..PrinsVariantSpecification::default()
        };
        let internal = from_alternate(&alternate);
        assert_eq!(internal.package_identifier, "");
        assert_eq!(internal.consumer_software_version, "");
        assert_eq!(internal.vcd_spec_number, "");
        assert_eq!(internal.vcd_spec_issue, "");
        assert_eq!(internal.maturity_state.as_deref(), Some("PROD"));
        assert_eq!(internal.assignments, vec![Assignment::new("A", "1"), Assignment::new("A", "2")]);
    }

    #[test]
    fn from_legacy_maps_family_to_number() {
        let legacy = LegacyVariantSpecificationVersion::new(
            "AB123456",
            vec![
                LegacyVariantSpecification::new("AB", "01", "X"),
                LegacyVariantSpecification::new("CD", "02", "Y"),
            ],
        );
        let internal = from_legacy(&legacy);
        assert_eq!(internal.assignments, vec![Assignment::new("AB", "01"), Assignment::new("CD", "02")]);
        assert_eq!(internal.package_identifier, "");
    }

    #[test]
    fn to_external_groups_assignments() {
        let internal = VariantSpecification {
            assignments: vec![
                Assignment::new("A", "1"),
                Assignment::new("B", "2"),
                Assignment::new("A", "3"),
            ],
            ..VariantSpecification::default()
        };
        let external = to_external(&internal);
        let groups = external.assignment_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups.get("A"), Some(["1".to_string(), "3".to_string()].as_slice()));
        assert_eq!(external.package_identifier.as_deref(), Some(DEFAULT_PACKAGE_IDENTIFIER));
        assert!(external.type_code.is_none());
        assert!(external.is_standard_configuration());
    }

    #[test]
    fn to_external_omits_blank_descriptors() {
        let internal = from_alternate(&PrinsVariantSpecification::default());
        let external = to_external(&internal);
        assert!(external.package_identifier.is_none());
        assert!(external.vcd_spec_issue.is_none());
    }

    #[test]
    fn guard_rejects_absent_and_non_standard() {
        assert!(matches!(ensure_downgradable(None), Err(VarspecError::ArgumentInvalid(_))));

        let mut spec = kdp_with(&[]);
        assert!(matches!(
            ensure_downgradable(Some(&spec)),
            Err(VarspecError::PreconditionFailed(_))
        ));

        spec.maturity_state = None;
        assert_eq!(ensure_downgradable(Some(&spec)), Ok(&spec));
    }
}
