//! # Validation Module
//!
//! Field-level checks for orders, versions and specifications.
//!
//! - Length limits come from [`crate::primitives`]
//! - Optional fields are checked only when set
//! - The first violation is returned; nothing is repaired
//!
//! A blank assignment variable code is reported as `CodecIntegrity` because
//! grouping on it would merge unrelated assignments.

use crate::model::{
    LegacyVariantSpecification, LegacyVariantSpecificationVersion, TestObjectOrder,
    VariantSpecification, VariantSpecificationVersion,
};
use crate::primitives::{
    LEGACY_CODE_LENGTH, MAX_CONFIGURATION_DATE_LENGTH, MAX_CONFIGURATION_TEXT_LENGTH,
    MAX_DESIGNATION_LENGTH, MAX_FYON_LENGTH, MAX_PROJECT_LENGTH, MAX_SERIES_LENGTH,
    MAX_SPEC_CODE_LENGTH, MAX_STATE_LENGTH, MAX_STRUCTURE_WEEK, MAX_TRIM_CODE_LENGTH,
    MAX_USER_LENGTH, MAX_VALUE_CODE_LENGTH, MAX_VARIABILITY_MODEL_CODE_LENGTH,
    MAX_VARIABLE_CODE_LENGTH, MAX_VERSION_DESCRIPTION_LENGTH, MAX_VIN_LENGTH, ORDER_ID_LENGTH,
    ORDER_STRUCTURE_WEEK_LENGTH, PNO12_LENGTH, VERSION_STRUCTURE_WEEK_LENGTH, YEAR_MODEL_RANGE,
};
use crate::{Assignment, VarspecError};

/// Stateless field validator.
pub struct Validator;

impl Validator {
    /// Validate an order's own fields and every version it owns.
    pub fn validate_order(order: &TestObjectOrder) -> Result<(), VarspecError> {
        Self::validate_order_id("testObjectOrderId", &order.test_object_order_id)?;

        if let Some(pno12) = order.pno12.as_deref() {
            exact_len("pno12", pno12, PNO12_LENGTH)?;
            no_whitespace("pno12", pno12)?;
        }

        if let Some(plant) = order.build_plant.as_deref() {
            let len = plant.chars().count();
            if !(2..=3).contains(&len) || !plant.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid("buildPlant", "must be 2 to 3 digits"));
            }
        }

        if let Some(week) = order.structure_week.as_deref() {
            Self::validate_order_structure_week(week)?;
        }

        optional_max_len("project", order.project.as_deref(), MAX_PROJECT_LENGTH)?;
        optional_max_len("series", order.series.as_deref(), MAX_SERIES_LENGTH)?;
        optional_max_len("exterior", order.exterior.as_deref(), MAX_TRIM_CODE_LENGTH)?;
        optional_max_len("interior", order.interior.as_deref(), MAX_TRIM_CODE_LENGTH)?;

        if let Some(vin) = order.vin.as_deref() {
            max_len("vin", vin, MAX_VIN_LENGTH)?;
            no_whitespace("vin", vin)?;
        }

        if let Some(fyon) = order.fyon.as_deref() {
            max_len("fyon", fyon, MAX_FYON_LENGTH)?;
            no_whitespace("fyon", fyon)?;
        }

        if order.year_model.is_some_and(|year| !YEAR_MODEL_RANGE.contains(&year)) {
            return Err(invalid(
                "yearModel",
                format!(
                    "must be between {} and {}",
                    YEAR_MODEL_RANGE.start(),
                    YEAR_MODEL_RANGE.end()
                ),
            ));
        }

        for version in &order.variant_specification_versions {
            Self::validate_version(version)?;
        }
        for version in &order.legacy_variant_specification_versions {
            Self::validate_legacy_version(version)?;
        }

        Ok(())
    }

    /// Order ids are exactly eight ASCII letters or digits.
    pub fn validate_order_id(field: &'static str, id: &str) -> Result<(), VarspecError> {
        exact_len(field, id, ORDER_ID_LENGTH)?;
        if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(invalid(field, "must be alphanumeric"));
        }
        Ok(())
    }

    /// Order structure weeks look like `21w34`, week 00 to 53.
    pub fn validate_order_structure_week(week: &str) -> Result<(), VarspecError> {
        const FIELD: &str = "structureWeek";
        exact_len(FIELD, week, ORDER_STRUCTURE_WEEK_LENGTH)?;

        let bytes = week.as_bytes();
        let well_formed = bytes[..2].iter().all(u8::is_ascii_digit)
            && bytes[2] == b'w'
            && bytes[3..].iter().all(u8::is_ascii_digit);
        if !well_formed {
            return Err(invalid(FIELD, "expected format like 21w01 or 21w34"));
        }

        let number: u32 = week[3..]
            .parse()
            .map_err(|_| invalid(FIELD, "week is not a number"))?;
        if number > MAX_STRUCTURE_WEEK {
            return Err(invalid(FIELD, format!("week must be at most {MAX_STRUCTURE_WEEK}")));
        }
        Ok(())
    }

    /// Validate a variant specification version and its specification.
    pub fn validate_version(version: &VariantSpecificationVersion) -> Result<(), VarspecError> {
        Self::validate_order_id("testObjectOrderId", &version.test_object_order_id)?;
        optional_max_len("user", version.user.as_deref(), MAX_USER_LENGTH)?;
        max_len("description", &version.description, MAX_VERSION_DESCRIPTION_LENGTH)?;
        validate_version_structure_week(version.structure_week.as_deref())?;

        match &version.variant_specification {
            Some(spec) => Self::validate_specification(spec),
            None => Err(invalid("variantSpecification", "required property")),
        }
    }

    /// Validate a legacy version and its records.
    pub fn validate_legacy_version(version: &LegacyVariantSpecificationVersion) -> Result<(), VarspecError> {
        Self::validate_order_id("testObjectOrderId", &version.test_object_order_id)?;
        optional_max_len("user", version.user.as_deref(), MAX_USER_LENGTH)?;
        max_len("description", &version.description, MAX_VERSION_DESCRIPTION_LENGTH)?;
        optional_max_len("version", version.version.as_deref(), MAX_STATE_LENGTH)?;
        validate_version_structure_week(version.structure_week.as_deref())?;

        for record in &version.legacy_variant_specifications {
            Self::validate_legacy(record)?;
        }
        Ok(())
    }

    /// Validate a specification's scalar fields and every assignment.
    pub fn validate_specification(spec: &VariantSpecification) -> Result<(), VarspecError> {
        optional_max_len("code", spec.code.as_deref(), MAX_SPEC_CODE_LENGTH)?;
        optional_max_len("configurationType", spec.configuration_type.as_deref(), MAX_SPEC_CODE_LENGTH)?;
        optional_max_len("configurationId", spec.configuration_id.as_deref(), MAX_CONFIGURATION_TEXT_LENGTH)?;
        optional_max_len("description", spec.description.as_deref(), MAX_CONFIGURATION_TEXT_LENGTH)?;
        optional_max_len("maturityState", spec.maturity_state.as_deref(), MAX_STATE_LENGTH)?;
        optional_max_len(
            "variabilityModelCode",
            spec.variability_model_code.as_deref(),
            MAX_VARIABILITY_MODEL_CODE_LENGTH,
        )?;
        optional_max_len("variabilityModelState", spec.variability_model_state.as_deref(), MAX_STATE_LENGTH)?;
        optional_max_len("configurationDate", spec.configuration_date.as_deref(), MAX_CONFIGURATION_DATE_LENGTH)?;
        optional_max_len("configuredOn", spec.configured_on.as_deref(), MAX_CONFIGURATION_DATE_LENGTH)?;

        for assignment in &spec.assignments {
            Self::validate_assignment(assignment)?;
        }
        Ok(())
    }

    /// Validate one flat assignment.
    pub fn validate_assignment(assignment: &Assignment) -> Result<(), VarspecError> {
        if assignment.variable_code.trim().is_empty() {
            return Err(VarspecError::CodecIntegrity(format!(
                "assignment with value '{}' has a blank variable code",
                assignment.value_code
            )));
        }
        max_len("variableCode", &assignment.variable_code, MAX_VARIABLE_CODE_LENGTH)?;
        max_len("valueCode", &assignment.value_code, MAX_VALUE_CODE_LENGTH)
    }

    /// Validate one legacy fixed-field record.
    pub fn validate_legacy(record: &LegacyVariantSpecification) -> Result<(), VarspecError> {
        exact_len("variantFamily", &record.variant_family, LEGACY_CODE_LENGTH)?;
        no_whitespace("variantFamily", &record.variant_family)?;
        exact_len("variantNumber", &record.variant_number, LEGACY_CODE_LENGTH)?;
        no_whitespace("variantNumber", &record.variant_number)?;

        if record.variant_designation.is_empty() {
            return Err(invalid("variantDesignation", "required property"));
        }
        max_len("variantDesignation", &record.variant_designation, MAX_DESIGNATION_LENGTH)
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn invalid(field: &'static str, reason: impl Into<String>) -> VarspecError {
    VarspecError::InvalidField {
        field,
        reason: reason.into(),
    }
}

fn max_len(field: &'static str, value: &str, max: usize) -> Result<(), VarspecError> {
    if value.chars().count() > max {
        return Err(invalid(field, format!("must be at most {max} characters")));
    }
    Ok(())
}

fn optional_max_len(field: &'static str, value: Option<&str>, max: usize) -> Result<(), VarspecError> {
    value.map_or(Ok(()), |v| max_len(field, v, max))
}

fn exact_len(field: &'static str, value: &str, len: usize) -> Result<(), VarspecError> {
    if value.chars().count() != len {
        return Err(invalid(field, format!("must be exactly {len} characters")));
    }
    Ok(())
}

fn no_whitespace(field: &'static str, value: &str) -> Result<(), VarspecError> {
    if value.chars().any(char::is_whitespace) {
        return Err(invalid(field, "no white space allowed"));
    }
    Ok(())
}

fn validate_version_structure_week(week: Option<&str>) -> Result<(), VarspecError> {
    if let Some(week) = week {
        exact_len("structureWeek", week, VERSION_STRUCTURE_WEEK_LENGTH)?;
        no_whitespace("structureWeek", week)?;
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
