//! # Fixed Constants
//!
//! Sentinel values and field limits shared by the translator, the model and
//! the validator. They are compiled in and immutable at runtime.

// =============================================================================
// DESCRIPTOR SENTINELS
// =============================================================================

/// Package identifier carried by a specification that never received one.
pub const DEFAULT_PACKAGE_IDENTIFIER: &str = "00000000000000000001";

/// Consumer software version carried by a specification that never received one.
pub const DEFAULT_CONSUMER_SOFTWARE_VERSION: &str = "00.00.000";

/// VCD spec number carried by a specification that never received one.
pub const DEFAULT_VCD_SPEC_NUMBER: &str = "33171622";

/// VCD spec issue carried by a specification that never received one.
pub const DEFAULT_VCD_SPEC_ISSUE: &str = "011";

/// Description given to a freshly created version.
pub const DEFAULT_VERSION_DESCRIPTION: &str = "Initial Version";

// =============================================================================
// WELL-KNOWN CODES
// =============================================================================

/// Variable code identifying the vehicle control unit generation.
pub const VCU_VARIABLE_CODE: &str = "C5X1";

/// Value code marking a second generation vehicle control unit.
pub const VCU_V2_VALUE_CODE: &str = "0AW";

/// Number of leading PNO12 characters that form the type code.
pub const TYPE_CODE_LENGTH: usize = 3;

/// Width of the zero-padded mix number.
pub const MIX_NUMBER_WIDTH: usize = 7;

// =============================================================================
// FIELD LIMITS
// =============================================================================

/// Exact length of a test object order id.
pub const ORDER_ID_LENGTH: usize = 8;

/// Exact length of a PNO12.
pub const PNO12_LENGTH: usize = 12;

/// Exact length of an order structure week (`21w34`).
pub const ORDER_STRUCTURE_WEEK_LENGTH: usize = 5;

/// Exact length of a version structure week (`202134`).
pub const VERSION_STRUCTURE_WEEK_LENGTH: usize = 6;

/// Highest week number accepted in a structure week.
pub const MAX_STRUCTURE_WEEK: u32 = 53;

/// Maximum length of an assignment variable code.
pub const MAX_VARIABLE_CODE_LENGTH: usize = 15;

/// Maximum length of an assignment value code.
pub const MAX_VALUE_CODE_LENGTH: usize = 8;

/// Exact length of a legacy variant family or variant number.
pub const LEGACY_CODE_LENGTH: usize = 2;

/// Maximum length of a legacy variant designation.
pub const MAX_DESIGNATION_LENGTH: usize = 8;

/// Maximum length of a maturity or variability model state.
pub const MAX_STATE_LENGTH: usize = 15;

/// Maximum length of the specification code and configuration type.
pub const MAX_SPEC_CODE_LENGTH: usize = 8;

/// Maximum length of the variability model code.
pub const MAX_VARIABILITY_MODEL_CODE_LENGTH: usize = 4;

/// Maximum length of configuration id and description.
pub const MAX_CONFIGURATION_TEXT_LENGTH: usize = 50;

/// Maximum length of a configuration timestamp string.
pub const MAX_CONFIGURATION_DATE_LENGTH: usize = 26;

/// Maximum length of a version description.
pub const MAX_VERSION_DESCRIPTION_LENGTH: usize = 500;

/// Maximum length of a user name.
pub const MAX_USER_LENGTH: usize = 64;

/// Maximum length of a VIN.
pub const MAX_VIN_LENGTH: usize = 20;

/// Maximum length of a FYON (factory order number).
pub const MAX_FYON_LENGTH: usize = 10;

/// Maximum length of a project code.
pub const MAX_PROJECT_LENGTH: usize = 4;

/// Maximum length of a series code.
pub const MAX_SERIES_LENGTH: usize = 6;

/// Maximum length of an exterior or interior colour code.
pub const MAX_TRIM_CODE_LENGTH: usize = 5;

/// Accepted year model range (inclusive).
pub const YEAR_MODEL_RANGE: std::ops::RangeInclusive<i32> = 1900..=9999;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_widths_match_wire_format() {
        assert_eq!(DEFAULT_PACKAGE_IDENTIFIER.len(), 20);
        assert_eq!(DEFAULT_CONSUMER_SOFTWARE_VERSION.len(), 9);
        assert_eq!(DEFAULT_VCD_SPEC_NUMBER.len(), 8);
        assert_eq!(DEFAULT_VCD_SPEC_ISSUE.len(), 3);
    }
}
