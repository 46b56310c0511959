//! Test object (build) orders.

use super::{LegacyVariantSpecification, LegacyVariantSpecificationVersion, VariantSpecification, VariantSpecificationVersion};
use crate::VarspecError;
use crate::primitives::MIX_NUMBER_WIDTH;
use crate::version::{SelectionMode, select_current};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A vehicle build order with its two independent version collections.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestObjectOrder {
    /// Storage identity.
    pub id: Uuid,
    /// Eight-character order id.
    pub test_object_order_id: String,
    /// Display name of the test object.
    pub test_object_name: Option<String>,
    /// Test object category.
    pub test_object_type: Option<String>,
    /// Factory order number, digits only.
    pub fyon: Option<String>,
    /// Vehicle identification number.
    pub vin: Option<String>,
    /// Model year.
    pub year_model: Option<i32>,
    /// Twelve-character product number; its first three characters are the type code.
    pub pno12: Option<String>,
    /// Plant code, two or three digits.
    pub build_plant: Option<String>,
    /// Vehicle project.
    pub project: Option<String>,
    /// Build series.
    pub series: Option<String>,
    /// Structure week, `YYwNN`.
    pub structure_week: Option<String>,
    /// Order status.
    pub status: Option<String>,
    /// Exterior colour code.
    pub exterior: Option<String>,
    /// Interior upholstery code.
    pub interior: Option<String>,
    pub order_description: Option<String>,
    /// Planned build date.
    pub build_date: Option<DateTime<Utc>>,
    /// Mix number, see [`TestObjectOrder::mix_number`].
    pub mix_num: Option<i32>,
    /// True for a complete vehicle.
    pub complete_car: Option<bool>,
    /// Legacy fixed-field versions.
    pub legacy_variant_specification_versions: Vec<LegacyVariantSpecificationVersion>,
    /// Internal specification versions.
    pub variant_specification_versions: Vec<VariantSpecificationVersion>,
}

impl TestObjectOrder {
    #[must_use]
    pub fn new(test_object_order_id: impl Into<String>) -> Self {
        Self {
            test_object_order_id: test_object_order_id.into(),
            ..Self::default()
        }
    }

    /// Mix number left-padded with zeros; an unset mix number pads to all zeros.
    #[must_use]
    pub fn mix_number(&self) -> String {
        let raw = self.mix_num.map(|n| n.to_string()).unwrap_or_default();
        format!("{raw:0>width$}", width = MIX_NUMBER_WIDTH)
    }

    /// FYON parsed as a 32-bit factory order number.
    pub fn factory_order_number(&self) -> Result<i32, VarspecError> {
        let fyon = self
            .fyon
            .as_deref()
            .filter(|f| !f.is_empty())
            .ok_or_else(|| VarspecError::ArgumentInvalid("factory order number is empty".to_string()))?;

        fyon.parse::<i32>().map_err(|_| VarspecError::InvalidField {
            field: "fyon",
            reason: format!("'{fyon}' is not a valid integer"),
        })
    }

    /// Specification of the first version flagged as used.
    #[must_use]
    pub fn used_variant_specification(&self) -> Option<&VariantSpecification> {
        select_current(&self.variant_specification_versions, SelectionMode::Flag)
            .and_then(|v| v.variant_specification.as_ref())
    }

    /// Records of the first legacy version that belongs to this order.
    #[must_use]
    pub fn used_legacy_specifications(&self) -> Option<&[LegacyVariantSpecification]> {
        self.legacy_variant_specification_versions
            .iter()
            .find(|v| v.test_object_order_id == self.test_object_order_id)
            .map(|v| v.legacy_variant_specifications.as_slice())
    }

    /// Most recently created variant specification version.
    #[must_use]
    pub fn latest_variant_version(&self) -> Option<&VariantSpecificationVersion> {
        select_current(&self.variant_specification_versions, SelectionMode::Recency)
    }

    /// Most recently created legacy version.
    #[must_use]
    pub fn latest_legacy_version(&self) -> Option<&LegacyVariantSpecificationVersion> {
        select_current(&self.legacy_variant_specification_versions, SelectionMode::Recency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(minutes: i64) -> DateTime<Utc> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("date");
        base + Duration::minutes(minutes)
    }

    #[test]
    fn mix_number_pads_to_width() {
        let mut order = TestObjectOrder::new("AB123456");
        assert_eq!(order.mix_number(), "0000000");
        order.mix_num = Some(4711);
        assert_eq!(order.mix_number(), "0004711");
        order.mix_num = Some(123_456_789);
        assert_eq!(order.mix_number(), "123456789");
    }

    #[test]
    fn factory_order_number_parsing() {
        let mut order = TestObjectOrder::new("AB123456");
        assert!(matches!(
            order.factory_order_number(),
            Err(VarspecError::ArgumentInvalid(_))
        ));

        order.fyon = Some("12X".to_string());
        assert!(matches!(
            order.factory_order_number(),
            Err(VarspecError::InvalidField { field: "fyon", .. })
        ));

        order.fyon = Some("0123456789".to_string());
        assert_eq!(order.factory_order_number(), Ok(123_456_789));
    }

    #[test]
    fn factory_order_number_above_i32_is_invalid() {
        let mut order = TestObjectOrder::new("AB123456");
        order.fyon = Some("2147483647".to_string());
        assert_eq!(order.factory_order_number(), Ok(i32::MAX));

        order.fyon = Some("2147483648".to_string());
        assert!(matches!(
            order.factory_order_number(),
            Err(VarspecError::InvalidField { field: "fyon", .. })
        ));
    }

    #[test]
    fn used_and_latest_are_independent() {
        let mut order = TestObjectOrder::new("AB123456");
        let mut old = VariantSpecificationVersion::new("AB123456");
        old.created_on = at(0);
        old.used = true;
        old.variant_specification = Some(VariantSpecification {
            code: Some("OLD".to_string()),
            ..VariantSpecification::default()
        });
        let mut new = VariantSpecificationVersion::new("AB123456");
        new.created_on = at(10);
        new.version = 2;
        order.variant_specification_versions = vec![old, new];

        let used = order.used_variant_specification().expect("used");
        assert_eq!(used.code.as_deref(), Some("OLD"));
        assert_eq!(order.latest_variant_version().map(|v| v.version), Some(2));
    }

    #[test]
    fn used_legacy_matches_order_id() {
        let mut order = TestObjectOrder::new("AB123456");
        order.legacy_variant_specification_versions = vec![
            LegacyVariantSpecificationVersion::new(
                "ZZ999999",
                vec![LegacyVariantSpecification::new("XX", "00", "OTHER")],
            ),
            LegacyVariantSpecificationVersion::new(
                "AB123456",
                vec![LegacyVariantSpecification::new("AB", "12", "MINE")],
            ),
        ];
        let records = order.used_legacy_specifications().expect("records");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].variant_designation, "MINE");
    }

    #[test]
    fn deserialize_minimal_order() {
        let order: TestObjectOrder =
            serde_json::from_str(r#"{"testObjectOrderId":"AB123456","pno12":"246C1A2B3C4D"}"#)
                .expect("parse");
        assert_eq!(order.pno12.as_deref(), Some("246C1A2B3C4D"));
        assert!(order.variant_specification_versions.is_empty());
        assert!(order.latest_legacy_version().is_none());
    }
}
