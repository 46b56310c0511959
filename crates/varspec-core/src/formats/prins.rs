//! PRINS (alternate authority) dialect.
//!
//! Assignments arrive as a JSON object of `variable -> [values]`; there are no
//! descriptor fields.

use crate::codec::AssignmentGroups;
use serde::{Deserialize, Serialize};

/// A variant specification as delivered by PRINS.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrinsVariantSpecification {
    pub based_on_maturity_state: Option<String>,
    pub configured_on: Option<String>,
    pub configuration_date: Option<String>,
    pub is_complete: bool,
    pub is_valid: bool,
    pub assignments: AssignmentGroups,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_grouped_assignments_in_wire_order() {
        let spec: PrinsVariantSpecification = serde_json::from_str(
            r#"{"basedOnMaturityState":"PROD","isComplete":true,"assignments":{"Z9":["1"],"A1":["2","3"]}}"#,
        )
        .expect("parse");
        assert_eq!(spec.based_on_maturity_state.as_deref(), Some("PROD"));
        assert!(spec.is_complete);
        let keys: Vec<&str> = spec.assignments.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Z9", "A1"]);
    }

    #[test]
    fn missing_assignments_are_empty() {
        let spec: PrinsVariantSpecification = serde_json::from_str("{}").expect("parse");
        assert!(spec.assignments.is_empty());
    }
}
