//! # Query Module
//!
//! Search criteria for test object orders.
//!
//! - Every field is optional
//! - A field counts only when it is supplied and non-blank
//! - Matching is case-insensitive exact equality

use serde::{Deserialize, Serialize};

/// Optional criteria used to select orders.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderQuery {
    /// Order id.
    pub test_object_order_id: Option<String>,
    /// Order status.
    pub status: Option<String>,
    /// Vehicle project.
    pub project: Option<String>,
    /// Build series.
    pub series: Option<String>,
    /// Vehicle identification number.
    pub vin: Option<String>,
    /// Test object category.
    pub test_object_type: Option<String>,
    /// Compound legacy variant code (`family + number`).
    pub variant: Option<String>,
    /// Legacy variant designation.
    pub designation: Option<String>,
    /// Assignment variable code, matched in the latest version.
    pub variable_code: Option<String>,
    /// Assignment value code, matched in the latest version.
    pub value_code: Option<String>,
}

impl OrderQuery {
    /// True if at least one criterion is present.
    #[must_use]
    pub fn has_any_filter_set(&self) -> bool {
        [
            &self.test_object_order_id,
            &self.status,
            &self.project,
            &self.series,
            &self.vin,
            &self.test_object_type,
            &self.variant,
            &self.designation,
            &self.variable_code,
            &self.value_code,
        ]
        .into_iter()
        .any(|field| present(field.as_deref()).is_some())
    }

    /// Restrict to one order id.
    #[must_use]
    pub fn with_order_id(mut self, id: impl Into<String>) -> Self {
        self.test_object_order_id = Some(id.into());
        self
    }

    /// Restrict to one assignment variable code.
    #[must_use]
    pub fn with_variable_code(mut self, code: impl Into<String>) -> Self {
        self.variable_code = Some(code.into());
        self
    }

    /// Restrict to one assignment value code.
    #[must_use]
    pub fn with_value_code(mut self, code: impl Into<String>) -> Self {
        self.value_code = Some(code.into());
        self
    }
}

/// The value if it is supplied and not blank.
#[must_use]
pub fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Case-insensitive exact comparison.
#[must_use]
pub fn matches_ignore_case(candidate: &str, wanted: &str) -> bool {
    candidate == wanted || candidate.to_uppercase() == wanted.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_do_not_count() {
        let query = OrderQuery {
            status: Some("   ".to_string()),
            vin: Some(String::new()),
            ..OrderQuery::default()
        };
        assert!(!query.has_any_filter_set());
        assert!(OrderQuery::default().with_value_code("0AW").has_any_filter_set());
    }

    #[test]
    fn matching_ignores_case() {
        assert!(matches_ignore_case("c5x1", "C5X1"));
        assert!(!matches_ignore_case("C5X1", "C5X"));
    }

    #[test]
    fn deserializes_camel_case() {
        let query: OrderQuery =
            serde_json::from_str(r#"{"testObjectOrderId":"AB123456","variableCode":"C5X1"}"#)
                .expect("parse");
        assert_eq!(query.test_object_order_id.as_deref(), Some("AB123456"));
        assert_eq!(query.variable_code.as_deref(), Some("C5X1"));
        assert!(query.value_code.is_none());
    }
}
