//! # Predicate Builder
//!
//! Composes an order filter from optional criteria.
//!
//! The predicate starts as "always true" and each present criterion ANDs one
//! clause onto it. Clauses that look inside an order's version collections
//! resolve the latest version by creation time first; an empty collection is a
//! `NoMatchingVersion` error, not a silent `false`.
//!
//! Evaluation runs clauses in the order they were added and stops at the first
//! clause that fails or errors.

use crate::model::{LegacyVariantSpecification, TestObjectOrder};
use crate::query::{OrderQuery, matches_ignore_case, present};
use crate::version::{SelectionMode, require_current};
use crate::{Assignment, VarspecError};
use std::fmt;

/// Name of the variant specification collection in error reports.
pub const VARIANT_COLLECTION: &str = "variant specification";

/// Name of the legacy collection in error reports.
pub const LEGACY_COLLECTION: &str = "legacy variant specification";

type Clause<'q> = Box<dyn Fn(&TestObjectOrder) -> Result<bool, VarspecError> + Send + Sync + 'q>;

type AssignmentMatcher<'q> = Box<dyn Fn(&Assignment) -> bool + Send + Sync + 'q>;

// =============================================================================
// ORDER PREDICATE
// =============================================================================

/// A deferred conjunction of clauses over [`TestObjectOrder`].
pub struct OrderPredicate<'q> {
    clauses: Vec<Clause<'q>>,
}

impl<'q> OrderPredicate<'q> {
    /// The predicate that selects every order.
    #[must_use]
    pub fn always() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    /// AND `clause` onto the predicate.
    #[must_use]
    pub fn and<F>(mut self, clause: F) -> Self
    where
        F: Fn(&TestObjectOrder) -> Result<bool, VarspecError> + Send + Sync + 'q,
    {
        self.clauses.push(Box::new(clause));
        self
    }

    /// AND `clause` when `value` is present; the clause receives the value.
    #[must_use]
    pub fn and_if_present<F>(self, value: Option<&'q str>, clause: F) -> Self
    where
        F: Fn(&TestObjectOrder, &'q str) -> Result<bool, VarspecError> + Send + Sync + 'q,
    {
        match present(value) {
            Some(wanted) => self.and(move |order| clause(order, wanted)),
            None => self,
        }
    }

    /// Number of clauses ANDed so far.
    #[must_use]
    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Evaluate against one order.
    pub fn evaluate(&self, order: &TestObjectOrder) -> Result<bool, VarspecError> {
        for clause in &self.clauses {
            if !clause(order)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl Default for OrderPredicate<'_> {
    fn default() -> Self {
        Self::always()
    }
}

impl fmt::Debug for OrderPredicate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderPredicate")
            .field("clauses", &self.clauses.len())
            .finish()
    }
}

// =============================================================================
// QUERY -> PREDICATE
// =============================================================================

impl OrderQuery {
    /// Build the predicate described by these criteria.
    #[must_use]
    pub fn to_predicate(&self) -> OrderPredicate<'_> {
        if !self.has_any_filter_set() {
            return OrderPredicate::always();
        }

        let predicate = OrderPredicate::always()
            .and_if_present(self.project.as_deref(), |o, wanted| {
                Ok(field_matches(o.project.as_deref(), wanted))
            })
            .and_if_present(self.series.as_deref(), |o, wanted| {
                Ok(field_matches(o.series.as_deref(), wanted))
            })
            .and_if_present(self.status.as_deref(), |o, wanted| {
                Ok(field_matches(o.status.as_deref(), wanted))
            })
            .and_if_present(self.test_object_order_id.as_deref(), |o, wanted| {
                Ok(matches_ignore_case(&o.test_object_order_id, wanted))
            })
            .and_if_present(self.vin.as_deref(), |o, wanted| {
                Ok(field_matches(o.vin.as_deref(), wanted))
            })
            .and_if_present(self.test_object_type.as_deref(), |o, wanted| {
                Ok(field_matches(o.test_object_type.as_deref(), wanted))
            })
            .and_if_present(self.variant.as_deref(), |o, wanted| {
                Ok(latest_legacy_records(o)?
                    .iter()
                    .any(|r| matches_ignore_case(&r.variant_code(), wanted)))
            })
            .and_if_present(self.designation.as_deref(), |o, wanted| {
                Ok(latest_legacy_records(o)?
                    .iter()
                    .any(|r| matches_ignore_case(&r.variant_designation, wanted)))
            });

        match assignment_matcher(
            present(self.variable_code.as_deref()),
            present(self.value_code.as_deref()),
        ) {
            Some(matcher) => predicate.and(move |o| Ok(latest_assignments(o)?.iter().any(&matcher))),
            None => predicate,
        }
    }
}

/// Pick the assignment test for the variable/value pair.
///
/// Both present: exact pair. One present: that side only. Neither: no clause.
fn assignment_matcher<'q>(variable: Option<&'q str>, value: Option<&'q str>) -> Option<AssignmentMatcher<'q>> {
    match (variable, value) {
        (Some(variable), Some(value)) => Some(Box::new(move |a: &Assignment| {
            matches_ignore_case(&a.variable_code, variable) && matches_ignore_case(&a.value_code, value)
        })),
        (Some(variable), None) => Some(Box::new(move |a: &Assignment| {
            matches_ignore_case(&a.variable_code, variable)
        })),
        (None, Some(value)) => Some(Box::new(move |a: &Assignment| {
            matches_ignore_case(&a.value_code, value)
        })),
        (None, None) => None,
    }
}

fn field_matches(field: Option<&str>, wanted: &str) -> bool {
    field.is_some_and(|f| matches_ignore_case(f, wanted))
}

/// Assignments of the most recently created variant specification version.
///
/// A version without a specification has no assignments.
fn latest_assignments(order: &TestObjectOrder) -> Result<&[Assignment], VarspecError> {
    let version = require_current(
        &order.variant_specification_versions,
        SelectionMode::Recency,
        &order.test_object_order_id,
        VARIANT_COLLECTION,
    )?;
    Ok(version
        .variant_specification
        .as_ref()
        .map(|spec| spec.assignments.as_slice())
        .unwrap_or_default())
}

fn latest_legacy_records(order: &TestObjectOrder) -> Result<&[LegacyVariantSpecification], VarspecError> {
    let version = require_current(
        &order.legacy_variant_specification_versions,
        SelectionMode::Recency,
        &order.test_object_order_id,
        LEGACY_COLLECTION,
    )?;
    Ok(version.legacy_variant_specifications.as_slice())
}

// =============================================================================
// FREE FUNCTIONS
// =============================================================================

/// Does `order` satisfy `query`?
pub fn evaluate(order: &TestObjectOrder, query: &OrderQuery) -> Result<bool, VarspecError> {
    query.to_predicate().evaluate(order)
}

/// Orders satisfying `query`, in input order.
///
/// The first evaluation error aborts the whole filter.
pub fn filter_orders<'a>(
    orders: &'a [TestObjectOrder],
    query: &OrderQuery,
) -> Result<Vec<&'a TestObjectOrder>, VarspecError> {
    let predicate = query.to_predicate();
    let mut selected = Vec::new();
    for order in orders {
        if predicate.evaluate(order)? {
            selected.push(order);
        }
    }
    Ok(selected)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LegacyVariantSpecificationVersion, VariantSpecification, VariantSpecificationVersion};

    fn order_with_assignments(id: &str, assignments: Vec<Assignment>) -> TestObjectOrder {
        let mut version = VariantSpecificationVersion::new(id);
        version.variant_specification = Some(VariantSpecification {
            assignments,
            ..VariantSpecification::default()
        });
        TestObjectOrder {
            variant_specification_versions: vec![version],
            ..TestObjectOrder::new(id)
        }
    }

    #[test]
    fn always_predicate_has_no_clauses() {
        let predicate = OrderPredicate::always();
        assert_eq!(predicate.clause_count(), 0);
        assert_eq!(predicate.evaluate(&TestObjectOrder::default()), Ok(true));
    }

    #[test]
    fn blank_or_absent_values_add_no_clause() {
        let predicate = OrderPredicate::always()
            .and_if_present(Some("  "), |_, _| Ok(false))
            .and_if_present(None, |_, _| Ok(false));
        assert_eq!(predicate.clause_count(), 0);
    }

    #[test]
    fn evaluation_stops_at_first_false() {
        let predicate = OrderPredicate::always()
            .and(|_| Ok(false))
            .and(|o| Err(VarspecError::ArgumentInvalid(o.test_object_order_id.clone())));
        assert_eq!(predicate.evaluate(&TestObjectOrder::default()), Ok(false));
    }

    #[test]
    fn empty_query_skips_version_lookup() {
        // No versions at all: a nested clause would error.
        let order = TestObjectOrder::new("AB123456");
        assert_eq!(evaluate(&order, &OrderQuery::default()), Ok(true));
    }

    #[test]
    fn one_clause_per_present_criterion() {
        let query = OrderQuery {
            project: Some("P1".to_string()),
            status: Some(String::new()),
            variable_code: Some("C5X1".to_string()),
            value_code: Some("0AW".to_string()),
            ..OrderQuery::default()
        };
        assert_eq!(query.to_predicate().clause_count(), 2);
    }

    #[test]
    fn missing_field_never_matches() {
        let order = TestObjectOrder::new("AB123456");
        let query = OrderQuery {
            vin: Some("YV1".to_string()),
            ..OrderQuery::default()
        };
        assert_eq!(evaluate(&order, &query), Ok(false));
    }

    #[test]
    fn variable_clause_errors_without_versions() {
        let order = TestObjectOrder::new("AB123456");
        let query = OrderQuery::default().with_variable_code("C5X1");
        assert!(matches!(
            evaluate(&order, &query),
            Err(VarspecError::NoMatchingVersion { collection: VARIANT_COLLECTION, .. })
        ));
    }

    #[test]
    fn version_without_specification_matches_nothing() {
        let order = TestObjectOrder {
            variant_specification_versions: vec![VariantSpecificationVersion::new("AB123456")],
            ..TestObjectOrder::new("AB123456")
        };
        let query = OrderQuery::default().with_value_code("0AW");
        assert_eq!(evaluate(&order, &query), Ok(false));
    }

    #[test]
    fn designation_uses_latest_legacy_version() {
        let mut old = LegacyVariantSpecificationVersion::new(
            "AB123456",
            vec![LegacyVariantSpecification::new("AB", "01", "OLDNAME")],
        );
        old.created_on -= chrono::Duration::days(1);
        let new = LegacyVariantSpecificationVersion::new(
            "AB123456",
            vec![LegacyVariantSpecification::new("AB", "02", "NEWNAME")],
        );
        let order = TestObjectOrder {
            legacy_variant_specification_versions: vec![old, new],
            ..TestObjectOrder::new("AB123456")
        };

        let hit = OrderQuery {
            designation: Some("newname".to_string()),
            ..OrderQuery::default()
        };
        let miss = OrderQuery {
            designation: Some("OLDNAME".to_string()),
            ..OrderQuery::default()
        };
        assert_eq!(evaluate(&order, &hit), Ok(true));
        assert_eq!(evaluate(&order, &miss), Ok(false));
    }

    #[test]
    fn filter_orders_keeps_input_order() {
        let orders = vec![
            order_with_assignments("AA000001", vec![Assignment::new("C5X1", "0AW")]),
            order_with_assignments("AA000002", vec![Assignment::new("C5X1", "0AV")]),
            order_with_assignments("AA000003", vec![Assignment::new("c5x1", "0aw")]),
        ];
        let query = OrderQuery::default()
            .with_variable_code("C5X1")
            .with_value_code("0AW");
        let ids: Vec<&str> = filter_orders(&orders, &query)
            .expect("filter")
            .iter()
            .map(|o| o.test_object_order_id.as_str())
            .collect();
        assert_eq!(ids, vec!["AA000001", "AA000003"]);
    }
}
