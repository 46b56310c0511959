//! # Behavior Tier Tests (B0-B3)
//!
//! If ANY tier fails, the engine is INVALID.
//!
//! ## Tiers
//! - B0: Codec Integrity
//! - B1: Version Selection
//! - B2: Predicate Composition
//! - B3: Translation and Guard

use chrono::{DateTime, Duration, TimeZone, Utc};
use varspec_core::{
    Assignment, LegacyVariantSpecification, LegacyVariantSpecificationVersion, OrderQuery,
    TestObjectOrder, VariantSpecification, VariantSpecificationVersion, VarspecError,
};

fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0)
        .single()
        .expect("valid date")
        + Duration::minutes(minutes)
}

fn version_with(minutes: i64, assignments: Vec<Assignment>) -> VariantSpecificationVersion {
    let mut version = VariantSpecificationVersion::new("AB123456");
    version.created_on = at(minutes);
    version.variant_specification = Some(VariantSpecification {
        assignments,
        ..VariantSpecification::default()
    });
    version
}

/// Order whose latest version holds `[(C5X1,0AW),(C2XX,1BC)]`.
fn pair_fixture() -> TestObjectOrder {
    TestObjectOrder {
        project: Some("P519".to_string()),
        series: Some("S90".to_string()),
        status: Some("Released".to_string()),
        vin: Some("YV1XZK7V0N1234567".to_string()),
        test_object_type: Some("Car".to_string()),
        variant_specification_versions: vec![
            version_with(0, vec![Assignment::new("OLD1", "ZZZ")]),
            version_with(
                30,
                vec![Assignment::new("C5X1", "0AW"), Assignment::new("C2XX", "1BC")],
            ),
        ],
        legacy_variant_specification_versions: vec![LegacyVariantSpecificationVersion::new(
            "AB123456",
            vec![LegacyVariantSpecification::new("AB", "12", "SEDAN")],
        )],
        ..TestObjectOrder::new("AB123456")
    }
}

// =============================================================================
// TIER B0: CODEC INTEGRITY
// =============================================================================

mod b0_codec_integrity {
    use super::*;
    use varspec_core::{AssignmentGroups, compact_assignments, flatten, group};

    /// B0.1: Empty input produces empty output in both directions.
    #[test]
    fn empty_input_is_total() {
        assert!(flatten(None).is_empty());
        assert!(flatten(&AssignmentGroups::new()).is_empty());
        assert!(group(None).is_empty());
    }

    /// B0.2: Grouping keeps duplicates.
    #[test]
    fn grouping_multiplicity() {
        let flat = vec![
            Assignment::new("A", "1"),
            Assignment::new("A", "2"),
            Assignment::new("B", "3"),
        ];
        let grouped = group(flat.as_slice());
        assert_eq!(grouped.get("A").map(<[String]>::len), Some(2));
        assert_eq!(grouped.get("B").map(<[String]>::len), Some(1));
    }

    /// B0.3: Compact form is a JSON object in first-seen key order.
    #[test]
    fn compact_form() {
        let flat = vec![Assignment::new("C5X1", "0AW"), Assignment::new("C2XX", "1BC")];
        assert_eq!(
            compact_assignments(flat.as_slice()).expect("compact"),
            r#"{"C5X1":["0AW"],"C2XX":["1BC"]}"#
        );
    }
}

// =============================================================================
// TIER B1: VERSION SELECTION
// =============================================================================

mod b1_version_selection {
    use super::*;
    use varspec_core::{SelectionMode, select_current};

    /// B1.1: Empty collection selects nothing in both modes.
    #[test]
    fn empty_collection() {
        let versions: Vec<VariantSpecificationVersion> = Vec::new();
        assert!(select_current(&versions, SelectionMode::Recency).is_none());
        assert!(select_current(&versions, SelectionMode::Flag).is_none());
    }

    /// B1.2: Equal maximum timestamps at positions 0 and 2 select position 0.
    #[test]
    fn recency_tie_break() {
        let mut versions = vec![version_with(10, vec![]), version_with(5, vec![]), version_with(10, vec![])];
        for (index, version) in versions.iter_mut().enumerate() {
            version.version = index as i32;
        }
        let selected = select_current(&versions, SelectionMode::Recency).expect("selected");
        assert_eq!(selected.version, 0);
    }

    /// B1.3: Flag mode ignores timestamps.
    #[test]
    fn flag_ignores_recency() {
        let mut old = version_with(0, vec![]);
        old.used = true;
        old.version = 1;
        let mut new = version_with(60, vec![]);
        new.version = 2;
        let versions = vec![new, old];
        let selected = select_current(&versions, SelectionMode::Flag).expect("selected");
        assert_eq!(selected.version, 1);
    }
}

// =============================================================================
// TIER B2: PREDICATE COMPOSITION
// =============================================================================

mod b2_predicate_composition {
    use super::*;
    use varspec_core::{evaluate, filter_orders};

    fn query_pair(variable: Option<&str>, value: Option<&str>) -> OrderQuery {
        OrderQuery {
            variable_code: variable.map(str::to_string),
            value_code: value.map(str::to_string),
            ..OrderQuery::default()
        }
    }

    /// B2.1: Criteria with no present field select every fixture.
    #[test]
    fn empty_criteria_is_identity() {
        let fixtures = vec![
            pair_fixture(),
            TestObjectOrder::new("ZZ000001"),
            TestObjectOrder {
                status: Some("Cancelled".to_string()),
                ..TestObjectOrder::new("ZZ000002")
            },
        ];
        let blank = OrderQuery {
            project: Some("  ".to_string()),
            ..OrderQuery::default()
        };
        for order in &fixtures {
            assert_eq!(evaluate(order, &OrderQuery::default()), Ok(true));
            assert_eq!(evaluate(order, &blank), Ok(true));
        }
        assert_eq!(filter_orders(&fixtures, &blank).expect("filter").len(), 3);
    }

    /// B2.2: Every string clause ignores case.
    #[test]
    fn case_insensitive_clauses() {
        let order = pair_fixture();
        let queries = [
            OrderQuery { project: Some("p519".to_string()), ..OrderQuery::default() },
            OrderQuery { series: Some("s90".to_string()), ..OrderQuery::default() },
            OrderQuery { status: Some("RELEASED".to_string()), ..OrderQuery::default() },
            OrderQuery { vin: Some("yv1xzk7v0n1234567".to_string()), ..OrderQuery::default() },
            OrderQuery { test_object_type: Some("CAR".to_string()), ..OrderQuery::default() },
            OrderQuery { test_object_order_id: Some("ab123456".to_string()), ..OrderQuery::default() },
            OrderQuery { variant: Some("ab12".to_string()), ..OrderQuery::default() },
            OrderQuery { designation: Some("sedan".to_string()), ..OrderQuery::default() },
            query_pair(Some("c5x1"), Some("0aw")),
        ];
        for query in &queries {
            assert_eq!(evaluate(&order, query), Ok(true), "query {query:?}");
        }
    }

    /// B2.3: Pair clause branches on which side is present.
    #[test]
    fn pair_clause_branching() {
        let order = pair_fixture();
        assert_eq!(evaluate(&order, &query_pair(Some("C5X1"), Some("0AW"))), Ok(true));
        assert_eq!(evaluate(&order, &query_pair(Some("C5X1"), Some("1BC"))), Ok(false));
        assert_eq!(evaluate(&order, &query_pair(Some("C2XX"), None)), Ok(true));
        assert_eq!(evaluate(&order, &query_pair(None, Some("1BC"))), Ok(true));
        assert_eq!(evaluate(&order, &query_pair(None, Some("ZZZ"))), Ok(false));
        assert_eq!(evaluate(&order, &query_pair(None, None)), Ok(true));
    }

    /// B2.4: Nested clauses only look at the latest version.
    #[test]
    fn nested_clause_uses_latest_version() {
        let order = pair_fixture();
        assert_eq!(evaluate(&order, &query_pair(Some("OLD1"), None)), Ok(false));
    }

    /// B2.5: Nested clause over an empty collection is NoMatchingVersion.
    #[test]
    fn empty_collection_fails() {
        let order = TestObjectOrder::new("AB123456");
        let query = OrderQuery {
            variant: Some("AB12".to_string()),
            ..OrderQuery::default()
        };
        assert!(matches!(
            evaluate(&order, &query),
            Err(VarspecError::NoMatchingVersion { .. })
        ));
    }

    /// B2.6: Clauses are conjunctive.
    #[test]
    fn clauses_are_anded() {
        let order = pair_fixture();
        let query = OrderQuery {
            project: Some("P519".to_string()),
            series: Some("XC60".to_string()),
            ..OrderQuery::default()
        };
        assert_eq!(evaluate(&order, &query), Ok(false));
    }
}

// =============================================================================
// TIER B3: TRANSLATION AND GUARD
// =============================================================================

mod b3_translation {
    use super::*;
    use varspec_core::primitives::{DEFAULT_CONSUMER_SOFTWARE_VERSION, DEFAULT_PACKAGE_IDENTIFIER};
    use varspec_core::{
        KdpVariantSpecification, PrinsVariantSpecification, ensure_downgradable, from_alternate,
        from_external, to_external,
    };

    /// B3.1: External and alternate dialects default descriptors differently.
    #[test]
    fn asymmetric_defaults() {
        let external = from_external(&KdpVariantSpecification::default());
        let alternate = from_alternate(&PrinsVariantSpecification::default());

        assert_eq!(external.package_identifier, DEFAULT_PACKAGE_IDENTIFIER);
        assert_eq!(external.consumer_software_version, DEFAULT_CONSUMER_SOFTWARE_VERSION);
        assert_eq!(alternate.package_identifier, "");
        assert_eq!(alternate.consumer_software_version, "");
    }

    /// B3.2: Internal -> external -> internal keeps the assignment multiset.
    #[test]
    fn external_round_trip() {
        let internal = VariantSpecification {
            maturity_state: Some("PROD".to_string()),
            is_valid: true,
            assignments: vec![Assignment::new("C5X1", "0AW"), Assignment::new("C2XX", "1BC")],
            ..VariantSpecification::default()
        };
        let back = from_external(&to_external(&internal));
        assert_eq!(back.assignments, internal.assignments);
        assert_eq!(back.maturity_state, internal.maturity_state);
        assert!(back.is_valid);
    }

    /// B3.3: The guard distinguishes absent from non-standard input.
    #[test]
    fn standard_configuration_guard() {
        assert!(matches!(ensure_downgradable(None), Err(VarspecError::ArgumentInvalid(_))));

        let custom = KdpVariantSpecification {
            package_identifier: Some("12345678901234567890".to_string()),
            ..KdpVariantSpecification::default()
        };
        assert!(matches!(
            ensure_downgradable(Some(&custom)),
            Err(VarspecError::PreconditionFailed(_))
        ));

        let standard = KdpVariantSpecification {
            package_identifier: Some(DEFAULT_PACKAGE_IDENTIFIER.to_string()),
            ..KdpVariantSpecification::default()
        };
        assert!(ensure_downgradable(Some(&standard)).is_ok());
    }

    /// B3.4: Decorations are idempotent.
    #[test]
    fn decorations_idempotent() {
        let order = TestObjectOrder {
            pno12: Some("246C1A2B3C4D".to_string()),
            ..TestObjectOrder::new("AB123456")
        };
        let internal = VariantSpecification {
            is_immobilizer_enabled: false,
            ..VariantSpecification::default()
        };
        let once = to_external(&internal)
            .with_type_code_from(&order)
            .with_immobilizer_from(Some(&internal));
        let twice = once
            .clone()
            .with_type_code_from(&order)
            .with_immobilizer_from(Some(&internal));
        assert_eq!(once, twice);
        assert_eq!(once.type_code.as_deref(), Some("246"));
        assert_eq!(once.is_immobilizer_enabled, Some(false));
    }
}
