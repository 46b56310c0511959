//! # Assignment Codec
//!
//! Bidirectional mapping between the grouped form (`variable -> [values]`) and
//! the flat form (`[(variable, value)]`) of variant assignments.
//!
//! - `flatten` expands every group in mapping order, values in sequence order
//! - `group` collects by variable code in first-seen key order
//! - Neither direction deduplicates
//!
//! `flatten(group(f))` keeps every element of `f` but makes elements that share
//! a variable contiguous, ordered by the first time each variable was seen.
//! Callers that need the original interleave must keep the flat list itself.

use crate::{Assignment, VarspecError};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// GROUPED FORM
// =============================================================================

/// Ordered `variable code -> value codes` mapping.
///
/// Stored as an association list so the wire order survives untouched.
/// [`group`] always yields unique keys; a grouping read from the wire keeps
/// whatever entries the sender put there.
///
/// On the wire this is a JSON object. A `null` value list is read as an empty
/// list instead of being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssignmentGroups {
    entries: Vec<(String, Vec<String>)>,
}

impl AssignmentGroups {
    /// Create an empty grouping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a variable with its values, after every existing entry.
    pub fn push(&mut self, variable_code: impl Into<String>, value_codes: Vec<String>) {
        self.entries.push((variable_code.into(), value_codes));
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Values of the first entry for `variable_code`.
    #[must_use]
    pub fn get(&self, variable_code: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(key, _)| key == variable_code)
            .map(|(_, values)| values.as_slice())
    }

    /// Iterate entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }
}

impl FromIterator<(String, Vec<String>)> for AssignmentGroups {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Serialize for AssignmentGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, values) in &self.entries {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AssignmentGroups {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GroupsVisitor;

        impl<'de> Visitor<'de> for GroupsVisitor {
            type Value = AssignmentGroups;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of variable codes to value code lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut groups = AssignmentGroups::new();
                while let Some((key, values)) =
                    access.next_entry::<String, Option<Vec<String>>>()?
                {
                    groups.push(key, values.unwrap_or_default());
                }
                Ok(groups)
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(AssignmentGroups::new())
            }
        }

        deserializer.deserialize_any(GroupsVisitor)
    }
}

// =============================================================================
// CODEC
// =============================================================================

/// Expand a grouping into flat assignments.
///
/// Absent or empty input yields an empty list.
pub fn flatten<'a>(grouped: impl Into<Option<&'a AssignmentGroups>>) -> Vec<Assignment> {
    let Some(grouped) = grouped.into() else {
        return Vec::new();
    };

    grouped
        .iter()
        .flat_map(|(variable, values)| {
            values
                .iter()
                .map(move |value| Assignment::new(variable, value.as_str()))
        })
        .collect()
}

/// Collect flat assignments by variable code.
///
/// Keys keep their first-seen order and values keep their insertion order.
/// Absent or empty input yields an empty grouping.
pub fn group<'a>(flat: impl Into<Option<&'a [Assignment]>>) -> AssignmentGroups {
    let Some(flat) = flat.into() else {
        return AssignmentGroups::new();
    };

    let mut slots: BTreeMap<&str, usize> = BTreeMap::new();
    let mut entries: Vec<(String, Vec<String>)> = Vec::new();

    for assignment in flat {
        match slots.get(assignment.variable_code.as_str()) {
            Some(&slot) => entries[slot].1.push(assignment.value_code.clone()),
            None => {
                slots.insert(assignment.variable_code.as_str(), entries.len());
                entries.push((
                    assignment.variable_code.clone(),
                    vec![assignment.value_code.clone()],
                ));
            }
        }
    }

    AssignmentGroups { entries }
}

/// Compact JSON summary of flat assignments: `{"C5X1":["0AW"],...}`.
///
/// Key and value order follow [`group`]. Absent input renders as `{}`.
pub fn compact_assignments<'a>(
    flat: impl Into<Option<&'a [Assignment]>>,
) -> Result<String, VarspecError> {
    serde_json::to_string(&group(flat)).map_err(|e| VarspecError::SerializationError(e.to_string()))
}

// =============================================================================
// TESTS
// =============================================================================
