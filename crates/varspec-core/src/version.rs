//! # Version Selector
//!
//! Picks the "current" version out of an order's version collection.
//!
//! - `Recency`: the version with the latest creation time, first one wins a tie
//! - `Flag`: the first version marked as used
//!
//! Both modes are a single pass over the caller's slice. Nothing is sorted, so
//! the caller's ordering is never disturbed.

use crate::VarspecError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// VERSIONED TRAIT
// =============================================================================

/// Anything that can compete to be the current version of a collection.
pub trait Versioned {
    /// When this version was created.
    fn created_on(&self) -> DateTime<Utc>;

    /// Whether this version is explicitly flagged as the one in use.
    fn is_current(&self) -> bool;
}

// =============================================================================
// SELECTION MODE
// =============================================================================

/// Rule used to decide which version is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Latest creation timestamp.
    #[default]
    Recency,
    /// First version flagged as used.
    Flag,
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recency => f.write_str("recency"),
            Self::Flag => f.write_str("flag"),
        }
    }
}

impl FromStr for SelectionMode {
    type Err = VarspecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recency" | "latest" => Ok(Self::Recency),
            "flag" | "used" => Ok(Self::Flag),
            other => Err(VarspecError::ArgumentInvalid(format!(
                "unknown selection mode '{other}'"
            ))),
        }
    }
}

// =============================================================================
// SELECTION
// =============================================================================

/// Select the current version under `mode`, or `None` when nothing qualifies.
pub fn select_current<V: Versioned>(versions: &[V], mode: SelectionMode) -> Option<&V> {
    match mode {
        SelectionMode::Recency => versions.iter().fold(None, |best: Option<&V>, candidate| {
            match best {
                // Strictly later only: the earlier position keeps a tie.
                Some(current) if candidate.created_on() <= current.created_on() => Some(current),
                _ => Some(candidate),
            }
        }),
        SelectionMode::Flag => versions.iter().find(|v| v.is_current()),
    }
}

/// Like [`select_current`], but absence is a `NoMatchingVersion` error.
pub fn require_current<'a, V: Versioned>(
    versions: &'a [V],
    mode: SelectionMode,
    order_id: &str,
    collection: &'static str,
) -> Result<&'a V, VarspecError> {
    select_current(versions, mode).ok_or_else(|| VarspecError::NoMatchingVersion {
        order_id: order_id.to_string(),
        collection,
    })
}

// =============================================================================
// TESTS
// =============================================================================
