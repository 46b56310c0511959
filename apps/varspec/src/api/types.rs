//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API. Specification
//! payloads reuse the core types directly so the wire names stay camelCase.

use serde::{Deserialize, Serialize};
use varspec_core::{
    KdpVariantSpecification, SelectionMode, TestObjectOrder, VariantSpecificationVersion,
};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub orders: usize,
    pub kdp_configured: bool,
}

impl HealthResponse {
    pub fn new(orders: usize, kdp_configured: bool) -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            orders,
            kdp_configured,
        }
    }
}

// =============================================================================
// SEARCH
// =============================================================================

/// Order search response. The request body is an `OrderQuery`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub count: usize,
    pub orders: Vec<TestObjectOrder>,
}

// =============================================================================
// CURRENT VERSION
// =============================================================================

/// Query string of `GET /orders/{id}/variant-specification`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionParams {
    /// `recency` (default) or `flag`.
    pub mode: Option<String>,
}

/// The current version of an order under a selection mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentVersionResponse {
    pub test_object_order_id: String,
    pub mode: SelectionMode,
    pub summary: String,
    /// Assignments as `{"variable": ["value", ...]}`.
    pub compact_assignments: String,
    pub is_vcu_v2: Option<bool>,
    pub version: VariantSpecificationVersion,
}

// =============================================================================
// DOWNLOADABLE
// =============================================================================

/// Body of `POST /variant-specification/downloadable`.
///
/// With `testObjectOrderId` the order's current version is downgraded;
/// otherwise `variantSpecification` is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DownloadableRequest {
    pub test_object_order_id: Option<String>,
    pub mode: Option<SelectionMode>,
    pub variant_specification: Option<KdpVariantSpecification>,
}

// =============================================================================
// ERRORS
// =============================================================================

/// Error body returned with every non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}
