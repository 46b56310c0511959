//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Error kinds map to statuses:
//! - `ArgumentInvalid`, `InvalidField`, `CodecIntegrity`, `SerializationError` -> 400
//! - `PreconditionFailed` -> 412
//! - `NoMatchingVersion` -> 422
//! - unknown order -> 404
//! - KDP failures -> 502, KDP not configured -> 503

use super::{
    AppState,
    types::{
        CurrentVersionResponse, DownloadableRequest, ErrorResponse, HealthResponse,
        SearchResponse, VersionParams,
    },
};
use crate::error::KdpError;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use varspec_core::{
    KdpVariantSpecification, OrderQuery, PrinsVariantSpecification, SelectionMode,
    TestObjectOrder, Validator, VariantSpecification, VarspecError, from_alternate,
    from_external, predicate::VARIANT_COLLECTION, require_current, to_external,
};

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// A handler failure with its HTTP status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: &'static str,
    pub message: String,
}

impl ApiError {
    fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            message: message.into(),
        }
    }

    fn order_not_found(id: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "order_not_found",
            format!("Test object order '{id}' not found"),
        )
    }
}

impl From<VarspecError> for ApiError {
    fn from(e: VarspecError) -> Self {
        let (status, kind) = match &e {
            VarspecError::ArgumentInvalid(_) => (StatusCode::BAD_REQUEST, "argument_invalid"),
            VarspecError::InvalidField { .. } => (StatusCode::BAD_REQUEST, "invalid_field"),
            VarspecError::CodecIntegrity(_) => (StatusCode::BAD_REQUEST, "codec_integrity"),
            VarspecError::SerializationError(_) => (StatusCode::BAD_REQUEST, "serialization"),
            VarspecError::PreconditionFailed(_) => {
                (StatusCode::PRECONDITION_FAILED, "precondition_failed")
            }
            VarspecError::NoMatchingVersion { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "no_matching_version")
            }
        };
        Self::new(status, kind, e.to_string())
    }
}

impl From<KdpError> for ApiError {
    fn from(e: KdpError) -> Self {
        match e {
            KdpError::Core(inner) => inner.into(),
            KdpError::OrderNotFound(id) => Self::order_not_found(&id),
            KdpError::Config(_) => {
                Self::new(StatusCode::SERVICE_UNAVAILABLE, "kdp_unavailable", e.to_string())
            }
            KdpError::Transport(_)
            | KdpError::Status { .. }
            | KdpError::Parse(_)
            | KdpError::Token(_)
            | KdpError::InvalidResponse(_) => {
                tracing::error!(error = %e, "KDP call failed");
                Self::new(StatusCode::BAD_GATEWAY, "upstream", e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message,
            kind: self.kind.to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

fn find_order<'a>(state: &'a AppState, id: &str) -> Result<&'a TestObjectOrder, ApiError> {
    state.store.get(id).ok_or_else(|| ApiError::order_not_found(id))
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse::new(state.store.len(), state.kdp.is_some()))
}

// =============================================================================
// ORDER HANDLERS
// =============================================================================

/// Search orders with optional criteria.
pub async fn search_handler(
    State(state): State<AppState>,
    Json(query): Json<OrderQuery>,
) -> ApiResult<SearchResponse> {
    let orders: Vec<TestObjectOrder> = state.store.search(&query)?.into_iter().cloned().collect();
    Ok(Json(SearchResponse {
        count: orders.len(),
        orders,
    }))
}

/// Get one order by id.
pub async fn get_order_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<TestObjectOrder> {
    find_order(&state, &id).cloned().map(Json)
}

/// Get an order's current variant specification version.
pub async fn current_version_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<VersionParams>,
) -> ApiResult<CurrentVersionResponse> {
    let mode = match params.mode.as_deref() {
        Some(mode) => mode.parse::<SelectionMode>()?,
        None => SelectionMode::default(),
    };
    let order = find_order(&state, &id)?;
    let version = require_current(
        &order.variant_specification_versions,
        mode,
        &order.test_object_order_id,
        VARIANT_COLLECTION,
    )?;

    let compact_assignments = match version.variant_specification.as_ref() {
        Some(spec) => spec.compact_assignments()?,
        None => "{}".to_string(),
    };

    Ok(Json(CurrentVersionResponse {
        test_object_order_id: order.test_object_order_id.clone(),
        mode,
        summary: version.summary(),
        compact_assignments,
        is_vcu_v2: version.is_vcu_v2(),
        version: version.clone(),
    }))
}

// =============================================================================
// TRANSLATION HANDLERS
// =============================================================================

/// KDP -> internal.
pub async fn translate_kdp_handler(
    Json(spec): Json<KdpVariantSpecification>,
) -> ApiResult<VariantSpecification> {
    let internal = from_external(&spec);
    Validator::validate_specification(&internal)?;
    Ok(Json(internal))
}

/// PRINS -> internal.
pub async fn translate_prins_handler(
    Json(spec): Json<PrinsVariantSpecification>,
) -> ApiResult<VariantSpecification> {
    let internal = from_alternate(&spec);
    Validator::validate_specification(&internal)?;
    Ok(Json(internal))
}

/// Internal -> KDP.
pub async fn translate_internal_handler(
    Json(spec): Json<VariantSpecification>,
) -> ApiResult<KdpVariantSpecification> {
    Validator::validate_specification(&spec)?;
    Ok(Json(to_external(&spec)))
}

// =============================================================================
// DOWNLOADABLE HANDLER
// =============================================================================

/// Downgrade a standard specification through KDP.
pub async fn downloadable_handler(
    State(state): State<AppState>,
    Json(request): Json<DownloadableRequest>,
) -> ApiResult<KdpVariantSpecification> {
    let kdp = state.kdp.as_ref().ok_or_else(|| {
        ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "kdp_unavailable",
            "KDP client is not configured",
        )
    })?;

    let downloadable = match request.test_object_order_id.as_deref() {
        Some(id) => {
            let order = find_order(&state, id)?;
            let version = require_current(
                &order.variant_specification_versions,
                request.mode.unwrap_or_default(),
                &order.test_object_order_id,
                VARIANT_COLLECTION,
            )?;
            kdp.translate_version_to_downloadable(version, order).await?
        }
        None => {
            kdp.translate_to_downloadable(request.variant_specification.as_ref())
                .await?
        }
    };

    Ok(Json(downloadable))
}
