//! # varspec HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /orders/search` - Filter orders by optional criteria
//! - `GET /orders/{id}` - Get one order
//! - `GET /orders/{id}/variant-specification?mode=recency|flag` - Current version
//! - `POST /translate/kdp` - KDP specification to internal
//! - `POST /translate/prins` - PRINS specification to internal
//! - `POST /translate/internal` - Internal specification to KDP
//! - `POST /variant-specification/downloadable` - Downgrade through KDP
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `VARSPEC_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `VARSPEC_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `VARSPEC_API_KEY`: If set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

pub use auth::get_api_key_from_env;
pub use handlers::{
    ApiError, current_version_handler, downloadable_handler, get_order_handler, health_handler,
    search_handler, translate_internal_handler, translate_kdp_handler, translate_prins_handler,
};
pub use middleware::{create_rate_limiter, get_rate_limit_from_env};
pub use types::{
    CurrentVersionResponse, DownloadableRequest, ErrorResponse, HealthResponse, SearchResponse,
    VersionParams,
};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use crate::error::AppError;
use crate::kdp::KdpService;
use crate::store::OrderStore;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state. Orders are read-only once loaded.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<OrderStore>,
    /// Absent when no `[kdp]` section is configured.
    pub kdp: Option<Arc<KdpService>>,
}

impl AppState {
    #[must_use]
    pub fn new(store: OrderStore, kdp: Option<KdpService>) -> Self {
        Self {
            store: Arc::new(store),
            kdp: kdp.map(Arc::new),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Environment variable holding the allowed CORS origins.
const CORS_ORIGINS_ENV: &str = "VARSPEC_CORS_ORIGINS";

/// Origins allowed when nothing else is configured.
const LOCALHOST_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:8080",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:8080",
];

/// Build the CORS layer from `VARSPEC_CORS_ORIGINS`.
///
/// `*` allows every origin, a comma-separated list allows those origins, and
/// an unset or unusable value falls back to localhost.
fn build_cors_layer() -> CorsLayer {
    match std::env::var(CORS_ORIGINS_ENV).ok().as_deref() {
        Some("*") => {
            tracing::warn!("CORS: allowing ALL origins ({CORS_ORIGINS_ENV}=*)");
            CorsLayer::permissive()
        }
        Some(list) => {
            let origins = parse_origins(list.split(','));
            if origins.is_empty() {
                tracing::warn!("CORS: no valid origins in {CORS_ORIGINS_ENV}, using localhost");
                restricted_cors(parse_origins(LOCALHOST_ORIGINS))
            } else {
                restricted_cors(origins)
            }
        }
        None => {
            tracing::info!("CORS: {CORS_ORIGINS_ENV} not set, using localhost");
            restricted_cors(parse_origins(LOCALHOST_ORIGINS))
        }
    }
}

fn parse_origins<'a>(origins: impl IntoIterator<Item = &'a str>) -> Vec<HeaderValue> {
    origins
        .into_iter()
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("CORS: invalid origin '{}': {}", origin, e);
                None
            }
        })
        .collect()
}

fn restricted_cors(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. CORS - handles preflight requests
/// 2. Tracing - logs all requests
/// 3. Rate Limiting - protects against DoS (if enabled)
/// 4. Authentication - validates API key (if configured)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    // Check if rate limiting is enabled
    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    // Check if authentication is enabled
    let has_auth = get_api_key_from_env().is_some();
    if has_auth {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "API key authentication DISABLED - all endpoints are publicly accessible! \
             Set VARSPEC_API_KEY environment variable to enable authentication."
        );
    }

    // Build base router with routes
    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route("/orders/search", post(search_handler))
        .route("/orders/{id}", get(get_order_handler))
        .route("/orders/{id}/variant-specification", get(current_version_handler))
        .route("/translate/kdp", post(translate_kdp_handler))
        .route("/translate/prins", post(translate_prins_handler))
        .route("/translate/internal", post(translate_internal_handler))
        .route("/variant-specification/downloadable", post(downloadable_handler));

    // Apply authentication middleware (innermost - runs last on request)
    if has_auth {
        router = router.layer(axum_middleware::from_fn(auth::api_key_auth_middleware));
    }

    // Apply rate limiting middleware
    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    // Apply CORS, body limit, and tracing (outermost layers)
    router
        .layer(axum::extract::DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(addr: &str, state: AppState) -> Result<(), AppError> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Server(format!("Bind failed: {}", e)))?;

    tracing::info!("varspec HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| AppError::Server(format!("Server error: {}", e)))
}
