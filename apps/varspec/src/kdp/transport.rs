//! # KDP Collaborators
//!
//! The three seams of the KDP client: sending HTTP requests, issuing tokens
//! and looking up test object orders. Production implementations use
//! `reqwest` and static configuration; tests substitute counting mocks.

use crate::error::KdpError;
use async_trait::async_trait;
use reqwest::{Method, Url};
use std::time::Duration;
use varspec_core::TestObjectOrder;

/// Default timeout for a single KDP call.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// =============================================================================
// REQUEST / RESPONSE
// =============================================================================

/// A fully built KDP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KdpRequest {
    pub method: Method,
    pub url: Url,
    /// Header name/value pairs in insertion order.
    pub headers: Vec<(String, String)>,
    /// JSON body.
    pub body: String,
}

impl KdpRequest {
    /// Value of the first header named `name`, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw KDP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KdpResponse {
    pub status: u16,
    pub body: String,
}

impl KdpResponse {
    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// =============================================================================
// TRAITS
// =============================================================================

/// Sends a request to KDP.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: KdpRequest) -> Result<KdpResponse, KdpError>;
}

/// Issues the bearer token placed in the `jwtToken` header.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn token(&self) -> Result<String, KdpError>;
}

/// Finds a test object order by id.
#[async_trait]
pub trait OrderLookup: Send + Sync {
    /// Returns `KdpError::OrderNotFound` when no order has this id.
    async fn find_order(&self, test_object_order_id: &str) -> Result<TestObjectOrder, KdpError>;
}

// =============================================================================
// REQWEST TRANSPORT
// =============================================================================

/// `Transport` over a shared `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the default timeout.
    pub fn new() -> Result<Self, KdpError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| KdpError::Transport(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: KdpRequest) -> Result<KdpResponse, KdpError> {
        let url = request.url.to_string();
        let mut builder = self
            .http
            .request(request.method, request.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(request.body);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| KdpError::Transport(format!("{url}: {e}")))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| KdpError::Transport(format!("{url}: cannot read body: {e}")))?;

        Ok(KdpResponse { status, body })
    }
}

// =============================================================================
// STATIC TOKEN ISSUER
// =============================================================================

/// Serves a configured token.
#[derive(Clone)]
pub struct StaticTokenIssuer {
    token: String,
}

impl StaticTokenIssuer {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenIssuer")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl TokenIssuer for StaticTokenIssuer {
    async fn token(&self) -> Result<String, KdpError> {
        if self.token.trim().is_empty() {
            return Err(KdpError::Token("no token configured".to_string()));
        }
        Ok(self.token.clone())
    }
}
