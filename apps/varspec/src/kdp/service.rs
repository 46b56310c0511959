//! # KDP Client Service
//!
//! Asks KDP to solve, fetch and downgrade variant specifications, and to
//! solve product specifications.
//!
//! Variant specification requests:
//! - target `kdp/variantspecification/v100/...` on the configured base URL
//! - carry the `originatingSystem` query parameter
//! - carry the `user-key`, `Host` and `jwtToken` headers
//! - must answer with a 2xx status and a valid `outputArea` envelope
//!
//! Product specification requests target `kdp/productspecification/v200/`
//! with the vehicle identity in the query, their own `user-key`, and
//! `originatingSystem` as a header.

use super::envelope::{KdpRequestEnvelope, KdpResponseEnvelope};
use super::product::{
    ProductSpecification, ProductSpecificationQuery, ProductSpecificationRequest,
    ProductSpecificationResponse,
};
use super::transport::{KdpRequest, OrderLookup, TokenIssuer, Transport};
use crate::config::KdpSettings;
use crate::error::KdpError;
use reqwest::{Method, Url};
use serde::Serialize;
use std::sync::Arc;
use varspec_core::{
    KdpVariantSpecification, LegacyVariantSpecification, TestObjectOrder,
    VariantSpecificationType, VariantSpecificationVersion, VarspecError, ensure_downgradable,
    to_external,
};

/// Path prefix shared by every variant specification endpoint.
const VARIANT_SPECIFICATION_PATH: &str = "kdp/variantspecification/v100";

/// Product specification endpoint.
const PRODUCT_SPECIFICATION_PATH: &str = "kdp/productspecification/v200/";

// =============================================================================
// SERVICE
// =============================================================================

/// Client for the KDP variant specification endpoints.
#[derive(Clone)]
pub struct KdpService {
    settings: KdpSettings,
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenIssuer>,
    orders: Arc<dyn OrderLookup>,
}

impl KdpService {
    pub fn new(
        settings: KdpSettings,
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenIssuer>,
        orders: Arc<dyn OrderLookup>,
    ) -> Self {
        Self {
            settings,
            transport,
            tokens,
            orders,
        }
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// Solve the specification of an order from its own data.
    pub async fn get_variant_specification(
        &self,
        test_object_order_id: &str,
        kind: VariantSpecificationType,
    ) -> Result<KdpVariantSpecification, KdpError> {
        let order = self.orders.find_order(test_object_order_id).await?;
        let seed = KdpVariantSpecification::seed_for_order(&order);

        let request = self
            .request(Method::POST, &solver_path(kind), &KdpRequestEnvelope::new(&seed))
            .await?;
        self.send(request, Some(&order)).await
    }

    /// Solve a specification from explicit legacy records.
    ///
    /// `structure_week` falls back to the order's own when absent.
    pub async fn get_variant_specification_for_legacy(
        &self,
        test_object_order_id: &str,
        records: &[LegacyVariantSpecification],
        kind: VariantSpecificationType,
        structure_week: Option<&str>,
    ) -> Result<KdpVariantSpecification, KdpError> {
        let order = self.orders.find_order(test_object_order_id).await?;
        let seed = KdpVariantSpecification::seed_for_legacy(&order, records, structure_week);

        let request = self
            .request(Method::POST, &solver_path(kind), &KdpRequestEnvelope::new(&seed))
            .await?;
        self.send(request, Some(&order)).await
    }

    /// Fetch the specification most recently saved in KDP for an order.
    pub async fn get_latest_saved_variant_specification(
        &self,
        test_object_order_id: &str,
        kind: VariantSpecificationType,
    ) -> Result<KdpVariantSpecification, KdpError> {
        let order = self.orders.find_order(test_object_order_id).await?;
        let seed = KdpVariantSpecification::seed_for_order(&order);
        let envelope = KdpRequestEnvelope::for_order(&order.test_object_order_id, &seed);

        let request = self.request(Method::GET, &saved_path(kind), &envelope).await?;
        self.send(request, Some(&order)).await
    }

    /// Like `get_latest_saved_variant_specification`, but any failure is `None`.
    pub async fn get_latest_saved_variant_specification_or_default(
        &self,
        test_object_order_id: &str,
        kind: VariantSpecificationType,
    ) -> Option<KdpVariantSpecification> {
        match self
            .get_latest_saved_variant_specification(test_object_order_id, kind)
            .await
        {
            Ok(spec) => Some(spec),
            Err(e) => {
                tracing::warn!(
                    order = test_object_order_id,
                    error = %e,
                    "No saved variant specification"
                );
                None
            }
        }
    }

    /// Downgrade a standard specification to its downloadable form.
    ///
    /// The standard-configuration guard runs before any token or transport call.
    pub async fn translate_to_downloadable(
        &self,
        standard: Option<&KdpVariantSpecification>,
    ) -> Result<KdpVariantSpecification, KdpError> {
        let standard = ensure_downgradable(standard)?;

        let request = self
            .request(Method::POST, &translate_path(), &KdpRequestEnvelope::new(standard))
            .await?;
        self.send(request, None).await
    }

    /// Downgrade a stored version, then decorate the result with the order's
    /// type code and the version's immobilizer flag.
    pub async fn translate_version_to_downloadable(
        &self,
        version: &VariantSpecificationVersion,
        order: &TestObjectOrder,
    ) -> Result<KdpVariantSpecification, KdpError> {
        let internal = version.variant_specification.as_ref();
        let external = internal.map(to_external);
        let standard = ensure_downgradable(external.as_ref())?;

        let request = self
            .request(Method::POST, &translate_path(), &KdpRequestEnvelope::new(standard))
            .await?;
        let downloadable = self.send(request, Some(order)).await?;

        Ok(downloadable
            .with_type_code_from(order)
            .with_immobilizer_from(internal))
    }

    /// Solve the product specification of a vehicle from its option codes.
    pub async fn get_product_specification(
        &self,
        query: &ProductSpecificationQuery,
        option_codes: &[String],
    ) -> Result<ProductSpecification, KdpError> {
        let user_key = self.settings.product_user_key.as_deref().ok_or_else(|| {
            KdpError::Config("kdp.product_specification_user_key is not set".to_string())
        })?;

        let mut url = self.settings.base_url.clone();
        url.set_path(PRODUCT_SPECIFICATION_PATH);
        url.query_pairs_mut().extend_pairs(query.pairs());

        let mut request = self
            .build(Method::POST, url, user_key, &ProductSpecificationRequest::new(option_codes))
            .await?;
        request.headers.push((
            "originatingSystem".to_string(),
            self.settings.originating_system.clone(),
        ));

        let body = self.exchange(request).await?;
        ProductSpecificationResponse::parse(&body)?.into_product_specification(query)
    }

    // =========================================================================
    // REQUEST PLUMBING
    // =========================================================================

    /// Absolute URI for `path` with the `originatingSystem` parameter.
    pub fn uri(&self, path: &str) -> Url {
        let mut url = self.settings.base_url.clone();
        url.set_path(path);
        url.query_pairs_mut()
            .append_pair("originatingSystem", &self.settings.originating_system);
        url
    }

    async fn request<T: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &T,
    ) -> Result<KdpRequest, KdpError> {
        self.build(method, self.uri(path), &self.settings.user_key, body)
            .await
    }

    async fn build<T: Serialize>(
        &self,
        method: Method,
        url: Url,
        user_key: &str,
        body: &T,
    ) -> Result<KdpRequest, KdpError> {
        let body = serde_json::to_string(body)
            .map_err(|e| VarspecError::SerializationError(e.to_string()))?;
        let token = self.tokens.token().await?;

        Ok(KdpRequest {
            method,
            url,
            headers: vec![
                ("user-key".to_string(), user_key.to_string()),
                ("Host".to_string(), self.settings.host.clone()),
                ("jwtToken".to_string(), token),
            ],
            body,
        })
    }

    /// Send `request`; any non-2xx status is an error carrying the body.
    async fn exchange(&self, request: KdpRequest) -> Result<String, KdpError> {
        tracing::debug!(method = %request.method, path = request.url.path(), "KDP request");

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            tracing::warn!(status = response.status, "KDP returned an error status");
            return Err(KdpError::Status {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response.body)
    }

    async fn send(
        &self,
        request: KdpRequest,
        order: Option<&TestObjectOrder>,
    ) -> Result<KdpVariantSpecification, KdpError> {
        let body = self.exchange(request).await?;
        let spec = KdpResponseEnvelope::parse(&body)?.validate()?;
        Ok(match order {
            Some(order) if spec.type_code.is_none() => spec.with_type_code_from(order),
            _ => spec,
        })
    }
}

fn solver_path(kind: VariantSpecificationType) -> String {
    format!("{VARIANT_SPECIFICATION_PATH}/variant/{}", kind.uri_path())
}

fn saved_path(kind: VariantSpecificationType) -> String {
    format!("{VARIANT_SPECIFICATION_PATH}/saved/{}", kind.uri_path())
}

fn translate_path() -> String {
    format!("{VARIANT_SPECIFICATION_PATH}/translate")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_paths() {
        assert_eq!(
            solver_path(VariantSpecificationType::Standard),
            "kdp/variantspecification/v100/variant/standard"
        );
        assert_eq!(
            saved_path(VariantSpecificationType::Downloadable),
            "kdp/variantspecification/v100/saved/downloadable"
        );
        assert_eq!(translate_path(), "kdp/variantspecification/v100/translate");
    }
}
