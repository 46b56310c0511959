//! # KDP Client Module
//!
//! - `transport`: collaborator traits and their production implementations
//! - `envelope`: request/response wrappers
//! - `product`: product specification request/response types
//! - `service`: `KdpService`, the operations exposed to the CLI and API

mod envelope;
mod product;
mod service;
mod transport;

pub use envelope::{KdpInputArea, KdpMessage, KdpOutputArea, KdpRequestEnvelope, KdpResponseEnvelope};
pub use product::{
    ProductOptions, ProductSpecification, ProductSpecificationArea, ProductSpecificationBody,
    ProductSpecificationQuery, ProductSpecificationRequest, ProductSpecificationResponse,
};
pub use service::KdpService;
pub use transport::{
    KdpRequest, KdpResponse, OrderLookup, ReqwestTransport, StaticTokenIssuer, TokenIssuer,
    Transport,
};

use crate::config::KdpConfig;
use crate::error::AppError;
use std::sync::Arc;

impl KdpService {
    /// Build the production service from the `[kdp]` section.
    ///
    /// Fails with the name of the first missing key.
    pub fn from_config(config: &KdpConfig, orders: Arc<dyn OrderLookup>) -> Result<Self, AppError> {
        let settings = config.settings()?;
        let token = config.token()?;

        tracing::info!(
            base_url = %settings.base_url,
            originating_system = %settings.originating_system,
            "KDP client configured"
        );

        Ok(Self::new(
            settings,
            Arc::new(ReqwestTransport::new()?),
            Arc::new(StaticTokenIssuer::new(token)),
            orders,
        ))
    }
}
