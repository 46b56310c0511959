//! Product specification wire types.
//!
//! The product specification endpoint takes the vehicle identity as query
//! parameters and the option codes in a `pc72Z11I` body; the answer comes
//! back in `pc72Z11O`.

use crate::error::KdpError;
use serde::{Deserialize, Serialize};
use varspec_core::TestObjectOrder;

/// Vehicle identity sent as query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductSpecificationQuery {
    pub product_number12: String,
    pub structure_week: String,
    /// Exterior colour code.
    pub color_code: String,
    /// Interior upholstery code.
    pub upholstery_code: String,
    pub plant_code: String,
    /// Ask for the preliminary change order status (`changeOrderStatusPrel=1`).
    pub preliminary: bool,
}

impl ProductSpecificationQuery {
    /// Identity taken from an order; unset fields are sent empty.
    pub fn for_order(order: &TestObjectOrder, preliminary: bool) -> Self {
        let field = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            product_number12: field(&order.pno12),
            structure_week: field(&order.structure_week),
            color_code: field(&order.exterior),
            upholstery_code: field(&order.interior),
            plant_code: field(&order.build_plant),
            preliminary,
        }
    }

    /// Query pairs in the order KDP documents them.
    pub fn pairs(&self) -> [(&'static str, &str); 6] {
        [
            ("productNumber12", self.product_number12.as_str()),
            ("structureWeek", self.structure_week.as_str()),
            ("colorCode", self.color_code.as_str()),
            ("upholsteryCode", self.upholstery_code.as_str()),
            ("plantCode", self.plant_code.as_str()),
            ("changeOrderStatusPrel", if self.preliminary { "1" } else { "0" }),
        ]
    }
}

// =============================================================================
// WIRE
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductOptions {
    pub option_code: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductSpecificationBody {
    pub options: ProductOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductSpecificationArea {
    pub product_specification: ProductSpecificationBody,
}

/// Request body of the product specification endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSpecificationRequest {
    #[serde(rename = "pc72Z11I")]
    pub input: ProductSpecificationArea,
}

impl ProductSpecificationRequest {
    pub fn new(option_codes: &[String]) -> Self {
        Self {
            input: ProductSpecificationArea {
                product_specification: ProductSpecificationBody {
                    options: ProductOptions {
                        option_code: option_codes.to_vec(),
                    },
                },
            },
        }
    }
}

/// Response body of the product specification endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductSpecificationResponse {
    #[serde(rename = "pc72Z11O", default)]
    pub output: Option<ProductSpecificationArea>,
}

impl ProductSpecificationResponse {
    pub fn parse(body: &str) -> Result<Self, KdpError> {
        serde_json::from_str(body).map_err(|e| KdpError::Parse(e.to_string()))
    }

    /// Combine the returned options with the identity that was asked for.
    pub fn into_product_specification(
        self,
        query: &ProductSpecificationQuery,
    ) -> Result<ProductSpecification, KdpError> {
        let output = self
            .output
            .ok_or_else(|| KdpError::InvalidResponse("missing pc72Z11O".to_string()))?;

        Ok(ProductSpecification {
            product_number12: query.product_number12.clone(),
            structure_week: query.structure_week.clone(),
            color_code: query.color_code.clone(),
            upholstery_code: query.upholstery_code.clone(),
            plant_code: query.plant_code.clone(),
            option_codes: output.product_specification.options.option_code,
        })
    }
}

/// A solved product specification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSpecification {
    pub product_number12: String,
    pub structure_week: String,
    pub color_code: String,
    pub upholstery_code: String,
    pub plant_code: String,
    pub option_codes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let json = serde_json::to_value(ProductSpecificationRequest::new(&["A1".to_string()]))
            .expect("json");
        assert_eq!(
            json,
            serde_json::json!({
                "pc72Z11I": { "productSpecification": { "options": { "optionCode": ["A1"] } } }
            })
        );
    }

    #[test]
    fn preliminary_flag_is_one_or_zero() {
        let mut query = ProductSpecificationQuery::default();
        assert_eq!(query.pairs()[5], ("changeOrderStatusPrel", "0"));
        query.preliminary = true;
        assert_eq!(query.pairs()[5], ("changeOrderStatusPrel", "1"));
    }

    #[test]
    fn missing_output_area_is_invalid() {
        let response = ProductSpecificationResponse::parse("{}").expect("parse");
        assert!(matches!(
            response.into_product_specification(&ProductSpecificationQuery::default()),
            Err(KdpError::InvalidResponse(_))
        ));
    }
}
