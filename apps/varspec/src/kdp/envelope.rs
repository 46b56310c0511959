//! KDP request and response envelopes.
//!
//! Requests wrap the specification in `inputArea`; responses carry it in
//! `outputArea` together with any service messages.

use crate::error::KdpError;
use serde::{Deserialize, Serialize};
use varspec_core::KdpVariantSpecification;

/// Request body sent to KDP.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KdpRequestEnvelope<'a> {
    pub input_area: KdpInputArea<'a>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KdpInputArea<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_object_order_id: Option<&'a str>,
    pub variant_specification: &'a KdpVariantSpecification,
}

impl<'a> KdpRequestEnvelope<'a> {
    /// Envelope around a specification.
    pub fn new(variant_specification: &'a KdpVariantSpecification) -> Self {
        Self {
            input_area: KdpInputArea {
                test_object_order_id: None,
                variant_specification,
            },
        }
    }

    /// Envelope that also names the order, used for saved-specification lookups.
    pub fn for_order(test_object_order_id: &'a str, variant_specification: &'a KdpVariantSpecification) -> Self {
        Self {
            input_area: KdpInputArea {
                test_object_order_id: Some(test_object_order_id),
                variant_specification,
            },
        }
    }
}

/// Response body returned by KDP.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KdpResponseEnvelope {
    pub output_area: Option<KdpOutputArea>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KdpOutputArea {
    pub variant_specification: Option<KdpVariantSpecification>,
    pub messages: Vec<KdpMessage>,
}

/// A service message attached to a response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KdpMessage {
    pub code: Option<String>,
    pub severity: Option<String>,
    pub text: Option<String>,
}

impl KdpMessage {
    fn is_error(&self) -> bool {
        self.severity
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("error"))
    }

    fn describe(&self) -> String {
        match (self.code.as_deref(), self.text.as_deref()) {
            (Some(code), Some(text)) => format!("{code}: {text}"),
            (Some(code), None) => code.to_string(),
            (None, Some(text)) => text.to_string(),
            (None, None) => "unspecified error".to_string(),
        }
    }
}

impl KdpResponseEnvelope {
    /// Parse a raw response body.
    pub fn parse(body: &str) -> Result<Self, KdpError> {
        serde_json::from_str(body).map_err(|e| KdpError::Parse(e.to_string()))
    }

    /// Check the envelope and extract the specification.
    ///
    /// Fails when `outputArea` or its specification is missing, or when any
    /// message carries error severity.
    pub fn validate(self) -> Result<KdpVariantSpecification, KdpError> {
        let output = self
            .output_area
            .ok_or_else(|| KdpError::InvalidResponse("outputArea is missing".to_string()))?;

        let errors: Vec<String> = output
            .messages
            .iter()
            .filter(|m| m.is_error())
            .map(KdpMessage::describe)
            .collect();
        if !errors.is_empty() {
            return Err(KdpError::InvalidResponse(errors.join("; ")));
        }

        output.variant_specification.ok_or_else(|| {
            KdpError::InvalidResponse("outputArea.variantSpecification is missing".to_string())
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn request_shape() {
        let spec = KdpVariantSpecification::default();
        let json = serde_json::to_value(KdpRequestEnvelope::for_order("AB123456", &spec)).expect("json");
        assert_eq!(json["inputArea"]["testObjectOrderId"], "AB123456");
        assert!(json["inputArea"]["variantSpecification"].is_object());

        let json = serde_json::to_value(KdpRequestEnvelope::new(&spec)).expect("json");
        assert!(json["inputArea"].get("testObjectOrderId").is_none());
    }

    #[test]
    fn valid_response_yields_specification() {
        let envelope = KdpResponseEnvelope::parse(
            r#"{"outputArea":{"variantSpecification":{"typeCode":"246","isValid":true}}}"#,
        )
        .expect("parse");
        let spec = envelope.validate().expect("valid");
        assert_eq!(spec.type_code.as_deref(), Some("246"));
        assert!(spec.is_valid);
    }

    #[test]
    fn missing_parts_are_invalid() {
        for body in ["{}", r#"{"outputArea":{}}"#] {
            let envelope = KdpResponseEnvelope::parse(body).expect("parse");
            assert!(matches!(envelope.validate(), Err(KdpError::InvalidResponse(_))));
        }
    }

    #[test]
    fn error_messages_fail_validation() {
        let envelope = KdpResponseEnvelope::parse(
            r#"{"outputArea":{"variantSpecification":{},"messages":[
                {"code":"W1","severity":"warning","text":"ok"},
                {"code":"E42","severity":"ERROR","text":"unknown option"}]}}"#,
        )
        .expect("parse");
        match envelope.validate() {
            Err(KdpError::InvalidResponse(msg)) => assert_eq!(msg, "E42: unknown option"),
            other => panic!("expected invalid response, got {other:?}"),
        }
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(KdpResponseEnvelope::parse("<html>"), Err(KdpError::Parse(_))));
    }
}
