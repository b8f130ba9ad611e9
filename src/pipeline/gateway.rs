//! Gateway response envelope
//!
//! Serializable response shape for proxy-integration hosting, where binary
//! bodies must be base64 text (`isBase64Encoded`). JSON error bodies pass
//! through as plain text.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;
use std::collections::BTreeMap;

use super::ImageResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl From<&ImageResponse> for GatewayResponse {
    fn from(response: &ImageResponse) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(
            "Content-Type".to_string(),
            response.content_type.to_string(),
        );
        if let Some(cache_control) = &response.cache_control {
            headers.insert("Cache-Control".to_string(), cache_control.clone());
        }
        if let Some(origin) = response.optimized_from {
            headers.insert("X-Optimized".to_string(), origin.to_string());
        }

        let (body, is_base64_encoded) = if response.is_success() {
            (BASE64.encode(&response.body), true)
        } else {
            (
                String::from_utf8_lossy(&response.body).into_owned(),
                false,
            )
        };

        Self {
            status_code: response.status,
            headers,
            body,
            is_base64_encoded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_success_body_is_base64() {
        let response = ImageResponse {
            status: 200,
            content_type: "image/webp",
            cache_control: Some("public, max-age=31536000".to_string()),
            optimized_from: Some("generated"),
            body: Bytes::from_static(&[0xDE, 0xAD, 0xBE, 0xEF]),
        };

        let gateway = GatewayResponse::from(&response);
        assert_eq!(gateway.status_code, 200);
        assert!(gateway.is_base64_encoded);
        assert_eq!(gateway.body, BASE64.encode([0xDE, 0xAD, 0xBE, 0xEF]));
        assert_eq!(gateway.headers["Content-Type"], "image/webp");
        assert_eq!(gateway.headers["Cache-Control"], "public, max-age=31536000");
        assert_eq!(gateway.headers["X-Optimized"], "generated");
    }

    #[test]
    fn test_error_body_stays_plain_text() {
        let response = ImageResponse {
            status: 400,
            content_type: "application/json",
            cache_control: None,
            optimized_from: None,
            body: Bytes::from_static(b"{\"error\":\"Invalid path format\"}"),
        };

        let gateway = GatewayResponse::from(&response);
        assert_eq!(gateway.status_code, 400);
        assert!(!gateway.is_base64_encoded);
        assert!(gateway.body.contains("Invalid path format"));
        assert!(!gateway.headers.contains_key("X-Optimized"));
        assert!(!gateway.headers.contains_key("Cache-Control"));
    }

    #[test]
    fn test_serializes_with_camel_case_fields() {
        let response = ImageResponse {
            status: 200,
            content_type: "image/png",
            cache_control: None,
            optimized_from: Some("cache"),
            body: Bytes::from_static(b"x"),
        };

        let json = serde_json::to_value(GatewayResponse::from(&response)).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["isBase64Encoded"], true);
        assert!(json["headers"].is_object());
        assert!(json["body"].is_string());
    }
}
