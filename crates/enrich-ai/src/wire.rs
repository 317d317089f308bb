//! Wire types for the batch AI matching contract.
//!
//! One request carries every uncertain line of a single invoice; the
//! response lists candidates per line. Lines absent from the response
//! carry no AI contribution.

use serde::{Deserialize, Serialize};

/// Batch request for one invoice enrichment run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiMatchRequest {
    /// Shop the invoice belongs to.
    pub shop_id: String,

    /// Parsed invoice being enriched.
    pub parsed_invoice_id: String,

    /// Every line needing an AI opinion.
    pub lines: Vec<AiRequestLine>,
}

/// One invoice line in the outbound batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiRequestLine {
    pub parsed_line_id: String,
    pub raw_text: String,
    pub parsed_description: String,
    pub vendor_id: String,
}

/// Batch response from the AI matcher.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiMatchResponse {
    #[serde(default)]
    pub lines: Vec<AiResponseLine>,
}

/// AI candidate for one line.
///
/// `match_type` stays a plain string on the wire; decoding into the
/// core enum (with fallback) is the caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiResponseLine {
    pub parsed_line_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    pub match_type: String,

    pub confidence: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gst: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_shape() {
        let request = AiMatchRequest {
            shop_id: "shop-1".to_string(),
            parsed_invoice_id: "inv-1".to_string(),
            lines: vec![AiRequestLine {
                parsed_line_id: "line-1".to_string(),
                raw_text: "ARN-30C-001 Arnica".to_string(),
                parsed_description: "Arnica Montana 30C".to_string(),
                vendor_id: "vendor-1".to_string(),
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["shop_id"], "shop-1");
        assert_eq!(json["parsed_invoice_id"], "inv-1");
        assert_eq!(json["lines"][0]["parsed_line_id"], "line-1");
        assert_eq!(json["lines"][0]["vendor_id"], "vendor-1");
    }

    #[test]
    fn test_response_optional_fields_default() {
        let body = r#"{"lines":[{"parsed_line_id":"line-1","match_type":"ai","confidence":0.6}]}"#;
        let response: AiMatchResponse = serde_json::from_str(body).unwrap();

        let line = &response.lines[0];
        assert_eq!(line.parsed_line_id, "line-1");
        assert_eq!(line.product_id, None);
        assert_eq!(line.hsn, None);
        assert_eq!(line.gst, None);
        assert_eq!(line.reason, None);
    }

    #[test]
    fn test_response_missing_lines_defaults_empty() {
        let response: AiMatchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.lines.is_empty());
    }
}
