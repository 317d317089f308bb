//! Enrichment output models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a line was resolved to a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// No match.
    None,
    /// Exact SKU extracted from the raw text.
    Sku,
    /// Prior vendor text-to-product mapping.
    VendorMap,
    /// Normalized exact name match.
    Exact,
    /// Approximate name match.
    Fuzzy,
    /// AI fallback candidate.
    Ai,
}

impl Default for MatchType {
    fn default() -> Self {
        Self::None
    }
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::None => "none",
            MatchType::Sku => "sku",
            MatchType::VendorMap => "vendor_map",
            MatchType::Exact => "exact",
            MatchType::Fuzzy => "fuzzy",
            MatchType::Ai => "ai",
        }
    }

    /// Decode a wire string. Unknown values return `None` so callers
    /// can pick their own fallback.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(MatchType::None),
            "sku" => Some(MatchType::Sku),
            "vendor_map" => Some(MatchType::VendorMap),
            "exact" => Some(MatchType::Exact),
            "fuzzy" => Some(MatchType::Fuzzy),
            "ai" => Some(MatchType::Ai),
            _ => None,
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persistence status of a line's enrichment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentStatus {
    /// Final record written.
    Done,
    /// Line queued for the AI batch; a final write may follow.
    AiPending,
}

/// The current enrichment state of one invoice line.
///
/// Each line has exactly one such record; re-enrichment replaces it.
/// Invariants: `match_confidence` stays in [0, 1]; a missing product
/// id forces `match_type == none`; classification fields are set only
/// when a product id is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    pub line_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_product_id: Option<String>,

    pub match_type: MatchType,

    pub match_confidence: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hsn_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gst_rate: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub potency_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,

    /// Free-text explanation, set only by the AI merge step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl EnrichmentResult {
    /// Unmatched result for a line.
    pub fn unmatched(line_id: impl Into<String>) -> Self {
        Self {
            line_id: line_id.into(),
            matched_product_id: None,
            match_type: MatchType::None,
            match_confidence: 0.0,
            hsn_code: None,
            gst_rate: None,
            category_id: None,
            subcategory_id: None,
            form_id: None,
            potency_id: None,
            unit_id: None,
            reason: None,
        }
    }

    /// Result for a deterministic match.
    pub fn matched(
        line_id: impl Into<String>,
        product_id: impl Into<String>,
        match_type: MatchType,
        confidence: f64,
    ) -> Self {
        Self {
            matched_product_id: Some(product_id.into()),
            match_type,
            match_confidence: confidence.clamp(0.0, 1.0),
            ..Self::unmatched(line_id)
        }
    }

    pub fn is_matched(&self) -> bool {
        self.matched_product_id.is_some()
    }
}

/// Per-line persistence failure. Does not fail the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineFailure {
    pub line_id: String,
    pub error: String,
}

/// Output of one `enrich` invocation: results in original line order
/// with a single computed-at timestamp for the whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentRun {
    pub invoice_id: String,
    pub results: Vec<EnrichmentResult>,
    pub computed_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line_failures: Vec<LineFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_match_type_round_trip() {
        for mt in [
            MatchType::None,
            MatchType::Sku,
            MatchType::VendorMap,
            MatchType::Exact,
            MatchType::Fuzzy,
            MatchType::Ai,
        ] {
            assert_eq!(MatchType::from_str(mt.as_str()), Some(mt));
        }
        assert_eq!(MatchType::from_str("semantic"), None);
    }

    #[test]
    fn test_matched_clamps_confidence() {
        let result = EnrichmentResult::matched("line-1", "prod-1", MatchType::Fuzzy, 1.3);
        assert_eq!(result.match_confidence, 1.0);
    }

    #[test]
    fn test_unmatched_has_none_type() {
        let result = EnrichmentResult::unmatched("line-1");
        assert_eq!(result.match_type, MatchType::None);
        assert_eq!(result.match_confidence, 0.0);
        assert!(!result.is_matched());
    }

    #[test]
    fn test_serializes_snake_case_types() {
        let result = EnrichmentResult::matched("line-1", "prod-1", MatchType::VendorMap, 0.9);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["match_type"], "vendor_map");
        // Unset optionals stay off the wire.
        assert!(json.get("hsn_code").is_none());
    }
}
