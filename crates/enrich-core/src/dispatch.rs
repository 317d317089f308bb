//! AI fallback dispatching and merge policy.
//!
//! Every line that is force-flagged, unmatched, or below the
//! acceptance threshold goes out in one batched call per invoice.
//! Any AI failure is non-fatal: deterministic results stand.

use std::collections::HashMap;

use tracing::{debug, warn};

use enrich_ai::{AiMatchRequest, AiMatcher, AiRequestLine};

use crate::models::{EnrichmentResult, MatchType, ParsedLine};

/// Batches uncertain lines into one AI call and merges the returned
/// candidates under the precedence policy.
pub struct AiFallbackDispatcher<'a> {
    matcher: &'a dyn AiMatcher,
    accept_threshold: f64,
}

impl<'a> AiFallbackDispatcher<'a> {
    pub fn new(matcher: &'a dyn AiMatcher, accept_threshold: f64) -> Self {
        Self {
            matcher,
            accept_threshold,
        }
    }

    /// Dispatch one batch and merge the response into `results`.
    ///
    /// Returns the ids of lines whose results were overwritten, in
    /// candidate order; the caller persists exactly those. An empty
    /// candidate list makes no call at all.
    pub async fn dispatch(
        &self,
        shop_id: &str,
        invoice_id: &str,
        candidates: &[ParsedLine],
        force_ai: bool,
        results: &mut HashMap<String, EnrichmentResult>,
    ) -> Vec<String> {
        if candidates.is_empty() {
            debug!(invoice = %invoice_id, "no AI candidates, skipping call");
            return Vec::new();
        }

        let request = AiMatchRequest {
            shop_id: shop_id.to_string(),
            parsed_invoice_id: invoice_id.to_string(),
            lines: candidates
                .iter()
                .map(|line| AiRequestLine {
                    parsed_line_id: line.id.clone(),
                    raw_text: line.raw_text.clone(),
                    parsed_description: line.parsed_description.clone(),
                    vendor_id: line.vendor_id.clone(),
                })
                .collect(),
        };

        let response = match self.matcher.match_lines(&request).await {
            Ok(response) => response,
            Err(err) => {
                // AI failure is non-fatal; deterministic results stand.
                warn!(invoice = %invoice_id, error = %err, "AI fallback skipped");
                return Vec::new();
            }
        };

        let mut by_line: HashMap<String, enrich_ai::AiResponseLine> = response
            .lines
            .into_iter()
            .map(|line| (line.parsed_line_id.clone(), line))
            .collect();

        let mut merged = Vec::new();
        for candidate_line in candidates {
            let Some(ai_line) = by_line.remove(&candidate_line.id) else {
                continue;
            };
            let Some(result) = results.get_mut(&candidate_line.id) else {
                continue;
            };

            // Precedence: a high-confidence deterministic match is
            // authoritative unless the caller forced AI.
            let overridable = force_ai
                || !result.is_matched()
                || result.match_confidence < self.accept_threshold;
            if !overridable {
                debug!(line = %candidate_line.id, "AI suggestion discarded");
                continue;
            }

            apply_ai_line(result, ai_line);
            merged.push(candidate_line.id.clone());
        }

        merged
    }
}

/// Overwrite a result with an AI candidate. Fields absent in the
/// response are left as-is.
fn apply_ai_line(result: &mut EnrichmentResult, ai_line: enrich_ai::AiResponseLine) {
    if let Some(product_id) = ai_line.product_id {
        result.matched_product_id = Some(product_id);
    }
    result.match_type = MatchType::from_str(&ai_line.match_type).unwrap_or(MatchType::Ai);
    result.match_confidence = ai_line.confidence.clamp(0.0, 1.0);

    // No product id means no match, whatever the wire said.
    // Classification fields ride along only with a product id, so
    // any hsn/gst in such a response is dropped too.
    if result.matched_product_id.is_none() {
        result.match_type = MatchType::None;
        return;
    }

    if let Some(hsn) = ai_line.hsn {
        result.hsn_code = Some(hsn);
    }
    if let Some(gst) = ai_line.gst {
        result.gst_rate = Some(gst);
    }
    if let Some(reason) = ai_line.reason {
        result.reason = Some(reason);
    }
}
